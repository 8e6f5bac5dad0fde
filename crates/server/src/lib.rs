//! HTTP front-end for fileshift.
//!
//! Routes:
//! - `GET /health` and `GET /version` status endpoints
//! - `POST /transform?to=<format>` multipart upload conversion

#![warn(missing_docs)]

pub mod config;
mod error;
mod routes;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::API_VERSION;
pub use server::{build_app, serve};
