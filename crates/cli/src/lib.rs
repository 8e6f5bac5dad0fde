//! CLI utilities for fileshift
//!
//! Provides terminal output formatting shared by the command-line tool.

#![warn(missing_docs)]

pub mod output;
