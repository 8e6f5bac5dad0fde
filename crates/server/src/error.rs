//! Request errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fileshift_image::ConvertError;
use thiserror::Error;

/// Errors returned by the `/transform` handler
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not parseable multipart, or exceeded the upload limit
    #[error("invalid multipart/form-data")]
    InvalidMultipart,

    /// No file part named `file`
    #[error("missing form field: file")]
    MissingFile,

    /// The converter rejected the upload or target
    #[error("convert failed: {0}")]
    Convert(#[from] ConvertError),

    /// The blocking conversion task did not complete
    #[error("conversion task failed: {0}")]
    Task(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidMultipart | ApiError::MissingFile | ApiError::Convert(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidMultipart.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Convert(ConvertError::UnsupportedFormat("bmp".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Task("panicked".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_convert_message() {
        let err = ApiError::from(ConvertError::UnsupportedFormat("bmp".into()));
        assert_eq!(err.to_string(), "convert failed: unsupported target format: \"bmp\"");
    }
}
