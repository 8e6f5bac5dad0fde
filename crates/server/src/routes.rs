//! Route handlers.

use crate::error::ApiError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use fileshift_image::{ConvertOptions, convert_bytes, sniff_mime};
use fileshift_telemetry::Timer;

/// Version reported by `GET /version`.
pub const API_VERSION: &str = "0.1";

/// Target used when `?to=` is absent or empty.
const DEFAULT_TARGET: &str = "png";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) convert: ConvertOptions,
}

pub(crate) async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub(crate) async fn version() -> impl IntoResponse {
    Json(serde_json::json!({ "version": API_VERSION }))
}

pub(crate) async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// Read every part, keeping the first file part named `file`.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::InvalidMultipart)?
    {
        let filename = match (field.name(), field.file_name()) {
            (Some("file"), Some(name)) if upload.is_none() && !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let data = field.bytes().await.map_err(|_| ApiError::InvalidMultipart)?;
        upload = Some(Upload {
            filename,
            data: data.to_vec(),
        });
    }

    upload.ok_or(ApiError::MissingFile)
}

pub(crate) async fn transform(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let to = target_from_query(&query);

    let multipart = multipart.map_err(|_| ApiError::InvalidMultipart)?;
    let upload = read_upload(multipart).await?;

    tracing::debug!(
        filename = %upload.filename,
        size_bytes = upload.data.len(),
        sniffed = sniff_mime(&upload.data),
        to = %to,
        "Received upload"
    );

    let options = state.convert.clone();
    let target = to.clone();
    let data = upload.data;
    let conversion = tokio::task::spawn_blocking(move || {
        let timer = Timer::start("convert");
        let result = convert_bytes(&data, &target, &options);
        timer.stop();
        result
    })
    .await
    .map_err(|e| ApiError::Task(e.to_string()))?
    .inspect_err(|e| {
        tracing::warn!(filename = %upload.filename, to = %to, error = %e, "Conversion failed")
    })?;

    tracing::info!(
        filename = %upload.filename,
        source = ?conversion.source_format,
        mime = conversion.mime,
        width = conversion.width,
        height = conversion.height,
        output_bytes = conversion.bytes.len(),
        "Transformed upload"
    );

    let disposition = content_disposition(&upload.filename, &to);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(conversion.mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        conversion.bytes,
    )
        .into_response())
}

/// First `to` pair in the query string, or the default when absent or empty.
fn target_from_query(query: &[(String, String)]) -> String {
    query
        .iter()
        .find(|(key, _)| key == "to")
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_TARGET)
        .to_string()
}

/// Strip a trailing `.png`, then `.jpg`, then `.jpeg` (case-sensitive).
///
/// Other extensions are left in place, so `a.gif` downloads as `a.gif.png`.
pub(crate) fn download_basename(filename: &str) -> &str {
    [".png", ".jpg", ".jpeg"]
        .into_iter()
        .fold(filename, |name, suffix| name.strip_suffix(suffix).unwrap_or(name))
}

fn content_disposition(filename: &str, to: &str) -> HeaderValue {
    let ext = to.to_lowercase();
    let ext = ext.strip_prefix('.').unwrap_or(&ext);
    let base: String = download_basename(filename)
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();

    let value = format!("attachment; filename=\"{base}.{ext}\"");
    HeaderValue::from_str(&value)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
