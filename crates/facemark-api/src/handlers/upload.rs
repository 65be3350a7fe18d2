//! Upload handler: validate → detect → redact → respond.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use tracing::info;

use facemark_models::{
    file_extension, is_allowed_extension, FaceBox, InlineImages, StoredImages, UploadResponse,
    ALLOWED_EXTENSIONS,
};
use facemark_storage::{output_names, sanitize_filename, unique_stem};
use facemark_vision::{encode_jpeg, VisionError};

use crate::config::OutputMode;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// `POST /upload` — multipart form field `file`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut part: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            part = Some((filename, bytes));
            break;
        }
    }

    let Some((filename, bytes)) = part else {
        metrics::record_upload_rejected("missing_file");
        return Err(ApiError::bad_request("no file part in request"));
    };

    if filename.is_empty() {
        metrics::record_upload_rejected("empty_filename");
        return Err(ApiError::bad_request("no file selected"));
    }

    if !is_allowed_extension(&filename) {
        metrics::record_upload_rejected("bad_extension");
        return Err(ApiError::bad_request(format!(
            "unsupported file format; allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    if bytes.len() > state.config.max_upload_bytes {
        metrics::record_upload_rejected("too_large");
        return Err(ApiError::PayloadTooLarge);
    }

    let (faces, marked_jpeg, blurred_jpeg) = run_pipeline(&state, bytes.clone()).await?;

    info!(
        file = %filename,
        face_count = faces.len(),
        "processed upload"
    );

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    match state.config.output_mode {
        OutputMode::Disk => {
            // The extension was validated above.
            let ext = file_extension(&filename).unwrap_or_else(|| "jpg".to_string());
            let stem = unique_stem();
            let original_name = format!("{stem}.{ext}");
            let (marked_name, blurred_name) = output_names(&stem, Utc::now());

            state.store.save(&original_name, &bytes).await?;
            state.store.save(&marked_name, &marked_jpeg).await?;
            state.store.save(&blurred_name, &blurred_jpeg).await?;

            Ok(Json(UploadResponse::stored(
                faces,
                timestamp,
                StoredImages {
                    original_url: state.store.url_for(&original_name),
                    marked_url: state.store.url_for(&marked_name),
                    blurred_url: state.store.url_for(&blurred_name),
                    original_name: sanitize_filename(&filename),
                },
            )))
        }
        OutputMode::Inline => Ok(Json(UploadResponse::inline(
            faces,
            timestamp,
            InlineImages {
                marked_image: BASE64.encode(&marked_jpeg),
                blurred_image: BASE64.encode(&blurred_jpeg),
            },
        ))),
    }
}

/// Run the CPU-bound pipeline off the async runtime and encode both
/// outputs as JPEG.
async fn run_pipeline(
    state: &AppState,
    bytes: axum::body::Bytes,
) -> ApiResult<(Vec<FaceBox>, Vec<u8>, Vec<u8>)> {
    let pipeline = Arc::clone(&state.pipeline);
    let start = Instant::now();

    let result = tokio::task::spawn_blocking(move || {
        let redaction = pipeline.run(&bytes)?;
        let marked = encode_jpeg(&redaction.marked)?;
        let blurred = encode_jpeg(&redaction.blurred)?;
        Ok::<_, VisionError>((redaction.faces, marked, blurred))
    })
    .await
    .map_err(|e| ApiError::internal(format!("pipeline task failed: {e}")))??;

    metrics::record_image_processed(result.0.len(), start.elapsed().as_secs_f64());
    Ok(result)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        metrics::record_upload_rejected("too_large");
        ApiError::PayloadTooLarge
    } else {
        ApiError::bad_request(format!("malformed multipart request: {}", err.body_text()))
    }
}
