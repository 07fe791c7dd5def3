//! Serves stored uploads so the editor can preview the current image.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::application::{error::HttpError, storage::StorageError};

use super::AdminState;

const SOURCE: &str = "postdesk::http::admin::media";

pub(super) async fn serve_stored_media(
    State(state): State<AdminState>,
    Path(path): Path<String>,
) -> Response {
    match state.media.read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, mime.as_ref())
                .header(CACHE_CONTROL, "private, max-age=300")
                .body(Body::from(bytes))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(err @ (StorageError::InvalidPath(_) | StorageError::NotFound(_))) => {
            HttpError::from_error(SOURCE, StatusCode::NOT_FOUND, "File not found", &err)
                .into_response()
        }
        Err(err) => {
            error!(target = SOURCE, path = %path, error = %err, "failed to read stored media");
            HttpError::from_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read stored file",
                &err,
            )
            .into_response()
        }
    }
}
