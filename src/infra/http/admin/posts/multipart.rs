//! Maps a multipart edit submission onto the editor's input handlers.

use axum::http::StatusCode;
use axum_extra::extract::Multipart;
use axum_extra::extract::multipart::MultipartError;
use tracing::{debug, error};

use crate::application::admin::posts::{PostEditor, UploadedImage};

use super::errors::PostPayloadError;

const SOURCE: &str = "postdesk::http::admin::posts::multipart";

/// Apply every submitted field to `editor`.
///
/// The body is treated as the whole form: a missing text field becomes empty,
/// an absent `tags` field clears the selection, and a file part without bytes
/// (no file chosen) leaves the stored image untouched.
pub(super) async fn apply_submission(
    multipart: &mut Multipart,
    editor: &mut PostEditor,
) -> Result<(), PostPayloadError> {
    let mut content = String::new();
    let mut category = String::new();
    let mut status = String::new();
    let mut tags = Vec::new();
    let mut image = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(payload_error(err)),
        };

        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "content" => content = field.text().await.map_err(payload_error)?,
            "category_id" => category = field.text().await.map_err(payload_error)?,
            "status" => status = field.text().await.map_err(payload_error)?,
            "tags" | "tags[]" => tags.push(field.text().await.map_err(payload_error)?),
            "image" => {
                let filename = field
                    .file_name()
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default();
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(payload_error)?;

                if data.is_empty() && filename.is_empty() {
                    continue;
                }
                image = Some(UploadedImage {
                    filename: if filename.is_empty() {
                        "upload".to_string()
                    } else {
                        filename
                    },
                    content_type,
                    data,
                });
            }
            other => {
                debug!(target = SOURCE, field = other, "ignoring unknown form field");
            }
        }
    }

    editor.set_content(content);
    editor.set_category(category);
    editor.set_status(status);
    editor.set_tags(tags);
    match image {
        Some(image) => editor.attach_image(image),
        None => editor.clear_image(),
    }

    Ok(())
}

fn payload_error(err: MultipartError) -> PostPayloadError {
    let status = err.status();
    error!(
        target = SOURCE,
        status = status.as_u16(),
        error = %err,
        "failed to read multipart payload"
    );
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => PostPayloadError::PayloadTooLarge(err.body_text()),
        _ => PostPayloadError::InvalidFormData(err.body_text()),
    }
}
