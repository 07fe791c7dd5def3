use axum::http::StatusCode;

use crate::{
    application::{admin::posts::AdminPostError, error::HttpError},
    infra::http::repo_error_to_http,
};

pub(super) fn admin_post_error(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::NotFound(id) => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("post `{id}` does not exist"),
        ),
        AdminPostError::Validation(errors) => HttpError::new(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Post submission was rejected",
            errors.to_string(),
        ),
        AdminPostError::AlreadySubmitted => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Post was already submitted",
            "editor already left the editing phase",
        ),
        err @ AdminPostError::Storage(_) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store image",
            &err,
        ),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

/// Failures while reading the multipart submission itself.
#[derive(Debug)]
pub(super) enum PostPayloadError {
    PayloadTooLarge(String),
    InvalidFormData(String),
}

impl PostPayloadError {
    pub(super) fn into_http(self, source: &'static str) -> HttpError {
        match self {
            PostPayloadError::PayloadTooLarge(detail) => HttpError::new(
                source,
                StatusCode::PAYLOAD_TOO_LARGE,
                "Submission is too large",
                detail,
            ),
            PostPayloadError::InvalidFormData(detail) => HttpError::new(
                source,
                StatusCode::BAD_REQUEST,
                "Form data was invalid",
                detail,
            ),
        }
    }
}
