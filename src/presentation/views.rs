//! Template rendering helpers shared by the admin handlers.

use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::HttpError;

const RENDER_SOURCE: &str = "postdesk::presentation::render_template";

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        HttpError::from_error(
            err.source,
            StatusCode::INTERNAL_SERVER_ERROR,
            err.public_message,
            &err.error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template
        .render()
        .map(Html)
        .map_err(|err| TemplateRenderError::new(RENDER_SOURCE, "Template rendering failed", err).into())
}

/// Render `template` with `status`, falling back to a 500 when rendering fails.
pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Format a timestamp for admin tables.
pub fn format_timestamp(value: time::OffsetDateTime) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
    value
        .to_offset(time::UtcOffset::UTC)
        .format(&format)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_in_utc() {
        let value = time::macros::datetime!(2026-03-04 05:06 +02:00);
        assert_eq!(format_timestamp(value), "2026-03-04 03:06 UTC");
    }

    #[test]
    fn render_error_becomes_internal_server_error() {
        let err: HttpError = TemplateRenderError::new(
            "test",
            "Template rendering failed",
            AskamaError::Fmt,
        )
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
