//! Shared domain enumerations aligned with persisted database enums.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
pub enum PostStatus {
    Published,
    Draft,
}

impl PostStatus {
    pub const ALL: [PostStatus; 2] = [PostStatus::Published, PostStatus::Draft];

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Draft => "draft",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostStatus::Published => "Published",
            PostStatus::Draft => "Draft",
        }
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    /// Matches the persisted spelling exactly; no trimming or case folding.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "published" => Ok(PostStatus::Published),
            "draft" => Ok(PostStatus::Draft),
            other => Err(DomainError::validation(format!(
                "unknown post status `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_exact_persisted_spellings() {
        assert_eq!("published".parse::<PostStatus>().ok(), Some(PostStatus::Published));
        assert_eq!("draft".parse::<PostStatus>().ok(), Some(PostStatus::Draft));
        assert!("archived".parse::<PostStatus>().is_err());
        assert!("Draft".parse::<PostStatus>().is_err());
        assert!(" draft".parse::<PostStatus>().is_err());
    }

    #[test]
    fn round_trips_through_as_str() {
        for status in PostStatus::ALL {
            assert_eq!(status.as_str().parse::<PostStatus>().ok(), Some(status));
        }
    }
}
