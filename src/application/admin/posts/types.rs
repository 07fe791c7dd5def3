use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

use crate::application::{repos::RepoError, storage::StorageError};
use crate::domain::entities::{CategoryRecord, PostRecord, TagRecord};

use super::validation::ValidationErrors;

/// Listing the editor redirects to after a successful submission.
pub const POSTS_INDEX_PATH: &str = "/posts";

/// Storage namespace for featured images.
pub const IMAGE_NAMESPACE: &str = "posts";

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("post `{0}` not found")]
    NotFound(Uuid),
    #[error("post submission rejected: {0}")]
    Validation(ValidationErrors),
    #[error("post editor was already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A file received from the image picker, buffered in memory.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadedImage {
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Editable field state, kept as submitted so a rejected form re-renders verbatim.
#[derive(Debug, Clone, Default)]
pub struct PostEditorForm {
    /// Display only; never written by the editor.
    pub title: String,
    pub content: String,
    pub category_id: String,
    pub tags: Vec<String>,
    pub status: String,
    /// Path of the image currently stored for the post.
    pub existing_image: Option<String>,
    pub image: Option<UploadedImage>,
}

impl PostEditorForm {
    pub(crate) fn from_post(post: &PostRecord, tags: &[TagRecord]) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            category_id: post.category_id.to_string(),
            tags: tags.iter().map(|tag| tag.id.to_string()).collect(),
            status: post.status.as_str().to_string(),
            existing_image: post.image.clone(),
            image: None,
        }
    }
}

/// Selection options rendered next to the form.
#[derive(Debug, Clone, Default)]
pub struct EditorLookups {
    pub categories: Vec<CategoryRecord>,
    pub tags: Vec<TagRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    Submitted { redirect_to: &'static str },
}

#[derive(Debug, Clone)]
pub struct SubmittedPost {
    pub post: PostRecord,
    pub redirect_to: &'static str,
}

#[derive(Debug, Clone)]
pub struct PostListItem {
    pub post: PostRecord,
    pub category_name: Option<String>,
}
