mod commands;
mod editor;
mod queries;
mod service;
pub mod types;
pub mod validation;


pub use editor::PostEditor;
pub use service::*;
pub use types::{
    AdminPostError, EditorLookups, EditorPhase, IMAGE_NAMESPACE, POSTS_INDEX_PATH, PostEditorForm,
    PostListItem, SubmittedPost, UploadedImage,
};
pub use validation::{MAX_IMAGE_KILOBYTES, ValidationErrors};
