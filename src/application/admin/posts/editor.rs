//! Edit-form controller state for a single post.

use uuid::Uuid;

use crate::domain::entities::{PostRecord, TagRecord};

use super::types::{EditorLookups, EditorPhase, PostEditorForm, UploadedImage};
use super::validation::ValidationErrors;

/// Form state seeded from a persisted post and mutated by input handlers.
///
/// Created by [`super::AdminPostService::open_editor`]; the only transition out
/// of [`EditorPhase::Editing`] is a successful [`super::AdminPostService::submit`].
#[derive(Debug, Clone)]
pub struct PostEditor {
    post: PostRecord,
    form: PostEditorForm,
    lookups: EditorLookups,
    errors: ValidationErrors,
    phase: EditorPhase,
}

impl PostEditor {
    pub(crate) fn new(post: PostRecord, tags: &[TagRecord], lookups: EditorLookups) -> Self {
        let form = PostEditorForm::from_post(&post, tags);
        Self {
            post,
            form,
            lookups,
            errors: ValidationErrors::default(),
            phase: EditorPhase::Editing,
        }
    }

    pub fn post_id(&self) -> Uuid {
        self.post.id
    }

    /// The record as loaded when the editor was opened.
    pub fn post(&self) -> &PostRecord {
        &self.post
    }

    pub fn form(&self) -> &PostEditorForm {
        &self.form
    }

    pub fn lookups(&self) -> &EditorLookups {
        &self.lookups
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.form.content = value.into();
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.form.category_id = value.into();
    }

    pub fn set_tags<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.form.tags = values.into_iter().map(Into::into).collect();
    }

    pub fn set_status(&mut self, value: impl Into<String>) {
        self.form.status = value.into();
    }

    pub fn attach_image(&mut self, image: UploadedImage) {
        self.form.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.form.image = None;
    }

    pub(crate) fn reject(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    pub(crate) fn complete(&mut self, post: PostRecord, redirect_to: &'static str) {
        self.errors = ValidationErrors::default();
        self.form.existing_image = post.image.clone();
        self.form.image = None;
        self.post = post;
        self.phase = EditorPhase::Submitted { redirect_to };
    }
}
