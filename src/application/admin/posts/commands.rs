use metrics::counter;
use tracing::{debug, info, warn};

use crate::application::repos::UpdatePostParams;

use super::editor::PostEditor;
use super::service::AdminPostService;
use super::types::{
    AdminPostError, EditorPhase, IMAGE_NAMESPACE, POSTS_INDEX_PATH, PostEditorForm, SubmittedPost,
};
use super::validation::{ValidationContext, parse_id, unique_tag_ids, validate};

const SOURCE: &str = "postdesk::admin::posts";

impl AdminPostService {
    /// Validate the editor state and persist it.
    ///
    /// On a validation failure the messages are stored on the editor, the same
    /// errors are returned, and nothing is written. On success the post row and
    /// its tag set are replaced in one transaction, and a replaced image is
    /// removed from storage only after that transaction committed.
    pub async fn submit(&self, editor: &mut PostEditor) -> Result<SubmittedPost, AdminPostError> {
        if editor.phase() != EditorPhase::Editing {
            return Err(AdminPostError::AlreadySubmitted);
        }

        let context = self.validation_context(editor.form()).await?;
        let validated = match validate(editor.form(), &context) {
            Ok(validated) => validated,
            Err(errors) => {
                counter!("postdesk_post_validation_failure_total").increment(1);
                debug!(
                    target = SOURCE,
                    post_id = %editor.post_id(),
                    fields = %errors,
                    "post submission rejected"
                );
                editor.reject(errors.clone());
                return Err(AdminPostError::Validation(errors));
            }
        };

        let previous_image = editor.form().existing_image.clone();
        let stored_image = match &validated.image {
            Some(image) => {
                if image.declared_type_mismatch() {
                    debug!(
                        target = SOURCE,
                        post_id = %editor.post_id(),
                        declared = %image.upload.content_type,
                        detected = image.mime_type(),
                        "upload content type differs from its bytes"
                    );
                }
                // The path extension decides how the file is served back.
                let filename = image.stored_filename();
                Some(
                    self.media
                        .store(IMAGE_NAMESPACE, &filename, image.upload.data.clone())
                        .await?,
                )
            }
            None => None,
        };

        let loaded = editor.post();
        let params = UpdatePostParams {
            id: loaded.id,
            title: loaded.title.clone(),
            slug: loaded.slug.clone(),
            content: validated.content,
            category_id: validated.category_id,
            status: validated.status,
            image: stored_image.clone().or_else(|| previous_image.clone()),
            tag_ids: validated.tag_ids,
        };

        let post = match self.writer.update_post(params).await {
            Ok(post) => post,
            Err(err) => {
                if let Some(path) = stored_image.as_deref() {
                    self.discard_stored_image(path).await;
                }
                return Err(err.into());
            }
        };

        if let Some(new_path) = stored_image.as_deref()
            && let Some(old_path) = previous_image.as_deref()
            && new_path != old_path
        {
            self.remove_replaced_image(old_path).await;
        }

        counter!("postdesk_post_update_total").increment(1);
        info!(
            target = SOURCE,
            post_id = %post.id,
            status = post.status.as_str(),
            image_replaced = stored_image.is_some(),
            "post updated"
        );

        editor.complete(post.clone(), POSTS_INDEX_PATH);
        Ok(SubmittedPost {
            post,
            redirect_to: POSTS_INDEX_PATH,
        })
    }

    /// Resolve which of the submitted category and tag ids exist.
    async fn validation_context(
        &self,
        form: &PostEditorForm,
    ) -> Result<ValidationContext, AdminPostError> {
        let mut context = ValidationContext::default();

        if let Some(category_id) = parse_id(&form.category_id)
            && self.categories.find_by_id(category_id).await?.is_some()
        {
            context.categories.insert(category_id);
        }

        let tag_ids = unique_tag_ids(form);
        if !tag_ids.is_empty() {
            context
                .tags
                .extend(self.tags.find_existing_ids(&tag_ids).await?);
        }

        Ok(context)
    }

    async fn remove_replaced_image(&self, path: &str) {
        if let Err(err) = self.media.delete(path).await {
            counter!("postdesk_image_cleanup_failure_total").increment(1);
            warn!(
                target = SOURCE,
                error = %err,
                path,
                "failed to delete replaced post image"
            );
        }
    }

    async fn discard_stored_image(&self, path: &str) {
        if let Err(err) = self.media.delete(path).await {
            counter!("postdesk_image_cleanup_failure_total").increment(1);
            warn!(
                target = SOURCE,
                error = %err,
                path,
                "failed to roll back stored image after persistence error"
            );
        }
    }
}
