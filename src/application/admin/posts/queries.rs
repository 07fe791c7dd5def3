use std::collections::HashMap;

use uuid::Uuid;

use super::editor::PostEditor;
use super::service::AdminPostService;
use super::types::{AdminPostError, EditorLookups, PostListItem};

impl AdminPostService {
    /// Load a post and seed an editor with its current values and tag set.
    pub async fn open_editor(&self, id: Uuid) -> Result<PostEditor, AdminPostError> {
        let post = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound(id))?;
        let current_tags = self.tags.list_for_post(id).await?;
        let lookups = self.load_lookups().await?;

        Ok(PostEditor::new(post, &current_tags, lookups))
    }

    pub async fn load_lookups(&self) -> Result<EditorLookups, AdminPostError> {
        let categories = self.categories.list_all().await?;
        let tags = self.tags.list_all().await?;
        Ok(EditorLookups { categories, tags })
    }

    pub async fn list(&self) -> Result<Vec<PostListItem>, AdminPostError> {
        let posts = self.reader.list_posts().await?;
        let category_names: HashMap<Uuid, String> = self
            .categories
            .list_all()
            .await?
            .into_iter()
            .map(|category| (category.id, category.name))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| PostListItem {
                category_name: category_names.get(&post.category_id).cloned(),
                post,
            })
            .collect())
    }
}
