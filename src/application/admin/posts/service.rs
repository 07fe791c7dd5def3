use std::sync::Arc;

use crate::application::repos::{CategoriesRepo, PostsRepo, PostsWriteRepo, TagsRepo};
use crate::application::storage::MediaStorage;

#[derive(Clone)]
pub struct AdminPostService {
    pub(crate) reader: Arc<dyn PostsRepo>,
    pub(crate) writer: Arc<dyn PostsWriteRepo>,
    pub(crate) categories: Arc<dyn CategoriesRepo>,
    pub(crate) tags: Arc<dyn TagsRepo>,
    pub(crate) media: Arc<dyn MediaStorage>,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        categories: Arc<dyn CategoriesRepo>,
        tags: Arc<dyn TagsRepo>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            reader,
            writer,
            categories,
            tags,
            media,
        }
    }
}
