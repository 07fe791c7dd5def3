use std::sync::Arc;

use crate::application::admin::posts::AdminPostService;
use crate::application::storage::MediaStorage;

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub media: Arc<dyn MediaStorage>,
    pub site_title: Arc<str>,
}
