mod errors;
mod handlers;
mod multipart;
mod views;

pub(super) use handlers::{admin_post_edit, admin_post_update, admin_posts};
