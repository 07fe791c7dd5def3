mod media;
mod posts;
mod state;

pub use state::AdminState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::get,
};

use crate::application::admin::posts::POSTS_INDEX_PATH;

use super::middleware::{log_responses, set_request_context};

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    Router::new()
        .route("/", get(admin_root))
        .route("/posts", get(posts::admin_posts))
        .route(
            "/posts/{id}/edit",
            get(posts::admin_post_edit)
                .post(posts::admin_post_update)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/storage/{*path}", get(media::serve_stored_media))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn admin_root() -> Redirect {
    Redirect::to(POSTS_INDEX_PATH)
}
