use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Multipart;
use uuid::Uuid;

use crate::{
    application::{
        admin::posts::{AdminPostError, POSTS_INDEX_PATH, PostEditor},
        error::ErrorReport,
    },
    infra::http::admin::AdminState,
    presentation::{
        admin::views::{
            AdminChrome, AdminErrorTemplate, AdminErrorView, AdminLayout, AdminPostEditTemplate,
            AdminPostsTemplate,
        },
        views::render_template_response,
    },
};

use super::{
    errors::admin_post_error,
    multipart::apply_submission,
    views::{build_post_editor_view, build_post_list_view, editor_path},
};

pub(crate) async fn admin_posts(State(state): State<AdminState>) -> Response {
    const SOURCE: &str = "postdesk::http::admin_posts";

    match state.posts.list().await {
        Ok(items) => {
            let chrome = AdminChrome::new(&state.site_title, "Posts", POSTS_INDEX_PATH);
            let view = AdminLayout::new(chrome, build_post_list_view(items));
            render_template_response(AdminPostsTemplate { view }, StatusCode::OK)
        }
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}

pub(crate) async fn admin_post_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    const SOURCE: &str = "postdesk::http::admin_post_edit";

    let editor = match open_editor(&state, &id, SOURCE).await {
        Ok(editor) => editor,
        Err(response) => return response,
    };

    render_editor(&state, &editor, StatusCode::OK)
}

pub(crate) async fn admin_post_update(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    const SOURCE: &str = "postdesk::http::admin_post_update";

    let mut editor = match open_editor(&state, &id, SOURCE).await {
        Ok(editor) => editor,
        Err(response) => return response,
    };

    if let Err(err) = apply_submission(&mut multipart, &mut editor).await {
        return err.into_http(SOURCE).into_response();
    }

    match state.posts.submit(&mut editor).await {
        Ok(submitted) => Redirect::to(submitted.redirect_to).into_response(),
        Err(AdminPostError::Validation(errors)) => {
            let mut response = render_editor(&state, &editor, StatusCode::UNPROCESSABLE_ENTITY);
            ErrorReport::from_message(SOURCE, StatusCode::UNPROCESSABLE_ENTITY, errors.to_string())
                .attach(&mut response);
            response
        }
        Err(err) => admin_post_error(SOURCE, err).into_response(),
    }
}

async fn open_editor(
    state: &AdminState,
    raw_id: &str,
    source: &'static str,
) -> Result<PostEditor, Response> {
    let Ok(id) = Uuid::parse_str(raw_id) else {
        return Err(not_found_response(state, source, raw_id));
    };

    match state.posts.open_editor(id).await {
        Ok(editor) => Ok(editor),
        Err(AdminPostError::NotFound(_)) => Err(not_found_response(state, source, raw_id)),
        Err(err) => Err(admin_post_error(source, err).into_response()),
    }
}

fn render_editor(state: &AdminState, editor: &PostEditor, status: StatusCode) -> Response {
    let chrome = AdminChrome::new(&state.site_title, "Edit post", &editor_path(editor));
    let view = AdminLayout::new(chrome, build_post_editor_view(editor));
    render_template_response(AdminPostEditTemplate { view }, status)
}

fn not_found_response(state: &AdminState, source: &'static str, raw_id: &str) -> Response {
    let chrome = AdminChrome::new(&state.site_title, "Post not found", POSTS_INDEX_PATH);
    let content = AdminErrorView {
        heading: "Post not found".to_string(),
        message: "The post you are trying to edit does not exist.".to_string(),
        back_href: POSTS_INDEX_PATH.to_string(),
    };
    let view = AdminLayout::new(chrome, content);
    let mut response = render_template_response(AdminErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        source,
        StatusCode::NOT_FOUND,
        format!("post `{raw_id}` does not exist"),
    )
    .attach(&mut response);
    response
}
