use crate::{
    application::admin::posts::{MAX_IMAGE_KILOBYTES, POSTS_INDEX_PATH, PostEditor, PostListItem},
    domain::types::PostStatus,
    presentation::{
        admin::views::{
            AdminPostEditorView, AdminPostListView, AdminPostRowView, AdminSelectOption,
        },
        views::format_timestamp,
    },
};

const TITLE_HINT: &str = "Can not be changed the post title";
const ACCEPTED_IMAGE_TYPES: &str = ".jpg,.jpeg,.png,image/jpeg,image/png";

pub(super) fn build_post_editor_view(editor: &PostEditor) -> AdminPostEditorView {
    let form = editor.form();
    let lookups = editor.lookups();
    let errors = editor.errors();
    let error_for = |field: &str| errors.get(field).map(str::to_string);

    let category_options = lookups
        .categories
        .iter()
        .map(|category| {
            let value = category.id.to_string();
            AdminSelectOption {
                selected: value == form.category_id,
                label: category.name.clone(),
                value,
            }
        })
        .collect();

    let tag_options = lookups
        .tags
        .iter()
        .map(|tag| {
            let value = tag.id.to_string();
            AdminSelectOption {
                selected: form.tags.iter().any(|submitted| submitted.trim() == value),
                label: tag.name.clone(),
                value,
            }
        })
        .collect();

    let status_options = PostStatus::ALL
        .iter()
        .map(|status| AdminSelectOption {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            selected: form.status == status.as_str(),
        })
        .collect();

    AdminPostEditorView {
        heading: format!("Edit post: {}", form.title),
        form_action: editor_path(editor),
        cancel_href: POSTS_INDEX_PATH.to_string(),
        title: form.title.clone(),
        title_hint: TITLE_HINT,
        content: form.content.clone(),
        content_error: error_for("content"),
        category_options,
        category_error: error_for("category_id"),
        tag_options,
        tags_error: error_for("tags"),
        status_options,
        status_error: error_for("status"),
        image_preview: form
            .existing_image
            .as_deref()
            .map(|path| format!("/storage/{path}")),
        image_error: error_for("image"),
        max_image_kilobytes: MAX_IMAGE_KILOBYTES,
        accepted_image_types: ACCEPTED_IMAGE_TYPES,
    }
}

pub(super) fn editor_path(editor: &PostEditor) -> String {
    format!("/posts/{}/edit", editor.post_id())
}

pub(super) fn build_post_list_view(items: Vec<PostListItem>) -> AdminPostListView {
    let posts = items
        .into_iter()
        .map(|item| {
            let post = item.post;
            AdminPostRowView {
                edit_href: format!("/posts/{}/edit", post.id),
                status_label: post.status.label(),
                status_badge: match post.status {
                    PostStatus::Published => "success",
                    PostStatus::Draft => "secondary",
                },
                category: item.category_name.unwrap_or_else(|| "Uncategorized".to_string()),
                updated_at: format_timestamp(post.updated_at),
                has_image: post.image.is_some(),
                title: post.title,
            }
        })
        .collect();

    AdminPostListView {
        heading: "Posts".to_string(),
        posts,
        empty_message: "No posts yet.".to_string(),
    }
}
