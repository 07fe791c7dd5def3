use askama::Template;

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand: String,
    pub page_title: String,
    pub navigation: Vec<AdminNavigationItemView>,
}

impl AdminChrome {
    pub fn new(brand: &str, page_title: impl Into<String>, active_path: &str) -> Self {
        let navigation = [("Posts", "/posts")]
            .into_iter()
            .map(|(label, href)| AdminNavigationItemView {
                label: label.to_string(),
                href: href.to_string(),
                is_active: active_path.starts_with(href),
            })
            .collect();

        Self {
            brand: brand.to_string(),
            page_title: page_title.into(),
            navigation,
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: env!("CARGO_PKG_VERSION").to_string(),
            content,
        }
    }
}

/// An `<option>` in one of the editor's selects.
#[derive(Clone)]
pub struct AdminSelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone)]
pub struct AdminPostEditorView {
    pub heading: String,
    pub form_action: String,
    pub cancel_href: String,
    pub title: String,
    pub title_hint: &'static str,
    pub content: String,
    pub content_error: Option<String>,
    pub category_options: Vec<AdminSelectOption>,
    pub category_error: Option<String>,
    pub tag_options: Vec<AdminSelectOption>,
    pub tags_error: Option<String>,
    pub status_options: Vec<AdminSelectOption>,
    pub status_error: Option<String>,
    /// `src` of the currently stored image, if any.
    pub image_preview: Option<String>,
    pub image_error: Option<String>,
    pub max_image_kilobytes: u64,
    pub accepted_image_types: &'static str,
}

impl AdminPostEditorView {
    pub fn has_errors(&self) -> bool {
        self.content_error.is_some()
            || self.category_error.is_some()
            || self.tags_error.is_some()
            || self.status_error.is_some()
            || self.image_error.is_some()
    }

    pub fn category_unselected(&self) -> bool {
        !self.category_options.iter().any(|option| option.selected)
    }
}

#[derive(Template)]
#[template(path = "admin/post_edit.html")]
pub struct AdminPostEditTemplate {
    pub view: AdminLayout<AdminPostEditorView>,
}

#[derive(Clone)]
pub struct AdminPostRowView {
    pub title: String,
    pub status_label: &'static str,
    /// Bootstrap badge modifier for the status pill.
    pub status_badge: &'static str,
    pub category: String,
    pub updated_at: String,
    pub edit_href: String,
    pub has_image: bool,
}

#[derive(Clone)]
pub struct AdminPostListView {
    pub heading: String,
    pub posts: Vec<AdminPostRowView>,
    pub empty_message: String,
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: AdminLayout<AdminPostListView>,
}

#[derive(Clone)]
pub struct AdminErrorView {
    pub heading: String,
    pub message: String,
    pub back_href: String,
}

#[derive(Template)]
#[template(path = "admin/error.html")]
pub struct AdminErrorTemplate {
    pub view: AdminLayout<AdminErrorView>,
}
