mod support;

use axum::{
    body::Body,
    http::{
        Request, StatusCode,
        header::{CONTENT_TYPE, LOCATION},
    },
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use postdesk::domain::types::PostStatus;
use support::{BOUNDARY, MultipartBody, PNG_1X1, TestApp};

async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router response")
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_multipart(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

fn valid_form(app: &TestApp) -> MultipartBody {
    MultipartBody::default()
        .text("content", "<p>Updated body</p>")
        .text("category_id", &app.category_id.to_string())
        .text("tags", &app.tag_ids[1].to_string())
        .text("tags", &app.tag_ids[3].to_string())
        .text("status", "published")
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let app = TestApp::new().await;
    let response = send(&app, get(&app.edit_path())).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert!(html.contains("Hello &lt;World&gt;"), "title is escaped");
    assert!(html.contains("Can not be changed the post title"));
    assert!(html.contains("Original body"));
    assert!(html.contains(&format!(
        "<option value=\"{}\" selected>Engineering</option>",
        app.category_id
    )));
    for tag in &app.tag_ids[..3] {
        assert!(html.contains(&format!("<option value=\"{tag}\" selected>")));
    }
    assert!(html.contains(&format!(
        "<option value=\"{}\">tag-4</option>",
        app.tag_ids[3]
    )));
    assert!(html.contains("<option value=\"draft\" selected>Draft</option>"));
    assert!(html.contains(&format!("src=\"/storage/{}\"", app.old_image)));
    assert!(html.contains("summernote"));
    assert!(html.contains("select2"));
}

#[tokio::test]
async fn invalid_status_rerenders_with_422_and_no_redirect() {
    let app = TestApp::new().await;
    let body = MultipartBody::default()
        .text("content", "Edited but rejected")
        .text("category_id", &app.category_id.to_string())
        .text("tags", &app.tag_ids[0].to_string())
        .text("status", "archived")
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.headers().get(LOCATION).is_none());
    let html = body_text(response).await;
    assert!(html.contains("The selected status is invalid."));
    assert!(html.contains("Edited but rejected"), "submitted value kept");

    assert_eq!(app.updates(), 0);
    assert_eq!(app.post().content, "Original body");
}

#[tokio::test]
async fn missing_fields_report_every_violation() {
    let app = TestApp::new().await;
    let body = MultipartBody::default()
        .text("content", "")
        .text("category_id", "")
        .text("status", "")
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("The content field is required."));
    assert!(html.contains("The category id field is required."));
    assert!(html.contains("The tags field is required."));
    assert!(html.contains("The status field is required."));
    assert_eq!(app.updates(), 0);
}

#[tokio::test]
async fn valid_submission_updates_post_and_redirects_to_listing() {
    let app = TestApp::new().await;
    let body = valid_form(&app).finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/posts");

    let post = app.post();
    assert_eq!(post.content, "<p>Updated body</p>");
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.title, "Hello <World>");
    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.image.as_deref(), Some(app.old_image.as_str()));
    assert!(app.storage_root.join(&app.old_image).is_file());
    assert_eq!(
        app.tag_set(),
        [app.tag_ids[1], app.tag_ids[3]].into_iter().collect()
    );
    assert_eq!(app.updates(), 1);
}

#[tokio::test]
async fn new_image_replaces_and_removes_old_file() {
    let app = TestApp::new().await;
    let body = valid_form(&app)
        .file("image", "cover.png", "image/png", PNG_1X1)
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let image = app.post().image.expect("image path");
    assert_ne!(image, app.old_image);
    assert!(image.starts_with("posts/"));
    assert!(image.ends_with("-cover.png"));
    assert!(app.storage_root.join(&image).is_file());
    assert!(!app.storage_root.join(&app.old_image).exists());

    let preview = send(&app, get(&format!("/storage/{image}"))).await;
    assert_eq!(preview.status(), StatusCode::OK);
    assert_eq!(preview.headers().get(CONTENT_TYPE).unwrap(), "image/png");
}

#[tokio::test]
async fn image_is_served_by_its_content_not_its_client_name() {
    let app = TestApp::new().await;
    let mut data = PNG_1X1.to_vec();
    data.extend_from_slice(b"<script>alert(1)</script>");
    let body = valid_form(&app)
        .file("image", "cover.html", "text/html", &data)
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let image = app.post().image.expect("image path");
    assert!(image.ends_with("-cover.png"), "stored as {image}");

    let served = send(&app, get(&format!("/storage/{image}"))).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.headers().get(CONTENT_TYPE).unwrap(), "image/png");
}

#[tokio::test]
async fn empty_file_part_keeps_current_image() {
    let app = TestApp::new().await;
    let body = valid_form(&app)
        .file("image", "", "application/octet-stream", b"")
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.post().image.as_deref(), Some(app.old_image.as_str()));
    assert!(app.storage_root.join(&app.old_image).is_file());
}

#[tokio::test]
async fn rejected_upload_leaves_storage_untouched() {
    let app = TestApp::new().await;
    let body = valid_form(&app)
        .file("image", "notes.png", "image/png", b"definitely not an image")
        .finish();

    let response = send(&app, post_multipart(&app.edit_path(), body)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("The image field must be an image."));

    let stored: Vec<_> = std::fs::read_dir(app.storage_root.join("posts"))
        .expect("posts dir")
        .collect();
    assert_eq!(stored.len(), 1, "only the seeded image remains");
    assert_eq!(app.updates(), 0);
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let app = TestApp::new().await;

    let response = send(&app, get(&format!("/posts/{}/edit", Uuid::new_v4()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Post not found"));

    let response = send(&app, get("/posts/not-a-uuid/edit")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = valid_form(&app).finish();
    let uri = format!("/posts/{}/edit", Uuid::new_v4());
    let response = send(&app, post_multipart(&uri, body)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.updates(), 0);
}

#[tokio::test]
async fn listing_and_root_redirect() {
    let app = TestApp::new().await;

    let response = send(&app, get("/")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/posts");

    let response = send(&app, get("/posts")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Hello &lt;World&gt;"));
    assert!(html.contains("Engineering"));
    assert!(html.contains(&app.edit_path()));
}

#[tokio::test]
async fn storage_route_hides_missing_files() {
    let app = TestApp::new().await;
    let response = send(&app, get("/storage/posts/missing.png")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
