//! In-memory collaborators for driving the admin router without Postgres.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use postdesk::application::admin::posts::AdminPostService;
use postdesk::application::repos::{
    CategoriesRepo, PostsRepo, PostsWriteRepo, RepoError, TagsRepo, UpdatePostParams,
};
use postdesk::application::storage::MediaStorage;
use postdesk::domain::entities::{CategoryRecord, PostRecord, TagRecord};
use postdesk::domain::types::PostStatus;
use postdesk::infra::http::{AdminState, build_admin_router};
use postdesk::infra::uploads::UploadStorage;
use time::OffsetDateTime;
use uuid::Uuid;

pub const PNG_1X1: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R',
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00,
];

pub const BOUNDARY: &str = "postdesk-test-boundary";

#[derive(Default)]
pub struct InMemoryState {
    pub posts: BTreeMap<Uuid, PostRecord>,
    pub post_tags: BTreeMap<Uuid, BTreeSet<Uuid>>,
    pub categories: Vec<CategoryRecord>,
    pub tags: Vec<TagRecord>,
    pub updates: usize,
}

#[derive(Default)]
pub struct InMemoryRepos {
    pub state: Mutex<InMemoryState>,
}

#[async_trait]
impl PostsRepo for InMemoryRepos {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.state.lock().unwrap().posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        Ok(self.state.lock().unwrap().posts.values().cloned().collect())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryRepos {
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state.lock().unwrap();
        let post = state.posts.get_mut(&params.id).ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.slug = params.slug;
        post.content = params.content;
        post.category_id = params.category_id;
        post.status = params.status;
        post.image = params.image;
        post.updated_at = OffsetDateTime::now_utc();
        let updated = post.clone();
        state
            .post_tags
            .insert(params.id, params.tag_ids.into_iter().collect());
        state.updates += 1;
        Ok(updated)
    }
}

#[async_trait]
impl CategoriesRepo for InMemoryRepos {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, RepoError> {
        Ok(self.state.lock().unwrap().categories.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl TagsRepo for InMemoryRepos {
    async fn list_all(&self) -> Result<Vec<TagRecord>, RepoError> {
        Ok(self.state.lock().unwrap().tags.clone())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<TagRecord>, RepoError> {
        let state = self.state.lock().unwrap();
        let linked = state.post_tags.get(&post_id).cloned().unwrap_or_default();
        Ok(state
            .tags
            .iter()
            .filter(|tag| linked.contains(&tag.id))
            .cloned()
            .collect())
    }

    async fn find_existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tags
            .iter()
            .map(|tag| tag.id)
            .filter(|id| ids.contains(id))
            .collect())
    }
}

pub struct TestApp {
    pub router: axum::Router,
    pub repos: Arc<InMemoryRepos>,
    pub storage_root: PathBuf,
    pub old_image: String,
    pub post_id: Uuid,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage_root = dir.path().join("storage");
        let storage = UploadStorage::new(storage_root.clone()).expect("storage");
        let old_image = storage
            .store_bytes("posts", "old.png", Bytes::from_static(PNG_1X1))
            .await
            .expect("seed image");

        let repos = Arc::new(InMemoryRepos::default());
        let post_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let tag_ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let now = OffsetDateTime::now_utc();

        {
            let mut state = repos.state.lock().unwrap();
            state.categories = vec![
                CategoryRecord {
                    id: category_id,
                    name: "Engineering".to_string(),
                },
                CategoryRecord {
                    id: Uuid::new_v4(),
                    name: "Travel".to_string(),
                },
            ];
            state.tags = tag_ids
                .iter()
                .enumerate()
                .map(|(index, id)| TagRecord {
                    id: *id,
                    name: format!("tag-{}", index + 1),
                })
                .collect();
            state.posts.insert(
                post_id,
                PostRecord {
                    id: post_id,
                    title: "Hello <World>".to_string(),
                    slug: "hello-world".to_string(),
                    content: "Original body".to_string(),
                    category_id,
                    status: PostStatus::Draft,
                    image: Some(old_image.clone()),
                    created_at: now,
                    updated_at: now,
                },
            );
            state
                .post_tags
                .insert(post_id, tag_ids[..3].iter().copied().collect());
        }

        let media: Arc<dyn MediaStorage> = Arc::new(storage);
        let service = AdminPostService::new(
            repos.clone(),
            repos.clone(),
            repos.clone(),
            repos.clone(),
            media.clone(),
        );
        let state = AdminState {
            posts: Arc::new(service),
            media,
            site_title: Arc::from("postdesk"),
        };

        Self {
            router: build_admin_router(state, 4 * 1024 * 1024),
            repos,
            storage_root,
            old_image,
            post_id,
            category_id,
            tag_ids,
            _dir: dir,
        }
    }

    pub fn edit_path(&self) -> String {
        format!("/posts/{}/edit", self.post_id)
    }

    pub fn post(&self) -> PostRecord {
        self.repos.state.lock().unwrap().posts[&self.post_id].clone()
    }

    pub fn tag_set(&self) -> BTreeSet<Uuid> {
        self.repos.state.lock().unwrap().post_tags[&self.post_id].clone()
    }

    pub fn updates(&self) -> usize {
        self.repos.state.lock().unwrap().updates
    }
}

/// Builds a `multipart/form-data` body delimited by [`BOUNDARY`].
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}
