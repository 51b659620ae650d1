use super::{Datastore, NewPost, NewUser, Post, User, UserField};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

/// Process-local store used when no DSN is configured, and by tests.
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    posts: RwLock<Vec<Post>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            posts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn find_user_by(&self, field: UserField, value: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .rev()
            .find(|user| match field {
                UserField::Username => user.username == value,
                UserField::Email => user.email.as_deref() == Some(value),
            })
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let user = User {
            id: self.next_id(),
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            created: Utc::now(),
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let post = Post {
            id: self.next_id(),
            subject: post.subject,
            content: post.content,
            parent: post.parent,
            created: Utc::now(),
        };
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn list_posts(&self, parent: &str, limit: Option<usize>) -> Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let mut matching: Vec<Post> = posts
            .iter()
            .filter(|post| post.parent.as_deref() == Some(parent))
            .cloned()
            .collect();
        // Ids break ties between posts created within the same clock tick.
        matching.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }
}
