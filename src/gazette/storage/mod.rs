//! Datastore abstraction for users and posts.
//!
//! Lookups are parameterized: callers pick a field from a closed enum and pass
//! the value separately, so no user input ever becomes part of a query string.

mod memory;
mod postgres;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Grouping key for posts authored through `/newpost`.
pub const BLOG_KEY: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub created: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: i64,
    pub subject: String,
    pub content: String,
    pub parent: Option<String>,
    pub created: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewPost {
    pub subject: String,
    pub content: String,
    pub parent: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserField {
    Username,
    Email,
}

impl UserField {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

#[async_trait]
pub trait Datastore: Send + Sync {
    /// Exact-match lookup; returns the newest matching user, if any.
    async fn find_user_by(&self, field: UserField, value: &str) -> Result<Option<User>>;

    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn create_post(&self, post: NewPost) -> Result<Post>;

    async fn get_post(&self, id: i64) -> Result<Option<Post>>;

    /// Posts under `parent`, newest first, at most `limit` when given.
    async fn list_posts(&self, parent: &str, limit: Option<usize>) -> Result<Vec<Post>>;
}
