use super::{Datastore, NewPost, NewUser, Post, User, UserField};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};
use std::time::Duration;
use tracing::{debug, instrument};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

const USER_COLUMNS: &str = "id, username, password_hash, email, created";
const POST_COLUMNS: &str = "id, subject, content, parent, created";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect a small pool and make sure the schema exists.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable or the schema fails to apply.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.apply_schema().await?;
        Ok(store)
    }

    /// Run `sql/schema.sql`; every statement is idempotent.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub async fn apply_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }

        debug!("schema applied");

        Ok(())
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        email: row.try_get("email")?,
        created: row.try_get("created")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        subject: row.try_get("subject")?,
        content: row.try_get("content")?,
        parent: row.try_get("parent")?,
        created: row.try_get("created")?,
    })
}

#[async_trait]
impl Datastore for PgStore {
    #[instrument(skip(self, value))]
    async fn find_user_by(&self, field: UserField, value: &str) -> Result<Option<User>> {
        // The column name comes from the enum, the value is always bound.
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = $1 ORDER BY created DESC LIMIT 1",
            field.column()
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to look up user by {}", field.column()))?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .context("Failed to decode user row")
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (username, password_hash, email) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert user")?;

        user_from_row(&row).context("Failed to decode user row")
    }

    #[instrument(skip(self, post))]
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let query = format!(
            "INSERT INTO posts (subject, content, parent) VALUES ($1, $2, $3) RETURNING {POST_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(&post.subject)
            .bind(&post.content)
            .bind(&post.parent)
            .fetch_one(&self.pool)
            .await
            .context("Failed to insert post")?;

        post_from_row(&row).context("Failed to decode post row")
    }

    #[instrument(skip(self))]
    async fn get_post(&self, id: i64) -> Result<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch post")?;

        row.as_ref()
            .map(post_from_row)
            .transpose()
            .context("Failed to decode post row")
    }

    #[instrument(skip(self))]
    async fn list_posts(&self, parent: &str, limit: Option<usize>) -> Result<Vec<Post>> {
        // LIMIT NULL means no limit.
        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE parent = $1 ORDER BY created DESC, id DESC LIMIT $2"
        );

        let rows = sqlx::query(&query)
            .bind(parent)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list posts")?;

        rows.iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode post row")
    }
}
