use super::{AppState, Pages, STORE_ERROR};
use crate::gazette::{
    render::Template,
    storage::{NewPost, BLOG_KEY},
    validate::parse_digits,
};
use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub const FRONT_PAGE_LIMIT: usize = 10;

const MISSING_FIELDS: &str = "You need to include both a subject and content.";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PostForm {
    subject: String,
    content: String,
}

// axum handler for GET /
pub async fn front(Extension(state): Extension<Arc<AppState>>) -> Response {
    match state.store().list_posts(BLOG_KEY, Some(FRONT_PAGE_LIMIT)).await {
        Ok(posts) => state.render(Template::Front, &json!({ "posts": posts })),
        Err(e) => {
            error!("Error listing posts: {:?}", e);
            state.render_with_status(StatusCode::INTERNAL_SERVER_ERROR, Template::Error, &json!({}))
        }
    }
}

// axum handler for GET /newpost
pub async fn newpost_form(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.render(Template::NewPost, &json!({}))
}

// axum handler for POST /newpost
#[instrument(skip(state))]
pub async fn newpost_submit(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<PostForm>,
) -> Response {
    let error = if form.subject.trim().is_empty() || form.content.trim().is_empty() {
        MISSING_FIELDS
    } else {
        let post = NewPost {
            subject: form.subject.clone(),
            content: form.content.clone(),
            parent: Some(BLOG_KEY.to_string()),
        };

        match state.store().create_post(post).await {
            Ok(post) => {
                info!("Created post {}", post.id);
                return state.redirect(&format!("/post/{}", post.id));
            }
            Err(e) => {
                error!("Error inserting post: {:?}", e);
                STORE_ERROR
            }
        }
    };

    state.render(
        Template::NewPost,
        &json!({
            "subject": form.subject,
            "content": form.content,
            "error": error,
        }),
    )
}

// axum handler for GET /post/:id
pub async fn permalink(Extension(state): Extension<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let not_found = || state.render_with_status(StatusCode::NOT_FOUND, Template::NotFound, &json!({}));

    let Some(id) = parse_digits(&id).and_then(|id| i64::try_from(id).ok()) else {
        return not_found();
    };

    match state.store().get_post(id).await {
        Ok(Some(post)) => state.render(Template::Permalink, &json!({ "post": post })),
        Ok(None) => not_found(),
        Err(e) => {
            error!("Error fetching post {}: {:?}", id, e);
            state.render_with_status(StatusCode::INTERNAL_SERVER_ERROR, Template::Error, &json!({}))
        }
    }
}
