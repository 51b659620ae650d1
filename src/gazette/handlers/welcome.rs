use super::{AppState, Pages};
use crate::gazette::{render::Template, session::Session};
use axum::{extract::Extension, http::HeaderMap, response::Response};
use serde_json::json;
use std::sync::Arc;

// axum handler for GET /welcome
pub async fn welcome(Extension(state): Extension<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.session().session(&headers) {
        Session::Authenticated { username } => {
            state.render(Template::Welcome, &json!({ "username": username }))
        }
        Session::Anonymous => state.redirect("/signup"),
    }
}
