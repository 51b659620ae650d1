use super::{redirect_with_cookie, AppState};
use axum::{extract::Extension, response::Response};
use std::sync::Arc;

// axum handler for GET /logout
pub async fn logout(Extension(state): Extension<Arc<AppState>>) -> Response {
    let cookie = state.session().clear_session_cookie();
    redirect_with_cookie(&state, "/signup", cookie)
}
