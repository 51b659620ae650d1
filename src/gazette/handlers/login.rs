use super::{redirect_with_cookie, AppState, Pages, STORE_ERROR};
use crate::gazette::{
    render::Template,
    session::credential::verify_credential,
    storage::UserField,
    validate::login_errors,
};
use axum::{
    extract::{Extension, Form},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginForm {
    username: String,
    password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

// axum handler for GET /login
pub async fn login_form(Extension(state): Extension<Arc<AppState>>, headers: HeaderMap) -> Response {
    if state.session().session(&headers).is_authenticated() {
        return state.redirect("/welcome");
    }

    state.render(Template::Login, &json!({}))
}

// axum handler for POST /login
#[instrument(skip(state, headers))]
pub async fn login_submit(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if state.session().session(&headers).is_authenticated() {
        return state.redirect("/welcome");
    }

    let mut errors = login_errors(&form.username, &form.password);

    if errors.is_empty() {
        match state
            .store()
            .find_user_by(UserField::Username, &form.username)
            .await
        {
            Ok(Some(user)) if verify_credential(&form.password, &user.password_hash) => {
                info!("User {} logged in", user.username);
                let cookie = state.session().session_cookie(&user.username);
                return redirect_with_cookie(&state, "/welcome", cookie);
            }
            Ok(Some(user)) => {
                warn!("Incorrect password for {}", user.username);
                errors.push("Incorrect password.");
            }
            Ok(None) => errors.push("Invalid login."),
            Err(e) => {
                error!("Error looking up user: {:?}", e);
                errors.push(STORE_ERROR);
            }
        }
    }

    state.render(
        Template::Login,
        &json!({
            "username": form.username,
            "error": errors.join(" "),
        }),
    )
}
