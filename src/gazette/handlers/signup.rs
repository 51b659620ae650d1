use super::{redirect_with_cookie, AppState, Pages, STORE_ERROR};
use crate::gazette::{
    render::Template,
    session::credential::hash_credential,
    storage::{Datastore, NewUser, UserField},
    validate::signup_errors,
};
use anyhow::Result;
use axum::{
    extract::{Extension, Form},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SignupForm {
    username: String,
    password: String,
    verify: String,
    email: String,
}

impl std::fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// axum handler for GET /signup
pub async fn signup_form(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    if state.session().session(&headers).is_authenticated() {
        return state.redirect("/welcome");
    }

    state.render(Template::Signup, &json!({}))
}

// axum handler for POST /signup
#[instrument(skip(state, headers))]
pub async fn signup_submit(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SignupForm>,
) -> Response {
    if state.session().session(&headers).is_authenticated() {
        return state.redirect("/welcome");
    }

    let mut errors = signup_errors(&form.username, &form.password, &form.verify, &form.email);

    if errors.is_empty() {
        match duplicate_errors(state.store(), &form.username, &form.email).await {
            Ok(duplicates) => errors.extend(duplicates),
            Err(e) => {
                error!("Error checking for existing user: {:?}", e);
                errors.push(STORE_ERROR);
            }
        }
    }

    if errors.is_empty() {
        let new_user = NewUser {
            username: form.username.clone(),
            password_hash: hash_credential(&form.password),
            email: (!form.email.is_empty()).then(|| form.email.clone()),
        };

        match state.store().create_user(new_user).await {
            Ok(user) => {
                info!("User {} signed up", user.username);
                let cookie = state.session().session_cookie(&user.username);
                return redirect_with_cookie(&state, "/welcome", cookie);
            }
            Err(e) => {
                error!("Error inserting user: {:?}", e);
                errors.push(STORE_ERROR);
            }
        }
    }

    state.render(
        Template::Signup,
        &json!({
            "username": form.username,
            "email": form.email,
            "error": errors.join(" "),
        }),
    )
}

/// Two independent lookups: the store is not assumed to support OR queries.
async fn duplicate_errors(
    store: &dyn Datastore,
    username: &str,
    email: &str,
) -> Result<Vec<&'static str>> {
    let mut errors = Vec::new();

    if store
        .find_user_by(UserField::Username, username)
        .await?
        .is_some()
    {
        errors.push("User ID already exists.");
    }

    if !email.is_empty() && store.find_user_by(UserField::Email, email).await?.is_some() {
        errors.push("Email already registered.");
    }

    Ok(errors)
}
