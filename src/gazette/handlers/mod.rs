pub mod birthday;
pub use self::birthday::{birthday_form, birthday_submit, thanks};

pub mod blog;
pub use self::blog::{front, newpost_form, newpost_submit, permalink};

pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::{login_form, login_submit};

pub mod logout;
pub use self::logout::logout;

pub mod signup;
pub use self::signup::{signup_form, signup_submit};

pub mod welcome;
pub use self::welcome::welcome;

// common state and responses for the handlers
use crate::gazette::{
    render::{Renderer, Template},
    session::SessionConfig,
    storage::Datastore,
};
use axum::{
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Appended to form errors when the datastore fails mid-request.
pub const STORE_ERROR: &str = "Something went wrong, please try again.";

/// Everything a handler needs, built once at startup.
pub struct AppState {
    store: Arc<dyn Datastore>,
    renderer: Arc<dyn Renderer>,
    session: SessionConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn Datastore>,
        renderer: Arc<dyn Renderer>,
        session: SessionConfig,
    ) -> Self {
        Self {
            store,
            renderer,
            session,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn Datastore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Page responses shared by every route.
pub trait Pages {
    fn render_with_status(&self, status: StatusCode, template: Template, values: &Value)
        -> Response;

    fn render(&self, template: Template, values: &Value) -> Response {
        self.render_with_status(StatusCode::OK, template, values)
    }

    fn redirect(&self, path: &str) -> Response;
}

impl Pages for AppState {
    fn render_with_status(
        &self,
        status: StatusCode,
        template: Template,
        values: &Value,
    ) -> Response {
        match self.renderer.render(template, values) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("Failed to render {}: {}", template.name(), e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    fn redirect(&self, path: &str) -> Response {
        Redirect::to(path).into_response()
    }
}

/// Redirect to `path`, attaching `cookie` as `Set-Cookie`.
fn redirect_with_cookie(
    state: &AppState,
    path: &str,
    cookie: Result<HeaderValue, axum::http::header::InvalidHeaderValue>,
) -> Response {
    match cookie {
        Ok(cookie) => {
            let mut response = state.redirect(path);
            response.headers_mut().insert(SET_COOKIE, cookie);
            response
        }
        Err(e) => {
            error!("Failed to build session cookie: {}", e);
            state.render_with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                Template::Error,
                &Value::Object(serde_json::Map::new()),
            )
        }
    }
}
