use super::{AppState, Pages};
use crate::gazette::{
    render::Template,
    validate::{valid_day, valid_month, valid_year},
};
use axum::{
    extract::{Extension, Form},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

const INVALID_DATE: &str = "That doesn't look valid to me, friend.";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct BirthdayForm {
    month: String,
    day: String,
    year: String,
}

impl BirthdayForm {
    fn is_valid(&self) -> bool {
        valid_month(&self.month).is_some()
            && valid_day(&self.day).is_some()
            && valid_year(&self.year).is_some()
    }
}

// axum handler for GET /birthday
pub async fn birthday_form(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.render(Template::Birthday, &json!({}))
}

// axum handler for POST /birthday
pub async fn birthday_submit(
    Extension(state): Extension<Arc<AppState>>,
    Form(form): Form<BirthdayForm>,
) -> Response {
    if form.is_valid() {
        return state.redirect("/thanks");
    }

    debug!("Rejected birthday {:?}", form);

    state.render(
        Template::Birthday,
        &json!({
            "month": form.month,
            "day": form.day,
            "year": form.year,
            "error": INVALID_DATE,
        }),
    )
}

// axum handler for GET /thanks
pub async fn thanks(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.render(Template::Thanks, &json!({}))
}
