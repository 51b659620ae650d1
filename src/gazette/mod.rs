pub mod handlers;
pub mod render;
pub mod session;
pub mod storage;
pub mod validate;

use crate::gazette::{
    handlers::AppState,
    render::HtmlRenderer,
    session::SessionConfig,
    storage::{Datastore, MemoryStore, PgStore},
};
use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, warn, Span};
use ulid::Ulid;

/// Build the application router around `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::front))
        .route(
            "/newpost",
            get(handlers::newpost_form).post(handlers::newpost_submit),
        )
        .route("/post/:id", get(handlers::permalink))
        .route(
            "/signup",
            get(handlers::signup_form).post(handlers::signup_submit),
        )
        .route("/login", get(handlers::login_form).post(handlers::login_submit))
        .route("/logout", get(handlers::logout))
        .route("/welcome", get(handlers::welcome))
        .route(
            "/birthday",
            get(handlers::birthday_form).post(handlers::birthday_submit),
        )
        .route("/thanks", get(handlers::thanks))
        .route("/health", get(handlers::health).options(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server.
///
/// # Errors
/// Returns an error if the database is unreachable or the server fails to start
pub async fn new(port: u16, dsn: Option<String>, session: SessionConfig) -> Result<()> {
    let store: Arc<dyn Datastore> = if let Some(dsn) = dsn {
        Arc::new(PgStore::connect(&dsn).await?)
    } else {
        warn!("No DSN configured, using in-memory store; data is lost on restart");
        Arc::new(MemoryStore::new())
    };

    let state = Arc::new(AppState::new(store, Arc::new(HtmlRenderer), session));

    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let method = request.method();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    // Headers are left out: they carry the session cookie.
    debug_span!("http-request", %method, path, request_id)
}
