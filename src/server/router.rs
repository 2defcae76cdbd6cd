use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

use super::{config_entries, documents, macroprocesses, session, subprocesses, users};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Session routes
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/user", get(session::current_user))
        // Macroprocess routes
        .route("/macroprocesses", get(macroprocesses::list_macroprocesses))
        .route("/macroprocesses", post(macroprocesses::create_macroprocess))
        .route("/macroprocesses/{id}", get(macroprocesses::get_macroprocess))
        .route("/macroprocesses/{id}", put(macroprocesses::update_macroprocess))
        .route(
            "/macroprocesses/{id}",
            delete(macroprocesses::delete_macroprocess),
        )
        // Subprocess routes
        .route("/subprocesses", get(subprocesses::list_subprocesses))
        .route("/subprocesses", post(subprocesses::create_subprocess))
        .route("/subprocesses/{id}", get(subprocesses::get_subprocess))
        .route("/subprocesses/{id}", put(subprocesses::update_subprocess))
        .route("/subprocesses/{id}", delete(subprocesses::delete_subprocess))
        // Document routes
        .route("/documents", get(documents::list_documents))
        .route("/documents", post(documents::create_document))
        .route("/documents/{id}", get(documents::get_document))
        .route("/documents/{id}", put(documents::update_document))
        .route("/documents/{id}", delete(documents::delete_document))
        // Config routes
        .route("/config", post(config_entries::set_config))
        .route("/config/{key}", get(config_entries::get_config))
        // User management routes
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", put(users::update_user))
        .route("/users/{id}", delete(users::delete_user))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
