//! HTTP API server for student enrollment records.
//!
//! Each endpoint maps onto exactly one command or query of the domain
//! crate, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::{DispatchError, Messages};
use metrics_exporter_prometheus::PrometheusHandle;
use student_store::{Database, InMemoryDatabase};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::students::AppState;

/// Course catalog seeded into the in-memory database, as `(name, credits)`.
pub const DEFAULT_COURSES: [(&str, i32); 6] = [
    ("Calculus", 3),
    ("Chemistry", 3),
    ("Composition", 3),
    ("Literature", 4),
    ("Trigonometry", 4),
    ("Microeconomics", 3),
];

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/api/students",
            get(routes::students::list).post(routes::students::register),
        )
        .route(
            "/api/students/{id}",
            put(routes::students::edit_personal_info).delete(routes::students::unregister),
        )
        .route(
            "/api/students/{id}/enrollments",
            post(routes::students::enroll),
        )
        .route(
            "/api/students/{id}/enrollments/{number}",
            put(routes::students::transfer),
        )
        .route(
            "/api/students/{id}/enrollments/{number}/deletion",
            post(routes::students::disenroll),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state whose handlers all share `db`.
///
/// # Errors
///
/// Returns a [`DispatchError`] if the dispatcher is missing a handler.
pub fn create_state<D: Database + Clone + 'static>(db: D) -> Result<Arc<AppState>, DispatchError> {
    let messages = Messages::for_students(db)?;
    Ok(Arc::new(AppState { messages }))
}

/// Creates application state over an in-memory database seeded with
/// [`DEFAULT_COURSES`].
pub async fn create_default_state() -> Result<(Arc<AppState>, InMemoryDatabase), DispatchError> {
    let db = InMemoryDatabase::with_courses(DEFAULT_COURSES).await;
    let state = create_state(db.clone())?;
    Ok((state, db))
}
