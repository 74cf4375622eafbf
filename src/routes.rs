use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, health, operations};
use crate::AppState;

/// Every route the service exposes, with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/operacoes",
            get(operations::list_operations).post(operations::create_operation),
        )
        .route("/operacoes/{id}/aprovar", put(operations::approve_operation))
        .route("/operacoes/{id}/processar", put(operations::process_operation))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(TraceLayer::new_for_http())
        // The dashboard is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
