//! Route table.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::view_client)
                .put(handlers::update_client)
                .patch(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
