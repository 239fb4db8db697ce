pub mod health;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};

use crate::auth::authenticate;
use crate::resumes::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let resumes = Router::new()
        .route(
            "/api/v1/resumes",
            get(handlers::handle_list_resumes).post(handlers::handle_create_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume)
                .put(handlers::handle_update_resume)
                .delete(handlers::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/status",
            patch(handlers::handle_update_status),
        )
        .route(
            "/api/v1/resumes/:id/logs",
            get(handlers::handle_list_status_logs),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(resumes)
        .with_state(state)
}
