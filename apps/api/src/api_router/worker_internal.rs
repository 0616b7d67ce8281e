use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::post;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_worker_internal_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/internal/worker/scheduled-jobs/claim",
            post(handlers::worker::claim_scheduled_jobs_handler),
        )
        .route(
            "/api/internal/worker/compliance-logs",
            post(handlers::worker::record_worker_compliance_log_handler),
        )
        .route_layer(from_fn_with_state(
            app_state,
            middleware::require_worker_auth,
        ))
}
