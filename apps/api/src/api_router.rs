use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use switchboard_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;
mod worker_internal;

pub fn build_router(app_state: AppState) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(app_state.frontend_url.as_str())?;

    let dashboard_routes = Router::new()
        .route(
            "/api/devices",
            get(handlers::devices::list_devices_handler)
                .post(handlers::devices::create_device_handler),
        )
        .route(
            "/api/devices/reachability",
            post(handlers::devices::check_all_reachability_handler),
        )
        .route(
            "/api/devices/{device_id}",
            get(handlers::devices::get_device_handler)
                .put(handlers::devices::update_device_handler)
                .delete(handlers::devices::delete_device_handler),
        )
        .route(
            "/api/devices/{device_id}/reachability",
            post(handlers::devices::check_device_reachability_handler),
        )
        .route(
            "/api/jobs",
            get(handlers::jobs::list_jobs_handler).post(handlers::jobs::create_job_handler),
        )
        .route(
            "/api/jobs/{job_id}",
            get(handlers::jobs::get_job_handler)
                .put(handlers::jobs::update_job_handler)
                .delete(handlers::jobs::delete_job_handler),
        )
        .route(
            "/api/compliance/logs",
            get(handlers::compliance::list_compliance_logs_handler)
                .post(handlers::compliance::append_compliance_log_handler),
        )
        .route(
            "/api/compliance/runs",
            post(handlers::compliance::run_compliance_handler),
        )
        .route(
            "/api/scheduled-jobs",
            get(handlers::schedules::list_scheduled_jobs_handler)
                .post(handlers::schedules::create_scheduled_job_handler),
        )
        .route(
            "/api/scheduled-jobs/{scheduled_job_id}",
            delete(handlers::schedules::cancel_scheduled_job_handler),
        )
        .route(
            "/api/master-password",
            get(handlers::master_password::master_password_status_handler)
                .put(handlers::master_password::set_master_password_handler),
        )
        .route(
            "/api/master-password/verify",
            post(handlers::master_password::verify_master_password_handler),
        )
        .route(
            "/api/components/suggest-name",
            post(handlers::components::suggest_component_name_handler),
        )
        .route("/api/data", delete(handlers::data::clear_data_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(dashboard_routes)
        .merge(worker_internal::build_worker_internal_routes(
            app_state.clone(),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
