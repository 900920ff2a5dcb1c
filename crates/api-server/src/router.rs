//! API router — mounts all endpoints under /api/v1.

use crate::auth;
use crate::handlers::{self, ApiState};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router with all endpoints and middleware.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(handlers::handle_login))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route(
            "/api/v1/campaigns/{id}",
            get(handlers::get_campaign)
                .put(handlers::update_campaign)
                .delete(handlers::delete_campaign),
        )
        .route("/api/v1/campaigns/{id}/send", post(handlers::send_campaign))
        .route("/api/v1/campaigns/{id}/cancel", post(handlers::cancel_campaign))
        .route("/api/v1/campaigns/{id}/stats", get(handlers::campaign_stats))
        .route("/api/v1/campaigns/{id}/recipients", get(handlers::campaign_recipients))
        .route("/api/v1/campaigns/{id}/events", get(handlers::campaign_events))
        // Customers
        .route("/api/v1/customers", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/api/v1/customers/{id}",
            get(handlers::get_customer).delete(handlers::delete_customer),
        )
        // Tracking beacons (unauthenticated)
        .route(
            "/api/v1/tracking/open/{campaign_id}/{recipient_id}",
            get(handlers::track_open),
        )
        .route(
            "/api/v1/tracking/click/{campaign_id}/{recipient_id}",
            get(handlers::track_click),
        )
        // Operational
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness))
        .route("/live", get(handlers::liveness))
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
