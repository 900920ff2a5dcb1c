//! Axum REST handlers.
//!
//! Tenancy note: every store read below goes through the claims'
//! `company_id`; there is no handler that can address another tenant's
//! rows.

use crate::auth::{self, Claims, SessionStore};
use crate::error::ApiError;
use crate::models::*;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use mailcast_core::beacon;
use mailcast_core::error::MailcastError;
use mailcast_core::types::{Campaign, CampaignUpdate, Customer, NewCampaign, NewCustomer, Recipient};
use mailcast_delivery::{Dispatcher, SendOutcome};
use mailcast_reporting::{CampaignAggregator, CampaignStats};
use mailcast_store::Store;
use mailcast_tracking::EngagementTracker;
use std::sync::Arc;
use uuid::Uuid;

/// Shared API state.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<Store>,
    pub dispatcher: Arc<Dispatcher>,
    pub tracker: Arc<EngagementTracker>,
    pub aggregator: Arc<CampaignAggregator>,
    pub sessions: Arc<SessionStore>,
}

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn handle_login(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.sessions.login(&state.store, &req) {
        Ok(resp) => Ok(Json(resp)),
        Err(msg) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "auth_failed".to_string(),
                message: msg,
            }),
        )),
    }
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

pub async fn list_campaigns(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
) -> Json<Vec<Campaign>> {
    Json(state.store.list_campaigns(claims.company_id))
}

pub async fn get_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    state
        .store
        .get_campaign(id, claims.company_id)
        .map(Json)
        .ok_or_else(|| MailcastError::not_found("campaign").into())
}

pub async fn create_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    auth::require_campaign_manager(&claims)?;
    let campaign = state
        .store
        .create_campaign(claims.company_id, claims.employee_id, req);
    metrics::counter!("api.campaigns.created").increment(1);
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<CampaignUpdate>,
) -> Result<Json<Campaign>, ApiError> {
    auth::require_campaign_manager(&claims)?;
    let campaign = state
        .store
        .update_campaign(id, claims.company_id, req, claims.employee_id)?;
    Ok(Json(campaign))
}

pub async fn delete_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth::require_campaign_manager(&claims)?;
    state
        .store
        .delete_campaign(id, claims.company_id, claims.employee_id)?;
    metrics::counter!("api.campaigns.deleted").increment(1);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendCampaignRequest>,
) -> Result<Json<SendCampaignResponse>, ApiError> {
    auth::require_campaign_manager(&claims)?;

    let outcome = state
        .dispatcher
        .send_campaign(
            id,
            claims.company_id,
            &req.recipient_ids,
            req.schedule_at,
            Some(claims.employee_id),
        )
        .await?;

    let response = match outcome {
        SendOutcome::Dispatched { report } => SendCampaignResponse {
            message: "Campaign sent successfully".to_string(),
            report: Some(report),
            scheduled_at: None,
        },
        SendOutcome::Scheduled { scheduled_at } => SendCampaignResponse {
            message: "Campaign scheduled successfully".to_string(),
            report: None,
            scheduled_at: Some(scheduled_at),
        },
    };
    Ok(Json(response))
}

pub async fn cancel_campaign(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError> {
    auth::require_campaign_manager(&claims)?;
    let campaign = state.store.cancel_schedule(id, claims.company_id)?;
    state.store.log_action(
        Some(claims.employee_id),
        "campaign_cancelled",
        format!("Cancelled scheduled campaign: {}", campaign.title),
    );
    Ok(Json(campaign))
}

pub async fn campaign_stats(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampaignStats>, ApiError> {
    let stats = state.aggregator.stats(id, claims.company_id)?;
    Ok(Json(stats))
}

pub async fn campaign_recipients(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Recipient>>, ApiError> {
    state
        .store
        .get_campaign(id, claims.company_id)
        .ok_or(MailcastError::not_found("campaign"))?;
    Ok(Json(state.store.recipients_for_campaign(id)))
}

pub async fn campaign_events(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let events = state
        .tracker
        .events(id, claims.company_id)
        .ok_or(MailcastError::not_found("campaign"))?;
    Ok(Json(serde_json::json!({
        "campaign_id": id,
        "events": events,
    })))
}

// ─── Customers ─────────────────────────────────────────────────────────────

pub async fn list_customers(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
) -> Json<Vec<Customer>> {
    Json(state.store.list_customers(claims.company_id))
}

pub async fn get_customer(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, ApiError> {
    state
        .store
        .get_customer(id, claims.company_id)
        .map(Json)
        .ok_or_else(|| MailcastError::not_found("customer").into())
}

pub async fn create_customer(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    auth::require_campaign_manager(&claims)?;
    let customer = state
        .store
        .create_customer(claims.company_id, req, claims.employee_id);
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn delete_customer(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth::require_campaign_manager(&claims)?;
    if state
        .store
        .delete_customer(id, claims.company_id, claims.employee_id)
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MailcastError::not_found("customer").into())
    }
}

// ─── Tracking beacons (unauthenticated) ────────────────────────────────────

/// Open beacon. Always serves the 1x1 pixel, whatever the write did.
pub async fn track_open(
    State(state): State<ApiState>,
    Path((campaign_id, recipient_id)): Path<(Uuid, Uuid)>,
) -> Response {
    state.tracker.record_open(campaign_id, recipient_id);

    (
        [
            (header::CONTENT_TYPE, "image/gif"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        beacon::PIXEL_GIF,
    )
        .into_response()
}

/// Click beacon. Always redirects to the original target URL.
pub async fn track_click(
    State(state): State<ApiState>,
    Path((campaign_id, recipient_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<ClickParams>,
) -> Response {
    let result = state
        .tracker
        .record_click(campaign_id, recipient_id, params.url);

    (
        StatusCode::FOUND,
        [(header::LOCATION, result.redirect_url)],
    )
        .into_response()
}

// ─── Operational ───────────────────────────────────────────────────────────

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn readiness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ready": true }))
}

pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "live": true }))
}
