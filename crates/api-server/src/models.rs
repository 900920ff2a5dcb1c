//! Request/response DTOs for the REST surface. Domain entities live in
//! `mailcast_core::types` and serialize directly.

use chrono::{DateTime, Utc};
use mailcast_core::types::{DispatchReport, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Body of `POST /campaigns/{id}/send`. An empty `recipient_ids` list means
/// "every customer of the company"; a `schedule_at` defers the dispatch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendCampaignRequest {
    #[serde(default)]
    pub recipient_ids: Vec<Uuid>,
    #[serde(default)]
    pub schedule_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendCampaignResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DispatchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClickParams {
    /// Original target URL to redirect to.
    pub url: String,
}
