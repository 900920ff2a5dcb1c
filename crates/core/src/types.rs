use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Tenancy ────────────────────────────────────────────────────────────────

/// A tenant company. All campaign and directory data is scoped to exactly
/// one company; nothing in the core may cross this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub domain: String,
    pub timezone: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Employee role within a company.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Marketing,
    Analyst,
}

impl Role {
    /// Whether this role may mutate campaigns and trigger dispatch.
    pub fn can_manage_campaigns(&self) -> bool {
        matches!(self, Role::Admin | Role::Marketing)
    }
}

/// An employee of a tenant company. Authentication resolves requests to an
/// employee; authorization is derived from its role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    /// Salted SHA-256, stored as `salt$hexdigest`.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A company-scoped contact. Supplied by the directory; the dispatch core
/// only ever reads customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ─── Campaigns ──────────────────────────────────────────────────────────────

/// Campaign lifecycle state. Transitions are governed by
/// [`crate::lifecycle`]; see that module for the full table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Sending,
    Sent,
    Partial,
    Failed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Scheduled => "scheduled",
            CampaignStatus::Sending => "sending",
            CampaignStatus::Sent => "sent",
            CampaignStatus::Partial => "partial",
            CampaignStatus::Failed => "failed",
        }
    }
}

/// A single outbound message definition, owned by one company.
/// Subject, body and sender are immutable once the status leaves `Draft`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub subject: String,
    /// HTML body as authored; the open-tracking beacon is injected at
    /// dispatch time, never stored here.
    pub body: String,
    pub sender_email: String,
    pub status: CampaignStatus,
    pub created_by: Uuid,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ─── Recipients ─────────────────────────────────────────────────────────────

/// Per-recipient delivery/engagement state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Pending,
    Sent,
    Opened,
    Clicked,
    Failed,
    Bounced,
}

impl RecipientStatus {
    /// States reachable only after a successful send. Used by the
    /// aggregator's `sent` count.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            RecipientStatus::Sent | RecipientStatus::Opened | RecipientStatus::Clicked
        )
    }
}

/// The join of one campaign to one customer. Unique per (campaign,
/// customer); `sent_at`/`opened_at`/`clicked_at` are first-occurrence
/// timestamps, set at most once and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub customer_id: Uuid,
    /// Denormalized from the customer at resolution time so delivery
    /// records survive directory edits.
    pub email: String,
    pub status: RecipientStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub opened_at: Option<DateTime<Utc>>,
    pub clicked_at: Option<DateTime<Utc>>,
    /// Last transport failure for this recipient, if any.
    pub error: Option<String>,
}

impl Recipient {
    pub fn new(campaign_id: Uuid, customer: &Customer) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            customer_id: customer.id,
            email: customer.email.clone(),
            status: RecipientStatus::Pending,
            sent_at: None,
            opened_at: None,
            clicked_at: None,
            error: None,
        }
    }
}

/// Fields accepted when creating a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    pub subject: String,
    pub body: String,
    pub sender_email: String,
}

/// Explicit field-by-field campaign patch. Only these four fields are
/// mutable, and only while the campaign is `Draft`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sender_email: Option<String>,
}

/// Fields accepted when creating a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ─── Dispatch reporting ─────────────────────────────────────────────────────

/// One failed send attempt, keyed by recipient id rather than by matching
/// error strings against addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFailure {
    pub recipient_id: Uuid,
    pub email: String,
    pub error: String,
}

/// Outcome of a dispatch batch. `sent + failed` always equals the number
/// of resolved recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchReport {
    pub campaign_id: Uuid,
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    pub failures: Vec<SendFailure>,
}

impl DispatchReport {
    pub fn new(campaign_id: Uuid, total: usize) -> Self {
        Self {
            campaign_id,
            total,
            sent: 0,
            failed: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub fn record_failure(&mut self, recipient_id: Uuid, email: &str, error: String) {
        self.failed += 1;
        self.failures.push(SendFailure {
            recipient_id,
            email: email.to_string(),
            error,
        });
    }
}

// ─── Audit log ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub employee_id: Option<Uuid>,
    pub action: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}
