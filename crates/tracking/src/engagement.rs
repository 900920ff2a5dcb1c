//! Engagement tracking — processes open/click beacon callbacks.
//!
//! Both operations are unauthenticated (a mail client rendering a pixel or
//! a user following a redirect link) and best-effort: the remote client
//! always gets its pixel or redirect, and any internal failure is logged,
//! never surfaced. Writes are idempotent first-occurrence-wins conditional
//! updates, safe under concurrent callbacks and an in-flight dispatch.

use chrono::{DateTime, Utc};
use mailcast_store::Store;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// What a tracking write actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// First occurrence; the timestamp was set by this call.
    Recorded,
    /// Timestamp already present; the call was a no-op.
    AlreadyRecorded,
    /// Unknown recipient or internal failure; logged and swallowed.
    Ignored,
}

/// Result of a click callback. The redirect must happen regardless of the
/// tracking outcome.
#[derive(Debug, Clone)]
pub struct ClickResult {
    pub redirect_url: String,
    pub outcome: TrackOutcome,
}

/// One derived engagement event, for the per-campaign event feed.
#[derive(Debug, Clone, Serialize)]
pub struct TrackingEvent {
    pub recipient_id: Uuid,
    pub event_type: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub struct EngagementTracker {
    store: Arc<Store>,
}

impl EngagementTracker {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Record an open beacon hit. Sets `opened_at` once and promotes
    /// `sent -> opened`; repeat hits and unknown recipients are no-ops.
    pub fn record_open(&self, campaign_id: Uuid, recipient_id: Uuid) -> TrackOutcome {
        match self
            .store
            .set_opened_if_null(campaign_id, recipient_id, Utc::now())
        {
            Ok(true) => {
                info!(campaign_id = %campaign_id, recipient_id = %recipient_id, "Email opened");
                metrics::counter!("tracking.opens").increment(1);
                TrackOutcome::Recorded
            }
            Ok(false) => {
                debug!(campaign_id = %campaign_id, recipient_id = %recipient_id, "Repeat open ignored");
                TrackOutcome::AlreadyRecorded
            }
            Err(e) => {
                error!(campaign_id = %campaign_id, recipient_id = %recipient_id, error = %e, "Failed to track open");
                metrics::counter!("tracking.errors", "event" => "open").increment(1);
                TrackOutcome::Ignored
            }
        }
    }

    /// Record a click and hand back the original target URL for the
    /// redirect. A first click sets `clicked_at`, forces the status to
    /// `clicked`, and backfills `opened_at`. The write is best-effort; the
    /// URL is returned no matter what.
    pub fn record_click(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
        target_url: String,
    ) -> ClickResult {
        let outcome = match self
            .store
            .set_clicked_if_null(campaign_id, recipient_id, Utc::now())
        {
            Ok(true) => {
                info!(
                    campaign_id = %campaign_id,
                    recipient_id = %recipient_id,
                    url = %target_url,
                    "Email link clicked"
                );
                metrics::counter!("tracking.clicks").increment(1);
                TrackOutcome::Recorded
            }
            Ok(false) => TrackOutcome::AlreadyRecorded,
            Err(e) => {
                error!(campaign_id = %campaign_id, recipient_id = %recipient_id, error = %e, "Failed to track click");
                metrics::counter!("tracking.errors", "event" => "click").increment(1);
                TrackOutcome::Ignored
            }
        };

        ClickResult {
            redirect_url: target_url,
            outcome,
        }
    }

    /// Flat feed of open/click events for one campaign, oldest first.
    /// Authenticated read; the campaign must belong to `company_id`.
    pub fn events(&self, campaign_id: Uuid, company_id: Uuid) -> Option<Vec<TrackingEvent>> {
        self.store.get_campaign(campaign_id, company_id)?;

        let mut events = Vec::new();
        for recipient in self.store.recipients_for_campaign(campaign_id) {
            if let Some(at) = recipient.opened_at {
                events.push(TrackingEvent {
                    recipient_id: recipient.id,
                    event_type: "open",
                    timestamp: at,
                });
            }
            if let Some(at) = recipient.clicked_at {
                events.push(TrackingEvent {
                    recipient_id: recipient.id,
                    event_type: "click",
                    timestamp: at,
                });
            }
        }
        events.sort_by_key(|e| e.timestamp);
        Some(events)
    }
}
