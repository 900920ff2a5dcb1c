//! Campaign statistics — a pure read over one campaign's recipient set.

use mailcast_core::error::{MailcastError, MailcastResult};
use mailcast_store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Derived delivery/engagement counts and rates for one campaign.
///
/// `sent_count` covers every state reachable only after a successful send
/// (`sent`, `opened`, `clicked`); rates are percentages of it, rounded to
/// two decimals for display interoperability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignStats {
    pub campaign_id: Uuid,
    pub total_recipients: usize,
    pub sent_count: usize,
    pub opened_count: usize,
    pub clicked_count: usize,
    pub bounce_count: usize,
    pub open_rate: f64,
    pub click_rate: f64,
}

pub struct CampaignAggregator {
    store: Arc<Store>,
}

impl CampaignAggregator {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Compute stats for a campaign owned by `company_id`. No side effects.
    pub fn stats(&self, campaign_id: Uuid, company_id: Uuid) -> MailcastResult<CampaignStats> {
        self.store
            .get_campaign(campaign_id, company_id)
            .ok_or_else(|| MailcastError::not_found("campaign"))?;

        let recipients = self.store.recipients_for_campaign(campaign_id);

        let total_recipients = recipients.len();
        let sent_count = recipients.iter().filter(|r| r.status.is_delivered()).count();
        let opened_count = recipients.iter().filter(|r| r.opened_at.is_some()).count();
        let clicked_count = recipients.iter().filter(|r| r.clicked_at.is_some()).count();
        let bounce_count = recipients
            .iter()
            .filter(|r| r.status == mailcast_core::types::RecipientStatus::Bounced)
            .count();

        Ok(CampaignStats {
            campaign_id,
            total_recipients,
            sent_count,
            opened_count,
            clicked_count,
            bounce_count,
            open_rate: rate(opened_count, sent_count),
            click_rate: rate(clicked_count, sent_count),
        })
    }
}

/// `part / whole * 100`, rounded to 2 decimals; 0.0 when `whole` is zero.
fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
