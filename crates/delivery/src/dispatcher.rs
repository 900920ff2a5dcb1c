//! Delivery dispatcher — turns a draft campaign into individually addressed
//! outbound messages and records per-recipient outcome.
//!
//! One recipient's transport failure never aborts the batch; only a failed
//! transport probe does. The campaign-level status transition happens
//! exactly once, after every per-recipient attempt has completed.

use crate::pacer::SendPacer;
use crate::resolver;
use crate::transport::{MailTransport, OutboundEmail};
use chrono::{DateTime, Utc};
use mailcast_core::beacon;
use mailcast_core::config::{DispatchConfig, TrackingConfig};
use mailcast_core::error::{MailcastError, MailcastResult};
use mailcast_core::types::{Campaign, CampaignStatus, DispatchReport, Recipient};
use mailcast_store::Store;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a send request: an immediate dispatch report, or a scheduling
/// confirmation when a future send time was supplied.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Dispatched { report: DispatchReport },
    Scheduled { scheduled_at: DateTime<Utc> },
}

pub struct Dispatcher {
    store: Arc<Store>,
    transport: Arc<dyn MailTransport>,
    config: DispatchConfig,
    /// Externally reachable base URL baked into beacon references.
    base_url: String,
}

impl Dispatcher {
    pub fn new(
        store: Arc<Store>,
        transport: Arc<dyn MailTransport>,
        config: DispatchConfig,
        tracking: &TrackingConfig,
    ) -> Self {
        info!(
            transport = transport.name(),
            min_send_interval_ms = config.min_send_interval_ms,
            "Dispatcher initialized"
        );
        Self {
            store,
            transport,
            config,
            base_url: tracking.public_base_url.clone(),
        }
    }

    /// Handle a send request for a draft campaign: resolve recipients, then
    /// either dispatch immediately or park the campaign as scheduled.
    ///
    /// Resolution failures (`NoRecipients`) and state violations abort
    /// before any persistent mutation.
    pub async fn send_campaign(
        &self,
        campaign_id: Uuid,
        company_id: Uuid,
        explicit_ids: &[Uuid],
        schedule_at: Option<DateTime<Utc>>,
        actor: Option<Uuid>,
    ) -> MailcastResult<SendOutcome> {
        let campaign = self
            .store
            .get_campaign(campaign_id, company_id)
            .ok_or_else(|| MailcastError::not_found("campaign"))?;

        if campaign.status != CampaignStatus::Draft {
            return Err(MailcastError::InvalidState {
                action: "dispatch",
                required: "draft",
                actual: campaign.status.as_str().to_string(),
            });
        }

        let customers = resolver::resolve(&self.store, &campaign, explicit_ids)?;

        if let Some(when) = schedule_at {
            // Status CAS first; the recipient replace only runs for the
            // caller that won the draft -> scheduled transition.
            let campaign = self.store.schedule_campaign(campaign_id, company_id, when)?;
            self.store.replace_recipients(campaign_id, &customers);
            self.store.log_action(
                actor,
                "campaign_scheduled",
                format!("Scheduled campaign {} for {}", campaign.title, when),
            );
            info!(campaign_id = %campaign_id, scheduled_at = %when, "Campaign scheduled");
            return Ok(SendOutcome::Scheduled { scheduled_at: when });
        }

        // The draft -> sending CAS is the at-most-once-dispatch gate;
        // concurrent callers cannot both pass it.
        let campaign = self.store.begin_dispatch(campaign_id, company_id)?;
        let recipients = self.store.replace_recipients(campaign_id, &customers);
        let report = self.run_batch(&campaign, recipients).await?;

        self.store.log_action(
            actor,
            "campaign_sent",
            format!(
                "Campaign {} sent to {} recipients ({} failed)",
                campaign.title, report.sent, report.failed
            ),
        );
        Ok(SendOutcome::Dispatched { report })
    }

    /// Dispatch a campaign the scheduler already moved to `Sending`. The
    /// recipient set was resolved at scheduling time and is reused as-is.
    pub async fn dispatch_claimed(&self, campaign: Campaign) -> MailcastResult<DispatchReport> {
        let recipients = self.store.recipients_for_campaign(campaign.id);
        if recipients.is_empty() {
            self.store
                .fail_dispatch(campaign.id, campaign.company_id, "no recipients at schedule time")?;
            return Err(MailcastError::NoRecipients);
        }
        let report = self.run_batch(&campaign, recipients).await?;
        self.store.log_action(
            None,
            "campaign_sent",
            format!(
                "Scheduled campaign {} sent to {} recipients ({} failed)",
                campaign.title, report.sent, report.failed
            ),
        );
        Ok(report)
    }

    /// Per-recipient send loop. Expects the campaign to be in `Sending`.
    async fn run_batch(
        &self,
        campaign: &Campaign,
        recipients: Vec<Recipient>,
    ) -> MailcastResult<DispatchReport> {
        metrics::counter!("dispatch.batches").increment(1);

        // One probe per batch: a transport that cannot establish a session
        // at all fails the whole campaign rather than burning through every
        // recipient.
        if let Err(e) = self.transport.probe().await {
            let msg = e.to_string();
            self.store
                .fail_dispatch(campaign.id, campaign.company_id, &msg)?;
            metrics::counter!("dispatch.batch_aborts").increment(1);
            return Err(MailcastError::TransportUnavailable(msg));
        }

        let mut report = DispatchReport::new(campaign.id, recipients.len());
        let mut pacer = SendPacer::new(self.config.min_send_interval());

        for recipient in &recipients {
            pacer.pace().await;

            let html = beacon::instrument_body(
                &campaign.body,
                &self.base_url,
                campaign.id,
                recipient.id,
            );
            let email = OutboundEmail {
                to: recipient.email.clone(),
                from: campaign.sender_email.clone(),
                subject: campaign.subject.clone(),
                html_body: html,
            };

            let attempt =
                tokio::time::timeout(self.config.send_timeout(), self.transport.send(&email)).await;
            match attempt {
                Ok(Ok(())) => {
                    self.store.mark_recipient_sent(recipient.id, Utc::now());
                    report.record_sent();
                    metrics::counter!("dispatch.messages_sent").increment(1);
                    debug!(campaign_id = %campaign.id, to = %recipient.email, "Message sent");
                }
                Ok(Err(e)) => {
                    self.record_failure(&mut report, recipient, e.to_string());
                }
                Err(_) => {
                    self.record_failure(
                        &mut report,
                        recipient,
                        format!("send timed out after {}s", self.config.send_timeout_secs),
                    );
                }
            }
        }

        let campaign = self
            .store
            .complete_dispatch(campaign.id, campaign.company_id, report.failed)?;
        info!(
            campaign_id = %campaign.id,
            status = campaign.status.as_str(),
            sent = report.sent,
            failed = report.failed,
            "Dispatch batch complete"
        );
        Ok(report)
    }

    fn record_failure(&self, report: &mut DispatchReport, recipient: &Recipient, error: String) {
        warn!(
            campaign_id = %recipient.campaign_id,
            to = %recipient.email,
            error = %error,
            "Message send failed"
        );
        self.store.mark_recipient_failed(recipient.id, &error);
        report.record_failure(recipient.id, &recipient.email, error);
        metrics::counter!("dispatch.messages_failed").increment(1);
    }
}
