//! Scheduled-send runner.
//!
//! Scheduling parks a campaign as `Scheduled`; this runner periodically
//! claims due campaigns (the `scheduled -> sending` CAS guarantees each is
//! claimed once) and drives them through the normal dispatch path.

use crate::dispatcher::Dispatcher;
use chrono::Utc;
use mailcast_store::Store;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub struct ScheduleRunner {
    store: Arc<Store>,
    dispatcher: Arc<Dispatcher>,
    poll_interval: Duration,
}

impl ScheduleRunner {
    pub fn new(store: Arc<Store>, dispatcher: Arc<Dispatcher>, poll_interval: Duration) -> Self {
        Self {
            store,
            dispatcher,
            poll_interval,
        }
    }

    /// Spawn the runner onto the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(poll_secs = self.poll_interval.as_secs(), "Schedule runner started");
        tokio::spawn(async move { self.run().await })
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// One scan: claim everything due and dispatch it.
    pub async fn tick(&self) {
        for campaign in self.store.claim_due_scheduled(Utc::now()) {
            info!(campaign_id = %campaign.id, title = %campaign.title, "Dispatching scheduled campaign");
            metrics::counter!("dispatch.scheduled_claims").increment(1);
            if let Err(e) = self.dispatcher.dispatch_claimed(campaign).await {
                error!(error = %e, "Scheduled dispatch failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use chrono::Duration as ChronoDuration;
    use mailcast_core::config::{DispatchConfig, TrackingConfig};
    use mailcast_core::types::{CampaignStatus, NewCampaign, NewCustomer};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_tick_dispatches_due_campaign() {
        let store = Arc::new(Store::new());
        let company_id = Uuid::new_v4();
        let employee_id = Uuid::new_v4();
        store.create_customer(
            company_id,
            NewCustomer {
                name: "x".to_string(),
                email: "x@c.test".to_string(),
                phone: None,
                location: None,
                tags: vec![],
            },
            employee_id,
        );
        let campaign = store.create_campaign(
            company_id,
            employee_id,
            NewCampaign {
                title: "Scheduled".to_string(),
                subject: "s".to_string(),
                body: "<p>b</p>".to_string(),
                sender_email: "news@acme.test".to_string(),
            },
        );

        let transport = Arc::new(MemoryTransport::new());
        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            transport.clone(),
            DispatchConfig {
                min_send_interval_ms: 0,
                send_timeout_secs: 5,
                scheduler_poll_secs: 1,
            },
            &TrackingConfig {
                public_base_url: "http://localhost:8080".to_string(),
            },
        ));

        // Park the campaign with a schedule already in the past.
        dispatcher
            .send_campaign(
                campaign.id,
                company_id,
                &[],
                Some(Utc::now() - ChronoDuration::minutes(1)),
                None,
            )
            .await
            .unwrap();

        let runner = ScheduleRunner::new(store.clone(), dispatcher, Duration::from_secs(1));
        runner.tick().await;

        assert_eq!(transport.sent().len(), 1);
        let done = store.get_campaign(campaign.id, company_id).unwrap();
        assert_eq!(done.status, CampaignStatus::Sent);

        // Nothing left to claim.
        runner.tick().await;
        assert_eq!(transport.sent().len(), 1);
    }
}
