//! In-memory tenant-scoped store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store. The
//! method surface is the transactional contract the dispatch core relies
//! on: every guarded status change happens under a single map-entry lock,
//! and recipient timestamp writes are first-occurrence-wins conditional
//! updates on independent entries.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use mailcast_core::error::{MailcastError, MailcastResult};
use mailcast_core::lifecycle;
use mailcast_core::types::{
    AuditLogEntry, Campaign, CampaignStatus, CampaignUpdate, Company, Customer, Employee,
    NewCampaign, NewCustomer, Recipient, RecipientStatus,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Thread-safe in-memory store for companies, employees, customers,
/// campaigns, recipients, and the audit log.
pub struct Store {
    companies: DashMap<Uuid, Company>,
    employees: DashMap<Uuid, Employee>,
    customers: DashMap<Uuid, Customer>,
    campaigns: DashMap<Uuid, Campaign>,
    recipients: DashMap<Uuid, Recipient>,
    /// Recipient ids per campaign, in resolution order.
    campaign_recipients: DashMap<Uuid, Vec<Uuid>>,
    audit_log: DashMap<Uuid, AuditLogEntry>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            companies: DashMap::new(),
            employees: DashMap::new(),
            customers: DashMap::new(),
            campaigns: DashMap::new(),
            recipients: DashMap::new(),
            campaign_recipients: DashMap::new(),
            audit_log: DashMap::new(),
        }
    }

    // ─── Companies & Employees ─────────────────────────────────────────────

    pub fn insert_company(&self, company: Company) {
        self.companies.insert(company.id, company);
    }

    pub fn get_company(&self, id: Uuid) -> Option<Company> {
        self.companies.get(&id).map(|r| r.value().clone())
    }

    pub fn insert_employee(&self, employee: Employee) {
        self.employees.insert(employee.id, employee);
    }

    pub fn get_employee(&self, id: Uuid) -> Option<Employee> {
        self.employees.get(&id).map(|r| r.value().clone())
    }

    pub fn find_employee_by_email(&self, email: &str) -> Option<Employee> {
        self.employees
            .iter()
            .find(|r| r.value().email.eq_ignore_ascii_case(email))
            .map(|r| r.value().clone())
    }

    // ─── Customers ─────────────────────────────────────────────────────────

    pub fn insert_customer(&self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    pub fn list_customers(&self, company_id: Uuid) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .iter()
            .filter(|r| r.value().company_id == company_id)
            .map(|r| r.value().clone())
            .collect();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        customers
    }

    pub fn get_customer(&self, id: Uuid, company_id: Uuid) -> Option<Customer> {
        self.customers
            .get(&id)
            .filter(|r| r.value().company_id == company_id)
            .map(|r| r.value().clone())
    }

    pub fn create_customer(&self, company_id: Uuid, req: NewCustomer, actor: Uuid) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            company_id,
            name: req.name,
            email: req.email,
            phone: req.phone,
            location: req.location,
            tags: req.tags,
            created_at: Utc::now(),
        };
        self.customers.insert(customer.id, customer.clone());
        self.log_action(
            Some(actor),
            "customer_created",
            format!("Created customer: {}", customer.email),
        );
        customer
    }

    pub fn delete_customer(&self, id: Uuid, company_id: Uuid, actor: Uuid) -> bool {
        let removed = self
            .customers
            .remove_if(&id, |_, c| c.company_id == company_id)
            .is_some();
        if removed {
            self.log_action(Some(actor), "customer_deleted", format!("Deleted customer {id}"));
        }
        removed
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn list_campaigns(&self, company_id: Uuid) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|r| r.value().company_id == company_id)
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        campaigns
    }

    pub fn get_campaign(&self, id: Uuid, company_id: Uuid) -> Option<Campaign> {
        self.campaigns
            .get(&id)
            .filter(|r| r.value().company_id == company_id)
            .map(|r| r.value().clone())
    }

    pub fn create_campaign(&self, company_id: Uuid, created_by: Uuid, req: NewCampaign) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            id: Uuid::new_v4(),
            company_id,
            title: req.title,
            subject: req.subject,
            body: req.body,
            sender_email: req.sender_email,
            status: CampaignStatus::Draft,
            created_by,
            scheduled_at: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        };
        self.campaigns.insert(campaign.id, campaign.clone());
        self.log_action(
            Some(created_by),
            "campaign_created",
            format!("Created campaign: {}", campaign.title),
        );
        campaign
    }

    /// Explicit field-by-field merge of the permitted mutable fields.
    /// Rejected once the campaign has left `Draft`.
    pub fn update_campaign(
        &self,
        id: Uuid,
        company_id: Uuid,
        req: CampaignUpdate,
        actor: Uuid,
    ) -> MailcastResult<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .filter(|e| e.company_id == company_id)
            .ok_or_else(|| MailcastError::not_found("campaign"))?;

        if !lifecycle::is_editable(entry.status) {
            return Err(MailcastError::validation("Can only update draft campaigns"));
        }

        let c = entry.value_mut();
        if let Some(title) = req.title {
            c.title = title;
        }
        if let Some(subject) = req.subject {
            c.subject = subject;
        }
        if let Some(body) = req.body {
            c.body = body;
        }
        if let Some(sender_email) = req.sender_email {
            c.sender_email = sender_email;
        }
        c.updated_at = Utc::now();
        let updated = c.clone();
        drop(entry);

        self.log_action(
            Some(actor),
            "campaign_updated",
            format!("Updated campaign: {}", updated.title),
        );
        Ok(updated)
    }

    /// Deletes a campaign and cascades its recipient rows. Permitted only
    /// from `Draft` or `Failed`.
    pub fn delete_campaign(&self, id: Uuid, company_id: Uuid, actor: Uuid) -> MailcastResult<()> {
        let campaign = self
            .get_campaign(id, company_id)
            .ok_or_else(|| MailcastError::not_found("campaign"))?;
        if !lifecycle::is_deletable(campaign.status) {
            return Err(MailcastError::validation(
                "Can only delete draft or failed campaigns",
            ));
        }

        // Re-check under the removal itself so a concurrent dispatch cannot
        // slip between the read above and the remove.
        let removed = self
            .campaigns
            .remove_if(&id, |_, c| {
                c.company_id == company_id && lifecycle::is_deletable(c.status)
            })
            .is_some();
        if !removed {
            return Err(MailcastError::validation(
                "Can only delete draft or failed campaigns",
            ));
        }

        if let Some((_, recipient_ids)) = self.campaign_recipients.remove(&id) {
            for rid in recipient_ids {
                self.recipients.remove(&rid);
            }
        }

        self.log_action(
            Some(actor),
            "campaign_deleted",
            format!("Deleted campaign: {}", campaign.title),
        );
        Ok(())
    }

    // ─── Campaign lifecycle transitions ────────────────────────────────────
    //
    // Each transition checks and mutates the status under the campaign's
    // entry lock, so two racing callers can never both observe the source
    // state.

    /// `Draft -> Scheduled`, stamping `scheduled_at`.
    pub fn schedule_campaign(
        &self,
        id: Uuid,
        company_id: Uuid,
        when: DateTime<Utc>,
    ) -> MailcastResult<Campaign> {
        self.transition(id, company_id, CampaignStatus::Scheduled, "schedule", |c| {
            c.scheduled_at = Some(when);
        })
    }

    /// `Scheduled -> Draft`. `scheduled_at` is intentionally retained;
    /// a later send overwrites it.
    pub fn cancel_schedule(&self, id: Uuid, company_id: Uuid) -> MailcastResult<Campaign> {
        self.transition(id, company_id, CampaignStatus::Draft, "cancel", |_| {})
    }

    /// `Draft -> Sending`. This is the at-most-once-dispatch gate.
    pub fn begin_dispatch(&self, id: Uuid, company_id: Uuid) -> MailcastResult<Campaign> {
        let campaign = self.transition(id, company_id, CampaignStatus::Sending, "dispatch", |_| {})?;
        info!(campaign_id = %id, "Campaign dispatch started");
        Ok(campaign)
    }

    /// Claims every scheduled campaign whose `scheduled_at` has passed,
    /// moving each to `Sending`. Each campaign is claimed at most once.
    pub fn claim_due_scheduled(&self, now: DateTime<Utc>) -> Vec<Campaign> {
        let due: Vec<(Uuid, Uuid)> = self
            .campaigns
            .iter()
            .filter(|r| {
                let c = r.value();
                c.status == CampaignStatus::Scheduled
                    && c.scheduled_at.map(|at| at <= now).unwrap_or(false)
            })
            .map(|r| (r.value().id, r.value().company_id))
            .collect();

        let mut claimed = Vec::new();
        for (id, company_id) in due {
            match self.transition(id, company_id, CampaignStatus::Sending, "schedule_due", |_| {}) {
                Ok(campaign) => {
                    info!(campaign_id = %id, "Claimed scheduled campaign for dispatch");
                    claimed.push(campaign);
                }
                // Raced with a cancel or another scheduler tick; skip.
                Err(_) => continue,
            }
        }
        claimed
    }

    /// `Sending -> Sent | Partial` once all per-recipient attempts finished.
    pub fn complete_dispatch(&self, id: Uuid, company_id: Uuid, failed: usize) -> MailcastResult<Campaign> {
        let target = if failed == 0 {
            CampaignStatus::Sent
        } else {
            CampaignStatus::Partial
        };
        self.transition(id, company_id, target, "batch_complete", |c| {
            c.sent_at = Some(Utc::now());
        })
    }

    /// `Sending -> Failed` when the batch itself could not proceed.
    pub fn fail_dispatch(&self, id: Uuid, company_id: Uuid, error: &str) -> MailcastResult<Campaign> {
        warn!(campaign_id = %id, error = %error, "Campaign dispatch aborted");
        self.transition(id, company_id, CampaignStatus::Failed, "batch_abort", |_| {})
    }

    fn transition(
        &self,
        id: Uuid,
        company_id: Uuid,
        to: CampaignStatus,
        action: &'static str,
        apply: impl FnOnce(&mut Campaign),
    ) -> MailcastResult<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(&id)
            .filter(|e| e.company_id == company_id)
            .ok_or_else(|| MailcastError::not_found("campaign"))?;

        lifecycle::guard(entry.status, to, action)?;

        let c = entry.value_mut();
        c.status = to;
        c.updated_at = Utc::now();
        apply(c);
        Ok(c.clone())
    }

    // ─── Recipients ────────────────────────────────────────────────────────

    /// Clears any previous recipient set for the campaign and bulk-inserts
    /// fresh `Pending` rows, one per resolved customer. Destructive; the
    /// dispatch path only runs this against draft campaigns.
    pub fn replace_recipients(&self, campaign_id: Uuid, customers: &[Customer]) -> Vec<Recipient> {
        let mut index = self.campaign_recipients.entry(campaign_id).or_default();
        for old_id in index.drain(..) {
            self.recipients.remove(&old_id);
        }

        let mut inserted = Vec::with_capacity(customers.len());
        for customer in customers {
            let recipient = Recipient::new(campaign_id, customer);
            index.push(recipient.id);
            self.recipients.insert(recipient.id, recipient.clone());
            inserted.push(recipient);
        }
        inserted
    }

    /// Recipients in resolution order.
    pub fn recipients_for_campaign(&self, campaign_id: Uuid) -> Vec<Recipient> {
        let ids = match self.campaign_recipients.get(&campaign_id) {
            Some(index) => index.value().clone(),
            None => return Vec::new(),
        };
        ids.iter()
            .filter_map(|rid| self.recipients.get(rid).map(|r| r.value().clone()))
            .collect()
    }

    pub fn get_recipient(&self, campaign_id: Uuid, recipient_id: Uuid) -> Option<Recipient> {
        self.recipients
            .get(&recipient_id)
            .filter(|r| r.value().campaign_id == campaign_id)
            .map(|r| r.value().clone())
    }

    /// Records a successful send. `sent_at` is first-occurrence-only and
    /// the status is promoted only from `Pending`, so a recipient already
    /// `Opened`/`Clicked` by a concurrent callback is never downgraded.
    pub fn mark_recipient_sent(&self, recipient_id: Uuid, at: DateTime<Utc>) {
        if let Some(mut entry) = self.recipients.get_mut(&recipient_id) {
            let r = entry.value_mut();
            if r.sent_at.is_none() {
                r.sent_at = Some(at);
            }
            if r.status == RecipientStatus::Pending {
                r.status = RecipientStatus::Sent;
            }
            r.error = None;
        }
    }

    pub fn mark_recipient_failed(&self, recipient_id: Uuid, error: &str) {
        if let Some(mut entry) = self.recipients.get_mut(&recipient_id) {
            let r = entry.value_mut();
            if r.status == RecipientStatus::Pending {
                r.status = RecipientStatus::Failed;
            }
            r.error = Some(error.to_string());
        }
    }

    /// Conditionally sets `opened_at` under the entry lock. Returns `true`
    /// when this call set the timestamp; repeat opens are no-ops. Promotes
    /// `Sent -> Opened` without ever touching `Clicked`.
    pub fn set_opened_if_null(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> MailcastResult<bool> {
        let mut entry = self
            .recipients
            .get_mut(&recipient_id)
            .filter(|e| e.campaign_id == campaign_id)
            .ok_or_else(|| MailcastError::not_found("recipient"))?;

        let r = entry.value_mut();
        if r.opened_at.is_some() {
            return Ok(false);
        }
        r.opened_at = Some(at);
        if r.status == RecipientStatus::Sent {
            r.status = RecipientStatus::Opened;
        }
        Ok(true)
    }

    /// Conditionally sets `clicked_at` under the entry lock. A first click
    /// forces the status to `Clicked` and backfills `opened_at` (a click
    /// implies an open even if the pixel was blocked).
    pub fn set_clicked_if_null(
        &self,
        campaign_id: Uuid,
        recipient_id: Uuid,
        at: DateTime<Utc>,
    ) -> MailcastResult<bool> {
        let mut entry = self
            .recipients
            .get_mut(&recipient_id)
            .filter(|e| e.campaign_id == campaign_id)
            .ok_or_else(|| MailcastError::not_found("recipient"))?;

        let r = entry.value_mut();
        if r.clicked_at.is_some() {
            return Ok(false);
        }
        r.clicked_at = Some(at);
        r.status = RecipientStatus::Clicked;
        if r.opened_at.is_none() {
            r.opened_at = Some(at);
        }
        Ok(true)
    }

    // ─── Audit log ─────────────────────────────────────────────────────────

    pub fn log_action(&self, employee_id: Option<Uuid>, action: &str, details: String) {
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            employee_id,
            action: action.to_string(),
            details,
            timestamp: Utc::now(),
        };
        self.audit_log.insert(entry.id, entry);
    }

    pub fn audit_log(&self) -> Vec<AuditLogEntry> {
        let mut entries: Vec<AuditLogEntry> =
            self.audit_log.iter().map(|r| r.value().clone()).collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store_with_campaign() -> (Store, Campaign, Uuid) {
        let store = Store::new();
        let company_id = Uuid::new_v4();
        let employee_id = Uuid::new_v4();
        let campaign = store.create_campaign(
            company_id,
            employee_id,
            NewCampaign {
                title: "Spring Launch".to_string(),
                subject: "Big news".to_string(),
                body: "<p>Hello</p>".to_string(),
                sender_email: "news@acme.test".to_string(),
            },
        );
        (store, campaign, employee_id)
    }

    fn customer(company_id: Uuid, email: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            company_id,
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            phone: None,
            location: None,
            tags: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_begin_dispatch_is_at_most_once() {
        let (store, campaign, _) = store_with_campaign();

        let first = store.begin_dispatch(campaign.id, campaign.company_id);
        assert!(first.is_ok());
        assert_eq!(first.unwrap().status, CampaignStatus::Sending);

        // Second claim must observe Sending, not Draft.
        let second = store.begin_dispatch(campaign.id, campaign.company_id);
        assert!(matches!(
            second.unwrap_err(),
            MailcastError::InvalidState { .. }
        ));
    }

    #[test]
    fn test_begin_dispatch_is_tenant_scoped() {
        let (store, campaign, _) = store_with_campaign();
        let err = store
            .begin_dispatch(campaign.id, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, MailcastError::NotFound { .. }));
    }

    #[test]
    fn test_update_rejected_after_draft() {
        let (store, campaign, employee) = store_with_campaign();
        store
            .begin_dispatch(campaign.id, campaign.company_id)
            .unwrap();

        let err = store
            .update_campaign(
                campaign.id,
                campaign.company_id,
                CampaignUpdate {
                    title: Some("Too late".to_string()),
                    ..Default::default()
                },
                employee,
            )
            .unwrap_err();
        assert!(matches!(err, MailcastError::Validation(_)));
    }

    #[test]
    fn test_update_merges_only_permitted_fields() {
        let (store, campaign, employee) = store_with_campaign();
        let updated = store
            .update_campaign(
                campaign.id,
                campaign.company_id,
                CampaignUpdate {
                    subject: Some("Bigger news".to_string()),
                    ..Default::default()
                },
                employee,
            )
            .unwrap();
        assert_eq!(updated.subject, "Bigger news");
        assert_eq!(updated.title, campaign.title);
        assert_eq!(updated.body, campaign.body);
        assert_eq!(updated.status, CampaignStatus::Draft);
    }

    #[test]
    fn test_delete_rejected_outside_draft_and_failed() {
        let (store, campaign, employee) = store_with_campaign();
        store
            .schedule_campaign(
                campaign.id,
                campaign.company_id,
                Utc::now() + Duration::hours(1),
            )
            .unwrap();

        let err = store
            .delete_campaign(campaign.id, campaign.company_id, employee)
            .unwrap_err();
        assert!(matches!(err, MailcastError::Validation(_)));

        // Back to draft, then delete succeeds and cascades recipients.
        store
            .cancel_schedule(campaign.id, campaign.company_id)
            .unwrap();
        let customers = vec![customer(campaign.company_id, "a@x.test")];
        store.replace_recipients(campaign.id, &customers);

        store
            .delete_campaign(campaign.id, campaign.company_id, employee)
            .unwrap();
        assert!(store.get_campaign(campaign.id, campaign.company_id).is_none());
        assert!(store.recipients_for_campaign(campaign.id).is_empty());
    }

    #[test]
    fn test_cancel_retains_scheduled_at() {
        let (store, campaign, _) = store_with_campaign();
        let when = Utc::now() + Duration::hours(2);
        store
            .schedule_campaign(campaign.id, campaign.company_id, when)
            .unwrap();

        let cancelled = store
            .cancel_schedule(campaign.id, campaign.company_id)
            .unwrap();
        assert_eq!(cancelled.status, CampaignStatus::Draft);
        assert_eq!(cancelled.scheduled_at, Some(when));
    }

    #[test]
    fn test_replace_recipients_is_destructive() {
        let (store, campaign, _) = store_with_campaign();
        let first = vec![
            customer(campaign.company_id, "a@x.test"),
            customer(campaign.company_id, "b@x.test"),
        ];
        let old = store.replace_recipients(campaign.id, &first);
        assert_eq!(old.len(), 2);

        let second = vec![customer(campaign.company_id, "c@x.test")];
        store.replace_recipients(campaign.id, &second);

        let current = store.recipients_for_campaign(campaign.id);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].email, "c@x.test");
        // Old rows are gone entirely, not orphaned.
        assert!(store.get_recipient(campaign.id, old[0].id).is_none());
    }

    #[test]
    fn test_opened_is_first_occurrence_only() {
        let (store, campaign, _) = store_with_campaign();
        let customers = vec![customer(campaign.company_id, "a@x.test")];
        let recipients = store.replace_recipients(campaign.id, &customers);
        let rid = recipients[0].id;
        store.mark_recipient_sent(rid, Utc::now());

        let t1 = Utc::now();
        assert!(store.set_opened_if_null(campaign.id, rid, t1).unwrap());
        assert!(!store
            .set_opened_if_null(campaign.id, rid, t1 + Duration::minutes(5))
            .unwrap());

        let r = store.get_recipient(campaign.id, rid).unwrap();
        assert_eq!(r.opened_at, Some(t1));
        assert_eq!(r.status, RecipientStatus::Opened);
    }

    #[test]
    fn test_click_backfills_open_and_wins_over_open() {
        let (store, campaign, _) = store_with_campaign();
        let customers = vec![customer(campaign.company_id, "a@x.test")];
        let recipients = store.replace_recipients(campaign.id, &customers);
        let rid = recipients[0].id;
        store.mark_recipient_sent(rid, Utc::now());

        let t1 = Utc::now();
        assert!(store.set_clicked_if_null(campaign.id, rid, t1).unwrap());
        let r = store.get_recipient(campaign.id, rid).unwrap();
        assert_eq!(r.status, RecipientStatus::Clicked);
        assert_eq!(r.opened_at, Some(t1));
        assert_eq!(r.clicked_at, Some(t1));

        // A later open must not downgrade the clicked status.
        assert!(!store
            .set_opened_if_null(campaign.id, rid, t1 + Duration::minutes(1))
            .unwrap());
        let r = store.get_recipient(campaign.id, rid).unwrap();
        assert_eq!(r.status, RecipientStatus::Clicked);
    }

    #[test]
    fn test_mark_sent_does_not_downgrade_engaged_recipient() {
        let (store, campaign, _) = store_with_campaign();
        let customers = vec![customer(campaign.company_id, "a@x.test")];
        let recipients = store.replace_recipients(campaign.id, &customers);
        let rid = recipients[0].id;

        // Click callback lands before the dispatcher records the send.
        store.set_clicked_if_null(campaign.id, rid, Utc::now()).unwrap();
        store.mark_recipient_sent(rid, Utc::now());

        let r = store.get_recipient(campaign.id, rid).unwrap();
        assert_eq!(r.status, RecipientStatus::Clicked);
        assert!(r.sent_at.is_some());
    }

    #[test]
    fn test_claim_due_scheduled_claims_once() {
        let (store, campaign, _) = store_with_campaign();
        let past = Utc::now() - Duration::minutes(1);
        store
            .schedule_campaign(campaign.id, campaign.company_id, past)
            .unwrap();

        let claimed = store.claim_due_scheduled(Utc::now());
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].status, CampaignStatus::Sending);

        // A second scheduler tick finds nothing to claim.
        assert!(store.claim_due_scheduled(Utc::now()).is_empty());
    }

    #[test]
    fn test_claim_skips_future_schedules() {
        let (store, campaign, _) = store_with_campaign();
        store
            .schedule_campaign(
                campaign.id,
                campaign.company_id,
                Utc::now() + Duration::hours(1),
            )
            .unwrap();
        assert!(store.claim_due_scheduled(Utc::now()).is_empty());
    }

    #[test]
    fn test_complete_dispatch_maps_failures_to_status() {
        let (store, campaign, _) = store_with_campaign();
        store
            .begin_dispatch(campaign.id, campaign.company_id)
            .unwrap();
        let done = store
            .complete_dispatch(campaign.id, campaign.company_id, 0)
            .unwrap();
        assert_eq!(done.status, CampaignStatus::Sent);
        assert!(done.sent_at.is_some());

        let (store, campaign, _) = store_with_campaign();
        store
            .begin_dispatch(campaign.id, campaign.company_id)
            .unwrap();
        let done = store
            .complete_dispatch(campaign.id, campaign.company_id, 3)
            .unwrap();
        assert_eq!(done.status, CampaignStatus::Partial);
    }
}
