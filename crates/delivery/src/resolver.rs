//! Recipient resolution.
//!
//! Turns a campaign plus an optional explicit customer-id list into the
//! final ordered addressee set, scoped to the campaign's company. Ids that
//! belong to another tenant (or to nobody) are silently dropped; an empty
//! result aborts dispatch before any side effect.

use mailcast_core::error::{MailcastError, MailcastResult};
use mailcast_core::types::{Campaign, Customer};
use mailcast_store::Store;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Resolve the addressee set for `campaign`.
///
/// With explicit ids: validates each against the owning company, collapses
/// duplicates preserving first occurrence. Without: falls back to every
/// customer of the company. Never returns an empty set.
pub fn resolve(
    store: &Store,
    campaign: &Campaign,
    explicit_ids: &[Uuid],
) -> MailcastResult<Vec<Customer>> {
    let customers = if explicit_ids.is_empty() {
        store.list_customers(campaign.company_id)
    } else {
        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(explicit_ids.len());
        for &id in explicit_ids {
            if !seen.insert(id) {
                continue;
            }
            match store.get_customer(id, campaign.company_id) {
                Some(customer) => out.push(customer),
                // Cross-tenant or unknown id: dropped without failing the
                // whole request.
                None => {
                    debug!(customer_id = %id, campaign_id = %campaign.id, "Dropping recipient id outside company scope")
                }
            }
        }
        out
    };

    if customers.is_empty() {
        return Err(MailcastError::NoRecipients);
    }
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mailcast_core::types::{CampaignStatus, NewCampaign};

    fn setup() -> (Store, Campaign) {
        let store = Store::new();
        let company_id = Uuid::new_v4();
        let campaign = store.create_campaign(
            company_id,
            Uuid::new_v4(),
            NewCampaign {
                title: "t".to_string(),
                subject: "s".to_string(),
                body: "<p>b</p>".to_string(),
                sender_email: "from@acme.test".to_string(),
            },
        );
        assert_eq!(campaign.status, CampaignStatus::Draft);
        (store, campaign)
    }

    fn add_customer(store: &Store, company_id: Uuid, email: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4(),
            company_id,
            name: email.to_string(),
            email: email.to_string(),
            phone: None,
            location: None,
            tags: vec![],
            created_at: Utc::now(),
        };
        store.insert_customer(customer.clone());
        customer
    }

    #[test]
    fn test_explicit_ids_drop_cross_tenant_silently() {
        let (store, campaign) = setup();
        let ours = add_customer(&store, campaign.company_id, "ours@x.test");
        let theirs = add_customer(&store, Uuid::new_v4(), "theirs@y.test");

        let resolved = resolve(&store, &campaign, &[ours.id, theirs.id]).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, ours.id);
    }

    #[test]
    fn test_duplicates_collapse_preserving_order() {
        let (store, campaign) = setup();
        let a = add_customer(&store, campaign.company_id, "a@x.test");
        let b = add_customer(&store, campaign.company_id, "b@x.test");

        let resolved = resolve(&store, &campaign, &[a.id, b.id, a.id, b.id]).unwrap();
        let emails: Vec<&str> = resolved.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.test", "b@x.test"]);
    }

    #[test]
    fn test_empty_explicit_list_falls_back_to_whole_company() {
        let (store, campaign) = setup();
        add_customer(&store, campaign.company_id, "a@x.test");
        add_customer(&store, campaign.company_id, "b@x.test");
        add_customer(&store, Uuid::new_v4(), "other@y.test");

        let resolved = resolve(&store, &campaign, &[]).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|c| c.company_id == campaign.company_id));
    }

    #[test]
    fn test_empty_resolution_is_an_error() {
        let (store, campaign) = setup();
        assert!(matches!(
            resolve(&store, &campaign, &[]).unwrap_err(),
            MailcastError::NoRecipients
        ));

        // All-foreign explicit list resolves empty too.
        let foreign = add_customer(&store, Uuid::new_v4(), "f@y.test");
        assert!(matches!(
            resolve(&store, &campaign, &[foreign.id]).unwrap_err(),
            MailcastError::NoRecipients
        ));
    }
}
