//! Demo data seeding for development and tests.

use crate::password::hash_password;
use crate::Store;
use chrono::Utc;
use mailcast_core::types::{Company, Customer, Employee, Role};
use tracing::info;
use uuid::Uuid;

/// Handles to the seeded entities, returned so tests and the CLI can log in.
pub struct SeededData {
    pub acme: Company,
    pub northwind: Company,
}

/// Seed two demo companies, each with employees and customers. Employee
/// passwords are all `changeme`.
pub fn seed_demo_data(store: &Store) -> SeededData {
    let acme = seed_company(
        store,
        "Acme Retail",
        "acme.test",
        &[
            ("Ava Chen", "ava@acme.test", Role::Admin),
            ("Marco Diaz", "marco@acme.test", Role::Marketing),
            ("Ines Kovac", "ines@acme.test", Role::Analyst),
        ],
        &[
            ("Liam Ortiz", "liam@customers.test"),
            ("Sofia Marsh", "sofia@customers.test"),
            ("Noah Bright", "noah@customers.test"),
            ("Emma Wilde", "emma@customers.test"),
            ("Oliver Stone", "oliver@customers.test"),
        ],
    );

    let northwind = seed_company(
        store,
        "Northwind Outfitters",
        "northwind.test",
        &[
            ("Priya Nair", "priya@northwind.test", Role::Admin),
            ("Tom Berg", "tom@northwind.test", Role::Marketing),
        ],
        &[
            ("Hana Lee", "hana@buyers.test"),
            ("Felix Grau", "felix@buyers.test"),
            ("Mia Torres", "mia@buyers.test"),
        ],
    );

    info!(
        companies = 2,
        "Seeded demo data (employee password: changeme)"
    );

    SeededData { acme, northwind }
}

fn seed_company(
    store: &Store,
    name: &str,
    domain: &str,
    employees: &[(&str, &str, Role)],
    customers: &[(&str, &str)],
) -> Company {
    let now = Utc::now();
    let company = Company {
        id: Uuid::new_v4(),
        name: name.to_string(),
        domain: domain.to_string(),
        timezone: "UTC".to_string(),
        is_active: true,
        created_at: now,
    };
    store.insert_company(company.clone());

    for (emp_name, email, role) in employees {
        store.insert_employee(Employee {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: emp_name.to_string(),
            email: email.to_string(),
            password_hash: hash_password("changeme"),
            role: *role,
            is_active: true,
            created_at: now,
        });
    }

    for (cust_name, email) in customers {
        let customer = Customer {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: cust_name.to_string(),
            email: email.to_string(),
            phone: None,
            location: None,
            tags: vec!["demo".to_string()],
            created_at: now,
        };
        store.insert_customer(customer);
    }

    company
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_tenant_scoped() {
        let store = Store::new();
        let seeded = seed_demo_data(&store);

        let acme_customers = store.list_customers(seeded.acme.id);
        let northwind_customers = store.list_customers(seeded.northwind.id);
        assert_eq!(acme_customers.len(), 5);
        assert_eq!(northwind_customers.len(), 3);
        assert!(acme_customers
            .iter()
            .all(|c| c.company_id == seeded.acme.id));
    }

    #[test]
    fn test_seeded_employees_can_authenticate() {
        use crate::password::verify_password;
        let store = Store::new();
        seed_demo_data(&store);

        let ava = store.find_employee_by_email("ava@acme.test").unwrap();
        assert_eq!(ava.role, Role::Admin);
        assert!(verify_password("changeme", &ava.password_hash));
    }
}
