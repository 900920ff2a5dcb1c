//! Bearer-token authentication over the employee directory.
//!
//! Login verifies the salted password hash and issues an opaque token
//! mapped to `(employee_id, company_id, role)` claims in an in-memory
//! session map. Production: swap the session map for JWT + an identity
//! provider behind the same two entry points.

use crate::handlers::ApiState;
use crate::models::{ErrorResponse, LoginRequest, LoginResponse};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use mailcast_core::error::{MailcastError, MailcastResult};
use mailcast_core::types::Role;
use mailcast_store::password::verify_password;
use mailcast_store::Store;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

const TOKEN_PREFIX: &str = "mc_";

/// Authenticated principal attached to every request past the middleware.
#[derive(Debug, Clone)]
pub struct Claims {
    pub employee_id: Uuid,
    pub company_id: Uuid,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// In-memory token -> claims map.
pub struct SessionStore {
    sessions: DashMap<String, Claims>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_hours: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    /// Validate credentials against the employee directory and mint a
    /// session token.
    pub fn login(&self, store: &Store, req: &LoginRequest) -> Result<LoginResponse, String> {
        let employee = store
            .find_employee_by_email(&req.email)
            .filter(|e| e.is_active)
            .ok_or_else(|| "Invalid credentials".to_string())?;

        if !verify_password(&req.password, &employee.password_hash) {
            return Err("Invalid credentials".to_string());
        }

        let claims = Claims {
            employee_id: employee.id,
            company_id: employee.company_id,
            role: employee.role,
            expires_at: Utc::now() + self.ttl,
        };
        let token = generate_token();
        self.sessions.insert(token.clone(), claims.clone());

        info!(employee_id = %employee.id, "Employee logged in");
        metrics::counter!("auth.logins").increment(1);

        Ok(LoginResponse {
            token,
            employee_id: claims.employee_id,
            company_id: claims.company_id,
            role: claims.role,
            expires_at: claims.expires_at,
        })
    }

    /// Resolve a bearer token, dropping it if expired.
    pub fn resolve(&self, token: &str) -> Option<Claims> {
        let claims = self.sessions.get(token).map(|e| e.value().clone())?;
        if claims.expires_at <= Utc::now() {
            self.sessions.remove(token);
            return None;
        }
        Some(claims)
    }
}

fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("{TOKEN_PREFIX}{}", hex::encode(bytes))
}

/// Dispatch/resolution and other mutating operations require `admin` or
/// `marketing`; `analyst` is read-only.
pub fn require_campaign_manager(claims: &Claims) -> MailcastResult<()> {
    if claims.role.can_manage_campaigns() {
        Ok(())
    } else {
        Err(MailcastError::Forbidden(
            "role may not manage campaigns".to_string(),
        ))
    }
}

/// Axum middleware that resolves the bearer token and injects [`Claims`].
/// Tracking beacons, login, and health probes stay unauthenticated.
pub async fn auth_middleware(State(state): State<ApiState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path();
    if path.ends_with("/auth/login")
        || path.contains("/tracking/")
        || path.starts_with("/health")
        || path.starts_with("/ready")
        || path.starts_with("/live")
    {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token.and_then(|t| state.sessions.resolve(t)) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "unauthorized".to_string(),
                message: "Valid bearer token required".to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailcast_store::seed::seed_demo_data;

    #[test]
    fn test_login_and_resolve() {
        let store = Store::new();
        seed_demo_data(&store);
        let sessions = SessionStore::new(8);

        let resp = sessions
            .login(
                &store,
                &LoginRequest {
                    email: "ava@acme.test".to_string(),
                    password: "changeme".to_string(),
                },
            )
            .unwrap();
        assert!(resp.token.starts_with(TOKEN_PREFIX));
        assert_eq!(resp.role, Role::Admin);

        let claims = sessions.resolve(&resp.token).unwrap();
        assert_eq!(claims.employee_id, resp.employee_id);
        assert!(sessions.resolve("mc_bogus").is_none());
    }

    #[test]
    fn test_bad_password_is_rejected() {
        let store = Store::new();
        seed_demo_data(&store);
        let sessions = SessionStore::new(8);

        let err = sessions
            .login(
                &store,
                &LoginRequest {
                    email: "ava@acme.test".to_string(),
                    password: "wrong".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(err, "Invalid credentials");
    }

    #[test]
    fn test_analyst_cannot_manage_campaigns() {
        let claims = Claims {
            employee_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            role: Role::Analyst,
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(require_campaign_manager(&claims).is_err());

        let claims = Claims {
            role: Role::Marketing,
            ..claims
        };
        assert!(require_campaign_manager(&claims).is_ok());
    }
}
