use serde::Deserialize;
use std::time::Duration;

/// Root application configuration. Loaded from environment variables with
/// the prefix `MAILCAST__` (double-underscore separator).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Seed two demo companies with employees and customers at startup.
    #[serde(default = "default_seed_demo")]
    pub seed_demo: bool,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// SMTP relay settings. The session is validated lazily by the dispatcher's
/// first-use probe, not at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Upgrade the connection with STARTTLS. Disable only for local
    /// debug relays.
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    #[serde(default = "default_smtp_timeout_secs")]
    pub timeout_secs: u64,
}

/// Dispatch batch policy.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Minimum interval between two sends, applied globally across the
    /// batch. Relay providers rate-limit per account, so this must stay
    /// non-zero in production.
    #[serde(default = "default_min_send_interval_ms")]
    pub min_send_interval_ms: u64,
    /// Per-message send timeout; an elapsed timeout counts as a
    /// per-recipient failure.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
    /// How often the scheduler scans for due scheduled campaigns.
    #[serde(default = "default_scheduler_poll_secs")]
    pub scheduler_poll_secs: u64,
}

impl DispatchConfig {
    pub fn min_send_interval(&self) -> Duration {
        Duration::from_millis(self.min_send_interval_ms)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    pub fn scheduler_poll(&self) -> Duration {
        Duration::from_secs(self.scheduler_poll_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingConfig {
    /// Externally reachable base URL baked into beacon references.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,
}

// Default functions
fn default_seed_demo() -> bool {
    true
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_smtp_host() -> String {
    "localhost".to_string()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_starttls() -> bool {
    true
}
fn default_smtp_timeout_secs() -> u64 {
    30
}
fn default_min_send_interval_ms() -> u64 {
    2000
}
fn default_send_timeout_secs() -> u64 {
    30
}
fn default_scheduler_poll_secs() -> u64 {
    30
}
fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_session_ttl_hours() -> u32 {
    8
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: None,
            password: None,
            starttls: default_starttls(),
            timeout_secs: default_smtp_timeout_secs(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_send_interval_ms: default_min_send_interval_ms(),
            send_timeout_secs: default_send_timeout_secs(),
            scheduler_poll_secs: default_scheduler_poll_secs(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_demo: default_seed_demo(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            smtp: SmtpConfig::default(),
            dispatch: DispatchConfig::default(),
            tracking: TrackingConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MAILCAST")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
