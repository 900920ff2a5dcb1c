pub mod beacon;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod types;

pub use config::AppConfig;
pub use error::{MailcastError, MailcastResult};
