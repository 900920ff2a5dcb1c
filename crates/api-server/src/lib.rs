pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod server;

pub use handlers::ApiState;
pub use router::api_router;
pub use server::ApiServer;
