pub mod dispatcher;
pub mod pacer;
pub mod resolver;
pub mod scheduler;
pub mod transport;

pub use dispatcher::{Dispatcher, SendOutcome};
pub use scheduler::ScheduleRunner;
pub use transport::{DryRunTransport, MailTransport, MemoryTransport, OutboundEmail, SmtpTransport};
