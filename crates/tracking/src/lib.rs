pub mod engagement;

pub use engagement::{ClickResult, EngagementTracker, TrackOutcome, TrackingEvent};
