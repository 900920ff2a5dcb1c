//! Campaign lifecycle state machine.
//!
//! Guards every campaign status change against a finite transition table.
//! The store performs the actual transitions inside its entry locks; this
//! module only answers whether a transition is legal.

use crate::error::{MailcastError, MailcastResult};
use crate::types::CampaignStatus;

/// Describes a single valid campaign status transition.
#[derive(Debug, Clone, Copy)]
pub struct StateTransition {
    pub from: CampaignStatus,
    pub to: CampaignStatus,
    pub trigger: &'static str,
}

/// The full transition table. `Sent` and `Partial` are terminal; `Failed`
/// is terminal for the dispatch flow but still deletable.
pub const TRANSITIONS: &[StateTransition] = &[
    // Draft ->
    StateTransition {
        from: CampaignStatus::Draft,
        to: CampaignStatus::Scheduled,
        trigger: "schedule",
    },
    StateTransition {
        from: CampaignStatus::Draft,
        to: CampaignStatus::Sending,
        trigger: "dispatch",
    },
    // Scheduled ->
    StateTransition {
        from: CampaignStatus::Scheduled,
        to: CampaignStatus::Draft,
        trigger: "cancel",
    },
    StateTransition {
        from: CampaignStatus::Scheduled,
        to: CampaignStatus::Sending,
        trigger: "schedule_due",
    },
    // Sending ->
    StateTransition {
        from: CampaignStatus::Sending,
        to: CampaignStatus::Sent,
        trigger: "batch_complete",
    },
    StateTransition {
        from: CampaignStatus::Sending,
        to: CampaignStatus::Partial,
        trigger: "batch_partial",
    },
    StateTransition {
        from: CampaignStatus::Sending,
        to: CampaignStatus::Failed,
        trigger: "batch_abort",
    },
];

/// Returns `true` if the given transition is allowed.
pub fn can_transition(from: CampaignStatus, to: CampaignStatus) -> bool {
    TRANSITIONS.iter().any(|t| t.from == from && t.to == to)
}

/// Checks a transition for `action`, returning `InvalidState` when the
/// table forbids it.
pub fn guard(from: CampaignStatus, to: CampaignStatus, action: &'static str) -> MailcastResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(MailcastError::InvalidState {
            action,
            required: required_state(to),
            actual: from.as_str().to_string(),
        })
    }
}

/// Campaign content (subject, body, sender) may only change in `Draft`.
pub fn is_editable(status: CampaignStatus) -> bool {
    status == CampaignStatus::Draft
}

/// Deletion is permitted only before a dispatch succeeded: `Draft` or
/// `Failed`.
pub fn is_deletable(status: CampaignStatus) -> bool {
    matches!(status, CampaignStatus::Draft | CampaignStatus::Failed)
}

fn required_state(to: CampaignStatus) -> &'static str {
    match to {
        CampaignStatus::Scheduled | CampaignStatus::Sending => "draft or scheduled",
        CampaignStatus::Draft => "scheduled",
        CampaignStatus::Sent | CampaignStatus::Partial | CampaignStatus::Failed => "sending",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_only_from_draft_or_due_schedule() {
        assert!(can_transition(CampaignStatus::Draft, CampaignStatus::Sending));
        assert!(can_transition(
            CampaignStatus::Scheduled,
            CampaignStatus::Sending
        ));
        assert!(!can_transition(CampaignStatus::Sent, CampaignStatus::Sending));
        assert!(!can_transition(
            CampaignStatus::Partial,
            CampaignStatus::Sending
        ));
        assert!(!can_transition(
            CampaignStatus::Sending,
            CampaignStatus::Sending
        ));
    }

    #[test]
    fn test_cancel_returns_scheduled_to_draft() {
        assert!(can_transition(CampaignStatus::Scheduled, CampaignStatus::Draft));
        assert!(!can_transition(CampaignStatus::Sent, CampaignStatus::Draft));
        assert!(!can_transition(CampaignStatus::Sending, CampaignStatus::Draft));
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_edges() {
        for status in [
            CampaignStatus::Sent,
            CampaignStatus::Partial,
            CampaignStatus::Failed,
        ] {
            assert!(!TRANSITIONS.iter().any(|t| t.from == status));
        }
    }

    #[test]
    fn test_guard_reports_actual_state() {
        let err = guard(CampaignStatus::Sent, CampaignStatus::Sending, "dispatch").unwrap_err();
        match err {
            MailcastError::InvalidState { action, actual, .. } => {
                assert_eq!(action, "dispatch");
                assert_eq!(actual, "sent");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_delete_and_edit_guards() {
        assert!(is_deletable(CampaignStatus::Draft));
        assert!(is_deletable(CampaignStatus::Failed));
        assert!(!is_deletable(CampaignStatus::Scheduled));
        assert!(!is_deletable(CampaignStatus::Sending));
        assert!(!is_deletable(CampaignStatus::Sent));
        assert!(!is_deletable(CampaignStatus::Partial));

        assert!(is_editable(CampaignStatus::Draft));
        assert!(!is_editable(CampaignStatus::Scheduled));
    }
}
