//! Reservation status graph and client-side action gating.
//!
//! ```text
//! confirmed ─┬─> checked_in ──> checked_out
//!            ├─> cancelled
//!            └─> expired
//! ```
//!
//! The backend is the only enforcer. Gates here decide what to offer; they
//! never stop a command from reaching the server.

use serde::Serialize;

use crate::core::models::status::ReservationStatus;

impl ReservationStatus {
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (Confirmed, Expired)
                | (CheckedIn, CheckedOut)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CheckedOut | Self::Cancelled | Self::Expired
        )
    }

    /// Commands worth offering for a reservation in this status.
    pub fn allowed_actions(&self) -> Vec<Action> {
        Action::all()
            .iter()
            .copied()
            .filter(|action| action.is_legal_from(*self))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CheckIn,
    CheckOut,
    Cancel,
    Extend,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[Action::CheckIn, Action::CheckOut, Action::Cancel, Action::Extend]
    }

    /// Status the reservation should land in after the command succeeds.
    pub fn resulting_status(&self) -> ReservationStatus {
        match self {
            Self::CheckIn => ReservationStatus::CheckedIn,
            Self::CheckOut => ReservationStatus::CheckedOut,
            Self::Cancel => ReservationStatus::Cancelled,
            Self::Extend => ReservationStatus::Confirmed,
        }
    }

    fn is_legal_from(&self, status: ReservationStatus) -> bool {
        match self {
            // Extending keeps the reservation confirmed.
            Self::Extend => status == ReservationStatus::Confirmed,
            _ => status.can_transition_to(self.resulting_status()),
        }
    }

    /// Path segment of the backend command endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
            Self::Cancel => "cancel",
            Self::Extend => "extend",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CheckIn => "Check in",
            Self::CheckOut => "Check out",
            Self::Cancel => "Cancel",
            Self::Extend => "Extend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    /// The client expects the server to reject the command.
    Advisory(String),
}

pub fn gate(status: ReservationStatus, action: Action) -> Gate {
    if action.is_legal_from(status) {
        Gate::Allowed
    } else {
        Gate::Advisory(format!(
            "{} is not expected to succeed for a reservation that is {}",
            action.display_name(),
            status.to_string().to_lowercase()
        ))
    }
}
