use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;

use crate::core::models::lot::ExtensionPolicy;
use crate::core::models::reservation::Reservation;
use crate::core::models::status::ReservationStatus;

/// What the caller knows about a lot's extension policy.
///
/// `Unknown` (not loaded yet, or the lot has none on record) is treated
/// optimistically: the extend action is offered and the backend decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyState {
    #[default]
    Unknown,
    Known(ExtensionPolicy),
}

impl From<Option<ExtensionPolicy>> for PolicyState {
    fn from(policy: Option<ExtensionPolicy>) -> Self {
        match policy {
            Some(p) => Self::Known(p),
            None => Self::Unknown,
        }
    }
}

impl PolicyState {
    pub fn policy(&self) -> Option<&ExtensionPolicy> {
        match self {
            Self::Known(p) => Some(p),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ExtensionDecision {
    NotConfirmed { status: ReservationStatus },
    Expired,
    PolicyUnknown,
    PolicyInactive,
    LimitReached { used: u32, max: u32 },
    Allowed { remaining: u32 },
}

impl ExtensionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::PolicyUnknown | Self::Allowed { .. })
    }

    pub fn reason(&self) -> String {
        match self {
            Self::NotConfirmed { status } => format!("reservation is {}", status),
            Self::Expired => "reservation hold has expired".to_string(),
            Self::PolicyUnknown => "policy not loaded, server will decide".to_string(),
            Self::PolicyInactive => "extensions are disabled for this lot".to_string(),
            Self::LimitReached { used, max } => format!("{} of {} extensions used", used, max),
            Self::Allowed { remaining } => format!(
                "{} extension{} left",
                remaining,
                if *remaining == 1 { "" } else { "s" }
            ),
        }
    }
}

/// Evaluate the extension rules in order; the first rule that applies decides.
pub fn evaluate_extension(
    reservation: &Reservation,
    policy: &PolicyState,
    now: DateTime<Utc>,
) -> ExtensionDecision {
    if reservation.status != ReservationStatus::Confirmed {
        return ExtensionDecision::NotConfirmed {
            status: reservation.status,
        };
    }
    if let Some(expires_at) = reservation.expires_at {
        if now >= expires_at.with_timezone(&Utc) {
            return ExtensionDecision::Expired;
        }
    }
    let policy = match policy {
        PolicyState::Unknown => return ExtensionDecision::PolicyUnknown,
        PolicyState::Known(p) => p,
    };
    if !policy.is_active {
        return ExtensionDecision::PolicyInactive;
    }
    if reservation.extension_count < policy.max_extensions {
        ExtensionDecision::Allowed {
            remaining: policy.max_extensions - reservation.extension_count,
        }
    } else {
        ExtensionDecision::LimitReached {
            used: reservation.extension_count,
            max: policy.max_extensions,
        }
    }
}

pub fn can_extend(reservation: &Reservation, policy: &PolicyState, now: DateTime<Utc>) -> bool {
    evaluate_extension(reservation, policy, now).is_allowed()
}

/// End time the reservation would have after one more extension, or `None`
/// when the policy does not state an extension step.
pub fn extended_end_time(
    reservation: &Reservation,
    policy: &ExtensionPolicy,
) -> Option<DateTime<FixedOffset>> {
    if policy.extension_minutes == 0 {
        return None;
    }
    Some(reservation.end_time + Duration::minutes(i64::from(policy.extension_minutes)))
}
