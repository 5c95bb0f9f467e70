use serde::{Deserialize, Serialize};

/// Reservation status as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[serde(alias = "CONFIRMED")]
    Confirmed,
    #[serde(alias = "CHECKED_IN", alias = "checkedIn")]
    CheckedIn,
    #[serde(alias = "CHECKED_OUT", alias = "checkedOut")]
    CheckedOut,
    #[serde(alias = "CANCELLED", alias = "canceled", alias = "CANCELED")]
    Cancelled,
    #[serde(alias = "EXPIRED")]
    Expired,
}

impl ReservationStatus {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().replace('-', "_").as_str() {
            "confirmed" => Some(Self::Confirmed),
            "checked_in" | "checkedin" => Some(Self::CheckedIn),
            "checked_out" | "checkedout" => Some(Self::CheckedOut),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "Confirmed"),
            Self::CheckedIn => write!(f, "Checked in"),
            Self::CheckedOut => write!(f, "Checked out"),
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}
