use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::core::clock::LotClock;
use crate::core::extension::{self, ExtensionDecision, PolicyState};
use crate::core::lifecycle::Action;
use crate::core::models::estimate::ChargeEstimate;
use crate::core::models::lot::PeakHourWindow;
use crate::core::models::reservation::Reservation;
use crate::core::pricing::{charge, peak};

/// Everything the caller needs to render one reservation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationReport {
    pub reservation: Reservation,
    pub estimate: ChargeEstimate,
    /// Start falls in a peak window, whether or not the snapshot prices it
    pub starts_in_peak: bool,
    pub extension: ExtensionDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_end_time: Option<DateTime<FixedOffset>>,
    pub actions: Vec<Action>,
}

impl ReservationReport {
    pub fn can_extend(&self) -> bool {
        self.extension.is_allowed()
    }

    pub fn has_pricing(&self) -> bool {
        self.reservation.pricing_snapshot.is_some()
    }
}

/// Run the pricing and eligibility evaluation over one self-consistent snapshot.
pub fn build_report(
    reservation: Reservation,
    peak_windows: &[PeakHourWindow],
    policy: &PolicyState,
    clock: LotClock,
    now: DateTime<Utc>,
) -> ReservationReport {
    let snapshot = reservation.pricing_snapshot.unwrap_or_default();
    let start = clock.wall_clock(&reservation.start_time);

    let estimate = charge::estimate(
        &snapshot,
        Some(reservation.effective_duration_minutes()),
        Some(start),
        peak_windows,
    );
    let decision = extension::evaluate_extension(&reservation, policy, now);
    let extended_end_time = match (decision.is_allowed(), policy.policy()) {
        (true, Some(p)) => extension::extended_end_time(&reservation, p),
        _ => None,
    };

    let actions = reservation
        .status
        .allowed_actions()
        .into_iter()
        .filter(|a| *a != Action::Extend || decision.is_allowed())
        .collect();

    ReservationReport {
        starts_in_peak: peak::is_peak(start, peak_windows),
        estimate,
        extension: decision,
        extended_end_time,
        actions,
        reservation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lot::ExtensionPolicy;

    fn reservation(json: &str) -> Reservation {
        serde_json::from_str(json).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn morning_peak() -> Vec<PeakHourWindow> {
        vec![PeakHourWindow {
            day_of_week: 1,
            start_time: "07:00:00".to_string(),
            end_time: "09:00:00".to_string(),
            is_active: true,
        }]
    }

    #[test]
    fn peak_is_matched_in_lot_timezone() {
        // 01:00Z on Monday is 08:00 in Ho Chi Minh City.
        let r = reservation(
            r#"{
                "status": "confirmed",
                "startTime": "2024-01-01T01:00:00Z",
                "endTime": "2024-01-01T02:00:00Z",
                "pricingSnapshot": { "hourlyRate": 15000, "peakMultiplier": 1.5, "peakEnabled": true }
            }"#,
        );
        let clock = LotClock::Zone(chrono_tz::Asia::Ho_Chi_Minh);
        let report = build_report(r.clone(), &morning_peak(), &PolicyState::Unknown, clock, now());
        assert_eq!(report.estimate.total, 22500);
        assert!(report.starts_in_peak);

        let report = build_report(r, &morning_peak(), &PolicyState::Unknown, LotClock::Zone(chrono_tz::UTC), now());
        assert_eq!(report.estimate.total, 15000);
        assert!(!report.starts_in_peak);
    }

    #[test]
    fn missing_snapshot_prices_at_zero() {
        let r = reservation(
            r#"{ "status": "confirmed", "startTime": "2024-01-01T01:00:00Z", "endTime": "2024-01-01T05:00:00Z" }"#,
        );
        let report = build_report(r, &[], &PolicyState::Unknown, LotClock::Zone(chrono_tz::UTC), now());
        assert!(!report.has_pricing());
        assert_eq!(report.estimate.total, 0);
        assert_eq!(report.estimate.duration_minutes, 240);
    }

    #[test]
    fn extend_action_follows_decision() {
        let r = reservation(
            r#"{ "status": "confirmed", "startTime": "2024-01-01T01:00:00Z",
                 "endTime": "2024-01-01T02:00:00Z", "extensionCount": 2 }"#,
        );
        let exhausted = PolicyState::Known(ExtensionPolicy {
            is_active: true,
            extension_minutes: 30,
            max_extensions: 2,
        });
        let report = build_report(r.clone(), &[], &exhausted, LotClock::Local, now());
        assert!(!report.can_extend());
        assert!(!report.actions.contains(&Action::Extend));
        assert!(report.actions.contains(&Action::Cancel));
        assert!(report.extended_end_time.is_none());

        let roomy = PolicyState::Known(ExtensionPolicy {
            is_active: true,
            extension_minutes: 30,
            max_extensions: 3,
        });
        let report = build_report(r, &[], &roomy, LotClock::Local, now());
        assert!(report.can_extend());
        assert!(report.actions.contains(&Action::Extend));
        assert_eq!(
            report.extended_end_time.unwrap(),
            DateTime::parse_from_rfc3339("2024-01-01T02:30:00Z").unwrap()
        );
    }

    #[test]
    fn unknown_policy_offers_extend_without_new_end_time() {
        let r = reservation(
            r#"{ "status": "confirmed", "startTime": "2024-01-01T01:00:00Z", "endTime": "2024-01-01T02:00:00Z" }"#,
        );
        let report = build_report(r, &[], &PolicyState::Unknown, LotClock::Local, now());
        assert!(report.actions.contains(&Action::Extend));
        assert!(report.extended_end_time.is_none());
    }
}
