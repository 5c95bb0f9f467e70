use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::core::models::de;
use crate::core::models::status::ReservationStatus;
use crate::core::pricing::snapshot::PricingSnapshot;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(
        default,
        alias = "reservation_id",
        alias = "reservationId",
        deserialize_with = "de::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        alias = "parking_lot_id",
        alias = "lotId",
        deserialize_with = "de::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parking_lot_id: Option<String>,
    #[serde(
        default,
        alias = "license_plate",
        alias = "plateNumber",
        skip_serializing_if = "Option::is_none"
    )]
    pub license_plate: Option<String>,
    pub status: ReservationStatus,
    #[serde(alias = "start_time", deserialize_with = "de::timestamp")]
    pub start_time: DateTime<FixedOffset>,
    #[serde(alias = "end_time", deserialize_with = "de::timestamp")]
    pub end_time: DateTime<FixedOffset>,
    #[serde(
        default,
        alias = "expires_at",
        deserialize_with = "de::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_at: Option<DateTime<FixedOffset>>,
    #[serde(default, alias = "extension_count")]
    pub extension_count: u32,
    #[serde(default, alias = "duration_minutes", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(
        default,
        alias = "pricing_snapshot",
        alias = "pricing",
        skip_serializing_if = "Option::is_none"
    )]
    pub pricing_snapshot: Option<PricingSnapshot>,
}

impl Reservation {
    /// Duration in whole minutes, derived from start/end when the backend omits it.
    /// A reversed interval yields 0.
    pub fn effective_duration_minutes(&self) -> u32 {
        if let Some(minutes) = self.duration_minutes {
            return minutes;
        }
        let minutes = (self.end_time - self.start_time).num_minutes();
        u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Reservation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn deserialize_camel_case_detail() {
        let r = parse(
            r#"{
                "id": 812,
                "parkingLotId": 3,
                "licensePlate": "51A-123.45",
                "status": "confirmed",
                "startTime": "2024-01-01T08:00:00+07:00",
                "endTime": "2024-01-01T10:00:00+07:00",
                "expiresAt": "2024-01-01T08:15:00+07:00",
                "extensionCount": 1,
                "pricingSnapshot": { "hourlyRate": 15000 }
            }"#,
        );
        assert_eq!(r.id.as_deref(), Some("812"));
        assert_eq!(r.parking_lot_id.as_deref(), Some("3"));
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.extension_count, 1);
        assert!(r.expires_at.is_some());
        let snapshot = r.pricing_snapshot.unwrap();
        assert!((snapshot.hourly_rate - 15000.0).abs() < 1e-9);
    }

    #[test]
    fn deserialize_snake_case_minimal() {
        let r = parse(
            r#"{
                "reservation_id": "a1b2",
                "status": "CHECKED_IN",
                "start_time": "2024-01-01T08:00:00Z",
                "end_time": "2024-01-01T09:00:00Z",
                "expires_at": null
            }"#,
        );
        assert_eq!(r.id.as_deref(), Some("a1b2"));
        assert_eq!(r.status, ReservationStatus::CheckedIn);
        assert_eq!(r.extension_count, 0);
        assert!(r.expires_at.is_none());
        assert!(r.pricing_snapshot.is_none());
    }

    #[test]
    fn duration_is_derived_when_absent() {
        let r = parse(
            r#"{
                "status": "confirmed",
                "startTime": "2024-01-01T08:00:00Z",
                "endTime": "2024-01-01T10:29:59Z"
            }"#,
        );
        assert_eq!(r.effective_duration_minutes(), 149);
    }

    #[test]
    fn explicit_duration_wins() {
        let r = parse(
            r#"{
                "status": "confirmed",
                "startTime": "2024-01-01T08:00:00Z",
                "endTime": "2024-01-01T10:00:00Z",
                "durationMinutes": 90
            }"#,
        );
        assert_eq!(r.effective_duration_minutes(), 90);
    }

    #[test]
    fn reversed_interval_has_zero_duration() {
        let r = parse(
            r#"{
                "status": "confirmed",
                "startTime": "2024-01-01T10:00:00Z",
                "endTime": "2024-01-01T08:00:00Z"
            }"#,
        );
        assert_eq!(r.effective_duration_minutes(), 0);
    }

    #[test]
    fn rejects_unparseable_start_time() {
        let result: Result<Reservation, _> = serde_json::from_str(
            r#"{ "status": "confirmed", "startTime": "soon", "endTime": "2024-01-01T08:00:00Z" }"#,
        );
        assert!(result.is_err());
    }
}
