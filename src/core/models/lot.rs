use serde::{Deserialize, Serialize};

/// Recurring peak-hour window of a parking lot.
///
/// Times are wall-clock `HH:mm:ss` strings in the lot's timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHourWindow {
    /// 0 = Sunday .. 6 = Saturday
    #[serde(alias = "day_of_week")]
    pub day_of_week: u8,
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(alias = "end_time")]
    pub end_time: String,
    #[serde(default, alias = "is_active", alias = "active")]
    pub is_active: bool,
}

/// Per-lot rules for extending a confirmed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionPolicy {
    #[serde(default = "default_true", alias = "is_active", alias = "active")]
    pub is_active: bool,
    /// Minutes added per extension; 0 when the backend omits it
    #[serde(default, alias = "extension_minutes")]
    pub extension_minutes: u32,
    #[serde(default, alias = "max_extensions")]
    pub max_extensions: u32,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_peak_window_camel_case() {
        let json = r#"{
            "id": 4,
            "dayOfWeek": 1,
            "startTime": "07:00:00",
            "endTime": "09:00:00",
            "isActive": true
        }"#;
        let w: PeakHourWindow = serde_json::from_str(json).unwrap();
        assert_eq!(w.day_of_week, 1);
        assert_eq!(w.start_time, "07:00:00");
        assert!(w.is_active);
    }

    #[test]
    fn deserialize_peak_window_snake_case_inactive_by_default() {
        let json = r#"{ "day_of_week": 6, "start_time": "17:00:00", "end_time": "19:00:00" }"#;
        let w: PeakHourWindow = serde_json::from_str(json).unwrap();
        assert_eq!(w.day_of_week, 6);
        assert_eq!(w.end_time, "19:00:00");
        assert!(!w.is_active);
    }

    #[test]
    fn deserialize_policy() {
        let json = r#"{ "isActive": false, "extensionMinutes": 30, "maxExtensions": 2 }"#;
        let p: ExtensionPolicy = serde_json::from_str(json).unwrap();
        assert!(!p.is_active);
        assert_eq!(p.extension_minutes, 30);
        assert_eq!(p.max_extensions, 2);
    }

    #[test]
    fn policy_active_unless_stated_otherwise() {
        let json = r#"{ "extension_minutes": 15 }"#;
        let p: ExtensionPolicy = serde_json::from_str(json).unwrap();
        assert!(p.is_active);
        assert_eq!(p.max_extensions, 0);
    }

    #[test]
    fn disabled_policy_without_step_still_decodes() {
        let json = r#"{ "isActive": false, "maxExtensions": 0 }"#;
        let p: ExtensionPolicy = serde_json::from_str(json).unwrap();
        assert!(!p.is_active);
        assert_eq!(p.extension_minutes, 0);
    }
}
