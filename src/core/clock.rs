use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Timezone in which a lot's peak-hour windows are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotClock {
    Local,
    Zone(Tz),
}

impl LotClock {
    /// Parse a `settings.timezone` value: `local` or an IANA name.
    pub fn from_setting(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("local") {
            return Some(Self::Local);
        }
        value.parse::<Tz>().ok().map(Self::Zone)
    }

    /// Wall-clock reading of `instant` in the lot's timezone.
    pub fn wall_clock<T: TimeZone>(&self, instant: &DateTime<T>) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&Local).naive_local(),
            Self::Zone(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::de::parse_timestamp;
    use chrono::Timelike;

    #[test]
    fn from_setting_values() {
        assert_eq!(LotClock::from_setting("local"), Some(LotClock::Local));
        assert_eq!(LotClock::from_setting("LOCAL"), Some(LotClock::Local));
        assert_eq!(
            LotClock::from_setting("Asia/Ho_Chi_Minh"),
            Some(LotClock::Zone(chrono_tz::Asia::Ho_Chi_Minh))
        );
        assert_eq!(LotClock::from_setting("Mars/Olympus"), None);
    }

    #[test]
    fn wall_clock_converts_into_zone() {
        let clock = LotClock::Zone(chrono_tz::Asia::Ho_Chi_Minh);
        let instant = parse_timestamp("2024-01-01T01:00:00Z").unwrap();
        assert_eq!(clock.wall_clock(&instant).hour(), 8);

        let clock = LotClock::Zone(chrono_tz::UTC);
        assert_eq!(clock.wall_clock(&instant).hour(), 1);
    }
}
