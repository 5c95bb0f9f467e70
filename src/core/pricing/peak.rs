use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};

use crate::core::models::lot::PeakHourWindow;

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}

impl PeakHourWindow {
    /// Whether a wall-clock time falls in `[start, end)` on this window's weekday.
    ///
    /// Windows with `start > end` (crossing midnight) and windows with
    /// unparseable times never match.
    pub fn contains(&self, wall_clock: NaiveDateTime) -> bool {
        if !self.is_active {
            return false;
        }
        if u32::from(self.day_of_week) != wall_clock.weekday().num_days_from_sunday() {
            return false;
        }
        let (Some(start), Some(end)) = (
            parse_time_of_day(&self.start_time),
            parse_time_of_day(&self.end_time),
        ) else {
            return false;
        };
        // Windows are defined to the second.
        let time = wall_clock.time();
        let time = time.with_nanosecond(0).unwrap_or(time);
        start <= time && time < end
    }
}

/// First window matching the wall-clock time, if any.
pub fn matching_window(
    wall_clock: NaiveDateTime,
    windows: &[PeakHourWindow],
) -> Option<&PeakHourWindow> {
    windows.iter().find(|w| w.contains(wall_clock))
}

pub fn is_peak(wall_clock: NaiveDateTime, windows: &[PeakHourWindow]) -> bool {
    matching_window(wall_clock, windows).is_some()
}
