use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::core::models::lot::PeakHourWindow;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Whole currency units with thousands separators: `1234567` -> `"1,234,567"`.
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Fractional amounts as shown in a breakdown, rounded for display only.
pub fn format_amount(amount: f64) -> String {
    format_money(amount.round() as i64)
}

/// Returns "2h 15m", "45m", or "3d 4h" for longer stays.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours >= 24 {
        let days = hours / 24;
        let remaining_hours = hours % 24;
        if remaining_hours == 0 {
            format!("{}d", days)
        } else {
            format!("{}d {}h", days, remaining_hours)
        }
    } else if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", mins)
    }
}

/// Returns "Expires in Xh Ym" relative to `now`, or "Expired" once past.
pub fn format_expiry(expires_at: &DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let total_seconds = (expires_at.with_timezone(&Utc) - now).num_seconds();
    if total_seconds <= 0 {
        return "Expired".to_string();
    }
    let total_minutes = u32::try_from(total_seconds / 60).unwrap_or(u32::MAX);
    format!("Expires in {}", format_duration(total_minutes.max(1)))
}

/// Returns "Mon 07:00:00-09:00:00".
pub fn format_window(window: &PeakHourWindow) -> String {
    let day = WEEKDAYS
        .get(usize::from(window.day_of_week))
        .copied()
        .unwrap_or("?");
    format!("{} {}-{}", day, window.start_time, window.end_time)
}

/// Returns "Mon 2024-01-01 08:00".
pub fn format_wall_clock(wall_clock: &NaiveDateTime) -> String {
    wall_clock.format("%a %Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0), "0");
        assert_eq!(format_money(999), "999");
        assert_eq!(format_money(22500), "22,500");
        assert_eq!(format_money(1_234_567), "1,234,567");
        assert_eq!(format_money(-30000), "-30,000");
    }

    #[test]
    fn format_amount_rounds() {
        assert_eq!(format_amount(1166.67), "1,167");
        assert_eq!(format_amount(0.2), "0");
    }

    #[test]
    fn format_duration_units() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(135), "2h 15m");
        assert_eq!(format_duration(24 * 60), "1d");
        assert_eq!(format_duration(26 * 60 + 5), "1d 2h");
    }

    #[test]
    fn format_expiry_past_and_future() {
        let now = Utc::now();
        let past: DateTime<FixedOffset> = (now - Duration::seconds(5)).into();
        assert_eq!(format_expiry(&past, now), "Expired");

        let soon: DateTime<FixedOffset> = (now + Duration::minutes(75)).into();
        assert_eq!(format_expiry(&soon, now), "Expires in 1h 15m");

        let seconds_away: DateTime<FixedOffset> = (now + Duration::seconds(20)).into();
        assert_eq!(format_expiry(&seconds_away, now), "Expires in 1m");
    }

    #[test]
    fn format_window_names_day() {
        let w = PeakHourWindow {
            day_of_week: 0,
            start_time: "10:00:00".to_string(),
            end_time: "12:00:00".to_string(),
            is_active: true,
        };
        assert_eq!(format_window(&w), "Sun 10:00:00-12:00:00");
        let odd = PeakHourWindow { day_of_week: 9, ..w };
        assert!(format_window(&odd).starts_with("? "));
    }

    #[test]
    fn format_wall_clock_layout() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(format_wall_clock(&t), "Mon 2024-01-01 08:00");
    }
}
