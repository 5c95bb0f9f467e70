use chrono::{DateTime, Utc};
use colored::{control, Colorize};

use crate::core::clock::LotClock;
use crate::core::formatter::{
    format_amount, format_duration, format_expiry, format_money, format_wall_clock, format_window,
};
use crate::core::lifecycle::Action;
use crate::core::report::ReservationReport;

fn label(text: &str) -> String {
    format!("  {:<10} ", text).cyan().to_string()
}

fn reservation_title(report: &ReservationReport) -> String {
    match &report.reservation.id {
        Some(id) => format!("Reservation {}", id),
        None => "Reservation".to_string(),
    }
}

fn action_list(actions: &[Action]) -> String {
    if actions.is_empty() {
        return "none".to_string();
    }
    actions
        .iter()
        .map(|a| a.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a single reservation with its charge breakdown.
///
/// Layout:
/// ```text
///  Reservation 812 (Confirmed)
///   Plate      51A-123.45
///   Start      Mon 2024-01-01 08:00
///   Duration   1h
///   Rate       15,000 / h
///   Peak       x1.5 in Mon 07:00:00-09:00:00
///   Charge     22,500
///   Hold       Expires in 12m
///   Extend     yes, 1 extension left (ends Mon 2024-01-01 09:30)
///   Actions    Check in, Cancel, Extend
/// ```
pub fn render_report(
    report: &ReservationReport,
    clock: LotClock,
    now: DateTime<Utc>,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    let r = &report.reservation;
    let e = &report.estimate;
    let mut lines: Vec<String> = Vec::new();

    lines.push(
        format!(" {} ({})", reservation_title(report), r.status)
            .bold()
            .to_string(),
    );
    if let Some(plate) = &r.license_plate {
        lines.push(format!("{}{}", label("Plate"), plate));
    }
    if let Some(lot) = &r.parking_lot_id {
        lines.push(format!("{}{}", label("Lot"), lot));
    }
    lines.push(format!(
        "{}{}",
        label("Start"),
        format_wall_clock(&clock.wall_clock(&r.start_time))
    ));
    lines.push(format!("{}{}", label("Duration"), format_duration(e.duration_minutes)));

    if report.has_pricing() {
        lines.push(format!("{}{} / h", label("Rate"), format_amount(e.hourly_rate)));
        let peak = match &e.peak_window {
            Some(w) => format!("x{} in {}", e.multiplier, format_window(w)),
            None if report.starts_in_peak => "peak window, not priced".to_string(),
            None => "off-peak".to_string(),
        };
        lines.push(format!("{}{}", label("Peak"), peak));
        lines.push(format!(
            "{}{}",
            label("Charge"),
            format_money(e.total).green().bold()
        ));
        if e.daily_cap_amount > 0.0 {
            let cap = format_amount(e.daily_cap_amount);
            let cap = if e.exceeds_daily_cap {
                format!("{} (exceeded, not applied)", cap).yellow().to_string()
            } else {
                cap
            };
            lines.push(format!("{}{}", label("Daily cap"), cap));
        }
        if e.monthly_pass_amount > 0.0 {
            lines.push(format!(
                "{}{}",
                label("Monthly"),
                format_amount(e.monthly_pass_amount)
            ));
        }
    } else {
        lines.push(format!("{}{}", label("Charge"), "no pricing snapshot".yellow()));
    }

    if let Some(expires_at) = &r.expires_at {
        lines.push(format!("{}{}", label("Hold"), format_expiry(expires_at, now)));
    }

    let extend = if report.can_extend() {
        let mut text = format!("yes, {}", report.extension.reason());
        if let Some(end) = &report.extended_end_time {
            text.push_str(&format!(" (ends {})", format_wall_clock(&clock.wall_clock(end))));
        }
        text.green().to_string()
    } else {
        format!("no, {}", report.extension.reason()).red().to_string()
    };
    lines.push(format!("{}{}", label("Extend"), extend));
    lines.push(format!("{}{}", label("Actions"), action_list(&report.actions)));

    lines.join("\n")
}

/// Render a page of reservations as a table.
pub fn render_list(
    reports: &[ReservationReport],
    clock: LotClock,
    total: Option<u64>,
    page: Option<u32>,
    use_color: bool,
) -> String {
    control::set_override(use_color);

    if reports.is_empty() {
        return " No reservations found.".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    lines.push(
        format!(
            " {:<8} {:<12} {:<12} {:<21} {:>8} {:>12}  {}",
            "ID", "Status", "Plate", "Start", "Duration", "Charge", "Extend"
        )
        .bold()
        .to_string(),
    );

    for report in reports {
        let r = &report.reservation;
        let row = format!(
            " {:<8} {:<12} {:<12} {:<21} {:>8} {:>12}  ",
            r.id.as_deref().unwrap_or("-"),
            r.status.to_string(),
            r.license_plate.as_deref().unwrap_or("-"),
            format_wall_clock(&clock.wall_clock(&r.start_time)),
            format_duration(report.estimate.duration_minutes),
            format_money(report.estimate.total),
        );
        let extend = if report.can_extend() {
            "yes".green()
        } else {
            "no".red()
        };
        let row = if r.status.is_terminal() {
            row.dimmed().to_string()
        } else {
            row
        };
        lines.push(format!("{}{}", row, extend));
    }

    let mut footer = format!(" {} shown", reports.len());
    if let Some(total) = total {
        footer.push_str(&format!(" of {}", total));
    }
    if let Some(page) = page {
        footer.push_str(&format!(", page {}", page));
    }
    lines.push(String::new());
    lines.push(footer);

    lines.join("\n")
}
