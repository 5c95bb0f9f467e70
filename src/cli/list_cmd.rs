use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::api::client::ParkingApi;
use crate::core::api::lots::LotLookup;
use crate::core::api::query::ReservationQuery;
use crate::core::config::AppConfig;
use crate::core::models::status::ReservationStatus;
use crate::core::report::{build_report, ReservationReport};

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only reservations in this status (confirmed, checked_in, ...)
    #[arg(short, long, value_parser = parse_status)]
    pub status: Option<ReservationStatus>,

    /// Parking lot ID
    #[arg(short, long)]
    pub lot: Option<String>,

    /// User ID
    #[arg(short, long)]
    pub user: Option<String>,

    /// Earliest start date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest start date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Zero-based page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub size: Option<u32>,
}

fn parse_status(raw: &str) -> Result<ReservationStatus, String> {
    ReservationStatus::from_id(raw).ok_or_else(|| {
        format!(
            "unknown status '{}' (confirmed, checked_in, checked_out, cancelled, expired)",
            raw
        )
    })
}

impl ListArgs {
    fn to_query(&self) -> ReservationQuery {
        ReservationQuery {
            status: self.status,
            parking_lot_id: self.lot.clone(),
            user_id: self.user.clone(),
            from: self.from,
            to: self.to,
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    items: &'a [ReservationReport],
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
}

pub async fn run(args: ListArgs, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let api = ParkingApi::from_config(&config.api)?;
    let query = args.to_query();
    let page = api
        .reservations(&query)
        .await
        .context("failed to list reservations")?;
    debug!(count = page.items.len(), total = ?page.total, "fetched reservation page");

    let now = Utc::now();
    let clock = config.lot_clock();
    let mut lots = LotLookup::new(&api, Duration::from_secs(config.api.cache_ttl_secs));
    let mut reports = Vec::with_capacity(page.items.len());

    for reservation in page.items {
        let lot_id = reservation.parking_lot_id.clone();
        let peak_hours = lots.peak_hours(lot_id.as_deref()).await;
        let policy = lots.policy(lot_id.as_deref()).await;
        reports.push(build_report(reservation, &peak_hours, &policy, clock, now));
    }

    match opts.format {
        OutputFormat::Json => print_json(
            &ListOutput {
                items: &reports,
                total: page.total,
                page: page.page,
                size: page.size,
            },
            opts,
        ),
        OutputFormat::Text => {
            println!(
                "{}",
                renderer::render_list(&reports, clock, page.total, page.page, opts.use_color)
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_accepts_spellings() {
        assert_eq!(parse_status("checked-in"), Ok(ReservationStatus::CheckedIn));
        assert_eq!(parse_status("CANCELLED"), Ok(ReservationStatus::Cancelled));
        assert!(parse_status("parked").unwrap_err().contains("unknown status"));
    }

    #[test]
    fn args_map_onto_query() {
        let args = ListArgs {
            status: Some(ReservationStatus::Confirmed),
            lot: Some("3".to_string()),
            page: Some(1),
            size: Some(20),
            ..Default::default()
        };
        let pairs = args.to_query().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("status", "confirmed".to_string()),
                ("parkingLotId", "3".to_string()),
                ("page", "1".to_string()),
                ("size", "20".to_string()),
            ]
        );
    }
}
