use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::api::client::ParkingApi;
use crate::core::api::lots::{policy_or_unknown, windows_or_empty};
use crate::core::config::AppConfig;
use crate::core::extension::PolicyState;
use crate::core::models::de::parse_timestamp;
use crate::core::models::lot::{ExtensionPolicy, PeakHourWindow};
use crate::core::models::reservation::Reservation;
use crate::core::pricing::snapshot::PricingSnapshot;
use crate::core::report::{build_report, ReservationReport};

/// Offline input for `pkw estimate --file`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReservationBundle {
    reservation: Reservation,
    #[serde(default, alias = "pricing_snapshot")]
    pricing_snapshot: Option<PricingSnapshot>,
    #[serde(default, alias = "peak_hours")]
    peak_hours: Vec<PeakHourWindow>,
    #[serde(default, alias = "extension_policy")]
    extension_policy: Option<ExtensionPolicy>,
}

impl ReservationBundle {
    /// A top-level snapshot takes precedence over one embedded in the reservation.
    fn into_parts(self) -> (Reservation, Vec<PeakHourWindow>, PolicyState) {
        let mut reservation = self.reservation;
        if self.pricing_snapshot.is_some() {
            reservation.pricing_snapshot = self.pricing_snapshot;
        }
        (
            reservation,
            self.peak_hours,
            PolicyState::from(self.extension_policy),
        )
    }
}

fn load_bundle(path: &Path) -> Result<ReservationBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse reservation bundle {}", path.display()))
}

fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => match parse_timestamp(raw) {
            Some(ts) => Ok(ts.with_timezone(&Utc)),
            None => bail!("invalid --at timestamp '{}' (expected RFC 3339)", raw),
        },
    }
}

/// Peak hours and extension policy for a reservation's lot, fetched together.
/// Either lookup failing degrades to its permissive default.
pub async fn lot_context(
    api: &ParkingApi,
    reservation: &Reservation,
) -> (Vec<PeakHourWindow>, PolicyState) {
    let Some(lot_id) = reservation.parking_lot_id.as_deref() else {
        debug!("reservation has no lot id, using permissive defaults");
        return (Vec::new(), PolicyState::Unknown);
    };

    let (peak_hours, policy) = tokio::join!(api.peak_hours(lot_id), api.extension_policy(lot_id));

    (
        windows_or_empty(lot_id, peak_hours),
        policy_or_unknown(lot_id, policy.map(PolicyState::from)),
    )
}

pub fn print_report(
    report: &ReservationReport,
    config: &AppConfig,
    now: DateTime<Utc>,
    opts: &OutputOptions,
) -> Result<()> {
    match opts.format {
        OutputFormat::Json => print_json(report, opts),
        OutputFormat::Text => {
            println!(
                "{}",
                renderer::render_report(report, config.lot_clock(), now, opts.use_color)
            );
            Ok(())
        }
    }
}

pub async fn run(
    id: Option<String>,
    file: Option<PathBuf>,
    at: Option<String>,
    config: &AppConfig,
    opts: &OutputOptions,
) -> Result<()> {
    let now = resolve_now(at.as_deref())?;

    let (reservation, peak_hours, policy) = match (id, file) {
        (_, Some(path)) => load_bundle(&path)?.into_parts(),
        (Some(id), None) => {
            let api = ParkingApi::from_config(&config.api)?;
            let reservation = api
                .reservation(&id)
                .await
                .with_context(|| format!("failed to fetch reservation {}", id))?;
            let (peak_hours, policy) = lot_context(&api, &reservation).await;
            (reservation, peak_hours, policy)
        }
        (None, None) => bail!("pass a reservation ID or --file <bundle.json>"),
    };

    if reservation.pricing_snapshot.is_none() {
        warn!("reservation carries no pricing snapshot, charge shown as 0");
    }

    let report = build_report(reservation, &peak_hours, &policy, config.lot_clock(), now);
    print_report(&report, config, now, opts)
}
