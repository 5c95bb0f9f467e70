use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::estimate_cmd::{lot_context, print_report};
use crate::cli::output::OutputOptions;
use crate::core::api::client::ParkingApi;
use crate::core::config::AppConfig;
use crate::core::extension::{can_extend, evaluate_extension};
use crate::core::lifecycle::{gate, Action, Gate};
use crate::core::report::build_report;

/// Send `action` for reservation `id`, then re-fetch and print it.
///
/// Client-side checks only warn. The command always reaches the backend,
/// which has the final say.
pub async fn run(id: &str, action: Action, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let api = ParkingApi::from_config(&config.api)?;

    match api.reservation(id).await {
        Ok(current) => {
            if let Gate::Advisory(reason) = gate(current.status, action) {
                warn!(reservation = id, "{}", reason);
            } else if action == Action::Extend {
                let (_, policy) = lot_context(&api, &current).await;
                let now = Utc::now();
                if !can_extend(&current, &policy, now) {
                    let decision = evaluate_extension(&current, &policy, now);
                    warn!(reservation = id, "extension not expected to succeed: {}", decision.reason());
                }
            }
        }
        Err(e) => warn!(reservation = id, error = %e, "pre-check skipped"),
    }

    api.send_command(id, action)
        .await
        .with_context(|| format!("{} failed for reservation {}", action.display_name(), id))?;
    info!(reservation = id, ?action, "command accepted");

    let refreshed = api
        .reservation(id)
        .await
        .with_context(|| format!("failed to refresh reservation {}", id))?;
    if refreshed.status != action.resulting_status() {
        warn!(
            reservation = id,
            expected = %action.resulting_status(),
            actual = %refreshed.status,
            "status after command differs from expected"
        );
    }

    let now = Utc::now();
    let (peak_hours, policy) = lot_context(&api, &refreshed).await;
    let report = build_report(refreshed, &peak_hours, &policy, config.lot_clock(), now);
    print_report(&report, config, now, opts)
}
