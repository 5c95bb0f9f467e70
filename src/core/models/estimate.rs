use serde::{Deserialize, Serialize};

use crate::core::models::lot::PeakHourWindow;

/// Breakdown of an estimated reservation charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeEstimate {
    pub duration_minutes: u32,
    pub hourly_rate: f64,
    /// Rate times fractional hours, before any peak multiplier
    pub base_amount: f64,
    pub multiplier: f64,
    /// Window that triggered the peak multiplier, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_window: Option<PeakHourWindow>,
    /// Rounded charge in whole currency units
    pub total: i64,
    pub daily_cap_amount: f64,
    /// The total is never clamped to the cap; this only flags it
    pub exceeds_daily_cap: bool,
    pub monthly_pass_amount: f64,
}

impl ChargeEstimate {
    pub fn peak_applied(&self) -> bool {
        self.peak_window.is_some()
    }
}
