use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::models::de::{lenient_flag, lenient_number};

/// Field names for each canonical pricing field, in precedence order.
/// The first key holding a usable value wins.
pub const HOURLY_RATE_KEYS: &[&str] =
    &["hourlyRate", "hourly_rate", "pricePerHour", "baseRate", "base_rate"];
pub const PEAK_MULTIPLIER_KEYS: &[&str] =
    &["peakMultiplier", "peak_multiplier", "peakRate", "peak_rate"];
pub const PEAK_ENABLED_KEYS: &[&str] =
    &["peakEnabled", "peak_enabled", "isPeakEnabled", "peakHourEnabled"];
pub const DAILY_CAP_KEYS: &[&str] =
    &["dailyCapAmount", "daily_cap_amount", "dailyCap", "daily_cap"];
pub const MONTHLY_PASS_KEYS: &[&str] = &[
    "monthlyPassAmount",
    "monthly_pass_amount",
    "monthlyPassPrice",
    "monthly_pass_price",
];

const DEFAULT_PEAK_MULTIPLIER: f64 = 1.0;

/// Pricing data frozen at reservation time, in canonical form.
///
/// Deserializing goes through [`PricingSnapshot::from_value`], so every
/// historical payload shape lands here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSnapshot {
    pub hourly_rate: f64,
    pub peak_multiplier: f64,
    pub peak_enabled: bool,
    pub daily_cap_amount: f64,
    pub monthly_pass_amount: f64,
}

impl Default for PricingSnapshot {
    fn default() -> Self {
        Self {
            hourly_rate: 0.0,
            peak_multiplier: DEFAULT_PEAK_MULTIPLIER,
            peak_enabled: false,
            daily_cap_amount: 0.0,
            monthly_pass_amount: 0.0,
        }
    }
}

fn first_present<T>(
    fields: &Map<String, Value>,
    keys: &[&str],
    parse: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|key| fields.get(*key).and_then(&parse))
}

impl PricingSnapshot {
    /// Normalize a snapshot object of any known shape.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let defaults = Self::default();
        Self {
            hourly_rate: first_present(fields, HOURLY_RATE_KEYS, lenient_number)
                .unwrap_or(defaults.hourly_rate),
            // A negative multiplier is nonsense, fall through to the next key.
            peak_multiplier: first_present(fields, PEAK_MULTIPLIER_KEYS, |v| {
                lenient_number(v).filter(|m| *m >= 0.0)
            })
            .unwrap_or(defaults.peak_multiplier),
            peak_enabled: first_present(fields, PEAK_ENABLED_KEYS, lenient_flag)
                .unwrap_or(defaults.peak_enabled),
            daily_cap_amount: first_present(fields, DAILY_CAP_KEYS, lenient_number)
                .unwrap_or(defaults.daily_cap_amount),
            monthly_pass_amount: first_present(fields, MONTHLY_PASS_KEYS, lenient_number)
                .unwrap_or(defaults.monthly_pass_amount),
        }
    }

    /// Non-object values normalize to the defaults.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for PricingSnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
