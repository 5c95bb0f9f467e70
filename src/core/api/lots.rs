use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::core::api::cache::LotCache;
use crate::core::api::client::{ApiError, ParkingApi};
use crate::core::extension::PolicyState;
use crate::core::models::lot::{ExtensionPolicy, PeakHourWindow};

/// A failed policy lookup is treated as "not loaded".
pub fn policy_or_unknown(lot_id: &str, result: Result<PolicyState, ApiError>) -> PolicyState {
    result.unwrap_or_else(|e| {
        warn!(lot_id, error = %e, "extension policy lookup failed");
        PolicyState::Unknown
    })
}

/// A failed peak-hour lookup prices the lot as off-peak.
pub fn windows_or_empty(
    lot_id: &str,
    result: Result<Vec<PeakHourWindow>, ApiError>,
) -> Vec<PeakHourWindow> {
    result.unwrap_or_else(|e| {
        warn!(lot_id, error = %e, "peak hour lookup failed");
        Vec::new()
    })
}

async fn cached_policy<F, Fut>(
    cache: &mut LotCache<PolicyState>,
    lot_id: &str,
    fetch: F,
) -> PolicyState
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<ExtensionPolicy>, ApiError>>,
{
    let result = cache
        .get_or_fetch(lot_id, move || async move { fetch().await.map(PolicyState::from) })
        .await;
    policy_or_unknown(lot_id, result)
}

async fn cached_windows<F, Fut>(
    cache: &mut LotCache<Vec<PeakHourWindow>>,
    lot_id: &str,
    fetch: F,
) -> Vec<PeakHourWindow>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<PeakHourWindow>, ApiError>>,
{
    let result = cache.get_or_fetch(lot_id, fetch).await;
    windows_or_empty(lot_id, result)
}

/// Per-lot policy and peak-hour lookups for one view, backed by [`LotCache`].
///
/// Lookup failures degrade to the permissive defaults (unknown policy, no peak
/// windows) so a single bad lot never blocks the rest of a list.
pub struct LotLookup<'a> {
    api: &'a ParkingApi,
    policies: LotCache<PolicyState>,
    peak_hours: LotCache<Vec<PeakHourWindow>>,
}

impl<'a> LotLookup<'a> {
    pub fn new(api: &'a ParkingApi, ttl: Duration) -> Self {
        Self {
            api,
            policies: LotCache::new(ttl),
            peak_hours: LotCache::new(ttl),
        }
    }

    pub async fn policy(&mut self, lot_id: Option<&str>) -> PolicyState {
        let Some(lot_id) = lot_id else {
            return PolicyState::Unknown;
        };
        let api = self.api;
        cached_policy(&mut self.policies, lot_id, || api.extension_policy(lot_id)).await
    }

    pub async fn peak_hours(&mut self, lot_id: Option<&str>) -> Vec<PeakHourWindow> {
        let Some(lot_id) = lot_id else {
            return Vec::new();
        };
        let api = self.api;
        cached_windows(&mut self.peak_hours, lot_id, || api.peak_hours(lot_id)).await
    }
}
