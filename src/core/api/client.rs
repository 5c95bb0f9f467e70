use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::api::query::{ListPayload, ReservationPage, ReservationQuery};
use crate::core::config::ApiConfig;
use crate::core::lifecycle::Action;
use crate::core::models::lot::{ExtensionPolicy, PeakHourWindow};
use crate::core::models::reservation::Reservation;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No API base URL configured (set api.base_url or PARKWISE_API_URL)")]
    MissingBaseUrl,
    #[error("{0}")]
    InvalidEndpoint(String),
    #[error("Unauthorized - check your PARKWISE_TOKEN")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("HTTP {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Validate that a base URL is safe to send the bearer token to.
///
/// HTTPS is required, except for plain HTTP to a loopback host during development.
pub fn validate_endpoint(url: &str) -> Result<(), ApiError> {
    if url.starts_with("https://") {
        return Ok(());
    }
    if let Some(rest) = url.strip_prefix("http://") {
        let authority = rest.split('/').next().unwrap_or_default();
        let host = if authority.starts_with('[') {
            authority.split(']').next().map(|h| h.trim_start_matches('['))
        } else {
            authority.split(':').next()
        };
        if matches!(host, Some("localhost" | "127.0.0.1" | "::1")) {
            return Ok(());
        }
    }
    Err(ApiError::InvalidEndpoint(format!(
        "endpoint must use HTTPS, got: {}",
        url
    )))
}

/// Responses come either bare or wrapped in `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(inner) => inner,
        }
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
}

fn decode_windows(url: &str, entries: Vec<Value>) -> Vec<PeakHourWindow> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!(%url, index, error = %e, "skipping malformed peak hour window");
                None
            }
        })
        .collect()
}

/// A 404 or a `null` body means the lot has no policy.
fn decode_policy(
    url: &str,
    response: Result<Value, ApiError>,
) -> Result<Option<ExtensionPolicy>, ApiError> {
    let value = match response {
        Ok(v) => v,
        Err(ApiError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
}

/// Client for the parking backend's REST endpoints.
pub struct ParkingApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ParkingApi {
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ApiError::MissingBaseUrl)?;
        validate_endpoint(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<String, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.header("Accept", "application/json").send().await?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "response");
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response.text().await?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");
        let body = self.send(self.client.get(&url).query(query), &url).await?;
        decode(&url, &body)
    }

    pub async fn reservation(&self, id: &str) -> Result<Reservation, ApiError> {
        self.get(&format!("reservations/{}", id), &[]).await
    }

    pub async fn reservations(&self, query: &ReservationQuery) -> Result<ReservationPage, ApiError> {
        let payload: ListPayload<Reservation> = self.get("reservations", &query.to_pairs()).await?;
        Ok(payload.into())
    }

    /// Windows that fail to decode are skipped; the rest are kept.
    pub async fn peak_hours(&self, lot_id: &str) -> Result<Vec<PeakHourWindow>, ApiError> {
        let path = format!("parking-lots/{}/peak-hours", lot_id);
        let entries: Vec<Value> = self.get(&path, &[]).await?;
        Ok(decode_windows(&self.url(&path), entries))
    }

    /// `None` when the lot has no policy on record.
    pub async fn extension_policy(&self, lot_id: &str) -> Result<Option<ExtensionPolicy>, ApiError> {
        let path = format!("extension-policies/lot/{}", lot_id);
        let response = self.get(&path, &[]).await;
        decode_policy(&self.url(&path), response)
    }

    /// Issue a reservation command. The server decides whether it is legal.
    pub async fn send_command(&self, id: &str, action: Action) -> Result<(), ApiError> {
        let url = self.url(&format!("reservations/{}/{}", id, action.path_segment()));
        debug!(%url, ?action, "POST");
        self.send(self.client.post(&url), &url).await?;
        Ok(())
    }
}
