//! Fleet cloud API HTTP client.

use anyhow::{Context, Result};
use reqwest::{Client, IntoUrl, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

use scout_core::models::{FleetDataFile, FleetFlight};

pub const DEFAULT_FLEET_API_BASE: &str = "https://api.skydio.com";

/// HTTP client for the drone-fleet cloud API (v0, organization tokens).
#[derive(Clone)]
pub struct FleetClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) api_token: Option<String>,
    pub(crate) request_id: Option<String>,
}

impl FleetClient {
    /// Create a new fleet client.
    /// An empty token is treated as missing; requests are then sent unauthenticated.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: token
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            request_id: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Copy of this client that tags upstream calls with `X-Request-ID`.
    pub fn with_request_id(&self, request_id: Option<String>) -> Self {
        let mut client = self.clone();
        client.request_id = request_id
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        client
    }

    /// `{base}/api/v0/flight/{id}[/{suffix}]`, with the ID encoded as a single
    /// path segment so `/`, `?` and `#` in it stay literal.
    fn flight_url(&self, flight_id: &str, suffix: Option<&str>) -> Result<Url> {
        if matches!(flight_id, "" | "." | "..") {
            anyhow::bail!("Invalid flight ID: {:?}", flight_id);
        }
        let mut url = Url::parse(&self.base_url).context("Invalid fleet API base URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Fleet API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["api", "v0", "flight"])
            .push(flight_id)
            .extend(suffix);
        Ok(url)
    }

    /// GET with the organization token sent verbatim (no `Bearer` prefix).
    fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(token) = self.api_token.as_deref() {
            request = request.header("Authorization", token);
        }
        match self.request_id.as_deref() {
            Some(value) => request.header("X-Request-ID", value),
            None => request,
        }
    }

    /// Fetch one page of completed flights.
    pub async fn fetch_completed_flights(&self, page: u32, page_size: u32) -> Result<Vec<FleetFlight>> {
        let url = format!("{}/api/v0/flights", self.base_url);
        tracing::info!(
            "Fetching flights: page={} page_size={} token_len={}",
            page,
            page_size,
            self.api_token.as_deref().map(str::len).unwrap_or(0)
        );

        let response = self
            .get(&url)
            .query(&[
                ("status", "completed".to_string()),
                ("page", page.to_string()),
                ("page_size", page_size.to_string()),
            ])
            .send()
            .await
            .context("Failed to fetch flights")?;

        let payload = read_success_json(response, "Fleet API error").await?;
        let flights = flights_from_envelope(&payload).ok_or_else(|| {
            let keys: Vec<&String> = payload.as_object().map(|o| o.keys().collect()).unwrap_or_default();
            tracing::error!("Unexpected flights response structure: keys={:?}", keys);
            anyhow::anyhow!("Invalid API response: missing data.flights")
        })?;

        Ok(decode_entries(flights, "flight"))
    }

    /// Fetch a single flight record.
    pub async fn fetch_flight(&self, flight_id: &str) -> Result<FleetFlight> {
        let url = self.flight_url(flight_id, None)?;
        let response = self
            .get(url)
            .send()
            .await
            .context("Failed to fetch flight")?;

        let payload = read_success_json(response, "Failed to fetch flight").await?;
        let record = flight_from_envelope(&payload).cloned().unwrap_or(Value::Null);
        if record.is_null() {
            return Ok(FleetFlight::default());
        }
        serde_json::from_value(record).context("Failed to parse flight record")
    }

    /// Fetch the raw `flight_telemetry` object for a flight.
    ///
    /// Returns `None` when the upstream has no telemetry (404, e.g. never
    /// uploaded or deleted) or the envelope carries none.
    pub async fn fetch_telemetry(&self, flight_id: &str) -> Result<Option<Map<String, Value>>> {
        let url = self.flight_url(flight_id, Some("telemetry"))?;
        let response = self
            .get(url)
            .send()
            .await
            .context("Failed to fetch telemetry")?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!("Telemetry not available for flight {}", flight_id);
            return Ok(None);
        }

        let payload = read_success_json(response, "Failed to fetch telemetry").await?;
        Ok(telemetry_from_envelope(&payload).cloned())
    }

    /// Fetch the media and log files attached to a flight.
    pub async fn fetch_flight_data_files(&self, flight_id: &str) -> Result<Vec<FleetDataFile>> {
        let url = format!("{}/api/v0/flight_data_files", self.base_url);
        let response = self
            .get(&url)
            .query(&[("flight_id", flight_id)])
            .send()
            .await
            .context("Failed to fetch media")?;

        let payload = read_success_json(response, "Failed to fetch media").await?;
        Ok(decode_entries(data_files_from_envelope(&payload), "flight data file"))
    }
}

/// Read a JSON body, turning non-2xx statuses into errors that carry the
/// upstream status and body.
pub(crate) async fn read_success_json(response: Response, label: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("{}: status={} body={}", label, status, body);
        return Err(anyhow::anyhow!("{}: {} - {}", label, status, body));
    }

    response
        .json::<Value>()
        .await
        .with_context(|| format!("{}: invalid JSON body", label))
}

/// Decode list entries one by one; entries that are not records are logged
/// and dropped so they cannot fail the whole list.
fn decode_entries<T: DeserializeOwned>(entries: &[Value], kind: &str) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!("Skipping malformed {}: {}", kind, err);
                None
            }
        })
        .collect()
}

// v0 responses wrap everything as `{ data: { ... }, meta: {...}, status_code }`.

pub(crate) fn flights_from_envelope(payload: &Value) -> Option<&[Value]> {
    payload
        .get("data")
        .and_then(|data| data.get("flights"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

pub(crate) fn flight_from_envelope(payload: &Value) -> Option<&Value> {
    let data = payload.get("data")?;
    data.get("flight").or(Some(data))
}

pub(crate) fn telemetry_from_envelope(payload: &Value) -> Option<&Map<String, Value>> {
    payload
        .get("data")
        .and_then(|data| data.get("flight_telemetry"))
        .and_then(Value::as_object)
}

pub(crate) fn data_files_from_envelope(payload: &Value) -> &[Value] {
    let Some(data) = payload.get("data") else {
        return &[];
    };
    data.get("flight_data_files")
        .and_then(Value::as_array)
        .or_else(|| data.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flights_envelope_requires_data_flights() {
        let payload = json!({ "data": { "flights": [{ "flight_id": "a" }] }, "status_code": 200 });
        assert_eq!(flights_from_envelope(&payload).map(<[Value]>::len), Some(1));
        assert!(flights_from_envelope(&json!({ "data": {} })).is_none());
        assert!(flights_from_envelope(&json!({ "flights": [] })).is_none());
    }

    #[test]
    fn flight_envelope_falls_back_to_data() {
        let nested = json!({ "data": { "flight": { "flight_id": "a" } } });
        assert_eq!(flight_from_envelope(&nested), Some(&json!({ "flight_id": "a" })));

        let flat = json!({ "data": { "flight_id": "b" } });
        assert_eq!(flight_from_envelope(&flat), Some(&json!({ "flight_id": "b" })));
    }

    #[test]
    fn telemetry_envelope() {
        let payload = json!({ "data": { "flight_telemetry": { "gps": {} } } });
        assert!(telemetry_from_envelope(&payload).is_some_and(|t| t.contains_key("gps")));
        assert!(telemetry_from_envelope(&json!({ "data": {} })).is_none());
    }

    #[test]
    fn data_files_envelope_fallbacks() {
        let nested = json!({ "data": { "flight_data_files": [{ "file_id": "x" }] } });
        assert_eq!(data_files_from_envelope(&nested).len(), 1);

        let flat = json!({ "data": [{ "file_id": "x" }, { "file_id": "y" }] });
        assert_eq!(data_files_from_envelope(&flat).len(), 2);

        assert!(data_files_from_envelope(&json!({})).is_empty());
    }

    #[test]
    fn flight_id_is_a_single_encoded_segment() {
        let client = FleetClient::new("https://fleet.example/", None, Duration::from_secs(1))
            .expect("client");

        let url = client.flight_url("abc-123", None).expect("url");
        assert_eq!(url.as_str(), "https://fleet.example/api/v0/flight/abc-123");

        let url = client
            .flight_url("../../admin?x=1#frag", Some("telemetry"))
            .expect("url");
        assert_eq!(url.path(), "/api/v0/flight/..%2F..%2Fadmin%3Fx=1%23frag/telemetry");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn dot_segment_flight_ids_are_rejected() {
        let client = FleetClient::new("https://fleet.example", None, Duration::from_secs(1))
            .expect("client");
        assert!(client.flight_url("..", None).is_err());
        assert!(client.flight_url(".", Some("telemetry")).is_err());
        assert!(client.flight_url("", None).is_err());
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = FleetClient::new("https://fleet.example/proxy/", None, Duration::from_secs(1))
            .expect("client");
        let url = client.flight_url("F1", Some("telemetry")).expect("url");
        assert_eq!(url.path(), "/proxy/api/v0/flight/F1/telemetry");
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let entries = vec![
            json!({ "flight_id": "a", "size_bytes": 1024.0 }),
            json!("not a record"),
            json!({ "flight_id": 7, "has_telemetry": "yes" }),
        ];
        let flights: Vec<FleetFlight> = decode_entries(&entries, "flight");
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[1].resolved_id().as_deref(), Some("7"));
    }

    #[test]
    fn empty_token_is_dropped() {
        let client = FleetClient::new("https://fleet.example/", Some("  ".into()), Duration::from_secs(1))
            .expect("client");
        assert!(client.api_token.is_none());
        assert_eq!(client.base_url(), "https://fleet.example");
    }

    #[test]
    fn request_id_is_scoped_to_the_copy() {
        let client = FleetClient::new("https://fleet.example", None, Duration::from_secs(1))
            .expect("client");
        let tagged = client.with_request_id(Some("req-1".into()));
        assert_eq!(tagged.request_id.as_deref(), Some("req-1"));
        assert!(client.request_id.is_none());
    }
}
