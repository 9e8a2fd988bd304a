//! HTTP client for the public geocoding service (Nominatim-compatible).
//!
//! The service requires a client-identifying user agent; it is set on the
//! underlying `reqwest::Client` so every request carries it.

use std::time::Duration;

use reqwest::{Client, Url};

use mealmap_core::GeoCoordinate;

use crate::error::RemoteError;
use crate::normalize::value_as_f64;
use crate::types::GeocodeHit;

/// Client for `GET /search?q=<address>&format=json`.
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`RemoteError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| RemoteError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves a free-text address to a coordinate.
    ///
    /// Multiple matches are not disambiguated: the first result wins.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::AddressNotFound`] when the service returns an empty
    ///   result array.
    /// - [`RemoteError::Http`] on network failure or non-2xx status.
    /// - [`RemoteError::Deserialize`] if the body is not a JSON array of hits.
    /// - [`RemoteError::DataShape`] if the first hit's `lat`/`lon` are not
    ///   numeric.
    pub async fn search(&self, address: &str) -> Result<GeoCoordinate, RemoteError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| RemoteError::InvalidBaseUrl {
                url: format!("{}search", self.base_url),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json");

        tracing::debug!(%url, "geocoding address");
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let hits: Vec<GeocodeHit> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        let Some(first) = hits.first() else {
            return Err(RemoteError::AddressNotFound {
                query: address.to_owned(),
            });
        };

        let latitude = value_as_f64(&first.lat).ok_or_else(|| {
            tracing::warn!(field = "lat", "geocode hit field is not numeric");
            RemoteError::DataShape {
                context: "geocode search".to_owned(),
                field: "lat".to_owned(),
                reason: "is not numeric".to_owned(),
            }
        })?;
        let longitude = value_as_f64(&first.lon).ok_or_else(|| {
            tracing::warn!(field = "lon", "geocode hit field is not numeric");
            RemoteError::DataShape {
                context: "geocode search".to_owned(),
                field: "lon".to_owned(),
                reason: "is not numeric".to_owned(),
            }
        })?;

        Ok(GeoCoordinate::new(latitude, longitude))
    }
}
