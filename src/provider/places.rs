use anyhow::Result;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, Retry};

use super::cache::LookupCache;
use super::fixture;
use super::types::{Coordinates, Demographics};
use super::MetricsProvider;
use crate::analysis::Radius;
use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Business keyword -> Google place type. First substring match wins.
const PLACE_TYPES: [(&str, &str); 10] = [
    ("restaurant", "restaurant"),
    ("coffee", "cafe"),
    ("retail", "store"),
    ("gym", "gym"),
    ("clinic", "hospital"),
    ("salon", "beauty_salon"),
    ("auto", "car_repair"),
    ("pharmacy", "pharmacy"),
    ("bank", "bank"),
    ("gas", "gas_station"),
];

pub fn place_type_for(business: &str) -> &'static str {
    let lower = business.to_lowercase();
    PLACE_TYPES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, place_type)| *place_type)
        .unwrap_or("establishment")
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    status: String,
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

fn coordinates_from(
    response: GeocodeResponse,
    location: &str,
) -> std::result::Result<Coordinates, ProviderError> {
    match response.status.as_str() {
        "OK" => response
            .results
            .into_iter()
            .next()
            .map(|r| Coordinates {
                lat: r.geometry.location.lat,
                lon: r.geometry.location.lng,
            })
            .ok_or_else(|| ProviderError::NotGeocoded(location.to_string())),
        "ZERO_RESULTS" => Err(ProviderError::NotGeocoded(location.to_string())),
        other => Err(ProviderError::Api {
            api: "geocoding",
            status: other.to_string(),
        }),
    }
}

fn competitor_count_from(response: NearbyResponse) -> std::result::Result<u32, ProviderError> {
    match response.status.as_str() {
        "OK" => Ok(response.results.len() as u32),
        "ZERO_RESULTS" => Ok(0),
        other => Err(ProviderError::Api {
            api: "places",
            status: other.to_string(),
        }),
    }
}

/// Delays between retries: 100ms growing, capped at 5s, 3 retries.
fn retry_delays() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3)
}

/// Live provider backed by the Google Geocoding and Places APIs.
///
/// Demographics come from the built-in tables; there is no block-group
/// census lookup.
#[derive(Debug, Clone)]
pub struct PlacesProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    cache: LookupCache,
}

impl PlacesProvider {
    pub fn new(
        api_key: String,
        base_url: Option<&str>,
        cache: LookupCache,
    ) -> std::result::Result<Self, ProviderError> {
        let mut base_url = base_url.unwrap_or(DEFAULT_BASE_URL).trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Url::parse(&base_url).map_err(|_| ProviderError::BaseUrl(base_url.clone()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            cache,
        })
    }

    fn endpoint(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<Url, ProviderError> {
        let mut all: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        all.push(("key", self.api_key.as_str()));
        Url::parse_with_params(&format!("{}{}", self.base_url, path), all)
            .map_err(|_| ProviderError::BaseUrl(self.base_url.clone()))
    }

    /// GET with exponential backoff: up to 3 retries after the first try.
    async fn get_json<T: DeserializeOwned>(
        &self,
        api: &'static str,
        url: Url,
    ) -> std::result::Result<T, ProviderError> {
        let retry_strategy = retry_delays();

        let client = &self.client;
        let url = &url;
        Retry::spawn(retry_strategy, move || async move {
            let response = client
                .get(url.clone())
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|source| {
                    tracing::debug!(api, error = %source, "request failed, may retry");
                    ProviderError::Http { api, source }
                })?;
            response
                .json::<T>()
                .await
                .map_err(|source| ProviderError::Http { api, source })
        })
        .await
    }
}

impl MetricsProvider for PlacesProvider {
    async fn geocode(&self, location: &str) -> Result<Coordinates> {
        let key = format!("geocode:{}", location.trim().to_lowercase());
        if let Some(coords) = self.cache.get::<Coordinates>(&key) {
            return Ok(coords);
        }

        let url = self.endpoint("geocode/json", &[("address", location.to_string())])?;
        let response: GeocodeResponse = self.get_json("geocoding", url).await?;
        let coords = coordinates_from(response, location)?;

        if let Err(e) = self.cache.put(&key, &coords) {
            tracing::warn!("Failed to cache geocode result: {:#}", e);
        }
        Ok(coords)
    }

    async fn competitor_count(
        &self,
        center: Coordinates,
        business: &str,
        radius: Radius,
    ) -> Result<u32> {
        let place_type = place_type_for(business);
        let key = format!(
            "nearby:{:.4},{:.4}:{}:{}",
            center.lat,
            center.lon,
            radius.meters(),
            place_type
        );
        if let Some(count) = self.cache.get::<u32>(&key) {
            return Ok(count);
        }

        let url = self.endpoint(
            "place/nearbysearch/json",
            &[
                ("location", format!("{},{}", center.lat, center.lon)),
                ("radius", radius.meters().to_string()),
                ("type", place_type.to_string()),
            ],
        )?;
        let response: NearbyResponse = self.get_json("places", url).await?;
        let count = competitor_count_from(response)?;
        tracing::debug!(count, place_type, "nearby competitors");

        if let Err(e) = self.cache.put(&key, &count) {
            tracing::warn!("Failed to cache nearby search result: {:#}", e);
        }
        Ok(count)
    }

    async fn demographics(&self, location: &str) -> Result<Demographics> {
        Ok(fixture::demographics_for(location))
    }
}
