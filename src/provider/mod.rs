pub mod cache;
pub mod fixture;
pub mod neighborhoods;
pub mod places;
pub mod types;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use cache::LookupCache;
pub use fixture::FixtureProvider;
pub use places::PlacesProvider;
pub use types::{AreaProfile, CandidateLocation, Coordinates, Demographics};

use crate::analysis::{AnalysisRequest, Radius};
use crate::error::ProviderError;

/// Source of the raw area data an analysis is built from.
#[allow(async_fn_in_trait)]
pub trait MetricsProvider {
    async fn geocode(&self, location: &str) -> Result<Coordinates>;

    async fn competitor_count(
        &self,
        center: Coordinates,
        business: &str,
        radius: Radius,
    ) -> Result<u32>;

    async fn demographics(&self, location: &str) -> Result<Demographics>;

    /// Geocode, then fetch competitors and demographics concurrently.
    async fn survey(&self, request: &AnalysisRequest) -> Result<AreaProfile> {
        let center = self.geocode(&request.location).await?;
        tracing::debug!(lat = center.lat, lon = center.lon, "geocoded {}", request.location);

        let (competitor_count, demographics) = futures::try_join!(
            self.competitor_count(center, &request.business, request.radius),
            self.demographics(&request.location),
        )?;

        Ok(AreaProfile {
            center,
            competitor_count,
            demographics,
        })
    }

    /// Survey the area and spread it into the candidate locations.
    async fn candidates(
        &self,
        request: &AnalysisRequest,
    ) -> Result<(AreaProfile, Vec<CandidateLocation>)> {
        let profile = self.survey(request).await?;
        let seed = neighborhoods::seed_for(&request.business, &request.location);
        let candidates = neighborhoods::spread_candidates(&profile, request.price_tier, seed);
        Ok((profile, candidates))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Fixture,
    Places,
}

pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_PLACES_API_KEY";

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_cache_ttl() -> String {
    "24h".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: None,
            api_key_env: default_api_key_env(),
            cache_ttl: default_cache_ttl(),
            base_url: None,
        }
    }
}

impl ProviderConfig {
    /// Key from the environment variable first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn parse_cache_ttl(&self) -> Result<Duration> {
        humantime::parse_duration(&self.cache_ttl).map_err(|e| {
            anyhow::anyhow!(
                "Invalid provider.cache_ttl '{}': {}. Use format like '30m', '24h', '2d'",
                self.cache_ttl,
                e
            )
        })
    }
}

/// The configured provider.
#[derive(Debug, Clone)]
pub enum Provider {
    Fixture(FixtureProvider),
    Places(PlacesProvider),
}

impl Provider {
    pub fn from_config(
        config: &ProviderConfig,
        cache: LookupCache,
    ) -> std::result::Result<Self, ProviderError> {
        match config.kind {
            ProviderKind::Fixture => Ok(Provider::Fixture(FixtureProvider)),
            ProviderKind::Places => {
                let api_key =
                    config
                        .resolve_api_key()
                        .ok_or_else(|| ProviderError::MissingApiKey {
                            env: config.api_key_env.clone(),
                        })?;
                let places = PlacesProvider::new(api_key, config.base_url.as_deref(), cache)?;
                Ok(Provider::Places(places))
            }
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Fixture(_) => ProviderKind::Fixture,
            Provider::Places(_) => ProviderKind::Places,
        }
    }
}

impl MetricsProvider for Provider {
    async fn geocode(&self, location: &str) -> Result<Coordinates> {
        match self {
            Provider::Fixture(p) => p.geocode(location).await,
            Provider::Places(p) => p.geocode(location).await,
        }
    }

    async fn competitor_count(
        &self,
        center: Coordinates,
        business: &str,
        radius: Radius,
    ) -> Result<u32> {
        match self {
            Provider::Fixture(p) => p.competitor_count(center, business, radius).await,
            Provider::Places(p) => p.competitor_count(center, business, radius).await,
        }
    }

    async fn demographics(&self, location: &str) -> Result<Demographics> {
        match self {
            Provider::Fixture(p) => p.demographics(location).await,
            Provider::Places(p) => p.demographics(location).await,
        }
    }
}
