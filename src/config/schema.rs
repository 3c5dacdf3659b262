use serde::{Deserialize, Serialize};

use crate::analysis::{Daypart, Radius};
use crate::provider::ProviderConfig;
use crate::scoring::{PriceTier, ScoringConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub defaults: SearchDefaults,
}

/// Values used when a request leaves radius, tier or daypart unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SearchDefaults {
    pub radius: Radius,
    pub price_tier: PriceTier,
    pub daypart: Daypart,
}
