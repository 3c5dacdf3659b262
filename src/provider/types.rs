use serde::{Deserialize, Serialize};

use crate::scoring::LocationMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lon: self.lon + d_lon,
        }
    }
}

/// Area-level demographics for the requested location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub population: u64,
    pub median_income: f64,
    pub median_age: f64,
    pub education_level: String,
    pub employment_rate: f64,
}

/// Baseline for an area, before it is spread into candidate locations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaProfile {
    pub center: Coordinates,
    pub competitor_count: u32,
    pub demographics: Demographics,
}

/// One place the business could open, with the metrics that score it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateLocation {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub metrics: LocationMetrics,
}
