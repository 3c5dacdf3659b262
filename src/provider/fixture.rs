use anyhow::Result;

use super::types::{Coordinates, Demographics};
use super::MetricsProvider;
use crate::analysis::Radius;

const PROVIDENCE: Coordinates = Coordinates {
    lat: 41.8240,
    lon: -71.4187,
};

const KNOWN_CENTERS: [(&str, Coordinates); 6] = [
    ("providence", PROVIDENCE),
    (
        "boston",
        Coordinates {
            lat: 42.3601,
            lon: -71.0589,
        },
    ),
    (
        "new york",
        Coordinates {
            lat: 40.7128,
            lon: -74.0060,
        },
    ),
    (
        "chicago",
        Coordinates {
            lat: 41.8781,
            lon: -87.6298,
        },
    ),
    (
        "los angeles",
        Coordinates {
            lat: 34.0522,
            lon: -118.2437,
        },
    ),
    ("near me", PROVIDENCE),
];

/// (key, population, median income, median age, education, employment rate)
type DemographicRow = (&'static str, u64, f64, f64, &'static str, f64);

const KNOWN_DEMOGRAPHICS: [DemographicRow; 5] = [
    ("providence", 179_335, 45_000.0, 32.5, "some_college", 0.85),
    ("boston", 692_600, 75_000.0, 34.2, "bachelors", 0.88),
    ("new york", 8_336_817, 65_000.0, 36.8, "bachelors", 0.87),
    ("chicago", 2_693_976, 58_000.0, 35.1, "some_college", 0.86),
    ("los angeles", 3_971_883, 62_000.0, 36.0, "some_college", 0.84),
];

const DEFAULT_DEMOGRAPHICS: DemographicRow =
    ("default", 50_000, 55_000.0, 35.0, "some_college", 0.85);

pub const FIXTURE_COMPETITOR_COUNT: u32 = 3;

/// Center for a free-text location. Unknown places land on Providence.
pub fn center_for(location: &str) -> Coordinates {
    let lower = location.to_lowercase();
    KNOWN_CENTERS
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, coords)| *coords)
        .unwrap_or(PROVIDENCE)
}

/// Canned area demographics, matched by substring on the location text.
pub fn demographics_for(location: &str) -> Demographics {
    let lower = location.to_lowercase();
    let row = KNOWN_DEMOGRAPHICS
        .iter()
        .find(|row| lower.contains(row.0))
        .unwrap_or(&DEFAULT_DEMOGRAPHICS);

    Demographics {
        population: row.1,
        median_income: row.2,
        median_age: row.3,
        education_level: row.4.to_string(),
        employment_rate: row.5,
    }
}

/// Deterministic provider backed by built-in tables. No I/O.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider;

impl MetricsProvider for FixtureProvider {
    async fn geocode(&self, location: &str) -> Result<Coordinates> {
        Ok(center_for(location))
    }

    async fn competitor_count(
        &self,
        _center: Coordinates,
        _business: &str,
        _radius: Radius,
    ) -> Result<u32> {
        Ok(FIXTURE_COMPETITOR_COUNT)
    }

    async fn demographics(&self, location: &str) -> Result<Demographics> {
        Ok(demographics_for(location))
    }
}
