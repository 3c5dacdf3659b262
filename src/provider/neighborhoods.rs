use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::types::{AreaProfile, CandidateLocation};
use crate::scoring::{LocationMetrics, PriceTier};

/// `base + jitter` where jitter is drawn from `[0, spread)`.
#[derive(Debug, Clone, Copy)]
struct Jitter {
    base: f64,
    spread: f64,
}

impl Jitter {
    const fn new(base: f64, spread: f64) -> Self {
        Self { base, spread }
    }

    fn whole(&self, rng: &mut fastrand::Rng) -> f64 {
        self.base + (rng.f64() * self.spread).floor()
    }

    fn real(&self, rng: &mut fastrand::Rng) -> f64 {
        self.base + rng.f64() * self.spread
    }
}

/// Shape of one candidate relative to the area baseline.
struct Template {
    name: &'static str,
    d_lat: f64,
    d_lon: f64,
    population_factor: f64,
    competitor_factor: f64,
    competitor_min: u32,
    income_factor: f64,
    foot_traffic: Jitter,
    vacancy: Jitter,
    nearest_miles: Jitter,
    category_fit: Jitter,
}

// Ordered from the strongest profile to a deliberately weak one for contrast
const TEMPLATES: [Template; 4] = [
    Template {
        name: "Federal Hill",
        d_lat: 0.01,
        d_lon: -0.01,
        population_factor: 0.8,
        competitor_factor: 0.4,
        competitor_min: 1,
        income_factor: 1.0,
        foot_traffic: Jitter::new(75.0, 20.0),
        vacancy: Jitter::new(45.0, 15.0),
        nearest_miles: Jitter::new(2.5, 2.0),
        category_fit: Jitter::new(0.7, 0.2),
    },
    Template {
        name: "Downtown",
        d_lat: -0.005,
        d_lon: 0.005,
        population_factor: 1.2,
        competitor_factor: 0.8,
        competitor_min: 2,
        income_factor: 1.2,
        foot_traffic: Jitter::new(65.0, 15.0),
        vacancy: Jitter::new(35.0, 20.0),
        nearest_miles: Jitter::new(1.5, 1.5),
        category_fit: Jitter::new(0.5, 0.3),
    },
    Template {
        name: "East Side",
        d_lat: 0.008,
        d_lon: 0.012,
        population_factor: 1.0,
        competitor_factor: 0.6,
        competitor_min: 1,
        income_factor: 1.3,
        foot_traffic: Jitter::new(50.0, 15.0),
        vacancy: Jitter::new(50.0, 20.0),
        nearest_miles: Jitter::new(1.0, 1.5),
        category_fit: Jitter::new(0.4, 0.3),
    },
    Template {
        name: "West End",
        d_lat: -0.012,
        d_lon: -0.008,
        population_factor: 0.6,
        competitor_factor: 0.2,
        competitor_min: 0,
        income_factor: 0.8,
        foot_traffic: Jitter::new(30.0, 15.0),
        vacancy: Jitter::new(70.0, 20.0),
        nearest_miles: Jitter::new(0.5, 1.0),
        category_fit: Jitter::new(0.2, 0.3),
    },
];

/// Stable seed for a (business, location) pair, case-insensitive.
pub fn seed_for(business: &str, location: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    business.trim().to_lowercase().hash(&mut hasher);
    location.trim().to_lowercase().hash(&mut hasher);
    hasher.finish()
}

/// Spread an area baseline into the candidate locations around its center.
///
/// Foot traffic is simulated here, so every candidate is flagged as using a
/// placeholder traffic figure.
pub fn spread_candidates(
    profile: &AreaProfile,
    price_tier: PriceTier,
    seed: u64,
) -> Vec<CandidateLocation> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let base_population = profile.demographics.population as f64;
    let base_income = profile.demographics.median_income;
    let base_competitors = profile.competitor_count as f64;

    TEMPLATES
        .iter()
        .map(|t| {
            let competitors =
                ((base_competitors * t.competitor_factor).floor() as u32).max(t.competitor_min);
            let metrics = LocationMetrics {
                competitor_count: competitors,
                population: (base_population * t.population_factor).round() as u64,
                median_income: (base_income * t.income_factor).round(),
                foot_traffic_index: Some(t.foot_traffic.whole(&mut rng)),
                vacancy_index: Some(t.vacancy.whole(&mut rng)),
                nearest_competitor_miles: Some(t.nearest_miles.real(&mut rng)),
                category_fit: Some(t.category_fit.real(&mut rng)),
                price_tier,
                foot_traffic_is_default: true,
            };
            CandidateLocation {
                name: t.name.to_string(),
                coordinates: profile.center.offset(t.d_lat, t.d_lon),
                metrics,
            }
        })
        .collect()
}
