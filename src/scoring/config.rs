use serde::{Deserialize, Serialize};

use super::factors::{PriceTier, DEFAULT_C_SCALE};

/// Main scoring configuration.
///
/// Every section is optional in YAML; missing keys fall back to the
/// defaults below, which reproduce the reference model exactly.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   c_scale: 5
///   weights:
///     demand: 0.20
///     income: 0.15
///     traffic: 0.15
///     vacancy: 0.05
///     competitor: 0.20
///     distance: 0.10
///     category: 0.15
///   price_tiers: { budget: 0.9, mid: 1.0, premium: 1.1 }
///   low_demand: { population_below: 500, penalty_points: 15 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringConfig {
    /// Competitor-density sensitivity: larger values make each extra
    /// competitor cost less.
    pub c_scale: f64,

    pub weights: Weights,

    pub price_tiers: PriceTierFactors,

    pub low_demand: LowDemandRule,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            c_scale: DEFAULT_C_SCALE,
            weights: Weights::default(),
            price_tiers: PriceTierFactors::default(),
            low_demand: LowDemandRule::default(),
        }
    }
}

impl ScoringConfig {
    /// `c_scale` as used by the scorer: non-positive or non-finite values
    /// fall back to the default so scoring never divides by zero.
    pub fn effective_c_scale(&self) -> f64 {
        if self.c_scale.is_finite() && self.c_scale > 0.0 {
            self.c_scale
        } else {
            DEFAULT_C_SCALE
        }
    }
}

/// Per-component weights of the opportunity model.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Weights {
    pub demand: f64,
    pub income: f64,
    pub traffic: f64,
    pub vacancy: f64,
    pub competitor: f64,
    pub distance: f64,
    pub category: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            demand: 0.20,
            income: 0.15,
            traffic: 0.15,
            vacancy: 0.05,
            competitor: 0.20,
            distance: 0.10,
            category: 0.15,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.demand
            + self.income
            + self.traffic
            + self.vacancy
            + self.competitor
            + self.distance
            + self.category
    }

    /// Weights for a location whose foot traffic is a placeholder: half of
    /// the traffic weight moves, split evenly, onto demand and competition.
    pub fn with_unmeasured_traffic(&self) -> Self {
        let removed = self.traffic * 0.5;
        Self {
            traffic: self.traffic - removed,
            demand: self.demand + removed / 2.0,
            competitor: self.competitor + removed / 2.0,
            ..*self
        }
    }

    pub fn as_pairs(&self) -> [(&'static str, f64); 7] {
        [
            ("demand", self.demand),
            ("income", self.income),
            ("traffic", self.traffic),
            ("vacancy", self.vacancy),
            ("competitor", self.competitor),
            ("distance", self.distance),
            ("category", self.category),
        ]
    }
}

/// Multiplier applied to the weighted sum for each price tier.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct PriceTierFactors {
    pub budget: f64,
    pub mid: f64,
    pub premium: f64,
}

impl Default for PriceTierFactors {
    fn default() -> Self {
        Self {
            budget: 0.9,
            mid: 1.0,
            premium: 1.1,
        }
    }
}

impl PriceTierFactors {
    pub fn multiplier(&self, tier: PriceTier) -> f64 {
        match tier {
            PriceTier::Budget => self.budget,
            PriceTier::Mid => self.mid,
            PriceTier::Premium => self.premium,
        }
    }
}

/// Discount for "no competitors in a tiny market": more likely no demand
/// than an untapped opportunity.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct LowDemandRule {
    /// Applies when population is strictly below this value.
    pub population_below: u64,
    pub penalty_points: u8,
}

impl Default for LowDemandRule {
    fn default() -> Self {
        Self {
            population_below: 500,
            penalty_points: 15,
        }
    }
}
