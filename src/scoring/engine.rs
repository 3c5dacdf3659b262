use serde::{Deserialize, Deserializer, Serialize};

use super::config::{ScoringConfig, Weights};
use super::factors::{self, clamp, round2, PriceTier};

/// Raw and derived metrics for one candidate location.
///
/// Optional fields fall back to the documented midpoint defaults when
/// absent or NaN. Counts accept any JSON number and are clamped into range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetrics {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub competitor_count: u32,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub population: u64,
    #[serde(default)]
    pub median_income: f64,
    #[serde(default)]
    pub foot_traffic_index: Option<f64>,
    #[serde(default)]
    pub vacancy_index: Option<f64>,
    #[serde(default)]
    pub nearest_competitor_miles: Option<f64>,
    #[serde(default)]
    pub category_fit: Option<f64>,
    #[serde(default)]
    pub price_tier: PriceTier,
    /// Whether `foot_traffic_index` is a placeholder rather than a measurement.
    #[serde(default = "default_true")]
    pub foot_traffic_is_default: bool,
}

fn default_true() -> bool {
    true
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    f64::deserialize(deserializer).map(factors::count_from_f64)
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    lenient_u64(deserializer).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

impl Default for LocationMetrics {
    fn default() -> Self {
        Self {
            competitor_count: 0,
            population: 0,
            median_income: 0.0,
            foot_traffic_index: None,
            vacancy_index: None,
            nearest_competitor_miles: None,
            category_fit: None,
            price_tier: PriceTier::Mid,
            foot_traffic_is_default: true,
        }
    }
}

/// Normalized component scores, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subscores {
    pub competitor_penalty: f64,
    pub nearest_distance_score: f64,
    pub demand_score: f64,
    pub income_score: f64,
    pub traffic_score: f64,
    pub vacancy_score: f64,
    pub category_fit: f64,
}

impl Subscores {
    fn normalize(metrics: &LocationMetrics, c_scale: f64) -> Self {
        Self {
            competitor_penalty: factors::competitor_penalty(metrics.competitor_count, c_scale),
            nearest_distance_score: factors::nearest_distance_score(
                metrics.nearest_competitor_miles,
            ),
            demand_score: factors::demand_score(metrics.population),
            income_score: factors::income_score(metrics.median_income),
            traffic_score: factors::traffic_score(metrics.foot_traffic_index),
            vacancy_score: factors::vacancy_score(metrics.vacancy_index),
            category_fit: factors::category_fit_score(metrics.category_fit),
        }
    }

    fn rounded(&self) -> Self {
        Self {
            competitor_penalty: round2(self.competitor_penalty),
            nearest_distance_score: round2(self.nearest_distance_score),
            demand_score: round2(self.demand_score),
            income_score: round2(self.income_score),
            traffic_score: round2(self.traffic_score),
            vacancy_score: round2(self.vacancy_score),
            category_fit: round2(self.category_fit),
        }
    }

    /// Display pairs in a stable order.
    pub fn as_pairs(&self) -> [(&'static str, f64); 7] {
        [
            ("demand", self.demand_score),
            ("income", self.income_score),
            ("traffic", self.traffic_score),
            ("vacancy", self.vacancy_score),
            ("competition", self.competitor_penalty),
            ("distance", self.nearest_distance_score),
            ("category fit", self.category_fit),
        ]
    }
}

impl Weights {
    /// Σ weight_i × subscore_i.
    pub fn combine(&self, s: &Subscores) -> f64 {
        self.demand * s.demand_score
            + self.income * s.income_score
            + self.traffic * s.traffic_score
            + self.vacancy * s.vacancy_score
            + self.competitor * s.competitor_penalty
            + self.distance * s.nearest_distance_score
            + self.category * s.category_fit
    }
}

/// How a score was produced. Informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub weights: Weights,
    pub tier_multiplier: f64,
    pub c_scale: f64,
    /// `tier_multiplier × Σ weight_i × subscore_i` before any rounding.
    pub unrounded_score: f64,
    /// Headline score before the low-demand penalty.
    pub pre_penalty_pct: u8,
    pub low_demand_penalty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub opportunity_pct: u8,
    pub raw_score: f64,
    pub subscores: Subscores,
    pub breakdown: ScoreBreakdown,
}

/// Score one location. Pure and infallible: every input is clamped or
/// defaulted.
pub fn calculate_score(metrics: &LocationMetrics, config: &ScoringConfig) -> ScoreResult {
    let c_scale = config.effective_c_scale();
    let tier_multiplier = config.price_tiers.multiplier(metrics.price_tier);
    let subscores = Subscores::normalize(metrics, c_scale);

    let weights = if metrics.foot_traffic_is_default {
        config.weights.with_unmeasured_traffic()
    } else {
        config.weights
    };

    let raw_score = tier_multiplier * weights.combine(&subscores);
    let pre_penalty_pct = (100.0 * clamp(raw_score, 0.0, 1.0)).round() as u8;

    let low_demand_penalty = metrics.competitor_count == 0
        && metrics.population < config.low_demand.population_below;
    let opportunity_pct = if low_demand_penalty {
        pre_penalty_pct.saturating_sub(config.low_demand.penalty_points)
    } else {
        pre_penalty_pct
    };

    ScoreResult {
        opportunity_pct,
        raw_score: round2(raw_score),
        subscores: subscores.rounded(),
        breakdown: ScoreBreakdown {
            weights,
            tier_multiplier,
            c_scale,
            unrounded_score: raw_score,
            pre_penalty_pct,
            low_demand_penalty,
        },
    }
}
