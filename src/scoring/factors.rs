use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FOOT_TRAFFIC_INDEX: f64 = 50.0;
pub const DEFAULT_VACANCY_INDEX: f64 = 50.0;
pub const DEFAULT_NEAREST_COMPETITOR_MILES: f64 = 2.5;
pub const DEFAULT_CATEGORY_FIT: f64 = 0.7;
pub const DEFAULT_C_SCALE: f64 = 5.0;

const INCOME_FLOOR: f64 = 25_000.0;
const INCOME_SPAN: f64 = 100_000.0;
const DEMAND_LOG_DIVISOR: f64 = 5.0;
const DISTANCE_SATURATION_MILES: f64 = 5.0;

/// `max(min, min(max, value))`. NaN collapses to `max`, which callers avoid
/// by defaulting NaN inputs first.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Round to two decimal places for display records.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Replace a missing or NaN input with its documented default.
pub fn or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v,
        _ => default,
    }
}

/// Coerce any number into a count: NaN and negatives become 0, fractions
/// floor, and values past `u64::MAX` saturate.
pub fn count_from_f64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.floor() as u64
    }
}

/// Logarithmic demand curve; ~100k people saturates near 1.
pub fn demand_score(population: u64) -> f64 {
    clamp(
        ((population as f64) + 1.0).log10() / DEMAND_LOG_DIVISOR,
        0.0,
        1.0,
    )
}

/// Linear ramp from a $25k floor to a $125k ceiling.
pub fn income_score(median_income: f64) -> f64 {
    let income = or_default(Some(median_income), 0.0);
    clamp((income - INCOME_FLOOR) / INCOME_SPAN, 0.0, 1.0)
}

pub fn traffic_score(foot_traffic_index: Option<f64>) -> f64 {
    clamp(
        or_default(foot_traffic_index, DEFAULT_FOOT_TRAFFIC_INDEX) / 100.0,
        0.0,
        1.0,
    )
}

pub fn vacancy_score(vacancy_index: Option<f64>) -> f64 {
    clamp(
        or_default(vacancy_index, DEFAULT_VACANCY_INDEX) / 100.0,
        0.0,
        1.0,
    )
}

/// Saturating competitor curve: 1.0 with no competitors, tending to 0 as
/// `competitor_count / c_scale` grows.
pub fn competitor_penalty(competitor_count: u32, c_scale: f64) -> f64 {
    clamp(1.0 - (competitor_count as f64 / c_scale).tanh(), 0.0, 1.0)
}

/// Linear in distance, saturating at 5 miles.
pub fn nearest_distance_score(nearest_competitor_miles: Option<f64>) -> f64 {
    clamp(
        or_default(nearest_competitor_miles, DEFAULT_NEAREST_COMPETITOR_MILES)
            / DISTANCE_SATURATION_MILES,
        0.0,
        1.0,
    )
}

pub fn category_fit_score(category_fit: Option<f64>) -> f64 {
    clamp(or_default(category_fit, DEFAULT_CATEGORY_FIT), 0.0, 1.0)
}

/// Target price positioning of the business.
///
/// Deserializes leniently: unknown text maps to `Mid`. With the default
/// factors that is the neutral 1.0; a custom `price_tiers.mid` applies to
/// unknown text as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum PriceTier {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl PriceTier {
    /// Case-insensitive parse that never fails.
    pub fn from_label(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Budget => "budget",
            PriceTier::Mid => "mid",
            PriceTier::Premium => "premium",
        }
    }
}

impl FromStr for PriceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "budget" | "low" => Ok(PriceTier::Budget),
            "mid" | "medium" => Ok(PriceTier::Mid),
            "premium" | "high" => Ok(PriceTier::Premium),
            other => Err(format!("unknown price tier '{}'", other)),
        }
    }
}

impl From<String> for PriceTier {
    fn from(s: String) -> Self {
        PriceTier::from_label(&s)
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.835224), 0.84);
        assert_eq!(round2(0.3), 0.3);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_demand_score_zero_population() {
        assert_eq!(demand_score(0), 0.0);
    }

    #[test]
    fn test_demand_score_saturates() {
        assert_eq!(demand_score(100_000_000), 1.0);
        assert!(demand_score(99_999) > 0.99);
    }

    #[test]
    fn test_count_from_f64() {
        assert_eq!(count_from_f64(-5.0), 0);
        assert_eq!(count_from_f64(f64::NAN), 0);
        assert_eq!(count_from_f64(1500.0), 1500);
        assert_eq!(count_from_f64(2.9), 2);
        assert_eq!(count_from_f64(f64::INFINITY), u64::MAX);
    }

    #[test]
    fn test_income_ramp() {
        assert_eq!(income_score(25_000.0), 0.0);
        assert_eq!(income_score(10_000.0), 0.0);
        assert!((income_score(75_000.0) - 0.5).abs() < 1e-12);
        assert_eq!(income_score(125_000.0), 1.0);
        assert_eq!(income_score(400_000.0), 1.0);
    }

    #[test]
    fn test_income_nan_treated_as_zero() {
        assert_eq!(income_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_traffic_and_vacancy_defaults() {
        assert_eq!(traffic_score(None), 0.5);
        assert_eq!(vacancy_score(None), 0.5);
        assert_eq!(traffic_score(Some(f64::NAN)), 0.5);
        assert_eq!(traffic_score(Some(140.0)), 1.0);
        assert_eq!(vacancy_score(Some(-20.0)), 0.0);
    }

    #[test]
    fn test_competitor_penalty_curve() {
        assert_eq!(competitor_penalty(0, 5.0), 1.0);
        let one = competitor_penalty(1, 5.0);
        let five = competitor_penalty(5, 5.0);
        assert!(one > five);
        assert!((five - (1.0 - 1.0f64.tanh())).abs() < 1e-12);
        assert!(competitor_penalty(500, 5.0) < 1e-6);
    }

    #[test]
    fn test_nearest_distance() {
        assert_eq!(nearest_distance_score(None), 0.5);
        assert_eq!(nearest_distance_score(Some(5.0)), 1.0);
        assert_eq!(nearest_distance_score(Some(12.0)), 1.0);
        assert_eq!(nearest_distance_score(Some(-1.0)), 0.0);
    }

    #[test]
    fn test_category_fit() {
        assert_eq!(category_fit_score(None), 0.7);
        assert_eq!(category_fit_score(Some(1.4)), 1.0);
        assert_eq!(category_fit_score(Some(0.35)), 0.35);
    }

    #[test]
    fn test_price_tier_parse() {
        assert_eq!("Premium".parse::<PriceTier>().unwrap(), PriceTier::Premium);
        assert_eq!(" budget ".parse::<PriceTier>().unwrap(), PriceTier::Budget);
        assert!("platinum".parse::<PriceTier>().is_err());
        assert_eq!(PriceTier::from_label("platinum"), PriceTier::Mid);
    }

    #[test]
    fn test_price_tier_lenient_deserialize() {
        let tier: PriceTier = serde_json::from_str("\"LUXE\"").unwrap();
        assert_eq!(tier, PriceTier::Mid);
        let tier: PriceTier = serde_json::from_str("\"premium\"").unwrap();
        assert_eq!(tier, PriceTier::Premium);
        assert_eq!(serde_json::to_string(&PriceTier::Budget).unwrap(), "\"budget\"");
    }
}
