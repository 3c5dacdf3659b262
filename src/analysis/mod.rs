mod insights;
mod request;

pub use insights::derive_insights;
pub(crate) use insights::with_commas;
pub use request::{parse_price_tier, AnalysisRequest, Daypart, Radius};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::RequestError;
use crate::intent::{business_category, BusinessCategory};
use crate::provider::{AreaProfile, CandidateLocation, MetricsProvider};
use crate::scoring::{calculate_score, rank, PriceTier, Ranked, ScoringConfig};

pub const LOW_POPULATION_CAUTION: &str = "Low population — validate demand.";

/// How much an analysis can be trusted given where its inputs came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub business: String,
    pub location: String,
    pub radius: Radius,
    pub price_tier: PriceTier,
    pub daypart: Daypart,
    pub business_category: BusinessCategory,
    pub area: AreaProfile,
    pub locations: Vec<Ranked<CandidateLocation>>,
    pub insights: Vec<String>,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caution: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl Analysis {
    /// Candidate by its 1-based rank.
    pub fn at_rank(&self, rank: usize) -> Result<&Ranked<CandidateLocation>, RequestError> {
        if rank == 0 || rank > self.locations.len() {
            return Err(RequestError::RankOutOfRange {
                rank,
                count: self.locations.len(),
            });
        }
        Ok(&self.locations[rank - 1])
    }
}

/// Survey the area, score every candidate and rank them.
///
/// Called from the `analyze`, `open` and `chat` commands. The result is
/// deterministic for a given request when the provider is.
pub async fn run_analysis<P: MetricsProvider>(
    provider: &P,
    request: &AnalysisRequest,
    scoring: &ScoringConfig,
) -> Result<Analysis> {
    request.validate()?;

    tracing::info!(
        business = %request.business,
        location = %request.location,
        radius = %request.radius,
        "analyzing"
    );

    let (area, candidates) = provider.candidates(request).await?;
    tracing::debug!(
        competitors = area.competitor_count,
        population = area.demographics.population,
        "area surveyed, {} candidates",
        candidates.len()
    );

    let scored: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let result = calculate_score(&candidate.metrics, scoring);
            (candidate, result)
        })
        .collect();
    let locations = rank(scored);

    let (insights, caution) = match locations.first() {
        Some(best) => {
            let caution = best
                .result
                .breakdown
                .low_demand_penalty
                .then(|| LOW_POPULATION_CAUTION.to_string());
            (derive_insights(&best.item.metrics), caution)
        }
        None => (Vec::new(), None),
    };

    Ok(Analysis {
        business: request.business.trim().to_string(),
        location: request.location.trim().to_string(),
        radius: request.radius,
        price_tier: request.price_tier,
        daypart: request.daypart,
        business_category: business_category(&request.business),
        area,
        locations,
        insights,
        // Foot traffic is always simulated
        confidence: Confidence::Medium,
        caution,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Coordinates, Demographics, FixtureProvider};
    use crate::scoring::{ScoreLabel, Weights};

    /// Provider with a tiny, competitor-free area so the low-demand rule fires.
    struct EmptyTown;

    impl MetricsProvider for EmptyTown {
        async fn geocode(&self, _location: &str) -> Result<Coordinates> {
            Ok(Coordinates { lat: 0.0, lon: 0.0 })
        }

        async fn competitor_count(
            &self,
            _center: Coordinates,
            _business: &str,
            _radius: Radius,
        ) -> Result<u32> {
            Ok(0)
        }

        async fn demographics(&self, _location: &str) -> Result<Demographics> {
            Ok(Demographics {
                population: 300,
                median_income: 30_000.0,
                median_age: 50.0,
                education_level: "high_school".to_string(),
                employment_rate: 0.7,
            })
        }
    }

    #[tokio::test]
    async fn test_fixture_analysis_is_ranked() {
        let request = AnalysisRequest::new("coffee shop", "Providence, RI");
        let analysis = run_analysis(&FixtureProvider, &request, &ScoringConfig::default())
            .await
            .unwrap();

        assert_eq!(analysis.locations.len(), 4);
        assert_eq!(analysis.business_category, BusinessCategory::Restaurant);
        assert_eq!(analysis.confidence, Confidence::Medium);
        for (i, ranked) in analysis.locations.iter().enumerate() {
            assert_eq!(ranked.rank, i + 1);
            assert_eq!(ranked.label, ScoreLabel::from_pct(ranked.score));
            assert!(ranked.score <= 100);
        }
        assert!(analysis
            .locations
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        assert_eq!(analysis.at_rank(1).map(|b| b.rank), Ok(1));
        assert!(analysis.caution.is_none());
    }

    #[tokio::test]
    async fn test_analysis_is_deterministic() {
        let request = AnalysisRequest::new("barbershop", "Boston");
        let scoring = ScoringConfig::default();
        let a = run_analysis(&FixtureProvider, &request, &scoring).await.unwrap();
        let b = run_analysis(&FixtureProvider, &request, &scoring).await.unwrap();

        let names = |x: &Analysis| {
            x.locations
                .iter()
                .map(|r| (r.item.name.clone(), r.score))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
        assert_eq!(a.insights, b.insights);
    }

    #[tokio::test]
    async fn test_low_population_caution() {
        // Only West End keeps zero competitors; weighting competition alone
        // puts it first even after the penalty (85 vs 80).
        let scoring = ScoringConfig {
            weights: Weights {
                demand: 0.0,
                income: 0.0,
                traffic: 0.0,
                vacancy: 0.0,
                competitor: 1.0,
                distance: 0.0,
                category: 0.0,
            },
            ..Default::default()
        };
        let request = AnalysisRequest::new("bakery", "Nowhere");
        let analysis = run_analysis(&EmptyTown, &request, &scoring).await.unwrap();

        let best = analysis.at_rank(1).unwrap();
        assert_eq!(best.item.name, "West End");
        assert_eq!(best.score, 85);
        assert!(best.result.breakdown.low_demand_penalty);
        assert_eq!(analysis.caution.as_deref(), Some(LOW_POPULATION_CAUTION));
        assert_eq!(analysis.business_category, BusinessCategory::Other);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let request = AnalysisRequest::new("", "Boston");
        let err = run_analysis(&FixtureProvider, &request, &ScoringConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RequestError>(),
            Some(&RequestError::MissingBusiness)
        );
    }

    #[tokio::test]
    async fn test_at_rank_bounds() {
        let request = AnalysisRequest::new("gym", "Chicago");
        let analysis = run_analysis(&FixtureProvider, &request, &ScoringConfig::default())
            .await
            .unwrap();

        assert_eq!(analysis.at_rank(1).unwrap().rank, 1);
        assert_eq!(analysis.at_rank(4).unwrap().rank, 4);
        assert_eq!(
            analysis.at_rank(5).unwrap_err(),
            RequestError::RankOutOfRange { rank: 5, count: 4 }
        );
        assert!(analysis.at_rank(0).is_err());
    }

    #[tokio::test]
    async fn test_json_shape() {
        let mut request = AnalysisRequest::new("gym", "Chicago");
        request.radius = Radius::ThreeMiles;
        let analysis = run_analysis(&FixtureProvider, &request, &ScoringConfig::default())
            .await
            .unwrap();
        let json = serde_json::to_value(&analysis).unwrap();

        assert_eq!(json["radius"], "3 miles");
        assert_eq!(json["price_tier"], "mid");
        assert_eq!(json["confidence"], "Medium");
        assert_eq!(json["business_category"], "healthcare");
        assert!(json.get("caution").is_none());
        let first = &json["locations"][0];
        assert_eq!(first["rank"], 1);
        assert!(first["name"].is_string());
        assert!(first["lat"].is_number());
        assert!(first["result"]["subscores"]["demand_score"].is_number());
    }
}
