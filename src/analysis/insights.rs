use crate::scoring::LocationMetrics;

pub const LOW_COMPETITION_MAX: u32 = 2;
pub const HIGH_COMPETITION_MIN: u32 = 8;
pub const HIGH_INCOME_MIN: f64 = 60_000.0;
pub const BUDGET_INCOME_MAX: f64 = 40_000.0;
pub const DENSE_POPULATION_MIN: u64 = 15_000;
pub const HIGH_FOOT_TRAFFIC_MIN: f64 = 70.0;
pub const HIGH_VACANCY_MIN: f64 = 60.0;

/// Group digits in thousands: 179335 -> "179,335".
pub(crate) fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Plain-language observations about a location's metrics.
pub fn derive_insights(metrics: &LocationMetrics) -> Vec<String> {
    let mut insights = Vec::new();

    if metrics.competitor_count <= LOW_COMPETITION_MAX {
        insights.push(format!(
            "Low competition in this area - only {} similar businesses nearby",
            metrics.competitor_count
        ));
    } else if metrics.competitor_count >= HIGH_COMPETITION_MIN {
        insights.push(format!(
            "High competition area with {} competitors - consider differentiation strategies",
            metrics.competitor_count
        ));
    }

    let income = metrics.median_income;
    if income >= HIGH_INCOME_MIN {
        insights.push(format!(
            "High-income area (${}) - premium pricing potential",
            with_commas(income.round() as u64)
        ));
    } else if income <= BUDGET_INCOME_MAX {
        insights.push(format!(
            "Budget-conscious area (${}) - focus on value pricing",
            with_commas(income.max(0.0).round() as u64)
        ));
    }

    if metrics.population >= DENSE_POPULATION_MIN {
        insights.push(format!(
            "Dense population area ({}) - strong customer base",
            with_commas(metrics.population)
        ));
    }

    if metrics
        .foot_traffic_index
        .is_some_and(|t| t >= HIGH_FOOT_TRAFFIC_MIN)
    {
        insights.push(
            "High foot traffic area - excellent visibility for walk-in customers".to_string(),
        );
    }

    if metrics.vacancy_index.is_some_and(|v| v >= HIGH_VACANCY_MIN) {
        insights.push(
            "High vacancy rate - more available spaces and potentially lower rent".to_string(),
        );
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_commas() {
        assert_eq!(with_commas(0), "0");
        assert_eq!(with_commas(999), "999");
        assert_eq!(with_commas(1_000), "1,000");
        assert_eq!(with_commas(8_336_817), "8,336,817");
    }

    #[test]
    fn test_strong_location_insights() {
        let metrics = LocationMetrics {
            competitor_count: 1,
            population: 143_468,
            median_income: 66_000.0,
            foot_traffic_index: Some(82.0),
            vacancy_index: Some(48.0),
            ..Default::default()
        };
        let insights = derive_insights(&metrics);
        assert_eq!(insights.len(), 4);
        assert_eq!(
            insights[0],
            "Low competition in this area - only 1 similar businesses nearby"
        );
        assert_eq!(
            insights[1],
            "High-income area ($66,000) - premium pricing potential"
        );
        assert_eq!(
            insights[2],
            "Dense population area (143,468) - strong customer base"
        );
        assert!(insights[3].starts_with("High foot traffic"));
    }

    #[test]
    fn test_weak_location_insights() {
        let metrics = LocationMetrics {
            competitor_count: 9,
            population: 400,
            median_income: 38_000.0,
            foot_traffic_index: Some(30.0),
            vacancy_index: Some(75.0),
            ..Default::default()
        };
        let insights = derive_insights(&metrics);
        assert_eq!(insights.len(), 3);
        assert!(insights[0].starts_with("High competition area with 9 competitors"));
        assert!(insights[1].starts_with("Budget-conscious area ($38,000)"));
        assert!(insights[2].starts_with("High vacancy rate"));
    }

    #[test]
    fn test_middling_location_has_no_insights() {
        let metrics = LocationMetrics {
            competitor_count: 5,
            population: 10_000,
            median_income: 50_000.0,
            foot_traffic_index: None,
            vacancy_index: None,
            ..Default::default()
        };
        assert!(derive_insights(&metrics).is_empty());
    }
}
