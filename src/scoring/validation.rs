use super::config::ScoringConfig;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !config.c_scale.is_finite() || config.c_scale <= 0.0 {
        errors.push(format!(
            "scoring.c_scale: must be a positive number, got {}",
            config.c_scale
        ));
    }

    let mut weights_ok = true;
    for (name, value) in config.weights.as_pairs() {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!(
                "scoring.weights.{}: must be a non-negative number, got {}",
                name, value
            ));
            weights_ok = false;
        }
    }

    // Only meaningful once every weight is a real number
    if weights_ok {
        let sum = config.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!(
                "scoring.weights: must sum to 1.0, got {:.4}",
                sum
            ));
        }
    }

    let tiers = [
        ("budget", config.price_tiers.budget),
        ("mid", config.price_tiers.mid),
        ("premium", config.price_tiers.premium),
    ];
    for (name, value) in tiers {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!(
                "scoring.price_tiers.{}: must be a positive multiplier, got {}",
                name, value
            ));
        }
    }

    if config.low_demand.penalty_points > 100 {
        errors.push(format!(
            "scoring.low_demand.penalty_points: must be at most 100, got {}",
            config.low_demand.penalty_points
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
