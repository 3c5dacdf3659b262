pub mod config;
pub mod engine;
pub mod factors;
pub mod rank;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, LocationMetrics, ScoreBreakdown, ScoreResult, Subscores};
pub use factors::{count_from_f64, PriceTier};
pub use rank::{rank, Ranked, ScoreLabel};
pub use validation::validate_scoring;
