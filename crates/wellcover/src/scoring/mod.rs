//! Pure scoring functions: meal quality, daily diet, long-term health, and
//! the premium curve that prices the policy.

mod diet;
mod health;
mod meal;
mod premium;
mod pricing;

pub use diet::DailyDietAggregator;
pub use health::{HealthScoreTracker, ScoreTrack};
pub use meal::{MealScore, MealScorer};
pub use premium::PremiumCurve;
pub use pricing::{PolicyPricer, PolicyQuote};

/// Error raised when a score cannot be computed from its inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("meal has zero total calories; weighted score is undefined")]
    DegenerateInput,
    #[error("meal item {index} is unusable: {reason}")]
    InvalidItem { index: usize, reason: &'static str },
    #[error("meal totals exceed the representable range")]
    NonFiniteScore,
    #[error("update counter is exhausted at {0}")]
    UpdateCountExhausted(u32),
}
