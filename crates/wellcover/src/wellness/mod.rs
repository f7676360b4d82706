//! Meal evaluation, score tracking, and policy quoting composed over the
//! state repository and external collaborators.

pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use router::{wellness_router, DayQuery, MealEvaluationRequest};
pub use service::{
    CaptureCollaborators, MealCapture, ScoreBoard, ScoreUpdate, WellnessService,
    WellnessServiceError,
};
