use serde::{Deserialize, Serialize};

use super::ScoringError;

/// Running health score and the number of samples folded into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrack {
    pub running_health_score: f64,
    pub update_count: u32,
}

pub struct HealthScoreTracker;

impl HealthScoreTracker {
    /// Instantaneous sample: the floored mean of the three truncated scores.
    pub fn combine(activity_score: f64, sleep_score: f64, diet_score: f64) -> i64 {
        let total =
            activity_score.trunc() as i64 + sleep_score.trunc() as i64 + diet_score.trunc() as i64;
        total.div_euclid(3)
    }

    /// Fold one sample into the running score.
    ///
    /// The step is taken from the sample itself, not from the previous running
    /// score, so this is not a textbook incremental mean. Existing policies
    /// were priced with this rule; keep it as is.
    pub fn update(track: ScoreTrack, sample: i64) -> Result<ScoreTrack, ScoringError> {
        let update_count = track
            .update_count
            .checked_add(1)
            .ok_or(ScoringError::UpdateCountExhausted(track.update_count))?;
        let sample = sample as f64;
        let running_health_score =
            sample + (1.0 / f64::from(update_count)) * (sample - track.running_health_score);

        Ok(ScoreTrack {
            running_health_score,
            update_count,
        })
    }
}
