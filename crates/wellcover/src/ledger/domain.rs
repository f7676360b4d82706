use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::records::{PolicyRecord, UserRecord};
use crate::scoring::{MealScorer, ScoreTrack, ScoringError};

pub const DEFAULT_CALORIE_TARGET: f64 = 2000.0;
pub const DEFAULT_MAX_DAILY_SCORE: f64 = 100.0;
pub const DEFAULT_RUNNING_HEALTH_SCORE: f64 = 50.0;
pub const DEFAULT_BASE_PREMIUM: f64 = 100.0;
pub const DEFAULT_BASE_COVERAGE: f64 = 2000.0;

/// One recognized food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub score: f64,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MealItem {
    pub fn new(score: f64, calories: f64) -> Self {
        Self {
            score,
            calories,
            name: None,
        }
    }
}

/// Immutable record of a single evaluated meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLogEntry {
    pub verified: bool,
    #[serde(with = "meal_date")]
    pub date: NaiveDate,
    pub meal_calories: f64,
    pub meal_score_weighted: f64,
    #[serde(rename = "meal")]
    pub items: Vec<MealItem>,
}

impl MealLogEntry {
    /// Score the items and stamp the entry with the verdict and day.
    pub fn record(
        verified: bool,
        date: NaiveDate,
        items: Vec<MealItem>,
    ) -> Result<Self, ScoringError> {
        let score = MealScorer::compute(&items)?;
        Ok(Self {
            verified,
            date,
            meal_calories: score.total_calories,
            meal_score_weighted: score.weighted_score,
            items,
        })
    }

    pub fn counts_toward(&self, day: NaiveDate) -> bool {
        self.verified && self.date == day
    }
}

/// Diet settings and the append-only meal log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserRecord", into = "UserRecord")]
pub struct UserState {
    pub calorie_target: f64,
    pub max_daily_score: f64,
    pub meal_log: Vec<MealLogEntry>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            calorie_target: DEFAULT_CALORIE_TARGET,
            max_daily_score: DEFAULT_MAX_DAILY_SCORE,
            meal_log: Vec::new(),
        }
    }
}

/// Long-term score tracking plus the premium figures it drives.
///
/// The first two persisted slots hold the running health score (seeded at the
/// curve baseline) and the number of updates folded into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyRecord", into = "PolicyRecord")]
pub struct PolicyState {
    pub running_health_score: f64,
    pub update_count: u32,
    pub premium_adjustment_pct: f64,
    pub base_premium: f64,
    pub base_coverage: f64,
}

impl PolicyState {
    pub fn track(&self) -> ScoreTrack {
        ScoreTrack {
            running_health_score: self.running_health_score,
            update_count: self.update_count,
        }
    }

    pub fn advance(&mut self, track: ScoreTrack, premium_adjustment_pct: f64) {
        self.running_health_score = track.running_health_score;
        self.update_count = track.update_count;
        self.premium_adjustment_pct = premium_adjustment_pct;
    }
}

impl Default for PolicyState {
    fn default() -> Self {
        Self {
            running_health_score: DEFAULT_RUNNING_HEALTH_SCORE,
            update_count: 1,
            premium_adjustment_pct: 0.0,
            base_premium: DEFAULT_BASE_PREMIUM,
            base_coverage: DEFAULT_BASE_COVERAGE,
        }
    }
}

/// Meal days persist as `dd-mm-YYYY`.
pub mod meal_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT).map_err(|err| {
            serde::de::Error::custom(format!("failed to parse '{raw}' as dd-mm-YYYY ({err})"))
        })
    }
}
