//! Positional storage layout for the two state records.
//!
//! User record: `[calorie_target, max_daily_score, meal_log]`.
//! Policy record: `[baseline_score, update_count, premium_adjustment_pct, base_premium, base_coverage]`.

use serde::{Deserialize, Serialize};

use super::domain::{MealLogEntry, PolicyState, UserState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct UserRecord(f64, f64, Vec<MealLogEntry>);

impl From<UserRecord> for UserState {
    fn from(UserRecord(calorie_target, max_daily_score, meal_log): UserRecord) -> Self {
        Self {
            calorie_target,
            max_daily_score,
            meal_log,
        }
    }
}

impl From<UserState> for UserRecord {
    fn from(state: UserState) -> Self {
        Self(state.calorie_target, state.max_daily_score, state.meal_log)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PolicyRecord(f64, u32, f64, f64, f64);

impl TryFrom<PolicyRecord> for PolicyState {
    type Error = String;

    fn try_from(
        PolicyRecord(running_health_score, update_count, premium_adjustment_pct, base_premium, base_coverage): PolicyRecord,
    ) -> Result<Self, Self::Error> {
        if update_count == 0 {
            return Err("policy record update_count must be at least 1".to_string());
        }

        Ok(Self {
            running_health_score,
            update_count,
            premium_adjustment_pct,
            base_premium,
            base_coverage,
        })
    }
}

impl From<PolicyState> for PolicyRecord {
    fn from(state: PolicyState) -> Self {
        Self(
            state.running_health_score,
            state.update_count,
            state.premium_adjustment_pct,
            state.base_premium,
            state.base_coverage,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_serialize_to_positional_arrays() {
        let user = serde_json::to_value(UserState::default()).expect("user serializes");
        let policy = serde_json::to_value(PolicyState::default()).expect("policy serializes");

        assert_eq!(user, json!([2000.0, 100.0, []]));
        assert_eq!(policy, json!([50.0, 1, 0.0, 100.0, 2000.0]));
    }

    #[test]
    fn reads_existing_positional_user_record() {
        let raw = json!([
            1800,
            100,
            [{
                "verified": true,
                "date": "02-01-2025",
                "meal_calories": 600,
                "meal_score_weighted": 0.7,
                "meal": [{"score": 0.7, "calories": 600, "name": "salad"}]
            }]
        ]);

        let user: UserState = serde_json::from_value(raw).expect("record parses");
        assert_eq!(user.calorie_target, 1800.0);
        assert_eq!(user.meal_log.len(), 1);
        assert_eq!(user.meal_log[0].items[0].name.as_deref(), Some("salad"));
    }

    #[test]
    fn rejects_policy_record_with_zero_updates() {
        let raw = json!([50, 0, 0, 100, 2000]);
        assert!(serde_json::from_value::<PolicyState>(raw).is_err());
    }

    #[test]
    fn rejects_short_policy_record() {
        let raw = json!([50, 1, 0]);
        assert!(serde_json::from_value::<PolicyState>(raw).is_err());
    }
}
