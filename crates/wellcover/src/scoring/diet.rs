use chrono::NaiveDate;

use crate::ledger::MealLogEntry;

pub struct DailyDietAggregator;

impl DailyDietAggregator {
    /// Fold the verified meals logged on `today` into a diet score.
    ///
    /// Calories above `calorie_target` are subtracted one-for-one from the
    /// weighted total before scaling; the result is floored at zero and
    /// truncated.
    pub fn compute(
        meal_log: &[MealLogEntry],
        today: NaiveDate,
        calorie_target: f64,
        max_score: f64,
    ) -> u32 {
        let (day_calories, weighted_total) = meal_log
            .iter()
            .filter(|entry| entry.counts_toward(today))
            .fold((0.0_f64, 0.0_f64), |(calories, weighted), entry| {
                (
                    calories + entry.meal_calories,
                    weighted + entry.meal_calories * entry.meal_score_weighted,
                )
            });

        let excess = (day_calories - calorie_target).max(0.0);
        let raw = weighted_total - excess;
        let score = (raw / calorie_target * max_score).max(0.0);

        score.trunc() as u32
    }
}
