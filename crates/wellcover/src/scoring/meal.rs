use serde::Serialize;

use super::ScoringError;
use crate::ledger::MealItem;

/// Calorie total and calorie-weighted quality of one meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealScore {
    pub total_calories: f64,
    pub weighted_score: f64,
}

pub struct MealScorer;

impl MealScorer {
    /// Weight each item's score by its calories. An empty or zero-calorie
    /// meal has no defined average and is rejected.
    ///
    /// Items must carry finite values and non-negative calories, and both
    /// totals must stay finite; anything else never reaches the meal log.
    pub fn compute(items: &[MealItem]) -> Result<MealScore, ScoringError> {
        for (index, item) in items.iter().enumerate() {
            validate_item(index, item)?;
        }

        let total_calories: f64 = items.iter().map(|item| item.calories).sum();
        if total_calories == 0.0 {
            return Err(ScoringError::DegenerateInput);
        }

        let weighted_sum: f64 = items.iter().map(|item| item.score * item.calories).sum();
        let weighted_score = weighted_sum / total_calories;
        if !total_calories.is_finite() || !weighted_score.is_finite() {
            return Err(ScoringError::NonFiniteScore);
        }

        Ok(MealScore {
            total_calories,
            weighted_score,
        })
    }
}

fn validate_item(index: usize, item: &MealItem) -> Result<(), ScoringError> {
    let reason = if !item.calories.is_finite() {
        "calories must be finite"
    } else if item.calories < 0.0 {
        "calories must not be negative"
    } else if !item.score.is_finite() {
        "score must be finite"
    } else {
        return Ok(());
    };
    Err(ScoringError::InvalidItem { index, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_calories_yield_arithmetic_mean() {
        let items = vec![
            MealItem::new(0.2, 150.0),
            MealItem::new(0.5, 150.0),
            MealItem::new(0.8, 150.0),
        ];

        let score = MealScorer::compute(&items).expect("meal scores");
        assert_eq!(score.total_calories, 450.0);
        assert!((score.weighted_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn heavier_items_dominate_the_average() {
        let items = vec![MealItem::new(1.0, 900.0), MealItem::new(0.0, 100.0)];
        let score = MealScorer::compute(&items).expect("meal scores");
        assert!((score.weighted_score - 0.9).abs() < 1e-12);
    }

    #[test]
    fn zero_calorie_meal_is_degenerate() {
        let items = vec![MealItem::new(5.0, 0.0)];
        assert_eq!(MealScorer::compute(&items), Err(ScoringError::DegenerateInput));
    }

    #[test]
    fn empty_meal_is_degenerate() {
        assert_eq!(MealScorer::compute(&[]), Err(ScoringError::DegenerateInput));
    }

    #[test]
    fn negative_calories_are_rejected() {
        let items = vec![MealItem::new(1.0, -300.0)];
        assert_eq!(
            MealScorer::compute(&items),
            Err(ScoringError::InvalidItem {
                index: 0,
                reason: "calories must not be negative"
            })
        );
    }

    #[test]
    fn mixed_sign_calories_do_not_cancel_out() {
        let items = vec![MealItem::new(0.4, 300.0), MealItem::new(0.9, -300.0)];
        assert!(matches!(
            MealScorer::compute(&items),
            Err(ScoringError::InvalidItem { index: 1, .. })
        ));
    }

    #[test]
    fn non_finite_item_values_are_rejected() {
        assert!(matches!(
            MealScorer::compute(&[MealItem::new(0.5, f64::NAN)]),
            Err(ScoringError::InvalidItem { index: 0, .. })
        ));
        assert!(matches!(
            MealScorer::compute(&[MealItem::new(0.5, 100.0), MealItem::new(f64::INFINITY, 100.0)]),
            Err(ScoringError::InvalidItem { index: 1, .. })
        ));
    }

    #[test]
    fn overflowing_weighted_score_is_rejected() {
        let items = vec![MealItem::new(1e308, 10.0)];
        assert_eq!(MealScorer::compute(&items), Err(ScoringError::NonFiniteScore));

        let items = vec![MealItem::new(0.5, 1e308), MealItem::new(0.5, 1e308)];
        assert_eq!(MealScorer::compute(&items), Err(ScoringError::NonFiniteScore));
    }

    #[test]
    fn scores_outside_unit_range_pass_through() {
        let items = vec![MealItem::new(7.0, 200.0), MealItem::new(9.0, 200.0)];
        let score = MealScorer::compute(&items).expect("meal scores");
        assert_eq!(score.weighted_score, 8.0);
    }
}
