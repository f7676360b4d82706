use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{HealthDataProvider, HealthReading, UpstreamError};

pub const IDEAL_STEPS: f64 = 10_000.0;
pub const IDEAL_HEART_POINTS: f64 = 25.0;
pub const IDEAL_CALORIES_BURNED: f64 = 2_000.0;
pub const IDEAL_SLEEP_HOURS: f64 = 8.0;

/// Raw daily measurements from a fitness tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessMetrics {
    pub steps: f64,
    pub heart_points: f64,
    pub calories_burned: f64,
    pub hours_slept: f64,
}

impl FitnessMetrics {
    /// 0–100 activity score: steps weigh 40, heart points and burned calories 30 each.
    pub fn activity_score(&self) -> f64 {
        40.0 * capped_ratio(self.steps, IDEAL_STEPS)
            + 30.0 * capped_ratio(self.heart_points, IDEAL_HEART_POINTS)
            + 30.0 * capped_ratio(self.calories_burned, IDEAL_CALORIES_BURNED)
    }

    pub fn sleep_score(&self) -> f64 {
        100.0 * capped_ratio(self.hours_slept, IDEAL_SLEEP_HOURS)
    }

    pub fn reading(&self) -> HealthReading {
        HealthReading {
            activity_score: self.activity_score(),
            sleep_score: self.sleep_score(),
        }
    }
}

fn capped_ratio(value: f64, ideal: f64) -> f64 {
    (value / ideal).min(1.0)
}

/// Source of raw tracker measurements for the current period.
#[async_trait]
pub trait FitnessSource: Send + Sync {
    async fn metrics(&self) -> Result<FitnessMetrics, UpstreamError>;
}

#[async_trait]
impl<S> FitnessSource for Arc<S>
where
    S: FitnessSource + ?Sized,
{
    async fn metrics(&self) -> Result<FitnessMetrics, UpstreamError> {
        (**self).metrics().await
    }
}

/// Turns raw tracker measurements into activity and sleep scores.
pub struct MetricsHealthProvider<S> {
    source: S,
}

impl<S> MetricsHealthProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S> HealthDataProvider for MetricsHealthProvider<S>
where
    S: FitnessSource,
{
    async fn current(&self) -> Result<HealthReading, UpstreamError> {
        let metrics = self.source.metrics().await?;
        Ok(metrics.reading())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(FitnessMetrics);

    #[async_trait]
    impl FitnessSource for Fixed {
        async fn metrics(&self) -> Result<FitnessMetrics, UpstreamError> {
            Ok(self.0)
        }
    }

    struct Offline;

    #[async_trait]
    impl FitnessSource for Offline {
        async fn metrics(&self) -> Result<FitnessMetrics, UpstreamError> {
            Err(UpstreamError::request("fitness", "connection refused"))
        }
    }

    #[test]
    fn activity_score_weights_each_metric() {
        let metrics = FitnessMetrics {
            steps: 5_000.0,
            heart_points: 25.0,
            calories_burned: 1_000.0,
            hours_slept: 0.0,
        };
        assert!((metrics.activity_score() - 65.0).abs() < 1e-9);
    }

    #[test]
    fn scores_cap_at_ideal_values() {
        let metrics = FitnessMetrics {
            steps: 30_000.0,
            heart_points: 90.0,
            calories_burned: 4_000.0,
            hours_slept: 9.0,
        };
        assert_eq!(metrics.activity_score(), 100.0);
        assert_eq!(metrics.sleep_score(), 100.0);
    }

    #[test]
    fn sleep_score_scales_with_hours() {
        let metrics = FitnessMetrics {
            hours_slept: 6.0,
            ..FitnessMetrics::default()
        };
        assert_eq!(metrics.sleep_score(), 75.0);
    }

    #[tokio::test]
    async fn provider_converts_metrics_to_reading() {
        let provider = MetricsHealthProvider::new(Fixed(FitnessMetrics {
            steps: 10_000.0,
            heart_points: 0.0,
            calories_burned: 0.0,
            hours_slept: 4.0,
        }));

        let reading = provider.current().await.expect("reading");
        assert_eq!(reading.activity_score, 40.0);
        assert_eq!(reading.sleep_score, 50.0);
    }

    #[tokio::test]
    async fn provider_surfaces_source_failures() {
        let provider = MetricsHealthProvider::new(Offline);
        match provider.current().await {
            Err(UpstreamError::Request { collaborator, .. }) => assert_eq!(collaborator, "fitness"),
            other => panic!("expected upstream failure, got {other:?}"),
        }
    }
}
