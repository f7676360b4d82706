use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASELINE: f64 = 50.0;
pub const DEFAULT_WIDTH: f64 = 10.0;

const CURVE_OFFSET: f64 = 10.0;
const DECAY: f64 = 0.05;

/// Bell-shaped premium response centred on the baseline health score.
///
/// The bump is mirrored by the sign of the deviation, so scores on either
/// side of the baseline move the premium in opposite directions and the
/// baseline itself yields no adjustment.
///
/// The peak coefficient is `25 * width * sqrt(2*pi)`, about 627 at the default
/// width, so a score a few points off the baseline moves the premium by several
/// hundred percent. Any adjustment below -100% turns the quote from
/// [`PolicyPricer`](super::PolicyPricer) negative for both premium and coverage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumCurve {
    pub baseline: f64,
    pub width: f64,
}

impl Default for PremiumCurve {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE,
            width: DEFAULT_WIDTH,
        }
    }
}

impl PremiumCurve {
    pub fn new(baseline: f64, width: f64) -> Self {
        Self { baseline, width }
    }

    /// Signed premium adjustment, in percent, for a running health score.
    pub fn adjustment(&self, score: f64) -> f64 {
        let deviation = score - self.baseline;
        if deviation == 0.0 {
            return 0.0;
        }

        let scaled = 2.0 * deviation / self.width;
        let bump = -(25.0 * self.width) * (2.0 * PI).sqrt() * (-DECAY * scaled.powi(2)).exp()
            + CURVE_OFFSET;

        bump * -deviation.signum()
    }
}
