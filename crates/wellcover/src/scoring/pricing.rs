use serde::Serialize;

use crate::ledger::PolicyState;

/// Adjusted premium and coverage for a policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyQuote {
    pub premium: f64,
    pub coverage: f64,
}

pub struct PolicyPricer;

impl PolicyPricer {
    pub fn quote(policy: &PolicyState) -> PolicyQuote {
        let multiplier = 1.0 + policy.premium_adjustment_pct / 100.0;
        PolicyQuote {
            premium: policy.base_premium * multiplier,
            coverage: policy.base_coverage * multiplier,
        }
    }
}
