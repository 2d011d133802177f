use serde::{Deserialize, Serialize};

/// Scores closer than this are treated as tied.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Point gaps that trigger negotiation guidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegotiationThresholds {
    pub financial_gap_points: f64,
    pub non_financial_margin_points: f64,
}

impl Default for NegotiationThresholds {
    fn default() -> Self {
        Self {
            financial_gap_points: 10.0,
            non_financial_margin_points: 10.0,
        }
    }
}
