use serde::{Deserialize, Serialize};

use super::super::compensation::format_currency;
use super::config::NegotiationThresholds;
use super::ScoredOffer;

/// Deterministic negotiation guidance for one offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NegotiationSignal {
    RaiseCompensation { competitor: String, gap: f64 },
    LeverageNonFinancial { competitor: String, margin: f64 },
    AskAboutEquity { competitor: String },
    Competitive,
}

impl NegotiationSignal {
    pub fn message(&self) -> String {
        match self {
            NegotiationSignal::RaiseCompensation { competitor, gap } => format!(
                "Request a salary or bonus increase: this offer trails {} by {} per year in cost-of-living adjusted total compensation.",
                competitor,
                format_currency(*gap)
            ),
            NegotiationSignal::LeverageNonFinancial { competitor, margin } => format!(
                "Use this offer's non-financial strengths as leverage: it rates {:.0} points above {} on culture, growth, balance and remote policy while paying less.",
                margin, competitor
            ),
            NegotiationSignal::AskAboutEquity { competitor } => format!(
                "Ask about equity eligibility: {} includes equity and this offer does not.",
                competitor
            ),
            NegotiationSignal::Competitive => {
                "Competitive offer, no immediate negotiation gap identified.".to_string()
            }
        }
    }
}

/// Evaluate the rule set for every offer against its best competing offer.
pub(crate) fn negotiation_signals(
    scored: &[ScoredOffer],
    thresholds: &NegotiationThresholds,
) -> Vec<Vec<NegotiationSignal>> {
    (0..scored.len())
        .map(|index| signals_for(index, scored, thresholds))
        .collect()
}

fn signals_for(
    index: usize,
    scored: &[ScoredOffer],
    thresholds: &NegotiationThresholds,
) -> Vec<NegotiationSignal> {
    let offer = &scored[index];
    let mut signals = Vec::new();

    if let Some(best) = best_competitor(index, scored) {
        if best.financial_score - offer.financial_score > thresholds.financial_gap_points {
            signals.push(NegotiationSignal::RaiseCompensation {
                competitor: best.company.clone(),
                gap: best.col_adjusted_total - offer.col_adjusted_total,
            });
        }

        let margin = offer.non_financial_score - best.non_financial_score;
        if margin > thresholds.non_financial_margin_points
            && offer.financial_score < best.financial_score
        {
            signals.push(NegotiationSignal::LeverageNonFinancial {
                competitor: best.company.clone(),
                margin,
            });
        }
    }

    if offer.compensation.equity == 0.0 {
        let equity_holder = scored
            .iter()
            .enumerate()
            .filter(|(other, candidate)| *other != index && candidate.compensation.equity > 0.0)
            .fold(None::<&ScoredOffer>, |best, (_, candidate)| match best {
                Some(current) if current.compensation.equity >= candidate.compensation.equity => {
                    Some(current)
                }
                _ => Some(candidate),
            });

        if let Some(holder) = equity_holder {
            signals.push(NegotiationSignal::AskAboutEquity {
                competitor: holder.company.clone(),
            });
        }
    }

    if signals.is_empty() {
        signals.push(NegotiationSignal::Competitive);
    }

    signals
}

/// Highest financial score among the other offers; the earliest wins ties.
fn best_competitor(index: usize, scored: &[ScoredOffer]) -> Option<&ScoredOffer> {
    scored
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != index)
        .fold(None::<&ScoredOffer>, |best, (_, candidate)| match best {
            Some(current) if current.financial_score >= candidate.financial_score => Some(current),
            _ => Some(candidate),
        })
}
