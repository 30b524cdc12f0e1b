use super::super::domain::{CreditDecision, RiskTier};
use super::config::ScoringCriteria;
use super::ScoreComponent;

const BASIS_POINTS: f64 = 10_000.0;

/// Weighted sum of the factor scores, rounded half-up to one decimal.
///
/// Weights are converted to basis points so the sum is exact integer arithmetic
/// and `.x5` cases always round up.
pub fn weighted_score(components: &[ScoreComponent]) -> f64 {
    let weighted: i64 = components
        .iter()
        .map(|component| {
            let basis_points = (component.weight * BASIS_POINTS).round() as i64;
            i64::from(component.score) * basis_points
        })
        .sum();

    // `weighted` is in 1/10_000ths of a point; tenths are weighted / 1_000.
    let tenths = (weighted + 500).div_euclid(1_000);
    tenths as f64 / 10.0
}

pub fn risk_tier(score: f64, criteria: &ScoringCriteria) -> RiskTier {
    criteria
        .risk_tiers
        .iter()
        .find(|threshold| score >= threshold.min_score)
        .map(|threshold| threshold.tier)
        .unwrap_or(criteria.fallback_tier)
}

/// Approval uses its own threshold, independent of the tier boundaries.
pub fn decide(score: f64, criteria: &ScoringCriteria) -> CreditDecision {
    if score >= criteria.approval_threshold {
        CreditDecision::Approved
    } else {
        CreditDecision::Rejected
    }
}
