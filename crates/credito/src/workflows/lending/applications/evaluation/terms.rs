//! Loan terms derived from the overall score.
//!
//! Installments are a plain split of the approved amount. The annual interest
//! rate is reported alongside but is not folded into `payment_amount`.

use serde::{Deserialize, Serialize};

use super::super::domain::{ApplicantProfile, PaymentPeriod, RiskTier};
use super::config::{InterestSchedule, PaymentCountRow, ScoringCriteria};
use super::rules::income_debt_ratio;
use super::KeyFactors;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub approved_amount: f64,
    pub payment_count: u32,
    pub payment_amount: f64,
    pub annual_interest_rate: f64,
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

pub fn approved_amount(score: f64, requested_amount: f64) -> f64 {
    round_to((score / 100.0) * requested_amount, 2)
}

/// First row whose bound covers `score_ratio`; zero when no row matches.
pub fn payment_count(score_ratio: f64, period: PaymentPeriod, rows: &[PaymentCountRow]) -> u32 {
    rows.iter()
        .find(|row| score_ratio <= row.max_ratio)
        .map(|row| row.count_for(period))
        .unwrap_or(0)
}

/// Tier rate interpolated by distance from the tier's anchor, clamped and rounded.
pub fn annual_interest_rate(score: f64, tier: RiskTier, schedule: &InterestSchedule) -> f64 {
    let raw = schedule
        .bands
        .iter()
        .find(|band| band.tier == tier)
        .map(|band| band.rate_at(score))
        .unwrap_or(schedule.ceiling);

    round_to(raw.clamp(schedule.floor, schedule.ceiling), 2)
}

pub fn payment_amount(approved_amount: f64, payment_count: u32) -> f64 {
    if payment_count == 0 {
        return 0.0;
    }
    round_to(approved_amount / f64::from(payment_count), 2)
}

pub(crate) fn derive_terms(
    score: f64,
    tier: RiskTier,
    profile: &ApplicantProfile,
    criteria: &ScoringCriteria,
) -> LoanTerms {
    let approved_amount = approved_amount(score, profile.requested_amount);
    let payment_count = payment_count(
        score / 100.0,
        profile.payment_period,
        &criteria.payment_counts,
    );

    LoanTerms {
        approved_amount,
        payment_count,
        payment_amount: payment_amount(approved_amount, payment_count),
        annual_interest_rate: annual_interest_rate(score, tier, &criteria.interest),
    }
}

pub(crate) fn key_factors(profile: &ApplicantProfile, payment_amount: f64) -> KeyFactors {
    let expense_ratio = income_debt_ratio(profile.monthly_income, profile.monthly_expenses);

    let monthly_installments =
        payment_amount * f64::from(profile.payment_period.periods_per_month());
    let capacity = if monthly_installments == 0.0 {
        0.0
    } else {
        (profile.monthly_income - profile.monthly_expenses) / monthly_installments * 100.0
    };

    KeyFactors {
        expense_to_income_ratio_pct: whole_percent(expense_ratio * 100.0),
        months_employed: profile.months_employed,
        payment_capacity_pct: whole_percent(capacity),
    }
}

fn whole_percent(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}
