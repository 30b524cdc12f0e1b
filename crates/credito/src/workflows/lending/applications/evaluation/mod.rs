mod config;
mod policy;
mod rules;
mod terms;

pub use config::{
    AgeBands, CriteriaError, DocumentScore, DocumentScores, FactorWeights, InterestBand,
    InterestSchedule, LowerBoundScale, PaymentCountRow, RiskTierThreshold, ScoreTier,
    ScoringCriteria, UpperBoundScale,
};
pub use policy::{decide, risk_tier, weighted_score};
pub use rules::{age_on, income_debt_ratio, loan_income_ratio};
pub use terms::{
    annual_interest_rate, approved_amount, payment_amount, payment_count, round_to, LoanTerms,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    ApplicantProfile, CreditDecision, CreditFactorKind, DocumentType, LoanType, PaymentPeriod,
    RiskTier,
};

/// Stateless evaluator that applies a criteria table to a profile.
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    criteria: ScoringCriteria,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new(ScoringCriteria::default())
    }
}

impl EvaluationEngine {
    pub fn new(criteria: ScoringCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &ScoringCriteria {
        &self.criteria
    }

    /// Run the full pipeline for `profile` as of `today`.
    ///
    /// Applicants outside the eligible age range are rejected before any
    /// factor is scored. Loan terms are derived for every scored profile,
    /// including rejected ones.
    pub fn evaluate(&self, profile: &ApplicantProfile, today: NaiveDate) -> EvaluationOutcome {
        let criteria = &self.criteria;
        let age = age_on(profile.birth_date, today);

        if !criteria.age.admits(age) {
            return EvaluationOutcome::AgeOutOfRange {
                age,
                min_age: criteria.age.min,
                max_age: criteria.age.max,
            };
        }

        let factors = rules::score_profile(profile, age, criteria);
        let score = weighted_score(&factors);
        let tier = risk_tier(score, criteria);
        let decision = decide(score, criteria);
        let loan_terms = terms::derive_terms(score, tier, profile, criteria);
        let key_factors = terms::key_factors(profile, loan_terms.payment_amount);

        EvaluationOutcome::Completed(EvaluationResult {
            applicant: ApplicantSummary {
                name: profile.name.clone(),
                age,
                document_type: profile.document_type,
            },
            evaluation: ScoreSummary {
                score,
                risk_tier: tier,
                decision,
                factors,
            },
            loan: LoanSummary {
                loan_type: profile.loan_type,
                requested_amount: profile.requested_amount,
                approved_amount: loan_terms.approved_amount,
                approval_percentage: score,
            },
            payment: PaymentSummary {
                period: profile.payment_period,
                payment_count: loan_terms.payment_count,
                payment_amount: loan_terms.payment_amount,
                term_months: profile.term_months,
                annual_interest_rate: loan_terms.annual_interest_rate,
            },
            key_factors,
        })
    }
}

/// Discrete contribution to an evaluation, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub factor: CreditFactorKind,
    pub score: u8,
    pub weight: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub name: String,
    pub age: i32,
    pub document_type: DocumentType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub score: f64,
    pub risk_tier: RiskTier,
    pub decision: CreditDecision,
    pub factors: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub loan_type: LoanType,
    pub requested_amount: f64,
    pub approved_amount: f64,
    pub approval_percentage: f64,
}

/// Installment plan. `payment_amount` is `approved_amount / payment_count`
/// with no interest applied; `annual_interest_rate` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub period: PaymentPeriod,
    pub payment_count: u32,
    pub payment_amount: f64,
    pub term_months: u32,
    pub annual_interest_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFactors {
    pub expense_to_income_ratio_pct: i64,
    pub months_employed: u32,
    pub payment_capacity_pct: i64,
}

/// Evaluation output describing the score, decision, and loan terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub applicant: ApplicantSummary,
    pub evaluation: ScoreSummary,
    pub loan: LoanSummary,
    pub payment: PaymentSummary,
    pub key_factors: KeyFactors,
}

/// Engine result: a scored evaluation or a business rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Completed(EvaluationResult),
    AgeOutOfRange { age: i32, min_age: i32, max_age: i32 },
}

impl EvaluationOutcome {
    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            EvaluationOutcome::Completed(result) => Some(result),
            EvaluationOutcome::AgeOutOfRange { .. } => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            EvaluationOutcome::Completed(result) => format!(
                "{} with score {:.1} ({})",
                result.evaluation.decision.label(),
                result.evaluation.score,
                result.evaluation.risk_tier.label()
            ),
            EvaluationOutcome::AgeOutOfRange {
                age,
                min_age,
                max_age,
            } => format!("age out of range ({min_age}–{max_age}); computed age: {age}"),
        }
    }
}
