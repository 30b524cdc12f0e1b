use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::super::domain::{DocumentType, PaymentPeriod, RiskTier};

/// Scoring criteria: thresholds, weights, and lookup tables for one evaluation.
///
/// Treated as immutable once handed to an engine. Replacing criteria at runtime
/// means building a new engine, never mutating this value in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringCriteria {
    pub weights: FactorWeights,
    /// Expenses over income, scanned for the first `ratio <= bound`.
    pub income_debt: UpperBoundScale,
    /// Months employed, scanned for the first `months >= bound`.
    pub employment: LowerBoundScale,
    /// Requested amount over annual income, scanned for the first `ratio <= bound`.
    pub loan_income: UpperBoundScale,
    pub age: AgeBands,
    pub document: DocumentScores,
    /// Descending minimum scores; the first `score >= min_score` wins.
    pub risk_tiers: Vec<RiskTierThreshold>,
    pub fallback_tier: RiskTier,
    pub approval_threshold: f64,
    pub payment_counts: Vec<PaymentCountRow>,
    pub interest: InterestSchedule,
}

impl Default for ScoringCriteria {
    fn default() -> Self {
        Self {
            weights: FactorWeights {
                income_debt: 0.30,
                employment: 0.25,
                loan_income: 0.25,
                age: 0.10,
                document: 0.10,
            },
            income_debt: UpperBoundScale {
                tiers: vec![
                    ScoreTier::new(0.25, 100),
                    ScoreTier::new(0.35, 85),
                    ScoreTier::new(0.45, 70),
                    ScoreTier::new(0.55, 50),
                ],
                fallback: 25,
            },
            employment: LowerBoundScale {
                tiers: vec![
                    ScoreTier::new(48, 100),
                    ScoreTier::new(36, 85),
                    ScoreTier::new(24, 70),
                    ScoreTier::new(12, 50),
                ],
                fallback: 25,
            },
            loan_income: UpperBoundScale {
                tiers: vec![
                    ScoreTier::new(3.0, 100),
                    ScoreTier::new(4.0, 85),
                    ScoreTier::new(5.0, 70),
                    ScoreTier::new(6.0, 50),
                ],
                fallback: 25,
            },
            age: AgeBands {
                optimal_min: 25,
                optimal_max: 55,
                min: 18,
                max: 70,
                optimal_score: 100,
                accepted_score: 85,
                fallback: 50,
            },
            document: DocumentScores {
                scores: vec![
                    DocumentScore {
                        document_type: DocumentType::Cedula,
                        score: 100,
                    },
                    DocumentScore {
                        document_type: DocumentType::Passport,
                        score: 90,
                    },
                ],
                fallback: 80,
            },
            risk_tiers: vec![
                RiskTierThreshold::new(85.0, RiskTier::VeryLow),
                RiskTierThreshold::new(75.0, RiskTier::Low),
                RiskTierThreshold::new(65.0, RiskTier::Medium),
                RiskTierThreshold::new(50.0, RiskTier::High),
            ],
            fallback_tier: RiskTier::VeryHigh,
            approval_threshold: 70.0,
            payment_counts: vec![
                PaymentCountRow::new(0.70, 8, 4, 3),
                PaymentCountRow::new(0.85, 13, 7, 6),
                PaymentCountRow::new(1.00, 15, 8, 12),
            ],
            interest: InterestSchedule {
                bands: vec![
                    InterestBand::new(RiskTier::VeryLow, 8.0, 100.0, 15.0, 4.0),
                    InterestBand::new(RiskTier::Low, 12.0, 85.0, 10.0, 4.0),
                    InterestBand::new(RiskTier::Medium, 16.0, 75.0, 10.0, 4.0),
                    InterestBand::new(RiskTier::High, 20.0, 65.0, 15.0, 5.0),
                    InterestBand::new(RiskTier::VeryHigh, 25.0, 50.0, 50.0, 5.0),
                ],
                floor: 8.0,
                ceiling: 30.0,
            },
        }
    }
}

impl ScoringCriteria {
    /// Load a criteria table from a JSON file and validate it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CriteriaError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CriteriaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let criteria: ScoringCriteria =
            serde_json::from_str(&raw).map_err(|source| CriteriaError::Format {
                path: path.to_path_buf(),
                source,
            })?;
        criteria.validate()?;
        Ok(criteria)
    }

    pub fn validate(&self) -> Result<(), CriteriaError> {
        self.weights.validate()?;

        if !self.income_debt.is_ascending() {
            return Err(CriteriaError::UnorderedTable("incomeDebt"));
        }
        if !self.loan_income.is_ascending() {
            return Err(CriteriaError::UnorderedTable("loanIncome"));
        }
        if !self.employment.is_descending() {
            return Err(CriteriaError::UnorderedTable("employment"));
        }
        if self
            .risk_tiers
            .windows(2)
            .any(|pair| pair[0].min_score <= pair[1].min_score)
        {
            return Err(CriteriaError::UnorderedTable("riskTiers"));
        }
        if self
            .payment_counts
            .windows(2)
            .any(|pair| pair[0].max_ratio >= pair[1].max_ratio)
        {
            return Err(CriteriaError::UnorderedTable("paymentCounts"));
        }
        if self.age.min > self.age.max
            || self.age.optimal_min > self.age.optimal_max
            || self.age.optimal_min < self.age.min
            || self.age.optimal_max > self.age.max
        {
            return Err(CriteriaError::InvalidAgeBands);
        }
        if !self.interest.floor.is_finite()
            || !self.interest.ceiling.is_finite()
            || self.interest.floor > self.interest.ceiling
        {
            return Err(CriteriaError::InvalidInterestBounds {
                floor: self.interest.floor,
                ceiling: self.interest.ceiling,
            });
        }
        if self
            .interest
            .bands
            .iter()
            .any(|band| !(band.span.is_finite() && band.span > 0.0))
        {
            return Err(CriteriaError::UnorderedTable("interest"));
        }

        Ok(())
    }
}

/// Factor weights as fractions of the overall score; they sum to 1.00.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorWeights {
    pub income_debt: f64,
    pub employment: f64,
    pub loan_income: f64,
    pub age: f64,
    pub document: f64,
}

const WEIGHT_TOLERANCE: f64 = 1e-9;
/// Weights are scored in whole basis points.
const WEIGHT_BASIS_POINTS: f64 = 10_000.0;

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.income_debt + self.employment + self.loan_income + self.age + self.document
    }

    fn validate(&self) -> Result<(), CriteriaError> {
        let all = [
            self.income_debt,
            self.employment,
            self.loan_income,
            self.age,
            self.document,
        ];
        if all.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(CriteriaError::NegativeWeight);
        }
        if let Some(weight) = all.iter().copied().find(|weight| !on_basis_point_grid(*weight)) {
            return Err(CriteriaError::WeightPrecision { weight });
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(CriteriaError::WeightsDoNotSumToOne { total });
        }

        Ok(())
    }
}

fn on_basis_point_grid(weight: f64) -> bool {
    let scaled = weight * WEIGHT_BASIS_POINTS;
    (scaled - scaled.round()).abs() <= WEIGHT_TOLERANCE * WEIGHT_BASIS_POINTS
}

/// One row of a five-level scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTier<T> {
    pub bound: T,
    pub score: u8,
}

impl<T> ScoreTier<T> {
    pub const fn new(bound: T, score: u8) -> Self {
        Self { bound, score }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpperBoundScale {
    pub tiers: Vec<ScoreTier<f64>>,
    pub fallback: u8,
}

impl UpperBoundScale {
    pub fn score(&self, value: f64) -> u8 {
        self.tiers
            .iter()
            .find(|tier| value <= tier.bound)
            .map(|tier| tier.score)
            .unwrap_or(self.fallback)
    }

    fn is_ascending(&self) -> bool {
        self.tiers.windows(2).all(|pair| pair[0].bound < pair[1].bound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowerBoundScale {
    pub tiers: Vec<ScoreTier<u32>>,
    pub fallback: u8,
}

impl LowerBoundScale {
    pub fn score(&self, value: u32) -> u8 {
        self.tiers
            .iter()
            .find(|tier| value >= tier.bound)
            .map(|tier| tier.score)
            .unwrap_or(self.fallback)
    }

    fn is_descending(&self) -> bool {
        self.tiers.windows(2).all(|pair| pair[0].bound > pair[1].bound)
    }
}

/// Age bands. `min..=max` doubles as the hard eligibility gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBands {
    pub optimal_min: i32,
    pub optimal_max: i32,
    pub min: i32,
    pub max: i32,
    pub optimal_score: u8,
    pub accepted_score: u8,
    pub fallback: u8,
}

impl AgeBands {
    pub fn admits(&self, age: i32) -> bool {
        (self.min..=self.max).contains(&age)
    }

    pub fn score(&self, age: i32) -> u8 {
        if (self.optimal_min..=self.optimal_max).contains(&age) {
            self.optimal_score
        } else if self.admits(age) {
            self.accepted_score
        } else {
            self.fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentScore {
    pub document_type: DocumentType,
    pub score: u8,
}

/// Per-document scores; documents without an entry fall back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentScores {
    pub scores: Vec<DocumentScore>,
    pub fallback: u8,
}

impl DocumentScores {
    pub fn score(&self, document_type: DocumentType) -> u8 {
        self.scores
            .iter()
            .find(|entry| entry.document_type == document_type)
            .map(|entry| entry.score)
            .unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTierThreshold {
    pub min_score: f64,
    pub tier: RiskTier,
}

impl RiskTierThreshold {
    pub const fn new(min_score: f64, tier: RiskTier) -> Self {
        Self { min_score, tier }
    }
}

/// Installment counts for scores up to `max_ratio` (score / 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCountRow {
    pub max_ratio: f64,
    pub weekly: u32,
    pub biweekly: u32,
    pub monthly: u32,
}

impl PaymentCountRow {
    pub const fn new(max_ratio: f64, weekly: u32, biweekly: u32, monthly: u32) -> Self {
        Self {
            max_ratio,
            weekly,
            biweekly,
            monthly,
        }
    }

    pub fn count_for(&self, period: PaymentPeriod) -> u32 {
        match period {
            PaymentPeriod::Weekly => self.weekly,
            PaymentPeriod::Biweekly => self.biweekly,
            PaymentPeriod::Monthly => self.monthly,
        }
    }
}

/// Linear rate inside a tier: `base + ((anchor - score) / span) * slope`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestBand {
    pub tier: RiskTier,
    pub base: f64,
    pub anchor: f64,
    pub span: f64,
    pub slope: f64,
}

impl InterestBand {
    pub const fn new(tier: RiskTier, base: f64, anchor: f64, span: f64, slope: f64) -> Self {
        Self {
            tier,
            base,
            anchor,
            span,
            slope,
        }
    }

    pub fn rate_at(&self, score: f64) -> f64 {
        self.base + ((self.anchor - score) / self.span) * self.slope
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestSchedule {
    pub bands: Vec<InterestBand>,
    pub floor: f64,
    pub ceiling: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum CriteriaError {
    #[error("failed to read criteria file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid criteria JSON in {path:?}: {source}")]
    Format {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("factor weights must sum to 1.00 (found {total:.4})")]
    WeightsDoNotSumToOne { total: f64 },
    #[error("factor weights must be finite and non-negative")]
    NegativeWeight,
    #[error("factor weight {weight} is finer than one basis point (0.0001)")]
    WeightPrecision { weight: f64 },
    #[error("criteria table `{0}` is not ordered")]
    UnorderedTable(&'static str),
    #[error("age bands must nest the optimal range inside the eligible range")]
    InvalidAgeBands,
    #[error("interest floor {floor} must not exceed ceiling {ceiling}")]
    InvalidInterestBounds { floor: f64, ceiling: f64 },
}
