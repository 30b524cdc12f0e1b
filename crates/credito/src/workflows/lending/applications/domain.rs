use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity document presented by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Cedula,
    Passport,
}

impl DocumentType {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentType::Cedula => "cedula",
            DocumentType::Passport => "passport",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Personal,
    Vehicular,
    Mortgage,
    Commercial,
}

impl LoanType {
    pub const fn label(self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Vehicular => "vehicular",
            LoanType::Mortgage => "mortgage",
            LoanType::Commercial => "commercial",
        }
    }
}

/// Installment cadence requested by the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPeriod {
    Weekly,
    Biweekly,
    Monthly,
}

impl PaymentPeriod {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentPeriod::Weekly => "weekly",
            PaymentPeriod::Biweekly => "biweekly",
            PaymentPeriod::Monthly => "monthly",
        }
    }

    /// Installments falling inside one calendar month.
    pub const fn periods_per_month(self) -> u32 {
        match self {
            PaymentPeriod::Weekly => 4,
            PaymentPeriod::Biweekly => 2,
            PaymentPeriod::Monthly => 1,
        }
    }
}

/// Raw request body. Every field is optional so intake can name the first one missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSubmission {
    pub name: Option<String>,
    pub document_type: Option<DocumentType>,
    pub document_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub loan_type: Option<LoanType>,
    pub requested_amount: Option<f64>,
    pub term_months: Option<u32>,
    pub payment_period: Option<PaymentPeriod>,
    pub monthly_income: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub months_employed: Option<u32>,
}

/// Validated applicant profile consumed by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub loan_type: LoanType,
    pub requested_amount: f64,
    pub term_months: u32,
    pub payment_period: PaymentPeriod,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub months_employed: u32,
}

/// Profile fields in the order intake checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Name,
    DocumentType,
    DocumentNumber,
    BirthDate,
    LoanType,
    RequestedAmount,
    TermMonths,
    PaymentPeriod,
    MonthlyIncome,
    MonthlyExpenses,
    MonthsEmployed,
}

impl ProfileField {
    pub const ORDER: [ProfileField; 11] = [
        ProfileField::Name,
        ProfileField::DocumentType,
        ProfileField::DocumentNumber,
        ProfileField::BirthDate,
        ProfileField::LoanType,
        ProfileField::RequestedAmount,
        ProfileField::TermMonths,
        ProfileField::PaymentPeriod,
        ProfileField::MonthlyIncome,
        ProfileField::MonthlyExpenses,
        ProfileField::MonthsEmployed,
    ];

    /// Wire name of the field as it appears in request bodies and CSV headers.
    pub const fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::DocumentType => "documentType",
            ProfileField::DocumentNumber => "documentNumber",
            ProfileField::BirthDate => "birthDate",
            ProfileField::LoanType => "loanType",
            ProfileField::RequestedAmount => "requestedAmount",
            ProfileField::TermMonths => "termMonths",
            ProfileField::PaymentPeriod => "paymentPeriod",
            ProfileField::MonthlyIncome => "monthlyIncome",
            ProfileField::MonthlyExpenses => "monthlyExpenses",
            ProfileField::MonthsEmployed => "monthsEmployed",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk band derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::VeryLow => "VERY_LOW",
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::VeryHigh => "VERY_HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditDecision {
    Approved,
    Rejected,
}

impl CreditDecision {
    pub const fn label(self) -> &'static str {
        match self {
            CreditDecision::Approved => "APPROVED",
            CreditDecision::Rejected => "REJECTED",
        }
    }
}

/// Factors contributing to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CreditFactorKind {
    IncomeDebt,
    Employment,
    LoanIncome,
    Age,
    Document,
}
