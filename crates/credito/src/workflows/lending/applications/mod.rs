//! Loan application intake, credit evaluation, and loan terms.
//!
//! A submission flows through [`ProfileGuard`] (presence of the eleven profile
//! fields), the [`EvaluationEngine`] (age gate, five weighted factors, tier and
//! decision, terms), and the [`CreditEvaluationService`], which snapshots the
//! criteria table per call and notifies the audit sink.

pub mod audit;
pub mod clock;
pub mod domain;
pub mod evaluation;
pub mod import;
pub mod intake;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use audit::{AuditError, EvaluationAuditEntry, EvaluationAuditSink, TracingAuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{
    ApplicantProfile, ApplicantSubmission, CreditDecision, CreditFactorKind, DocumentType,
    LoanType, PaymentPeriod, ProfileField, RiskTier,
};
pub use evaluation::{
    CriteriaError, EvaluationEngine, EvaluationOutcome, EvaluationResult, ScoringCriteria,
};
pub use import::{ApplicantCsvImporter, ImportError, ImportedRow};
pub use intake::{FieldViolation, IntakeBounds, IntakeError, ProfileGuard};
pub use router::credit_router;
pub use service::{ApplicationServiceError, CreditEvaluationService};
