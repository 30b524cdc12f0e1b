use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::lending::applications::audit::{
    AuditError, EvaluationAuditEntry, EvaluationAuditSink,
};
use crate::workflows::lending::applications::clock::FixedClock;
use crate::workflows::lending::applications::domain::{
    ApplicantProfile, ApplicantSubmission, DocumentType, LoanType, PaymentPeriod,
};
use crate::workflows::lending::applications::evaluation::{
    EvaluationEngine, EvaluationOutcome, EvaluationResult, ScoringCriteria,
};
use crate::workflows::lending::applications::{credit_router, CreditEvaluationService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Strong applicant evaluated on `today()`: every factor at its top tier.
pub(super) fn ana_submission() -> ApplicantSubmission {
    ApplicantSubmission {
        name: Some("Ana Ruiz".to_string()),
        document_type: Some(DocumentType::Cedula),
        document_number: Some("001".to_string()),
        birth_date: Some(date(1990, 5, 10)),
        loan_type: Some(LoanType::Personal),
        requested_amount: Some(50_000.0),
        term_months: Some(24),
        payment_period: Some(PaymentPeriod::Monthly),
        monthly_income: Some(40_000.0),
        monthly_expenses: Some(10_000.0),
        months_employed: Some(60),
    }
}

pub(super) fn ana_profile() -> ApplicantProfile {
    ApplicantProfile {
        name: "Ana Ruiz".to_string(),
        document_type: DocumentType::Cedula,
        document_number: "001".to_string(),
        birth_date: date(1990, 5, 10),
        loan_type: LoanType::Personal,
        requested_amount: 50_000.0,
        term_months: 24,
        payment_period: PaymentPeriod::Monthly,
        monthly_income: 40_000.0,
        monthly_expenses: 10_000.0,
        months_employed: 60,
    }
}

/// Scores 72.0: income/debt 85, employment 85, loan/income 25, age 100, passport 90.
pub(super) fn medium_approved_profile() -> ApplicantProfile {
    ApplicantProfile {
        name: "Luis Gomez".to_string(),
        document_type: DocumentType::Passport,
        document_number: "P-778812".to_string(),
        birth_date: date(1990, 5, 10),
        loan_type: LoanType::Vehicular,
        requested_amount: 800_000.0,
        term_months: 36,
        payment_period: PaymentPeriod::Monthly,
        monthly_income: 10_000.0,
        monthly_expenses: 3_000.0,
        months_employed: 40,
    }
}

/// Scores 68.5: income/debt 70, employment 70, loan/income 50, age 85 (60), passport 90.
pub(super) fn medium_rejected_profile() -> ApplicantProfile {
    ApplicantProfile {
        name: "Rosa Peña".to_string(),
        document_type: DocumentType::Passport,
        document_number: "P-100200".to_string(),
        birth_date: date(1963, 6, 15),
        loan_type: LoanType::Commercial,
        requested_amount: 660_000.0,
        term_months: 48,
        payment_period: PaymentPeriod::Biweekly,
        monthly_income: 10_000.0,
        monthly_expenses: 4_000.0,
        months_employed: 30,
    }
}

pub(super) fn evaluation_engine() -> EvaluationEngine {
    EvaluationEngine::new(ScoringCriteria::default())
}

pub(super) fn completed(outcome: EvaluationOutcome) -> EvaluationResult {
    match outcome {
        EvaluationOutcome::Completed(result) => result,
        other => panic!("expected completed evaluation, got {other:?}"),
    }
}

pub(super) fn evaluate_on(profile: &ApplicantProfile, on: NaiveDate) -> EvaluationResult {
    completed(evaluation_engine().evaluate(profile, on))
}

pub(super) fn build_service() -> (
    CreditEvaluationService<MemoryAudit, FixedClock>,
    Arc<MemoryAudit>,
) {
    let audit = Arc::new(MemoryAudit::default());
    let service = CreditEvaluationService::new(
        audit.clone(),
        Arc::new(FixedClock(today())),
        ScoringCriteria::default(),
    );
    (service, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<EvaluationAuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<EvaluationAuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl EvaluationAuditSink for MemoryAudit {
    fn record(&self, entry: EvaluationAuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

pub(super) struct FailingAudit;

impl EvaluationAuditSink for FailingAudit {
    fn record(&self, _entry: EvaluationAuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit queue offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn credit_router_with_service(
    service: CreditEvaluationService<MemoryAudit, FixedClock>,
) -> axum::Router {
    credit_router(Arc::new(service))
}
