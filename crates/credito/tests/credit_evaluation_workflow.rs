//! Integration specifications for the credit evaluation workflow.
//!
//! Scenarios run through the public service facade, the CSV importer, and the HTTP router
//! so intake, scoring, loan terms, and auditing are exercised together.

mod common {
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use credito::workflows::lending::applications::{
        ApplicantSubmission, AuditError, CreditEvaluationService, DocumentType,
        EvaluationAuditEntry, EvaluationAuditSink, FixedClock, LoanType, PaymentPeriod,
        ScoringCriteria,
    };

    pub(super) fn evaluation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    }

    pub(super) fn submission() -> ApplicantSubmission {
        ApplicantSubmission {
            name: Some("Ana Ruiz".to_string()),
            document_type: Some(DocumentType::Cedula),
            document_number: Some("001".to_string()),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 10),
            loan_type: Some(LoanType::Personal),
            requested_amount: Some(50_000.0),
            term_months: Some(24),
            payment_period: Some(PaymentPeriod::Monthly),
            monthly_income: Some(40_000.0),
            monthly_expenses: Some(10_000.0),
            months_employed: Some(60),
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct RecordingAudit {
        entries: Arc<Mutex<Vec<EvaluationAuditEntry>>>,
    }

    impl RecordingAudit {
        pub(super) fn entries(&self) -> Vec<EvaluationAuditEntry> {
            self.entries.lock().expect("audit mutex poisoned").clone()
        }
    }

    impl EvaluationAuditSink for RecordingAudit {
        fn record(&self, entry: EvaluationAuditEntry) -> Result<(), AuditError> {
            self.entries
                .lock()
                .expect("audit mutex poisoned")
                .push(entry);
            Ok(())
        }
    }

    pub(super) fn service(
        audit: Arc<RecordingAudit>,
    ) -> CreditEvaluationService<RecordingAudit, FixedClock> {
        CreditEvaluationService::new(
            audit,
            Arc::new(FixedClock(evaluation_date())),
            ScoringCriteria::default(),
        )
    }
}

mod service_flow {
    use std::sync::Arc;

    use super::common::*;
    use credito::workflows::lending::applications::{
        CreditDecision, EvaluationOutcome, RiskTier,
    };

    #[test]
    fn reference_applicant_is_approved_with_full_terms() {
        let audit = Arc::new(RecordingAudit::default());
        let service = service(audit.clone());

        let outcome = service.evaluate(submission()).expect("complete submission");
        let result = match outcome {
            EvaluationOutcome::Completed(result) => result,
            other => panic!("expected completed evaluation, got {other:?}"),
        };

        assert_eq!(result.applicant.age, 33);
        assert_eq!(result.evaluation.score, 100.0);
        assert_eq!(result.evaluation.risk_tier, RiskTier::VeryLow);
        assert_eq!(result.evaluation.decision, CreditDecision::Approved);
        assert_eq!(result.loan.approved_amount, 50_000.0);
        assert_eq!(result.payment.payment_count, 12);
        assert_eq!(result.payment.annual_interest_rate, 8.0);
        assert_eq!(result.payment.payment_amount, 4166.67);

        let entries = audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].document, "*01");
    }

    #[test]
    fn seventy_year_old_is_scored_and_seventy_one_is_not() {
        let audit = Arc::new(RecordingAudit::default());
        let service = service(audit);

        let mut seventy = submission();
        seventy.birth_date = chrono::NaiveDate::from_ymd_opt(1953, 1, 2);
        let outcome = service.evaluate(seventy).expect("complete submission");
        assert_eq!(outcome.result().map(|result| result.applicant.age), Some(70));

        let mut seventy_one = submission();
        seventy_one.birth_date = chrono::NaiveDate::from_ymd_opt(1953, 1, 1);
        let outcome = service.evaluate(seventy_one).expect("complete submission");
        assert_eq!(
            outcome.summary(),
            "age out of range (18–70); computed age: 71"
        );
    }
}

mod csv_batches {
    use std::sync::Arc;

    use super::common::*;
    use credito::workflows::lending::applications::{
        ApplicantCsvImporter, ApplicationServiceError, CreditDecision, IntakeError, ProfileField,
    };

    const BATCH: &str = "\
name,documentType,documentNumber,birthDate,loanType,requestedAmount,termMonths,paymentPeriod,monthlyIncome,monthlyExpenses,monthsEmployed
Ana Ruiz,cedula,001,1990-05-10,personal,50000,24,monthly,40000,10000,60
Luis Gomez,passport,P-778812,1990-05-10,vehicular,800000,36,monthly,10000,3000,40
Rosa Peña,passport,P-100200,1963-06-15,commercial,660000,48,biweekly,10000,4000,30
Sin Fecha,cedula,009,,personal,1000,12,weekly,5000,1000,12
";

    #[test]
    fn batch_rows_are_evaluated_independently() {
        let audit = Arc::new(RecordingAudit::default());
        let service = service(audit.clone());

        let submissions = ApplicantCsvImporter::from_reader(BATCH.as_bytes()).expect("parse csv");
        assert_eq!(submissions.len(), 4);

        let outcomes: Vec<_> = submissions
            .into_iter()
            .map(|submission| service.evaluate(submission))
            .collect();

        let decisions: Vec<Option<CreditDecision>> = outcomes[..3]
            .iter()
            .map(|outcome| {
                outcome
                    .as_ref()
                    .ok()
                    .and_then(|outcome| outcome.result())
                    .map(|result| result.evaluation.decision)
            })
            .collect();
        assert_eq!(
            decisions,
            vec![
                Some(CreditDecision::Approved),
                Some(CreditDecision::Approved),
                Some(CreditDecision::Rejected),
            ]
        );

        assert!(matches!(
            outcomes[3],
            Err(ApplicationServiceError::Intake(IntakeError::MissingField(
                ProfileField::BirthDate
            )))
        ));
        assert_eq!(audit.entries().len(), 3);
    }
}

mod http {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::common::*;
    use credito::workflows::lending::applications::{credit_router, ScoringCriteria};

    fn build_router() -> (axum::Router, Arc<RecordingAudit>) {
        let audit = Arc::new(RecordingAudit::default());
        let service = Arc::new(service(audit.clone()));
        (credit_router(service), audit)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn post_evaluation_returns_envelope() {
        let (router, audit) = build_router();

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/credit/evaluations")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(&submission()).expect("serialize submission"),
            ))
            .expect("request");

        let response = router.oneshot(request).await.expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["success"], true);
        assert_eq!(payload["data"]["evaluation"]["decision"], "APPROVED");
        assert_eq!(payload["data"]["payment"]["paymentAmount"], 4166.67);
        assert_eq!(audit.entries().len(), 1);
    }

    #[tokio::test]
    async fn get_criteria_returns_active_table() {
        let (router, _audit) = build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/credit/criteria")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        let criteria: ScoringCriteria =
            serde_json::from_value(payload).expect("criteria deserialize");
        assert_eq!(criteria, ScoringCriteria::default());
    }
}
