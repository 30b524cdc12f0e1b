use crate::infra::load_criteria;
use chrono::NaiveDate;
use clap::Args;
use credito::config::AppConfig;
use credito::error::AppError;
use credito::telemetry;
use credito::workflows::lending::applications::{
    ApplicantCsvImporter, ApplicantSubmission, ApplicationServiceError, Clock, CreditDecision,
    CreditEvaluationService, EvaluationAuditSink, EvaluationOutcome, EvaluationResult,
    FieldViolation, FixedClock, ImportedRow, IntakeError, SystemClock, TracingAuditSink,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding a single applicant profile
    #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
    pub(crate) profile: Option<PathBuf>,
    /// CSV export with one applicant per row (camelCase headers)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the response envelopes as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

/// Per-applicant result, shaped like the HTTP response envelope.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum BatchEntry {
    Evaluated {
        success: bool,
        data: Box<EvaluationResult>,
    },
    Rejected {
        success: bool,
        error: String,
    },
    Invalid {
        success: bool,
        error: String,
        details: Vec<InvalidField>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct InvalidField {
    pub(crate) field: String,
    pub(crate) message: String,
}

impl From<&FieldViolation> for InvalidField {
    fn from(violation: &FieldViolation) -> Self {
        Self {
            field: violation.field.label().to_string(),
            message: violation.message.clone(),
        }
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        profile,
        csv,
        today,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(config.environment, &config.telemetry)?;

    let criteria = load_criteria(&config.scoring)?;
    let today = today.unwrap_or_else(|| SystemClock.today());

    let rows = match (profile, csv) {
        (Some(path), _) => {
            let raw = std::fs::read_to_string(path)?;
            vec![Ok(serde_json::from_str::<ApplicantSubmission>(&raw)?)]
        }
        (None, Some(path)) => ApplicantCsvImporter::rows_from_path(path)?,
        (None, None) => Vec::new(),
    };

    let service = CreditEvaluationService::new(
        Arc::new(TracingAuditSink),
        Arc::new(FixedClock(today)),
        criteria,
    );
    let entries = evaluate_submissions(&service, rows);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        render_report(&entries, today);
    }

    Ok(())
}

pub(crate) fn run_criteria() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let criteria = load_criteria(&config.scoring)?;
    println!("{}", serde_json::to_string_pretty(&criteria)?);
    Ok(())
}

/// Apply the HTTP validation order to every row: bounds, presence, engine.
/// Rows that failed to parse become validation entries and the rest still run.
pub(crate) fn evaluate_submissions<A, C>(
    service: &CreditEvaluationService<A, C>,
    rows: Vec<ImportedRow>,
) -> Vec<BatchEntry>
where
    A: EvaluationAuditSink + 'static,
    C: Clock + 'static,
{
    rows.into_iter()
        .map(|row| {
            let submission = match row {
                Ok(submission) => submission,
                Err(err) => {
                    return BatchEntry::Invalid {
                        success: false,
                        error: "validation failed".to_string(),
                        details: vec![InvalidField {
                            field: "row".to_string(),
                            message: err.to_string(),
                        }],
                    }
                }
            };

            let violations = service.bounds_violations(&submission);
            if !violations.is_empty() {
                return BatchEntry::Invalid {
                    success: false,
                    error: "validation failed".to_string(),
                    details: violations.iter().map(InvalidField::from).collect(),
                };
            }

            match service.evaluate(submission) {
                Ok(EvaluationOutcome::Completed(result)) => BatchEntry::Evaluated {
                    success: true,
                    data: Box::new(result),
                },
                Ok(rejection @ EvaluationOutcome::AgeOutOfRange { .. }) => BatchEntry::Rejected {
                    success: false,
                    error: rejection.summary(),
                },
                Err(ApplicationServiceError::Intake(IntakeError::MissingField(field))) => {
                    BatchEntry::Invalid {
                        success: false,
                        error: "validation failed".to_string(),
                        details: vec![InvalidField {
                            field: field.label().to_string(),
                            message: "is required".to_string(),
                        }],
                    }
                }
            }
        })
        .collect()
}

fn render_report(entries: &[BatchEntry], today: NaiveDate) {
    println!("Credit evaluation report ({today})");

    for (index, entry) in entries.iter().enumerate() {
        let position = index + 1;
        match entry {
            BatchEntry::Evaluated { data, .. } => {
                println!(
                    "\n#{position} {} (age {}, {})",
                    data.applicant.name,
                    data.applicant.age,
                    data.applicant.document_type.label()
                );
                println!(
                    "- Decision: {} | score {:.1} | risk {}",
                    data.evaluation.decision.label(),
                    data.evaluation.score,
                    data.evaluation.risk_tier.label()
                );
                println!("  Factors:");
                for component in &data.evaluation.factors {
                    println!(
                        "    - {:?}: {} x {:.2} ({})",
                        component.factor, component.score, component.weight, component.notes
                    );
                }
                println!(
                    "- Loan: {} requested {:.2} | approved {:.2}",
                    data.loan.loan_type.label(),
                    data.loan.requested_amount,
                    data.loan.approved_amount
                );
                println!(
                    "- Payments: {} x {:.2} ({}) | {:.2}% annual",
                    data.payment.payment_count,
                    data.payment.payment_amount,
                    data.payment.period.label(),
                    data.payment.annual_interest_rate
                );
                println!(
                    "- Expenses {}% of income | {} months employed | payment capacity {}%",
                    data.key_factors.expense_to_income_ratio_pct,
                    data.key_factors.months_employed,
                    data.key_factors.payment_capacity_pct
                );
            }
            BatchEntry::Rejected { error, .. } => {
                println!("\n#{position} rejected: {error}");
            }
            BatchEntry::Invalid { details, .. } => {
                println!("\n#{position} validation failed");
                for detail in details {
                    println!("    - {}: {}", detail.field, detail.message);
                }
            }
        }
    }

    let approved = entries
        .iter()
        .filter(|entry| match entry {
            BatchEntry::Evaluated { data, .. } => {
                data.evaluation.decision == CreditDecision::Approved
            }
            _ => false,
        })
        .count();
    println!("\n{approved} of {} applicants approved", entries.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use credito::workflows::lending::applications::{
        DocumentType, LoanType, PaymentPeriod, ScoringCriteria,
    };
    use serde_json::json;

    fn service() -> CreditEvaluationService<TracingAuditSink, FixedClock> {
        CreditEvaluationService::new(
            Arc::new(TracingAuditSink),
            Arc::new(FixedClock(
                NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            )),
            ScoringCriteria::default(),
        )
    }

    fn submission() -> ApplicantSubmission {
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

    #[test]
    fn batch_entries_follow_http_envelopes() {
        let mut underage = submission();
        underage.birth_date = NaiveDate::from_ymd_opt(2010, 1, 1);
        let mut incomplete = submission();
        incomplete.loan_type = None;
        let mut out_of_bounds = submission();
        out_of_bounds.term_months = Some(0);

        let entries = evaluate_submissions(
            &service(),
            vec![
                Ok(submission()),
                Ok(underage),
                Ok(incomplete),
                Ok(out_of_bounds),
            ],
        );
        let value = serde_json::to_value(&entries).expect("serialize entries");

        assert_eq!(value[0]["success"], true);
        assert_eq!(value[0]["data"]["evaluation"]["decision"], "APPROVED");
        assert_eq!(
            value[1],
            json!({
                "success": false,
                "error": "age out of range (18–70); computed age: 14"
            })
        );
        assert_eq!(
            value[2]["details"],
            json!([{ "field": "loanType", "message": "is required" }])
        );
        assert_eq!(value[3]["details"][0]["field"], "termMonths");
    }

    #[test]
    fn empty_batch_yields_no_entries() {
        assert!(evaluate_submissions(&service(), Vec::new()).is_empty());
    }

    #[test]
    fn unreadable_csv_rows_become_validation_entries() {
        let data = "\
name,documentType,documentNumber,birthDate,loanType,requestedAmount,termMonths,paymentPeriod,monthlyIncome,monthlyExpenses,monthsEmployed
Ana Ruiz,cedula,001,1990-05-10,personal,50000,24,monthly,40000,10000,60
Luis Gomez,license,002,1990-05-10,personal,50000,24,monthly,40000,10000,60
Ana Ruiz,cedula,001,1990-05-10,personal,50000,24,monthly,40000,10000,60
";
        let rows = ApplicantCsvImporter::rows_from_reader(data.as_bytes()).expect("header parses");

        let entries = evaluate_submissions(&service(), rows);
        let value = serde_json::to_value(&entries).expect("serialize entries");

        assert_eq!(entries.len(), 3);
        assert_eq!(value[0]["data"]["evaluation"]["decision"], "APPROVED");
        assert_eq!(value[1]["success"], false);
        assert_eq!(value[1]["error"], "validation failed");
        assert_eq!(value[1]["details"][0]["field"], "row");
        assert!(value[1]["details"][0]["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("invalid applicant CSV data")));
        assert_eq!(value[2]["data"]["evaluation"]["decision"], "APPROVED");
    }
}
