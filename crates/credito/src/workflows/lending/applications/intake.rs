use serde::Serialize;

use super::domain::{ApplicantProfile, ApplicantSubmission, ProfileField};

/// Errors raised while turning a submission into a profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("missing required field: {0}")]
    MissingField(ProfileField),
}

/// A present field whose value breaks a transport-layer bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    pub field: ProfileField,
    pub message: String,
}

impl FieldViolation {
    fn new(field: ProfileField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

const DEFAULT_MAX_TERM_MONTHS: u32 = 360;

/// Bounds enforced by the HTTP and CLI surfaces before the engine runs.
#[derive(Debug, Clone, Copy)]
pub struct IntakeBounds {
    max_term_months: u32,
}

impl IntakeBounds {
    pub fn new(max_term_months: u32) -> Self {
        let sanitized = if max_term_months == 0 {
            DEFAULT_MAX_TERM_MONTHS
        } else {
            max_term_months
        };

        Self {
            max_term_months: sanitized,
        }
    }

    pub fn max_term_months(&self) -> u32 {
        self.max_term_months
    }
}

impl Default for IntakeBounds {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TERM_MONTHS)
    }
}

/// Guard responsible for producing `ApplicantProfile` instances.
#[derive(Debug, Clone, Default)]
pub struct ProfileGuard {
    bounds: IntakeBounds,
}

impl ProfileGuard {
    pub fn with_bounds(bounds: IntakeBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &IntakeBounds {
        &self.bounds
    }

    /// Convert a submission into a typed profile, naming the first absent field.
    ///
    /// Only presence is checked here; values pass through untouched.
    pub fn profile_from_submission(
        &self,
        submission: ApplicantSubmission,
    ) -> Result<ApplicantProfile, IntakeError> {
        let ApplicantSubmission {
            name,
            document_type,
            document_number,
            birth_date,
            loan_type,
            requested_amount,
            term_months,
            payment_period,
            monthly_income,
            monthly_expenses,
            months_employed,
        } = submission;

        Ok(ApplicantProfile {
            name: require(name, ProfileField::Name)?,
            document_type: require(document_type, ProfileField::DocumentType)?,
            document_number: require(document_number, ProfileField::DocumentNumber)?,
            birth_date: require(birth_date, ProfileField::BirthDate)?,
            loan_type: require(loan_type, ProfileField::LoanType)?,
            requested_amount: require(requested_amount, ProfileField::RequestedAmount)?,
            term_months: require(term_months, ProfileField::TermMonths)?,
            payment_period: require(payment_period, ProfileField::PaymentPeriod)?,
            monthly_income: require(monthly_income, ProfileField::MonthlyIncome)?,
            monthly_expenses: require(monthly_expenses, ProfileField::MonthlyExpenses)?,
            months_employed: require(months_employed, ProfileField::MonthsEmployed)?,
        })
    }

    /// Report every present field that breaks a bound, in field order.
    pub fn bounds_violations(&self, submission: &ApplicantSubmission) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if let Some(name) = &submission.name {
            if name.trim().is_empty() {
                violations.push(FieldViolation::new(ProfileField::Name, "must not be blank"));
            }
        }

        if let Some(number) = &submission.document_number {
            if number.trim().is_empty() {
                violations.push(FieldViolation::new(
                    ProfileField::DocumentNumber,
                    "must not be blank",
                ));
            }
        }

        if let Some(amount) = submission.requested_amount {
            if !amount.is_finite() || amount <= 0.0 {
                violations.push(FieldViolation::new(
                    ProfileField::RequestedAmount,
                    "must be a positive amount",
                ));
            }
        }

        if let Some(term) = submission.term_months {
            if term == 0 || term > self.bounds.max_term_months {
                violations.push(FieldViolation::new(
                    ProfileField::TermMonths,
                    format!("must be between 1 and {}", self.bounds.max_term_months),
                ));
            }
        }

        for (field, value) in [
            (ProfileField::MonthlyIncome, submission.monthly_income),
            (ProfileField::MonthlyExpenses, submission.monthly_expenses),
        ] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    violations.push(FieldViolation::new(field, "must be zero or greater"));
                }
            }
        }

        violations
    }
}

fn require<T>(value: Option<T>, field: ProfileField) -> Result<T, IntakeError> {
    value.ok_or(IntakeError::MissingField(field))
}
