use chrono::{Datelike, NaiveDate};

use super::super::domain::{ApplicantProfile, CreditFactorKind};
use super::config::ScoringCriteria;
use super::ScoreComponent;

/// Ratio used when the applicant declares no income.
const NO_INCOME_DEBT_RATIO: f64 = 1.0;
/// Loan-to-income ratio used when annual income is zero.
const NO_INCOME_LOAN_RATIO: f64 = 999.0;

/// Calendar age on `today`: birthdays later in the year have not happened yet.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn income_debt_ratio(monthly_income: f64, monthly_expenses: f64) -> f64 {
    if monthly_income == 0.0 {
        return NO_INCOME_DEBT_RATIO;
    }
    monthly_expenses / monthly_income
}

pub fn loan_income_ratio(requested_amount: f64, monthly_income: f64) -> f64 {
    let annual_income = monthly_income * 12.0;
    if annual_income == 0.0 {
        return NO_INCOME_LOAN_RATIO;
    }
    requested_amount / annual_income
}

/// Score the five factors in their fixed order.
pub(crate) fn score_profile(
    profile: &ApplicantProfile,
    age: i32,
    criteria: &ScoringCriteria,
) -> Vec<ScoreComponent> {
    let weights = &criteria.weights;

    let debt_ratio = income_debt_ratio(profile.monthly_income, profile.monthly_expenses);
    let loan_ratio = loan_income_ratio(profile.requested_amount, profile.monthly_income);

    vec![
        ScoreComponent {
            factor: CreditFactorKind::IncomeDebt,
            score: criteria.income_debt.score(debt_ratio),
            weight: weights.income_debt,
            notes: format!("expenses consume {:.1}% of income", debt_ratio * 100.0),
        },
        ScoreComponent {
            factor: CreditFactorKind::Employment,
            score: criteria.employment.score(profile.months_employed),
            weight: weights.employment,
            notes: format!("{} months with current employer", profile.months_employed),
        },
        ScoreComponent {
            factor: CreditFactorKind::LoanIncome,
            score: criteria.loan_income.score(loan_ratio),
            weight: weights.loan_income,
            notes: format!("requested amount is {loan_ratio:.2}x annual income"),
        },
        ScoreComponent {
            factor: CreditFactorKind::Age,
            score: criteria.age.score(age),
            weight: weights.age,
            notes: format!(
                "age {age} (optimal {}-{})",
                criteria.age.optimal_min, criteria.age.optimal_max
            ),
        },
        ScoreComponent {
            factor: CreditFactorKind::Document,
            score: criteria.document.score(profile.document_type),
            weight: weights.document,
            notes: format!("identified by {}", profile.document_type.label()),
        },
    ]
}
