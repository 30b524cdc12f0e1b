use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantProfile, CreditDecision, RiskTier};
use super::evaluation::EvaluationOutcome;

/// Audit record emitted once per evaluation. The document number is masked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationAuditEntry {
    pub document: String,
    pub evaluated_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<CreditDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
    pub summary: String,
}

impl EvaluationAuditEntry {
    pub fn from_outcome(
        profile: &ApplicantProfile,
        evaluated_on: NaiveDate,
        outcome: &EvaluationOutcome,
    ) -> Self {
        let result = outcome.result();
        Self {
            document: mask_document(&profile.document_number),
            evaluated_on,
            decision: result.map(|result| result.evaluation.decision),
            score: result.map(|result| result.evaluation.score),
            risk_tier: result.map(|result| result.evaluation.risk_tier),
            summary: outcome.summary(),
        }
    }
}

/// Keep the last two characters of a document number.
pub fn mask_document(document_number: &str) -> String {
    let chars: Vec<char> = document_number.trim().chars().collect();
    let visible = chars.len().min(2);
    let hidden = chars.len() - visible;
    let mut masked = "*".repeat(hidden);
    masked.extend(&chars[hidden..]);
    masked
}

/// Fire-and-forget audit hook. Failures never change an evaluation result.
pub trait EvaluationAuditSink: Send + Sync {
    fn record(&self, entry: EvaluationAuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}

/// Writes audit entries to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl EvaluationAuditSink for TracingAuditSink {
    fn record(&self, entry: EvaluationAuditEntry) -> Result<(), AuditError> {
        tracing::info!(
            target: "credito::audit",
            document = %entry.document,
            evaluated_on = %entry.evaluated_on,
            decision = entry.decision.map(CreditDecision::label),
            score = entry.score,
            risk_tier = entry.risk_tier.map(RiskTier::label),
            "{}",
            entry.summary
        );
        Ok(())
    }
}
