use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::audit::{EvaluationAuditEntry, EvaluationAuditSink};
use super::clock::Clock;
use super::domain::{ApplicantProfile, ApplicantSubmission};
use super::evaluation::{CriteriaError, EvaluationEngine, EvaluationOutcome, ScoringCriteria};
use super::intake::{FieldViolation, IntakeError, ProfileGuard};

/// Service composing intake, the evaluation engine, the clock, and the audit sink.
pub struct CreditEvaluationService<A, C> {
    guard: ProfileGuard,
    engine: RwLock<Arc<EvaluationEngine>>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> CreditEvaluationService<A, C>
where
    A: EvaluationAuditSink + 'static,
    C: Clock + 'static,
{
    pub fn new(audit: Arc<A>, clock: Arc<C>, criteria: ScoringCriteria) -> Self {
        Self::with_guard(ProfileGuard::default(), audit, clock, criteria)
    }

    pub fn with_guard(
        guard: ProfileGuard,
        audit: Arc<A>,
        clock: Arc<C>,
        criteria: ScoringCriteria,
    ) -> Self {
        Self {
            guard,
            engine: RwLock::new(Arc::new(EvaluationEngine::new(criteria))),
            audit,
            clock,
        }
    }

    /// Engine snapshot. Criteria replaced after this call do not affect it.
    pub fn engine(&self) -> Arc<EvaluationEngine> {
        let engine = self
            .engine
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*engine)
    }

    pub fn criteria(&self) -> ScoringCriteria {
        self.engine().criteria().clone()
    }

    /// Validate and install a new criteria table for subsequent evaluations.
    pub fn replace_criteria(&self, criteria: ScoringCriteria) -> Result<(), CriteriaError> {
        criteria.validate()?;
        let replacement = Arc::new(EvaluationEngine::new(criteria));
        let mut engine = self
            .engine
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *engine = replacement;
        debug!("scoring criteria replaced");
        Ok(())
    }

    /// Transport-layer bounds for present fields.
    pub fn bounds_violations(&self, submission: &ApplicantSubmission) -> Vec<FieldViolation> {
        self.guard.bounds_violations(submission)
    }

    /// Check presence, then score the profile as of the clock's date.
    pub fn evaluate(
        &self,
        submission: ApplicantSubmission,
    ) -> Result<EvaluationOutcome, ApplicationServiceError> {
        let profile = self.guard.profile_from_submission(submission)?;
        Ok(self.evaluate_profile(&profile))
    }

    pub fn evaluate_profile(&self, profile: &ApplicantProfile) -> EvaluationOutcome {
        let engine = self.engine();
        let today = self.clock.today();
        let outcome = engine.evaluate(profile, today);

        let entry = EvaluationAuditEntry::from_outcome(profile, today, &outcome);
        if let Err(err) = self.audit.record(entry) {
            warn!(error = %err, "evaluation audit entry dropped");
        }

        outcome
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
}
