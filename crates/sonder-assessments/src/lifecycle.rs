//! The assessment state machine.
//!
//! ```text
//! created ──► in_progress ──► completed
//!    │             │
//!    ├─────────────┴──► expired    (remote deadline passed)
//!    └─────────────┴──► abandoned  (administrator or inactivity)
//! ```
//!
//! Every function here mutates an in-memory [`Assessment`] only; callers
//! persist the result with a conditional write.

use jiff::{SignedDuration, Timestamp};

use sonder_core::models::assessment::{
    Assessment, AssessmentMode, AssessmentStatus, ClosureReason,
};
use sonder_core::models::scoring::ScoringResult;
use sonder_instruments::error::ScoringError;
use sonder_instruments::scale::ScaleDefinition;
use sonder_instruments::scoring;

use crate::error::AssessmentError;

/// `created → in_progress`.
pub fn start(assessment: &mut Assessment, now: Timestamp) -> Result<(), AssessmentError> {
    if assessment.status != AssessmentStatus::Created {
        return Err(AssessmentError::InvalidTransition {
            from: assessment.status,
            to: AssessmentStatus::InProgress,
        });
    }
    assessment.status = AssessmentStatus::InProgress;
    assessment.started_at = Some(now);
    assessment.last_activity_at = now;
    Ok(())
}

/// `in_progress → completed`, scoring in the same step.
///
/// The result, `completed_at` and the status change land together or not
/// at all.
pub fn complete(
    assessment: &mut Assessment,
    scale: &ScaleDefinition,
    now: Timestamp,
) -> Result<ScoringResult, AssessmentError> {
    match assessment.status {
        AssessmentStatus::Completed => return Err(AssessmentError::AlreadyCompleted),
        status if status.is_terminal() => return Err(AssessmentError::NotActive { status }),
        _ => {}
    }

    let responses = assessment.raw_values();
    let missing = scoring::missing_required_items(scale, &responses);
    if !missing.is_empty() {
        return Err(AssessmentError::Incomplete { missing });
    }
    if assessment.status != AssessmentStatus::InProgress {
        return Err(AssessmentError::NotActive {
            status: assessment.status,
        });
    }

    let result = scoring::score(scale, &responses).map_err(|e| match e {
        ScoringError::MissingRequiredItems { item_ids, .. } => {
            AssessmentError::Incomplete { missing: item_ids }
        }
        other => AssessmentError::ScaleDefinition {
            scale_id: other.scale_id().to_string(),
            source: other,
        },
    })?;

    assessment.status = AssessmentStatus::Completed;
    assessment.scoring_results = Some(result.clone());
    assessment.completed_at = Some(now);
    assessment.last_activity_at = now;
    Ok(result)
}

/// `created | in_progress → expired`. Remote assessments only.
pub fn expire(assessment: &mut Assessment, now: Timestamp) -> Result<(), AssessmentError> {
    if assessment.mode != AssessmentMode::Remote {
        return Err(AssessmentError::ModeMismatch {
            expected: AssessmentMode::Remote,
        });
    }
    close(assessment, AssessmentStatus::Expired, ClosureReason::LinkExpired, now)
}

/// `created | in_progress → abandoned`.
pub fn abandon(
    assessment: &mut Assessment,
    reason: ClosureReason,
    now: Timestamp,
) -> Result<(), AssessmentError> {
    close(assessment, AssessmentStatus::Abandoned, reason, now)
}

fn close(
    assessment: &mut Assessment,
    to: AssessmentStatus,
    reason: ClosureReason,
    now: Timestamp,
) -> Result<(), AssessmentError> {
    if assessment.status.is_terminal() {
        return Err(AssessmentError::InvalidTransition {
            from: assessment.status,
            to,
        });
    }
    assessment.status = to;
    assessment.closed_at = Some(now);
    assessment.closure_reason = Some(reason);
    Ok(())
}

/// Apply any deadline that has passed as of `now`.
///
/// Returns the new status when a transition happened. Deadlines are only
/// ever evaluated here, at access time.
pub fn enforce_deadlines(
    assessment: &mut Assessment,
    now: Timestamp,
    inactivity_threshold: SignedDuration,
) -> Option<AssessmentStatus> {
    if assessment.status.is_terminal() {
        return None;
    }

    match assessment.mode {
        AssessmentMode::Remote => {
            let deadline = assessment.remote_deadline?;
            if now < deadline {
                return None;
            }
            expire(assessment, now).ok()?;
        }
        AssessmentMode::InPerson => {
            if assessment.status != AssessmentStatus::InProgress
                || now < assessment.last_activity_at + inactivity_threshold
            {
                return None;
            }
            abandon(assessment, ClosureReason::Inactivity, now).ok()?;
        }
    }
    Some(assessment.status)
}
