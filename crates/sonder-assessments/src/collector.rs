//! Response collection.
//!
//! Answers are validated against the bound scale before they touch the
//! assessment; nothing outside an item's declared options is stored.

use jiff::Timestamp;

use sonder_core::models::assessment::{Assessment, AssessmentStatus, ItemResponse};
use sonder_instruments::scale::ScaleDefinition;

use crate::error::AssessmentError;
use crate::lifecycle;

/// Record one answer. The first answer opens a `created` assessment.
///
/// Does not move `current_step`; that cursor belongs to the client.
pub fn apply_response(
    assessment: &mut Assessment,
    scale: &ScaleDefinition,
    item_id: &str,
    value: u32,
    now: Timestamp,
) -> Result<(), AssessmentError> {
    ensure_accepts_responses(assessment)?;

    let item = scale
        .item(item_id)
        .ok_or_else(|| AssessmentError::InvalidItem {
            scale_id: scale.id.clone(),
            item_id: item_id.to_string(),
        })?;
    if !item.format.accepts(value) {
        return Err(AssessmentError::InvalidValue {
            item_id: item_id.to_string(),
            value,
        });
    }

    if assessment.status == AssessmentStatus::Created {
        lifecycle::start(assessment, now)?;
    }

    assessment.responses.insert(
        item_id.to_string(),
        ItemResponse {
            value,
            answered_at: now,
        },
    );
    assessment.last_activity_at = now;
    Ok(())
}

/// Store the client cursor. Bounded by the item count, nothing more.
pub fn set_step(
    assessment: &mut Assessment,
    scale: &ScaleDefinition,
    step: u32,
    now: Timestamp,
) -> Result<(), AssessmentError> {
    ensure_accepts_responses(assessment)?;

    let item_count = scale.items.len() as u32;
    if step > item_count {
        return Err(AssessmentError::InvalidStep { step, item_count });
    }
    assessment.current_step = step;
    assessment.last_activity_at = now;
    Ok(())
}

fn ensure_accepts_responses(assessment: &Assessment) -> Result<(), AssessmentError> {
    if !assessment.status.accepts_responses() {
        return Err(AssessmentError::NotActive {
            status: assessment.status,
        });
    }
    Ok(())
}
