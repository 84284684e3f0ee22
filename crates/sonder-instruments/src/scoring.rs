//! Converts a complete response set into a score and a clinical reading.
//!
//! Pure functions over a [`ScaleDefinition`]; no I/O.

use std::collections::{BTreeMap, BTreeSet};

use sonder_core::models::scoring::{
    Interpretation, ResponseValidity, ScoringResult, SubscaleScore, ValidityConcern,
};

use crate::error::ScoringError;
use crate::scale::{InterpretationRule, ScaleDefinition};

/// Score `responses` (item id → raw option value) against `scale`.
///
/// Partial response sets are rejected outright: every required item must be
/// answered, because the interpretation bands assume a complete set.
pub fn score(
    scale: &ScaleDefinition,
    responses: &BTreeMap<String, u32>,
) -> Result<ScoringResult, ScoringError> {
    // Item ids and values are re-checked here so scoring never trusts the
    // collector alone.
    for (item_id, &value) in responses {
        let item = scale.item(item_id).ok_or_else(|| ScoringError::UnknownItem {
            scale_id: scale.id.clone(),
            item_id: item_id.clone(),
        })?;
        if !item.format.accepts(value) {
            return Err(ScoringError::InvalidValue {
                scale_id: scale.id.clone(),
                item_id: item_id.clone(),
                value,
            });
        }
    }

    let missing = missing_required_items(scale, responses);
    if !missing.is_empty() {
        return Err(ScoringError::MissingRequiredItems {
            scale_id: scale.id.clone(),
            item_ids: missing,
        });
    }

    // Reversal happens per item, before any sum is taken.
    let mut resolved: BTreeMap<&str, u32> = BTreeMap::new();
    for item in &scale.items {
        if let Some(&raw) = responses.get(&item.id)
            && let Some(value) = item.resolve(raw)
        {
            resolved.insert(item.id.as_str(), value);
        }
    }

    let total_score: u32 = scale
        .items
        .iter()
        .filter(|i| i.scored)
        .filter_map(|i| resolved.get(i.id.as_str()))
        .sum();

    let mut subscale_scores = BTreeMap::new();
    for subscale in &scale.subscales {
        let score: u32 = scale
            .items
            .iter()
            .filter(|i| i.scored && i.subscale.as_deref() == Some(subscale.id.as_str()))
            .filter_map(|i| resolved.get(i.id.as_str()))
            .sum();

        let interpretation = if subscale.interpretation.is_empty() {
            None
        } else {
            Some(resolve_band(
                &scale.id,
                &subscale.id,
                &subscale.interpretation,
                score,
            )?)
        };

        subscale_scores.insert(
            subscale.id.clone(),
            SubscaleScore {
                score,
                interpretation,
            },
        );
    }

    let interpretation = resolve_band(&scale.id, "total", &scale.interpretation, total_score)?;

    // Critical items read the answer as given, before any reversal.
    let critical_items: Vec<String> = scale
        .critical_items
        .iter()
        .filter(|c| responses.get(&c.item_id).is_some_and(|&raw| raw > 0))
        .map(|c| c.item_id.clone())
        .collect();

    let validity = assess_validity(scale, responses);

    Ok(ScoringResult {
        scale_id: scale.id.clone(),
        scale_version: scale.version.clone(),
        total_score,
        subscale_scores,
        interpretation,
        critical_flag: !critical_items.is_empty(),
        critical_items,
        validity,
        answered_items: responses.len() as u32,
    })
}

/// Required items with no response, in position order.
pub fn missing_required_items(
    scale: &ScaleDefinition,
    responses: &BTreeMap<String, u32>,
) -> Vec<String> {
    scale
        .required_items()
        .filter(|i| !responses.contains_key(&i.id))
        .map(|i| i.id.clone())
        .collect()
}

/// Find the single band containing `score`.
///
/// A miss or a double match means the definition is corrupt; neither is
/// papered over with a default band.
pub fn resolve_band(
    scale_id: &str,
    owner: &str,
    rules: &[InterpretationRule],
    score: u32,
) -> Result<Interpretation, ScoringError> {
    let mut matches = rules.iter().filter(|r| r.contains(score));

    let rule = matches.next().ok_or_else(|| {
        tracing::error!(scale_id, owner, score, "score matches no interpretation band");
        ScoringError::NoInterpretationBand {
            scale_id: scale_id.to_string(),
            owner: owner.to_string(),
            score,
        }
    })?;

    if matches.next().is_some() {
        tracing::error!(scale_id, owner, score, "score matches several interpretation bands");
        return Err(ScoringError::AmbiguousInterpretationBand {
            scale_id: scale_id.to_string(),
            owner: owner.to_string(),
            score,
        });
    }

    Ok(Interpretation {
        label: rule.label.clone(),
        description: rule.description.clone(),
        min_score: rule.min_score,
        max_score: rule.max_score,
    })
}

fn assess_validity(
    scale: &ScaleDefinition,
    responses: &BTreeMap<String, u32>,
) -> ResponseValidity {
    let mut concerns = Vec::new();

    let scored: Vec<_> = scale.items.iter().filter(|i| i.scored).collect();
    let mixes_keying = scored.iter().any(|i| i.reverse_scored)
        && scored.iter().any(|i| !i.reverse_scored);

    // Identical raw answers to forward- and reverse-keyed items contradict
    // each other; typical of a respondent clicking through.
    if mixes_keying {
        let raw: BTreeSet<u32> = scored
            .iter()
            .filter_map(|i| responses.get(&i.id).copied())
            .collect();
        let answered = scored.iter().filter(|i| responses.contains_key(&i.id)).count();
        if answered > 2
            && raw.len() == 1
            && let Some(&value) = raw.first()
        {
            concerns.push(ValidityConcern::StraightLining { value });
        }
    }

    let skipped = scale
        .items
        .iter()
        .filter(|i| !i.required && !responses.contains_key(&i.id))
        .count() as u32;
    if skipped > 0 {
        concerns.push(ValidityConcern::OptionalItemsSkipped { count: skipped });
    }

    ResponseValidity::from_concerns(concerns)
}
