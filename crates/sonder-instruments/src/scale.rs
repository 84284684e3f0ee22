use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DefinitionError;

/// One selectable answer of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResponseOption {
    pub value: u32,
    pub label: String,
}

/// The closed set of answer shapes an item can take.
///
/// Anything outside the declared options is rejected when a response is
/// collected, before it can reach scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ResponseFormat {
    /// Ordered frequency/agreement scale (e.g. "Not at all" .. "Nearly every day").
    Likert { options: Vec<ResponseOption> },
    /// Unordered or descriptive choices with explicit scoring values.
    Categorical { options: Vec<ResponseOption> },
}

impl ResponseFormat {
    pub fn options(&self) -> &[ResponseOption] {
        match self {
            ResponseFormat::Likert { options } | ResponseFormat::Categorical { options } => {
                options
            }
        }
    }

    pub fn accepts(&self, value: u32) -> bool {
        self.options().iter().any(|o| o.value == value)
    }

    /// Lowest and highest declared option values.
    pub fn bounds(&self) -> Option<ScoreRange> {
        let min = self.options().iter().map(|o| o.value).min()?;
        let max = self.options().iter().map(|o| o.value).max()?;
        Some(ScoreRange { min, max })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleItem {
    pub id: String,
    /// 1-based position. Items are referenced by position in the UI.
    pub position: u32,
    pub prompt: String,
    pub format: ResponseFormat,
    pub subscale: Option<String>,
    /// Explicitly declared; never inferred from option labels.
    #[serde(default)]
    pub reverse_scored: bool,
    #[serde(default = "default_true")]
    pub required: bool,
    /// Unscored items are collected but excluded from every sum.
    #[serde(default = "default_true")]
    pub scored: bool,
}

fn default_true() -> bool {
    true
}

impl ScaleItem {
    /// Resolve a raw answer into the value that enters aggregation.
    ///
    /// Reverse-keyed items mirror the answer across the option range, so on
    /// a 0–3 item a raw 0 contributes 3 and a raw 3 contributes 0. Returns
    /// `None` when `raw` is not one of the declared options.
    pub fn resolve(&self, raw: u32) -> Option<u32> {
        if !self.format.accepts(raw) {
            return None;
        }
        if !self.reverse_scored {
            return Some(raw);
        }
        let bounds = self.format.bounds()?;
        Some(bounds.min + bounds.max - raw)
    }
}

/// Inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: u32,
    pub max: u32,
}

impl ScoreRange {
    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// `[min_score, max_score] → label + description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterpretationRule {
    pub min_score: u32,
    pub max_score: u32,
    pub label: String,
    pub description: String,
}

impl InterpretationRule {
    pub fn contains(&self, score: u32) -> bool {
        score >= self.min_score && score <= self.max_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleDefinition {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Optional bands for the subscale score. Same coverage rules as the
    /// scale-level bands when present.
    #[serde(default)]
    pub interpretation: Vec<InterpretationRule>,
}

/// An item whose non-zero answer must be surfaced on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriticalItem {
    pub item_id: String,
    pub label: String,
}

/// Immutable definition of a clinical scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleDefinition {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub version: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub items: Vec<ScaleItem>,
    #[serde(default)]
    pub subscales: Vec<SubscaleDefinition>,
    pub interpretation: Vec<InterpretationRule>,
    #[serde(default)]
    pub critical_items: Vec<CriticalItem>,
    pub score_range: ScoreRange,
}

impl ScaleDefinition {
    pub fn item(&self, item_id: &str) -> Option<&ScaleItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn required_items(&self) -> impl Iterator<Item = &ScaleItem> {
        self.items.iter().filter(|i| i.required)
    }

    /// Score range reachable from the scored items of `subscale_id`, or of
    /// the whole scale when `None`.
    pub fn derived_range(&self, subscale_id: Option<&str>) -> ScoreRange {
        self.items
            .iter()
            .filter(|i| i.scored)
            .filter(|i| subscale_id.is_none_or(|id| i.subscale.as_deref() == Some(id)))
            .filter_map(|i| i.format.bounds())
            .fold(ScoreRange { min: 0, max: 0 }, |acc, b| ScoreRange {
                min: acc.min + b.min,
                max: acc.max + b.max,
            })
    }

    /// Check every structural invariant the scoring engine relies on.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        let scale_id = || self.id.clone();

        if self.items.is_empty() {
            return Err(DefinitionError::NoItems { scale_id: scale_id() });
        }

        let mut subscale_ids = BTreeSet::new();
        for subscale in &self.subscales {
            if !subscale_ids.insert(subscale.id.as_str()) {
                return Err(DefinitionError::DuplicateSubscale {
                    scale_id: scale_id(),
                    subscale_id: subscale.id.clone(),
                });
            }
        }

        let mut item_ids = BTreeSet::new();
        for (index, item) in self.items.iter().enumerate() {
            if !item_ids.insert(item.id.as_str()) {
                return Err(DefinitionError::DuplicateItem {
                    scale_id: scale_id(),
                    item_id: item.id.clone(),
                });
            }

            let expected = index as u32 + 1;
            if item.position != expected {
                return Err(DefinitionError::ItemPosition {
                    scale_id: scale_id(),
                    item_id: item.id.clone(),
                    expected,
                    found: item.position,
                });
            }

            if item.format.options().is_empty() {
                return Err(DefinitionError::NoOptions {
                    scale_id: scale_id(),
                    item_id: item.id.clone(),
                });
            }

            let mut values = BTreeSet::new();
            for option in item.format.options() {
                if !values.insert(option.value) {
                    return Err(DefinitionError::DuplicateOption {
                        scale_id: scale_id(),
                        item_id: item.id.clone(),
                        value: option.value,
                    });
                }
            }

            if let Some(subscale_id) = &item.subscale
                && !subscale_ids.contains(subscale_id.as_str())
            {
                return Err(DefinitionError::UnknownSubscale {
                    scale_id: scale_id(),
                    item_id: item.id.clone(),
                    subscale_id: subscale_id.clone(),
                });
            }
        }

        for critical in &self.critical_items {
            if !item_ids.contains(critical.item_id.as_str()) {
                return Err(DefinitionError::UnknownCriticalItem {
                    scale_id: scale_id(),
                    item_id: critical.item_id.clone(),
                });
            }
        }

        let derived = self.derived_range(None);
        if derived != self.score_range {
            return Err(DefinitionError::RangeMismatch {
                scale_id: scale_id(),
                declared_min: self.score_range.min,
                declared_max: self.score_range.max,
                derived_min: derived.min,
                derived_max: derived.max,
            });
        }

        check_bands(&self.id, "total", &self.interpretation, self.score_range)?;

        for subscale in &self.subscales {
            if subscale.interpretation.is_empty() {
                continue;
            }
            let range = self.derived_range(Some(&subscale.id));
            check_bands(&self.id, &subscale.id, &subscale.interpretation, range)?;
        }

        Ok(())
    }
}

/// Bands must tile `range` exactly: no gap, no overlap, nothing outside.
fn check_bands(
    scale_id: &str,
    owner: &str,
    rules: &[InterpretationRule],
    range: ScoreRange,
) -> Result<(), DefinitionError> {
    if rules.is_empty() {
        return Err(DefinitionError::NoBands {
            scale_id: scale_id.to_string(),
            owner: owner.to_string(),
        });
    }

    for rule in rules {
        if rule.min_score > rule.max_score {
            return Err(DefinitionError::InvertedBand {
                scale_id: scale_id.to_string(),
                owner: owner.to_string(),
                label: rule.label.clone(),
                min: rule.min_score,
                max: rule.max_score,
            });
        }
        if !range.contains(rule.min_score) || !range.contains(rule.max_score) {
            return Err(DefinitionError::BandOutOfRange {
                scale_id: scale_id.to_string(),
                owner: owner.to_string(),
                label: rule.label.clone(),
                min: range.min,
                max: range.max,
            });
        }
    }

    let mut sorted: Vec<&InterpretationRule> = rules.iter().collect();
    sorted.sort_by_key(|r| (r.min_score, r.max_score));

    // `next` is the lowest score not yet covered.
    let mut next = range.min;
    for rule in sorted {
        if rule.min_score > next {
            return Err(DefinitionError::BandGap {
                scale_id: scale_id.to_string(),
                owner: owner.to_string(),
                from: next,
                to: rule.min_score - 1,
            });
        }
        if rule.min_score < next {
            return Err(DefinitionError::BandOverlap {
                scale_id: scale_id.to_string(),
                owner: owner.to_string(),
                from: rule.min_score,
                to: rule.max_score.min(next - 1),
            });
        }
        next = rule.max_score + 1;
    }

    if next <= range.max {
        return Err(DefinitionError::BandGap {
            scale_id: scale_id.to_string(),
            owner: owner.to_string(),
            from: next,
            to: range.max,
        });
    }

    Ok(())
}
