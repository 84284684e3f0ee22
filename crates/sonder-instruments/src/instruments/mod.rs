pub mod epds;
pub mod gad7;
pub mod phq9;
pub mod pss10;

use crate::scale::{InterpretationRule, ResponseFormat, ResponseOption, ScaleItem};

pub(crate) fn likert(labels: &[&str]) -> ResponseFormat {
    ResponseFormat::Likert {
        options: labels
            .iter()
            .enumerate()
            .map(|(value, label)| ResponseOption {
                value: value as u32,
                label: label.to_string(),
            })
            .collect(),
    }
}

/// Options listed in display order with their published scoring values.
pub(crate) fn categorical(options: &[(u32, &str)]) -> ResponseFormat {
    ResponseFormat::Categorical {
        options: options
            .iter()
            .map(|(value, label)| ResponseOption {
                value: *value,
                label: label.to_string(),
            })
            .collect(),
    }
}

pub(crate) fn item(id: &str, position: u32, prompt: &str, format: ResponseFormat) -> ScaleItem {
    ScaleItem {
        id: id.to_string(),
        position,
        prompt: prompt.to_string(),
        format,
        subscale: None,
        reverse_scored: false,
        required: true,
        scored: true,
    }
}

pub(crate) fn band(min: u32, max: u32, label: &str, description: &str) -> InterpretationRule {
    InterpretationRule {
        min_score: min,
        max_score: max,
        label: label.to_string(),
        description: description.to_string(),
    }
}
