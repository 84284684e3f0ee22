use crate::Instrument;
use crate::scale::{ScaleDefinition, ScoreRange};

use super::{band, item, likert};

/// GAD-7: Generalized Anxiety Disorder seven-item scale. Total 0–21.
pub struct Gad7;

impl Instrument for Gad7 {
    fn definition(&self) -> &ScaleDefinition {
        static DEFINITION: std::sync::LazyLock<ScaleDefinition> = std::sync::LazyLock::new(|| {
            let frequency = likert(&[
                "Not at all",
                "Several days",
                "More than half the days",
                "Nearly every day",
            ]);
            let prompts = [
                "Feeling nervous, anxious, or on edge",
                "Not being able to stop or control worrying",
                "Worrying too much about different things",
                "Trouble relaxing",
                "Being so restless that it is hard to sit still",
                "Becoming easily annoyed or irritable",
                "Feeling afraid, as if something awful might happen",
            ];

            ScaleDefinition {
                id: "gad7".to_string(),
                name: "Generalized Anxiety Disorder-7".to_string(),
                abbreviation: "GAD-7".to_string(),
                version: "1.0".to_string(),
                description: Some(
                    "Over the last 2 weeks, how often have you been bothered by the following problems?"
                        .to_string(),
                ),
                active: true,
                items: prompts
                    .iter()
                    .enumerate()
                    .map(|(i, prompt)| {
                        let n = i as u32 + 1;
                        item(&format!("gad7_{n}"), n, prompt, frequency.clone())
                    })
                    .collect(),
                subscales: vec![],
                interpretation: vec![
                    band(0, 4, "Minimal", "Minimal anxiety"),
                    band(5, 9, "Mild", "Mild anxiety"),
                    band(10, 14, "Moderate", "Moderate anxiety"),
                    band(15, 21, "Severe", "Severe anxiety"),
                ],
                critical_items: vec![],
                score_range: ScoreRange { min: 0, max: 21 },
            }
        });
        &DEFINITION
    }
}
