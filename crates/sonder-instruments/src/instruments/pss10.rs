use crate::Instrument;
use crate::scale::{ScaleDefinition, ScoreRange, SubscaleDefinition};

use super::{band, item, likert};

/// PSS-10: Perceived Stress Scale, ten-item version.
/// Items 4, 5, 7 and 8 are positively worded and reverse-scored.
/// Total 0–40, with helplessness and self-efficacy factors.
pub struct Pss10;

impl Instrument for Pss10 {
    fn definition(&self) -> &ScaleDefinition {
        static DEFINITION: std::sync::LazyLock<ScaleDefinition> = std::sync::LazyLock::new(|| {
            let frequency = likert(&[
                "Never",
                "Almost never",
                "Sometimes",
                "Fairly often",
                "Very often",
            ]);

            // (prompt, reverse-scored)
            let prompts = [
                ("Been upset because of something that happened unexpectedly", false),
                ("Felt that you were unable to control the important things in your life", false),
                ("Felt nervous and stressed", false),
                ("Felt confident about your ability to handle your personal problems", true),
                ("Felt that things were going your way", true),
                ("Found that you could not cope with all the things that you had to do", false),
                ("Been able to control irritations in your life", true),
                ("Felt that you were on top of things", true),
                ("Been angered because of things that happened that were outside of your control", false),
                ("Felt difficulties were piling up so high that you could not overcome them", false),
            ];

            let items = prompts
                .iter()
                .enumerate()
                .map(|(i, (prompt, reverse))| {
                    let n = i as u32 + 1;
                    let mut it = item(&format!("pss10_{n}"), n, prompt, frequency.clone());
                    it.reverse_scored = *reverse;
                    it.subscale = Some(if *reverse {
                        "self_efficacy".to_string()
                    } else {
                        "helplessness".to_string()
                    });
                    it
                })
                .collect();

            ScaleDefinition {
                id: "pss10".to_string(),
                name: "Perceived Stress Scale".to_string(),
                abbreviation: "PSS-10".to_string(),
                version: "1.0".to_string(),
                description: Some("In the last month, how often have you...".to_string()),
                active: true,
                items,
                subscales: vec![
                    SubscaleDefinition {
                        id: "helplessness".to_string(),
                        name: "Perceived Helplessness".to_string(),
                        description: None,
                        interpretation: vec![],
                    },
                    SubscaleDefinition {
                        id: "self_efficacy".to_string(),
                        name: "Lack of Self-Efficacy".to_string(),
                        description: Some("Higher scores indicate lower perceived self-efficacy".to_string()),
                        interpretation: vec![],
                    },
                ],
                interpretation: vec![
                    band(0, 13, "Low", "Low perceived stress"),
                    band(14, 26, "Moderate", "Moderate perceived stress"),
                    band(27, 40, "High", "High perceived stress"),
                ],
                critical_items: vec![],
                score_range: ScoreRange { min: 0, max: 40 },
            }
        });
        &DEFINITION
    }
}
