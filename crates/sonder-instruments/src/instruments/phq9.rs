use crate::Instrument;
use crate::scale::{CriticalItem, ScaleDefinition, ScoreRange};

use super::{band, categorical, item, likert};

/// PHQ-9: Patient Health Questionnaire, nine-item depression module.
/// Items scored 0–3 over the last two weeks; total 0–27.
/// Item 9 (thoughts of self-harm) is critical. The trailing functional
/// difficulty question is collected but not scored.
pub struct Phq9;

const FREQUENCY: [&str; 4] = [
    "Not at all",
    "Several days",
    "More than half the days",
    "Nearly every day",
];

impl Instrument for Phq9 {
    fn definition(&self) -> &ScaleDefinition {
        static DEFINITION: std::sync::LazyLock<ScaleDefinition> = std::sync::LazyLock::new(|| {
            let prompts = [
                "Little interest or pleasure in doing things",
                "Feeling down, depressed, or hopeless",
                "Trouble falling or staying asleep, or sleeping too much",
                "Feeling tired or having little energy",
                "Poor appetite or overeating",
                "Feeling bad about yourself, or that you are a failure or have let yourself or your family down",
                "Trouble concentrating on things, such as reading the newspaper or watching television",
                "Moving or speaking so slowly that other people could have noticed, or being so fidgety or restless that you have been moving around a lot more than usual",
                "Thoughts that you would be better off dead, or of hurting yourself in some way",
            ];

            let mut items: Vec<_> = prompts
                .iter()
                .enumerate()
                .map(|(i, prompt)| {
                    let n = i as u32 + 1;
                    item(&format!("phq9_{n}"), n, prompt, likert(&FREQUENCY))
                })
                .collect();

            let mut difficulty = item(
                "phq9_difficulty",
                10,
                "If you checked off any problems, how difficult have these problems made it for you to do your work, take care of things at home, or get along with other people?",
                categorical(&[
                    (0, "Not difficult at all"),
                    (1, "Somewhat difficult"),
                    (2, "Very difficult"),
                    (3, "Extremely difficult"),
                ]),
            );
            difficulty.required = false;
            difficulty.scored = false;
            items.push(difficulty);

            ScaleDefinition {
                id: "phq9".to_string(),
                name: "Patient Health Questionnaire-9".to_string(),
                abbreviation: "PHQ-9".to_string(),
                version: "1.0".to_string(),
                description: Some(
                    "Over the last 2 weeks, how often have you been bothered by any of the following problems?"
                        .to_string(),
                ),
                active: true,
                items,
                subscales: vec![],
                interpretation: vec![
                    band(0, 4, "Minimal", "Minimal or no depressive symptoms"),
                    band(5, 9, "Mild", "Mild depressive symptoms"),
                    band(10, 14, "Moderate", "Moderate depressive symptoms"),
                    band(15, 19, "Moderately severe", "Moderately severe depressive symptoms"),
                    band(20, 27, "Severe", "Severe depressive symptoms"),
                ],
                critical_items: vec![CriticalItem {
                    item_id: "phq9_9".to_string(),
                    label: "Thoughts of death or self-harm".to_string(),
                }],
                score_range: ScoreRange { min: 0, max: 27 },
            }
        });
        &DEFINITION
    }
}
