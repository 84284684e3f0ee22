use crate::Instrument;
use crate::scale::{CriticalItem, ScaleDefinition, ScoreRange, SubscaleDefinition};

use super::{band, categorical, item};

/// EPDS: Edinburgh Postnatal Depression Scale. Total 0–30.
/// Options carry their published values directly (several items list the
/// highest value first), so no item is flagged reverse-scored.
/// Items 3–5 form the EPDS-3A anxiety subscale; item 10 is critical.
pub struct Epds;

impl Instrument for Epds {
    fn definition(&self) -> &ScaleDefinition {
        static DEFINITION: std::sync::LazyLock<ScaleDefinition> = std::sync::LazyLock::new(|| {
            let mut items = vec![
                item(
                    "epds_1",
                    1,
                    "I have been able to laugh and see the funny side of things",
                    categorical(&[
                        (0, "As much as I always could"),
                        (1, "Not quite so much now"),
                        (2, "Definitely not so much now"),
                        (3, "Not at all"),
                    ]),
                ),
                item(
                    "epds_2",
                    2,
                    "I have looked forward with enjoyment to things",
                    categorical(&[
                        (0, "As much as I ever did"),
                        (1, "Rather less than I used to"),
                        (2, "Definitely less than I used to"),
                        (3, "Hardly at all"),
                    ]),
                ),
                item(
                    "epds_3",
                    3,
                    "I have blamed myself unnecessarily when things went wrong",
                    categorical(&[
                        (3, "Yes, most of the time"),
                        (2, "Yes, some of the time"),
                        (1, "Not very often"),
                        (0, "No, never"),
                    ]),
                ),
                item(
                    "epds_4",
                    4,
                    "I have been anxious or worried for no good reason",
                    categorical(&[
                        (0, "No, not at all"),
                        (1, "Hardly ever"),
                        (2, "Yes, sometimes"),
                        (3, "Yes, very often"),
                    ]),
                ),
                item(
                    "epds_5",
                    5,
                    "I have felt scared or panicky for no very good reason",
                    categorical(&[
                        (3, "Yes, quite a lot"),
                        (2, "Yes, sometimes"),
                        (1, "No, not much"),
                        (0, "No, not at all"),
                    ]),
                ),
                item(
                    "epds_6",
                    6,
                    "Things have been getting on top of me",
                    categorical(&[
                        (3, "Yes, most of the time I haven't been able to cope at all"),
                        (2, "Yes, sometimes I haven't been coping as well as usual"),
                        (1, "No, most of the time I have coped quite well"),
                        (0, "No, I have been coping as well as ever"),
                    ]),
                ),
                item(
                    "epds_7",
                    7,
                    "I have been so unhappy that I have had difficulty sleeping",
                    categorical(&[
                        (3, "Yes, most of the time"),
                        (2, "Yes, sometimes"),
                        (1, "Not very often"),
                        (0, "No, not at all"),
                    ]),
                ),
                item(
                    "epds_8",
                    8,
                    "I have felt sad or miserable",
                    categorical(&[
                        (3, "Yes, most of the time"),
                        (2, "Yes, quite often"),
                        (1, "Not very often"),
                        (0, "No, not at all"),
                    ]),
                ),
                item(
                    "epds_9",
                    9,
                    "I have been so unhappy that I have been crying",
                    categorical(&[
                        (3, "Yes, most of the time"),
                        (2, "Yes, quite often"),
                        (1, "Only occasionally"),
                        (0, "No, never"),
                    ]),
                ),
                item(
                    "epds_10",
                    10,
                    "The thought of harming myself has occurred to me",
                    categorical(&[
                        (3, "Yes, quite often"),
                        (2, "Sometimes"),
                        (1, "Hardly ever"),
                        (0, "Never"),
                    ]),
                ),
            ];

            for it in items.iter_mut().filter(|i| matches!(i.position, 3..=5)) {
                it.subscale = Some("anxiety".to_string());
            }

            ScaleDefinition {
                id: "epds".to_string(),
                name: "Edinburgh Postnatal Depression Scale".to_string(),
                abbreviation: "EPDS".to_string(),
                version: "1.0".to_string(),
                description: Some("In the past 7 days...".to_string()),
                active: true,
                items,
                subscales: vec![SubscaleDefinition {
                    id: "anxiety".to_string(),
                    name: "EPDS-3A Anxiety".to_string(),
                    description: None,
                    interpretation: vec![
                        band(0, 5, "Below threshold", "Anxiety symptoms below screening threshold"),
                        band(6, 9, "Anxiety likely", "Anxiety symptoms warrant further assessment"),
                    ],
                }],
                interpretation: vec![
                    band(0, 9, "Unlikely", "Depression not likely"),
                    band(10, 12, "Possible", "Possible depression; repeat screening"),
                    band(13, 30, "Probable", "Probable depression; clinical assessment indicated"),
                ],
                critical_items: vec![CriticalItem {
                    item_id: "epds_10".to_string(),
                    label: "Thoughts of self-harm".to_string(),
                }],
                score_range: ScoreRange { min: 0, max: 30 },
            }
        });
        &DEFINITION
    }
}
