use std::collections::BTreeMap;

use sonder_core::models::scoring::ValidityConcern;
use sonder_instruments::Instrument;
use sonder_instruments::error::ScoringError;
use sonder_instruments::instruments::{epds::Epds, phq9::Phq9, pss10::Pss10};
use sonder_instruments::scale::{
    CriticalItem, InterpretationRule, ResponseFormat, ResponseOption, ScaleDefinition, ScaleItem, ScoreRange,
};
use sonder_instruments::scoring::score;

fn responses(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn zero_to_three_item(id: &str, position: u32, reverse_scored: bool) -> ScaleItem {
    ScaleItem {
        id: id.to_string(),
        position,
        prompt: id.to_string(),
        format: ResponseFormat::Likert {
            options: (0..=3)
                .map(|value| ResponseOption {
                    value,
                    label: value.to_string(),
                })
                .collect(),
        },
        subscale: None,
        reverse_scored,
        required: true,
        scored: true,
    }
}

fn two_item_scale() -> ScaleDefinition {
    ScaleDefinition {
        id: "pair".to_string(),
        name: "Pair".to_string(),
        abbreviation: "PAIR".to_string(),
        version: "1".to_string(),
        description: None,
        active: true,
        items: vec![
            zero_to_three_item("item1", 1, false),
            zero_to_three_item("item2", 2, true),
        ],
        subscales: vec![],
        interpretation: vec![
            InterpretationRule {
                min_score: 0,
                max_score: 3,
                label: "low".to_string(),
                description: String::new(),
            },
            InterpretationRule {
                min_score: 4,
                max_score: 6,
                label: "high".to_string(),
                description: String::new(),
            },
        ],
        critical_items: vec![],
        score_range: ScoreRange { min: 0, max: 6 },
    }
}

#[test]
fn reverse_scored_item_contributes_mirrored_value() {
    let scale = two_item_scale();
    scale.validate().unwrap();

    // item2 is reversed: raw 1 → 2.
    let result = score(&scale, &responses(&[("item1", 2), ("item2", 1)])).unwrap();
    assert_eq!(result.total_score, 4);
    assert_eq!(result.interpretation.label, "high");
}

#[test]
fn reverse_scoring_maps_extremes() {
    let item = zero_to_three_item("r", 1, true);
    assert_eq!(item.resolve(0), Some(3));
    assert_eq!(item.resolve(3), Some(0));
    assert_eq!(item.resolve(4), None);
}

#[test]
fn missing_required_items_yield_no_score() {
    let scale = two_item_scale();
    let err = score(&scale, &responses(&[("item1", 2)])).unwrap_err();
    assert_eq!(
        err,
        ScoringError::MissingRequiredItems {
            scale_id: "pair".to_string(),
            item_ids: vec!["item2".to_string()],
        }
    );
    assert!(!err.is_definition_error());
}

#[test]
fn unknown_items_and_values_are_rejected() {
    let scale = two_item_scale();
    assert!(matches!(
        score(&scale, &responses(&[("item1", 1), ("item2", 1), ("item3", 1)])),
        Err(ScoringError::UnknownItem { .. })
    ));
    assert!(matches!(
        score(&scale, &responses(&[("item1", 9), ("item2", 1)])),
        Err(ScoringError::InvalidValue { value: 9, .. })
    ));
}

#[test]
fn band_gap_fails_loudly_instead_of_defaulting() {
    let mut scale = two_item_scale();
    // Corrupt definition: 4 is not covered. Bypasses validate() on purpose.
    scale.interpretation[1].min_score = 5;

    let err = score(&scale, &responses(&[("item1", 2), ("item2", 1)])).unwrap_err();
    assert!(matches!(err, ScoringError::NoInterpretationBand { score: 4, .. }));
    assert!(err.is_definition_error());
    assert_eq!(err.scale_id(), "pair");
}

#[test]
fn reverse_keyed_critical_item_flags_on_the_raw_answer() {
    let mut scale = two_item_scale();
    scale.critical_items.push(CriticalItem {
        item_id: "item2".to_string(),
        label: "self-harm ideation".to_string(),
    });
    scale.validate().unwrap();

    // Raw 0 on a reversed item contributes 3 but is not an endorsement.
    let quiet = score(&scale, &responses(&[("item1", 0), ("item2", 0)])).unwrap();
    assert_eq!(quiet.total_score, 3);
    assert!(!quiet.critical_flag);
    assert!(quiet.critical_items.is_empty());

    // Raw 3 contributes 0 to the total and still raises the flag.
    let flagged = score(&scale, &responses(&[("item1", 0), ("item2", 3)])).unwrap();
    assert_eq!(flagged.total_score, 0);
    assert_eq!(flagged.interpretation.label, "low");
    assert!(flagged.critical_flag);
    assert_eq!(flagged.critical_items, vec!["item2".to_string()]);
}

#[test]
fn overlapping_bands_fail_loudly() {
    let mut scale = two_item_scale();
    scale.interpretation[0].max_score = 4;

    let err = score(&scale, &responses(&[("item1", 2), ("item2", 1)])).unwrap_err();
    assert!(matches!(err, ScoringError::AmbiguousInterpretationBand { score: 4, .. }));
}

#[test]
fn phq9_critical_item_flags_even_in_minimal_band() {
    let mut answers: BTreeMap<String, u32> = (1..=8).map(|n| (format!("phq9_{n}"), 0)).collect();
    answers.insert("phq9_9".to_string(), 1);

    let result = Phq9.score(&answers).unwrap();
    assert_eq!(result.total_score, 1);
    assert_eq!(result.interpretation.label, "Minimal");
    assert!(result.critical_flag);
    assert_eq!(result.critical_items, vec!["phq9_9".to_string()]);
    // Optional difficulty item left blank.
    assert!(result.validity.valid);
    assert_eq!(
        result.validity.concerns,
        vec![ValidityConcern::OptionalItemsSkipped { count: 1 }]
    );
}

#[test]
fn phq9_difficulty_item_is_not_scored() {
    let mut answers: BTreeMap<String, u32> = (1..=9).map(|n| (format!("phq9_{n}"), 2)).collect();
    answers.insert("phq9_difficulty".to_string(), 3);

    let result = Phq9.score(&answers).unwrap();
    assert_eq!(result.total_score, 18);
    assert_eq!(result.interpretation.label, "Moderately severe");
    assert_eq!(result.answered_items, 10);
    assert!(result.validity.concerns.is_empty());
}

#[test]
fn pss10_reverses_before_subscale_sums() {
    // Every raw answer is 4 ("Very often").
    let answers: BTreeMap<String, u32> = (1..=10).map(|n| (format!("pss10_{n}"), 4)).collect();

    let result = Pss10.score(&answers).unwrap();
    // Six forward items at 4, four reversed items at 0.
    assert_eq!(result.total_score, 24);
    assert_eq!(result.subscale_scores["helplessness"].score, 24);
    assert_eq!(result.subscale_scores["self_efficacy"].score, 0);
    assert!(result.subscale_scores["helplessness"].interpretation.is_none());

    // Same raw answer on forward and reverse items.
    assert!(!result.validity.valid);
    assert_eq!(
        result.validity.concerns,
        vec![ValidityConcern::StraightLining { value: 4 }]
    );
}

#[test]
fn pss10_varied_answers_are_valid() {
    let raw = [3, 3, 4, 0, 1, 3, 0, 1, 2, 3];
    let answers: BTreeMap<String, u32> = raw
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("pss10_{}", i + 1), *v))
        .collect();

    let result = Pss10.score(&answers).unwrap();
    // Forward: 3+3+4+3+2+3 = 18. Reversed: (4-0)+(4-1)+(4-0)+(4-1) = 14.
    assert_eq!(result.subscale_scores["helplessness"].score, 18);
    assert_eq!(result.subscale_scores["self_efficacy"].score, 14);
    assert_eq!(result.total_score, 32);
    assert_eq!(result.interpretation.label, "High");
    assert!(result.validity.valid);
}

#[test]
fn epds_anxiety_subscale_has_its_own_band() {
    let answers = responses(&[
        ("epds_1", 0),
        ("epds_2", 0),
        ("epds_3", 2),
        ("epds_4", 2),
        ("epds_5", 3),
        ("epds_6", 1),
        ("epds_7", 0),
        ("epds_8", 1),
        ("epds_9", 0),
        ("epds_10", 0),
    ]);

    let result = Epds.score(&answers).unwrap();
    assert_eq!(result.total_score, 9);
    assert_eq!(result.interpretation.label, "Unlikely");

    let anxiety = &result.subscale_scores["anxiety"];
    assert_eq!(anxiety.score, 7);
    assert_eq!(
        anxiety.interpretation.as_ref().map(|i| i.label.as_str()),
        Some("Anxiety likely")
    );
    assert!(!result.critical_flag);
}
