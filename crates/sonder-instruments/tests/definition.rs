use sonder_instruments::error::DefinitionError;
use sonder_instruments::scale::{
    InterpretationRule, ResponseFormat, ResponseOption, ScaleDefinition, ScaleItem, ScoreRange,
    SubscaleDefinition,
};

fn zero_to_three() -> ResponseFormat {
    ResponseFormat::Likert {
        options: (0..=3)
            .map(|value| ResponseOption {
                value,
                label: format!("option {value}"),
            })
            .collect(),
    }
}

fn scale_item(id: &str, position: u32) -> ScaleItem {
    ScaleItem {
        id: id.to_string(),
        position,
        prompt: format!("prompt for {id}"),
        format: zero_to_three(),
        subscale: None,
        reverse_scored: false,
        required: true,
        scored: true,
    }
}

fn rule(min: u32, max: u32, label: &str) -> InterpretationRule {
    InterpretationRule {
        min_score: min,
        max_score: max,
        label: label.to_string(),
        description: String::new(),
    }
}

fn two_item_scale() -> ScaleDefinition {
    ScaleDefinition {
        id: "mini".to_string(),
        name: "Mini".to_string(),
        abbreviation: "MINI".to_string(),
        version: "1".to_string(),
        description: None,
        active: true,
        items: vec![scale_item("a", 1), scale_item("b", 2)],
        subscales: vec![],
        interpretation: vec![rule(0, 2, "low"), rule(3, 6, "high")],
        critical_items: vec![],
        score_range: ScoreRange { min: 0, max: 6 },
    }
}

#[test]
fn well_formed_scale_passes() {
    two_item_scale().validate().unwrap();
}

#[test]
fn band_gap_is_rejected() {
    let mut scale = two_item_scale();
    scale.interpretation = vec![rule(0, 2, "low"), rule(4, 6, "high")];
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::BandGap { from: 3, to: 3, .. })
    ));
}

#[test]
fn band_overlap_is_rejected() {
    let mut scale = two_item_scale();
    scale.interpretation = vec![rule(0, 3, "low"), rule(3, 6, "high")];
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::BandOverlap { from: 3, to: 3, .. })
    ));
}

#[test]
fn bands_must_reach_the_top_of_the_range() {
    let mut scale = two_item_scale();
    scale.interpretation = vec![rule(0, 2, "low"), rule(3, 5, "high")];
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::BandGap { from: 6, to: 6, .. })
    ));
}

#[test]
fn declared_range_must_match_items() {
    let mut scale = two_item_scale();
    scale.score_range = ScoreRange { min: 0, max: 9 };
    scale.interpretation = vec![rule(0, 9, "all")];
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::RangeMismatch { derived_max: 6, .. })
    ));
}

#[test]
fn duplicate_items_and_positions_are_rejected() {
    let mut scale = two_item_scale();
    scale.items[1].id = "a".to_string();
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::DuplicateItem { .. })
    ));

    let mut scale = two_item_scale();
    scale.items[1].position = 5;
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::ItemPosition { expected: 2, found: 5, .. })
    ));
}

#[test]
fn subscale_tags_must_resolve() {
    let mut scale = two_item_scale();
    scale.items[0].subscale = Some("ghost".to_string());
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::UnknownSubscale { .. })
    ));

    scale.subscales.push(SubscaleDefinition {
        id: "ghost".to_string(),
        name: "Ghost".to_string(),
        description: None,
        // Subscale range is 0..=3 from item "a" alone.
        interpretation: vec![rule(0, 1, "low"), rule(3, 3, "high")],
    });
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::BandGap { from: 2, to: 2, .. })
    ));
}

#[test]
fn critical_items_must_exist() {
    let mut scale = two_item_scale();
    scale.critical_items.push(sonder_instruments::scale::CriticalItem {
        item_id: "zzz".to_string(),
        label: "missing".to_string(),
    });
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::UnknownCriticalItem { .. })
    ));
}

#[test]
fn duplicate_option_values_are_rejected() {
    let mut scale = two_item_scale();
    scale.items[0].format = ResponseFormat::Categorical {
        options: vec![
            ResponseOption { value: 1, label: "yes".to_string() },
            ResponseOption { value: 1, label: "also yes".to_string() },
        ],
    };
    assert!(matches!(
        scale.validate(),
        Err(DefinitionError::DuplicateOption { value: 1, .. })
    ));
}
