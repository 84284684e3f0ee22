use sonder_instruments::catalog::ScaleCatalog;
use sonder_instruments::error::InstrumentError;
use sonder_instruments::scoring::resolve_band;
use sonder_instruments::{Instrument, all_instruments};

#[test]
fn every_bundled_instrument_validates() {
    for instrument in all_instruments() {
        instrument
            .definition()
            .validate()
            .unwrap_or_else(|e| panic!("{} failed validation: {e}", instrument.id()));
    }
}

#[test]
fn every_score_in_range_resolves_to_exactly_one_band() {
    for instrument in all_instruments() {
        let def = instrument.definition();
        for score in def.score_range.min..=def.score_range.max {
            let matching = def.interpretation.iter().filter(|r| r.contains(score)).count();
            assert_eq!(matching, 1, "{} score {score}", def.id);
            resolve_band(&def.id, "total", &def.interpretation, score).unwrap();
        }
    }
}

#[test]
fn builtin_catalog_lists_active_scales_sorted() {
    let catalog = ScaleCatalog::builtin().unwrap();
    let ids: Vec<String> = catalog.list_active().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["epds", "gad7", "phq9", "pss10"]);

    let phq9 = catalog.get_scale("phq9").unwrap();
    assert_eq!(phq9.abbreviation, "PHQ-9");
    assert_eq!(phq9.items.len(), 10);
}

#[test]
fn unknown_and_inactive_scales_are_indistinguishable() {
    let mut retired = sonder_instruments::instruments::gad7::Gad7.definition().clone();
    retired.id = "gad7_legacy".to_string();
    retired.active = false;

    let catalog = ScaleCatalog::from_definitions(vec![retired]).unwrap();

    let inactive = catalog.get_scale("gad7_legacy").unwrap_err();
    let missing = catalog.get_scale("nope").unwrap_err();
    assert!(matches!(inactive, InstrumentError::ScaleNotFound(_)));
    assert!(matches!(missing, InstrumentError::ScaleNotFound(_)));
    assert!(catalog.list_active().is_empty());
}

#[test]
fn retired_scale_still_resolves_for_bound_assessments() {
    let mut retired = sonder_instruments::instruments::gad7::Gad7.definition().clone();
    retired.active = false;

    let catalog = ScaleCatalog::from_definitions(vec![retired]).unwrap();

    assert!(catalog.get_scale("gad7").is_err());
    assert_eq!(catalog.bound_scale("gad7").unwrap().id, "gad7");
    assert!(catalog.bound_scale("nope").is_err());
}

#[test]
fn duplicate_scale_ids_are_rejected() {
    let def = sonder_instruments::instruments::gad7::Gad7.definition().clone();
    let err = ScaleCatalog::from_definitions(vec![def.clone(), def]).unwrap_err();
    assert!(matches!(err, InstrumentError::DuplicateScale(id) if id == "gad7"));
}

#[test]
fn catalog_loads_from_json() {
    let defs = vec![sonder_instruments::instruments::phq9::Phq9.definition().clone()];
    let json = serde_json::to_string(&defs).unwrap();

    let catalog = ScaleCatalog::from_json(&json).unwrap();
    assert_eq!(catalog.get_scale("phq9").unwrap().items.len(), 10);
}
