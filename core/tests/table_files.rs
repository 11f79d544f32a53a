// core/tests/table_files.rs
//
// Loading a TOML morphology table from disk and querying the engine it
// builds.

use inflexion_core::{MorphologyTable, TagFilter};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn english() -> inflexion_core::Inflexion {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("english.toml");
    MorphologyTable::load_toml(&path)
        .expect("load english.toml")
        .build()
        .expect("build english.toml")
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn analyses(items: &[(&str, &str)]) -> BTreeSet<(String, String)> {
    items
        .iter()
        .map(|(l, k)| (l.to_string(), k.to_string()))
        .collect()
}

#[test]
fn regular_generation() {
    let engine = english();
    assert_eq!(engine.forms("WALK", "pres.3s"), set(&["walks"]));
    assert_eq!(engine.forms("CARRY", "pres.3s"), set(&["carries"]));
    assert_eq!(engine.forms("CARRY", "past"), set(&["carried"]));
    assert_eq!(engine.forms("BAKE", "past"), set(&["baked"]));
    assert_eq!(engine.forms("BAKE", "ptcp"), set(&["baking"]));
    assert_eq!(engine.forms("GO", "pres.3s"), set(&["goes"]));
}

#[test]
fn suppletive_past_respects_tags() {
    let engine = english();
    assert_eq!(engine.forms("GO", "past"), set(&["went"]));

    let scots: TagFilter = ["scots"].into_iter().collect();
    let forms: BTreeSet<String> = engine
        .generate_tagged("GO", "past", &scots)
        .into_keys()
        .collect();
    assert_eq!(forms, set(&["gaed"]));
}

#[test]
fn parsing_recovers_lemma_and_key() {
    let engine = english();
    assert_eq!(engine.parse("carried"), analyses(&[("CARRY", "past")]));
    assert_eq!(engine.parse("walks"), analyses(&[("WALK", "pres.3s")]));
    assert_eq!(engine.parse("went"), analyses(&[("GO", "past")]));
    assert_eq!(engine.parse("goes"), analyses(&[("GO", "pres.3s")]));
    assert!(engine.parse("walkx").is_empty());
}

#[test]
fn missing_file_is_an_error() {
    assert!(MorphologyTable::load_toml("does/not/exist.toml").is_err());
}
