/// Template integration tests: built-in families and fixture files.

use gig_narrative::core::template::{TemplateLibrary, FALLBACK_FAMILIES};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

#[test]
fn builtin_families_load() {
    let lib = TemplateLibrary::builtin().unwrap();
    for family in FALLBACK_FAMILIES {
        assert!(lib.family(family).is_some(), "missing family {}", family);
    }
    assert!(lib.family("faction_encounter").is_some());
}

#[test]
fn every_builtin_family_has_alternatives() {
    let lib = TemplateLibrary::builtin().unwrap();
    for name in lib.names() {
        let family = lib.family(name).unwrap();
        assert!(
            family.setups.len() >= 2,
            "family '{}' has only {} setup(s)",
            name,
            family.setups.len()
        );
        for (list, words) in &family.words {
            assert!(words.len() >= 3, "family '{}' list '{}' is too short", name, list);
        }
    }
}

#[test]
fn builtin_placeholders_all_resolve() {
    let lib = TemplateLibrary::builtin().unwrap();
    for name in lib.names() {
        for seed in 0..40 {
            let draft = lib.generate(name, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert!(
                !draft.description.contains('%'),
                "family '{}' left a placeholder: {}",
                name,
                draft.description
            );
        }
        let family = lib.family(name).unwrap();
        for setup in &family.setups {
            for placeholder in setup.placeholders() {
                assert!(
                    family.words.contains_key(placeholder),
                    "family '{}' has no words for %{}%",
                    name,
                    placeholder
                );
            }
        }
    }
}

#[test]
fn same_seed_same_render() {
    let lib = TemplateLibrary::builtin().unwrap();
    for name in lib.names() {
        let a = lib.generate(name, &mut StdRng::seed_from_u64(2024)).unwrap();
        let b = lib.generate(name, &mut StdRng::seed_from_u64(2024)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn overrides_pin_a_placeholder() {
    let lib = TemplateLibrary::builtin().unwrap();
    for seed in 0..10 {
        let draft = lib
            .generate_with(
                "faction_encounter",
                &[("faction", "the vice squad")],
                &mut StdRng::seed_from_u64(seed),
            )
            .unwrap();
        assert!(draft.description.contains("the vice squad"));
    }
}

#[test]
fn fixture_file_merges_over_builtins() {
    let mut lib = TemplateLibrary::builtin().unwrap();
    let fixture =
        TemplateLibrary::load_from_ron(Path::new("tests/fixtures/templates/tour_templates.ron"))
            .unwrap();
    assert_eq!(fixture.families.len(), 2);
    lib.merge(fixture);

    assert_eq!(lib.families.len(), 6);
    assert_eq!(lib.family("venue_incident").unwrap().title, "House Rules");

    let draft = lib
        .generate("merch_disaster", &mut StdRng::seed_from_u64(8))
        .unwrap();
    assert_eq!(draft.kind, "merch_disaster");
    assert_eq!(draft.choices.len(), 3);
    assert!(!draft.description.contains('%'));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = TemplateLibrary::load_from_ron(Path::new("tests/fixtures/templates/absent.ron"));
    assert!(result.is_err());
}
