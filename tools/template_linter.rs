/// Template Linter: validates event template families.
///
/// Usage: template_linter <template_file_or_dir> [--builtin]

use gig_narrative::core::template::{TemplateLibrary, TemplateSegment, FALLBACK_FAMILIES};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: template_linter <template_file_or_dir> [--builtin]");
        println!("  --builtin   lint the families merged over the built-in library");
        process::exit(0);
    }

    let template_path = Path::new(&args[1]);
    let with_builtin = args[2..].iter().any(|a| a == "--builtin");

    let mut load_errors = Vec::new();
    let mut library = if with_builtin {
        match TemplateLibrary::builtin() {
            Ok(lib) => lib,
            Err(e) => {
                eprintln!("ERROR: Built-in templates are broken: {}", e);
                process::exit(1);
            }
        }
    } else {
        TemplateLibrary::default()
    };

    if template_path.is_file() {
        match TemplateLibrary::load_from_ron(template_path) {
            Ok(lib) => library.merge(lib),
            Err(e) => {
                eprintln!("ERROR: Failed to load template file: {}", e);
                process::exit(1);
            }
        }
    } else if template_path.is_dir() {
        load_templates_recursive(template_path, &mut library, &mut load_errors);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }

    println!("Loaded {} template families", library.families.len());

    let (mut errors, warnings) = lint_templates(&library);
    errors.extend(load_errors);

    println!("\n=== Template Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_templates_recursive(
    dir: &Path,
    library: &mut TemplateLibrary,
    errors: &mut Vec<String>,
) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_templates_recursive(&path, library, errors);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match TemplateLibrary::load_from_ron(&path) {
                    Ok(lib) => {
                        println!("  Loaded: {}", path.display());
                        library.merge(lib);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                        errors.push(format!("{}: {}", path.display(), e));
                    }
                }
            }
        }
    }
}

fn lint_templates(library: &TemplateLibrary) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // The engine falls back to these; partial libraries are fine but worth flagging.
    for family in FALLBACK_FAMILIES.iter().chain(["faction_encounter"].iter()) {
        if library.family(family).is_none() {
            warnings.push(format!("No '{}' family; the engine will skip it", family));
        }
    }

    for name in library.names() {
        let Some(family) = library.family(name) else {
            continue;
        };

        if family.setups.len() < 2 {
            warnings.push(format!(
                "Family '{}' has only {} setup(s) (minimum 2 recommended)",
                name,
                family.setups.len()
            ));
        }

        let mut used = FxHashSet::default();
        for (i, setup) in family.setups.iter().enumerate() {
            for placeholder in setup.placeholders() {
                used.insert(placeholder.to_string());
                if !family.words.contains_key(placeholder) {
                    errors.push(format!(
                        "Family '{}' setup {} uses %{}% with no word list (renders as \"something\")",
                        name, i, placeholder
                    ));
                }
            }
            for segment in &setup.segments {
                if let TemplateSegment::Literal(text) = segment {
                    if text.contains('%') {
                        warnings.push(format!(
                            "Family '{}' setup {} has a stray '%' that is not a placeholder",
                            name, i
                        ));
                    }
                }
            }
        }

        for (word_list, words) in &family.words {
            if words.is_empty() {
                errors.push(format!(
                    "Family '{}' word list '{}' is empty",
                    name, word_list
                ));
            } else if words.len() < 3 {
                warnings.push(format!(
                    "Family '{}' word list '{}' has only {} words (minimum 3 recommended)",
                    name,
                    word_list,
                    words.len()
                ));
            }
            if !used.contains(word_list.as_str()) {
                warnings.push(format!(
                    "Family '{}' word list '{}' is never used by a setup",
                    name, word_list
                ));
            }
        }
    }

    (errors, warnings)
}
