/// Template substitution generator: `%placeholder%` setups, word lists, and choice ladders.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::event::{
    ArcProgression, Choice, ContentWarning, DraftEvent, EventCategory, MaturityLevel, RiskLevel,
};
use crate::schema::narrative::ArcType;
use crate::schema::psyche::{MetricDeltas, Severity};

/// Built-in families, compiled into the crate.
const DEFAULT_TEMPLATES: &str = include_str!("../../content/templates.ron");

/// Word substituted for placeholders with no word list.
pub const UNKNOWN_WORD: &str = "something";

/// Families the orchestrator's template tier draws from.
pub const FALLBACK_FAMILIES: [&str; 4] = [
    "corruption_offer",
    "substance_temptation",
    "moral_crossroads",
    "venue_incident",
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown template family '{0}'")]
    UnknownFamily(String),
    #[error("template family '{0}' has no setups")]
    EmptyFamily(String),
    #[error("template family '{family}' has a malformed placeholder '{token}'")]
    BadPlaceholder { family: String, token: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateSegment {
    Literal(String),
    /// `%name%` where name is made of ASCII letters, digits and underscores.
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Template {
    /// Parse a setup sentence. A `%` followed by a name character opens a
    /// placeholder that must close with `%` right after the name; any other
    /// `%` ("100% of the door") is literal text. On failure the error holds
    /// the offending token.
    pub fn parse(input: &str) -> Result<Template, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let chars: Vec<char> = input.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '%' {
                let start = i + 1;
                let mut end = start;
                while end < chars.len() && is_name_char(chars[end]) {
                    end += 1;
                }
                if end > start {
                    if end == chars.len() || chars[end] != '%' {
                        let stop = (end + 1).min(chars.len());
                        return Err(chars[i..stop].iter().collect());
                    }
                    if !literal.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(TemplateSegment::Placeholder(
                        chars[start..end].iter().collect(),
                    ));
                    i = end + 1;
                    continue;
                }
            }
            literal.push(chars[i]);
            i += 1;
        }

        if !literal.is_empty() {
            segments.push(TemplateSegment::Literal(literal));
        }
        Ok(Template { segments })
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Placeholder(name) => Some(name.as_str()),
            TemplateSegment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder. `overrides` win over word lists; names
    /// found in neither become [`UNKNOWN_WORD`].
    pub fn render(
        &self,
        words: &BTreeMap<String, Vec<String>>,
        overrides: &[(&str, &str)],
        rng: &mut StdRng,
    ) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Placeholder(name) => {
                    if let Some((_, word)) = overrides.iter().find(|(n, _)| *n == name.as_str()) {
                        out.push_str(word);
                        continue;
                    }
                    let word = words
                        .get(name)
                        .and_then(|list| list.choose(rng))
                        .map(String::as_str)
                        .unwrap_or(UNKNOWN_WORD);
                    out.push_str(word);
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFamily {
    pub name: String,
    pub title: String,
    pub setups: Vec<Template>,
    pub words: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    pub families: FxHashMap<String, TemplateFamily>,
}

#[derive(Debug, Deserialize)]
#[serde(rename = "Family")]
struct RonFamily {
    title: String,
    setups: Vec<String>,
    #[serde(default)]
    words: BTreeMap<String, Vec<String>>,
}

impl TemplateLibrary {
    /// The built-in families.
    pub fn builtin() -> Result<TemplateLibrary, TemplateError> {
        Self::parse_ron(DEFAULT_TEMPLATES)
    }

    pub fn load_from_ron(path: &Path) -> Result<TemplateLibrary, TemplateError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<TemplateLibrary, TemplateError> {
        let raw: BTreeMap<String, RonFamily> = ron::from_str(input)?;
        let mut families = FxHashMap::default();

        for (name, family) in raw {
            if family.setups.is_empty() {
                return Err(TemplateError::EmptyFamily(name));
            }
            let setups = family
                .setups
                .iter()
                .map(|s| Template::parse(s))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|token| TemplateError::BadPlaceholder {
                    family: name.clone(),
                    token,
                })?;
            families.insert(
                name.clone(),
                TemplateFamily {
                    name,
                    title: family.title,
                    setups,
                    words: family.words,
                },
            );
        }

        Ok(TemplateLibrary { families })
    }

    /// Families from `other` replace same-named families in `self`.
    pub fn merge(&mut self, other: TemplateLibrary) {
        for (name, family) in other.families {
            self.families.insert(name, family);
        }
    }

    pub fn family(&self, name: &str) -> Option<&TemplateFamily> {
        self.families.get(name)
    }

    /// Family names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.families.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn generate(&self, family: &str, rng: &mut StdRng) -> Result<DraftEvent, TemplateError> {
        self.generate_with(family, &[], rng)
    }

    /// Build an event from a random setup of `family`, with some placeholders
    /// pinned to caller-supplied words.
    pub fn generate_with(
        &self,
        family: &str,
        overrides: &[(&str, &str)],
        rng: &mut StdRng,
    ) -> Result<DraftEvent, TemplateError> {
        let fam = self
            .families
            .get(family)
            .ok_or_else(|| TemplateError::UnknownFamily(family.to_string()))?;
        let setup = fam
            .setups
            .choose(rng)
            .ok_or_else(|| TemplateError::EmptyFamily(family.to_string()))?;
        let description = setup.render(&fam.words, overrides, rng);

        let mut draft = DraftEvent::new(family, fam.title.clone(), description);
        draft.choices = family_choices(family);
        match family {
            "substance_temptation" => {
                draft = draft
                    .category(EventCategory::SubstanceAbuse)
                    .maturity(MaturityLevel::Mature)
                    .warnings(&[ContentWarning::DrugUse, ContentWarning::Addiction]);
            }
            "corruption_offer" => {
                draft = draft.category(EventCategory::Corruption);
            }
            _ => {}
        }
        Ok(draft)
    }
}

/// Fixed choice sets per family. substance_temptation gets its own ladder,
/// everything else the ethical / pragmatic / corrupt triple.
pub fn family_choices(family: &str) -> Vec<Choice> {
    if family == "substance_temptation" {
        return vec![
            Choice::new("refuse", "Turn it down and stay sharp for the set", RiskLevel::Low)
                .psyche(MetricDeltas::new().stress(5.0)),
            Choice::new("just_once", "Just this once, to take the edge off", RiskLevel::Medium)
                .psyche(MetricDeltas::new().stress(-10.0).addiction(10.0)),
            Choice::new("all_in", "Take everything on offer", RiskLevel::High)
                .psyche(MetricDeltas::new().stress(-20.0).addiction(25.0))
                .health(-10)
                .trauma(
                    "overdose_scare",
                    0.15,
                    Severity::Severe,
                    "You came to on a bathroom floor with someone shaking you.",
                )
                .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
        ];
    }

    let mut corrupt = Choice::new(
        "corrupt",
        "Take what's offered and don't ask questions",
        RiskLevel::High,
    )
    .psyche(MetricDeltas::new().morality(-15.0).paranoia(5.0))
    .money(500);
    if family == "corruption_offer" {
        corrupt = corrupt.progresses(ArcProgression::Escalate(ArcType::CorruptionPath));
    }

    vec![
        Choice::new("ethical", "Do the right thing, whatever it costs", RiskLevel::Low)
            .psyche(MetricDeltas::new().morality(5.0).stress(5.0)),
        Choice::new(
            "pragmatic",
            "Find a middle ground that keeps everyone quiet",
            RiskLevel::Medium,
        )
        .psyche(MetricDeltas::new().morality(-3.0))
        .money(100),
        corrupt,
    ]
}
