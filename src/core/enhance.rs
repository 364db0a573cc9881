/// Event enhancement: turns a generator's draft into a fully classified `Event`.
///
/// Author-supplied classification always wins. Whatever the author left out is
/// filled in by a [`ContentClassifier`].

use crate::schema::event::{
    Choice, ContentWarning, DraftEvent, Event, EventCategory, MaturityLevel, PsychTrigger,
    RiskLevel,
};
use crate::schema::psyche::Metric;

/// Fills in classification an event's author did not supply.
pub trait ContentClassifier {
    fn content_warnings(&self, text: &str) -> Vec<ContentWarning>;
    fn category(&self, text: &str, warnings: &[ContentWarning]) -> EventCategory;
    fn maturity(&self, text: &str, warnings: &[ContentWarning]) -> MaturityLevel;
}

const WARNING_KEYWORDS: &[(ContentWarning, &[&str])] = &[
    (
        ContentWarning::DrugUse,
        &[
            "cocaine", "coke", "pills", "powder", "heroin", "meth", "speed", "drug", "stash",
            "baggie",
        ],
    ),
    (
        ContentWarning::AlcoholAbuse,
        &["drunk", "whiskey", "vodka", "booze", "bar tab", "shots"],
    ),
    (
        ContentWarning::Addiction,
        &["addict", "withdrawal", "relapse", "sober", "rehab", "using again"],
    ),
    (ContentWarning::Overdose, &["overdose", "barely breathing", "od'd"]),
    (
        ContentWarning::Violence,
        &["fight", "punch", "blood", "stab", "gun", "brawl", "assault"],
    ),
    (
        ContentWarning::CriminalActivity,
        &["bribe", "blackmail", "launder", "smuggl", "stolen", "illegal", "dealing", "payola"],
    ),
    (
        ContentWarning::SexualContent,
        &["sex", "naked", "groupie", "hook up", "hookup"],
    ),
    (
        ContentWarning::SelfHarm,
        &["self-harm", "suicide", "end it all", "hurt yourself"],
    ),
    (
        ContentWarning::MentalHealth,
        &["panic", "mental breakdown", "depress", "hallucinat", "paranoi", "anxiety", "therapy"],
    ),
    (ContentWarning::StrongLanguage, &["fuck", "shit", "bastard"]),
];

const CORRUPTION_KEYWORDS: &[&str] =
    &["payola", "bribe", "kickback", "rigged", "corrupt", "envelope"];
const HORROR_KEYWORDS: &[&str] =
    &["whisper", "faceless", "no faces", "watching you", "following", "shadow"];
const INDUSTRY_KEYWORDS: &[&str] = &["label", "contract", "a&r", "royalt", "advance", "publicist"];

const MATURE_WARNINGS: &[ContentWarning] = &[
    ContentWarning::DrugUse,
    ContentWarning::Overdose,
    ContentWarning::Violence,
    ContentWarning::SexualContent,
    ContentWarning::SelfHarm,
    ContentWarning::StrongLanguage,
];

/// Substring heuristics over lowercased event text. Best effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

impl ContentClassifier for KeywordClassifier {
    fn content_warnings(&self, text: &str) -> Vec<ContentWarning> {
        WARNING_KEYWORDS
            .iter()
            .filter(|(_, keywords)| mentions(text, keywords))
            .map(|(warning, _)| *warning)
            .collect()
    }

    fn category(&self, text: &str, warnings: &[ContentWarning]) -> EventCategory {
        use ContentWarning as W;
        let has = |w: W| warnings.contains(&w);

        if has(W::SexualContent) {
            EventCategory::Sexual
        } else if has(W::DrugUse) || has(W::Overdose) || has(W::Addiction) || has(W::AlcoholAbuse) {
            EventCategory::SubstanceAbuse
        } else if mentions(text, CORRUPTION_KEYWORDS) {
            EventCategory::Corruption
        } else if has(W::CriminalActivity) {
            EventCategory::Criminal
        } else if has(W::Violence) {
            EventCategory::Violence
        } else if mentions(text, HORROR_KEYWORDS) {
            EventCategory::PsychologicalHorror
        } else if has(W::MentalHealth) || has(W::SelfHarm) {
            EventCategory::MentalHealth
        } else if mentions(text, INDUSTRY_KEYWORDS) {
            EventCategory::Industry
        } else {
            EventCategory::General
        }
    }

    fn maturity(&self, _text: &str, warnings: &[ContentWarning]) -> MaturityLevel {
        if warnings.iter().any(|w| MATURE_WARNINGS.contains(w)) {
            MaturityLevel::Mature
        } else {
            MaturityLevel::Teen
        }
    }
}

/// Psychological pressure points a choice touches.
pub fn choice_triggers(choice: &Choice) -> Vec<PsychTrigger> {
    let delta = |m: Metric| choice.metric_delta(m).unwrap_or(0.0);
    let mut triggers = choice.triggers.clone();

    let derived = [
        (delta(Metric::StressLevel) >= 10.0, PsychTrigger::StressSpike),
        (delta(Metric::AddictionRisk) > 0.0, PsychTrigger::AddictionPull),
        (delta(Metric::MoralIntegrity) < 0.0, PsychTrigger::MoralCompromise),
        (delta(Metric::Paranoia) >= 5.0, PsychTrigger::ParanoiaSpike),
        (delta(Metric::Depression) >= 5.0, PsychTrigger::DepressiveSpiral),
        (choice.trauma_risk.is_some(), PsychTrigger::TraumaExposure),
    ];
    triggers.extend(derived.iter().filter(|(hit, _)| *hit).map(|(_, t)| *t));
    triggers.sort();
    triggers.dedup();
    triggers
}

/// Wrap a draft into an `Event`. Every authored field survives unchanged.
pub fn enhance(draft: DraftEvent, classifier: &dyn ContentClassifier, id: String) -> Event {
    let text = draft.searchable_text();

    let content_warnings = match draft.content_warnings {
        Some(warnings) => warnings,
        None => classifier.content_warnings(&text),
    };
    let category = draft
        .category
        .unwrap_or_else(|| classifier.category(&text, &content_warnings));
    let maturity = draft
        .maturity
        .unwrap_or_else(|| classifier.maturity(&text, &content_warnings));
    let risk = draft.risk.unwrap_or_else(|| {
        draft
            .choices
            .iter()
            .map(|c| c.risk_level)
            .max()
            .unwrap_or(RiskLevel::Low)
    });

    let mut choices = draft.choices;
    for choice in &mut choices {
        choice.triggers = choice_triggers(choice);
    }
    let mut psychological_triggers: Vec<PsychTrigger> =
        choices.iter().flat_map(|c| c.triggers.iter().copied()).collect();
    psychological_triggers.sort();
    psychological_triggers.dedup();

    Event {
        id,
        kind: draft.kind,
        category,
        maturity,
        risk,
        title: draft.title,
        description: draft.description,
        character: draft.character,
        choices,
        content_warnings,
        psychological_triggers,
        arc: draft.arc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::event::ArcTag;
    use crate::schema::narrative::ArcType;
    use crate::schema::psyche::{MetricDeltas, Severity};

    #[test]
    fn bare_draft_gets_defaults() {
        let draft = DraftEvent::new("quiet", "Soundcheck", "The monitors hum.");
        let event = enhance(draft, &KeywordClassifier, "quiet_1_0".to_string());
        assert_eq!(event.category, EventCategory::General);
        assert_eq!(event.maturity, MaturityLevel::Teen);
        assert!(event.content_warnings.is_empty());
        assert_eq!(event.risk, RiskLevel::Low);
        assert!(event.psychological_triggers.is_empty());
    }

    #[test]
    fn author_values_win() {
        let draft = DraftEvent::new("x", "Bar Fight", "Someone throws a punch and there is blood.")
            .category(EventCategory::General)
            .maturity(MaturityLevel::Teen)
            .warnings(&[])
            .risk(RiskLevel::Medium);
        let event = enhance(draft, &KeywordClassifier, "x".to_string());
        assert_eq!(event.category, EventCategory::General);
        assert_eq!(event.maturity, MaturityLevel::Teen);
        assert!(event.content_warnings.is_empty());
        assert_eq!(event.risk, RiskLevel::Medium);
    }

    #[test]
    fn keywords_classify_missing_fields() {
        let draft = DraftEvent::new(
            "x",
            "Green Room",
            "The drummer is cutting powder on a mirror while the bassist gets drunk.",
        )
        .choice(Choice::new("a", "Leave", RiskLevel::Low))
        .choice(Choice::new("b", "Join in", RiskLevel::High));
        let event = enhance(draft, &KeywordClassifier, "x".to_string());
        assert!(event.content_warnings.contains(&ContentWarning::DrugUse));
        assert!(event.content_warnings.contains(&ContentWarning::AlcoholAbuse));
        assert_eq!(event.category, EventCategory::SubstanceAbuse);
        assert_eq!(event.maturity, MaturityLevel::Mature);
        assert_eq!(event.risk, RiskLevel::High);
    }

    #[test]
    fn corruption_and_industry_keywords() {
        let c = KeywordClassifier;
        assert_eq!(c.category("a payola envelope", &[]), EventCategory::Corruption);
        assert_eq!(c.category("the label wants a new contract", &[]), EventCategory::Industry);
        assert_eq!(c.category("a faceless crowd", &[]), EventCategory::PsychologicalHorror);
    }

    #[test]
    fn authored_fields_survive() {
        let draft = DraftEvent::new("beat", "Title", "Desc")
            .character("Dee", "sponsor")
            .choice(
                Choice::new("a", "Go", RiskLevel::Medium)
                    .money(50)
                    .faction(crate::schema::narrative::FactionId::MusicIndustry, 3),
            );
        let mut draft = draft;
        draft.arc = Some(ArcTag {
            arc_id: ArcType::AddictionSpiral,
            arc_stage: "rock_bottom".to_string(),
        });
        let before = draft.clone();
        let event = enhance(draft, &KeywordClassifier, "beat_3_1".to_string());

        assert_eq!(event.id, "beat_3_1");
        assert_eq!(event.kind, before.kind);
        assert_eq!(event.title, before.title);
        assert_eq!(event.character, before.character);
        assert_eq!(event.arc, before.arc);
        assert_eq!(event.choices[0].immediate_effects, before.choices[0].immediate_effects);
        assert_eq!(event.choices[0].faction_effects, before.choices[0].faction_effects);
    }

    #[test]
    fn triggers_follow_effects() {
        let choice = Choice::new("x", "Do it", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(15.0).addiction(5.0).morality(-2.0))
            .trauma("scare", 0.1, Severity::Minor, "A scare.");
        assert_eq!(
            choice_triggers(&choice),
            vec![
                PsychTrigger::StressSpike,
                PsychTrigger::AddictionPull,
                PsychTrigger::MoralCompromise,
                PsychTrigger::TraumaExposure,
            ]
        );

        let calm =
            Choice::new("y", "Rest", RiskLevel::Low).psyche(MetricDeltas::new().stress(-10.0));
        assert!(choice_triggers(&calm).is_empty());
    }

    struct AlwaysHorror;

    impl ContentClassifier for AlwaysHorror {
        fn content_warnings(&self, _text: &str) -> Vec<ContentWarning> {
            vec![ContentWarning::MentalHealth]
        }
        fn category(&self, _text: &str, _warnings: &[ContentWarning]) -> EventCategory {
            EventCategory::PsychologicalHorror
        }
        fn maturity(&self, _text: &str, _warnings: &[ContentWarning]) -> MaturityLevel {
            MaturityLevel::Mature
        }
    }

    #[test]
    fn classifier_is_pluggable() {
        let draft = DraftEvent::new("x", "Fan Mail", "A nice letter.");
        let event = enhance(draft, &AlwaysHorror, "x".to_string());
        assert_eq!(event.category, EventCategory::PsychologicalHorror);
        assert_eq!(event.content_warnings, vec![ContentWarning::MentalHealth]);
    }
}
