/// Archetype classifier: scores player profiles from choice history and biases choices.

use std::collections::BTreeMap;
use tracing::debug;

use crate::schema::event::{Choice, DraftEvent, RiskLevel};
use crate::schema::narrative::{Archetype, ChoiceRecord, FactionId, NarrativeState};
use crate::schema::psyche::{Metric, PsychologicalState};

/// A winning score below this is treated as no evidence.
pub const DETECTION_THRESHOLD: i32 = 3;

const PLEASER_WORDS: &[&str] = &["avoid", "diplomatic", "harmony"];
const SURVIVOR_WORDS: &[&str] = &["recover", "adapt", "overcome"];

#[derive(Debug, Clone, Copy)]
pub struct ArchetypeProfile {
    pub archetype: Archetype,
    pub choice_preferences: &'static [&'static str],
    /// Catalog event ids this kind of player keeps running into.
    pub event_magnets: &'static [&'static str],
    pub psychological_traits: &'static [&'static str],
    pub event_modifications: &'static str,
    pub reputation_modifiers: &'static [(FactionId, i32)],
}

pub static PROFILES: [ArchetypeProfile; 6] = [
    ArchetypeProfile {
        archetype: Archetype::RiskSeeker,
        choice_preferences: &["high_risk", "thrill", "escalation"],
        event_magnets: &["backstage_excess", "warehouse_raid"],
        psychological_traits: &["impulsive", "stimulation_hungry"],
        event_modifications: "high-risk choices gain appeal, safe ones lose it",
        reputation_modifiers: &[
            (FactionId::CriminalUnderground, 5),
            (FactionId::LawEnforcement, -5),
        ],
    },
    ArchetypeProfile {
        archetype: Archetype::PeoplePleaser,
        choice_preferences: &["diplomatic", "conflict_avoidant"],
        event_magnets: &["bandmate_burnout", "label_pressure_to_sellout"],
        psychological_traits: &["approval_seeking", "anxious"],
        event_modifications: "safe choices gain appeal, confrontational ones lose it",
        reputation_modifiers: &[(FactionId::MusicIndustry, 5)],
    },
    ArchetypeProfile {
        archetype: Archetype::MoralCompass,
        choice_preferences: &["ethical", "principled"],
        event_magnets: &["payola_offer", "shady_investor"],
        psychological_traits: &["conscientious", "rigid"],
        event_modifications: "choices that protect integrity gain appeal",
        reputation_modifiers: &[
            (FactionId::MoralGuardians, 5),
            (FactionId::CriminalUnderground, -5),
        ],
    },
    ArchetypeProfile {
        archetype: Archetype::Pragmatist,
        choice_preferences: &["profitable", "strategic"],
        event_magnets: &["shady_investor", "predatory_contract"],
        psychological_traits: &["calculating", "detached"],
        event_modifications: "choices that pay gain appeal",
        reputation_modifiers: &[
            (FactionId::MusicIndustry, 5),
            (FactionId::UndergroundScene, -5),
        ],
    },
    ArchetypeProfile {
        archetype: Archetype::SelfDestructive,
        choice_preferences: &["indulgent", "reckless"],
        event_magnets: &["backstage_excess", "dark_night"],
        psychological_traits: &["self_sabotaging", "numb"],
        event_modifications: "using and high-risk choices gain a strong pull",
        reputation_modifiers: &[
            (FactionId::UndergroundScene, 5),
            (FactionId::MoralGuardians, -5),
        ],
    },
    ArchetypeProfile {
        archetype: Archetype::Survivor,
        choice_preferences: &["resilient", "adaptive"],
        event_magnets: &["loan_shark", "bandmate_burnout"],
        psychological_traits: &["hardened", "watchful"],
        event_modifications: "measured choices gain appeal",
        reputation_modifiers: &[(FactionId::UndergroundScene, 5)],
    },
];

pub fn profile(archetype: Archetype) -> &'static ArchetypeProfile {
    // PROFILES follows Archetype declaration order
    &PROFILES[archetype as usize]
}

fn add(scores: &mut [i32; 6], archetype: Archetype, points: i32) {
    scores[archetype as usize] += points;
}

fn score_choice(scores: &mut [i32; 6], choice: &Choice) {
    use Archetype::*;

    if choice.risk_level.is_high() {
        add(scores, RiskSeeker, 2);
    }

    let addiction = choice.metric_delta(Metric::AddictionRisk).unwrap_or(0.0);
    if addiction > 0.0 {
        add(scores, RiskSeeker, 1);
        add(scores, SelfDestructive, 1);
    }

    let text = choice.text.to_lowercase();
    if PLEASER_WORDS.iter().any(|w| text.contains(w)) {
        add(scores, PeoplePleaser, 2);
    }
    if SURVIVOR_WORDS.iter().any(|w| text.contains(w)) {
        add(scores, Survivor, 2);
    }

    let moral = choice.metric_delta(Metric::MoralIntegrity).unwrap_or(0.0);
    if moral > 0.0 {
        add(scores, MoralCompass, 2);
    } else if moral < 0.0 {
        add(scores, MoralCompass, -1);
        add(scores, Pragmatist, 1);
    }

    if let Some(effects) = &choice.immediate_effects {
        if effects.money > 0 || effects.fame > 0 {
            add(scores, Pragmatist, 1);
        }
    }

    let stress = choice.metric_delta(Metric::StressLevel).unwrap_or(0.0);
    let depression = choice.metric_delta(Metric::Depression).unwrap_or(0.0);
    if stress.abs() > 20.0 || depression.abs() > 20.0 {
        add(scores, SelfDestructive, 1);
    }

    let health_loss = choice.immediate_effects.map_or(0, |e| -e.health);
    if health_loss >= 10 || addiction >= 10.0 {
        add(scores, SelfDestructive, 2);
    }
}

fn score_state(scores: &mut [i32; 6], psyche: &PsychologicalState) {
    use Archetype::*;

    if psyche.addiction_risk > 60.0 {
        add(scores, RiskSeeker, 2);
        add(scores, SelfDestructive, 2);
    }
    if psyche.moral_integrity > 80.0 {
        add(scores, MoralCompass, 2);
    } else if psyche.moral_integrity < 40.0 {
        add(scores, Pragmatist, 2);
    }
    if psyche.depression > 60.0 {
        add(scores, SelfDestructive, 1);
    }
    if psyche.trauma_history.len() >= 2 {
        add(scores, Survivor, 2);
    }
    if psyche.paranoia > 60.0 {
        add(scores, Survivor, 1);
    }
}

/// Raw per-archetype scores, in declaration order.
pub fn archetype_scores(
    history: &[ChoiceRecord],
    psyche: &PsychologicalState,
) -> [(Archetype, i32); 6] {
    let mut scores = [0i32; 6];
    for record in history {
        score_choice(&mut scores, &record.choice);
    }
    score_state(&mut scores, psyche);
    Archetype::ALL.map(|a| (a, scores[a as usize]))
}

/// Highest first; equal scores keep declaration order.
fn ranked(scores: [(Archetype, i32); 6]) -> Vec<(Archetype, i32)> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// The archetype with the highest score, or `None` when it falls short of
/// [`DETECTION_THRESHOLD`]. Ties go to the archetype declared first.
///
/// A band with no choices on record is never classified, however its psyche
/// reads.
pub fn detect_archetype(
    history: &[ChoiceRecord],
    psyche: &PsychologicalState,
) -> Option<Archetype> {
    if history.is_empty() {
        return None;
    }
    let (winner, score) = ranked(archetype_scores(history, psyche))[0];
    (score >= DETECTION_THRESHOLD).then_some(winner)
}

/// Classify and store the result on the narrative state.
pub fn record_archetype(
    narrative: &mut NarrativeState,
    psyche: &PsychologicalState,
) -> Option<Archetype> {
    let ranking = ranked(archetype_scores(&narrative.choice_history, psyche));
    let primary = (!narrative.choice_history.is_empty() && ranking[0].1 >= DETECTION_THRESHOLD)
        .then_some(ranking[0].0);

    let player = &mut narrative.player_archetype;
    player.primary = primary;
    player.detected = primary.is_some();
    player.secondary = primary.and_then(|_| (ranking[1].1 > 0).then_some(ranking[1].0));
    player.reputation_modifiers = primary
        .map(|a| profile(a).reputation_modifiers.iter().copied().collect())
        .unwrap_or_else(BTreeMap::new);

    if let Some(archetype) = primary {
        debug!(primary = archetype.name(), score = ranking[0].1, "archetype detected");
    }
    primary
}

fn appeal(archetype: Archetype, choice: &Choice) -> i32 {
    let moral = choice.metric_delta(Metric::MoralIntegrity).unwrap_or(0.0);
    let addiction = choice.metric_delta(Metric::AddictionRisk).unwrap_or(0.0);
    let money = choice.immediate_effects.map_or(0, |e| e.money);

    match archetype {
        Archetype::RiskSeeker => match choice.risk_level {
            RiskLevel::High | RiskLevel::Extreme => 20,
            RiskLevel::Low => -15,
            RiskLevel::Medium => 0,
        },
        Archetype::PeoplePleaser => match choice.risk_level {
            RiskLevel::Low => 15,
            RiskLevel::High | RiskLevel::Extreme => -10,
            RiskLevel::Medium => 0,
        },
        Archetype::MoralCompass if moral > 0.0 => 20,
        Archetype::MoralCompass if moral < 0.0 => -20,
        Archetype::MoralCompass => 0,
        Archetype::Pragmatist if money > 0 => 15,
        Archetype::Pragmatist => 0,
        Archetype::SelfDestructive if addiction > 0.0 || choice.risk_level.is_high() => 25,
        Archetype::SelfDestructive => 0,
        Archetype::Survivor => match choice.risk_level {
            RiskLevel::Low | RiskLevel::Medium => 10,
            _ => 0,
        },
    }
}

/// Annotate every choice with an archetype appeal boost. Never removes choices.
pub fn adapt_event_to_archetype(draft: &mut DraftEvent, archetype: Archetype) {
    for choice in &mut draft.choices {
        let boost = appeal(archetype, choice);
        if boost != 0 {
            choice.appeal_boost = Some(choice.appeal_boost.unwrap_or(0) + boost);
        }
    }
}
