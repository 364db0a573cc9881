/// Applying a resolved choice back into the session stores.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::arc::{escalate_arc, record_clean_week, relapse, ArcError};
use crate::core::archetype::record_archetype;
use crate::core::faction::{adjust_standing, is_choice_available};
use crate::schema::event::{ArcProgression, Event, ImmediateEffects, LongTermEffects};
use crate::schema::game::Session;
use crate::schema::narrative::{ArcInstance, Archetype, ChoiceRecord};
use crate::schema::psyche::TraumaRecord;

#[derive(Debug, Error, PartialEq)]
pub enum ResolutionError {
    #[error("event '{event}' has no choice '{choice}'")]
    UnknownChoice { event: String, choice: String },
    #[error("choice '{choice}' needs {faction} standing {required}, have {standing}")]
    Unavailable {
        choice: String,
        faction: &'static str,
        required: i32,
        standing: i32,
    },
    #[error(transparent)]
    Arc(#[from] ArcError),
}

/// What resolving a choice did. Money, fame, health and morale are handed back
/// to the game layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub choice_id: String,
    pub immediate: Option<ImmediateEffects>,
    pub long_term: Option<LongTermEffects>,
    pub trauma: Option<TraumaRecord>,
    pub arc: Option<ArcInstance>,
    pub archetype: Option<Archetype>,
}

/// Apply `choice_id` from `event` to the session.
///
/// Nothing is touched when the choice is unknown or gated by a faction
/// requirement the band no longer meets.
pub fn resolve_choice(
    session: &mut Session,
    event: &Event,
    choice_id: &str,
    rng: &mut StdRng,
) -> Result<Resolution, ResolutionError> {
    let choice = event
        .choice(choice_id)
        .ok_or_else(|| ResolutionError::UnknownChoice {
            event: event.id.clone(),
            choice: choice_id.to_string(),
        })?;

    if !is_choice_available(choice, &session.narrative.faction_standings) {
        if let Some(req) = choice.required_faction_standing {
            return Err(ResolutionError::Unavailable {
                choice: choice_id.to_string(),
                faction: req.faction.name(),
                required: req.min_standing,
                standing: session.narrative.standing(req.faction),
            });
        }
    }

    let week = session.game.week;
    let standings = &mut session.narrative.faction_standings;
    if let Some(effects) = &choice.psychological_effects {
        session.psyche.update(&effects.metrics);
        for (faction, delta) in &effects.faction_reputation {
            adjust_standing(standings, *faction, *delta);
        }
    }
    for (faction, delta) in &choice.faction_effects {
        adjust_standing(standings, *faction, *delta);
    }

    let trauma = match &choice.trauma_risk {
        Some(risk) if rng.gen_bool(risk.probability.clamp(0.0, 1.0)) => Some(
            session
                .psyche
                .add_trauma(&risk.trauma_type, &risk.description, risk.severity, week)
                .clone(),
        ),
        _ => None,
    };

    session.narrative.choice_history.push(ChoiceRecord {
        event_id: event.id.clone(),
        event_kind: event.kind.clone(),
        week,
        choice: choice.clone(),
    });

    let arc = match choice.progression {
        Some(ArcProgression::Escalate(arc)) => {
            Some(escalate_arc(&mut session.narrative, arc, week)?.clone())
        }
        Some(ArcProgression::Relapse(arc)) => relapse(&mut session.narrative, arc, week).cloned(),
        Some(ArcProgression::CleanWeek(arc)) => {
            record_clean_week(&mut session.narrative, arc);
            session.narrative.arc(arc).cloned()
        }
        None => None,
    };

    let archetype = record_archetype(&mut session.narrative, &session.psyche);
    debug!(
        event = %event.id,
        choice = choice_id,
        traumatized = trauma.is_some(),
        "choice resolved"
    );

    Ok(Resolution {
        choice_id: choice_id.to_string(),
        immediate: choice.immediate_effects,
        long_term: choice.long_term_effects.clone(),
        trauma,
        arc,
        archetype,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::enhance::{enhance, KeywordClassifier};
    use crate::schema::event::{Choice, DraftEvent, RiskLevel};
    use crate::schema::narrative::{ArcType, FactionId};
    use crate::schema::psyche::{MetricDeltas, Severity};
    use rand::SeedableRng;

    fn event_with(choices: Vec<Choice>) -> Event {
        let mut draft = DraftEvent::new("test", "Test", "A test event.");
        draft.choices = choices;
        enhance(draft, &KeywordClassifier, "test_1_0".to_string())
    }

    #[test]
    fn applies_psyche_and_faction_effects() {
        let mut choice = Choice::new("take", "Take the cash", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-10.0).stress(5.0))
            .money(300)
            .faction(FactionId::CriminalUnderground, 15);
        choice
            .psych_effects_mut()
            .faction_reputation
            .insert(FactionId::LawEnforcement, -10);
        let event = event_with(vec![choice]);

        let mut session = Session::new_game();
        let mut rng = StdRng::seed_from_u64(1);
        let resolution = resolve_choice(&mut session, &event, "take", &mut rng).unwrap();

        assert_eq!(session.psyche.moral_integrity, 90.0);
        assert_eq!(session.psyche.stress_level, 5.0);
        assert_eq!(session.narrative.standing(FactionId::CriminalUnderground), 15);
        assert_eq!(session.narrative.standing(FactionId::LawEnforcement), -10);
        assert_eq!(resolution.immediate.unwrap().money, 300);
        assert_eq!(session.narrative.choice_history.len(), 1);
        assert_eq!(session.narrative.choice_history[0].event_id, "test_1_0");
    }

    #[test]
    fn faction_effects_are_clamped() {
        let event = event_with(vec![
            Choice::new("snitch", "Talk to the cops", RiskLevel::High)
                .faction(FactionId::CriminalUnderground, -80),
        ]);
        let mut session = Session::new_game();
        session
            .narrative
            .faction_standings
            .insert(FactionId::CriminalUnderground, -60);
        let mut rng = StdRng::seed_from_u64(1);
        resolve_choice(&mut session, &event, "snitch", &mut rng).unwrap();
        assert_eq!(session.narrative.standing(FactionId::CriminalUnderground), -100);
    }

    #[test]
    fn unknown_choice_leaves_session_untouched() {
        let event = event_with(vec![Choice::new("a", "A", RiskLevel::Low)]);
        let mut session = Session::new_game();
        let before = session.clone();
        let mut rng = StdRng::seed_from_u64(1);
        let err = resolve_choice(&mut session, &event, "zzz", &mut rng).unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownChoice { .. }));
        assert_eq!(session, before);
    }

    #[test]
    fn gated_choice_is_rejected() {
        let event = event_with(vec![Choice::new("vip", "Call in a favor", RiskLevel::Low)
            .requires(FactionId::MusicIndustry, 40)
            .psyche(MetricDeltas::new().stress(-10.0))]);
        let mut session = Session::new_game();
        session.psyche.stress_level = 50.0;
        let mut rng = StdRng::seed_from_u64(1);
        let err = resolve_choice(&mut session, &event, "vip", &mut rng).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::Unavailable {
                choice: "vip".to_string(),
                faction: "music_industry",
                required: 40,
                standing: 0,
            }
        );
        assert_eq!(session.psyche.stress_level, 50.0);
    }

    #[test]
    fn certain_trauma_is_recorded() {
        let event = event_with(vec![Choice::new("all_in", "All in", RiskLevel::Extreme)
            .trauma("overdose_scare", 1.0, Severity::Moderate, "A bad night.")]);
        let mut session = Session::new_game();
        let mut rng = StdRng::seed_from_u64(1);
        let resolution = resolve_choice(&mut session, &event, "all_in", &mut rng).unwrap();
        let trauma = resolution.trauma.unwrap();
        assert_eq!(trauma.trauma_type, "overdose_scare");
        assert_eq!(session.psyche.trauma_history.len(), 1);
        assert_eq!(session.psyche.stress_level, 10.0);
    }

    #[test]
    fn impossible_trauma_never_fires() {
        let event = event_with(vec![Choice::new("safe", "Stay home", RiskLevel::Low)
            .trauma("nothing", 0.0, Severity::Critical, "Never.")]);
        let mut session = Session::new_game();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let resolution = resolve_choice(&mut session, &event, "safe", &mut rng).unwrap();
            assert!(resolution.trauma.is_none());
        }
        assert!(session.psyche.trauma_history.is_empty());
    }

    #[test]
    fn progression_moves_arcs() {
        let event = event_with(vec![
            Choice::new("use", "Use", RiskLevel::High)
                .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
            Choice::new("skip", "Skip it", RiskLevel::Low)
                .progresses(ArcProgression::CleanWeek(ArcType::AddictionSpiral)),
            Choice::new("slip", "Slip", RiskLevel::High)
                .progresses(ArcProgression::Relapse(ArcType::AddictionSpiral)),
        ]);
        let mut session = Session::new_game();
        let mut rng = StdRng::seed_from_u64(1);

        let started = resolve_choice(&mut session, &event, "use", &mut rng).unwrap();
        let arc = started.arc.unwrap();
        assert_eq!(arc.stage, "first_exposure");
        assert_eq!(arc.relapse_risk, 10.0);

        let clean = resolve_choice(&mut session, &event, "skip", &mut rng).unwrap();
        assert_eq!(clean.arc.unwrap().weeks_clean, 1);

        let slipped = resolve_choice(&mut session, &event, "slip", &mut rng).unwrap();
        let arc = slipped.arc.unwrap();
        assert_eq!(arc.weeks_clean, 0);
        assert_eq!(arc.stage, "first_exposure");
        assert_eq!(arc.relapse_risk, 25.0);
    }

    #[test]
    fn repeated_risk_detects_an_archetype() {
        let event = event_with(vec![Choice::new("dive", "Stage dive", RiskLevel::Extreme)]);
        let mut session = Session::new_game();
        let mut rng = StdRng::seed_from_u64(1);
        let mut last = None;
        for _ in 0..3 {
            last = resolve_choice(&mut session, &event, "dive", &mut rng)
                .unwrap()
                .archetype;
        }
        assert_eq!(last, Some(Archetype::RiskSeeker));
        assert!(session.narrative.player_archetype.detected);
    }
}
