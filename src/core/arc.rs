/// Narrative arc registry and the single authoritative stage machine per arc instance.

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::schema::game::GameSnapshot;
use crate::schema::narrative::{ArcInstance, ArcType, NarrativeState};
use crate::schema::psyche::{Metric, PsychologicalState};

#[derive(Debug, Error, PartialEq)]
pub enum ArcError {
    #[error("stage '{stage}' is not declared for arc '{arc}'")]
    UnknownStage { arc: &'static str, stage: String },
    #[error("arc '{arc}' cannot move back from '{from}' to '{to}'")]
    Regression {
        arc: &'static str,
        from: String,
        to: String,
    },
}

/// Where a trigger condition reads its value from.
#[derive(Debug, Clone, Copy)]
pub enum ConditionSource {
    Psyche(Metric),
    /// A numeric game snapshot field, looked up by name.
    Game(&'static str),
}

/// One `{field: {min?, max?}}` range condition. Bounds are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct TriggerCondition {
    pub source: ConditionSource,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl TriggerCondition {
    /// A field the condition cannot resolve never satisfies it.
    pub fn holds(&self, game: &GameSnapshot, psyche: &PsychologicalState) -> bool {
        let value = match self.source {
            ConditionSource::Psyche(metric) => Some(psyche.metric(metric) as f64),
            ConditionSource::Game(field) => game.field(field),
        };
        let Some(value) = value else {
            return false;
        };
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArcStage {
    pub name: &'static str,
    /// Candidate event ids for this beat.
    pub events: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct ArcDefinition {
    pub arc_type: ArcType,
    pub stages: &'static [ArcStage],
    pub trigger: &'static [TriggerCondition],
    pub start_probability: f64,
}

impl ArcDefinition {
    pub fn first_stage(&self) -> &'static str {
        self.stages[0].name
    }

    pub fn stage_index(&self, stage: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == stage)
    }
}

const fn at_least(source: ConditionSource, min: f64) -> TriggerCondition {
    TriggerCondition {
        source,
        min: Some(min),
        max: None,
    }
}

const fn at_most(source: ConditionSource, max: f64) -> TriggerCondition {
    TriggerCondition {
        source,
        min: None,
        max: Some(max),
    }
}

pub static ARCS: [ArcDefinition; 4] = [
    ArcDefinition {
        arc_type: ArcType::AddictionSpiral,
        stages: &[
            ArcStage {
                name: "first_exposure",
                events: &["backstage_first_line", "after_party_offer"],
            },
            ArcStage {
                name: "regular_use",
                events: &["pre_show_ritual", "tour_supply_run"],
            },
            ArcStage {
                name: "dependency_development",
                events: &["withdrawal_soundcheck", "bandmate_notices"],
            },
            ArcStage {
                name: "rock_bottom",
                events: &["overdose_scare", "missed_show"],
            },
            ArcStage {
                name: "intervention_or_death",
                events: &["band_intervention"],
            },
            ArcStage {
                name: "recovery_attempt",
                events: &["rehab_decision", "sober_tour"],
            },
            ArcStage {
                name: "relapse_or_sobriety",
                events: &["relapse_temptation", "sobriety_milestone"],
            },
        ],
        trigger: &[
            at_least(ConditionSource::Psyche(Metric::AddictionRisk), 30.0),
            at_least(ConditionSource::Psyche(Metric::StressLevel), 40.0),
        ],
        start_probability: 0.3,
    },
    ArcDefinition {
        arc_type: ArcType::CorruptionPath,
        stages: &[
            ArcStage {
                name: "first_compromise",
                events: &["payola_offer", "fixed_battle_of_bands"],
            },
            ArcStage {
                name: "rationalization",
                events: &["ghostwriter_credit"],
            },
            ArcStage {
                name: "deeper_involvement",
                events: &["money_laundering_gig", "blackmail_material"],
            },
            ArcStage {
                name: "point_of_no_return",
                events: &["silence_the_witness"],
            },
            ArcStage {
                name: "exposure_risk",
                events: &["journalist_digging"],
            },
            ArcStage {
                name: "reckoning",
                events: &["federal_subpoena"],
            },
        ],
        trigger: &[
            at_most(ConditionSource::Psyche(Metric::MoralIntegrity), 70.0),
            at_least(ConditionSource::Game("fame"), 20.0),
        ],
        start_probability: 0.25,
    },
    ArcDefinition {
        arc_type: ArcType::ParanoiaDescent,
        stages: &[
            ArcStage {
                name: "unease",
                events: &["hidden_track_whispers"],
            },
            ArcStage {
                name: "surveillance_suspicion",
                events: &["van_followed"],
            },
            ArcStage {
                name: "isolation",
                events: &["locked_green_room"],
            },
            ArcStage {
                name: "breakdown",
                events: &["onstage_hallucination"],
            },
            ArcStage {
                name: "confrontation_with_self",
                events: &["mirror_session"],
            },
        ],
        trigger: &[
            at_least(ConditionSource::Psyche(Metric::Paranoia), 40.0),
            at_least(ConditionSource::Psyche(Metric::StressLevel), 50.0),
        ],
        start_probability: 0.2,
    },
    ArcDefinition {
        arc_type: ArcType::LabelWar,
        stages: &[
            ArcStage {
                name: "courtship",
                events: &["label_showcase"],
            },
            ArcStage {
                name: "contract_pressure",
                events: &["predatory_contract"],
            },
            ArcStage {
                name: "creative_control_battle",
                events: &["producer_overreach"],
            },
            ArcStage {
                name: "public_feud",
                events: &["social_media_feud"],
            },
            ArcStage {
                name: "resolution",
                events: &["contract_buyout"],
            },
        ],
        trigger: &[
            at_least(ConditionSource::Game("fame"), 40.0),
            at_least(ConditionSource::Game("week"), 8.0),
        ],
        start_probability: 0.2,
    },
];

pub fn arc_definition(arc: ArcType) -> &'static ArcDefinition {
    match arc {
        ArcType::AddictionSpiral => &ARCS[0],
        ArcType::CorruptionPath => &ARCS[1],
        ArcType::ParanoiaDescent => &ARCS[2],
        ArcType::LabelWar => &ARCS[3],
    }
}

/// Trigger conditions are ANDed; when they all hold the start is still only a roll.
pub fn should_start_arc(
    arc: ArcType,
    game: &GameSnapshot,
    psyche: &PsychologicalState,
    rng: &mut StdRng,
) -> bool {
    let def = arc_definition(arc);
    if !def.trigger.iter().all(|c| c.holds(game, psyche)) {
        return false;
    }
    rng.gen_bool(def.start_probability)
}

pub fn current_stage(narrative: &NarrativeState, arc: ArcType) -> Option<&str> {
    narrative.arc(arc).map(|a| a.stage.as_str())
}

/// Candidate event ids for a stage. Undeclared stages have none.
pub fn stage_events(arc: ArcType, stage: &str) -> &'static [&'static str] {
    arc_definition(arc)
        .stages
        .iter()
        .find(|s| s.name == stage)
        .map(|s| s.events)
        .unwrap_or(&[])
}

pub fn next_stage(arc: ArcType, stage: &str) -> Option<&'static str> {
    let def = arc_definition(arc);
    let index = def.stage_index(stage)?;
    def.stages.get(index + 1).map(|s| s.name)
}

/// Upsert the arc instance at `new_stage`.
///
/// New instances start at `week`. Existing ones may stay put or move forward
/// any number of stages, never back.
pub fn progress_arc<'a>(
    narrative: &'a mut NarrativeState,
    arc: ArcType,
    new_stage: &str,
    week: u32,
) -> Result<&'a ArcInstance, ArcError> {
    let index = upsert_stage(narrative, arc, new_stage, week)?;
    Ok(&narrative.ongoing_storylines[index])
}

fn upsert_stage(
    narrative: &mut NarrativeState,
    arc: ArcType,
    new_stage: &str,
    week: u32,
) -> Result<usize, ArcError> {
    let def = arc_definition(arc);
    let target = def.stage_index(new_stage).ok_or_else(|| ArcError::UnknownStage {
        arc: arc.name(),
        stage: new_stage.to_string(),
    })?;

    let Some(index) = narrative.ongoing_storylines.iter().position(|a| a.arc_type == arc) else {
        info!(arc = arc.name(), stage = new_stage, week, "arc started");
        narrative.ongoing_storylines.push(ArcInstance {
            arc_type: arc,
            stage: new_stage.to_string(),
            start_week: week,
            last_progress_week: week,
            weeks_clean: 0,
            relapse_risk: 0.0,
            deals_made: 0,
        });
        return Ok(narrative.ongoing_storylines.len() - 1);
    };

    let instance = &mut narrative.ongoing_storylines[index];
    let current = def.stage_index(&instance.stage).unwrap_or(0);
    if target < current {
        return Err(ArcError::Regression {
            arc: arc.name(),
            from: instance.stage.clone(),
            to: new_stage.to_string(),
        });
    }
    if instance.stage != new_stage {
        info!(arc = arc.name(), from = %instance.stage, to = new_stage, week, "arc progressed");
    }
    instance.stage = new_stage.to_string();
    instance.last_progress_week = week;
    Ok(index)
}

/// Start the arc if absent, otherwise move it one stage on. The last stage is sticky.
fn escalate(
    narrative: &mut NarrativeState,
    arc: ArcType,
    week: u32,
) -> Result<&mut ArcInstance, ArcError> {
    let def = arc_definition(arc);
    let target = current_stage(narrative, arc)
        .and_then(|stage| def.stage_index(stage))
        .map(|i| def.stages[(i + 1).min(def.stages.len() - 1)].name)
        .unwrap_or_else(|| def.first_stage());
    let index = upsert_stage(narrative, arc, target, week)?;
    Ok(&mut narrative.ongoing_storylines[index])
}

/// Push the addiction arc one stage deeper. Using again wipes the clean streak
/// and makes the next relapse more likely.
pub fn escalate_addiction(
    narrative: &mut NarrativeState,
    week: u32,
) -> Result<&ArcInstance, ArcError> {
    let instance = escalate(narrative, ArcType::AddictionSpiral, week)?;
    instance.weeks_clean = 0;
    instance.relapse_risk = (instance.relapse_risk + 10.0).min(100.0);
    debug!(stage = %instance.stage, relapse_risk = instance.relapse_risk, "addiction escalated");
    Ok(&*instance)
}

/// Push the corruption arc one stage deeper and count the deal that did it.
pub fn escalate_corruption(
    narrative: &mut NarrativeState,
    week: u32,
) -> Result<&ArcInstance, ArcError> {
    let instance = escalate(narrative, ArcType::CorruptionPath, week)?;
    instance.deals_made += 1;
    debug!(stage = %instance.stage, deals_made = instance.deals_made, "corruption escalated");
    Ok(&*instance)
}

/// Escalate any arc, advancing the counters the arc carries.
pub fn escalate_arc(
    narrative: &mut NarrativeState,
    arc: ArcType,
    week: u32,
) -> Result<&ArcInstance, ArcError> {
    match arc {
        ArcType::AddictionSpiral => escalate_addiction(narrative, week),
        ArcType::CorruptionPath => escalate_corruption(narrative, week),
        _ => escalate(narrative, arc, week).map(|instance| &*instance),
    }
}

/// Returns the new clean-week count, or `None` when the arc is not active.
pub fn record_clean_week(narrative: &mut NarrativeState, arc: ArcType) -> Option<u32> {
    let instance = narrative.arc_mut(arc)?;
    instance.weeks_clean += 1;
    instance.relapse_risk = (instance.relapse_risk - 5.0).max(0.0);
    Some(instance.weeks_clean)
}

/// Resets the counter, not the stage.
pub fn relapse(narrative: &mut NarrativeState, arc: ArcType, week: u32) -> Option<&ArcInstance> {
    let instance = narrative.arc_mut(arc)?;
    debug!(arc = arc.name(), weeks_clean = instance.weeks_clean, week, "relapse");
    instance.weeks_clean = 0;
    instance.relapse_risk = (instance.relapse_risk + 20.0).min(100.0);
    instance.last_progress_week = week;
    Some(instance)
}

/// Roll every inactive arc's trigger and start the ones that fire. Returns the started arcs.
pub fn check_arc_triggers(
    narrative: &mut NarrativeState,
    game: &GameSnapshot,
    psyche: &PsychologicalState,
    rng: &mut StdRng,
) -> Vec<ArcType> {
    let mut started = Vec::new();
    for def in &ARCS {
        if narrative.arc(def.arc_type).is_some() {
            continue;
        }
        if should_start_arc(def.arc_type, game, psyche, rng)
            && progress_arc(narrative, def.arc_type, def.first_stage(), game.week).is_ok()
        {
            started.push(def.arc_type);
        }
    }
    started
}
