use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::event::Choice;

/// The five fixed factions of the music world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionId {
    LawEnforcement,
    CriminalUnderground,
    MusicIndustry,
    UndergroundScene,
    MoralGuardians,
}

impl FactionId {
    pub const ALL: [FactionId; 5] = [
        FactionId::LawEnforcement,
        FactionId::CriminalUnderground,
        FactionId::MusicIndustry,
        FactionId::UndergroundScene,
        FactionId::MoralGuardians,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::LawEnforcement => "law_enforcement",
            Self::CriminalUnderground => "criminal_underground",
            Self::MusicIndustry => "music_industry",
            Self::UndergroundScene => "underground_scene",
            Self::MoralGuardians => "moral_guardians",
        }
    }

    pub fn from_name(name: &str) -> Option<FactionId> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// The multi-stage storylines the engine knows how to tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcType {
    AddictionSpiral,
    CorruptionPath,
    ParanoiaDescent,
    LabelWar,
}

impl ArcType {
    pub const ALL: [ArcType; 4] = [
        ArcType::AddictionSpiral,
        ArcType::CorruptionPath,
        ArcType::ParanoiaDescent,
        ArcType::LabelWar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AddictionSpiral => "addiction_spiral",
            Self::CorruptionPath => "corruption_path",
            Self::ParanoiaDescent => "paranoia_descent",
            Self::LabelWar => "label_war",
        }
    }

    pub fn from_name(name: &str) -> Option<ArcType> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }
}

/// A live storyline. `stage` is always one of the stages declared for `arc_type`.
///
/// The escalation counters live here rather than in a parallel tracker, so the
/// stage an event reads is the same stage the escalation operations move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcInstance {
    #[serde(rename = "type")]
    pub arc_type: ArcType,
    pub stage: String,
    pub start_week: u32,
    pub last_progress_week: u32,
    #[serde(default)]
    pub weeks_clean: u32,
    #[serde(default)]
    pub relapse_risk: f32,
    #[serde(default)]
    pub deals_made: u32,
}

/// The six behavioral player profiles.
///
/// Declaration order doubles as the tie-break priority when two archetypes
/// score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    RiskSeeker,
    PeoplePleaser,
    MoralCompass,
    Pragmatist,
    SelfDestructive,
    Survivor,
}

impl Archetype {
    pub const ALL: [Archetype; 6] = [
        Archetype::RiskSeeker,
        Archetype::PeoplePleaser,
        Archetype::MoralCompass,
        Archetype::Pragmatist,
        Archetype::SelfDestructive,
        Archetype::Survivor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RiskSeeker => "risk_seeker",
            Self::PeoplePleaser => "people_pleaser",
            Self::MoralCompass => "moral_compass",
            Self::Pragmatist => "pragmatist",
            Self::SelfDestructive => "self_destructive",
            Self::Survivor => "survivor",
        }
    }

    pub fn from_name(name: &str) -> Option<Archetype> {
        Self::ALL.iter().copied().find(|a| a.name() == name)
    }
}

/// Advisory archetype metadata. Never blocks generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerArchetype {
    pub primary: Option<Archetype>,
    pub secondary: Option<Archetype>,
    pub detected: bool,
    #[serde(default)]
    pub reputation_modifiers: BTreeMap<FactionId, i32>,
}

/// One resolved choice, as fed back into the archetype classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    pub event_id: String,
    pub event_kind: String,
    pub week: u32,
    pub choice: Choice,
}

/// Storyline, faction and archetype state for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeState {
    #[serde(default)]
    pub ongoing_storylines: Vec<ArcInstance>,
    #[serde(default)]
    pub faction_standings: BTreeMap<FactionId, i32>,
    #[serde(default)]
    pub player_archetype: PlayerArchetype,
    #[serde(default)]
    pub choice_history: Vec<ChoiceRecord>,
}

impl Default for NarrativeState {
    fn default() -> Self {
        Self {
            ongoing_storylines: Vec::new(),
            faction_standings: FactionId::ALL.iter().map(|f| (*f, 0)).collect(),
            player_archetype: PlayerArchetype::default(),
            choice_history: Vec::new(),
        }
    }
}

impl NarrativeState {
    pub fn arc(&self, arc_type: ArcType) -> Option<&ArcInstance> {
        self.ongoing_storylines
            .iter()
            .find(|a| a.arc_type == arc_type)
    }

    pub fn arc_mut(&mut self, arc_type: ArcType) -> Option<&mut ArcInstance> {
        self.ongoing_storylines
            .iter_mut()
            .find(|a| a.arc_type == arc_type)
    }

    /// Standing with `faction`; factions never met count as neutral ground (0).
    pub fn standing(&self, faction: FactionId) -> i32 {
        self.faction_standings.get(&faction).copied().unwrap_or(0)
    }
}
