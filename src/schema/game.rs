use serde::{Deserialize, Serialize};

use super::narrative::NarrativeState;
use super::psyche::PsychologicalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    DiveBar,
    Club,
    Underground,
    Theater,
    Arena,
    Festival,
}

impl VenueKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DiveBar => "dive_bar",
            Self::Club => "club",
            Self::Underground => "underground",
            Self::Theater => "theater",
            Self::Arena => "arena",
            Self::Festival => "festival",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub kind: VenueKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDeal {
    #[default]
    None,
    Courted,
    Signed,
}

/// The slice of game state the engine reads. Owned by the game layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub week: u32,
    pub money: i64,
    pub fame: i32,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub label_deal: LabelDeal,
    /// Scenario flag for the darker campaign; raises the weekly event chance.
    #[serde(default)]
    pub dark_scenario: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            week: 1,
            money: 500,
            fame: 0,
            venue: None,
            label_deal: LabelDeal::None,
            dark_scenario: false,
        }
    }
}

impl GameSnapshot {
    /// Numeric snapshot field by name, for arc trigger conditions.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "week" => Some(self.week as f64),
            "money" => Some(self.money as f64),
            "fame" => Some(self.fame as f64),
            _ => None,
        }
    }
}

/// Call-site context for a generation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// The request comes straight after a gig at the snapshot's venue.
    #[serde(default)]
    pub post_gig: bool,
}

impl GenerationContext {
    pub fn post_gig() -> Self {
        Self { post_gig: true }
    }
}

/// What the caller asks for: any event, or a specific catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventRequest {
    #[default]
    Random,
    Named(String),
}

/// Everything one play session owns. Sessions never share stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub game: GameSnapshot,
    pub psyche: PsychologicalState,
    pub narrative: NarrativeState,
}

impl Session {
    /// A fresh session with the fixed new-game defaults.
    pub fn new_game() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_fields_by_name() {
        let game = GameSnapshot {
            week: 12,
            money: -40,
            fame: 55,
            ..Default::default()
        };
        assert_eq!(game.field("week"), Some(12.0));
        assert_eq!(game.field("money"), Some(-40.0));
        assert_eq!(game.field("fame"), Some(55.0));
        assert_eq!(game.field("groupies"), None);
    }

    #[test]
    fn new_game_defaults() {
        let session = Session::new_game();
        assert_eq!(session.game.week, 1);
        assert_eq!(session.game.label_deal, LabelDeal::None);
        assert_eq!(session.psyche.moral_integrity, 100.0);
        assert_eq!(session.narrative.faction_standings.len(), 5);
    }

    #[test]
    fn default_request_is_random() {
        assert_eq!(EventRequest::default(), EventRequest::Random);
        assert!(!GenerationContext::default().post_gig);
        assert!(GenerationContext::post_gig().post_gig);
    }
}
