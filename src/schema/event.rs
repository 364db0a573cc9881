use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::narrative::{ArcType, FactionId};
use super::psyche::{MetricDeltas, Severity};

/// How dangerous a choice (or a whole event) is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High | Self::Extreme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    Teen,
    Mature,
}

/// Thematic bucket an event falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    General,
    Industry,
    SubstanceAbuse,
    Corruption,
    Criminal,
    Violence,
    Sexual,
    PsychologicalHorror,
    MentalHealth,
}

impl EventCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Industry => "industry",
            Self::SubstanceAbuse => "substance_abuse",
            Self::Corruption => "corruption",
            Self::Criminal => "criminal",
            Self::Violence => "violence",
            Self::Sexual => "sexual",
            Self::PsychologicalHorror => "psychological_horror",
            Self::MentalHealth => "mental_health",
        }
    }

    /// The two psychological-theme categories.
    pub fn is_psychological(&self) -> bool {
        matches!(self, Self::PsychologicalHorror | Self::MentalHealth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentWarning {
    DrugUse,
    AlcoholAbuse,
    Addiction,
    Overdose,
    Violence,
    CriminalActivity,
    SexualContent,
    SelfHarm,
    MentalHealth,
    StrongLanguage,
}

/// Psychological pressure points a choice touches, filled in by enhancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsychTrigger {
    StressSpike,
    AddictionPull,
    MoralCompromise,
    ParanoiaSpike,
    DepressiveSpiral,
    TraumaExposure,
}

/// Resource changes applied the moment a choice is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImmediateEffects {
    #[serde(default)]
    pub money: i64,
    #[serde(default)]
    pub fame: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub band_morale: i32,
}

/// Slow-burn consequences. Consumed by the game layer, not the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTermEffects {
    #[serde(default)]
    pub reputation: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Metric deltas plus per-faction reputation hits attached to a choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychEffects {
    #[serde(default)]
    pub metrics: MetricDeltas,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub faction_reputation: BTreeMap<FactionId, i32>,
}

/// A possible trauma, rolled only when the choice is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraumaRisk {
    #[serde(rename = "type")]
    pub trauma_type: String,
    pub probability: f64,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRequirement {
    pub faction: FactionId,
    pub min_standing: i32,
}

/// An arc step a choice pushes when resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcProgression {
    /// Start the arc at its first stage, or move it one stage forward.
    Escalate(ArcType),
    /// Reset the clean-week counter and raise relapse risk.
    Relapse(ArcType),
    CleanWeek(ArcType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immediate_effects: Option<ImmediateEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_effects: Option<LongTermEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychological_effects: Option<PsychEffects>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trauma_risk: Option<TraumaRisk>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub faction_effects: BTreeMap<FactionId, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_faction_standing: Option<FactionRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progression: Option<ArcProgression>,
    /// Cosmetic weighting from archetype adaptation. Never a filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appeal_boost: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<PsychTrigger>,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            risk_level,
            immediate_effects: None,
            long_term_effects: None,
            psychological_effects: None,
            trauma_risk: None,
            faction_effects: BTreeMap::new(),
            required_faction_standing: None,
            progression: None,
            appeal_boost: None,
            triggers: Vec::new(),
        }
    }

    pub fn psyche(mut self, deltas: MetricDeltas) -> Self {
        self.psych_effects_mut().metrics = deltas;
        self
    }

    pub fn money(mut self, amount: i64) -> Self {
        self.immediate_effects.get_or_insert_with(Default::default).money = amount;
        self
    }

    pub fn fame(mut self, amount: i32) -> Self {
        self.immediate_effects.get_or_insert_with(Default::default).fame = amount;
        self
    }

    pub fn health(mut self, amount: i32) -> Self {
        self.immediate_effects.get_or_insert_with(Default::default).health = amount;
        self
    }

    pub fn morale(mut self, amount: i32) -> Self {
        self.immediate_effects.get_or_insert_with(Default::default).band_morale = amount;
        self
    }

    pub fn long_term(mut self, reputation: i32, health: i32, note: &str) -> Self {
        self.long_term_effects = Some(LongTermEffects {
            reputation,
            health,
            note: Some(note.to_string()),
        });
        self
    }

    pub fn trauma(
        mut self,
        trauma_type: &str,
        probability: f64,
        severity: Severity,
        description: &str,
    ) -> Self {
        self.trauma_risk = Some(TraumaRisk {
            trauma_type: trauma_type.to_string(),
            probability,
            severity,
            description: description.to_string(),
        });
        self
    }

    pub fn faction(mut self, faction: FactionId, delta: i32) -> Self {
        self.faction_effects.insert(faction, delta);
        self
    }

    pub fn requires(mut self, faction: FactionId, min_standing: i32) -> Self {
        self.required_faction_standing = Some(FactionRequirement {
            faction,
            min_standing,
        });
        self
    }

    pub fn progresses(mut self, progression: ArcProgression) -> Self {
        self.progression = Some(progression);
        self
    }

    /// Psychological effects, created empty on first access.
    pub fn psych_effects_mut(&mut self) -> &mut PsychEffects {
        self.psychological_effects.get_or_insert_with(Default::default)
    }

    pub fn metric_delta(&self, metric: super::psyche::Metric) -> Option<f32> {
        self.psychological_effects
            .as_ref()
            .and_then(|e| e.metrics.get(metric))
    }
}

/// The named figure an event centers on, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub role: String,
}

impl Character {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
        }
    }
}

/// Marks an event as a beat of an ongoing storyline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcTag {
    pub arc_id: ArcType,
    pub arc_stage: String,
}

/// A generator's raw output. Classification fields are optional author
/// overrides; enhancement fills in whatever is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub kind: String,
    pub title: String,
    pub description: String,
    pub character: Option<Character>,
    pub choices: Vec<Choice>,
    pub category: Option<EventCategory>,
    pub maturity: Option<MaturityLevel>,
    pub content_warnings: Option<Vec<ContentWarning>>,
    pub risk: Option<RiskLevel>,
    pub arc: Option<ArcTag>,
}

impl DraftEvent {
    pub fn new(kind: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            title: title.into(),
            description: description.into(),
            character: None,
            choices: Vec::new(),
            category: None,
            maturity: None,
            content_warnings: None,
            risk: None,
            arc: None,
        }
    }

    pub fn category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn maturity(mut self, maturity: MaturityLevel) -> Self {
        self.maturity = Some(maturity);
        self
    }

    pub fn warnings(mut self, warnings: &[ContentWarning]) -> Self {
        self.content_warnings = Some(warnings.to_vec());
        self
    }

    pub fn risk(mut self, risk: RiskLevel) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn character(mut self, name: &str, role: &str) -> Self {
        self.character = Some(Character::new(name, role));
        self
    }

    pub fn choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn has_choice(&self, id: &str) -> bool {
        self.choices.iter().any(|c| c.id == id)
    }

    /// Title, description and every choice text, lowercased and space-joined.
    pub fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for choice in &self.choices {
            text.push(' ');
            text.push_str(&choice.text);
        }
        text.to_lowercase()
    }
}

/// A fully classified event, ready for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub kind: String,
    pub category: EventCategory,
    pub maturity: MaturityLevel,
    pub risk: RiskLevel,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Character>,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub content_warnings: Vec<ContentWarning>,
    #[serde(default)]
    pub psychological_triggers: Vec<PsychTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc: Option<ArcTag>,
}

impl Event {
    pub fn choice(&self, id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::psyche::Metric;

    #[test]
    fn choice_builder_sets_effects() {
        let choice = Choice::new("take_it", "Take the envelope", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-10.0))
            .money(500)
            .fame(2)
            .faction(FactionId::CriminalUnderground, 5)
            .requires(FactionId::CriminalUnderground, 20);

        assert_eq!(choice.metric_delta(Metric::MoralIntegrity), Some(-10.0));
        assert_eq!(choice.immediate_effects.unwrap().money, 500);
        assert_eq!(choice.immediate_effects.unwrap().fame, 2);
        assert_eq!(choice.faction_effects[&FactionId::CriminalUnderground], 5);
        assert_eq!(
            choice.required_faction_standing.unwrap().min_standing,
            20
        );
    }

    #[test]
    fn risk_ordering() {
        assert!(RiskLevel::Extreme > RiskLevel::Low);
        assert!(RiskLevel::Extreme.is_high());
        assert!(!RiskLevel::Medium.is_high());
    }

    #[test]
    fn psychological_categories() {
        assert!(EventCategory::PsychologicalHorror.is_psychological());
        assert!(EventCategory::MentalHealth.is_psychological());
        assert!(!EventCategory::SubstanceAbuse.is_psychological());
    }

    #[test]
    fn searchable_text_covers_choices() {
        let draft = DraftEvent::new("test", "Backstage", "A stranger waits.")
            .choice(Choice::new("a", "Ask for an AUTOGRAPH", RiskLevel::Low));
        let text = draft.searchable_text();
        assert!(text.contains("backstage"));
        assert!(text.contains("autograph"));
        assert!(draft.has_choice("a"));
        assert!(!draft.has_choice("b"));
    }

    #[test]
    fn psych_effects_json_shape() {
        let mut effects = PsychEffects {
            metrics: MetricDeltas::new().stress(5.0),
            faction_reputation: BTreeMap::new(),
        };
        effects.faction_reputation.insert(FactionId::LawEnforcement, -10);
        let json = serde_json::to_value(&effects).unwrap();
        assert_eq!(json["metrics"]["stress_level"], 5.0);
        assert_eq!(json["faction_reputation"]["law_enforcement"], -10);
    }
}
