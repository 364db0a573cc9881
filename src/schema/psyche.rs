use serde::{Deserialize, Serialize};

/// The five bounded psychological metrics tracked per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    StressLevel,
    AddictionRisk,
    MoralIntegrity,
    Paranoia,
    Depression,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::StressLevel,
        Metric::AddictionRisk,
        Metric::MoralIntegrity,
        Metric::Paranoia,
        Metric::Depression,
    ];

    /// Returns the persisted field name (e.g., "stress_level").
    pub fn name(&self) -> &'static str {
        match self {
            Self::StressLevel => "stress_level",
            Self::AddictionRisk => "addiction_risk",
            Self::MoralIntegrity => "moral_integrity",
            Self::Paranoia => "paranoia",
            Self::Depression => "depression",
        }
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        Self::ALL.iter().copied().find(|m| m.name() == name)
    }
}

/// A partial set of relative metric changes. Absent metrics are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricDeltas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addiction_risk: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moral_integrity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paranoia: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depression: Option<f32>,
}

impl MetricDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stress(self, delta: f32) -> Self {
        self.with(Metric::StressLevel, delta)
    }

    pub fn addiction(self, delta: f32) -> Self {
        self.with(Metric::AddictionRisk, delta)
    }

    pub fn morality(self, delta: f32) -> Self {
        self.with(Metric::MoralIntegrity, delta)
    }

    pub fn paranoia(self, delta: f32) -> Self {
        self.with(Metric::Paranoia, delta)
    }

    pub fn depression(self, delta: f32) -> Self {
        self.with(Metric::Depression, delta)
    }

    /// Set the delta for `metric`, replacing any previous value.
    pub fn with(mut self, metric: Metric, delta: f32) -> Self {
        *self.slot_mut(metric) = Some(delta);
        self
    }

    pub fn get(&self, metric: Metric) -> Option<f32> {
        match metric {
            Metric::StressLevel => self.stress_level,
            Metric::AddictionRisk => self.addiction_risk,
            Metric::MoralIntegrity => self.moral_integrity,
            Metric::Paranoia => self.paranoia,
            Metric::Depression => self.depression,
        }
    }

    /// Add `delta` on top of whatever is already recorded for `metric`.
    pub fn accumulate(&mut self, metric: Metric, delta: f32) {
        let slot = self.slot_mut(metric);
        *slot = Some(slot.unwrap_or(0.0) + delta);
    }

    /// Present entries in metric declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (Metric, f32)> + '_ {
        Metric::ALL
            .iter()
            .filter_map(move |m| self.get(*m).map(|d| (*m, d)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut Option<f32> {
        match metric {
            Metric::StressLevel => &mut self.stress_level,
            Metric::AddictionRisk => &mut self.addiction_risk,
            Metric::MoralIntegrity => &mut self.moral_integrity,
            Metric::Paranoia => &mut self.paranoia,
            Metric::Depression => &mut self.depression,
        }
    }
}

/// How badly a traumatic experience lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
    Critical,
}

impl Severity {
    /// Fixed effect bundle applied when a trauma of this severity is recorded.
    pub fn effects(&self) -> MetricDeltas {
        let (stress, paranoia, depression) = match self {
            Self::Minor => (5.0, 2.0, 3.0),
            Self::Moderate => (10.0, 5.0, 8.0),
            Self::Severe => (20.0, 10.0, 15.0),
            Self::Critical => (35.0, 20.0, 25.0),
        };
        MetricDeltas::new()
            .stress(stress)
            .paranoia(paranoia)
            .depression(depression)
    }
}

/// An immutable entry in the trauma history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraumaRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub trauma_type: String,
    pub description: String,
    pub severity: Severity,
    pub week: u32,
    pub effects: MetricDeltas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopingKind {
    Healthy,
    Unhealthy,
}

impl CopingKind {
    /// Unhealthy coping buys more short-term relief at the cost of long-term risk.
    pub fn effects(&self) -> MetricDeltas {
        match self {
            Self::Healthy => MetricDeltas::new().stress(-15.0).depression(-10.0),
            Self::Unhealthy => MetricDeltas::new()
                .stress(-20.0)
                .paranoia(10.0)
                .addiction(5.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopingRecord {
    pub mechanism: String,
    #[serde(rename = "type")]
    pub kind: CopingKind,
    pub week: u32,
}

/// The four acute crises the engine can force onto a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisType {
    PanicAttack,
    Overdose,
    MoralCollapse,
    PsychoticBreak,
}

impl CrisisType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PanicAttack => "panic_attack",
            Self::Overdose => "overdose",
            Self::MoralCollapse => "moral_collapse",
            Self::PsychoticBreak => "psychotic_break",
        }
    }

    pub fn effects(&self) -> MetricDeltas {
        match self {
            Self::PanicAttack => MetricDeltas::new()
                .stress(30.0)
                .paranoia(15.0)
                .depression(5.0),
            Self::Overdose => MetricDeltas::new()
                .stress(25.0)
                .addiction(20.0)
                .depression(20.0)
                .paranoia(5.0),
            Self::MoralCollapse => MetricDeltas::new()
                .morality(-30.0)
                .depression(20.0)
                .stress(15.0),
            Self::PsychoticBreak => MetricDeltas::new()
                .paranoia(40.0)
                .stress(25.0)
                .depression(15.0),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PanicAttack => {
                "A crushing panic attack left you unable to breathe, let alone play."
            }
            Self::Overdose => "You woke up in an ambulance with no memory of the after-party.",
            Self::MoralCollapse => {
                "You looked at what you'd done and no longer recognized yourself."
            }
            Self::PsychoticBreak => {
                "The walls started whispering back, and for a while you believed them."
            }
        }
    }
}

/// People the band can lean on. Carried through saves; the engine never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportNetwork {
    #[serde(default)]
    pub family: f32,
    #[serde(default)]
    pub friends: f32,
    #[serde(default)]
    pub bandmates: f32,
    #[serde(default)]
    pub professional_help: bool,
    #[serde(default)]
    pub sponsor: Option<String>,
}

/// Bounded psychological model for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsychologicalState {
    pub stress_level: f32,
    pub addiction_risk: f32,
    pub moral_integrity: f32,
    pub paranoia: f32,
    pub depression: f32,
    #[serde(default)]
    pub trauma_history: Vec<TraumaRecord>,
    #[serde(default)]
    pub coping_mechanisms: Vec<CopingRecord>,
    #[serde(default)]
    pub support_network: SupportNetwork,
}

impl Default for PsychologicalState {
    fn default() -> Self {
        Self {
            stress_level: 0.0,
            addiction_risk: 0.0,
            moral_integrity: 100.0,
            paranoia: 0.0,
            depression: 0.0,
            trauma_history: Vec::new(),
            coping_mechanisms: Vec::new(),
            support_network: SupportNetwork::default(),
        }
    }
}

impl PsychologicalState {
    pub fn metric(&self, metric: Metric) -> f32 {
        match metric {
            Metric::StressLevel => self.stress_level,
            Metric::AddictionRisk => self.addiction_risk,
            Metric::MoralIntegrity => self.moral_integrity,
            Metric::Paranoia => self.paranoia,
            Metric::Depression => self.depression,
        }
    }

    pub(crate) fn metric_mut(&mut self, metric: Metric) -> &mut f32 {
        match metric {
            Metric::StressLevel => &mut self.stress_level,
            Metric::AddictionRisk => &mut self.addiction_risk,
            Metric::MoralIntegrity => &mut self.moral_integrity,
            Metric::Paranoia => &mut self.paranoia,
            Metric::Depression => &mut self.depression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_starts_clean() {
        let state = PsychologicalState::default();
        assert_eq!(state.moral_integrity, 100.0);
        assert_eq!(state.stress_level, 0.0);
        assert!(state.trauma_history.is_empty());
    }

    #[test]
    fn metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_name(metric.name()), Some(metric));
        }
        assert_eq!(Metric::from_name("charisma"), None);
    }

    #[test]
    fn deltas_accumulate_and_iterate_in_order() {
        let mut deltas = MetricDeltas::new().paranoia(5.0).stress(2.0);
        deltas.accumulate(Metric::StressLevel, 3.0);
        deltas.accumulate(Metric::Depression, -1.0);

        let entries: Vec<(Metric, f32)> = deltas.entries().collect();
        assert_eq!(
            entries,
            vec![
                (Metric::StressLevel, 5.0),
                (Metric::Paranoia, 5.0),
                (Metric::Depression, -1.0),
            ]
        );
    }

    #[test]
    fn severity_effects_grow_with_severity() {
        let order = [
            Severity::Minor,
            Severity::Moderate,
            Severity::Severe,
            Severity::Critical,
        ];
        for pair in order.windows(2) {
            let lower = pair[0].effects();
            let higher = pair[1].effects();
            for metric in [Metric::StressLevel, Metric::Paranoia, Metric::Depression] {
                assert!(higher.get(metric) > lower.get(metric));
            }
        }
    }

    #[test]
    fn persisted_shape_uses_type_key() {
        let record = CopingRecord {
            mechanism: "journaling".to_string(),
            kind: CopingKind::Healthy,
            week: 3,
        };
        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.contains("\"type\":\"healthy\""));
        let back: CopingRecord = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, record);
    }
}
