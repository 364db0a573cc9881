/// Psychological state store: bounded additive updates, trauma and coping history.

use tracing::debug;

use crate::schema::psyche::{
    CopingKind, CopingRecord, CrisisType, MetricDeltas, PsychologicalState, Severity,
    SupportNetwork, TraumaRecord,
};

const METRIC_MIN: f32 = 0.0;
const METRIC_MAX: f32 = 100.0;

impl PsychologicalState {
    /// Apply relative deltas. Every touched metric ends up in [0, 100]
    /// regardless of the delta's magnitude.
    pub fn update(&mut self, deltas: &MetricDeltas) {
        for (metric, delta) in deltas.entries() {
            let value = self.metric_mut(metric);
            *value = (*value + delta).clamp(METRIC_MIN, METRIC_MAX);
        }
    }

    /// Record a trauma and immediately apply its fixed per-severity effects.
    pub fn add_trauma(
        &mut self,
        trauma_type: &str,
        description: &str,
        severity: Severity,
        week: u32,
    ) -> &TraumaRecord {
        let effects = severity.effects();
        let id = format!("trauma_{}_{}", week, self.trauma_history.len());
        debug!(trauma_type, ?severity, week, "recording trauma");

        self.trauma_history.push(TraumaRecord {
            id,
            trauma_type: trauma_type.to_string(),
            description: description.to_string(),
            severity,
            week,
            effects,
        });
        self.update(&effects);
        &self.trauma_history[self.trauma_history.len() - 1]
    }

    /// Record a coping mechanism and apply its healthy/unhealthy delta set.
    pub fn add_coping_mechanism(&mut self, mechanism: &str, kind: CopingKind, week: u32) {
        self.coping_mechanisms.push(CopingRecord {
            mechanism: mechanism.to_string(),
            kind,
            week,
        });
        self.update(&kind.effects());
    }

    /// Force an acute crisis: its large effect bundle plus a severe trauma of the same type.
    pub fn trigger_crisis(&mut self, crisis: CrisisType, week: u32) {
        debug!(crisis = crisis.name(), week, "psychological crisis");
        self.update(&crisis.effects());
        self.add_trauma(crisis.name(), crisis.description(), Severity::Severe, week);
    }

    /// Composite fields are replaced, never merged.
    pub fn replace_support_network(&mut self, network: SupportNetwork) {
        self.support_network = network;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::psyche::Metric;

    fn assert_bounded(state: &PsychologicalState) {
        for metric in Metric::ALL {
            let v = state.metric(metric);
            assert!((0.0..=100.0).contains(&v), "{} out of bounds: {}", metric.name(), v);
        }
    }

    #[test]
    fn update_is_relative() {
        let mut state = PsychologicalState::default();
        state.update(&MetricDeltas::new().stress(12.5).paranoia(4.0));
        state.update(&MetricDeltas::new().stress(7.5));
        assert_eq!(state.stress_level, 20.0);
        assert_eq!(state.paranoia, 4.0);
        assert_eq!(state.depression, 0.0);
    }

    #[test]
    fn update_clamps_any_magnitude() {
        let mut state = PsychologicalState::default();
        let huge = [1.0e9, -1.0e9, 250.0, -250.0, 99.9, -0.1];
        for delta in huge {
            for metric in Metric::ALL {
                state.update(&MetricDeltas::new().with(metric, delta));
                assert_bounded(&state);
            }
        }
        state.update(&MetricDeltas::new().morality(500.0));
        assert_eq!(state.moral_integrity, 100.0);
        state.update(&MetricDeltas::new().morality(-500.0));
        assert_eq!(state.moral_integrity, 0.0);
    }

    #[test]
    fn trauma_appends_and_applies_effects() {
        let mut state = PsychologicalState::default();
        let record = state
            .add_trauma("bus_crash", "The tour bus rolled on ice.", Severity::Moderate, 7)
            .clone();
        assert_eq!(record.trauma_type, "bus_crash");
        assert_eq!(record.week, 7);
        assert_eq!(state.trauma_history.len(), 1);
        assert_eq!(state.stress_level, 10.0);
        assert_eq!(state.paranoia, 5.0);
        assert_eq!(state.depression, 8.0);

        state.add_trauma("bus_crash", "Again.", Severity::Minor, 8);
        assert_eq!(state.trauma_history.len(), 2);
        assert_ne!(state.trauma_history[0].id, state.trauma_history[1].id);
    }

    #[test]
    fn healthy_coping_relieves_without_risk() {
        let mut state = PsychologicalState {
            stress_level: 50.0,
            depression: 30.0,
            ..Default::default()
        };
        state.add_coping_mechanism("therapy", CopingKind::Healthy, 2);
        assert_eq!(state.stress_level, 35.0);
        assert_eq!(state.depression, 20.0);
        assert_eq!(state.addiction_risk, 0.0);
        assert_eq!(state.paranoia, 0.0);
    }

    #[test]
    fn unhealthy_coping_trades_relief_for_risk() {
        let mut state = PsychologicalState {
            stress_level: 50.0,
            ..Default::default()
        };
        state.add_coping_mechanism("whiskey", CopingKind::Unhealthy, 2);
        assert_eq!(state.stress_level, 30.0);
        assert_eq!(state.paranoia, 10.0);
        assert_eq!(state.addiction_risk, 5.0);
        assert_eq!(state.coping_mechanisms[0].kind, CopingKind::Unhealthy);
    }

    #[test]
    fn crisis_records_severe_trauma() {
        for crisis in [
            CrisisType::PanicAttack,
            CrisisType::Overdose,
            CrisisType::MoralCollapse,
            CrisisType::PsychoticBreak,
        ] {
            let mut state = PsychologicalState::default();
            state.trigger_crisis(crisis, 9);
            assert_eq!(state.trauma_history.len(), 1);
            let trauma = &state.trauma_history[0];
            assert_eq!(trauma.trauma_type, crisis.name());
            assert_eq!(trauma.severity, Severity::Severe);
            assert_bounded(&state);
            assert!(state.stress_level > 0.0);
        }
    }

    #[test]
    fn support_network_is_replaced() {
        let mut state = PsychologicalState::default();
        state.replace_support_network(SupportNetwork {
            bandmates: 0.8,
            sponsor: Some("Dee".to_string()),
            ..Default::default()
        });
        assert_eq!(state.support_network.sponsor.as_deref(), Some("Dee"));
        state.replace_support_network(SupportNetwork::default());
        assert!(state.support_network.sponsor.is_none());
    }
}
