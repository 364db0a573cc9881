/// Procedural category weights driven by psychological pressure.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::schema::psyche::PsychologicalState;

pub const BASE_WEIGHT: f64 = 0.1;

/// The three dark procedural families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProceduralCategory {
    Substance,
    Corruption,
    Horror,
}

impl ProceduralCategory {
    pub const ALL: [ProceduralCategory; 3] = [
        ProceduralCategory::Substance,
        ProceduralCategory::Corruption,
        ProceduralCategory::Horror,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Substance => "substance",
            Self::Corruption => "corruption",
            Self::Horror => "horror",
        }
    }
}

/// Crisis flags raised by extreme readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightFilters {
    pub mental_breakdown_risk: bool,
    pub addiction_crisis_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventWeights {
    pub substance: f64,
    pub corruption: f64,
    pub horror: f64,
    /// True when some metric pushed a category above its base before normalizing.
    pub pressured: bool,
    pub filters: WeightFilters,
}

impl EventWeights {
    pub fn weight(&self, category: ProceduralCategory) -> f64 {
        match category {
            ProceduralCategory::Substance => self.substance,
            ProceduralCategory::Corruption => self.corruption,
            ProceduralCategory::Horror => self.horror,
        }
    }

    /// Cumulative draw with a single uniform roll.
    pub fn pick(&self, rng: &mut StdRng) -> ProceduralCategory {
        self.pick_where(rng, |_| true)
            .unwrap_or(ProceduralCategory::Horror)
    }

    /// Draw among the categories `allowed` accepts, weights rescaled to their
    /// share. `None` when it accepts none of them.
    pub fn pick_where(
        &self,
        rng: &mut StdRng,
        allowed: impl Fn(ProceduralCategory) -> bool,
    ) -> Option<ProceduralCategory> {
        let open: Vec<ProceduralCategory> = ProceduralCategory::ALL
            .into_iter()
            .filter(|c| allowed(*c))
            .collect();
        let total: f64 = open.iter().map(|c| self.weight(*c)).sum();
        let roll = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for &category in &open {
            cumulative += self.weight(category);
            if roll < cumulative {
                return Some(category);
            }
        }
        // float rounding can leave the sum a hair under the total
        open.last().copied()
    }
}

/// Raw (pre-normalization) weights.
fn raw_weights(psyche: &PsychologicalState) -> (f64, f64, f64, WeightFilters) {
    let stress = psyche.stress_level as f64;
    let addiction = psyche.addiction_risk as f64;
    let moral = psyche.moral_integrity as f64;
    let paranoia = psyche.paranoia as f64;
    let depression = psyche.depression as f64;

    let mut substance = BASE_WEIGHT;
    let mut corruption = BASE_WEIGHT;
    let mut horror = BASE_WEIGHT;
    let mut filters = WeightFilters::default();

    if stress > 60.0 {
        horror += (stress - 60.0) * 0.01;
    }
    if addiction > 40.0 {
        substance += (addiction - 40.0) * 0.015;
    }
    if moral < 60.0 {
        corruption += (60.0 - moral) * 0.01;
    }
    if paranoia > 40.0 {
        horror += (paranoia - 40.0) * 0.01;
    }
    if depression > 50.0 {
        horror += (depression - 50.0) * 0.008;
    }
    if stress > 85.0 {
        horror += 0.2;
        filters.mental_breakdown_risk = true;
    }
    if addiction > 80.0 {
        substance += 0.15;
        filters.addiction_crisis_risk = true;
    }
    (substance, corruption, horror, filters)
}

/// Normalized weights summing to 1.
pub fn calculate_event_weights(psyche: &PsychologicalState) -> EventWeights {
    let (substance, corruption, horror, filters) = raw_weights(psyche);
    let pressured = substance > BASE_WEIGHT || corruption > BASE_WEIGHT || horror > BASE_WEIGHT;
    let total = substance + corruption + horror;
    EventWeights {
        substance: substance / total,
        corruption: corruption / total,
        horror: horror / total,
        pressured,
        filters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sum(w: &EventWeights) -> f64 {
        w.substance + w.corruption + w.horror
    }

    #[test]
    fn calm_state_is_uniform_and_unpressured() {
        let w = calculate_event_weights(&PsychologicalState::default());
        assert!((w.substance - 1.0 / 3.0).abs() < 1e-9);
        assert!((sum(&w) - 1.0).abs() < 1e-9);
        assert!(!w.pressured);
        assert_eq!(w.filters, WeightFilters::default());
    }

    #[test]
    fn crisis_scenario_boosts_horror_and_substance() {
        let psyche = PsychologicalState {
            addiction_risk: 85.0,
            stress_level: 90.0,
            moral_integrity: 40.0,
            paranoia: 30.0,
            depression: 20.0,
            ..Default::default()
        };
        let (substance, corruption, horror, filters) = raw_weights(&psyche);
        assert!(substance > BASE_WEIGHT);
        assert!(horror > BASE_WEIGHT);
        assert!(corruption > BASE_WEIGHT);
        assert!(filters.mental_breakdown_risk);
        assert!(filters.addiction_crisis_risk);

        let w = calculate_event_weights(&psyche);
        assert!(w.pressured);
        assert!(w.substance > w.corruption);
        assert!(w.horror > w.corruption);
        assert!((sum(&w) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_are_exclusive() {
        let psyche = PsychologicalState {
            stress_level: 60.0,
            addiction_risk: 40.0,
            moral_integrity: 60.0,
            paranoia: 40.0,
            depression: 50.0,
            ..Default::default()
        };
        assert!(!calculate_event_weights(&psyche).pressured);
    }

    #[test]
    fn pick_follows_weights() {
        let psyche = PsychologicalState {
            addiction_risk: 100.0,
            ..Default::default()
        };
        let w = calculate_event_weights(&psyche);
        let mut rng = StdRng::seed_from_u64(5);
        let substance = (0..2000)
            .filter(|_| w.pick(&mut rng) == ProceduralCategory::Substance)
            .count();
        // substance weight is 1.15 / 1.35 here
        assert!(substance > 1500, "substance picked {} times", substance);
    }

    #[test]
    fn pick_where_skips_closed_categories() {
        let w = calculate_event_weights(&PsychologicalState::default());
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let picked = w.pick_where(&mut rng, |c| c != ProceduralCategory::Substance);
            assert!(matches!(
                picked,
                Some(ProceduralCategory::Corruption | ProceduralCategory::Horror)
            ));
        }
        assert_eq!(w.pick_where(&mut rng, |_| false), None);
    }
}
