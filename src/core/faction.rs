/// Faction reputation: standing buckets, choice gating, and event modification.
///
/// Factions carry no central permission table. Their behavior is data: keyword
/// lists matched against event text and standing thresholds checked per choice.

use std::collections::BTreeMap;
use tracing::debug;

use crate::schema::event::{Choice, DraftEvent, RiskLevel};
use crate::schema::game::GameSnapshot;
use crate::schema::narrative::FactionId;
use crate::schema::psyche::MetricDeltas;

pub const STANDING_MIN: i32 = -100;
pub const STANDING_MAX: i32 = 100;

/// Reputation hit injected into every choice of an event a faction hates.
pub const HATED_EVENT_PENALTY: i32 = -10;

/// Coarse relationship bucket derived from a standing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FactionStatus {
    Enemy,
    Wary,
    Neutral,
    Friendly,
    Ally,
}

impl FactionStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enemy => "enemy",
            Self::Wary => "wary",
            Self::Neutral => "neutral",
            Self::Friendly => "friendly",
            Self::Ally => "ally",
        }
    }
}

/// A choice a faction offers to bands it considers allies.
#[derive(Debug, Clone, Copy)]
pub struct FactionBoon {
    pub id: &'static str,
    pub text: &'static str,
    pub money: i64,
}

/// A complication a hostile faction forces into events once standing sinks
/// to `threshold` or below.
#[derive(Debug, Clone, Copy)]
pub struct FactionComplication {
    pub id: &'static str,
    pub text: &'static str,
    pub threshold: i32,
    /// Share of the band's cash the complication costs, in percent.
    pub money_share: i64,
}

/// An event a faction sends the band's way. `topic` fills the encounter
/// template when the catalog has no builder for `kind`.
#[derive(Debug, Clone, Copy)]
pub struct FactionEncounter {
    pub kind: &'static str,
    pub topic: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct FactionDefinition {
    pub id: FactionId,
    pub display_name: &'static str,
    pub values: &'static [&'static str],
    pub hates: &'static [&'static str],
    pub events_generated: &'static [FactionEncounter],
    pub beneficial_choices: &'static [FactionBoon],
    pub hostile_complications: &'static [FactionComplication],
}

pub static FACTIONS: [FactionDefinition; 5] = [
    FactionDefinition {
        id: FactionId::LawEnforcement,
        display_name: "the local police",
        values: &["order", "sobriety", "cooperation"],
        hates: &["drug_dealing", "smuggling", "bribery", "illegal", "riot", "assault"],
        events_generated: &[
            FactionEncounter {
                kind: "traffic_stop",
                topic: "the taillight they pulled the van over for",
            },
            FactionEncounter {
                kind: "noise_complaint",
                topic: "the noise complaints from your rehearsal space",
            },
        ],
        beneficial_choices: &[
            FactionBoon {
                id: "tip_off",
                text: "Call the detective who owes you one",
                money: 0,
            },
            FactionBoon {
                id: "police_escort",
                text: "Ask the patrol outside for an escort",
                money: 0,
            },
        ],
        hostile_complications: &[
            FactionComplication {
                id: "van_search",
                text: "Officers pull the van over and tear it apart looking for something",
                threshold: -70,
                money_share: 5,
            },
            FactionComplication {
                id: "warrant_check",
                text: "A warrant check turns up your name, and nobody is smiling",
                threshold: -85,
                money_share: 20,
            },
        ],
    },
    FactionDefinition {
        id: FactionId::CriminalUnderground,
        display_name: "the people your fixer works for",
        values: &["loyalty", "discretion", "profit"],
        hates: &["snitch", "informant", "testify", "wear_a_wire", "undercover"],
        events_generated: &[
            FactionEncounter {
                kind: "debt_marker",
                topic: "the marker you still owe",
            },
            FactionEncounter {
                kind: "favor_called_in",
                topic: "the favor they did you last spring",
            },
        ],
        beneficial_choices: &[
            FactionBoon {
                id: "fixer_smooths",
                text: "Let your fixer make the problem disappear",
                money: -100,
            },
            FactionBoon {
                id: "cash_advance",
                text: "Take a no-questions cash advance",
                money: 400,
            },
        ],
        hostile_complications: &[
            FactionComplication {
                id: "debt_collector",
                text: "Two men you owe money to are waiting by the loading dock",
                threshold: -70,
                money_share: 25,
            },
            FactionComplication {
                id: "gear_torched",
                text: "Your rehearsal space smells like gasoline. It's a message",
                threshold: -90,
                money_share: 40,
            },
        ],
    },
    FactionDefinition {
        id: FactionId::MusicIndustry,
        display_name: "the label and its friends",
        values: &["marketability", "professionalism", "reliability"],
        hates: &["scandal", "no_show", "lawsuit", "leaked", "unreliable"],
        events_generated: &[
            FactionEncounter {
                kind: "label_showcase",
                topic: "the showcase slot they are holding for you",
            },
            FactionEncounter {
                kind: "sync_deal_offer",
                topic: "licensing your single for a car commercial",
            },
        ],
        beneficial_choices: &[
            FactionBoon {
                id: "label_lawyers",
                text: "Have the label's lawyers handle it",
                money: 0,
            },
            FactionBoon {
                id: "pr_spin",
                text: "Let the publicist spin it into a headline",
                money: 0,
            },
        ],
        hostile_complications: &[
            FactionComplication {
                id: "promoter_blacklist",
                text: "Promoters quietly stop returning your manager's calls",
                threshold: -70,
                money_share: 10,
            },
            FactionComplication {
                id: "morality_clause",
                text: "Legal invokes the morality clause in your contract",
                threshold: -80,
                money_share: 30,
            },
        ],
    },
    FactionDefinition {
        id: FactionId::UndergroundScene,
        display_name: "the scene",
        values: &["authenticity", "independence", "community"],
        hates: &["sellout", "sell_out", "corporate", "major_label", "jingle", "sponsorship"],
        events_generated: &[
            FactionEncounter {
                kind: "basement_show",
                topic: "playing their basement show for gas money",
            },
            FactionEncounter {
                kind: "zine_interview",
                topic: "an interview for their zine",
            },
        ],
        beneficial_choices: &[
            FactionBoon {
                id: "scene_solidarity",
                text: "Rally the scene to stand behind you",
                money: 0,
            },
            FactionBoon {
                id: "basement_benefit",
                text: "Play a benefit show in a friend's basement",
                money: 150,
            },
        ],
        hostile_complications: &[FactionComplication {
            id: "scene_boycott",
            text: "The scene organizes a boycott and your old flyers get defaced",
            threshold: -70,
            money_share: 5,
        }],
    },
    FactionDefinition {
        id: FactionId::MoralGuardians,
        display_name: "the concerned parents' coalition",
        values: &["decency", "family", "faith"],
        hates: &["obscene", "satanic", "occult", "profanity", "overdose", "drugs"],
        events_generated: &[
            FactionEncounter {
                kind: "church_picket",
                topic: "the picket line planned outside your next show",
            },
            FactionEncounter {
                kind: "radio_ban",
                topic: "getting your single pulled from local radio",
            },
        ],
        beneficial_choices: &[FactionBoon {
            id: "youth_outreach",
            text: "Play the youth outreach concert they keep asking about",
            money: 50,
        }],
        hostile_complications: &[
            FactionComplication {
                id: "protest_picket",
                text: "Protesters with hand-painted signs picket the venue entrance",
                threshold: -70,
                money_share: 5,
            },
            FactionComplication {
                id: "media_campaign",
                text: "A parents' group buys airtime to call you a danger to children",
                threshold: -85,
                money_share: 15,
            },
        ],
    },
];

pub fn faction(id: FactionId) -> &'static FactionDefinition {
    match id {
        FactionId::LawEnforcement => &FACTIONS[0],
        FactionId::CriminalUnderground => &FACTIONS[1],
        FactionId::MusicIndustry => &FACTIONS[2],
        FactionId::UndergroundScene => &FACTIONS[3],
        FactionId::MoralGuardians => &FACTIONS[4],
    }
}

/// Bucket a standing. Total over all integers; 70 itself is friendly.
pub fn faction_status(standing: i32) -> FactionStatus {
    if standing > 70 {
        FactionStatus::Ally
    } else if standing > 30 {
        FactionStatus::Friendly
    } else if standing > -30 {
        FactionStatus::Neutral
    } else if standing > -70 {
        FactionStatus::Wary
    } else {
        FactionStatus::Enemy
    }
}

/// Shift a standing, keeping it within [-100, 100]. Returns the new value.
pub fn adjust_standing(
    standings: &mut BTreeMap<FactionId, i32>,
    faction: FactionId,
    delta: i32,
) -> i32 {
    let entry = standings.entry(faction).or_insert(0);
    *entry = entry.saturating_add(delta).clamp(STANDING_MIN, STANDING_MAX);
    *entry
}

/// Choices without a faction requirement are always available.
pub fn is_choice_available(choice: &Choice, standings: &BTreeMap<FactionId, i32>) -> bool {
    match choice.required_faction_standing {
        Some(req) => standings.get(&req.faction).copied().unwrap_or(0) >= req.min_standing,
        None => true,
    }
}

/// Drop choices whose faction prerequisites are unmet. An event never ends up
/// with nothing to pick: if every choice is gated, a neutral exit is added.
pub fn retain_available_choices(draft: &mut DraftEvent, standings: &BTreeMap<FactionId, i32>) {
    draft.choices.retain(|c| is_choice_available(c, standings));
    if draft.choices.is_empty() {
        draft
            .choices
            .push(Choice::new("walk_away", "Walk away and let it go", RiskLevel::Low));
    }
}

/// Factions whose current standing is extreme enough to seek the band out.
pub fn factions_at_extremes(standings: &BTreeMap<FactionId, i32>) -> Vec<FactionId> {
    FactionId::ALL
        .iter()
        .copied()
        .filter(|f| {
            matches!(
                faction_status(standings.get(f).copied().unwrap_or(0)),
                FactionStatus::Ally | FactionStatus::Enemy
            )
        })
        .collect()
}

/// `percent`% of `amount`, rounded down, without overflowing on large balances.
fn percent_of(amount: i64, percent: i64) -> i64 {
    amount / 100 * percent + amount % 100 * percent / 100
}

/// Whether `faction` hates something mentioned in the event's title or description.
pub fn hates_event(definition: &FactionDefinition, draft: &DraftEvent) -> bool {
    let haystack = format!("{} {}", draft.title, draft.description).to_lowercase();
    definition
        .hates
        .iter()
        .any(|kw| haystack.contains(&kw.replace('_', " ").to_lowercase()))
}

/// Reshape an event according to current faction standings.
///
/// Allies add their beneficial choices, enemies force complications, and any
/// faction that hates the event's subject marks every choice with a reputation hit.
pub fn modify_event(
    draft: &mut DraftEvent,
    game: &GameSnapshot,
    standings: &BTreeMap<FactionId, i32>,
) {
    for def in &FACTIONS {
        let standing = standings.get(&def.id).copied().unwrap_or(0);
        match faction_status(standing) {
            FactionStatus::Ally => {
                for boon in def.beneficial_choices {
                    let id = format!("{}_{}", def.id.name(), boon.id);
                    if draft.has_choice(&id) {
                        continue;
                    }
                    let mut choice = Choice::new(id, boon.text, RiskLevel::Low)
                        .psyche(MetricDeltas::new().stress(-5.0))
                        .faction(def.id, 2);
                    if boon.money != 0 {
                        choice = choice.money(boon.money);
                    }
                    draft.choices.push(choice);
                }
            }
            FactionStatus::Enemy => {
                for comp in def.hostile_complications {
                    if standing > comp.threshold {
                        continue;
                    }
                    let id = format!("{}_{}", def.id.name(), comp.id);
                    if draft.has_choice(&id) {
                        continue;
                    }
                    let loss = percent_of(game.money.max(0), comp.money_share);
                    draft.choices.push(
                        Choice::new(id, comp.text, RiskLevel::High)
                            .psyche(MetricDeltas::new().stress(15.0).paranoia(10.0))
                            .money(-loss),
                    );
                }
            }
            _ => {}
        }
    }

    for def in &FACTIONS {
        if !hates_event(def, draft) {
            continue;
        }
        debug!(faction = def.id.name(), kind = %draft.kind, "faction hates event subject");
        for choice in &mut draft.choices {
            choice
                .psych_effects_mut()
                .faction_reputation
                .insert(def.id, HATED_EVENT_PENALTY);
        }
    }
}
