/// Event catalog: one builder per narrative beat, plus stage-parameterized
/// base generators for beats without a dedicated builder.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::core::arc::arc_definition;
use crate::schema::event::{
    ArcProgression, Choice, ContentWarning, DraftEvent, EventCategory, MaturityLevel, RiskLevel,
};
use crate::schema::game::GameSnapshot;
use crate::schema::narrative::{ArcType, FactionId, NarrativeState};
use crate::schema::psyche::{MetricDeltas, PsychologicalState, Severity};

/// Read-only view of the session a generator builds from.
#[derive(Debug, Clone, Copy)]
pub struct CatalogContext<'a> {
    pub game: &'a GameSnapshot,
    pub psyche: &'a PsychologicalState,
    pub narrative: &'a NarrativeState,
}

pub type Generator = fn(&CatalogContext<'_>, &mut StdRng) -> DraftEvent;

/// Every id with a dedicated builder.
pub const CATALOG_IDS: &[&str] = &[
    // addiction arc
    "backstage_first_line",
    "after_party_offer",
    "withdrawal_soundcheck",
    "overdose_scare",
    "band_intervention",
    "rehab_decision",
    "relapse_temptation",
    // corruption arc
    "payola_offer",
    "blackmail_material",
    "silence_the_witness",
    "journalist_digging",
    "federal_subpoena",
    // paranoia arc
    "van_followed",
    "onstage_hallucination",
    "mirror_session",
    // label war
    "label_showcase",
    "predatory_contract",
    // contextual
    "paparazzi_ambush",
    "stalker_fan",
    "loan_shark",
    "shady_investor",
    "bar_fight",
    "warehouse_raid",
    "backstage_excess",
    "bandmate_burnout",
    "label_pressure_to_sellout",
    "panic_attack",
    "dark_night",
    // everyday
    "van_breakdown",
    "rehearsal_clash",
    "fan_mail",
    "radio_interview",
];

pub const EVERYDAY_IDS: [&str; 4] =
    ["van_breakdown", "rehearsal_clash", "fan_mail", "radio_interview"];

pub fn generator(id: &str) -> Option<Generator> {
    let g: Generator = match id {
        "backstage_first_line" => backstage_first_line,
        "after_party_offer" => after_party_offer,
        "withdrawal_soundcheck" => withdrawal_soundcheck,
        "overdose_scare" => overdose_scare,
        "band_intervention" => band_intervention,
        "rehab_decision" => rehab_decision,
        "relapse_temptation" => relapse_temptation,
        "payola_offer" => payola_offer,
        "blackmail_material" => blackmail_material,
        "silence_the_witness" => silence_the_witness,
        "journalist_digging" => journalist_digging,
        "federal_subpoena" => federal_subpoena,
        "van_followed" => van_followed,
        "onstage_hallucination" => onstage_hallucination,
        "mirror_session" => mirror_session,
        "label_showcase" => label_showcase,
        "predatory_contract" => predatory_contract,
        "paparazzi_ambush" => paparazzi_ambush,
        "stalker_fan" => stalker_fan,
        "loan_shark" => loan_shark,
        "shady_investor" => shady_investor,
        "bar_fight" => bar_fight,
        "warehouse_raid" => warehouse_raid,
        "backstage_excess" => backstage_excess,
        "bandmate_burnout" => bandmate_burnout,
        "label_pressure_to_sellout" => label_pressure_to_sellout,
        "panic_attack" => panic_attack,
        "dark_night" => dark_night,
        "van_breakdown" => van_breakdown,
        "rehearsal_clash" => rehearsal_clash,
        "fan_mail" => fan_mail,
        "radio_interview" => radio_interview,
        _ => return None,
    };
    Some(g)
}

/// Build `id`, using the dedicated builder when there is one.
pub fn build_event(id: &str, ctx: &CatalogContext<'_>, rng: &mut StdRng) -> Option<DraftEvent> {
    generator(id).map(|g| g(ctx, rng))
}

/// Build an arc beat. Ids without a builder fall back to the arc's base
/// generator at `stage`, keeping `id` as the event kind.
pub fn build_arc_event(
    id: &str,
    arc: ArcType,
    stage: &str,
    ctx: &CatalogContext<'_>,
    rng: &mut StdRng,
) -> DraftEvent {
    if let Some(draft) = build_event(id, ctx, rng) {
        return draft;
    }
    let mut draft = match arc {
        ArcType::AddictionSpiral => substance_event(Some(stage), ctx, rng),
        ArcType::CorruptionPath => corruption_event(Some(stage), ctx, rng),
        ArcType::ParanoiaDescent => horror_event(Some(stage), ctx, rng),
        ArcType::LabelWar => industry_event(Some(stage), ctx, rng),
    };
    draft.kind = id.to_string();
    draft
}

pub fn everyday_event(ctx: &CatalogContext<'_>, rng: &mut StdRng) -> DraftEvent {
    let id = pick(rng, &EVERYDAY_IDS);
    build_event(id, ctx, rng).unwrap_or_else(|| van_breakdown(ctx, rng))
}

fn pick(rng: &mut StdRng, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

/// How far into its arc a stage sits, 0 for unknown stages.
fn depth(arc: ArcType, stage: Option<&str>) -> usize {
    stage
        .and_then(|s| arc_definition(arc).stage_index(s))
        .unwrap_or(0)
}

fn in_arc(ctx: &CatalogContext<'_>, arc: ArcType) -> bool {
    ctx.narrative.arc(arc).is_some()
}

// ---------------------------------------------------------------------------
// Base generators
// ---------------------------------------------------------------------------

pub fn substance_event(
    stage: Option<&str>,
    ctx: &CatalogContext<'_>,
    rng: &mut StdRng,
) -> DraftEvent {
    let d = depth(ArcType::AddictionSpiral, stage);
    let substance = pick(rng, &["coke", "pills", "speed", "whatever's going around"]);
    let (title, description) = match d {
        0 | 1 => (
            "Party Favors",
            format!("The after-show crowd is passing {} around like it's nothing.", substance),
        ),
        2 | 3 => (
            "Running on Empty",
            format!(
                "Your hands won't stop shaking until you've had some {}. The set starts in ten.",
                substance
            ),
        ),
        _ => (
            "Old Habits",
            format!(
                "You've been doing better. Then someone leaves {} on the dressing room table.",
                substance
            ),
        ),
    };

    let mut abstain = Choice::new("abstain", "Walk away from it", RiskLevel::Low)
        .psyche(MetricDeltas::new().stress(if d >= 2 { 12.0 } else { 5.0 }));
    if in_arc(ctx, ArcType::AddictionSpiral) {
        abstain = abstain.progresses(ArcProgression::CleanWeek(ArcType::AddictionSpiral));
    }

    let binge_risk = if d >= 3 { RiskLevel::Extreme } else { RiskLevel::High };
    DraftEvent::new("substance_event", title, description)
        .category(EventCategory::SubstanceAbuse)
        .maturity(MaturityLevel::Mature)
        .warnings(&[ContentWarning::DrugUse, ContentWarning::Addiction])
        .choice(abstain)
        .choice(
            Choice::new("use", "Just enough to get through the night", RiskLevel::Medium)
                .psyche(MetricDeltas::new().stress(-15.0).addiction(10.0))
                .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
        )
        .choice(
            Choice::new("binge", "Lose the whole night to it", binge_risk)
                .psyche(MetricDeltas::new().stress(-25.0).addiction(20.0).depression(5.0))
                .health(-15)
                .trauma(
                    "overdose",
                    if d >= 3 { 0.25 } else { 0.1 },
                    Severity::Critical,
                    "Your heart was doing something it shouldn't.",
                )
                .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
        )
}

pub fn corruption_event(
    stage: Option<&str>,
    ctx: &CatalogContext<'_>,
    rng: &mut StdRng,
) -> DraftEvent {
    let d = depth(ArcType::CorruptionPath, stage);
    let fixer = pick(
        rng,
        &["a promoter", "a club owner", "your manager's friend", "a man in a good suit"],
    );
    let stake = 200 + (d as i64) * 300 + ctx.game.fame.max(0) as i64 * 5;
    let (title, description) = match d {
        0 | 1 => (
            "Easy Money",
            format!(
                "{} offers ${} for a small favor nobody would ever notice.",
                capitalize(fixer),
                stake
            ),
        ),
        2 | 3 => (
            "In Too Deep",
            format!(
                "{} needs you again. ${} this time, and you know what it's for.",
                capitalize(fixer),
                stake
            ),
        ),
        _ => (
            "The Bill Comes Due",
            format!(
                "{} reminds you how much you owe, and who else knows about it.",
                capitalize(fixer)
            ),
        ),
    };

    DraftEvent::new("corruption_event", title, description)
        .category(EventCategory::Corruption)
        .maturity(MaturityLevel::Mature)
        .warnings(&[ContentWarning::CriminalActivity])
        .choice(
            Choice::new(
                "refuse",
                "Refuse and make it clear you won't be asked twice",
                RiskLevel::Medium,
            )
                .psyche(MetricDeltas::new().morality(5.0).stress(5.0))
                .faction(FactionId::CriminalUnderground, -5),
        )
        .choice(
            Choice::new(
                "negotiate",
                "Take a smaller part and keep your hands clean-ish",
                RiskLevel::Medium,
            )
                .psyche(MetricDeltas::new().morality(-5.0))
                .money(stake / 3),
        )
        .choice(
            Choice::new("accept", "Take the money", RiskLevel::High)
                .psyche(MetricDeltas::new().morality(-15.0).paranoia(5.0))
                .money(stake)
                .faction(FactionId::CriminalUnderground, 5)
                .faction(FactionId::LawEnforcement, -5)
                .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
        )
}

pub fn horror_event(
    stage: Option<&str>,
    _ctx: &CatalogContext<'_>,
    rng: &mut StdRng,
) -> DraftEvent {
    let d = depth(ArcType::ParanoiaDescent, stage);
    let omen = pick(
        rng,
        &[
            "a voice on the monitor mix that isn't anyone in the band",
            "the same face in the crowd at four different shows",
            "a click on the phone line every time you call home",
            "your own handwriting on a setlist you never wrote",
        ],
    );
    let title = match d {
        0 | 1 => "Something's Off",
        2 | 3 => "They Know",
        _ => "Nobody Else Hears It",
    };

    DraftEvent::new("horror_event", title, format!("There it is again: {}.", omen))
        .category(EventCategory::PsychologicalHorror)
        .maturity(MaturityLevel::Mature)
        .warnings(&[ContentWarning::MentalHealth])
        .choice(
            Choice::new("ground", "Breathe, count the exits, tell a bandmate", RiskLevel::Low)
                .psyche(MetricDeltas::new().stress(-5.0).paranoia(-5.0)),
        )
        .choice(
            Choice::new("investigate", "Find out who's behind it", RiskLevel::High)
                .psyche(MetricDeltas::new().paranoia(10.0).stress(10.0))
                .progresses(ArcProgression::Escalate(ArcType::ParanoiaDescent)),
        )
        .choice(
            Choice::new("numb", "Drink until it goes quiet", RiskLevel::Medium)
                .psyche(MetricDeltas::new().stress(-10.0).addiction(8.0).depression(5.0)),
        )
}

pub fn industry_event(
    stage: Option<&str>,
    ctx: &CatalogContext<'_>,
    _rng: &mut StdRng,
) -> DraftEvent {
    let d = depth(ArcType::LabelWar, stage);
    let (title, description) = match d {
        0 => ("The Courtship", "A label rep keeps showing up with drink tickets and big promises."),
        1 | 2 => (
            "Creative Differences",
            "The label wants the single shorter, happier, and written by someone else.",
        ),
        3 => ("Going Public", "The label's version of the story is all over the music press."),
        _ => ("Endgame", "Lawyers on both sides. Everyone wants this over."),
    };
    let advance = 300 + ctx.game.fame.max(0) as i64 * 10;

    DraftEvent::new("industry_event", title, description)
        .category(EventCategory::Industry)
        .choice(
            Choice::new("comply", "Give them what they want", RiskLevel::Low)
                .psyche(MetricDeltas::new().morality(-5.0).depression(5.0))
                .money(advance)
                .fame(5)
                .faction(FactionId::MusicIndustry, 5)
                .faction(FactionId::UndergroundScene, -5),
        )
        .choice(
            Choice::new("fight", "Fight them on every point", RiskLevel::High)
                .psyche(MetricDeltas::new().stress(10.0).morality(5.0))
                .faction(FactionId::MusicIndustry, -10)
                .faction(FactionId::UndergroundScene, 5)
                .progresses(ArcProgression::Escalate(ArcType::LabelWar)),
        )
        .choice(
            Choice::new("stall", "Stall and let your manager handle it", RiskLevel::Medium)
                .psyche(MetricDeltas::new().stress(5.0)),
        )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Addiction arc
// ---------------------------------------------------------------------------

fn backstage_first_line(_ctx: &CatalogContext<'_>, rng: &mut StdRng) -> DraftEvent {
    let who = pick(rng, &["Marco", "Jess", "Tommy Vee", "Dani"]);
    DraftEvent::new(
        "backstage_first_line",
        "First Line",
        format!(
            "{} from the headlining band racks up a line on a road case and nods at you. \"Everyone does it. You'll play better.\"",
            who
        ),
    )
    .character(who, "headliner guitarist")
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::DrugUse])
    .choice(
        Choice::new("decline", "Laugh it off and go tune up", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(3.0)),
    )
    .choice(
        Choice::new("try_it", "Try it, just this once", RiskLevel::High)
            .psyche(MetricDeltas::new().addiction(15.0).stress(-10.0))
            .fame(1)
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
}

fn after_party_offer(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "after_party_offer",
        "The After-Party",
        "A loft across town, a bathtub full of beer, and someone handing out pills like mints.",
    )
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::DrugUse, ContentWarning::AlcoholAbuse])
    .choice(
        Choice::new("one_drink", "One drink, then the van", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(-3.0))
            .morale(2),
    )
    .choice(
        Choice::new("take_pill", "Take whatever they're handing out", RiskLevel::High)
            .psyche(MetricDeltas::new().addiction(12.0).stress(-15.0))
            .morale(5)
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("leave", "Leave before it gets going", RiskLevel::Low).morale(-2),
    )
}

fn withdrawal_soundcheck(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "withdrawal_soundcheck",
        "Shakes at Soundcheck",
        "You can't keep time. Your drummer keeps glancing over. You know exactly what would fix this.",
    )
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::Addiction])
    .choice(
        Choice::new("push_through", "Push through it sober", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(15.0))
            .progresses(ArcProgression::CleanWeek(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("score", "Find your guy before doors", RiskLevel::High)
            .psyche(MetricDeltas::new().addiction(15.0).stress(-20.0))
            .money(-80)
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
}

fn overdose_scare(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "overdose_scare",
        "Blue Lips",
        "Your bassist finds you on the green room floor, barely breathing. Someone is already dialing 911.",
    )
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::Overdose, ContentWarning::DrugUse])
    .risk(RiskLevel::Extreme)
    .choice(
        Choice::new("hospital", "Go to the hospital and tell them everything", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(10.0).depression(10.0).addiction(-10.0))
            .money(-400)
            .long_term(-5, -5, "The story gets around"),
    )
    .choice(
        Choice::new("refuse_help", "Wave off the ambulance and play anyway", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().addiction(10.0).depression(10.0))
            .health(-25)
            .trauma("overdose", 0.5, Severity::Critical, "You died for forty seconds.")
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
}

fn band_intervention(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let weeks = ctx
        .narrative
        .arc(ArcType::AddictionSpiral)
        .map(|a| ctx.game.week.saturating_sub(a.start_week))
        .unwrap_or(0);
    DraftEvent::new(
        "band_intervention",
        "Intervention",
        format!(
            "The whole band is sitting in your apartment when you get home. They've been worried for {} weeks.",
            weeks.max(1)
        ),
    )
    .category(EventCategory::MentalHealth)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::Addiction])
    .choice(
        Choice::new("accept_help", "Break down and accept their help", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(-10.0).addiction(-15.0).depression(-5.0))
            .morale(10)
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("storm_out", "Tell them to mind their own business", RiskLevel::High)
            .psyche(MetricDeltas::new().depression(15.0).stress(10.0))
            .morale(-20),
    )
}

fn rehab_decision(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let cost = 1500i64.min(ctx.game.money.max(0) + 500);
    DraftEvent::new(
        "rehab_decision",
        "Thirty Days",
        format!("A bed opened up at a clinic upstate. ${} and a month off the road.", cost),
    )
    .category(EventCategory::MentalHealth)
    .warnings(&[ContentWarning::Addiction])
    .choice(
        Choice::new("go_to_rehab", "Go. Cancel the shows.", RiskLevel::Low)
            .psyche(MetricDeltas::new().addiction(-25.0).stress(-15.0).depression(-10.0))
            .money(-cost)
            .fame(-3)
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("outpatient", "Try outpatient meetings between gigs", RiskLevel::Medium)
            .psyche(MetricDeltas::new().addiction(-10.0).stress(5.0))
            .progresses(ArcProgression::CleanWeek(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("not_yet", "Not yet. After the tour.", RiskLevel::High)
            .psyche(MetricDeltas::new().addiction(5.0).depression(5.0)),
    )
}

fn relapse_temptation(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let clean = ctx
        .narrative
        .arc(ArcType::AddictionSpiral)
        .map(|a| a.weeks_clean)
        .unwrap_or(0);
    DraftEvent::new(
        "relapse_temptation",
        "Just One",
        format!(
            "{} weeks clean. The old crowd is at the bar, and they saved you a seat.",
            clean
        ),
    )
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::Addiction, ContentWarning::AlcoholAbuse])
    .choice(
        Choice::new("call_sponsor", "Step outside and call your sponsor", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(-5.0))
            .progresses(ArcProgression::CleanWeek(ArcType::AddictionSpiral)),
    )
    .choice(
        Choice::new("relapse", "Sit down. Just one.", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().addiction(20.0).depression(15.0).stress(-10.0))
            .progresses(ArcProgression::Relapse(ArcType::AddictionSpiral)),
    )
}

// ---------------------------------------------------------------------------
// Corruption arc
// ---------------------------------------------------------------------------

fn payola_offer(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let cut = 100 + ctx.game.fame.max(0) as i64 * 4;
    DraftEvent::new(
        "payola_offer",
        "Pay to Play",
        format!(
            "The program director at the biggest rock station in town can get you into heavy rotation. He'd like ${} in an envelope.",
            cut
        ),
    )
    .character("Rick Salvo", "program director")
    .category(EventCategory::Corruption)
    .choice(
        Choice::new("pay_up", "Pay the envelope", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-10.0))
            .money(-cut)
            .fame(8)
            .faction(FactionId::MusicIndustry, 5)
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
    .choice(
        Choice::new("refuse", "Refuse and earn airplay the slow way", RiskLevel::Low)
            .psyche(MetricDeltas::new().morality(5.0))
            .faction(FactionId::UndergroundScene, 3),
    )
    .choice(
        Choice::new("tip_press", "Tip off a music journalist", RiskLevel::Medium)
            .psyche(MetricDeltas::new().morality(5.0).paranoia(5.0))
            .faction(FactionId::MusicIndustry, -10),
    )
}

fn blackmail_material(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "blackmail_material",
        "Insurance",
        "Your fixer shows you photos of a city councilman at your last after-party. \"Keep these. Could be useful.\"",
    )
    .category(EventCategory::Criminal)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::CriminalActivity])
    .choice(
        Choice::new("keep_photos", "Keep them somewhere safe", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-10.0).paranoia(10.0))
            .faction(FactionId::CriminalUnderground, 5)
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
    .choice(
        Choice::new("burn_them", "Burn them in the sink", RiskLevel::Medium)
            .psyche(MetricDeltas::new().morality(5.0))
            .faction(FactionId::CriminalUnderground, -10),
    )
}

fn silence_the_witness(_ctx: &CatalogContext<'_>, rng: &mut StdRng) -> DraftEvent {
    let witness = pick(rng, &["the merch girl", "a bouncer", "your old roadie"]);
    DraftEvent::new(
        "silence_the_witness",
        "Loose Ends",
        format!(
            "{} saw the cash changing hands. Your fixer says they need to be handled.",
            capitalize(witness)
        ),
    )
    .category(EventCategory::Criminal)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::CriminalActivity, ContentWarning::Violence])
    .risk(RiskLevel::Extreme)
    .choice(
        Choice::new("pay_off", "Pay them to forget", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-10.0).paranoia(5.0))
            .money(-500)
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
    .choice(
        Choice::new("let_fixer", "Let your fixer deal with it and don't ask", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().morality(-30.0).paranoia(15.0).depression(10.0))
            .faction(FactionId::CriminalUnderground, 10)
            .trauma("complicity", 0.4, Severity::Severe, "You never saw them again.")
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
    .choice(
        Choice::new("warn_them", "Warn them to leave town", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(10.0).stress(15.0))
            .faction(FactionId::CriminalUnderground, -20),
    )
}

fn journalist_digging(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "journalist_digging",
        "Questions",
        "An investigative reporter from the alt-weekly wants to ask about the money behind your last tour.",
    )
    .category(EventCategory::Corruption)
    .choice(
        Choice::new("no_comment", "No comment", RiskLevel::Medium)
            .psyche(MetricDeltas::new().paranoia(10.0)),
    )
    .choice(
        Choice::new("come_clean", "Tell her everything", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(15.0).stress(20.0))
            .fame(-5)
            .faction(FactionId::LawEnforcement, 10)
            .faction(FactionId::CriminalUnderground, -25),
    )
    .choice(
        Choice::new("discredit", "Have your people dig up dirt on her first", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-15.0).paranoia(5.0))
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
}

fn federal_subpoena(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "federal_subpoena",
        "Subpoena",
        "Two agents hand you a subpoena at load-in. A grand jury wants to hear about the promoter's books.",
    )
    .category(EventCategory::Criminal)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::CriminalActivity])
    .risk(RiskLevel::Extreme)
    .choice(
        Choice::new("testify", "Testify and cooperate fully", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(15.0).paranoia(20.0))
            .faction(FactionId::LawEnforcement, 25)
            .faction(FactionId::CriminalUnderground, -40),
    )
    .choice(
        Choice::new("lawyer_up", "Lawyer up and stay quiet", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(15.0))
            .money(-1000),
    )
    .choice(
        Choice::new("skip_town", "Cancel the tour and disappear for a while", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().paranoia(25.0).depression(10.0))
            .fame(-10)
            .faction(FactionId::LawEnforcement, -30),
    )
}

// ---------------------------------------------------------------------------
// Paranoia arc
// ---------------------------------------------------------------------------

fn van_followed(_ctx: &CatalogContext<'_>, rng: &mut StdRng) -> DraftEvent {
    let car = pick(rng, &["a black sedan", "a white van with no windows", "the same pickup"]);
    DraftEvent::new(
        "van_followed",
        "Headlights",
        format!("{} has been behind the van for two hundred miles.", capitalize(car)),
    )
    .category(EventCategory::PsychologicalHorror)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::MentalHealth])
    .choice(
        Choice::new("pull_over", "Pull over at a truck stop and see what happens", RiskLevel::High)
            .psyche(MetricDeltas::new().paranoia(10.0).stress(10.0))
            .progresses(ArcProgression::Escalate(ArcType::ParanoiaDescent)),
    )
    .choice(
        Choice::new("ask_band", "Ask the band if they see it too", RiskLevel::Low)
            .psyche(MetricDeltas::new().paranoia(-5.0)),
    )
    .choice(
        Choice::new("lose_them", "Floor it down the back roads", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(15.0))
            .health(-5)
            .morale(-5),
    )
}

fn onstage_hallucination(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "onstage_hallucination",
        "The Crowd Has No Faces",
        "Mid-chorus you look up and every face in the room is smooth and blank, turned toward you.",
    )
    .category(EventCategory::PsychologicalHorror)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::MentalHealth])
    .risk(RiskLevel::High)
    .choice(
        Choice::new("keep_playing", "Close your eyes and keep playing", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(15.0).paranoia(5.0)),
    )
    .choice(
        Choice::new("walk_off", "Walk off stage mid-song", RiskLevel::High)
            .psyche(MetricDeltas::new().paranoia(10.0).depression(10.0))
            .fame(-3)
            .trauma(
                "psychotic_episode",
                0.3,
                Severity::Severe,
                "You lost an hour you can't account for.",
            )
            .progresses(ArcProgression::Escalate(ArcType::ParanoiaDescent)),
    )
}

fn mirror_session(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "mirror_session",
        "Mirror",
        "Four in the morning, alone in a motel bathroom. The person in the mirror wants to talk.",
    )
    .category(EventCategory::MentalHealth)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::MentalHealth, ContentWarning::SelfHarm])
    .choice(
        Choice::new("get_help", "Call a crisis line and make an appointment", RiskLevel::Low)
            .psyche(MetricDeltas::new().paranoia(-20.0).stress(-10.0).depression(-10.0)),
    )
    .choice(
        Choice::new("listen", "Listen to what it has to say", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().paranoia(20.0).depression(15.0))
            .progresses(ArcProgression::Escalate(ArcType::ParanoiaDescent)),
    )
}

// ---------------------------------------------------------------------------
// Label war
// ---------------------------------------------------------------------------

fn label_showcase(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "label_showcase",
        "Showcase",
        format!(
            "Three labels are sending scouts to your show in week {}. One of them wants you to play their songwriter's material.",
            ctx.game.week + 1
        ),
    )
    .category(EventCategory::Industry)
    .choice(
        Choice::new("play_theirs", "Play the songs they picked", RiskLevel::Low)
            .psyche(MetricDeltas::new().morality(-5.0))
            .fame(5)
            .faction(FactionId::MusicIndustry, 10)
            .faction(FactionId::UndergroundScene, -5)
            .progresses(ArcProgression::Escalate(ArcType::LabelWar)),
    )
    .choice(
        Choice::new("play_yours", "Play your own set, loud", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(5.0))
            .fame(2)
            .faction(FactionId::UndergroundScene, 5),
    )
}

fn predatory_contract(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let advance = 2000 + ctx.game.fame.max(0) as i64 * 50;
    DraftEvent::new(
        "predatory_contract",
        "Sign Here",
        format!(
            "A ${} advance, seven albums, and they own your masters forever. The pen is already uncapped.",
            advance
        ),
    )
    .category(EventCategory::Industry)
    .choice(
        Choice::new("sign", "Sign it", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(-5.0).depression(5.0))
            .money(advance)
            .faction(FactionId::MusicIndustry, 15)
            .faction(FactionId::UndergroundScene, -15)
            .progresses(ArcProgression::Escalate(ArcType::LabelWar)),
    )
    .choice(
        Choice::new("lawyer", "Have a lawyer tear it apart first", RiskLevel::Medium)
            .money(-300)
            .faction(FactionId::MusicIndustry, -5),
    )
    .choice(
        Choice::new("walk", "Walk out of the meeting", RiskLevel::Low)
            .psyche(MetricDeltas::new().morality(5.0))
            .faction(FactionId::UndergroundScene, 10),
    )
}

// ---------------------------------------------------------------------------
// Contextual events
// ---------------------------------------------------------------------------

fn paparazzi_ambush(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "paparazzi_ambush",
        "Flashbulbs",
        "Photographers are waiting outside the hotel at 3am. You look exactly how you feel.",
    )
    .category(EventCategory::General)
    .choice(
        Choice::new("smile", "Smile and keep walking", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(5.0))
            .fame(2),
    )
    .choice(
        Choice::new("smash_camera", "Grab a camera and smash it", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(-5.0))
            .money(-800)
            .fame(6)
            .faction(FactionId::LawEnforcement, -5),
    )
}

fn stalker_fan(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "stalker_fan",
        "Number One Fan",
        "The letters started sweet. This one was slid under your hotel room door, and it knows your mother's name.",
    )
    .category(EventCategory::PsychologicalHorror)
    .warnings(&[ContentWarning::MentalHealth])
    .choice(
        Choice::new("call_police", "Call the police", RiskLevel::Low)
            .psyche(MetricDeltas::new().paranoia(5.0))
            .faction(FactionId::LawEnforcement, 5),
    )
    .choice(
        Choice::new("hire_security", "Hire security for the rest of the tour", RiskLevel::Low)
            .psyche(MetricDeltas::new().paranoia(-5.0))
            .money(-600),
    )
    .choice(
        Choice::new("confront", "Find them yourself", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().paranoia(15.0).stress(15.0))
            .trauma(
                "stalker_confrontation",
                0.3,
                Severity::Moderate,
                "They smiled like they'd been waiting.",
            ),
    )
}

fn loan_shark(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let offered = 1000 + (100 - ctx.game.money.min(100)).max(0) * 5;
    DraftEvent::new(
        "loan_shark",
        "Friendly Loan",
        format!(
            "The van needs a transmission and you're broke. A guy who hangs around the club offers ${} at a rate he won't say out loud.",
            offered
        ),
    )
    .category(EventCategory::Criminal)
    .warnings(&[ContentWarning::CriminalActivity])
    .choice(
        Choice::new("borrow", "Take the money", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(10.0).paranoia(5.0))
            .money(offered)
            .faction(FactionId::CriminalUnderground, 5),
    )
    .choice(
        Choice::new("sell_gear", "Sell your backup guitar instead", RiskLevel::Low)
            .psyche(MetricDeltas::new().depression(5.0))
            .money(400)
            .morale(-5),
    )
    .choice(
        Choice::new("crowdfund", "Ask the fans to chip in", RiskLevel::Medium)
            .money(250)
            .faction(FactionId::UndergroundScene, 3),
    )
}

fn shady_investor(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let stake = ctx.game.money.max(0) / 5;
    DraftEvent::new(
        "shady_investor",
        "Investment Opportunity",
        format!(
            "A man who says he manages 'hospitality businesses' wants to run ${} of his money through your tour accounts.",
            stake.max(1000)
        ),
    )
    .category(EventCategory::Corruption)
    .warnings(&[ContentWarning::CriminalActivity])
    .choice(
        Choice::new("launder", "Let him, for a fee", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(-15.0).paranoia(10.0))
            .money(stake.max(200))
            .faction(FactionId::CriminalUnderground, 10)
            .progresses(ArcProgression::Escalate(ArcType::CorruptionPath)),
    )
    .choice(
        Choice::new("decline", "Politely decline and avoid him after", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(5.0)),
    )
}

fn bar_fight(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    let venue = ctx
        .game
        .venue
        .as_ref()
        .map(|v| v.name.as_str())
        .unwrap_or("the bar");
    DraftEvent::new(
        "bar_fight",
        "Last Call",
        format!("A drunk regular at {} swings at your singer during the encore.", venue),
    )
    .category(EventCategory::Violence)
    .warnings(&[ContentWarning::Violence, ContentWarning::AlcoholAbuse])
    .choice(
        Choice::new("defuse", "Get between them and talk him down", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(5.0))
            .morale(5),
    )
    .choice(
        Choice::new("fight_back", "Swing back", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(-5.0))
            .health(-10)
            .fame(3)
            .faction(FactionId::LawEnforcement, -5),
    )
    .choice(
        Choice::new("bouncer", "Stop playing until the bouncer handles it", RiskLevel::Low)
            .morale(-2),
    )
}

fn warehouse_raid(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "warehouse_raid",
        "Raid",
        "Blue lights through the loading bay doors. Someone at the warehouse show has been drug dealing, and the cops know.",
    )
    .category(EventCategory::Criminal)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::CriminalActivity, ContentWarning::DrugUse])
    .risk(RiskLevel::High)
    .choice(
        Choice::new("run", "Grab your gear and run out the back", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(15.0).paranoia(5.0))
            .faction(FactionId::UndergroundScene, 5),
    )
    .choice(
        Choice::new("cooperate", "Put your hands up and cooperate", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(10.0))
            .faction(FactionId::LawEnforcement, 5)
            .faction(FactionId::UndergroundScene, -5),
    )
    .choice(
        Choice::new("hide_stash", "Help the promoter hide the stash", RiskLevel::Extreme)
            .psyche(MetricDeltas::new().morality(-10.0).paranoia(15.0))
            .faction(FactionId::CriminalUnderground, 10)
            .faction(FactionId::LawEnforcement, -15),
    )
}

fn backstage_excess(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "backstage_excess",
        "Rider",
        "The arena rider came through: top-shelf everything, and a few things that were never on the rider.",
    )
    .category(EventCategory::SubstanceAbuse)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::AlcoholAbuse, ContentWarning::DrugUse])
    .choice(
        Choice::new("indulge", "Indulge. You earned it.", RiskLevel::High)
            .psyche(MetricDeltas::new().addiction(10.0).stress(-15.0))
            .morale(5),
    )
    .choice(
        Choice::new("give_away", "Give it to the crew", RiskLevel::Low)
            .morale(8)
            .faction(FactionId::UndergroundScene, 2),
    )
}

fn bandmate_burnout(_ctx: &CatalogContext<'_>, rng: &mut StdRng) -> DraftEvent {
    let who = pick(rng, &["Your drummer", "Your bassist", "Your keyboardist"]);
    DraftEvent::new(
        "bandmate_burnout",
        "Running on Fumes",
        format!("{} hasn't slept in days and just said they're thinking of quitting.", who),
    )
    .category(EventCategory::MentalHealth)
    .choice(
        Choice::new("time_off", "Cancel a week of shows so everyone can recover", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(-10.0))
            .money(-300)
            .morale(15),
    )
    .choice(
        Choice::new("push_on", "Push on. The tour can't stop.", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(10.0))
            .morale(-15),
    )
    .choice(
        Choice::new("replace", "Start auditioning replacements quietly", RiskLevel::Medium)
            .psyche(MetricDeltas::new().morality(-5.0).paranoia(5.0))
            .morale(-10),
    )
}

fn label_pressure_to_sellout(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "label_pressure_to_sellout",
        "Brand Partnership",
        "The label has lined up an energy drink commercial. Your song, their jingle, corporate money.",
    )
    .category(EventCategory::Industry)
    .choice(
        Choice::new("take_deal", "Take the corporate deal", RiskLevel::Low)
            .psyche(MetricDeltas::new().morality(-10.0))
            .money(1500)
            .fame(5)
            .faction(FactionId::MusicIndustry, 10),
    )
    .choice(
        Choice::new("refuse_deal", "Refuse, and say why in an interview", RiskLevel::High)
            .psyche(MetricDeltas::new().morality(5.0).stress(10.0))
            .faction(FactionId::MusicIndustry, -15)
            .faction(FactionId::UndergroundScene, 10),
    )
}

fn panic_attack(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "panic_attack",
        "Can't Breathe",
        "Your chest locks up in the wings. Your heart is going so fast the room tilts.",
    )
    .category(EventCategory::MentalHealth)
    .warnings(&[ContentWarning::MentalHealth])
    .choice(
        Choice::new("breathe", "Sit down and breathe through it", RiskLevel::Low)
            .psyche(MetricDeltas::new().stress(-10.0)),
    )
    .choice(
        Choice::new("play_anyway", "Go on anyway", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(15.0).paranoia(5.0))
            .trauma(
                "panic_attack",
                0.35,
                Severity::Moderate,
                "You blacked out during the second song.",
            ),
    )
    .choice(
        Choice::new("self_medicate", "Something from the bag to calm down", RiskLevel::High)
            .psyche(MetricDeltas::new().stress(-20.0).addiction(10.0))
            .progresses(ArcProgression::Escalate(ArcType::AddictionSpiral)),
    )
}

fn dark_night(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "dark_night",
        "Dark Night",
        "Another motel ceiling. You can't remember the last time any of this felt good.",
    )
    .category(EventCategory::MentalHealth)
    .maturity(MaturityLevel::Mature)
    .warnings(&[ContentWarning::MentalHealth, ContentWarning::SelfHarm])
    .choice(
        Choice::new("reach_out", "Text someone you trust", RiskLevel::Low)
            .psyche(MetricDeltas::new().depression(-10.0)),
    )
    .choice(
        Choice::new("write", "Write it all into a song", RiskLevel::Low)
            .psyche(MetricDeltas::new().depression(-5.0).stress(-5.0))
            .fame(1),
    )
    .choice(
        Choice::new("isolate", "Turn the phone off for three days", RiskLevel::High)
            .psyche(MetricDeltas::new().depression(15.0).paranoia(5.0))
            .morale(-10),
    )
}

// ---------------------------------------------------------------------------
// Everyday band life
// ---------------------------------------------------------------------------

fn van_breakdown(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "van_breakdown",
        "Breakdown",
        "The van dies on the shoulder two hours from tonight's show.",
    )
    .category(EventCategory::General)
    .maturity(MaturityLevel::Teen)
    .warnings(&[])
    .choice(
        Choice::new("tow", "Pay for a tow and a rental", RiskLevel::Low)
            .money(-350),
    )
    .choice(
        Choice::new("fix_it", "Try to fix it yourselves", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(5.0))
            .morale(3),
    )
}

fn rehearsal_clash(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "rehearsal_clash",
        "Creative Tension",
        "Rehearsal turns into an argument about the bridge of the new song.",
    )
    .category(EventCategory::General)
    .maturity(MaturityLevel::Teen)
    .warnings(&[])
    .choice(
        Choice::new("compromise", "Find a diplomatic compromise", RiskLevel::Low)
            .morale(5),
    )
    .choice(
        Choice::new("your_way", "Insist on your version", RiskLevel::Medium)
            .psyche(MetricDeltas::new().stress(5.0))
            .morale(-5),
    )
}

fn fan_mail(_ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "fan_mail",
        "Fan Mail",
        "A kid writes that your album got them through a rough year.",
    )
    .category(EventCategory::General)
    .maturity(MaturityLevel::Teen)
    .warnings(&[])
    .choice(
        Choice::new("write_back", "Write back", RiskLevel::Low)
            .psyche(MetricDeltas::new().depression(-5.0))
            .fame(1),
    )
    .choice(
        Choice::new("pin_it", "Pin it to the van dashboard", RiskLevel::Low)
            .morale(3),
    )
}

fn radio_interview(ctx: &CatalogContext<'_>, _rng: &mut StdRng) -> DraftEvent {
    DraftEvent::new(
        "radio_interview",
        "On Air",
        format!(
            "College radio wants you live in the studio this week. The host has heard of you{}.",
            if ctx.game.fame > 30 { ", and so have the callers" } else { ", barely" }
        ),
    )
    .category(EventCategory::General)
    .maturity(MaturityLevel::Teen)
    .warnings(&[])
    .choice(
        Choice::new("acoustic", "Play an acoustic set", RiskLevel::Low)
            .fame(2),
    )
    .choice(
        Choice::new("rant", "Spend the interview ranting about the industry", RiskLevel::Medium)
            .fame(3)
            .faction(FactionId::MusicIndustry, -3)
            .faction(FactionId::UndergroundScene, 3),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn with_ctx<T>(f: impl FnOnce(&CatalogContext<'_>) -> T) -> T {
        let game = GameSnapshot::default();
        let psyche = PsychologicalState::default();
        let narrative = NarrativeState::default();
        f(&CatalogContext {
            game: &game,
            psyche: &psyche,
            narrative: &narrative,
        })
    }

    #[test]
    fn every_catalog_id_builds_a_well_formed_event() {
        with_ctx(|ctx| {
            let mut rng = StdRng::seed_from_u64(11);
            for id in CATALOG_IDS {
                let draft = build_event(id, ctx, &mut rng).unwrap();
                assert_eq!(draft.kind, *id);
                assert!(!draft.title.is_empty());
                assert!(draft.choices.len() >= 2, "{} has too few choices", id);
                let ids: HashSet<&str> = draft.choices.iter().map(|c| c.id.as_str()).collect();
                assert_eq!(ids.len(), draft.choices.len(), "{} has duplicate choice ids", id);
            }
        });
    }

    #[test]
    fn unknown_ids_have_no_builder() {
        assert!(generator("alien_abduction").is_none());
        with_ctx(|ctx| {
            assert!(build_event("alien_abduction", ctx, &mut StdRng::seed_from_u64(0)).is_none());
        });
    }

    #[test]
    fn every_arc_candidate_yields_an_event() {
        with_ctx(|ctx| {
            let mut rng = StdRng::seed_from_u64(4);
            for def in &crate::core::arc::ARCS {
                for stage in def.stages {
                    for id in stage.events {
                        let draft = build_arc_event(id, def.arc_type, stage.name, ctx, &mut rng);
                        assert_eq!(draft.kind, *id);
                        assert!(!draft.choices.is_empty());
                    }
                }
            }
        });
    }

    #[test]
    fn stage_fallback_tracks_depth() {
        with_ctx(|ctx| {
            let mut rng = StdRng::seed_from_u64(2);
            let early = substance_event(Some("first_exposure"), ctx, &mut rng);
            let late = substance_event(Some("rock_bottom"), ctx, &mut rng);
            assert_eq!(early.title, "Party Favors");
            assert_eq!(late.title, "Running on Empty");
            let binge = late.choices.iter().find(|c| c.id == "binge").unwrap();
            assert_eq!(binge.risk_level, RiskLevel::Extreme);
        });
    }

    #[test]
    fn abstaining_counts_clean_weeks_only_inside_the_arc() {
        let game = GameSnapshot::default();
        let psyche = PsychologicalState::default();
        let mut narrative = NarrativeState::default();
        let mut rng = StdRng::seed_from_u64(8);

        let outside = substance_event(
            None,
            &CatalogContext { game: &game, psyche: &psyche, narrative: &narrative },
            &mut rng,
        );
        assert!(outside.choices[0].progression.is_none());

        crate::core::arc::progress_arc(
            &mut narrative,
            ArcType::AddictionSpiral,
            "recovery_attempt",
            5,
        )
            .unwrap();
        let inside = substance_event(
            Some("recovery_attempt"),
            &CatalogContext { game: &game, psyche: &psyche, narrative: &narrative },
            &mut rng,
        );
        assert_eq!(
            inside.choices[0].progression,
            Some(ArcProgression::CleanWeek(ArcType::AddictionSpiral))
        );
    }

    #[test]
    fn everyday_events_are_tame() {
        with_ctx(|ctx| {
            let mut rng = StdRng::seed_from_u64(21);
            for _ in 0..20 {
                let draft = everyday_event(ctx, &mut rng);
                assert!(EVERYDAY_IDS.contains(&draft.kind.as_str()));
                assert_eq!(draft.category, Some(EventCategory::General));
                assert_eq!(draft.maturity, Some(MaturityLevel::Teen));
                assert_eq!(draft.content_warnings, Some(vec![]));
            }
        });
    }
}
