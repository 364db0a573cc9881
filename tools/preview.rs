/// Preview: interactive shell for playing through generated events.
///
/// Usage: preview [--config <path>] [--templates <dir>] [--seed <n>]
///
/// Commands:
///   event [id]               generate an event (random, or a catalog/template id)
///   gig                      generate a post-gig event
///   choose <choice_id>       resolve a choice on the last event
///   week                     advance one week
///   set <field> <value>      change game or psychological state
///   faction <name> <n>       set a faction standing
///   arc <name> <stage>       start or move an arc
///   filter <setting>         on, off, teen, mature, or <preference>=<true|false>
///   state                    print the session
///   seed <n>                 rebuild the engine with a new seed
///   bulk <n>                 generate n events with source statistics
///   help                     list commands
///   quit                     exit
///
/// Log output goes to stderr, filtered by RUST_LOG (default: warn).

use gig_narrative::core::arc::progress_arc;
use gig_narrative::core::config::EngineConfig;
use gig_narrative::core::faction::{faction_status, STANDING_MAX, STANDING_MIN};
use gig_narrative::core::pipeline::{EventSource, NarrativeEngine};
use gig_narrative::core::weights::calculate_event_weights;
use gig_narrative::schema::event::{Event, MaturityLevel};
use gig_narrative::schema::game::{
    EventRequest, GenerationContext, LabelDeal, Session, Venue, VenueKind,
};
use gig_narrative::schema::narrative::{ArcType, FactionId};
use gig_narrative::schema::psyche::{Metric, MetricDeltas};
use rustc_hash::FxHashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut config_path = None;
    let mut templates_dir = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(PathBuf::from(&args[i]));
            }
            "--templates" if i + 1 < args.len() => {
                i += 1;
                templates_dir = Some(PathBuf::from(&args[i]));
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => match EngineConfig::load_from_ron(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("ERROR: Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let mut current_seed = seed;
    let mut engine = match build_engine(&config, templates_dir.as_ref(), current_seed) {
        Some(engine) => engine,
        None => std::process::exit(1),
    };

    println!("Loaded {} template families", engine.templates().families.len());
    println!("Seed: {}", current_seed);
    println!("Type 'help' for commands.\n");

    let mut session = Session::new_game();
    let mut last_event: Option<Event> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("week {}> ", session.game.week);
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "event" | "gig" => {
                let request = match parts.get(1) {
                    Some(id) => EventRequest::Named(id.to_string()),
                    None => EventRequest::Random,
                };
                let context = if cmd == "gig" {
                    GenerationContext::post_gig()
                } else {
                    GenerationContext::default()
                };
                let generation = engine.generate_detailed(&request, context, &session);
                print_event(&generation.event);
                println!(
                    "  [source: {:?}, retries: {}{}]\n",
                    generation.source,
                    generation.retries,
                    if generation.shown { "" } else { ", BLOCKED" }
                );
                last_event = Some(generation.event);
            }
            "choose" => {
                let Some(event) = last_event.as_ref() else {
                    println!("No event yet. Use 'event' first.");
                    continue;
                };
                let Some(choice_id) = parts.get(1) else {
                    println!("Usage: choose <choice_id>");
                    continue;
                };
                match engine.resolve_choice(&mut session, event, choice_id) {
                    Ok(resolution) => {
                        if let Some(effects) = resolution.immediate {
                            session.game.money += effects.money;
                            session.game.fame = (session.game.fame + effects.fame).max(0);
                            println!(
                                "  money {:+}, fame {:+}, health {:+}, morale {:+}",
                                effects.money, effects.fame, effects.health, effects.band_morale
                            );
                        }
                        if let Some(trauma) = &resolution.trauma {
                            println!("  TRAUMA ({:?}): {}", trauma.severity, trauma.description);
                        }
                        if let Some(arc) = &resolution.arc {
                            println!("  arc {} -> {}", arc.arc_type.name(), arc.stage);
                        }
                        if let Some(archetype) = resolution.archetype {
                            println!("  archetype: {}", archetype.name());
                        }
                        last_event = None;
                    }
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "week" => {
                let report = engine.advance_week(&mut session);
                println!("Week {} (event chance {:.0}%)", report.week, report.event_chance * 100.0);
                for arc in &report.started_arcs {
                    println!("  storyline started: {}", arc.name());
                }
                match report.event {
                    Some(generation) => {
                        print_event(&generation.event);
                        last_event = Some(generation.event);
                    }
                    None => println!("  A quiet week."),
                }
            }
            "set" => {
                if parts.len() < 3 {
                    println!("Usage: set <field> <value>");
                    println!("  fields: week, money, fame, dark, label, venue,");
                    println!("          stress_level, addiction_risk, moral_integrity, paranoia, depression");
                    continue;
                }
                if let Err(msg) = set_field(&mut session, parts[1], parts[2]) {
                    println!("{}", msg);
                }
            }
            "faction" => {
                if parts.len() < 3 {
                    println!("Usage: faction <name> <standing>");
                    continue;
                }
                let Some(faction) = FactionId::from_name(parts[1]) else {
                    println!("Unknown faction: {}", parts[1]);
                    continue;
                };
                match parts[2].parse::<i32>() {
                    Ok(n) => {
                        let n = n.clamp(STANDING_MIN, STANDING_MAX);
                        session.narrative.faction_standings.insert(faction, n);
                        println!("{} = {} ({})", faction.name(), n, faction_status(n).name());
                    }
                    Err(_) => println!("Invalid standing: {}", parts[2]),
                }
            }
            "arc" => {
                if parts.len() < 3 {
                    println!("Usage: arc <name> <stage>");
                    continue;
                }
                let Some(arc) = ArcType::from_name(parts[1]) else {
                    println!("Unknown arc: {}", parts[1]);
                    continue;
                };
                match progress_arc(&mut session.narrative, arc, parts[2], session.game.week) {
                    Ok(instance) => println!("{} at {}", arc.name(), instance.stage),
                    Err(e) => println!("ERROR: {}", e),
                }
            }
            "filter" => {
                let Some(setting) = parts.get(1) else {
                    println!("Current: {:?}", engine.content_settings());
                    continue;
                };
                let mut settings = *engine.content_settings();
                match *setting {
                    "on" => settings.enabled = true,
                    "off" => settings.enabled = false,
                    "teen" => settings.maturity = MaturityLevel::Teen,
                    "mature" => settings.maturity = MaturityLevel::Mature,
                    other => {
                        let Some((key, value)) = other.split_once('=') else {
                            println!("Unknown filter setting: {}", other);
                            continue;
                        };
                        let value = value == "true";
                        let prefs = &mut settings.preferences;
                        match key {
                            "substance_abuse" => prefs.substance_abuse = value,
                            "sexual_content" => prefs.sexual_content = value,
                            "criminal_activity" => prefs.criminal_activity = value,
                            "psychological_themes" => prefs.psychological_themes = value,
                            "violence" => prefs.violence = value,
                            "explicit_language" => prefs.explicit_language = value,
                            _ => {
                                println!("Unknown preference: {}", key);
                                continue;
                            }
                        }
                    }
                }
                engine.set_content_settings(settings);
                println!("Filter: {:?}", settings);
            }
            "state" => {
                print_state(&session);
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", current_seed);
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        let settings = *engine.content_settings();
                        let rebuilt = build_engine(&config, templates_dir.as_ref(), s);
                        if let Some(mut rebuilt) = rebuilt {
                            rebuilt.set_content_settings(settings);
                            engine = rebuilt;
                            current_seed = s;
                            println!("Seed set to {}", current_seed);
                        }
                    }
                    Err(_) => {
                        println!("Invalid seed: {}", parts[1]);
                    }
                }
            }
            "bulk" => {
                let count: usize = match parts.get(1).map(|p| p.parse()) {
                    Some(Ok(n)) if n > 0 => n,
                    _ => {
                        println!("Usage: bulk <n>");
                        continue;
                    }
                };

                let mut by_source: FxHashMap<EventSource, usize> = FxHashMap::default();
                let mut by_kind: FxHashMap<String, usize> = FxHashMap::default();
                let mut blocked = 0;
                let mut retries = 0;

                for _ in 0..count {
                    let generation = engine.generate_detailed(
                        &EventRequest::Random,
                        GenerationContext::default(),
                        &session,
                    );
                    *by_source.entry(generation.source).or_insert(0) += 1;
                    *by_kind.entry(generation.event.kind.clone()).or_insert(0) += 1;
                    retries += generation.retries;
                    if !generation.shown {
                        blocked += 1;
                    }
                }

                println!(
                    "\n=== Bulk Generation: {} events ({} returned blocked, {} retries) ===\n",
                    count, blocked, retries
                );

                let mut sources: Vec<_> = by_source.into_iter().collect();
                sources.sort_by(|a, b| b.1.cmp(&a.1));
                println!("By source:");
                for (source, n) in &sources {
                    println!("  {:?}: {}", source, n);
                }

                let mut kinds: Vec<_> = by_kind.into_iter().collect();
                kinds.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                println!("\nUnique kinds: {}", kinds.len());
                println!("Top 10 kinds:");
                for (kind, n) in kinds.iter().take(10) {
                    println!("  {}: {}", kind, n);
                }
                println!();
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn print_usage() {
    println!("Preview: interactive shell for playing through generated events.");
    println!();
    println!("Usage: preview [--config <path>] [--templates <dir>] [--seed <n>]");
    println!();
    println!("  --config <path>    Engine config RON file (optional)");
    println!("  --templates <dir>  Directory of extra template RON files (optional)");
    println!("  --seed <n>         Initial RNG seed (default: 42)");
}

fn print_help() {
    println!("Commands:");
    println!("  event [id]            Generate an event (random, or a catalog/template id)");
    println!("  gig                   Generate a post-gig event");
    println!("  choose <choice_id>    Resolve a choice on the last event");
    println!("  week                  Advance one week");
    println!("  set <field> <value>   Change game or psychological state");
    println!("  faction <name> <n>    Set a faction standing");
    println!("  arc <name> <stage>    Start or move a storyline");
    println!("  filter <setting>      on, off, teen, mature, or <preference>=<true|false>");
    println!("  state                 Print the session");
    println!("  seed <n>              Rebuild the engine with a new seed");
    println!("  bulk <n>              Generate n events with source statistics");
    println!("  help                  Show this help");
    println!("  quit                  Exit");
}

fn build_engine(
    config: &EngineConfig,
    templates_dir: Option<&PathBuf>,
    seed: u64,
) -> Option<NarrativeEngine> {
    let mut builder = NarrativeEngine::builder().seed(seed).config(config.clone());
    if let Some(dir) = templates_dir {
        builder = builder.templates_dir(dir.clone());
    }
    match builder.build() {
        Ok(engine) => Some(engine),
        Err(e) => {
            eprintln!("ERROR: Failed to build engine: {}", e);
            None
        }
    }
}

fn set_field(session: &mut Session, field: &str, value: &str) -> Result<(), String> {
    let invalid = || format!("Invalid value for {}: {}", field, value);

    if let Some(metric) = Metric::from_name(field) {
        let target: f32 = value.parse().map_err(|_| invalid())?;
        let delta = target - session.psyche.metric(metric);
        session.psyche.update(&MetricDeltas::new().with(metric, delta));
        println!("{} = {}", metric.name(), session.psyche.metric(metric));
        return Ok(());
    }

    let game = &mut session.game;
    match field {
        "week" => game.week = value.parse().map_err(|_| invalid())?,
        "money" => game.money = value.parse().map_err(|_| invalid())?,
        "fame" => game.fame = value.parse().map_err(|_| invalid())?,
        "dark" => game.dark_scenario = value.parse().map_err(|_| invalid())?,
        "label" => {
            game.label_deal = match value {
                "none" => LabelDeal::None,
                "courted" => LabelDeal::Courted,
                "signed" => LabelDeal::Signed,
                _ => return Err(invalid()),
            }
        }
        "venue" => {
            game.venue = match value {
                "none" => None,
                kind => {
                    let kind = [
                        VenueKind::DiveBar,
                        VenueKind::Club,
                        VenueKind::Underground,
                        VenueKind::Theater,
                        VenueKind::Arena,
                        VenueKind::Festival,
                    ]
                    .into_iter()
                    .find(|k| k.name() == kind)
                    .ok_or_else(invalid)?;
                    Some(Venue {
                        name: format!("the {}", kind.name().replace('_', " ")),
                        kind,
                    })
                }
            }
        }
        _ => return Err(format!("Unknown field: {}", field)),
    }
    println!("{} set to {}", field, value);
    Ok(())
}

fn print_event(event: &Event) {
    println!("\n--- {} [{}] ---", event.title, event.id);
    println!(
        "{} | {:?} | {} | risk {:?}",
        event.category.name(),
        event.maturity,
        event
            .arc
            .as_ref()
            .map(|a| format!("{}:{}", a.arc_id.name(), a.arc_stage))
            .unwrap_or_else(|| "no arc".to_string()),
        event.risk
    );
    println!("{}", event.description);
    if let Some(character) = &event.character {
        println!("  ({}, {})", character.name, character.role);
    }
    if !event.content_warnings.is_empty() {
        println!("  warnings: {:?}", event.content_warnings);
    }
    for choice in &event.choices {
        let appeal = choice
            .appeal_boost
            .map(|b| format!(" appeal {:+}", b))
            .unwrap_or_default();
        println!("  [{}] {} ({:?}{})", choice.id, choice.text, choice.risk_level, appeal);
    }
    println!("--- End ---");
}

fn print_state(session: &Session) {
    let game = &session.game;
    println!(
        "\nWeek {} | ${} | fame {} | label {:?}",
        game.week, game.money, game.fame, game.label_deal
    );
    for metric in Metric::ALL {
        println!("  {:<16} {:>5.1}", metric.name(), session.psyche.metric(metric));
    }
    println!("  traumas: {}", session.psyche.trauma_history.len());

    let weights = calculate_event_weights(&session.psyche);
    println!(
        "  weights: substance {:.2} corruption {:.2} horror {:.2}{}",
        weights.substance,
        weights.corruption,
        weights.horror,
        if weights.pressured { "" } else { " (calm)" }
    );

    println!("Factions:");
    for faction in FactionId::ALL {
        let standing = session.narrative.standing(faction);
        println!("  {:<22} {:>4} {}", faction.name(), standing, faction_status(standing).name());
    }
    println!("Storylines:");
    if session.narrative.ongoing_storylines.is_empty() {
        println!("  none");
    }
    for arc in &session.narrative.ongoing_storylines {
        println!(
            "  {} at {} (since week {}, clean {}, relapse risk {:.0})",
            arc.arc_type.name(),
            arc.stage,
            arc.start_week,
            arc.weeks_clean,
            arc.relapse_risk
        );
    }
    match session.narrative.player_archetype.primary {
        Some(a) => println!("Archetype: {}", a.name()),
        None => println!("Archetype: undetected"),
    }
    println!();
}
