/// Tour Season example: one band, sixteen weeks on the road.
///
/// Every week the calendar advances and may throw an event at the band. Every
/// fourth week they play a gig and the venue gets a chance to cause trouble.
/// The band alternates between playing it safe and chasing the rush, which is
/// enough to push stress up and let storylines start on their own.
///
/// Run with: cargo run --example tour_season

use gig_narrative::core::pipeline::NarrativeEngine;
use gig_narrative::schema::event::{Event, RiskLevel};
use gig_narrative::schema::game::{EventRequest, GenerationContext, Session, Venue, VenueKind};
use gig_narrative::schema::narrative::FactionId;

const WEEKS: u32 = 16;

fn main() {
    let mut engine = NarrativeEngine::builder()
        .seed(1977)
        .build()
        .expect("Failed to build engine");

    let mut session = Session::new_game();
    session.game.fame = 25;

    let venues = [
        Venue { name: "The Rusty Nail".to_string(), kind: VenueKind::DiveBar },
        Venue { name: "Basement 13".to_string(), kind: VenueKind::Underground },
        Venue { name: "The Orpheum".to_string(), kind: VenueKind::Theater },
        Venue { name: "Civic Arena".to_string(), kind: VenueKind::Arena },
    ];

    println!("=== Tour Season (seed {}) ===\n", engine.seed());

    for _ in 0..WEEKS {
        let report = engine.advance_week(&mut session);
        let week = report.week;
        println!("--- Week {} (event chance {:.0}%) ---", week, report.event_chance * 100.0);

        for arc in &report.started_arcs {
            println!("  A storyline begins: {}", arc.name());
        }

        let mut events: Vec<Event> = report.event.into_iter().map(|g| g.event).collect();

        if week % 4 == 0 {
            let venue = venues[(week / 4 - 1) as usize % venues.len()].clone();
            println!("  Gig night at {}.", venue.name);
            session.game.venue = Some(venue);
            session.game.fame += 5;
            events.push(engine.generate_event(
                &EventRequest::Random,
                GenerationContext::post_gig(),
                &session,
            ));
        }

        if events.is_empty() {
            println!("  A quiet week of rehearsals.");
        }

        for event in events {
            play(&mut engine, &mut session, &event, week % 2 == 0);
        }
        println!();
    }

    print_summary(&session);
}

/// Reckless weeks take the riskiest option, cautious weeks the safest.
fn play(engine: &mut NarrativeEngine, session: &mut Session, event: &Event, reckless: bool) {
    println!("  [{}] {}", event.category.name(), event.title);
    println!("    {}", event.description);

    let pick = if reckless {
        event.choices.iter().max_by_key(|c| c.risk_level)
    } else {
        event.choices.iter().min_by_key(|c| c.risk_level)
    };
    let Some(choice) = pick else {
        return;
    };

    println!("    > {}", choice.text);
    match engine.resolve_choice(session, event, &choice.id) {
        Ok(resolution) => {
            if let Some(effects) = resolution.immediate {
                session.game.money += effects.money;
                session.game.fame = (session.game.fame + effects.fame).max(0);
            }
            if let Some(trauma) = resolution.trauma {
                println!("    It leaves a mark: {}", trauma.description);
            }
            if let Some(arc) = resolution.arc {
                println!("    {} moves to {}", arc.arc_type.name(), arc.stage);
            }
        }
        Err(e) => println!("    (could not resolve: {})", e),
    }

    if choice.risk_level >= RiskLevel::High {
        println!("    The crowd loved it. The band is less sure.");
    }
}

fn print_summary(session: &Session) {
    let psyche = &session.psyche;
    println!("=== End of Season ===");
    println!("Money: ${}  Fame: {}", session.game.money, session.game.fame);
    println!(
        "Stress {:.0}, addiction risk {:.0}, integrity {:.0}, paranoia {:.0}, depression {:.0}",
        psyche.stress_level,
        psyche.addiction_risk,
        psyche.moral_integrity,
        psyche.paranoia,
        psyche.depression
    );
    println!("Traumas: {}", psyche.trauma_history.len());

    println!("Factions:");
    for faction in FactionId::ALL {
        println!("  {}: {}", faction.name(), session.narrative.standing(faction));
    }

    println!("Storylines:");
    for arc in &session.narrative.ongoing_storylines {
        println!("  {} at {}", arc.arc_type.name(), arc.stage);
    }

    match session.narrative.player_archetype.primary {
        Some(archetype) => println!("The band plays like a {}.", archetype.name()),
        None => println!("The band hasn't settled into a type yet."),
    }
}
