//! Gig Narrative: procedural narrative events for a band-management game.
//!
//! Tracks a band's psychological state, multi-stage storylines, faction
//! standings and behavioral archetype, and decides which event the player
//! sees next and how its choices play out.

pub mod core;
pub mod schema;

pub use crate::core::config::EngineConfig;
pub use crate::core::filter::{ContentPreferences, ContentSettings};
pub use crate::core::pipeline::{EventSource, Generation, NarrativeEngine, WeekReport};
pub use crate::schema::event::Event;
pub use crate::schema::game::{EventRequest, GameSnapshot, GenerationContext, Session};
