//! WASM bindings for gig-narrative. Every value crosses the boundary as JSON.

use wasm_bindgen::prelude::*;

use gig_narrative::core::catalog::CATALOG_IDS;
use gig_narrative::core::filter::ContentSettings;
use gig_narrative::core::pipeline::NarrativeEngine;
use gig_narrative::schema::event::Event;
use gig_narrative::schema::game::{EventRequest, GameSnapshot, GenerationContext, Session};

#[derive(serde::Deserialize, Default)]
struct GenerateInput {
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    post_gig: bool,
}

fn js_err(what: &str, e: impl std::fmt::Display) -> JsError {
    JsError::new(&format!("{what}: {e}"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| js_err("Serialization error", e))
}

// ---------------------------------------------------------------------------
// GigSession: one engine plus one play session
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct GigSession {
    engine: NarrativeEngine,
    session: Session,
}

#[wasm_bindgen]
impl GigSession {
    /// Start a new game with the given seed.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<GigSession, JsError> {
        let engine = NarrativeEngine::builder()
            .seed(seed)
            .build()
            .map_err(|e| js_err("Engine build error", e))?;
        Ok(GigSession {
            engine,
            session: Session::new_game(),
        })
    }

    /// Generate an event. Input shape: `{"event_id": "loan_shark", "post_gig": true}`,
    /// both fields optional.
    pub fn generate(&mut self, input_json: &str) -> Result<String, JsError> {
        let input: GenerateInput = if input_json.trim().is_empty() {
            GenerateInput::default()
        } else {
            serde_json::from_str(input_json).map_err(|e| js_err("Invalid input JSON", e))?
        };
        let request = input
            .event_id
            .map(EventRequest::Named)
            .unwrap_or_default();
        let context = GenerationContext {
            post_gig: input.post_gig,
        };
        let generation = self
            .engine
            .generate_detailed(&request, context, &self.session);
        to_json(&generation)
    }

    /// Apply a choice from an event previously returned by `generate`.
    pub fn resolve(&mut self, event_json: &str, choice_id: &str) -> Result<String, JsError> {
        let event: Event =
            serde_json::from_str(event_json).map_err(|e| js_err("Invalid event JSON", e))?;
        let resolution = self
            .engine
            .resolve_choice(&mut self.session, &event, choice_id)
            .map_err(|e| js_err("Resolution error", e))?;
        to_json(&resolution)
    }

    pub fn advance_week(&mut self) -> Result<String, JsError> {
        let report = self.engine.advance_week(&mut self.session);
        to_json(&report)
    }

    /// Replace the game snapshot (week, money, fame, venue, label deal).
    pub fn set_game(&mut self, game_json: &str) -> Result<(), JsError> {
        let game: GameSnapshot =
            serde_json::from_str(game_json).map_err(|e| js_err("Invalid game JSON", e))?;
        self.session.game = game;
        Ok(())
    }

    pub fn set_content_settings(&mut self, settings_json: &str) -> Result<(), JsError> {
        let settings: ContentSettings = serde_json::from_str(settings_json)
            .map_err(|e| js_err("Invalid content settings JSON", e))?;
        self.engine.set_content_settings(settings);
        Ok(())
    }

    /// The full session as JSON, for saving.
    pub fn state(&self) -> Result<String, JsError> {
        to_json(&self.session)
    }

    pub fn load_state(&mut self, state_json: &str) -> Result<(), JsError> {
        self.session =
            serde_json::from_str(state_json).map_err(|e| js_err("Invalid state JSON", e))?;
        Ok(())
    }

    /// Return JSON array of catalog event ids accepted by `generate`.
    pub fn event_ids() -> String {
        serde_json::to_string(CATALOG_IDS).unwrap_or_else(|_| "[]".to_string())
    }

    /// Return JSON array of template family names, also accepted by `generate`.
    pub fn template_families(&self) -> String {
        serde_json::to_string(&self.engine.templates().names())
            .unwrap_or_else(|_| "[]".to_string())
    }
}
