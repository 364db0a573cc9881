/// The event pipeline: session state in, one classified `Event` out.
///
/// Tiers are tried in order (arc continuation, contextual picks, weighted
/// procedural categories, templates, everyday band life). The winning draft
/// is adapted to the player's archetype and faction standings, enhanced, and
/// checked against the content filter, retrying with an explicit depth.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::arc::{check_arc_triggers, current_stage, stage_events};
use crate::core::archetype::{adapt_event_to_archetype, profile};
use crate::core::catalog::{
    build_arc_event, build_event, corruption_event, everyday_event, horror_event,
    substance_event, CatalogContext,
};
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::enhance::{enhance, ContentClassifier, KeywordClassifier};
use crate::core::faction::{
    faction, factions_at_extremes, modify_event, retain_available_choices, FactionEncounter,
};
use crate::core::filter::{block_reason, ContentSettings};
use crate::core::resolution::{resolve_choice, Resolution, ResolutionError};
use crate::core::template::{TemplateError, TemplateLibrary, FALLBACK_FAMILIES};
use crate::core::weights::{calculate_event_weights, ProceduralCategory, WeightFilters};
use crate::schema::event::{ArcTag, DraftEvent, Event};
use crate::schema::game::{
    EventRequest, GameSnapshot, GenerationContext, LabelDeal, Session, VenueKind,
};
use crate::schema::narrative::{ArcType, FactionId};
use crate::schema::psyche::PsychologicalState;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which tier produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    Named,
    Arc,
    Specific,
    Procedural,
    Template,
    Everyday,
}

/// An event plus how the pipeline got there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub event: Event,
    pub source: EventSource,
    /// Filter retries spent before this event was accepted.
    pub retries: u32,
    /// False only when the retry cap was hit and a blocked event came back anyway.
    pub shown: bool,
}

/// What happened when the calendar moved on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekReport {
    pub week: u32,
    pub started_arcs: Vec<ArcType>,
    pub event_chance: f64,
    pub event: Option<Generation>,
}

/// A contextual pick. Faction encounters are rendered from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Catalog(&'static str),
    Faction(FactionId),
}

impl Candidate {
    /// False once every event this candidate could become has been filtered.
    fn is_open(&self, blocked: &FxHashSet<String>) -> bool {
        match self {
            Candidate::Catalog(id) => !blocked.contains(*id),
            Candidate::Faction(id) => faction(*id)
                .events_generated
                .iter()
                .any(|e| !blocked.contains(e.kind)),
        }
    }
}

/// The top-level engine. Built via `NarrativeEngine::builder()`.
pub struct NarrativeEngine {
    templates: TemplateLibrary,
    classifier: Box<dyn ContentClassifier>,
    config: EngineConfig,
    rng: StdRng,
    seed: u64,
    generation_count: u64,
}

/// Builder for constructing a `NarrativeEngine`.
#[derive(Default)]
pub struct NarrativeEngineBuilder {
    seed: Option<u64>,
    config: Option<EngineConfig>,
    config_path: Option<PathBuf>,
    templates_dir: Option<PathBuf>,
    content: Option<ContentSettings>,
    /// Directly provided templates (for testing without files).
    templates: Option<TemplateLibrary>,
    classifier: Option<Box<dyn ContentClassifier>>,
}

impl NarrativeEngine {
    pub fn builder() -> NarrativeEngineBuilder {
        NarrativeEngineBuilder::default()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateLibrary {
        &self.templates
    }

    pub fn content_settings(&self) -> &ContentSettings {
        &self.config.content
    }

    pub fn set_content_settings(&mut self, settings: ContentSettings) {
        self.config.content = settings;
    }

    /// Produce one event for the session. Never fails.
    pub fn generate_event(
        &mut self,
        request: &EventRequest,
        context: GenerationContext,
        session: &Session,
    ) -> Event {
        self.generate_detailed(request, context, session).event
    }

    pub fn generate_detailed(
        &mut self,
        request: &EventRequest,
        context: GenerationContext,
        session: &Session,
    ) -> Generation {
        let mut blocked = FxHashSet::default();
        self.generate_at(request, context, session, 0, &mut blocked)
    }

    /// Move the session one week on: start any arcs whose triggers fire, then
    /// roll for this week's event.
    pub fn advance_week(&mut self, session: &mut Session) -> WeekReport {
        session.game.week += 1;
        let started_arcs = check_arc_triggers(
            &mut session.narrative,
            &session.game,
            &session.psyche,
            &mut self.rng,
        );
        let event_chance = self.weekly_event_chance(&session.game, &session.psyche);
        let event = if self.rng.gen_bool(event_chance) {
            Some(self.generate_detailed(
                &EventRequest::Random,
                GenerationContext::default(),
                &*session,
            ))
        } else {
            None
        };

        info!(
            week = session.game.week,
            started = started_arcs.len(),
            event = event.as_ref().map(|g| g.event.id.as_str()).unwrap_or("none"),
            "week advanced"
        );
        WeekReport {
            week: session.game.week,
            started_arcs,
            event_chance,
            event,
        }
    }

    /// Resolve a choice with the engine's own RNG.
    pub fn resolve_choice(
        &mut self,
        session: &mut Session,
        event: &Event,
        choice_id: &str,
    ) -> Result<Resolution, ResolutionError> {
        resolve_choice(session, event, choice_id, &mut self.rng)
    }

    /// Stress scales the chance from the floor toward the ceiling; the dark
    /// campaign adds a flat push on top.
    pub fn weekly_event_chance(&self, game: &GameSnapshot, psyche: &PsychologicalState) -> f64 {
        let floor = self.config.weekly_event_floor;
        let ceiling = self.config.weekly_event_ceiling;
        let mut pressure = (psyche.stress_level as f64 / 100.0) * 0.6;
        if game.dark_scenario {
            pressure += 0.4;
        }
        (floor + (ceiling - floor) * pressure).clamp(floor, ceiling)
    }

    fn generate_at(
        &mut self,
        request: &EventRequest,
        context: GenerationContext,
        session: &Session,
        depth: u32,
        blocked: &mut FxHashSet<String>,
    ) -> Generation {
        let ctx = CatalogContext {
            game: &session.game,
            psyche: &session.psyche,
            narrative: &session.narrative,
        };
        let cap = self.config.max_filter_retries;

        if let EventRequest::Named(id) = request {
            match self.named_draft(id, &ctx) {
                Some(draft) => {
                    let event = self.finish(draft, session);
                    if self.passes(&event, depth) {
                        return generation(event, EventSource::Named, depth, true);
                    }
                    if depth >= cap {
                        warn!(
                            kind = %event.kind,
                            depth,
                            "retry cap reached, returning blocked event"
                        );
                        return generation(event, EventSource::Named, depth, false);
                    }
                    blocked.insert(event.kind);
                    let random = EventRequest::Random;
                    return self.generate_at(&random, context, session, depth + 1, blocked);
                }
                None => {
                    warn!(id = %id, "unknown event id, generating a random event instead");
                }
            }
        }

        // Arc beats fall through to the next tiers when filtered.
        if let Some(draft) = self.arc_draft(&ctx, blocked) {
            let event = self.finish(draft, session);
            if self.passes(&event, depth) {
                return generation(event, EventSource::Arc, depth, true);
            }
            blocked.insert(event.kind);
        }

        let (draft, source) = if let Some(draft) = self.specific_draft(&ctx, context, blocked) {
            (draft, EventSource::Specific)
        } else if let Some(draft) = self.procedural_draft(&ctx, blocked) {
            (draft, EventSource::Procedural)
        } else if let Some(draft) = self.template_draft(&ctx, blocked) {
            (draft, EventSource::Template)
        } else {
            (everyday_event(&ctx, &mut self.rng), EventSource::Everyday)
        };
        debug!(kind = %draft.kind, ?source, depth, "tier selected");

        let event = self.finish(draft, session);
        if self.passes(&event, depth) {
            return generation(event, source, depth, true);
        }
        if depth >= cap {
            warn!(kind = %event.kind, depth, "retry cap reached, returning blocked event");
            return generation(event, source, depth, false);
        }
        blocked.insert(event.kind);
        self.generate_at(&EventRequest::Random, context, session, depth + 1, blocked)
    }

    fn passes(&self, event: &Event, depth: u32) -> bool {
        match block_reason(event, &self.config.content) {
            None => true,
            Some(reason) => {
                debug!(kind = %event.kind, ?reason, depth, "event filtered");
                false
            }
        }
    }

    fn named_draft(&mut self, id: &str, ctx: &CatalogContext<'_>) -> Option<DraftEvent> {
        if let Some(draft) = build_event(id, ctx, &mut self.rng) {
            return Some(draft);
        }
        self.templates.generate(id, &mut self.rng).ok()
    }

    /// First active arc whose stage has a beat left to tell.
    fn arc_draft(
        &mut self,
        ctx: &CatalogContext<'_>,
        blocked: &FxHashSet<String>,
    ) -> Option<DraftEvent> {
        for instance in &ctx.narrative.ongoing_storylines {
            let candidates: Vec<&str> = stage_events(instance.arc_type, &instance.stage)
                .iter()
                .copied()
                .filter(|id| !blocked.contains(*id))
                .collect();
            let Some(id) = candidates.choose(&mut self.rng).copied() else {
                continue;
            };
            let mut draft =
                build_arc_event(id, instance.arc_type, &instance.stage, ctx, &mut self.rng);
            draft.arc = Some(ArcTag {
                arc_id: instance.arc_type,
                arc_stage: instance.stage.clone(),
            });
            debug!(arc = instance.arc_type.name(), stage = %instance.stage, id, "arc continuation");
            return Some(draft);
        }
        None
    }

    fn specific_draft(
        &mut self,
        ctx: &CatalogContext<'_>,
        context: GenerationContext,
        blocked: &FxHashSet<String>,
    ) -> Option<DraftEvent> {
        let candidates: Vec<Candidate> = specific_candidates(ctx, context)
            .into_iter()
            .filter(|c| c.is_open(blocked))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let chance = if context.post_gig {
            self.config.specific_chance_post_gig
        } else {
            self.config.specific_chance
        };
        if !self.rng.gen_bool(chance) {
            return None;
        }

        match candidates.choose(&mut self.rng).copied()? {
            Candidate::Catalog(id) => build_event(id, ctx, &mut self.rng),
            Candidate::Faction(id) => self.faction_draft(id, ctx, blocked),
        }
    }

    /// One of the faction's own events: a catalog builder when one exists,
    /// otherwise the encounter template pinned to the faction and its topic.
    fn faction_draft(
        &mut self,
        id: FactionId,
        ctx: &CatalogContext<'_>,
        blocked: &FxHashSet<String>,
    ) -> Option<DraftEvent> {
        let definition = faction(id);
        let open: Vec<&FactionEncounter> = definition
            .events_generated
            .iter()
            .filter(|e| !blocked.contains(e.kind))
            .collect();
        let encounter = *open.choose(&mut self.rng)?;
        if let Some(draft) = build_event(encounter.kind, ctx, &mut self.rng) {
            return Some(draft);
        }

        let overrides = [
            ("faction", definition.display_name),
            ("topic", encounter.topic),
        ];
        let mut draft = self
            .templates
            .generate_with("faction_encounter", &overrides, &mut self.rng)
            .map_err(|e| warn!(faction = id.name(), error = %e, "faction encounter unavailable"))
            .ok()?;
        draft.kind = encounter.kind.to_string();
        Some(draft)
    }

    /// Weighted dark category. Categories whose event was already filtered in
    /// this call are left out of the draw.
    fn procedural_draft(
        &mut self,
        ctx: &CatalogContext<'_>,
        blocked: &FxHashSet<String>,
    ) -> Option<DraftEvent> {
        let weights = calculate_event_weights(ctx.psyche);
        let category = weights.pick_where(&mut self.rng, |c| {
            !blocked.contains(procedural_kind(c, &weights.filters))
        })?;
        let rng = &mut self.rng;
        let draft = match category {
            ProceduralCategory::Horror if weights.filters.mental_breakdown_risk => {
                build_event("panic_attack", ctx, rng)
            }
            ProceduralCategory::Substance if weights.filters.addiction_crisis_risk => {
                build_event("overdose_scare", ctx, rng)
            }
            ProceduralCategory::Substance => Some(substance_event(
                current_stage(ctx.narrative, ArcType::AddictionSpiral),
                ctx,
                rng,
            )),
            ProceduralCategory::Corruption => Some(corruption_event(
                current_stage(ctx.narrative, ArcType::CorruptionPath),
                ctx,
                rng,
            )),
            ProceduralCategory::Horror => Some(horror_event(
                current_stage(ctx.narrative, ArcType::ParanoiaDescent),
                ctx,
                rng,
            )),
        };
        debug!(category = category.name(), "procedural category");
        draft
    }

    fn template_draft(
        &mut self,
        ctx: &CatalogContext<'_>,
        blocked: &FxHashSet<String>,
    ) -> Option<DraftEvent> {
        if !self.rng.gen_bool(self.config.template_chance) {
            return None;
        }
        let open: Vec<&str> = FALLBACK_FAMILIES
            .iter()
            .copied()
            .filter(|f| !blocked.contains(*f))
            .collect();
        let family = open.choose(&mut self.rng).copied()?;
        let overrides: Vec<(&str, &str)> = match (&ctx.game.venue, family) {
            (Some(venue), "venue_incident") => vec![("venue", venue.name.as_str())],
            _ => Vec::new(),
        };
        self.templates
            .generate_with(family, &overrides, &mut self.rng)
            .map_err(|e| warn!(family, error = %e, "template family unavailable"))
            .ok()
    }

    /// Archetype appeal, faction reshaping, availability, then classification.
    fn finish(&mut self, mut draft: DraftEvent, session: &Session) -> Event {
        let narrative = &session.narrative;
        if let (true, Some(archetype)) = (
            narrative.player_archetype.detected,
            narrative.player_archetype.primary,
        ) {
            adapt_event_to_archetype(&mut draft, archetype);
        }
        modify_event(&mut draft, &session.game, &narrative.faction_standings);
        retain_available_choices(&mut draft, &narrative.faction_standings);

        let id = format!("{}_{}_{}", draft.kind, session.game.week, self.generation_count);
        self.generation_count += 1;
        enhance(draft, &*self.classifier, id)
    }
}

fn generation(event: Event, source: EventSource, retries: u32, shown: bool) -> Generation {
    Generation {
        event,
        source,
        retries,
        shown,
    }
}

/// The kind `procedural_draft` builds for a category.
fn procedural_kind(category: ProceduralCategory, filters: &WeightFilters) -> &'static str {
    match category {
        ProceduralCategory::Horror if filters.mental_breakdown_risk => "panic_attack",
        ProceduralCategory::Substance if filters.addiction_crisis_risk => "overdose_scare",
        ProceduralCategory::Substance => "substance_event",
        ProceduralCategory::Corruption => "corruption_event",
        ProceduralCategory::Horror => "horror_event",
    }
}

fn venue_event(kind: VenueKind) -> Option<&'static str> {
    match kind {
        VenueKind::DiveBar => Some("bar_fight"),
        VenueKind::Underground => Some("warehouse_raid"),
        VenueKind::Arena => Some("backstage_excess"),
        _ => None,
    }
}

/// Everything the current situation makes plausible. Repeats act as weight.
fn specific_candidates(ctx: &CatalogContext<'_>, context: GenerationContext) -> Vec<Candidate> {
    use Candidate::Catalog;

    let game = ctx.game;
    let psyche = ctx.psyche;
    let mut candidates = Vec::new();

    if game.fame > 50 {
        candidates.push(Catalog("paparazzi_ambush"));
    }
    if game.fame > 80 {
        candidates.push(Catalog("stalker_fan"));
    }
    if game.money < 100 {
        candidates.push(Catalog("loan_shark"));
    }
    if game.money > 5000 {
        candidates.push(Catalog("shady_investor"));
    }
    if game.week > 10 {
        candidates.push(Catalog("bandmate_burnout"));
    }
    match game.label_deal {
        LabelDeal::Signed => candidates.push(Catalog("label_pressure_to_sellout")),
        LabelDeal::None | LabelDeal::Courted if game.fame > 30 => {
            candidates.push(Catalog("predatory_contract"))
        }
        _ => {}
    }

    if psyche.stress_level > 70.0 {
        candidates.push(Catalog("panic_attack"));
    }
    if psyche.depression > 60.0 {
        candidates.push(Catalog("dark_night"));
    }
    if psyche.paranoia > 60.0 {
        candidates.push(Catalog("van_followed"));
    }

    candidates.extend(
        factions_at_extremes(&ctx.narrative.faction_standings)
            .into_iter()
            .map(Candidate::Faction),
    );

    let player = &ctx.narrative.player_archetype;
    if let (true, Some(archetype)) = (player.detected, player.primary) {
        candidates.extend(profile(archetype).event_magnets.iter().copied().map(Catalog));
    }

    if let Some(id) = game.venue.as_ref().and_then(|v| venue_event(v.kind)) {
        let weight = if context.post_gig { 3 } else { 1 };
        candidates.extend(std::iter::repeat(Catalog(id)).take(weight));
    }

    candidates
}

impl NarrativeEngineBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the engine config from a RON file at build time.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Merge every `.ron` template file in `path` over the built-in families.
    pub fn templates_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(path.into());
        self
    }

    pub fn content_settings(mut self, settings: ContentSettings) -> Self {
        self.content = Some(settings);
        self
    }

    /// Provide templates directly (for testing without files). Replaces the built-ins.
    pub fn with_templates(mut self, templates: TemplateLibrary) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_classifier(mut self, classifier: impl ContentClassifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn build(self) -> Result<NarrativeEngine, PipelineError> {
        let mut config = match (self.config, &self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => EngineConfig::load_from_ron(path)?,
            (None, None) => EngineConfig::default(),
        };
        if let Some(content) = self.content {
            config.content = content;
        }

        let mut templates = match self.templates {
            Some(templates) => templates,
            None => TemplateLibrary::builtin()?,
        };
        for path in &config.template_files {
            templates.merge(TemplateLibrary::load_from_ron(path)?);
        }
        if let Some(ref dir) = self.templates_dir {
            if dir.exists() {
                load_ron_files_from_dir(dir, |path| {
                    templates.merge(TemplateLibrary::load_from_ron(path)?);
                    Ok(())
                })?;
            }
        }

        let seed = self.seed.or(config.seed).unwrap_or_else(rand::random);
        debug!(seed, families = templates.families.len(), "engine built");

        Ok(NarrativeEngine {
            templates,
            classifier: self
                .classifier
                .unwrap_or_else(|| Box::new(KeywordClassifier)),
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
            generation_count: 0,
        })
    }
}

/// Load all .ron files from a directory in name order, calling `loader` for each.
fn load_ron_files_from_dir<F>(dir: &Path, mut loader: F) -> Result<(), PipelineError>
where
    F: FnMut(&Path) -> Result<(), PipelineError>,
{
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("ron") {
            paths.push(path);
        }
    }
    paths.sort();
    for path in paths {
        loader(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::ContentPreferences;
    use crate::schema::event::MaturityLevel;
    use crate::schema::game::Venue;

    fn engine(config: EngineConfig) -> NarrativeEngine {
        NarrativeEngine::builder().seed(42).config(config).build().unwrap()
    }

    fn quiet_config() -> EngineConfig {
        EngineConfig {
            specific_chance: 0.0,
            specific_chance_post_gig: 0.0,
            template_chance: 0.0,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn builder_with_seed() {
        let engine = NarrativeEngine::builder().seed(12345).build().unwrap();
        assert_eq!(engine.seed(), 12345);
        assert_eq!(engine.config().max_filter_retries, 5);
        assert!(engine.templates().family("venue_incident").is_some());
    }

    #[test]
    fn config_seed_used_when_builder_has_none() {
        let config = EngineConfig {
            seed: Some(9),
            ..EngineConfig::default()
        };
        let engine = NarrativeEngine::builder().config(config).build().unwrap();
        assert_eq!(engine.seed(), 9);
    }

    #[test]
    fn calm_band_still_draws_procedural_events() {
        let mut engine = engine(quiet_config());
        let session = Session::new_game();
        let mut kinds = FxHashSet::default();
        for _ in 0..30 {
            let generation = engine.generate_detailed(
                &EventRequest::Random,
                GenerationContext::default(),
                &session,
            );
            assert_eq!(generation.source, EventSource::Procedural);
            assert!(generation.shown);
            kinds.insert(generation.event.kind);
        }
        // base weights are even, so thirty draws reach every category
        for kind in ["substance_event", "corruption_event", "horror_event"] {
            assert!(kinds.contains(kind), "never drew {}", kind);
        }
    }

    #[test]
    fn blocked_named_request_retries_as_random() {
        let mut config = quiet_config();
        config.content = ContentSettings {
            enabled: true,
            maturity: MaturityLevel::Teen,
            preferences: ContentPreferences::default(),
        };
        let mut engine = engine(config);
        let session = Session::new_game();
        let generation = engine.generate_detailed(
            &EventRequest::Named("loan_shark".to_string()),
            GenerationContext::default(),
            &session,
        );
        // the loan and all three procedural kinds are filtered before band life gets through
        assert_eq!(generation.source, EventSource::Everyday);
        assert_eq!(generation.retries, 4);
        assert!(generation.shown);
    }

    #[test]
    fn ids_are_unique_within_a_session() {
        let mut engine = engine(EngineConfig::default());
        let session = Session::new_game();
        let mut seen = FxHashSet::default();
        for _ in 0..50 {
            let event = engine.generate_event(
                &EventRequest::Random,
                GenerationContext::default(),
                &session,
            );
            assert!(event.id.starts_with(&event.kind));
            assert!(seen.insert(event.id));
        }
    }

    #[test]
    fn named_requests_are_honored() {
        let mut engine = engine(EngineConfig::default());
        let session = Session::new_game();
        let generation = engine.generate_detailed(
            &EventRequest::Named("loan_shark".to_string()),
            GenerationContext::default(),
            &session,
        );
        assert_eq!(generation.source, EventSource::Named);
        assert_eq!(generation.event.kind, "loan_shark");

        let template = engine.generate_event(
            &EventRequest::Named("moral_crossroads".to_string()),
            GenerationContext::default(),
            &session,
        );
        assert_eq!(template.kind, "moral_crossroads");
    }

    #[test]
    fn unknown_name_falls_back_to_random() {
        let mut engine = engine(quiet_config());
        let session = Session::new_game();
        let generation = engine.generate_detailed(
            &EventRequest::Named("no_such_event".to_string()),
            GenerationContext::default(),
            &session,
        );
        assert_eq!(generation.source, EventSource::Procedural);
        assert_eq!(generation.retries, 0);
    }

    #[test]
    fn post_gig_venue_events() {
        let config = EngineConfig {
            specific_chance_post_gig: 1.0,
            ..quiet_config()
        };
        let mut engine = engine(config);
        let mut session = Session::new_game();
        session.game.venue = Some(Venue {
            name: "The Pit".to_string(),
            kind: VenueKind::DiveBar,
        });
        let generation = engine.generate_detailed(
            &EventRequest::Random,
            GenerationContext::post_gig(),
            &session,
        );
        assert_eq!(generation.source, EventSource::Specific);
        assert_eq!(generation.event.kind, "bar_fight");
    }

    #[test]
    fn enemy_faction_can_come_knocking() {
        let config = EngineConfig {
            specific_chance: 1.0,
            ..quiet_config()
        };
        let mut engine = engine(config);
        let mut session = Session::new_game();
        session
            .narrative
            .faction_standings
            .insert(FactionId::MusicIndustry, -90);
        let label = faction(FactionId::MusicIndustry);
        let mut kinds = FxHashSet::default();
        for _ in 0..20 {
            let generation = engine.generate_detailed(
                &EventRequest::Random,
                GenerationContext::default(),
                &session,
            );
            assert_eq!(generation.source, EventSource::Specific);
            let event = generation.event;
            let encounter = label
                .events_generated
                .iter()
                .find(|e| e.kind == event.kind)
                .unwrap_or_else(|| panic!("{} is not a label event", event.kind));
            if event.kind == "sync_deal_offer" {
                assert!(event.description.contains(label.display_name));
                assert!(event.description.contains(encounter.topic));
            }
            kinds.insert(event.kind);
        }
        assert!(kinds.contains("label_showcase"));
        assert!(kinds.contains("sync_deal_offer"));
    }

    #[test]
    fn blocked_arc_beat_falls_through() {
        let mut config = quiet_config();
        config.content = ContentSettings {
            enabled: true,
            maturity: MaturityLevel::Teen,
            preferences: ContentPreferences::default(),
        };
        let mut engine = engine(config);
        let mut session = Session::new_game();
        crate::core::arc::progress_arc(
            &mut session.narrative,
            ArcType::AddictionSpiral,
            "rock_bottom",
            1,
        )
        .unwrap();

        let generation = engine.generate_detailed(
            &EventRequest::Random,
            GenerationContext::default(),
            &session,
        );
        // both beats and all three procedural categories are filtered first
        assert_eq!(generation.source, EventSource::Everyday);
        assert_eq!(generation.retries, 3);
        assert!(generation.event.arc.is_none());
        assert!(generation.shown);
    }

    #[test]
    fn weekly_chance_is_bounded() {
        let engine = engine(EngineConfig::default());
        let mut game = GameSnapshot::default();
        let mut psyche = PsychologicalState::default();
        assert!((engine.weekly_event_chance(&game, &psyche) - 0.3).abs() < 1e-9);

        psyche.stress_level = 100.0;
        game.dark_scenario = true;
        assert!((engine.weekly_event_chance(&game, &psyche) - 0.8).abs() < 1e-9);

        game.dark_scenario = false;
        let mid = engine.weekly_event_chance(&game, &psyche);
        assert!(mid > 0.3 && mid < 0.8);
    }

    #[test]
    fn advance_week_moves_the_clock() {
        let mut engine = engine(EngineConfig::default());
        let mut session = Session::new_game();
        let report = engine.advance_week(&mut session);
        assert_eq!(report.week, 2);
        assert_eq!(session.game.week, 2);
        // a calm week-2 band meets no arc trigger
        assert!(report.started_arcs.is_empty());
    }
}
