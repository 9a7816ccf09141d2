//! The application controller: owns session state and exposes the operations
//! the presentation layer calls.
//!
//! Locks are held only for synchronous sections. When both are needed they are
//! taken in the order `state` then `breath`.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::breath::{BreathSession, BreathSink, PulseFrame};
use crate::insight::{
    GeminiProvider, InsightCoordinator, InsightProvider, InsightRequest, RequestState,
};
use crate::lists;
use crate::locale::{LocaleTable, PhaseCue};
use crate::state::{load_locale, AppState};
use crate::symbol::normalize_symbol;
use crate::transition::{Stage, TransitionTicket};
use crate::types::{
    BreathPhase, CoherenceValues, Config, Insight, Language, ListKind, ManifestationState,
    ModeFlags,
};

/// Everything the presentation layer renders, in one serializable value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: ManifestationState,
    pub coherence: CoherenceValues,
    pub insight: Option<Insight>,
    pub flags: ModeFlags,
    pub language: Language,
    /// Present only while meditating.
    pub breath: Option<PhaseCue>,
    pub pulse: Option<PulseFrame>,
}

pub struct AppController {
    config: Config,
    locale: Arc<LocaleTable>,
    state: Mutex<AppState>,
    coordinator: InsightCoordinator,
    breath: Mutex<Option<BreathSession>>,
    breath_sink: Mutex<Option<Arc<dyn BreathSink>>>,
    transition_timer: Mutex<Option<JoinHandle<()>>>,
}

impl AppController {
    pub fn new(config: Config, locale: LocaleTable, provider: Arc<dyn InsightProvider>) -> Self {
        let locale = Arc::new(locale);
        let timeout = config.insight.timeout_secs.map(Duration::from_secs);
        let state = AppState::seeded(config.language, &locale);
        Self {
            coordinator: InsightCoordinator::new(provider, locale.clone(), timeout),
            state: Mutex::new(state),
            locale,
            config,
            breath: Mutex::new(None),
            breath_sink: Mutex::new(None),
            transition_timer: Mutex::new(None),
        }
    }

    /// Controller backed by the Gemini provider and the configured locale.
    pub fn from_config(config: Config) -> Self {
        let locale = load_locale(&config);
        let provider = Arc::new(GeminiProvider::new(&config.insight));
        if config.insight.resolved_api_key().is_none() {
            log::warn!("No Gemini API key configured; insights will use the fallback");
        }
        Self::new(config, locale, provider)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Receiver for breath updates of every future meditation session.
    pub fn set_breath_sink(&self, sink: Arc<dyn BreathSink>) {
        *self.breath_sink.lock() = Some(sink);
    }

    // -------------------------------------------------------------------------
    // Lists and symbol
    // -------------------------------------------------------------------------

    /// Append to a list. Blank text is ignored (`None`).
    pub fn add_item(&self, kind: ListKind, text: &str) -> Option<String> {
        let mut state = self.state.lock();
        let id = lists::add_item(state.manifestation.list_mut(kind), text)?;
        state.recompute_coherence();
        log::debug!(
            "Added {:?} item {} (brain {:.1}, heart {:.1})",
            kind,
            id,
            state.coherence.brain,
            state.coherence.heart
        );
        Some(id)
    }

    /// Remove by id. Unknown ids are a no-op.
    pub fn remove_item(&self, kind: ListKind, id: &str) -> bool {
        let mut state = self.state.lock();
        if !lists::remove_item(state.manifestation.list_mut(kind), id) {
            return false;
        }
        state.recompute_coherence();
        true
    }

    /// Normalize and store the symbol. Blank input keeps the old one (`None`).
    pub fn set_symbol(&self, input: &str) -> Option<String> {
        let symbol = normalize_symbol(input)?;
        self.state.lock().manifestation.potential_symbol = symbol.clone();
        Some(symbol)
    }

    pub fn set_language(&self, language: Language) {
        let mut state = self.state.lock();
        if state.language != language {
            log::info!("Language -> {}", language.tag());
            state.language = language;
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    pub fn language(&self) -> Language {
        self.state.lock().language
    }

    pub fn manifestation(&self) -> ManifestationState {
        self.state.lock().manifestation.clone()
    }

    pub fn coherence(&self) -> CoherenceValues {
        self.state.lock().coherence
    }

    pub fn insight(&self) -> Option<Insight> {
        self.state.lock().insight.clone()
    }

    pub fn request_state(&self) -> RequestState {
        self.coordinator.state()
    }

    pub fn mode_flags(&self) -> ModeFlags {
        let state = self.state.lock();
        ModeFlags {
            is_meditating: state.transition.is_meditating(),
            is_transitioning: state.transition.is_transitioning(),
            is_loading_insight: self.coordinator.is_loading(),
        }
    }

    pub fn breath_phase(&self) -> Option<BreathPhase> {
        self.breath.lock().as_ref().map(BreathSession::phase)
    }

    pub fn phase_cue(&self, phase: BreathPhase) -> PhaseCue {
        self.locale.phase_cue(self.language(), phase)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        let breath = self.breath.lock();
        let session = breath.as_ref();
        Snapshot {
            state: state.manifestation.clone(),
            coherence: state.coherence,
            insight: state.insight.clone(),
            flags: ModeFlags {
                is_meditating: state.transition.is_meditating(),
                is_transitioning: state.transition.is_transitioning(),
                is_loading_insight: self.coordinator.is_loading(),
            },
            language: state.language,
            breath: session.map(|s| self.locale.phase_cue(state.language, s.phase())),
            pulse: session.map(BreathSession::pulse),
        }
    }

    // -------------------------------------------------------------------------
    // Insight
    // -------------------------------------------------------------------------

    /// Ask the provider for an insight and blend it into coherence.
    ///
    /// `None` when a request is already outstanding. Otherwise always
    /// `Some`: provider failures come back as the locale fallback.
    pub async fn request_insight(&self) -> Option<Insight> {
        let request = {
            let state = self.state.lock();
            InsightRequest::from_state(
                &state.manifestation,
                state.language,
                self.locale.strings(state.language),
            )
        };

        self.coordinator
            .request(request, |insight| {
                let mut state = self.state.lock();
                state.coherence = state.coherence.blend(insight);
                state.insight = Some(insight.clone());
            })
            .await
    }

    // -------------------------------------------------------------------------
    // Meditation overlay
    // -------------------------------------------------------------------------

    /// Start the entry transition; meditation begins when it expires.
    /// Ignored (false) unless idle.
    pub fn enter_meditation(self: &Arc<Self>) -> bool {
        let Some(ticket) = self.state.lock().transition.begin() else {
            return false;
        };

        let delay = Duration::from_millis(self.config.meditation.transition_ms);
        let controller: Weak<Self> = Arc::downgrade(self);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(controller) = controller.upgrade() {
                controller.finish_transition(ticket);
            }
        });
        if let Some(stale) = self.transition_timer.lock().replace(timer) {
            stale.abort();
        }
        log::info!("Meditation: transition started ({}ms)", delay.as_millis());
        true
    }

    fn finish_transition(&self, ticket: TransitionTicket) -> bool {
        let mut state = self.state.lock();
        if !state.transition.complete(ticket) {
            return false;
        }
        let sink = self.breath_sink.lock().clone();
        let mut breath = self.breath.lock();
        *breath = Some(BreathSession::start(self.config.meditation, sink));
        log::info!("Meditation: overlay active");
        true
    }

    /// Close the overlay (or abandon the transition) and stop its drivers.
    pub fn exit_meditation(&self) -> bool {
        let mut state = self.state.lock();
        let previous = state.transition.exit();
        if let Some(timer) = self.transition_timer.lock().take() {
            timer.abort();
        }
        if let Some(mut session) = self.breath.lock().take() {
            session.stop();
        }
        drop(state);
        log::info!("Meditation: closed from {:?}", previous);
        previous != Stage::Idle
    }
}
