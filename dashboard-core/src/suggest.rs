//! Debounced autocomplete.
//!
//! Each keystroke re-arms a single owned timer task. When the timer fires the
//! query is sent to the backend; the response is applied only if no newer
//! keystroke, selection or dismissal has happened since (generation check).
//! Failures are swallowed: autocomplete is a convenience, not a user-visible
//! error path.
//!
//! Methods that arm a timer must be called from within a tokio runtime.

use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{Config, backend::WeatherBackend, model::Suggestion};

/// Lifecycle of the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    Idle,
    /// Timer armed, waiting for the quiet period to pass.
    Pending,
    /// Timer fired, request in flight.
    Fetching,
    /// Non-empty list on screen.
    Shown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self { debounce: Duration::from_millis(300), min_query_chars: 2 }
    }
}

impl From<&Config> for SuggestSettings {
    fn from(config: &Config) -> Self {
        Self { debounce: config.debounce(), min_query_chars: config.min_query_chars }
    }
}

#[derive(Debug)]
struct Panel {
    phase: SuggestionPhase,
    visible: bool,
    suggestions: Vec<Suggestion>,
    /// Bumped on every keystroke, selection and dismissal.
    generation: u64,
}

impl Panel {
    fn hide(&mut self) {
        self.phase = SuggestionPhase::Idle;
        self.visible = false;
        self.suggestions.clear();
    }
}

#[derive(Debug)]
pub struct SuggestionEngine {
    backend: Arc<dyn WeatherBackend>,
    settings: SuggestSettings,
    panel: Arc<Mutex<Panel>>,
    timer: Option<JoinHandle<()>>,
}

impl SuggestionEngine {
    pub fn new(backend: Arc<dyn WeatherBackend>, settings: SuggestSettings) -> Self {
        Self {
            backend,
            settings,
            panel: Arc::new(Mutex::new(Panel {
                phase: SuggestionPhase::Idle,
                visible: false,
                suggestions: Vec::new(),
                generation: 0,
            })),
            timer: None,
        }
    }

    pub fn settings(&self) -> SuggestSettings {
        self.settings
    }

    /// React to the input text changing.
    ///
    /// Short queries hide the panel immediately. Longer ones arm the debounce
    /// timer, cancelling whichever timer was armed before.
    pub fn on_query_changed(&mut self, query: &str) {
        let generation = {
            let mut panel = self.panel.lock();
            cancel_timer(&mut self.timer, panel.phase);
            panel.generation += 1;

            if query.chars().count() < self.settings.min_query_chars {
                panel.hide();
                return;
            }

            panel.phase = SuggestionPhase::Pending;
            panel.generation
        };

        let backend = Arc::clone(&self.backend);
        let panel = Arc::clone(&self.panel);
        let query = query.to_string();
        let delay = self.settings.debounce;

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lookup(backend, panel, query, generation).await;
        }));
    }

    /// The list currently on screen; empty while the panel is hidden.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        let panel = self.panel.lock();
        if panel.visible { panel.suggestions.clone() } else { Vec::new() }
    }

    pub fn is_visible(&self) -> bool {
        self.panel.lock().visible
    }

    pub fn phase(&self) -> SuggestionPhase {
        self.panel.lock().phase
    }

    /// Hide the panel and ignore any response still on its way.
    pub fn dismiss(&mut self) {
        let mut panel = self.panel.lock();
        cancel_timer(&mut self.timer, panel.phase);
        panel.generation += 1;
        panel.hide();
    }

    /// Take the suggestion at `index` from the visible list, hiding the panel.
    pub fn select(&mut self, index: usize) -> Option<Suggestion> {
        let mut panel = self.panel.lock();
        if !panel.visible {
            return None;
        }
        let chosen = panel.suggestions.get(index).cloned()?;

        cancel_timer(&mut self.timer, panel.phase);
        panel.generation += 1;
        panel.hide();
        Some(chosen)
    }
}

/// Abort an armed timer. A request already in flight is left to finish; the
/// generation bump that accompanies every call makes its result stale.
fn cancel_timer(timer: &mut Option<JoinHandle<()>>, phase: SuggestionPhase) {
    if let Some(handle) = timer.take() {
        if phase == SuggestionPhase::Pending {
            handle.abort();
        }
    }
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }
}

async fn lookup(
    backend: Arc<dyn WeatherBackend>,
    panel: Arc<Mutex<Panel>>,
    query: String,
    generation: u64,
) {
    {
        let mut panel = panel.lock();
        if panel.generation != generation {
            return;
        }
        panel.phase = SuggestionPhase::Fetching;
    }

    debug!(query = %query, generation, "Fetching suggestions");
    let result = backend.suggestions(&query).await;

    let mut panel = panel.lock();
    if panel.generation != generation {
        debug!(query = %query, generation, latest = panel.generation, "Discarding stale suggestions");
        return;
    }

    match result {
        Ok(list) if !list.is_empty() => {
            panel.suggestions = list;
            panel.phase = SuggestionPhase::Shown;
            panel.visible = true;
        }
        Ok(_) => panel.hide(),
        Err(e) => {
            debug!(query = %query, error = %e, "Suggestion lookup failed");
            panel.hide();
        }
    }
}
