//! Input box, suggestion panel and lookup wired together the way the
//! dashboard's search card drives them.

use std::sync::Arc;

use crate::{
    Config, DashboardError,
    backend::{WeatherBackend, backend_from_config},
    controller::WeatherSearchController,
    suggest::{SuggestSettings, SuggestionEngine},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

#[derive(Debug)]
pub struct Dashboard {
    input: String,
    suggestions: SuggestionEngine,
    controller: WeatherSearchController,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn WeatherBackend>, settings: SuggestSettings) -> Self {
        Self {
            input: String::new(),
            suggestions: SuggestionEngine::new(Arc::clone(&backend), settings),
            controller: WeatherSearchController::new(backend),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend = backend_from_config(config)?;
        Ok(Self::new(backend, SuggestSettings::from(config)))
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    pub fn controller(&self) -> &WeatherSearchController {
        &self.controller
    }

    /// Replace the input text and schedule an autocomplete lookup.
    pub fn type_text(&mut self, text: &str) {
        self.input = text.to_string();
        self.suggestions.on_query_changed(text);
    }

    /// Enter hides the panel and searches the typed text; Escape only hides the panel.
    pub async fn press(&mut self, key: Key) -> Result<(), DashboardError> {
        self.suggestions.dismiss();
        match key {
            Key::Enter => self.controller.submit(&self.input).await,
            Key::Escape => Ok(()),
        }
    }

    pub fn blur(&mut self) {
        self.suggestions.dismiss();
    }

    /// Pick a suggestion from the panel and look it up. Returns `false` when
    /// nothing was shown at `index`.
    pub async fn select(&mut self, index: usize) -> Result<bool, DashboardError> {
        let Some(chosen) = self.suggestions.select(index) else {
            return Ok(false);
        };

        self.input = chosen.name.clone();
        self.controller.select_suggestion(&chosen).await?;
        Ok(true)
    }
}
