use thiserror::Error;

/// Message shown when the backend reports no match without its own text.
pub const CITY_NOT_FOUND_MESSAGE: &str = "City not found. Please try again.";

/// Message shown for any network or decoding failure on the weather path.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

/// Message shown when a successful response is missing required fields.
pub const INCOMPLETE_DATA_MESSAGE: &str = "Weather data was incomplete. Please try again.";

/// Failures on the lookup paths.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// Search text was empty or whitespace; rejected before any fetch.
    #[error("Search text is empty")]
    Validation,

    /// Backend reported no match, optionally with its own message.
    #[error("Not found: {}", .0.as_deref().unwrap_or("no message"))]
    NotFound(Option<String>),

    /// Network, status or decoding failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Successful response without a required field.
    #[error("Malformed weather data: {0}")]
    DataShape(String),
}

impl DashboardError {
    /// Text the dashboard displays in its error state.
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::NotFound(Some(message)) if !message.is_empty() => message.clone(),
            DashboardError::NotFound(_) | DashboardError::Validation => {
                CITY_NOT_FOUND_MESSAGE.to_string()
            }
            DashboardError::Transport(_) => FETCH_FAILED_MESSAGE.to_string(),
            DashboardError::DataShape(_) => INCOMPLETE_DATA_MESSAGE.to_string(),
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        DashboardError::DataShape(format!("missing field `{field}`"))
    }
}
