//! Errors raised while building the simulation
//!
//! Ticking never fails. Everything that can go wrong is caught when bodies,
//! settings or the world are constructed.

/// Simulation construction error
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    #[error("Failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("Failed to read settings file {path}: {source}")]
    SettingsIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}
