//! Error type shared by the model, the persistence layer and the session.

use thiserror::Error;

/// Failures a single user interaction can end with.
#[derive(Error, Debug)]
pub enum Error {
    /// A form field was empty, not a number, not finite, or not positive.
    #[error("invalid {field}: {value:?} is not a positive number")]
    InvalidInput {
        /// Name of the offending form field.
        field: &'static str,
        /// The raw text the user entered.
        value: String,
    },

    /// The form was submitted before a location was picked on the map.
    #[error("no location selected on the map")]
    NoLocationSelected,

    /// Browser storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Encoding the workout list failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The position request was denied or failed.
    #[error("geolocation error: {0}")]
    Geolocation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn invalid_input(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    #[must_use]
    pub fn geolocation(message: impl Into<String>) -> Self {
        Self::Geolocation(message.into())
    }

    /// Errors caused by what the user typed or clicked, reported with the
    /// input alert rather than logged.
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::NoLocationSelected)
    }
}
