/*!
 * Error types for the lumina-translate application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during a single provider attempt
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The attempt did not finish before its deadline
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// The request never produced a response (DNS, refused connection, reset...)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// A redirect arrived without anywhere to go
    #[error("Redirect with no Location header (status {status_code})")]
    RedirectWithoutLocation {
        /// HTTP status code of the redirect
        status_code: u16,
    },

    /// The redirect target redirected again
    #[error("Redirect limit exceeded (status {status_code})")]
    TooManyRedirects {
        /// HTTP status code of the second redirect
        status_code: u16,
    },

    /// The provider answered with empty text or echoed the input back
    #[error("Provider returned an empty or unchanged translation")]
    Unchanged,

    /// The offline phrase table had nothing to offer for this text
    #[error("No offline phrase matched for language '{0}'")]
    NoMatch(String),
}

impl ProviderError {
    /// Whether the failure came from the deadline rather than the transport
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Every strategy in the fallback chain failed
    #[error("All translation providers failed after {attempts} attempts")]
    Exhausted {
        /// Total number of provider attempts made
        attempts: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
