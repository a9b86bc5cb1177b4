//! Error types for the headless viewer binary.

/// Top-level error for the viewer.
///
/// Malformed input lines are not errors: they are logged and skipped.
/// Only failures that end the session surface here.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gridworld_overlay::config::ConfigError,
    },

    /// Reading events or writing intents failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An intent could not be serialized.
    #[error("failed to encode intent: {source}")]
    Encode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The intent writer task panicked or was cancelled.
    #[error("intent writer failed: {source}")]
    Writer {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
