/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type. Lookup failures are
/// not errors at this level: they resolve to a `LookupOutcome` and a reply text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure talking to the lookup provider.
///
/// Always recoverable: the conversation surfaces an apology and continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection-level failure; carries the fixed user-facing message.
    #[error("{0}")]
    Unreachable(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("no matching record for {0}")]
    NoMatchingRecord(String),
}
