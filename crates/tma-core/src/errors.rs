use crate::host::Capability;

/// Core error type for the bridge.
///
/// Adapter crates map their specific failures into this type so callers get a
/// single failure contract from every public operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("host object is not available on this page")]
    HostAbsent,

    #[error("bridge is not ready")]
    NotReady,

    #[error("host does not expose `{0}`")]
    CapabilityAbsent(Capability),

    #[error("host call `{method}` failed: {message}")]
    HostCall {
        method: &'static str,
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot build share link: {0}")]
    ShareLink(String),

    #[error("no share strategy succeeded ({})", .attempts.join("; "))]
    NoShareStrategy { attempts: Vec<String> },

    #[error("external error: {0}")]
    External(String),
}

/// Top-level launch input that cannot be treated as a URL at all.
///
/// Everything below the top level degrades to `None` fields instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("launch input must be a string, got {found}")]
    NotAString { found: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
