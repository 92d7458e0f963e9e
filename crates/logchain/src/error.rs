//! Error types for the logchain crate.

use thiserror::Error;

/// Errors raised while registering descriptors or resolving a chain.
///
/// Every variant is a synchronous, fail-fast failure: the offending call
/// returns immediately and no events are published for the chain segment.
#[derive(Debug, Error)]
pub enum LogError {
    /// A descriptor was constructed without a name (or with an empty one).
    #[error("expected name to be set")]
    MissingName,

    /// A kind outside the closed set was supplied.
    #[error("\"type\" must be one of [{allowed}] but got \"{got}\"")]
    InvalidKind {
        /// Allowed kinds, comma separated.
        allowed: String,
        /// The offending value, verbatim.
        got: String,
    },

    /// The final call targeted a name with no registered emitter.
    #[error("Unable to find emitter \"{0}\"")]
    UnknownEmitter(String),

    /// A chain accessed a name that is not a mode, style or emitter.
    #[error("\"{0}\" is not a registered mode, style or emitter")]
    UnknownName(String),

    /// Message arguments were passed to a link that cannot emit.
    #[error("\"{name}\" is a {kind} and cannot be called with message arguments")]
    NotCallable {
        name: String,
        kind: &'static str,
    },

    /// The logger configuration could not be parsed.
    #[error("invalid logger config: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for logchain operations.
pub type Result<T> = std::result::Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_kind_message() {
        let err = LogError::InvalidKind {
            allowed: "mode, toggle".into(),
            got: "bogus".into(),
        };
        assert_eq!(
            err.to_string(),
            "\"type\" must be one of [mode, toggle] but got \"bogus\""
        );
    }

    #[test]
    fn test_unknown_emitter_message() {
        let err = LogError::UnknownEmitter("ghost".into());
        assert_eq!(err.to_string(), "Unable to find emitter \"ghost\"");
    }

    #[test]
    fn test_not_callable_message() {
        let err = LogError::NotCallable {
            name: "not".into(),
            kind: "toggle",
        };
        assert_eq!(
            err.to_string(),
            "\"not\" is a toggle and cannot be called with message arguments"
        );
    }
}
