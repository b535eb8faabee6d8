use std::path::PathBuf;

use thiserror::Error;

/// The result type for the `lexgen` crate.
pub type Result<T> = std::result::Result<T, LexGenError>;

/// A macro that constructs a new LexGenErrorKind::UnsupportedFeature error.
#[macro_export]
macro_rules! unsupported {
    ($feature:expr) => {
        $crate::LexGenError::new($crate::LexGenErrorKind::UnsupportedFeature(
            $feature.to_string(),
        ))
    };
}

/// The error type for the `lexgen` crate.
#[derive(Error, Debug)]
pub struct LexGenError {
    /// The source of the error.
    pub source: Box<LexGenErrorKind>,
}

impl LexGenError {
    /// Create a new `LexGenError`.
    pub fn new(kind: LexGenErrorKind) -> Self {
        LexGenError {
            source: Box::new(kind),
        }
    }

    /// Get the kind of the error.
    pub fn kind(&self) -> &LexGenErrorKind {
        &self.source
    }
}

impl std::fmt::Display for LexGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// The error kind type.
#[derive(Error, Debug)]
pub enum LexGenErrorKind {
    /// A rule's regex could not be parsed.
    #[error(transparent)]
    RegexSyntaxError(#[from] regex_syntax::Error),

    /// Used regex features that are not supported by the automaton.
    #[error("Unsupported regex feature: {0}")]
    UnsupportedFeature(String),

    /// An extra parameter line of a rule has a recognized directive but an invalid argument.
    #[error("Malformed action directive '{line}': {reason}")]
    MalformedActionDirective {
        /// The offending line.
        line: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The first declared lexer state never received a rule.
    #[error("Unknown start state '{0}'")]
    UnknownStartState(String),

    /// The specification declares no lexer states at all.
    #[error("No lexer states declared")]
    NoLexerStates,

    /// A rule transitions into a state that has no entry in the model.
    #[error("Rule in state '{state}' changes to unknown state '{target}'")]
    UnknownTargetState {
        /// The state owning the rule.
        state: String,
        /// The missing target state.
        target: String,
    },

    /// The specification text does not follow the expected layout.
    #[error("Malformed specification at line {line}: {reason}")]
    MalformedSpecification {
        /// The 1-based line number.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A loaded artifact does not describe a consistent lexer model.
    #[error("Invalid lexer model: {0}")]
    InvalidModel(String),

    /// The lexer model could not be written to or read from its artifact.
    #[error("Failed to persist lexer model at {}: {source}", .path.display())]
    SerializationFailure {
        /// The artifact path.
        path: PathBuf,
        /// The underlying failure.
        source: SerializationError,
    },
}

impl From<regex_syntax::Error> for LexGenError {
    fn from(error: regex_syntax::Error) -> Self {
        LexGenError::new(LexGenErrorKind::RegexSyntaxError(error))
    }
}

/// An error raised while encoding, decoding or storing the artifact.
#[derive(Error, Debug)]
pub enum SerializationError {
    /// A std::io error occurred.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The model could not be encoded or decoded.
    #[error(transparent)]
    EncodingError(#[from] serde_json::Error),
}
