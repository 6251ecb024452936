use crate::SourceLocation;
use thiserror::Error;

mod convert;

/// The result type of the Jack crates.
pub type Result<T> = std::result::Result<T, JackError>;

/// Every failure the front-end can report. The first one encountered aborts
/// the current compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JackError {
    #[error("Lexical error at {location}: {message}")]
    Lexical {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: expected {expected}, found {found}")]
    Unexpected {
        location: SourceLocation,
        expected: String,
        found: String,
    },

    #[error("Parse error: expected {expected}, found end of input")]
    UnexpectedEof { expected: String },

    #[error("Parse error at {location}: subroutine `{subroutine}` ends without a return statement")]
    MissingReturn {
        location: SourceLocation,
        subroutine: String,
    },

    #[error("Parse error at {location}: unexpected {found} after the end of the class")]
    TrailingInput {
        location: SourceLocation,
        found: String,
    },

    #[error("Parse error at {location}: nesting deeper than {limit} levels")]
    TooDeep {
        location: SourceLocation,
        limit: usize,
    },

    #[error("Unbalanced event stream: {message}")]
    Unbalanced { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl JackError {
    pub fn lexical(location: SourceLocation, message: impl Into<String>) -> Self {
        Self::Lexical { location, message: message.into() }
    }

    pub fn unexpected(location: SourceLocation, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Unexpected { location, expected: expected.into(), found: found.into() }
    }

    pub fn eof(expected: impl Into<String>) -> Self {
        Self::UnexpectedEof { expected: expected.into() }
    }

    pub fn unbalanced(message: impl Into<String>) -> Self {
        Self::Unbalanced { message: message.into() }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Where the error was detected, if it points into the source.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            JackError::Lexical { location, .. }
            | JackError::Unexpected { location, .. }
            | JackError::MissingReturn { location, .. }
            | JackError::TrailingInput { location, .. }
            | JackError::TooDeep { location, .. } => Some(*location),
            _ => None,
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, JackError::Lexical { .. })
    }

    /// True for grammar violations detected by the parser.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            JackError::Unexpected { .. }
                | JackError::UnexpectedEof { .. }
                | JackError::MissingReturn { .. }
                | JackError::TrailingInput { .. }
                | JackError::TooDeep { .. }
        )
    }
}
