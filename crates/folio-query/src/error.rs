//! Error types for query lexing, parsing and compilation.

use std::{error, fmt};

use thiserror::Error;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {position}")]
pub struct LexError {
    /// Error message.
    pub message: String,
    /// Byte position in input where the error occurred.
    pub position: usize,
    /// The original input string.
    pub input: String,
}

impl LexError {
    /// Creates a new lexer error.
    pub fn new(message: impl Into<String>, position: usize, input: &str) -> Self {
        Self {
            message: message.into(),
            position,
            input: input.to_string(),
        }
    }
}

/// Parse error with an optional byte position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Byte offset of the offending token, or None at end of input.
    pub position: Option<usize>,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A query that could not be turned into a search.
///
/// Displays as a multi-line diagnostic: the message, the query with a caret
/// under the offending position, and a hint for common mistakes.
#[derive(Debug, Clone)]
pub struct QueryError {
    /// The kind of error that occurred.
    pub kind: QueryErrorKind,
    /// The original query string, when known.
    pub query: Option<String>,
}

/// The specific kind of query error.
#[derive(Debug, Clone)]
pub enum QueryErrorKind {
    /// Tokenization failed.
    Lex {
        /// Error message.
        message: String,
        /// Byte position in input.
        position: usize,
    },
    /// The token stream is not a valid query.
    Parse {
        /// Error message.
        message: String,
        /// Byte position in input, if known.
        position: Option<usize>,
    },
    /// The query is well formed but cannot run against the index.
    Compile {
        /// Error message.
        message: String,
    },
}

impl QueryError {
    /// Creates a lex error.
    pub fn lex(message: impl Into<String>, position: usize, query: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Lex {
                message: message.into(),
                position,
            },
            query: Some(query.into()),
        }
    }

    /// Creates a parse error.
    pub fn parse(
        message: impl Into<String>,
        position: Option<usize>,
        query: Option<String>,
    ) -> Self {
        Self {
            kind: QueryErrorKind::Parse {
                message: message.into(),
                position,
            },
            query,
        }
    }

    /// Creates a compile error.
    pub fn compile(message: impl Into<String>) -> Self {
        Self {
            kind: QueryErrorKind::Compile {
                message: message.into(),
            },
            query: None,
        }
    }

    /// Sets the query string for this error.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Returns the error message without context.
    pub fn message(&self) -> &str {
        match &self.kind {
            QueryErrorKind::Lex { message, .. }
            | QueryErrorKind::Parse { message, .. }
            | QueryErrorKind::Compile { message } => message,
        }
    }

    /// Returns the byte position the error points at, if any.
    pub fn position(&self) -> Option<usize> {
        match &self.kind {
            QueryErrorKind::Lex { position, .. } => Some(*position),
            QueryErrorKind::Parse { position, .. } => *position,
            QueryErrorKind::Compile { .. } => None,
        }
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        let message = self.message();
        match &self.kind {
            QueryErrorKind::Lex { .. } if message.contains("unclosed quote") => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            QueryErrorKind::Lex { .. } if message.contains("range") => {
                Some("Ranges look like [1 TO 10] or {* TO 5}")
            }
            QueryErrorKind::Parse { .. } if message.contains("closing parenthesis") => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            QueryErrorKind::Parse { .. } if message.contains("OR") || message.contains("AND") => {
                Some("Operators need expressions on both sides, e.g. 'revenue OR profit'")
            }
            QueryErrorKind::Compile { .. } if message.contains("unknown field") => {
                Some("Valid fields are: content, fileName, metadata, contentType, pageCount")
            }
            _ => None,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match &self.kind {
            QueryErrorKind::Lex { .. } | QueryErrorKind::Parse { .. } => "query syntax error",
            QueryErrorKind::Compile { .. } => "query error",
        };

        write!(f, "{prefix}: {}", self.message())?;

        if let Some(query) = &self.query {
            write!(f, "\n  {query}")?;
            if let Some(pos) = self.position() {
                // Count characters, not bytes, so the caret lines up.
                let column = query
                    .char_indices()
                    .take_while(|(i, _)| *i < pos)
                    .count();
                write!(f, "\n  {}^", " ".repeat(column))?;
            }
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "\nhint: {suggestion}")?;
        }

        Ok(())
    }
}

impl error::Error for QueryError {}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        Self::lex(err.message, err.position, err.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = QueryError::lex("unclosed quote", 0, "\"annual report");
        let display = err.to_string();
        assert!(display.contains("unclosed quote"));
        assert!(display.contains("\"annual report"));
        assert!(display.contains("\n  ^"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn caret_counts_characters() {
        let err = QueryError::parse("unexpected token", Some(3), Some("é )".into()));
        assert!(err.to_string().contains("\n    ^"));
    }

    #[test]
    fn parse_error_display() {
        let err = QueryError::parse(
            "expected closing parenthesis",
            Some(5),
            Some("(revenue".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("expected closing parenthesis"));
        assert!(display.contains("(revenue"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn with_query_sets_context() {
        let err = QueryError::compile("unknown field: author").with_query("author:smith");
        assert_eq!(err.query.as_deref(), Some("author:smith"));
        assert!(err.to_string().contains("author:smith"));
    }

    #[test]
    fn compile_error_suggests_fields() {
        let err = QueryError::compile("unknown field: foo");
        let display = err.to_string();
        assert!(display.starts_with("query error: unknown field: foo"));
        assert!(display.contains("Valid fields are:"));
    }

    #[test]
    fn operator_error_suggestion() {
        let err = QueryError::parse("unexpected OR (needs expression before it)", None, None);
        assert!(err.suggestion().is_some_and(|s| s.contains("both sides")));
    }

    #[test]
    fn lex_error_converts_with_position() {
        let err: QueryError = LexError::new("unclosed range", 4, "a b [1 TO").into();
        assert_eq!(err.position(), Some(4));
        assert_eq!(err.query.as_deref(), Some("a b [1 TO"));
    }
}
