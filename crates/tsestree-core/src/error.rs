//! Structured errors raised while parsing or converting a source file.

use serde::Serialize;

use crate::location::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TsErrorKind {
    /// The upstream parser reported a syntax error.
    Syntax,
    /// A modifier or decorator is placed where the grammar forbids it.
    Grammar,
    /// A structural invariant of the tree is violated.
    InvalidAst,
    /// Strict mode met a native kind without a dedicated builder.
    UnknownNode,
}

/// Error surfaced by [`crate::parse`]. Carries the source offset of the
/// offending token and its 1-indexed line / 0-indexed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message} ({line_number}:{column})")]
pub struct TsError {
    pub message: String,
    pub index: u32,
    pub line_number: usize,
    pub column: usize,
    #[serde(skip)]
    pub kind: TsErrorKind,
}

impl TsError {
    pub fn new(kind: TsErrorKind, message: impl Into<String>, index: u32, lines: &LineIndex) -> Self {
        let position = lines.line_and_column_for(index);
        Self {
            message: message.into(),
            index,
            line_number: position.line,
            column: position.column,
            kind,
        }
    }
}

pub type TsResult<T> = Result<T, TsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_position_comes_from_line_index() {
        let lines = LineIndex::new("let a;\nlet b;");
        let error = TsError::new(TsErrorKind::Grammar, "bad", 11, &lines);

        assert_eq!(error.line_number, 2);
        assert_eq!(error.column, 4);
        assert_eq!(error.index, 11);
    }

    #[test]
    fn error_display_includes_position() {
        let lines = LineIndex::new("x");
        let error = TsError::new(TsErrorKind::Syntax, "Unexpected token", 0, &lines);

        assert_eq!(error.to_string(), "Unexpected token (1:0)");
    }

    #[test]
    fn error_serializes_with_camel_case_fields() {
        let lines = LineIndex::new("x");
        let error = TsError::new(TsErrorKind::InvalidAst, "oops", 0, &lines);
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["lineNumber"], 1);
        assert_eq!(json["column"], 0);
        assert_eq!(json["index"], 0);
        assert!(json.get("kind").is_none());
    }
}
