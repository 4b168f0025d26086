//! Comment extraction.

use serde::Serialize;

use crate::ast::OutputShape;
use crate::location::{Range, SourceLocation, SourceText};
use crate::scanner::{CommentKind, Lexeme, LexicalHints, Scanner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Text without the `//` or `/* */` delimiters.
    pub value: String,
    pub range: Range,
    pub loc: SourceLocation,
}

impl Comment {
    pub fn to_json(&self, shape: OutputShape) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        let kind = match self.kind {
            CommentKind::Block => "Block",
            CommentKind::Line => "Line",
        };
        map.insert("type".into(), kind.into());
        map.insert("value".into(), self.value.as_str().into());
        if shape.range {
            map.insert("range".into(), serde_json::json!([self.range.0, self.range.1]));
        }
        if shape.loc {
            map.insert(
                "loc".into(),
                serde_json::to_value(self.loc).unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Object(map)
    }
}

fn strip_delimiters(kind: CommentKind, text: &str) -> &str {
    match kind {
        CommentKind::Line => text.get(2..).unwrap_or_default(),
        CommentKind::Block => {
            let inner = text.get(2..).unwrap_or_default();
            inner.strip_suffix("*/").unwrap_or(inner)
        }
    }
}

/// Returns every comment of the source in source order.
pub fn convert_comments(source: &SourceText<'_>, hints: &LexicalHints) -> Vec<Comment> {
    Scanner::new(source.text(), hints)
        .filter_map(|lexeme| match lexeme {
            Lexeme::Comment { kind, start, end } => {
                let range = Range(start, end);
                Some(Comment {
                    kind,
                    value: strip_delimiters(kind, source.slice(range)).to_string(),
                    range,
                    loc: source.loc_of(range),
                })
            }
            Lexeme::Token { .. } => None,
        })
        .collect()
}
