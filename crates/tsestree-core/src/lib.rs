//! TypeScript to ESTree conversion.
//!
//! [`parse`] runs swc over a source string and converts the resulting tree
//! into the ESTree / TSESTree shape consumed by JavaScript lint tooling,
//! optionally with the token and comment lists and node identity maps.

pub mod ast;
pub mod comments;
mod convert;
pub mod error;
pub mod grammar;
pub mod location;
pub mod modifiers;
pub mod native;
pub mod node_maps;
pub mod node_utils;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod tokens;

use serde::Serialize;

pub use ast::{AstNodeType, Node, OutputShape, Value};
pub use comments::Comment;
pub use error::{TsError, TsErrorKind, TsResult};
pub use location::{LineIndex, Range, SourceLocation};
pub use node_maps::NodeMaps;
pub use options::ParseOptions;
pub use tokens::Token;

use convert::Converter;
use location::SourceText;
use parser::{ParseError, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Script => "script",
            SourceType::Module => "module",
        }
    }
}

/// Output of one conversion.
#[derive(Debug)]
pub struct ParseResult {
    pub ast: Node,
    pub comments: Option<Vec<Comment>>,
    pub tokens: Option<Vec<Token>>,
    pub node_maps: Option<NodeMaps>,
    pub source_type: SourceType,
    shape: OutputShape,
}

impl ParseResult {
    /// Serializes the root with `tokens` / `comments` attached when they were
    /// requested.
    pub fn to_json(&self) -> serde_json::Value {
        let mut root = self.ast.to_json(self.shape);
        if let serde_json::Value::Object(map) = &mut root {
            if let Some(tokens) = &self.tokens {
                let list = tokens.iter().map(|t| t.to_json(self.shape)).collect();
                map.insert("tokens".into(), serde_json::Value::Array(list));
            }
            if let Some(comments) = &self.comments {
                let list = comments.iter().map(|c| c.to_json(self.shape)).collect();
                map.insert("comments".into(), serde_json::Value::Array(list));
            }
        }
        root
    }
}

/// Parses `code` and converts it. Node maps are kept only when
/// `should_preserve_node_maps` is set.
pub fn parse(code: &str, options: &ParseOptions) -> TsResult<ParseResult> {
    run(code, options, options.should_preserve_node_maps)
}

/// Like [`parse`], but node maps are always populated.
pub fn parse_and_generate_services(code: &str, options: &ParseOptions) -> TsResult<ParseResult> {
    run(code, options, true)
}

fn run(code: &str, options: &ParseOptions, preserve_maps: bool) -> TsResult<ParseResult> {
    tracing::debug!(source_len = code.len(), file = ?options.file_path, "parsing");

    let parsed = Parser::for_options(options)
        .parse_program(code)
        .map_err(|e| syntax_error(code, e))?;
    if let Some(first) = parsed.errors.first() {
        return Err(syntax_error(code, first.clone()));
    }
    let source_type = if parsed.is_module() {
        SourceType::Module
    } else {
        SourceType::Script
    };

    let source = SourceText::new(code, parsed.base);
    let mut converter = Converter::new(&source, options, preserve_maps);
    let ast = converter.convert_program(&parsed.program)?;
    let node_count = converter.node_count();
    let node_maps = converter.into_maps();

    let hints = (options.tokens || options.comment)
        .then(|| tokens::lexical_hints(&parsed.program, &source));
    let tokens = hints
        .as_ref()
        .filter(|_| options.tokens)
        .map(|hints| tokens::convert_tokens(&source, hints));
    let comments = hints
        .as_ref()
        .filter(|_| options.comment)
        .map(|hints| comments::convert_comments(&source, hints));

    tracing::debug!(
        node_count,
        tokens = tokens.as_ref().map_or(0, Vec::len),
        comments = comments.as_ref().map_or(0, Vec::len),
        source_type = source_type.as_str(),
        "converted program"
    );

    Ok(ParseResult {
        ast,
        comments,
        tokens,
        node_maps,
        source_type,
        shape: OutputShape {
            range: options.range,
            loc: options.loc,
        },
    })
}

fn syntax_error(code: &str, error: ParseError) -> TsError {
    let lines = LineIndex::new(code);
    let error = TsError::new(TsErrorKind::Syntax, error.message, error.span_lo, &lines);
    tracing::debug!(message = %error.message, index = error.index, "parse failed");
    error
}
