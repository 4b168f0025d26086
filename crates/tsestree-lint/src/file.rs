//! A source file parsed once and shared by every rule.

use swc_common::{BytePos, Span};
use swc_ecma_ast::Program;
use tsestree_core::LineIndex;
use tsestree_core::ParseOptions;
use tsestree_core::parser::{ParseError, ParsedProgram, Parser};

pub struct ParsedFile {
    path: String,
    source: String,
    parsed: Result<ParsedProgram, ParseError>,
    lines: LineIndex,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("path", &self.path)
            .field("has_program", &self.parsed.is_ok())
            .field("line_count", &self.lines.line_count())
            .finish()
    }
}

impl ParsedFile {
    /// Parses with the language implied by the file extension.
    pub fn from_source(path: &str, source: &str) -> Self {
        let options = ParseOptions::default().with_file_path(path);
        Self::with_options(path, source, &options)
    }

    pub fn with_options(path: &str, source: &str, options: &ParseOptions) -> Self {
        let parsed = Parser::for_options(options).parse_program(source);
        if let Err(error) = &parsed {
            tracing::debug!(path, message = %error.message, "file failed to parse");
        }
        Self {
            path: path.to_string(),
            source: source.to_string(),
            parsed,
            lines: LineIndex::new(source),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The native program, absent when the source could not be parsed.
    pub fn program(&self) -> Option<&Program> {
        self.parsed.as_ref().ok().map(|parsed| &parsed.program)
    }

    /// The fatal parse error, or the first recovered one.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.parsed {
            Ok(parsed) => parsed.errors.first(),
            Err(error) => Some(error),
        }
    }

    fn base(&self) -> u32 {
        self.parsed.as_ref().map_or(0, |parsed| parsed.base.0)
    }

    /// Byte offset of `pos` from the start of the source.
    pub fn offset(&self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.base())
    }

    /// 1-based line and column of a byte offset.
    pub fn line_column(&self, offset: u32) -> (usize, usize) {
        let position = self.lines.line_and_column_for(offset);
        (position.line, position.column + 1)
    }

    /// Start and end positions of `span` as `(line, column, end_line, end_column)`.
    pub fn span_to_range(&self, span: Span) -> (usize, usize, usize, usize) {
        let (line, column) = self.line_column(self.offset(span.lo));
        let (end_line, end_column) = self.line_column(self.offset(span.hi));
        (line, column, end_line, end_column)
    }
}
