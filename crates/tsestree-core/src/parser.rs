//! swc parser wrapper.
//!
//! Selects the syntax from the file extension and options, parses a whole
//! program and reports recovered diagnostics with file-relative offsets.

use swc_common::sync::Lrc;
use swc_common::{BytePos, FileName, SourceMap, Spanned};
use swc_ecma_parser::error::SyntaxError;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax, parse_file_as_program};

use crate::options::ParseOptions;

pub use swc_ecma_ast::{EsVersion, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

impl Language {
    pub fn is_typescript(self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }

    pub fn is_jsx(self) -> bool {
        matches!(self, Language::Jsx | Language::Tsx)
    }
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        "js" | "mjs" | "cjs" => Language::JavaScript,
        _ => Language::TypeScript,
    }
}

/// Resolves the language for one call: the file extension wins, otherwise
/// TypeScript with JSX as requested.
pub fn language_for(options: &ParseOptions) -> Language {
    match options.file_path.as_deref() {
        Some(path) => {
            let detected = detect_language(path);
            match detected {
                Language::TypeScript if options.jsx => Language::Tsx,
                Language::JavaScript if options.jsx => Language::Jsx,
                other => other,
            }
        }
        None if options.jsx => Language::Tsx,
        None => Language::TypeScript,
    }
}

/// A diagnostic reported by swc. Offsets are relative to the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

/// A parsed program together with the file base its spans are relative to.
#[derive(Debug)]
pub struct ParsedProgram {
    pub program: Program,
    pub base: BytePos,
    pub errors: Vec<ParseError>,
}

impl ParsedProgram {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_module(&self) -> bool {
        matches!(self.program, Program::Module(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self::builder().typescript(true).decorators(true).build()
    }

    pub fn for_file(filename: &str) -> Self {
        Self::for_language(detect_language(filename))
    }

    pub fn for_options(options: &ParseOptions) -> Self {
        Self::for_language(language_for(options))
    }

    pub fn for_language(language: Language) -> Self {
        Self::builder()
            .typescript(language.is_typescript())
            .jsx(language.is_jsx())
            .decorators(true)
            .build()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Parses `code` as a script or module, whichever swc infers. Recovered
    /// diagnostics are kept in [`ParsedProgram::errors`]; a fatal error is
    /// returned as `Err`.
    pub fn parse_program(&self, code: &str) -> Result<ParsedProgram, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.ts".into()).into(), code.to_string());
        let base = fm.start_pos;

        let mut recovered_errors = Vec::new();
        let result = parse_file_as_program(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let to_parse_error = |e: swc_ecma_parser::error::Error| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError {
                line: loc.line,
                column: loc.col_display,
                span_lo: span.lo.0.saturating_sub(base.0),
                span_hi: span.hi.0.saturating_sub(base.0),
                message: e.kind().msg().to_string(),
            }
        };

        let program = result.map_err(to_parse_error)?;
        let (checker_level, recovered_errors): (Vec<_>, Vec<_>) = recovered_errors
            .into_iter()
            .partition(|e| is_checker_level(e.kind()));
        for error in &checker_level {
            tracing::trace!(message = %error.kind().msg(), "ignored checker-level diagnostic");
        }
        let mut errors: Vec<ParseError> = recovered_errors.into_iter().map(to_parse_error).collect();
        errors.sort_by_key(|e| e.span_lo);

        tracing::trace!(
            module = matches!(program, Program::Module(_)),
            recovered = errors.len(),
            "parsed program"
        );

        Ok(ParsedProgram {
            program,
            base,
            errors,
        })
    }
}

/// Diagnostics swc raises while parsing that belong to the type checker.
/// The tree is complete when these are reported.
fn is_checker_level(kind: &SyntaxError) -> bool {
    matches!(
        kind,
        SyntaxError::DuplicateConstructor
            | SyntaxError::TS1244
            | SyntaxError::TS1245
            | SyntaxError::TS4112
    )
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_language_from_extension() {
        assert_eq!(detect_language("a.ts"), Language::TypeScript);
        assert_eq!(detect_language("a.mts"), Language::TypeScript);
        assert_eq!(detect_language("a.tsx"), Language::Tsx);
        assert_eq!(detect_language("a.jsx"), Language::Jsx);
        assert_eq!(detect_language("a.js"), Language::JavaScript);
        assert_eq!(detect_language("a.cjs"), Language::JavaScript);
    }

    #[test]
    fn jsx_option_upgrades_plain_languages() {
        let options = ParseOptions::default().with_jsx(true);
        assert_eq!(language_for(&options), Language::Tsx);

        let options = ParseOptions::default()
            .with_jsx(true)
            .with_file_path("a.js");
        assert_eq!(language_for(&options), Language::Jsx);
    }

    #[test]
    fn parse_script_without_imports() {
        let parsed = Parser::new().parse_program("const x = 1;").unwrap();
        assert!(!parsed.is_module());
        assert!(!parsed.has_errors());
    }

    #[test]
    fn parse_module_with_imports() {
        let parsed = Parser::new().parse_program("import x from 'y';").unwrap();
        assert!(parsed.is_module());
    }

    #[test]
    fn parse_typescript_interface() {
        let parsed = Parser::new()
            .parse_program("interface A { x: number }")
            .unwrap();
        assert!(!parsed.has_errors());
    }

    #[test]
    fn fatal_error_has_relative_offset() {
        let error = Parser::new().parse_program("const = ;").unwrap_err();
        assert_eq!(error.line, 1);
        assert!(error.span_lo < 9);
        assert!(!error.message.is_empty());
    }

    #[test]
    fn jsx_requires_jsx_syntax() {
        let parser = Parser::for_file("a.tsx");
        let parsed = parser.parse_program("const e = <div>Hello</div>;").unwrap();
        assert!(!parsed.has_errors());
    }

    #[test]
    fn checker_level_diagnostics_are_not_errors() {
        for code in [
            "class C { override y = 1; }",
            "class A { constructor() {} constructor(x) {} }",
            "abstract class B { abstract m() {} }",
            "class D { abstract m(): void; }",
        ] {
            let parsed = Parser::new().parse_program(code).unwrap();
            assert!(!parsed.has_errors(), "{code}: {:?}", parsed.errors);
        }
    }

    #[test]
    fn recovered_syntax_errors_are_kept() {
        let parsed = Parser::new().parse_program("class C { abstract x = 1; }").unwrap();
        assert!(parsed.has_errors());
    }
}
