//! Lint rules over TypeScript sources.
//!
//! The centerpiece is [`class_scope`], which counts how often each class
//! member is read. [`rules`] turns those counts into diagnostics.

pub mod class_scope;
pub mod config;
pub mod diagnostic;
pub mod file;
pub mod rules;

pub use class_scope::{ClassScopeAnalysis, analyze_class_member_usage};
pub use config::{Config, load_config_or_default};
pub use diagnostic::Diagnostic;
pub use file::ParsedFile;
pub use rules::{Rule, RuleRegistry, Severity, default_registry};

/// Rule id of the diagnostic reported for sources that do not parse.
pub const PARSE_ERROR_RULE: &str = "parse-error";

/// Parses `code` and runs every built-in rule configured by `config`.
///
/// A source that fails to parse yields one diagnostic at the error position
/// and no rule output.
pub fn lint_source(code: &str, path: &str, config: &Config) -> Vec<Diagnostic> {
    let mut options = config.parser.clone();
    if options.file_path.is_none() {
        options.file_path = Some(path.to_string());
    }
    let file = ParsedFile::with_options(path, code, &options);

    if let Some(error) = file.parse_error() {
        let (line, column) = file.line_column(error.span_lo);
        let (end_line, end_column) = file.line_column(error.span_hi);
        return vec![
            Diagnostic::new(PARSE_ERROR_RULE, Severity::Error, error.message.clone(), path, line, column)
                .with_end(end_line, end_column),
        ];
    }

    let mut registry = default_registry();
    registry.configure(&config.rules);
    let diagnostics = registry.run_all(&file);
    tracing::debug!(path, diagnostics = diagnostics.len(), "linted source");
    diagnostics
}
