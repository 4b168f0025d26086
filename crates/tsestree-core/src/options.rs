//! Per-call conversion options.

use serde::{Deserialize, Serialize};

/// Flags accepted by [`crate::parse`].
///
/// Deserializes from snake_case keys; the camelCase spellings used by
/// ESTree tooling are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Emit `range` on every node.
    pub range: bool,
    /// Emit `loc` on every node.
    pub loc: bool,
    /// Attach the token list to the root.
    pub tokens: bool,
    /// Attach the comment list to the root.
    #[serde(alias = "comments")]
    pub comment: bool,
    /// Parse JSX syntax. Forced on for `.tsx` / `.jsx` files.
    pub jsx: bool,
    #[serde(alias = "errorOnUnknownASTType")]
    pub error_on_unknown_ast_type: bool,
    #[serde(alias = "shouldPreserveNodeMaps")]
    pub should_preserve_node_maps: bool,
    /// Skip grammar checks and degrade structural errors to `null` fields.
    #[serde(alias = "allowInvalidAST")]
    pub allow_invalid_ast: bool,
    /// Emit JSX text children as `JSXText` rather than `Literal`.
    #[serde(alias = "useJSXTextNode")]
    pub use_jsx_text_node: bool,
    /// Used only for language detection.
    #[serde(alias = "filePath")]
    pub file_path: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            range: true,
            loc: true,
            tokens: false,
            comment: false,
            jsx: false,
            error_on_unknown_ast_type: false,
            should_preserve_node_maps: false,
            allow_invalid_ast: false,
            use_jsx_text_node: true,
            file_path: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(mut self, enabled: bool) -> Self {
        self.tokens = enabled;
        self
    }

    pub fn with_comments(mut self, enabled: bool) -> Self {
        self.comment = enabled;
        self
    }

    pub fn with_jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn with_allow_invalid_ast(mut self, enabled: bool) -> Self {
        self.allow_invalid_ast = enabled;
        self
    }

    pub fn with_error_on_unknown_ast_type(mut self, enabled: bool) -> Self {
        self.error_on_unknown_ast_type = enabled;
        self
    }

    pub fn with_node_maps(mut self, enabled: bool) -> Self {
        self.should_preserve_node_maps = enabled;
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_emit_positions_only() {
        let options = ParseOptions::default();
        assert!(options.range);
        assert!(options.loc);
        assert!(!options.tokens);
        assert!(!options.comment);
        assert!(options.use_jsx_text_node);
    }

    #[test]
    fn deserializes_camel_case_aliases() {
        let json = r#"{"errorOnUnknownASTType": true, "allowInvalidAST": true, "useJSXTextNode": false}"#;
        let options: ParseOptions = serde_json::from_str(json).unwrap();
        assert!(options.error_on_unknown_ast_type);
        assert!(options.allow_invalid_ast);
        assert!(!options.use_jsx_text_node);
        assert!(options.range);
    }

    #[test]
    fn deserializes_snake_case_keys() {
        let json = r#"{"tokens": true, "comment": true, "file_path": "a.tsx"}"#;
        let options: ParseOptions = serde_json::from_str(json).unwrap();
        assert!(options.tokens);
        assert!(options.comment);
        assert_eq!(options.file_path.as_deref(), Some("a.tsx"));
    }
}
