//! Lint findings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::Severity;

/// One finding of one rule. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            message_id: None,
            data: BTreeMap::new(),
            file: file.into(),
            line,
            column,
            end_line: line,
            end_column: column,
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = end_line;
        self.end_column = end_column;
        self
    }

    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_defaults_to_start() {
        let diagnostic = Diagnostic::new("R1", Severity::Warning, "m", "a.ts", 3, 4);
        assert_eq!((diagnostic.end_line, diagnostic.end_column), (3, 4));
    }

    #[test]
    fn serializes_message_id_and_data() {
        let diagnostic = Diagnostic::new("R1", Severity::Error, "'#x' is unused", "a.ts", 1, 11)
            .with_end(1, 13)
            .with_message_id("unused")
            .with_data("name", "#x");

        insta::assert_json_snapshot!(diagnostic, @r##"
        {
          "ruleId": "R1",
          "severity": "error",
          "message": "'#x' is unused",
          "messageId": "unused",
          "data": {
            "name": "#x"
          },
          "file": "a.ts",
          "line": 1,
          "column": 11,
          "endLine": 1,
          "endColumn": 13
        }
        "##);
    }
}
