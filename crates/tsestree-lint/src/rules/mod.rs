//! Rule system
//!
//! Rules inspect a [`ParsedFile`] and return diagnostics. The registry applies
//! the `[rules]` table of `tsestree.toml` on top of each rule's defaults.

pub mod no_unused_private_class_members;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::file::ParsedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub severity: Severity,
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    enabled_rules: HashSet<String>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            enabled_rules: HashSet::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Replaces the current settings with `config`. A rule listed in both
    /// `enabled` and `disabled` runs.
    pub fn configure(&mut self, config: &RulesConfig) {
        self.enabled_rules = config.enabled.iter().cloned().collect();
        self.disabled_rules = config.disabled.iter().cloned().collect();
        self.severity_overrides = config
            .severity
            .iter()
            .map(|(rule_ref, value)| (rule_ref.clone(), (*value).into()))
            .collect();
    }

    pub fn run_all(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| self.should_run_rule(rule.as_ref()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check(file);
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                tracing::debug!(
                    rule = rule.metadata().name,
                    file = file.path(),
                    diagnostics = diagnostics.len(),
                    "rule finished"
                );
                diagnostics
            })
            .collect()
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        let metadata = rule.metadata();
        Self::matches(&self.enabled_rules, metadata) || !Self::matches(&self.disabled_rules, metadata)
    }

    fn matches(set: &HashSet<String>, metadata: &RuleMetadata) -> bool {
        set.contains(metadata.id) || set.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diag in diagnostics.iter_mut() {
                diag.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        self.get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
            .is_some_and(|rule| self.should_run_rule(rule))
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry holding every built-in rule.
pub fn default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(
        no_unused_private_class_members::NoUnusedPrivateClassMembers::new(),
    ));
    registry
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        severity = $sev:ident $(,)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        severity: $crate::rules::Severity::$sev,
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeverityValue;

    struct TestRule {
        metadata: RuleMetadata,
        diagnostics_to_return: Vec<Diagnostic>,
    }

    impl TestRule {
        fn new(id: &'static str) -> Self {
            Self {
                metadata: RuleMetadata {
                    id,
                    name: "test-rule",
                    description: "A test rule",
                    severity: Severity::Warning,
                },
                diagnostics_to_return: Vec::new(),
            }
        }

        fn with_name(mut self, name: &'static str) -> Self {
            self.metadata.name = name;
            self
        }

        fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
            self.diagnostics_to_return.push(diagnostic);
            self
        }
    }

    impl Rule for TestRule {
        fn metadata(&self) -> &RuleMetadata {
            &self.metadata
        }

        fn check(&self, _file: &ParsedFile) -> Vec<Diagnostic> {
            self.diagnostics_to_return.clone()
        }
    }

    fn file() -> ParsedFile {
        ParsedFile::from_source("test.ts", "const x = 1;\nconst y = 2;")
    }

    #[test]
    fn run_all_collects_diagnostics_in_registration_order() {
        let mut registry = RuleRegistry::new();
        let diag1 = Diagnostic::new("T001", Severity::Warning, "Issue 1", "test.ts", 1, 1);
        let diag2 = Diagnostic::new("T002", Severity::Error, "Issue 2", "test.ts", 2, 1);
        registry.register(Box::new(TestRule::new("T001").with_diagnostic(diag1)));
        registry.register(Box::new(TestRule::new("T002").with_diagnostic(diag2)));

        let diagnostics = registry.run_all(&file());

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].rule_id, "T001");
        assert_eq!(diagnostics[1].rule_id, "T002");
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.ts", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001").with_name("noisy").with_diagnostic(diag),
        ));
        registry.configure(&RulesConfig {
            disabled: vec!["noisy".into()],
            ..RulesConfig::default()
        });

        assert!(registry.run_all(&file()).is_empty());
        assert!(!registry.is_rule_enabled("T001"));
    }

    #[test]
    fn enabled_wins_over_disabled() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.configure(&RulesConfig {
            enabled: vec!["T001".into()],
            disabled: vec!["T001".into()],
            ..RulesConfig::default()
        });

        assert!(registry.is_rule_enabled("T001"));
    }

    #[test]
    fn severity_overrides_apply_by_id_or_name() {
        let mut registry = RuleRegistry::new();
        let diag = Diagnostic::new("T001", Severity::Warning, "Issue", "test.ts", 1, 1);
        registry.register(Box::new(
            TestRule::new("T001").with_name("named").with_diagnostic(diag),
        ));
        registry.configure(&RulesConfig {
            severity: [("named".to_string(), SeverityValue::Error)].into_iter().collect(),
            ..RulesConfig::default()
        });

        let diagnostics = registry.run_all(&file());

        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn registry_get_rule_finds_by_id() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(TestRule::new("T001")));
        registry.register(Box::new(TestRule::new("T002")));

        let rule = registry.get_rule("T002");

        assert_eq!(rule.map(|r| r.metadata().id), Some("T002"));
        assert!(registry.get_rule("UNKNOWN").is_none());
    }

    #[test]
    fn default_registry_holds_builtin_rules() {
        let registry = default_registry();
        assert!(registry.get_rule_by_name("no-unused-private-class-members").is_some());
        assert!(registry.is_rule_enabled("no-unused-private-class-members"));
    }
}
