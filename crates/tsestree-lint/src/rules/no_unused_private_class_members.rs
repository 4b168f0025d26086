//! no-unused-private-class-members: private members that are never read.
//!
//! Covers `#name` members and members marked `private`, including
//! constructor parameter properties.

use crate::class_scope::analyze_class_member_usage;
use crate::declare_rule;
use crate::diagnostic::Diagnostic;
use crate::file::ParsedFile;
use crate::rules::{Rule, RuleMetadata};

pub const MESSAGE_ID: &str = "unusedPrivateClassMember";

declare_rule!(
    NoUnusedPrivateClassMembers,
    id = "C001",
    name = "no-unused-private-class-members",
    description = "Disallow private class members that are declared but never read",
    severity = Warning
);

impl Rule for NoUnusedPrivateClassMembers {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let Some(program) = file.program() else {
            return Vec::new();
        };

        let analysis = analyze_class_member_usage(program);
        let mut diagnostics = Vec::new();

        for (_, class) in analysis.classes() {
            for member in class.members() {
                if !member.is_private() || member.references > 0 {
                    continue;
                }
                let name = member.name();
                let (line, column, end_line, end_column) = file.span_to_range(member.span);
                diagnostics.push(
                    Diagnostic::new(
                        self.metadata.id,
                        self.metadata.severity,
                        format!("'{name}' is defined but never used."),
                        file.path(),
                        line,
                        column,
                    )
                    .with_end(end_line, end_column)
                    .with_message_id(MESSAGE_ID)
                    .with_data("classMemberName", name),
                );
            }
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(code: &str) -> Vec<Diagnostic> {
        let file = ParsedFile::from_source("test.ts", code);
        NoUnusedPrivateClassMembers::new().check(&file)
    }

    fn names(code: &str) -> Vec<String> {
        run(code)
            .into_iter()
            .map(|d| d.data["classMemberName"].clone())
            .collect()
    }

    #[test]
    fn reports_unused_hash_member_at_its_name() {
        let diagnostics = run("class C {\n  #x = 1;\n}");

        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.rule_id, "C001");
        assert_eq!(diagnostic.message_id.as_deref(), Some(MESSAGE_ID));
        assert_eq!(diagnostic.message, "'#x' is defined but never used.");
        assert_eq!((diagnostic.line, diagnostic.column), (2, 3));
        assert_eq!((diagnostic.end_line, diagnostic.end_column), (2, 5));
    }

    #[test]
    fn public_and_protected_members_are_ignored() {
        assert!(run("class C { x = 1; protected y = 2; public z() {} }").is_empty());
    }

    #[test]
    fn unused_private_parameter_property() {
        assert_eq!(names("class C { constructor(private a: number) {} }"), ["a"]);
    }

    #[test]
    fn read_members_are_not_reported() {
        assert!(run("class C { #x = 1; private y = 2; m() { return this.#x + this.y; } }").is_empty());
    }

    #[test]
    fn unparsable_files_produce_nothing() {
        assert!(run("class {").is_empty());
    }
}
