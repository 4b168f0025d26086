//! no-unused-private-class-members through the public lint entry point.

use insta::assert_json_snapshot;
use tsestree_lint::config::{RulesConfig, SeverityValue};
use tsestree_lint::{Config, Diagnostic, Severity, lint_source};

fn lint(code: &str) -> Vec<Diagnostic> {
    lint_source(code, "test.ts", &Config::default())
}

fn unused(code: &str) -> Vec<String> {
    lint(code)
        .into_iter()
        .map(|d| d.data["classMemberName"].clone())
        .collect()
}

mod valid {
    use super::*;

    #[test]
    fn read_through_this() {
        assert!(unused("class C { #x; method() { return this.#x; } }").is_empty());
    }

    #[test]
    fn read_through_destructuring() {
        assert!(unused("class C { private x; method() { const {x} = this; return x; } }").is_empty());
    }

    #[test]
    fn static_reads() {
        assert!(unused("class C { private static s; static method() { return this.s; } }").is_empty());
        assert!(unused("class C { private static s; method() { return C.s; } }").is_empty());
    }

    #[test]
    fn accessor_pair_read_once() {
        assert!(unused("class C { get #v() { return 1; } set #v(x) {} m() { return this.#v; } }").is_empty());
    }

    #[test]
    fn setter_only_member_written_through_this() {
        assert!(unused("class C { set #x(v) {} m() { this.#x = 1; } }").is_empty());
        assert!(unused("class C { private set x(v) {} m() { this.x = 1; } }").is_empty());
    }

    #[test]
    fn auto_accessor_written_through_this() {
        assert!(unused("class C { accessor #a = 1; m() { this.#a = 2; } }").is_empty());
    }

    #[test]
    fn non_private_members() {
        assert!(unused("class C { a = 1; protected b() {} public constructor(public c: number) {} }").is_empty());
    }
}

mod invalid {
    use super::*;

    #[test]
    fn unread_private_field() {
        assert_eq!(unused("class C { #x; }"), ["#x"]);
    }

    #[test]
    fn read_only_by_an_alias() {
        assert_eq!(
            unused("class C { private prop = 1; method() { const self = this; return self.prop; } }"),
            ["prop"]
        );
    }

    #[test]
    fn inner_class_use_does_not_cover_outer() {
        let code = "class Outer { #x = 1; m() { return class Inner { #x = 2; n() { return this.#x; } }; } }";
        let diagnostics = lint(code);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].column, code.find("#x").unwrap() + 1);
    }

    #[test]
    fn written_but_never_read() {
        assert_eq!(
            unused("class C { #count = 0; bump() { this.#count += 1; this.#count++; this.#count = 5; } }"),
            ["#count"]
        );
    }

    #[test]
    fn unused_private_method_and_parameter_property() {
        assert_eq!(
            unused("class C { constructor(private readonly id: string) {} #helper() {} }"),
            ["id", "#helper"]
        );
    }

    #[test]
    fn diagnostic_shape() {
        let diagnostics = lint("class C {\n  private secret = 1;\n}");
        assert_json_snapshot!(diagnostics, @r#"
        [
          {
            "ruleId": "C001",
            "severity": "warning",
            "message": "'secret' is defined but never used.",
            "messageId": "unusedPrivateClassMember",
            "data": {
              "classMemberName": "secret"
            },
            "file": "test.ts",
            "line": 2,
            "column": 11,
            "endLine": 2,
            "endColumn": 17
          }
        ]
        "#);
    }
}

mod configuration {
    use super::*;

    #[test]
    fn severity_override() {
        let config = Config {
            rules: RulesConfig {
                severity: [("C001".to_string(), SeverityValue::Error)].into_iter().collect(),
                ..RulesConfig::default()
            },
            ..Config::default()
        };

        let diagnostics = lint_source("class C { #x; }", "test.ts", &config);

        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn jsx_files_parse_with_jsx() {
        let code = "class C { #x = 1; render() { return <div>{this.#x}</div>; } }";
        assert!(lint_source(code, "view.tsx", &Config::default()).is_empty());
    }

    #[test]
    fn semantic_class_errors_do_not_stop_the_rule() {
        assert_eq!(unused("class C { override y = 1; #x; }"), ["#x"]);
        assert_eq!(unused("class A { constructor() {} constructor(x) {} private p; }"), ["p"]);
        assert_eq!(unused("abstract class B { abstract m() {} #h() {} }"), ["#h"]);
    }

    #[test]
    fn syntax_errors_report_once() {
        let diagnostics = lint_source("class C { #x = ; }", "test.ts", &Config::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule_id, tsestree_lint::PARSE_ERROR_RULE);
        assert_eq!(diagnostics[0].line, 1);
    }
}
