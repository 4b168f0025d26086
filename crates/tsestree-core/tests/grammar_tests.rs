//! Modifier placement and structural checks observed through `parse`.
//!
//! The upstream parser rejects some of these inputs itself; either way the
//! call must fail, and grammar errors must point at the offending token.

use tsestree_core::{ParseOptions, TsError, TsErrorKind, parse};

fn error_of(code: &str) -> TsError {
    match parse(code, &ParseOptions::default()) {
        Ok(_) => panic!("expected {code:?} to be rejected"),
        Err(error) => error,
    }
}

/// Asserts `code` is rejected and, when the rejection comes from the
/// grammar check, that it points at `needle`.
fn assert_rejected_at(code: &str, needle: &str) {
    let error = error_of(code);
    if error.kind == TsErrorKind::Grammar {
        let expected = code.find(needle).unwrap() as u32;
        assert_eq!(error.index, expected, "{code:?}: {}", error.message);
    }
}

fn assert_accepted(code: &str) {
    if let Err(error) = parse(code, &ParseOptions::default()) {
        panic!("expected {code:?} to convert, got {error}");
    }
}

mod valid_placements {
    use super::*;

    #[test]
    fn class_member_modifiers() {
        assert_accepted("abstract class A { private static readonly x = 1; protected abstract m(): void; }");
        assert_accepted("class A { public override accessor y = 2; declare z: number; }");
    }

    #[test]
    fn constructor_parameter_properties() {
        assert_accepted("class A { constructor(public readonly a: number, private b?: string) {} }");
    }

    #[test]
    fn variance_annotations_on_classes_and_interfaces() {
        assert_accepted("class A<in out T> {}");
        assert_accepted("interface I<out T> { x: T }");
    }

    #[test]
    fn ambient_and_exported_declarations() {
        assert_accepted("export declare const enum E { A }");
        assert_accepted("declare module 'm' { export function f(): void; }");
        assert_accepted("export default abstract class {}");
        assert_accepted("export declare abstract class B { abstract m(): void; }");
    }

    #[test]
    fn readonly_members_and_index_signatures() {
        assert_accepted("interface I { readonly x: number; readonly [k: string]: unknown }");
        assert_accepted("class A { readonly [k: string]: unknown }");
    }

    #[test]
    fn decorators_on_class_members_and_parameters() {
        assert_accepted("@d class A { @e m(@f x: number) {} @g accessor p = 1; }");
    }

    #[test]
    fn const_in_ambient_context_needs_no_initializer() {
        assert_accepted("declare const x: number;");
        assert_accepted("declare namespace N { const y: string; }");
    }
}

mod misplaced_modifiers {
    use super::*;

    #[test]
    fn readonly_on_a_method() {
        assert_rejected_at("class A { readonly m() {} }", "readonly");
    }

    #[test]
    fn accessibility_on_a_type_member() {
        assert_rejected_at("type T = { public x: number };", "public");
    }

    #[test]
    fn static_on_a_function() {
        assert_rejected_at("static function f() {}", "static");
    }

    #[test]
    fn variance_on_a_function_type_parameter() {
        assert_rejected_at("function f<in T>(x: T) {}", "in T");
    }

    #[test]
    fn duplicate_accessibility() {
        assert_rejected_at("class A { public private x = 1 }", "private");
    }

    #[test]
    fn parameter_property_outside_constructor() {
        assert_rejected_at("class A { m(private x: number) {} }", "private");
    }

    #[test]
    fn decorator_on_an_overload() {
        assert_rejected_at("class A { @d m(): void; m() {} }", "@d");
    }

    #[test]
    fn decorator_on_an_interface() {
        let error = error_of("@dec interface I {}");
        assert_eq!(error.kind, TsErrorKind::Grammar);
        assert_eq!(error.index, 0);
        assert_eq!(error.message, "Decorators are not valid here.");
    }

    #[test]
    fn decorator_on_a_constructor() {
        let code = "class C { @dec constructor() {} }";
        let error = error_of(code);
        assert_eq!(error.kind, TsErrorKind::Grammar);
        assert_eq!(error.index, code.find("@dec").unwrap() as u32);
        assert_eq!(error.message, "Decorators are not valid here.");
    }

    #[test]
    fn decorators_on_other_type_declarations() {
        assert_rejected_at("export @dec enum E { A }", "@dec");
        assert_rejected_at("@a.b() type T = string;", "@a");
    }
}

mod checker_diagnostics {
    use super::*;

    #[test]
    fn semantic_class_errors_still_convert() {
        assert_accepted("class C { override y = 1; }");
        assert_accepted("class A { constructor() {} constructor(x) {} }");
        assert_accepted("abstract class B { abstract m() {} }");
    }

    #[test]
    fn comments_mentioning_decorators_are_ignored() {
        assert_accepted("// @dec\ninterface I {}");
        assert_accepted("/** @internal */ class C { /* @x */ constructor() {} }");
    }
}

mod ambient_functions {
    use super::*;

    #[test]
    fn declared_function_with_body() {
        error_of("declare function f() {}");
    }

    #[test]
    fn declared_async_function() {
        error_of("declare async function f(): Promise<void>;");
    }

    #[test]
    fn generator_overload() {
        error_of("function* g(): any;");
    }
}

mod structural {
    use super::*;

    #[test]
    fn uninitialized_const() {
        error_of("const x;");
    }

    #[test]
    fn definite_assignment_with_initializer() {
        error_of("class A { x!: number = 1 }");
    }

    #[test]
    fn definite_assignment_without_type() {
        error_of("class A { x! }");
    }

    #[test]
    fn optional_auto_accessor() {
        error_of("class A { accessor x?: number }");
    }

    #[test]
    fn abstract_property_with_initializer() {
        error_of("abstract class A { abstract x: number = 1 }");
    }

    #[test]
    fn quoted_namespace_name() {
        error_of("namespace 'm' {}");
    }

    #[test]
    fn interface_with_implements() {
        error_of("interface I implements J {}");
    }

    #[test]
    fn class_extending_twice() {
        error_of("class A extends B extends C {}");
    }
}

mod suppression {
    use super::*;

    #[test]
    fn allow_invalid_ast_skips_modifier_checks() {
        let options = ParseOptions::default().with_allow_invalid_ast(true);
        let code = "class A { m(private x: number) {} }";
        if let Ok(result) = parse(code, &options) {
            assert_eq!(result.ast.nodes("body").len(), 1);
        }
    }

    #[test]
    fn error_display_has_line_and_column() {
        let error = error_of("\nclass A { readonly m() {} }");
        assert_eq!(error.line_number, 2);
        assert!(error.to_string().ends_with(&format!("(2:{})", error.column)));
    }
}
