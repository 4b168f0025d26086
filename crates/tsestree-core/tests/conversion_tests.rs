//! End-to-end conversion of small programs.

use serde_json::Value as Json;
use tsestree_core::{Node, ParseOptions, TsErrorKind, parse, parse_and_generate_services};

fn bare() -> ParseOptions {
    ParseOptions {
        range: false,
        loc: false,
        ..ParseOptions::default()
    }
}

fn convert(code: &str) -> Node {
    parse(code, &ParseOptions::default())
        .unwrap_or_else(|e| panic!("failed to convert {code:?}: {e}"))
        .ast
}

fn convert_json(code: &str) -> Json {
    parse(code, &bare())
        .unwrap_or_else(|e| panic!("failed to convert {code:?}: {e}"))
        .to_json()
}

fn first_statement(code: &str) -> Json {
    convert_json(code)["body"][0].clone()
}

fn collect<'a>(root: &'a Node) -> Vec<&'a Node> {
    let mut nodes = Vec::new();
    root.walk(&mut |node| nodes.push(node));
    nodes
}

mod ranges {
    use super::*;

    const SAMPLE: &str = r#"
import { a as b } from "m";
export default class C<T> extends B<T> implements I {
    #x = 1;
    static s?: string;
    constructor(private readonly y: number) { super(); }
    get v(): number { return this.#x ?? 0; }
    m<U>(this: C<T>, [p, ...q]: U[], { r = 2 } = {}) {
        for (const k of q) { label: if (k) break label; }
        return a?.b!.c(...p) as const;
    }
}
enum E { A = 1, B }
namespace N.M { export type T = { [K in keyof E]?: E[K] }; }
"#;

    #[test]
    fn every_child_lies_within_its_parent() {
        let root = convert(SAMPLE);
        for node in collect(&root) {
            for child in node.children() {
                assert!(
                    node.range.contains(&child.range),
                    "{} {:?} does not contain {} {:?}",
                    node.ty,
                    node.range,
                    child.ty,
                    child.range
                );
            }
        }
    }

    #[test]
    fn identifiers_and_literals_match_their_source() {
        let root = convert(SAMPLE);
        for node in collect(&root) {
            let text = &SAMPLE[node.range.0 as usize..node.range.1 as usize];
            match node.ty.as_str() {
                "Identifier" if !node.has("typeAnnotation") && node.bool("optional") == Some(false) => {
                    assert_eq!(node.str("name"), Some(text));
                }
                "Literal" => assert_eq!(node.str("raw"), Some(text)),
                _ => {}
            }
        }
    }

    #[test]
    fn program_range_skips_leading_trivia() {
        let root = convert("\n// c\nlet a = 1;\n");
        assert_eq!(root.range.0, 6);
        assert_eq!(root.loc.start.line, 3);
        assert_eq!(root.loc.start.column, 0);
    }

    #[test]
    fn locations_are_one_based_lines_zero_based_columns() {
        let root = convert("let a;\n  b;");
        let second = root.nodes("body")[1];
        assert_eq!(second.loc.start.line, 2);
        assert_eq!(second.loc.start.column, 2);
    }
}

mod expressions {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn comma_chains_flatten() {
        assert_json_snapshot!(first_statement("a, b, c;")["expression"]["expressions"].as_array().map(Vec::len), @"3");
    }

    #[test]
    fn parenthesized_sequence_stays_nested() {
        let statement = first_statement("a, (b, c);");
        let expressions = &statement["expression"]["expressions"];
        assert_eq!(expressions.as_array().map(Vec::len), Some(2));
        assert_eq!(expressions[1]["type"], "SequenceExpression");
    }

    #[test]
    fn sequence_snapshot() {
        assert_json_snapshot!(convert_json("a, b;"), @r#"
        {
          "body": [
            {
              "expression": {
                "expressions": [
                  {
                    "decorators": [],
                    "name": "a",
                    "optional": false,
                    "type": "Identifier"
                  },
                  {
                    "decorators": [],
                    "name": "b",
                    "optional": false,
                    "type": "Identifier"
                  }
                ],
                "type": "SequenceExpression"
              },
              "type": "ExpressionStatement"
            }
          ],
          "sourceType": "script",
          "type": "Program"
        }
        "#);
    }

    #[test]
    fn optional_chain_wraps_once() {
        let expression = first_statement("a?.b.c;")["expression"].clone();
        assert_eq!(expression["type"], "ChainExpression");
        let outer = &expression["expression"];
        assert_eq!(outer["type"], "MemberExpression");
        assert_eq!(outer["optional"], false);
        assert_eq!(outer["object"]["type"], "MemberExpression");
        assert_eq!(outer["object"]["optional"], true);
    }

    #[test]
    fn parentheses_end_a_chain() {
        let expression = first_statement("(a?.b).c;")["expression"].clone();
        assert_eq!(expression["type"], "MemberExpression");
        assert_eq!(expression["object"]["type"], "ChainExpression");
    }

    #[test]
    fn array_literal_target_becomes_pattern() {
        let statement = first_statement("[x] = y;");
        assert_eq!(statement["expression"]["left"]["type"], "ArrayPattern");
        assert_eq!(statement["expression"]["right"]["type"], "Identifier");

        let statement = first_statement("[x];");
        assert_eq!(statement["expression"]["type"], "ArrayExpression");
    }

    #[test]
    fn private_name_includes_hash() {
        let root = convert("class A { #x = 1; m() { return this.#x; } }");
        let private = collect(&root)
            .into_iter()
            .find(|n| n.ty.as_str() == "PrivateIdentifier")
            .unwrap();
        assert_eq!(private.str("name"), Some("x"));
        assert_eq!(private.range.1 - private.range.0, 2);
    }

    #[test]
    fn regex_literal_carries_pattern_and_flags() {
        let literal = first_statement("/ab+c/gi;")["expression"].clone();
        assert_eq!(literal["regex"]["pattern"], "ab+c");
        assert_eq!(literal["regex"]["flags"], "gi");
        assert_eq!(literal["value"], Json::Null);
    }

    #[test]
    fn bigint_literal_has_bigint_text() {
        let literal = first_statement("10n;")["expression"].clone();
        assert_eq!(literal["bigint"], "10");
        assert_eq!(literal["raw"], "10n");
    }

    #[test]
    fn as_const_is_an_as_expression() {
        let expression = first_statement("x as const;")["expression"].clone();
        assert_eq!(expression["type"], "TSAsExpression");
        assert_eq!(expression["typeAnnotation"]["typeName"]["name"], "const");
    }
}

mod declarations {
    use super::*;

    #[test]
    fn export_wraps_declaration_and_truncates_it() {
        let code = "export const a = 1;";
        let root = convert(code);
        let export = root.nodes("body")[0];
        assert_eq!(export.ty.as_str(), "ExportNamedDeclaration");
        let declaration = export.child("declaration").unwrap();
        assert_eq!(declaration.range.0, 7);
        assert_eq!(root.str("sourceType"), Some("module"));
    }

    #[test]
    fn overload_signature_is_declare_function() {
        let statement = first_statement("function f(a: string): void;");
        assert_eq!(statement["type"], "TSDeclareFunction");
        assert!(statement.get("body").is_none());
    }

    #[test]
    fn class_members_map_to_definitions() {
        let body = first_statement("abstract class A { abstract m(): void; p = 1; accessor q; static {} }")["body"]["body"].clone();
        let types: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["type"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            types,
            [
                "TSAbstractMethodDefinition",
                "PropertyDefinition",
                "AccessorProperty",
                "StaticBlock"
            ]
        );
    }

    #[test]
    fn parameter_property_wraps_binding() {
        let constructor = first_statement("class A { constructor(private x: number) {} }")["body"]["body"][0].clone();
        let param = &constructor["value"]["params"][0];
        assert_eq!(param["type"], "TSParameterProperty");
        assert_eq!(param["accessibility"], "private");
        assert_eq!(param["parameter"]["name"], "x");
    }

    #[test]
    fn heritage_clauses_are_split() {
        let class = first_statement("class A extends B implements C, D<E> {}");
        assert_eq!(class["superClass"]["name"], "B");
        assert_eq!(class["implements"].as_array().map(Vec::len), Some(2));
        assert_eq!(class["implements"][1]["type"], "TSClassImplements");
    }

    #[test]
    fn nested_namespace_collapses_to_qualified_name() {
        let module = first_statement("namespace A.B.C {}");
        assert_eq!(module["type"], "TSModuleDeclaration");
        assert_eq!(module["kind"], "namespace");
        assert_eq!(module["id"]["type"], "TSQualifiedName");
        assert_eq!(module["id"]["right"]["name"], "C");
    }

    #[test]
    fn global_augmentation_kind() {
        let module = first_statement("declare global { interface W {} }");
        assert_eq!(module["kind"], "global");
        assert_eq!(module["global"], true);
    }

    #[test]
    fn enum_members_live_in_enum_body() {
        let declaration = first_statement("enum E { A = 1, B }");
        assert_eq!(declaration["body"]["type"], "TSEnumBody");
        assert_eq!(declaration["body"]["members"][0]["initializer"]["value"], 1);
    }

    #[test]
    fn directive_prologue_is_marked() {
        let root = convert_json("'use strict'; a;");
        assert_eq!(root["body"][0]["directive"], "use strict");
        assert!(root["body"][1].get("directive").is_none());
    }

    #[test]
    fn import_attributes_are_converted() {
        let import = first_statement("import data from './d.json' with { type: 'json' };");
        assert_eq!(import["attributes"][0]["type"], "ImportAttribute");
        assert_eq!(import["attributes"][0]["value"]["value"], "json");
    }
}

mod jsx {
    use super::*;

    fn jsx_statement(code: &str, options: ParseOptions) -> Json {
        parse(code, &options.with_jsx(true)).unwrap().to_json()["body"][0]["expression"].clone()
    }

    #[test]
    fn text_children_decode_entities() {
        let element = jsx_statement("<a>x &amp; y</a>;", bare());
        assert_eq!(element["children"][0]["type"], "JSXText");
        assert_eq!(element["children"][0]["value"], "x & y");
        assert_eq!(element["children"][0]["raw"], "x &amp; y");
    }

    #[test]
    fn text_children_can_be_literals() {
        let options = ParseOptions {
            use_jsx_text_node: false,
            ..bare()
        };
        let element = jsx_statement("<a>hi</a>;", options);
        assert_eq!(element["children"][0]["type"], "Literal");
    }

    #[test]
    fn member_and_namespaced_names() {
        let element = jsx_statement("<a.b.c x:y='1' />;", bare());
        let opening = &element["openingElement"];
        assert_eq!(opening["name"]["type"], "JSXMemberExpression");
        assert_eq!(opening["name"]["object"]["type"], "JSXMemberExpression");
        assert_eq!(opening["attributes"][0]["name"]["type"], "JSXNamespacedName");
        assert_eq!(opening["selfClosing"], true);
        assert_eq!(element["closingElement"], Json::Null);
    }

    #[test]
    fn fragments_and_spreads() {
        let fragment = jsx_statement("<><b {...p} />{...c}</>;", bare());
        assert_eq!(fragment["type"], "JSXFragment");
        assert_eq!(fragment["children"][0]["openingElement"]["attributes"][0]["type"], "JSXSpreadAttribute");
        assert_eq!(fragment["children"][1]["type"], "JSXSpreadChild");
    }
}

mod invalid_trees {
    use super::*;

    #[test]
    fn throw_without_operand_is_rejected() {
        let error = parse("throw;", &ParseOptions::default()).unwrap_err();
        assert!(matches!(error.kind, TsErrorKind::Syntax | TsErrorKind::InvalidAst));
    }

    #[test]
    fn mapped_type_members_are_rejected_unless_allowed() {
        let code = "type T = { [K in string]: K; x: 1 };";
        if let Err(error) = parse(code, &ParseOptions::default()) {
            assert_ne!(error.kind, TsErrorKind::Grammar);
        }
        let options = ParseOptions::default().with_allow_invalid_ast(true);
        let _ = parse(code, &options);
    }

    #[test]
    fn empty_interface_extends_is_an_error() {
        let code = "interface A extends {}";
        assert!(parse(code, &ParseOptions::default()).is_err());
    }
}

mod services {
    use super::*;
    use tsestree_core::native::{NativeKey, NativeKind};
    use tsestree_core::{AstNodeType, Range};

    #[test]
    fn node_maps_link_both_directions() {
        let result = parse_and_generate_services("let a = b;", &ParseOptions::default()).unwrap();
        let maps = result.node_maps.as_ref().unwrap();
        for node in collect(&result.ast) {
            if let Some(native) = maps.native_of(node.id) {
                let back = maps.es_node_of(&native).unwrap();
                assert_eq!(
                    maps.native_of(back).map(|n| n.kind),
                    Some(native.kind)
                );
            }
        }
        let program = maps.native_of(result.ast.id).unwrap();
        assert_eq!(program.kind, NativeKind::Program);
    }

    fn mapped_type(code: &str, native: NativeKey) -> AstNodeType {
        let result = parse_and_generate_services(code, &ParseOptions::default()).unwrap();
        let maps = result.node_maps.as_ref().unwrap();
        let id = maps.es_node_of(&native).unwrap();
        collect(&result.ast)
            .into_iter()
            .find(|node| node.id == id)
            .map(|node| node.ty)
            .unwrap()
    }

    #[test]
    fn exported_class_maps_to_its_declaration() {
        let class = NativeKey::new(NativeKind::Class, Range(7, 17));
        assert_eq!(mapped_type("export class C {}", class), AstNodeType::ClassDeclaration);

        let class = NativeKey::new(NativeKind::Class, Range(15, 25));
        assert_eq!(
            mapped_type("export default class C {}", class),
            AstNodeType::ClassDeclaration
        );
    }

    #[test]
    fn maps_are_absent_by_default_and_present_on_request() {
        assert!(parse("a;", &ParseOptions::default()).unwrap().node_maps.is_none());
        let options = ParseOptions::default().with_node_maps(true);
        assert!(parse("a;", &options).unwrap().node_maps.is_some());
    }

    #[test]
    fn strict_mode_has_no_effect_on_known_kinds() {
        let options = ParseOptions::default().with_error_on_unknown_ast_type(true);
        assert!(parse("class A { m() {} }", &options).is_ok());
    }
}
