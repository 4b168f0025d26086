//! Token list conversion.
//!
//! Builds [`LexicalHints`] from the native tree and re-scans the source text
//! into ESTree token values.

use serde::Serialize;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    JSXAttr, JSXAttrName, JSXAttrValue, JSXElementName, JSXObject, JSXText, Program, Regex, Tpl,
    TsTplLitType, TsTypeParamDecl, TsTypeParamInstantiation,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::ast::OutputShape;
use crate::location::{Range, SourceLocation, SourceText};
use crate::scanner::{Hint, Lexeme, LexicalHints, Scanner, TokenKind, skip_trivia};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexToken {
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    pub range: Range,
    pub loc: SourceLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexToken>,
}

impl Token {
    pub fn to_json(&self, shape: OutputShape) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("type".into(), self.kind.as_str().into());
        map.insert("value".into(), self.value.as_str().into());
        if shape.range {
            map.insert("range".into(), serde_json::json!([self.range.0, self.range.1]));
        }
        if shape.loc {
            map.insert(
                "loc".into(),
                serde_json::to_value(self.loc).unwrap_or(serde_json::Value::Null),
            );
        }
        if let Some(regex) = &self.regex {
            map.insert(
                "regex".into(),
                serde_json::json!({"pattern": regex.pattern, "flags": regex.flags}),
            );
        }
        serde_json::Value::Object(map)
    }
}

struct HintCollector<'a, 's> {
    source: &'s SourceText<'a>,
    hints: LexicalHints,
}

impl HintCollector<'_, '_> {
    fn range(&self, span: Span) -> Range {
        self.source.range_of(span)
    }

    fn insert_spanned(&mut self, span: Span, make: impl FnOnce(u32) -> Hint) {
        let range = self.range(span);
        if !range.is_empty() {
            self.hints.insert(range.0, make(range.1));
        }
    }

    fn continuation_after(&mut self, span: Span) {
        let end = self.range(span).1 as usize;
        let close = skip_trivia(self.source.text(), end);
        if self.source.text().as_bytes().get(close) == Some(&b'}') {
            self.hints.insert(close as u32, Hint::TemplateContinuation);
        }
    }

    fn angle_brackets(&mut self, span: Span) {
        let range = self.range(span);
        if range.1 > range.0 {
            self.hints.insert(range.0, Hint::SingleAngle);
            self.hints.insert(range.1 - 1, Hint::SingleAngle);
        }
    }

    fn jsx_object(&mut self, object: &JSXObject) {
        match object {
            JSXObject::Ident(ident) => {
                self.insert_spanned(ident.span, |end| Hint::JsxIdentifier { end })
            }
            JSXObject::JSXMemberExpr(member) => {
                self.jsx_object(&member.obj);
                self.insert_spanned(member.prop.span, |end| Hint::JsxIdentifier { end });
            }
        }
    }
}

impl Visit for HintCollector<'_, '_> {
    fn visit_regex(&mut self, n: &Regex) {
        self.insert_spanned(n.span, |end| Hint::Regex { end });
    }

    fn visit_tpl(&mut self, n: &Tpl) {
        for expr in &n.exprs {
            self.continuation_after(expr.span());
        }
        n.visit_children_with(self);
    }

    fn visit_ts_tpl_lit_type(&mut self, n: &TsTplLitType) {
        for ty in &n.types {
            self.continuation_after(ty.span());
        }
        n.visit_children_with(self);
    }

    fn visit_jsx_text(&mut self, n: &JSXText) {
        self.insert_spanned(n.span, |end| Hint::JsxText { end });
    }

    fn visit_jsx_element_name(&mut self, n: &JSXElementName) {
        match n {
            JSXElementName::Ident(ident) => {
                self.insert_spanned(ident.span, |end| Hint::JsxIdentifier { end })
            }
            JSXElementName::JSXMemberExpr(member) => {
                self.jsx_object(&member.obj);
                self.insert_spanned(member.prop.span, |end| Hint::JsxIdentifier { end });
            }
            JSXElementName::JSXNamespacedName(name) => {
                self.insert_spanned(name.ns.span, |end| Hint::JsxIdentifier { end });
                self.insert_spanned(name.name.span, |end| Hint::JsxIdentifier { end });
            }
        }
    }

    fn visit_jsx_attr(&mut self, n: &JSXAttr) {
        match &n.name {
            JSXAttrName::Ident(ident) => {
                self.insert_spanned(ident.span, |end| Hint::JsxIdentifier { end })
            }
            JSXAttrName::JSXNamespacedName(name) => {
                self.insert_spanned(name.ns.span, |end| Hint::JsxIdentifier { end });
                self.insert_spanned(name.name.span, |end| Hint::JsxIdentifier { end });
            }
        }
        match &n.value {
            None
            | Some(JSXAttrValue::JSXExprContainer(_))
            | Some(JSXAttrValue::JSXElement(_))
            | Some(JSXAttrValue::JSXFragment(_)) => {}
            Some(string) => self.insert_spanned(string.span(), |end| Hint::JsxString { end }),
        }
        n.value.visit_with(self);
    }

    fn visit_ts_type_param_instantiation(&mut self, n: &TsTypeParamInstantiation) {
        self.angle_brackets(n.span);
        n.visit_children_with(self);
    }

    fn visit_ts_type_param_decl(&mut self, n: &TsTypeParamDecl) {
        self.angle_brackets(n.span);
        n.visit_children_with(self);
    }
}

/// Records, for every context-dependent lexeme of `program`, the lexing mode
/// that applies at its start offset.
pub fn lexical_hints(program: &Program, source: &SourceText<'_>) -> LexicalHints {
    let mut collector = HintCollector {
        source,
        hints: LexicalHints::new(),
    };
    program.visit_with(&mut collector);
    tracing::trace!(hints = collector.hints.len(), "collected lexical hints");
    collector.hints
}

fn regex_parts(raw: &str) -> RegexToken {
    let close = raw.rfind('/').unwrap_or(raw.len());
    let pattern = raw.get(1..close).unwrap_or_default();
    let flags = raw.get(close + 1..).unwrap_or_default();
    RegexToken {
        pattern: pattern.to_string(),
        flags: flags.to_string(),
    }
}

/// Converts the source text into a flat, source-ordered token list.
pub fn convert_tokens(source: &SourceText<'_>, hints: &LexicalHints) -> Vec<Token> {
    Scanner::new(source.text(), hints)
        .filter_map(|lexeme| match lexeme {
            Lexeme::Token { kind, start, end } => {
                let range = Range(start, end);
                let value = source.slice(range).to_string();
                let regex = (kind == TokenKind::RegularExpression).then(|| regex_parts(&value));
                Some(Token {
                    kind,
                    value,
                    range,
                    loc: source.loc_of(range),
                    regex,
                })
            }
            Lexeme::Comment { .. } => None,
        })
        .collect()
}
