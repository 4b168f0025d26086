//! Generic deep copy for native kinds without a dedicated builder.

use super::Converter;
use crate::ast::{AstNodeType, Node, Value};
use crate::error::{TsErrorKind, TsResult};
use crate::location::Range;
use crate::native::NativeKind;

/// Native bookkeeping fields that never reach the output.
const DENYLIST: &[&str] = &[
    "parent",
    "flags",
    "pos",
    "end",
    "ctxt",
    "span",
    "transformFlags",
    "modifierFlagsCache",
];

/// Fields copied for each kind. Kinds not listed keep every field that
/// survives the denylist.
fn copied_fields(kind: NativeKind) -> Option<&'static [&'static str]> {
    Some(match kind {
        NativeKind::ExportNamespaceSpecifier => &["name"],
        NativeKind::ExportDefaultSpecifier => &["exported"],
        NativeKind::JsxMemberExpression => &["object", "property"],
        NativeKind::JsxNamespacedName => &["namespace", "name"],
        NativeKind::JsxEmptyExpression | NativeKind::Invalid => &[],
        _ => return None,
    })
}

impl Converter<'_, '_> {
    /// Builds a `TS<Kind>` node from already converted `fields`, or fails
    /// when unknown kinds are rejected.
    pub(crate) fn deep_copy(
        &mut self,
        kind: NativeKind,
        range: Range,
        fields: Vec<(&'static str, Value)>,
    ) -> TsResult<Node> {
        let type_name = kind.fallback_type_name();
        if self.options().error_on_unknown_ast_type {
            return Err(self.error(
                TsErrorKind::UnknownNode,
                format!("Unknown AST_NODE_TYPE: \"{type_name}\""),
                range.0,
            ));
        }
        self.count_fallback();
        tracing::warn!(kind = %kind, start = range.0, "no dedicated builder, deep copying");

        let allowed = copied_fields(kind);
        let mut node = self.node_at(kind, range, AstNodeType::Opaque(type_name));
        for (key, value) in fields {
            if DENYLIST.contains(&key) {
                continue;
            }
            if allowed.is_some_and(|allowed| !allowed.contains(&key)) {
                continue;
            }
            node.set(key, value);
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TsErrorKind;
    use crate::location::SourceText;
    use crate::options::ParseOptions;
    use swc_common::BytePos;

    #[test]
    fn copies_listed_fields_only() {
        let source = SourceText::new("export * as ns from 'm';", BytePos(0));
        let options = ParseOptions::default();
        let mut cx = Converter::new(&source, &options, false);
        let name = cx.make(AstNodeType::Identifier, Range(12, 14));
        let node = cx
            .deep_copy(
                NativeKind::ExportNamespaceSpecifier,
                Range(7, 14),
                vec![("name", name.into()), ("span", Value::Null), ("extra", Value::Bool(true))],
            )
            .unwrap();
        assert_eq!(node.ty.as_str(), "TSExportNamespaceSpecifier");
        assert!(node.child("name").is_some());
        assert!(!node.has("span"));
        assert!(!node.has("extra"));
    }

    #[test]
    fn unknown_kinds_are_rejected_in_strict_mode() {
        let source = SourceText::new("x", BytePos(0));
        let options = ParseOptions::default().with_error_on_unknown_ast_type(true);
        let mut cx = Converter::new(&source, &options, false);
        let error = cx.deep_copy(NativeKind::Invalid, Range(0, 1), Vec::new()).unwrap_err();
        assert_eq!(error.kind, TsErrorKind::UnknownNode);
        assert_eq!(error.message, "Unknown AST_NODE_TYPE: \"TSInvalid\"");
    }

    #[test]
    fn unlisted_kinds_keep_everything_but_bookkeeping() {
        let source = SourceText::new("x", BytePos(0));
        let options = ParseOptions::default();
        let mut cx = Converter::new(&source, &options, false);
        let node = cx
            .deep_copy(
                NativeKind::ParenExpr,
                Range(0, 1),
                vec![("expression", Value::Null), ("ctxt", Value::Null)],
            )
            .unwrap();
        assert!(node.has("expression"));
        assert!(!node.has("ctxt"));
        assert_eq!(cx.fallbacks, 1);
    }
}
