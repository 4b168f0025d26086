use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    IdentName, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElement, JSXElementChild,
    JSXElementName, JSXExpr, JSXExprContainer, JSXFragment, JSXMemberExpr, JSXNamespacedName,
    JSXObject, JSXText,
};

use super::text::decode_jsx_entities;
use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node};
use crate::error::TsResult;
use crate::location::Range;
use crate::native::NativeKind;

impl Converter<'_, '_> {
    pub(crate) fn convert_jsx_element(&mut self, element: &JSXElement, ctx: Ctx) -> TsResult<Node> {
        let opening = &element.opening;
        let name = self.convert_jsx_element_name(&opening.name);
        let attributes = opening
            .attrs
            .iter()
            .map(|attr| self.convert_jsx_attr_or_spread(attr, ctx))
            .collect::<TsResult<Vec<_>>>()?;
        let type_arguments = self.convert_opt_type_args(opening.type_args.as_deref())?;
        let opening_element = self
            .node(NativeKind::JsxOpeningElement, opening.span, AstNodeType::JSXOpeningElement)
            .with("attributes", attributes)
            .with("name", name)
            .with("selfClosing", opening.self_closing)
            .with_opt("typeArguments", type_arguments);

        let children = self.convert_jsx_children(&element.children, ctx)?;
        let closing_element = element.closing.as_ref().map(|closing| {
            let name = self.convert_jsx_element_name(&closing.name);
            self.node(NativeKind::JsxClosingElement, closing.span, AstNodeType::JSXClosingElement)
                .with("name", name)
        });
        Ok(self
            .node(NativeKind::JsxElement, element.span, AstNodeType::JSXElement)
            .with("children", children)
            .with("closingElement", closing_element)
            .with("openingElement", opening_element))
    }

    pub(crate) fn convert_jsx_fragment(&mut self, fragment: &JSXFragment, ctx: Ctx) -> TsResult<Node> {
        let opening = self.node(
            NativeKind::JsxOpeningFragment,
            fragment.opening.span,
            AstNodeType::JSXOpeningFragment,
        );
        let children = self.convert_jsx_children(&fragment.children, ctx)?;
        let closing = self.node(
            NativeKind::JsxClosingFragment,
            fragment.closing.span,
            AstNodeType::JSXClosingFragment,
        );
        Ok(self
            .node(NativeKind::JsxFragment, fragment.span, AstNodeType::JSXFragment)
            .with("children", children)
            .with("closingFragment", closing)
            .with("openingFragment", opening))
    }

    fn convert_jsx_children(&mut self, children: &[JSXElementChild], ctx: Ctx) -> TsResult<Vec<Node>> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            out.push(match child {
                JSXElementChild::JSXText(text) => self.convert_jsx_text(text),
                JSXElementChild::JSXExprContainer(container) => self.convert_jsx_container(container, ctx)?,
                JSXElementChild::JSXSpreadChild(spread) => {
                    let expression = self.convert_expr(&spread.expr, ctx.value())?;
                    self.node(NativeKind::JsxSpreadChild, spread.span, AstNodeType::JSXSpreadChild)
                        .with("expression", expression)
                }
                JSXElementChild::JSXElement(element) => self.convert_jsx_element(element, ctx)?,
                JSXElementChild::JSXFragment(fragment) => self.convert_jsx_fragment(fragment, ctx)?,
            });
        }
        Ok(out)
    }

    /// Text child. Emitted as `Literal` when `use_jsx_text_node` is off.
    pub(crate) fn convert_jsx_text(&mut self, text: &JSXText) -> Node {
        let range = self.range(text.span);
        let raw = self.slice(range);
        let ty = if self.options().use_jsx_text_node {
            AstNodeType::JSXText
        } else {
            AstNodeType::Literal
        };
        self.node_at(NativeKind::JsxText, range, ty)
            .with("raw", raw)
            .with("value", decode_jsx_entities(raw))
    }

    fn convert_jsx_container(&mut self, container: &JSXExprContainer, ctx: Ctx) -> TsResult<Node> {
        let expression = match &container.expr {
            JSXExpr::JSXEmptyExpr(empty) => {
                let range = self.range(empty.span);
                self.node_at(NativeKind::JsxEmptyExpression, range, AstNodeType::JSXEmptyExpression)
            }
            JSXExpr::Expr(expr) => self.convert_expr(expr, ctx.value())?,
        };
        Ok(self
            .node(NativeKind::JsxExpressionContainer, container.span, AstNodeType::JSXExpressionContainer)
            .with("expression", expression))
    }

    fn convert_jsx_attr_or_spread(&mut self, attr: &JSXAttrOrSpread, ctx: Ctx) -> TsResult<Node> {
        match attr {
            JSXAttrOrSpread::JSXAttr(attr) => self.convert_jsx_attr(attr, ctx),
            JSXAttrOrSpread::SpreadElement(spread) => {
                let argument = self.convert_expr(&spread.expr, ctx.value())?;
                let start = self.text()[..self.range(spread.dot3_token).0 as usize]
                    .rfind('{')
                    .map_or(self.range(spread.dot3_token).0, |i| i as u32);
                let end = self
                    .find(argument.range.1, self.source.len(), b'}')
                    .map_or(argument.range.1, |i| i + 1);
                Ok(self
                    .node_at(NativeKind::JsxSpreadAttribute, Range(start, end), AstNodeType::JSXSpreadAttribute)
                    .with("argument", argument))
            }
        }
    }

    fn convert_jsx_attr(&mut self, attr: &JSXAttr, ctx: Ctx) -> TsResult<Node> {
        let name = match &attr.name {
            JSXAttrName::Ident(ident) => self.jsx_identifier(ident),
            JSXAttrName::JSXNamespacedName(name) => self.convert_jsx_namespaced_name(name),
        };
        let value = match &attr.value {
            None => None,
            Some(JSXAttrValue::JSXExprContainer(container)) => Some(self.convert_jsx_container(container, ctx)?),
            Some(JSXAttrValue::JSXElement(element)) => Some(self.convert_jsx_element(element, ctx)?),
            Some(JSXAttrValue::JSXFragment(fragment)) => Some(self.convert_jsx_fragment(fragment, ctx)?),
            Some(other) => Some(self.jsx_attr_string(other.span())),
        };
        Ok(self
            .node(NativeKind::JsxAttribute, attr.span, AstNodeType::JSXAttribute)
            .with("name", name)
            .with("value", value))
    }

    /// Quoted attribute value. Escapes are not processed in JSX strings,
    /// only character references.
    fn jsx_attr_string(&mut self, span: Span) -> Node {
        let range = self.range(span);
        let raw = self.slice(range);
        let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
        self.node_at(NativeKind::Str, range, AstNodeType::Literal)
            .with("raw", raw)
            .with("value", decode_jsx_entities(inner))
    }

    fn jsx_identifier(&mut self, ident: &IdentName) -> Node {
        self.node(NativeKind::Ident, ident.span, AstNodeType::JSXIdentifier)
            .with("name", &*ident.sym)
    }

    fn convert_jsx_element_name(&mut self, name: &JSXElementName) -> Node {
        match name {
            JSXElementName::Ident(ident) => self
                .node(NativeKind::Ident, ident.span, AstNodeType::JSXIdentifier)
                .with("name", &*ident.sym),
            JSXElementName::JSXMemberExpr(member) => self.convert_jsx_member(member),
            JSXElementName::JSXNamespacedName(name) => self.convert_jsx_namespaced_name(name),
        }
    }

    /// `a.b.c` tag names; the range runs from the innermost object to the
    /// last property.
    pub(crate) fn convert_jsx_member(&mut self, member: &JSXMemberExpr) -> Node {
        let object = match &member.obj {
            JSXObject::Ident(ident) => self
                .node(NativeKind::Ident, ident.span, AstNodeType::JSXIdentifier)
                .with("name", &*ident.sym),
            JSXObject::JSXMemberExpr(inner) => self.convert_jsx_member(inner),
        };
        let property = self.jsx_identifier(&member.prop);
        let range = Range(object.range.0, property.range.1);
        self.node_at(NativeKind::JsxMemberExpression, range, AstNodeType::JSXMemberExpression)
            .with("object", object)
            .with("property", property)
    }

    pub(crate) fn convert_jsx_namespaced_name(&mut self, name: &JSXNamespacedName) -> Node {
        let namespace = self.jsx_identifier(&name.ns);
        let local = self.jsx_identifier(&name.name);
        let range = Range(namespace.range.0, local.range.1);
        self.node_at(NativeKind::JsxNamespacedName, range, AstNodeType::JSXNamespacedName)
            .with("name", local)
            .with("namespace", namespace)
    }
}
