use swc_ecma_ast::{
    ArrayPat, AssignPat, BindingIdent, Ident, IdentName, ObjectPat, ObjectPatProp, Pat, RestPat,
    TsTypeAnn,
};

use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node};
use crate::error::TsResult;
use crate::location::Range;
use crate::native::NativeKind;

impl Converter<'_, '_> {
    pub(crate) fn convert_ident(&mut self, ident: &Ident) -> Node {
        self.node(NativeKind::Ident, ident.span, AstNodeType::Identifier)
            .with("decorators", Vec::<Node>::new())
            .with("name", &*ident.sym)
            .with("optional", false)
    }

    pub(crate) fn convert_ident_name(&mut self, ident: &IdentName) -> Node {
        self.node(NativeKind::Ident, ident.span, AstNodeType::Identifier)
            .with("decorators", Vec::<Node>::new())
            .with("name", &*ident.sym)
            .with("optional", false)
    }

    /// Binding identifier, widened over its `?` marker and type annotation.
    pub(crate) fn convert_binding_ident(&mut self, binding: &BindingIdent) -> TsResult<Node> {
        let mut range = self.range(binding.id.span);
        if binding.id.optional {
            if let Some(mark) = self.find(range.1, self.source.len(), b'?') {
                range.1 = range.1.max(mark + 1);
            }
        }
        let type_annotation = self.convert_opt_type_ann(binding.type_ann.as_deref())?;
        if let Some(annotation) = &type_annotation {
            range = range.cover(&annotation.range);
        }
        Ok(self
            .node_at(NativeKind::BindingIdent, range, AstNodeType::Identifier)
            .with("decorators", Vec::<Node>::new())
            .with("name", &*binding.id.sym)
            .with("optional", binding.id.optional)
            .with_opt("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_opt_type_ann(&mut self, ann: Option<&TsTypeAnn>) -> TsResult<Option<Node>> {
        ann.map(|ann| self.convert_type_ann(ann)).transpose()
    }

    pub(crate) fn convert_pat(&mut self, pat: &Pat, ctx: Ctx) -> TsResult<Node> {
        match pat {
            Pat::Ident(binding) => self.convert_binding_ident(binding),
            Pat::Array(array) => self.convert_array_pat(array, ctx),
            Pat::Object(object) => self.convert_object_pat(object, ctx),
            Pat::Rest(rest) => self.convert_rest_pat(rest, ctx),
            Pat::Assign(assign) => self.convert_assign_pat(assign, ctx),
            Pat::Expr(expr) => self.convert_expr(expr, ctx),
            Pat::Invalid(invalid) => {
                let range = self.range(invalid.span);
                self.deep_copy(NativeKind::Invalid, range, Vec::new())
            }
        }
    }

    pub(crate) fn convert_array_pat(&mut self, array: &ArrayPat, ctx: Ctx) -> TsResult<Node> {
        let elements = array
            .elems
            .iter()
            .map(|elem| elem.as_ref().map(|p| self.convert_pat(p, ctx.pattern())).transpose())
            .collect::<TsResult<Vec<_>>>()?;
        let elements = self.list(elements);
        let type_annotation = self.convert_opt_type_ann(array.type_ann.as_deref())?;
        Ok(self
            .node(NativeKind::ArrayPat, array.span, AstNodeType::ArrayPattern)
            .with("decorators", Vec::<Node>::new())
            .with("elements", elements)
            .with("optional", array.optional)
            .with_opt("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_object_pat(&mut self, object: &ObjectPat, ctx: Ctx) -> TsResult<Node> {
        let mut properties = Vec::with_capacity(object.props.len());
        for prop in &object.props {
            properties.push(self.convert_object_pat_prop(prop, ctx)?);
        }
        let type_annotation = self.convert_opt_type_ann(object.type_ann.as_deref())?;
        Ok(self
            .node(NativeKind::ObjectPat, object.span, AstNodeType::ObjectPattern)
            .with("decorators", Vec::<Node>::new())
            .with("optional", object.optional)
            .with("properties", properties)
            .with_opt("typeAnnotation", type_annotation))
    }

    fn convert_object_pat_prop(&mut self, prop: &ObjectPatProp, ctx: Ctx) -> TsResult<Node> {
        match prop {
            ObjectPatProp::KeyValue(kv) => {
                let computed = matches!(kv.key, swc_ecma_ast::PropName::Computed(_));
                let key = self.convert_prop_name(&kv.key, ctx.value())?;
                let value = self.convert_pat(&kv.value, ctx.pattern())?;
                let range = Range(self.prop_name_range(&kv.key).0, value.range.1);
                Ok(self
                    .node_at(NativeKind::KeyValuePatProp, range, AstNodeType::Property)
                    .with("computed", computed)
                    .with("key", key)
                    .with("kind", "init")
                    .with("method", false)
                    .with("optional", false)
                    .with("shorthand", false)
                    .with("value", value))
            }
            ObjectPatProp::Assign(assign) => {
                let key = self.convert_ident(&assign.key.id);
                let value = match &assign.value {
                    Some(default) => {
                        let left = self.convert_binding_ident(&assign.key)?;
                        let right = self.convert_expr(default, ctx.value())?;
                        let range = Range(left.range.0, right.range.1);
                        self.make(AstNodeType::AssignmentPattern, range)
                            .with("decorators", Vec::<Node>::new())
                            .with("left", left)
                            .with("optional", false)
                            .with("right", right)
                    }
                    None => self.convert_binding_ident(&assign.key)?,
                };
                Ok(self
                    .node(NativeKind::AssignPatProp, assign.span, AstNodeType::Property)
                    .with("computed", false)
                    .with("key", key)
                    .with("kind", "init")
                    .with("method", false)
                    .with("optional", false)
                    .with("shorthand", true)
                    .with("value", value))
            }
            ObjectPatProp::Rest(rest) => self.convert_rest_pat(rest, ctx),
        }
    }

    pub(crate) fn convert_rest_pat(&mut self, rest: &RestPat, ctx: Ctx) -> TsResult<Node> {
        let argument = self.convert_pat(&rest.arg, ctx.pattern())?;
        let type_annotation = self.convert_opt_type_ann(rest.type_ann.as_deref())?;
        Ok(self
            .node(NativeKind::RestPat, rest.span, AstNodeType::RestElement)
            .with("argument", argument)
            .with("decorators", Vec::<Node>::new())
            .with("optional", false)
            .with_opt("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_assign_pat(&mut self, assign: &AssignPat, ctx: Ctx) -> TsResult<Node> {
        let left = self.convert_pat(&assign.left, ctx.pattern())?;
        let right = self.convert_expr(&assign.right, ctx.value())?;
        Ok(self
            .node(NativeKind::AssignPat, assign.span, AstNodeType::AssignmentPattern)
            .with("decorators", Vec::<Node>::new())
            .with("left", left)
            .with("optional", false)
            .with("right", right))
    }
}
