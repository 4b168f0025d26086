use swc_common::Spanned;
use swc_ecma_ast::{
    Expr, Pat, TruePlusMinus, TsAsExpr, TsConstAssertion, TsEntityName, TsEnumDecl, TsEnumMemberId,
    TsFnOrConstructorType, TsFnParam, TsIndexSignature, TsInstantiation, TsInterfaceDecl, TsLit,
    TsModuleDecl, TsModuleName, TsNamespaceBody, TsSatisfiesExpr, TsThisTypeOrIdent, TsTupleElement,
    TsType, TsTypeAliasDecl, TsTypeAnn, TsTypeAssertion, TsTypeElement, TsTypeOperatorOp, TsTypeParam,
    TsTypeParamDecl, TsTypeParamInstantiation, TsTypeQueryExpr, TsUnionOrIntersectionType,
};

use super::class::scan_heritage;
use super::text::number_value;
use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node, Value};
use crate::error::TsResult;
use crate::grammar::{ModifierSite, SiteKind, SiteParent};
use crate::location::Range;
use crate::modifiers::ConstMode;
use crate::native::NativeKind;
use crate::node_utils::{get_accessibility, keyword_type};
use crate::scanner::is_identifier_part;

fn plus_minus(value: TruePlusMinus) -> Value {
    match value {
        TruePlusMinus::True => Value::Bool(true),
        TruePlusMinus::Plus => Value::from("+"),
        TruePlusMinus::Minus => Value::from("-"),
    }
}

/// Identifier word written directly before `pos`.
fn word_before(text: &str, pos: u32) -> &str {
    let before = text[..pos as usize].trim_end();
    let start = before
        .char_indices()
        .rev()
        .find(|(_, c)| !is_identifier_part(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &before[start..]
}

impl Converter<'_, '_> {
    // ---- annotations and parameters ---------------------------------------

    pub(crate) fn convert_type_ann(&mut self, ann: &TsTypeAnn) -> TsResult<Node> {
        let type_annotation = self.convert_type(&ann.type_ann)?;
        Ok(self
            .node(NativeKind::TsTypeAnn, ann.span, AstNodeType::TSTypeAnnotation)
            .with("typeAnnotation", type_annotation))
    }

    /// Return type written after `=>` in function and constructor types.
    fn convert_arrow_return_type(&mut self, ann: &TsTypeAnn) -> TsResult<Node> {
        let type_annotation = self.convert_type(&ann.type_ann)?;
        let type_start = type_annotation.range.0;
        let before = self.text()[..type_start as usize].trim_end();
        let start = if before.ends_with("=>") {
            (before.len() - 2) as u32
        } else {
            type_start
        };
        let range = Range(start, type_annotation.range.1);
        Ok(self
            .node_at(NativeKind::TsTypeAnn, range, AstNodeType::TSTypeAnnotation)
            .with("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_opt_type_args(
        &mut self,
        args: Option<&TsTypeParamInstantiation>,
    ) -> TsResult<Option<Node>> {
        let Some(args) = args else {
            return Ok(None);
        };
        let params = args
            .params
            .iter()
            .map(|t| self.convert_type(t))
            .collect::<TsResult<Vec<_>>>()?;
        Ok(Some(
            self.node(
                NativeKind::TsTypeParamInstantiation,
                args.span,
                AstNodeType::TSTypeParameterInstantiation,
            )
            .with("params", params),
        ))
    }

    /// Type parameter list; `parent` decides which modifiers are legal.
    pub(crate) fn convert_opt_type_params(
        &mut self,
        params: Option<&TsTypeParamDecl>,
        parent: SiteParent,
    ) -> TsResult<Option<Node>> {
        let Some(decl) = params else {
            return Ok(None);
        };
        let params = decl
            .params
            .iter()
            .map(|p| self.convert_type_param(p, parent))
            .collect::<TsResult<Vec<_>>>()?;
        Ok(Some(
            self.node(NativeKind::TsTypeParamDecl, decl.span, AstNodeType::TSTypeParameterDeclaration)
                .with("params", params),
        ))
    }

    fn convert_type_param(&mut self, param: &TsTypeParam, parent: SiteParent) -> TsResult<Node> {
        let range = self.range(param.span);
        let name_start = self.range(param.name.span).0;
        let modifiers = self.modifiers(range.0, name_start, &[], ConstMode::Modifier);
        self.check_grammar(&ModifierSite::new(SiteKind::TypeParameter, parent).modifiers(&modifiers))?;

        let name = self.convert_ident(&param.name);
        let constraint = param.constraint.as_deref().map(|t| self.convert_type(t)).transpose()?;
        let default = param.default.as_deref().map(|t| self.convert_type(t)).transpose()?;
        Ok(self
            .node_at(NativeKind::TsTypeParam, range, AstNodeType::TSTypeParameter)
            .with("const", param.is_const)
            .with_opt("constraint", constraint)
            .with_opt("default", default)
            .with("in", param.is_in)
            .with("name", name)
            .with("out", param.is_out))
    }

    pub(crate) fn convert_fn_param(&mut self, param: &TsFnParam) -> TsResult<Node> {
        let ctx = Ctx::root().pattern();
        match param {
            TsFnParam::Ident(binding) => self.convert_binding_ident(binding),
            TsFnParam::Array(array) => self.convert_array_pat(array, ctx),
            TsFnParam::Rest(rest) => self.convert_rest_pat(rest, ctx),
            TsFnParam::Object(object) => self.convert_object_pat(object, ctx),
        }
    }

    fn convert_fn_params(&mut self, params: &[TsFnParam]) -> TsResult<Vec<Node>> {
        params.iter().map(|p| self.convert_fn_param(p)).collect()
    }

    pub(crate) fn convert_entity_name(&mut self, name: &TsEntityName) -> Node {
        match name {
            TsEntityName::Ident(ident) => self.convert_ident(ident),
            TsEntityName::TsQualifiedName(qualified) => {
                let left = self.convert_entity_name(&qualified.left);
                let right = self.convert_ident_name(&qualified.right);
                let range = Range(left.range.0, right.range.1);
                self.node_at(NativeKind::TsQualifiedName, range, AstNodeType::TSQualifiedName)
                    .with("left", left)
                    .with("right", right)
            }
        }
    }

    // ---- types -------------------------------------------------------------

    pub(crate) fn convert_type(&mut self, ty: &TsType) -> TsResult<Node> {
        match ty {
            TsType::TsKeywordType(keyword) => {
                Ok(self.node(NativeKind::TsKeywordType, keyword.span, keyword_type(keyword.kind)))
            }
            TsType::TsThisType(this) => Ok(self.node(NativeKind::TsThisType, this.span, AstNodeType::TSThisType)),
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(function)) => {
                let type_parameters = self.convert_opt_type_params(function.type_params.as_deref(), SiteParent::Other)?;
                let params = self.convert_fn_params(&function.params)?;
                let return_type = self.convert_arrow_return_type(&function.type_ann)?;
                Ok(self
                    .node(NativeKind::TsFnType, function.span, AstNodeType::TSFunctionType)
                    .with("params", params)
                    .with("returnType", return_type)
                    .with_opt("typeParameters", type_parameters))
            }
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsConstructorType(ctor)) => {
                let range = self.range(ctor.span);
                let modifiers = self.modifiers(range.0, range.1, &[], ConstMode::Keyword);
                self.check_grammar(
                    &ModifierSite::new(SiteKind::ConstructorType, SiteParent::Other).modifiers(&modifiers),
                )?;
                let type_parameters = self.convert_opt_type_params(ctor.type_params.as_deref(), SiteParent::Other)?;
                let params = self.convert_fn_params(&ctor.params)?;
                let return_type = self.convert_arrow_return_type(&ctor.type_ann)?;
                Ok(self
                    .node_at(NativeKind::TsConstructorType, range, AstNodeType::TSConstructorType)
                    .with("abstract", ctor.is_abstract)
                    .with("params", params)
                    .with("returnType", return_type)
                    .with_opt("typeParameters", type_parameters))
            }
            TsType::TsTypeRef(reference) => {
                let type_name = self.convert_entity_name(&reference.type_name);
                let type_arguments = self.convert_opt_type_args(reference.type_params.as_deref())?;
                Ok(self
                    .node(NativeKind::TsTypeRef, reference.span, AstNodeType::TSTypeReference)
                    .with_opt("typeArguments", type_arguments)
                    .with("typeName", type_name))
            }
            TsType::TsTypeQuery(query) => {
                let expr_name = match &query.expr_name {
                    TsTypeQueryExpr::TsEntityName(name) => self.convert_entity_name(name),
                    TsTypeQueryExpr::Import(import) => self.convert_import_type(import)?,
                };
                let type_arguments = self.convert_opt_type_args(query.type_args.as_deref())?;
                Ok(self
                    .node(NativeKind::TsTypeQuery, query.span, AstNodeType::TSTypeQuery)
                    .with("exprName", expr_name)
                    .with_opt("typeArguments", type_arguments))
            }
            TsType::TsImportType(import) => self.convert_import_type(import),
            TsType::TsTypeLit(literal) => {
                let members = self.convert_type_elements(&literal.members, SiteParent::TypeLiteral)?;
                Ok(self
                    .node(NativeKind::TsTypeLit, literal.span, AstNodeType::TSTypeLiteral)
                    .with("members", members))
            }
            TsType::TsArrayType(array) => {
                let element_type = self.convert_type(&array.elem_type)?;
                Ok(self
                    .node(NativeKind::TsArrayType, array.span, AstNodeType::TSArrayType)
                    .with("elementType", element_type))
            }
            TsType::TsTupleType(tuple) => {
                let element_types = tuple
                    .elem_types
                    .iter()
                    .map(|e| self.convert_tuple_element(e))
                    .collect::<TsResult<Vec<_>>>()?;
                Ok(self
                    .node(NativeKind::TsTupleType, tuple.span, AstNodeType::TSTupleType)
                    .with("elementTypes", element_types))
            }
            TsType::TsOptionalType(optional) => {
                let inner = self.convert_type(&optional.type_ann)?;
                Ok(self
                    .node(NativeKind::TsOptionalType, optional.span, AstNodeType::TSOptionalType)
                    .with("typeAnnotation", inner))
            }
            TsType::TsRestType(rest) => {
                let inner = self.convert_type(&rest.type_ann)?;
                Ok(self
                    .node(NativeKind::TsRestType, rest.span, AstNodeType::TSRestType)
                    .with("typeAnnotation", inner))
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                let types = union
                    .types
                    .iter()
                    .map(|t| self.convert_type(t))
                    .collect::<TsResult<Vec<_>>>()?;
                Ok(self
                    .node(NativeKind::TsUnionType, union.span, AstNodeType::TSUnionType)
                    .with("types", types))
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(intersection)) => {
                let types = intersection
                    .types
                    .iter()
                    .map(|t| self.convert_type(t))
                    .collect::<TsResult<Vec<_>>>()?;
                Ok(self
                    .node(NativeKind::TsIntersectionType, intersection.span, AstNodeType::TSIntersectionType)
                    .with("types", types))
            }
            TsType::TsConditionalType(conditional) => {
                let check_type = self.convert_type(&conditional.check_type)?;
                let extends_type = self.convert_type(&conditional.extends_type)?;
                let true_type = self.convert_type(&conditional.true_type)?;
                let false_type = self.convert_type(&conditional.false_type)?;
                Ok(self
                    .node(NativeKind::TsConditionalType, conditional.span, AstNodeType::TSConditionalType)
                    .with("checkType", check_type)
                    .with("extendsType", extends_type)
                    .with("falseType", false_type)
                    .with("trueType", true_type))
            }
            TsType::TsInferType(infer) => {
                let type_parameter = self.convert_type_param(&infer.type_param, SiteParent::Other)?;
                Ok(self
                    .node(NativeKind::TsInferType, infer.span, AstNodeType::TSInferType)
                    .with("typeParameter", type_parameter))
            }
            TsType::TsParenthesizedType(paren) => {
                let inner = self.convert_type(&paren.type_ann)?;
                self.record(&inner, NativeKind::TsParenthesizedType, self.range(paren.span));
                Ok(inner)
            }
            TsType::TsTypeOperator(operator) => {
                let op = match operator.op {
                    TsTypeOperatorOp::KeyOf => "keyof",
                    TsTypeOperatorOp::Unique => "unique",
                    TsTypeOperatorOp::ReadOnly => "readonly",
                };
                let inner = self.convert_type(&operator.type_ann)?;
                Ok(self
                    .node(NativeKind::TsTypeOperator, operator.span, AstNodeType::TSTypeOperator)
                    .with("operator", op)
                    .with("typeAnnotation", inner))
            }
            TsType::TsIndexedAccessType(access) => {
                let object_type = self.convert_type(&access.obj_type)?;
                let index_type = self.convert_type(&access.index_type)?;
                Ok(self
                    .node(NativeKind::TsIndexedAccessType, access.span, AstNodeType::TSIndexedAccessType)
                    .with("indexType", index_type)
                    .with("objectType", object_type))
            }
            TsType::TsMappedType(mapped) => {
                let range = self.range(mapped.span);
                let key = self.convert_ident(&mapped.type_param.name);
                let constraint = mapped
                    .type_param
                    .constraint
                    .as_deref()
                    .map(|t| self.convert_type(t))
                    .transpose()?;
                let name_type = mapped.name_type.as_deref().map(|t| self.convert_type(t)).transpose()?;
                let type_annotation = mapped.type_ann.as_deref().map(|t| self.convert_type(t)).transpose()?;
                let members_from = type_annotation.as_ref().map_or(key.range.1, |t| t.range.1);
                self.check_mapped_members(members_from, range)?;
                let mut node = self
                    .node_at(NativeKind::TsMappedType, range, AstNodeType::TSMappedType)
                    .with("constraint", constraint)
                    .with("key", key)
                    .with("nameType", name_type)
                    .with("optional", mapped.optional.map_or(Value::Bool(false), plus_minus));
                if let Some(readonly) = mapped.readonly {
                    node.set("readonly", plus_minus(readonly));
                }
                Ok(node.with_opt("typeAnnotation", type_annotation))
            }
            TsType::TsLitType(literal) => {
                let range = self.range(literal.span);
                let inner = match &literal.lit {
                    TsLit::Number(_) => self.convert_signed_number(literal.span),
                    TsLit::Str(s) => self.convert_str(s),
                    TsLit::Bool(b) => {
                        let raw = self.source.slice_span(b.span);
                        self.node(NativeKind::Bool, b.span, AstNodeType::Literal)
                            .with("raw", raw)
                            .with("value", b.value)
                    }
                    TsLit::BigInt(b) => {
                        let raw = self.source.slice_span(b.span);
                        if raw.starts_with('-') || self.slice(range).starts_with('-') {
                            self.convert_signed_number(literal.span)
                        } else {
                            self.convert_bigint(b)
                        }
                    }
                    TsLit::Tpl(tpl) => {
                        let types = tpl
                            .types
                            .iter()
                            .map(|t| self.convert_type(t))
                            .collect::<TsResult<Vec<_>>>()?;
                        let ends: Vec<u32> = types.iter().map(|t| t.range.1).collect();
                        let tpl_range = self.range(tpl.span);
                        let quasis = self.template_elements(tpl_range, &tpl.quasis, &ends);
                        return Ok(self
                            .node_at(NativeKind::TsTplLitType, tpl_range, AstNodeType::TSTemplateLiteralType)
                            .with("quasis", quasis)
                            .with("types", types));
                    }
                };
                Ok(self
                    .node_at(NativeKind::TsLitType, range, AstNodeType::TSLiteralType)
                    .with("literal", inner))
            }
            TsType::TsTypePredicate(predicate) => {
                let parameter_name = match &predicate.param_name {
                    TsThisTypeOrIdent::Ident(ident) => self.convert_ident(ident),
                    TsThisTypeOrIdent::TsThisType(this) => {
                        self.node(NativeKind::TsThisType, this.span, AstNodeType::TSThisType)
                    }
                };
                let type_annotation = match predicate.type_ann.as_deref() {
                    Some(ann) => {
                        let inner = self.convert_type(&ann.type_ann)?;
                        let range = inner.range;
                        Some(
                            self.node_at(NativeKind::TsTypeAnn, range, AstNodeType::TSTypeAnnotation)
                                .with("typeAnnotation", inner),
                        )
                    }
                    None => None,
                };
                Ok(self
                    .node(NativeKind::TsTypePredicate, predicate.span, AstNodeType::TSTypePredicate)
                    .with("asserts", predicate.asserts)
                    .with("parameterName", parameter_name)
                    .with("typeAnnotation", type_annotation))
            }
        }
    }

    /// Numeric literal type; a leading `-` becomes a unary expression.
    fn convert_signed_number(&mut self, span: swc_common::Span) -> Node {
        let range = self.range(span);
        let raw = self.slice(range);
        let Some(digits) = raw.strip_prefix('-') else {
            return self
                .node_at(NativeKind::Number, range, AstNodeType::Literal)
                .with("raw", raw)
                .with("value", number_value(raw));
        };
        let offset = (raw.len() - digits.trim_start().len()) as u32;
        let literal_range = Range(range.0 + offset, range.1);
        let digits = digits.trim_start();
        let literal = if let Some(bigint) = digits.strip_suffix('n') {
            self.node_at(NativeKind::BigInt, literal_range, AstNodeType::Literal)
                .with("bigint", bigint.replace('_', ""))
                .with("raw", digits)
                .with("value", Value::Null)
        } else {
            self.node_at(NativeKind::Number, literal_range, AstNodeType::Literal)
                .with("raw", digits)
                .with("value", number_value(digits))
        };
        self.make(AstNodeType::UnaryExpression, range)
            .with("argument", literal)
            .with("operator", "-")
            .with("prefix", true)
    }

    /// Mapped types carry a single member.
    fn check_mapped_members(&self, from: u32, range: Range) -> TsResult<()> {
        let close = range.1.saturating_sub(1);
        let mut pos = self.next_token(from);
        let bytes = self.text().as_bytes();
        if matches!(bytes.get(pos as usize), Some(b';' | b',')) {
            pos = self.next_token(pos + 1);
        }
        if pos < close {
            self.invalid_ast("A mapped type may not declare properties.", pos)?;
        }
        Ok(())
    }

    fn convert_import_type(&mut self, import: &swc_ecma_ast::TsImportType) -> TsResult<Node> {
        let literal = self.convert_str(&import.arg);
        let literal_range = literal.range;
        let argument = self
            .make(AstNodeType::TSLiteralType, literal_range)
            .with("literal", literal);
        let qualifier = import.qualifier.as_ref().map(|q| self.convert_entity_name(q));
        let type_arguments = self.convert_opt_type_args(import.type_args.as_deref())?;
        Ok(self
            .node(NativeKind::TsImportType, import.span, AstNodeType::TSImportType)
            .with("argument", argument)
            .with("qualifier", qualifier)
            .with("typeArguments", type_arguments))
    }

    fn convert_tuple_element(&mut self, element: &TsTupleElement) -> TsResult<Node> {
        let Some(label) = &element.label else {
            return self.convert_type(&element.ty);
        };
        let range = self.range(element.span);
        let (label_ident, rest) = match label {
            Pat::Ident(binding) => (binding, false),
            Pat::Rest(rest) => match rest.arg.as_ref() {
                Pat::Ident(binding) => (binding, true),
                other => return self.convert_pat(other, Ctx::root().pattern()),
            },
            other => return self.convert_pat(other, Ctx::root().pattern()),
        };
        let (element_type, optional) = match element.ty.as_ref() {
            TsType::TsOptionalType(optional) => (self.convert_type(&optional.type_ann)?, true),
            other => (self.convert_type(other)?, label_ident.id.optional),
        };
        let label = self.convert_ident(&label_ident.id);
        if !rest {
            return Ok(self
                .node_at(NativeKind::TsTupleElement, range, AstNodeType::TSNamedTupleMember)
                .with("elementType", element_type)
                .with("label", label)
                .with("optional", optional));
        }
        let member_range = Range(label.range.0, element_type.range.1);
        let member = self
            .make(AstNodeType::TSNamedTupleMember, member_range)
            .with("elementType", element_type)
            .with("label", label)
            .with("optional", optional);
        Ok(self
            .node_at(NativeKind::TsTupleElement, range, AstNodeType::TSRestType)
            .with("typeAnnotation", member))
    }

    // ---- type members --------------------------------------------------------

    pub(crate) fn convert_type_elements(
        &mut self,
        elements: &[TsTypeElement],
        parent: SiteParent,
    ) -> TsResult<Vec<Node>> {
        elements.iter().map(|e| self.convert_type_element(e, parent)).collect()
    }

    fn check_type_member(&self, kind: SiteKind, parent: SiteParent, start: u32, key_start: u32) -> TsResult<()> {
        let modifiers = self.modifiers(start, key_start, &[], ConstMode::Modifier);
        self.check_grammar(&ModifierSite::new(kind, parent).modifiers(&modifiers))
    }

    fn convert_type_element(&mut self, element: &TsTypeElement, parent: SiteParent) -> TsResult<Node> {
        let ctx = Ctx::root();
        match element {
            TsTypeElement::TsCallSignatureDecl(signature) => {
                let type_parameters = self.convert_opt_type_params(signature.type_params.as_deref(), SiteParent::Other)?;
                let params = self.convert_fn_params(&signature.params)?;
                let return_type = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
                Ok(self
                    .node(NativeKind::TsCallSignatureDecl, signature.span, AstNodeType::TSCallSignatureDeclaration)
                    .with("params", params)
                    .with_opt("returnType", return_type)
                    .with_opt("typeParameters", type_parameters))
            }
            TsTypeElement::TsConstructSignatureDecl(signature) => {
                let type_parameters = self.convert_opt_type_params(signature.type_params.as_deref(), SiteParent::Other)?;
                let params = self.convert_fn_params(&signature.params)?;
                let return_type = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
                Ok(self
                    .node(
                        NativeKind::TsConstructSignatureDecl,
                        signature.span,
                        AstNodeType::TSConstructSignatureDeclaration,
                    )
                    .with("params", params)
                    .with_opt("returnType", return_type)
                    .with_opt("typeParameters", type_parameters))
            }
            TsTypeElement::TsPropertySignature(signature) => {
                let range = self.range(signature.span);
                let key_start = self.range(signature.key.span()).0;
                let key_start = if signature.computed {
                    self.find(range.0, key_start, b'[').unwrap_or(key_start)
                } else {
                    key_start
                };
                self.check_type_member(SiteKind::PropertySignature, parent, range.0, key_start)?;
                let key = self.convert_expr(&signature.key, ctx)?;
                let type_annotation = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
                Ok(self
                    .node_at(NativeKind::TsPropertySignature, range, AstNodeType::TSPropertySignature)
                    .with("computed", signature.computed)
                    .with("key", key)
                    .with("optional", signature.optional)
                    .with("readonly", signature.readonly)
                    .with("static", false)
                    .with_opt("typeAnnotation", type_annotation))
            }
            TsTypeElement::TsMethodSignature(signature) => {
                let range = self.range(signature.span);
                let key_start = self.range(signature.key.span()).0;
                self.check_type_member(SiteKind::MethodSignature, parent, range.0, key_start)?;
                let key = self.convert_expr(&signature.key, ctx)?;
                let type_parameters = self.convert_opt_type_params(signature.type_params.as_deref(), SiteParent::Other)?;
                let params = self.convert_fn_params(&signature.params)?;
                let return_type = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
                Ok(self.method_signature(NativeKind::TsMethodSignature, range, "method", key, signature.computed)
                    .with("optional", signature.optional)
                    .with("params", params)
                    .with_opt("returnType", return_type)
                    .with_opt("typeParameters", type_parameters))
            }
            TsTypeElement::TsGetterSignature(signature) => {
                let range = self.range(signature.span);
                let key = self.convert_expr(&signature.key, ctx)?;
                let return_type = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
                Ok(self.method_signature(NativeKind::TsGetterSignature, range, "get", key, signature.computed)
                    .with("params", Vec::<Node>::new())
                    .with_opt("returnType", return_type))
            }
            TsTypeElement::TsSetterSignature(signature) => {
                let range = self.range(signature.span);
                let key = self.convert_expr(&signature.key, ctx)?;
                let param = self.convert_fn_param(&signature.param)?;
                Ok(self.method_signature(NativeKind::TsSetterSignature, range, "set", key, signature.computed)
                    .with("params", vec![param]))
            }
            TsTypeElement::TsIndexSignature(signature) => self.convert_index_signature(signature, parent, ctx),
        }
    }

    fn method_signature(&mut self, kind: NativeKind, range: Range, method_kind: &str, key: Node, computed: bool) -> Node {
        self.node_at(kind, range, AstNodeType::TSMethodSignature)
            .with("computed", computed)
            .with("key", key)
            .with("kind", method_kind)
            .with("optional", false)
            .with("readonly", false)
            .with("static", false)
    }

    pub(crate) fn convert_index_signature(
        &mut self,
        signature: &TsIndexSignature,
        parent: SiteParent,
        ctx: Ctx,
    ) -> TsResult<Node> {
        let range = self.range(signature.span);
        let bracket = self.find(range.0, range.1, b'[').unwrap_or(range.0);
        let modifiers = self.modifiers(range.0, bracket, &[], ConstMode::Modifier);
        self.check_grammar(&ModifierSite::new(SiteKind::IndexSignature, parent).modifiers(&modifiers))?;

        let parameters = self.convert_fn_params(&signature.params)?;
        let type_annotation = self.convert_opt_type_ann(signature.type_ann.as_deref())?;
        let mut node = self.node_at(NativeKind::TsIndexSignature, range, AstNodeType::TSIndexSignature);
        if let Some(accessibility) = get_accessibility(&modifiers) {
            node.set("accessibility", accessibility);
        }
        tracing::trace!(ambient = ctx.in_ambient, "converted index signature");
        Ok(node
            .with("parameters", parameters)
            .with("readonly", signature.readonly)
            .with("static", signature.is_static)
            .with_opt("typeAnnotation", type_annotation))
    }

    // ---- declarations --------------------------------------------------------

    pub(crate) fn convert_interface(
        &mut self,
        decl: &TsInterfaceDecl,
        ctx: Ctx,
        start: Option<u32>,
    ) -> TsResult<Node> {
        let mut range = self.range(decl.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare"]));
        let id_range = self.range(decl.id.span);
        let decorators = self.stray_decorators(range.0, id_range.0);
        let modifiers = self.modifiers(range.0, id_range.0, &decorators, ConstMode::Keyword);
        self.check_grammar(
            &ModifierSite::new(SiteKind::InterfaceDeclaration, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorators),
        )?;

        let body_start = self.range(decl.body.span).0;
        let header_start = decl
            .type_params
            .as_deref()
            .map_or(id_range.1, |p| self.range(p.span).1);
        for clause in scan_heritage(self.text(), header_start, body_start) {
            if clause.implements {
                self.invalid_ast("Interface declaration cannot have 'implements' clause.", clause.keyword.0)?;
            } else if clause.types.is_empty() {
                self.invalid_ast("'extends' list cannot be empty.", clause.keyword.0)?;
            }
        }
        for heritage in &decl.extends {
            if !matches!(heritage.expr.as_ref(), Expr::Ident(_) | Expr::Member(_)) {
                self.invalid_ast(
                    "Interface declaration can only extend an identifier/qualified name with optional type arguments.",
                    self.range(heritage.expr.span()).0,
                )?;
            }
        }

        let id = self.convert_ident(&decl.id);
        let type_parameters = self.convert_opt_type_params(decl.type_params.as_deref(), SiteParent::Interface)?;
        let extends = decl
            .extends
            .iter()
            .map(|h| self.convert_heritage_type(h, AstNodeType::TSInterfaceHeritage, ctx))
            .collect::<TsResult<Vec<_>>>()?;
        let members = self.convert_type_elements(&decl.body.body, SiteParent::Interface)?;
        let body = self
            .node(NativeKind::TsInterfaceBody, decl.body.span, AstNodeType::TSInterfaceBody)
            .with("body", members);
        Ok(self
            .node_at(NativeKind::TsInterfaceDecl, range, AstNodeType::TSInterfaceDeclaration)
            .with("body", body)
            .with("declare", decl.declare)
            .with("extends", extends)
            .with("id", id)
            .with_opt("typeParameters", type_parameters))
    }

    pub(crate) fn convert_type_alias(
        &mut self,
        decl: &TsTypeAliasDecl,
        ctx: Ctx,
        start: Option<u32>,
    ) -> TsResult<Node> {
        let mut range = self.range(decl.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare"]));
        let id_start = self.range(decl.id.span).0;
        let decorators = self.stray_decorators(range.0, id_start);
        let modifiers = self.modifiers(range.0, id_start, &decorators, ConstMode::Keyword);
        self.check_grammar(
            &ModifierSite::new(SiteKind::TypeAliasDeclaration, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorators),
        )?;

        let id = self.convert_ident(&decl.id);
        let type_parameters = self.convert_opt_type_params(decl.type_params.as_deref(), SiteParent::TypeAlias)?;
        let type_annotation = self.convert_type(&decl.type_ann)?;
        Ok(self
            .node_at(NativeKind::TsTypeAliasDecl, range, AstNodeType::TSTypeAliasDeclaration)
            .with("declare", decl.declare)
            .with("id", id)
            .with("typeAnnotation", type_annotation)
            .with_opt("typeParameters", type_parameters))
    }

    pub(crate) fn convert_enum(&mut self, decl: &TsEnumDecl, ctx: Ctx, start: Option<u32>) -> TsResult<Node> {
        let mut range = self.range(decl.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare", "const"]));
        let id_range = self.range(decl.id.span);
        let decorators = self.stray_decorators(range.0, id_range.0);
        let modifiers = self.modifiers(range.0, id_range.0, &decorators, ConstMode::Modifier);
        self.check_grammar(
            &ModifierSite::new(SiteKind::EnumDeclaration, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorators),
        )?;

        let id = self.convert_ident(&decl.id);
        let mut members = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            let member_id = match &member.id {
                TsEnumMemberId::Ident(ident) => self.convert_ident(ident),
                TsEnumMemberId::Str(s) => self.convert_str(s),
            };
            let initializer = member
                .init
                .as_deref()
                .map(|e| self.convert_expr(e, ctx.value()))
                .transpose()?;
            members.push(
                self.node(NativeKind::TsEnumMember, member.span, AstNodeType::TSEnumMember)
                    .with("computed", false)
                    .with("id", member_id)
                    .with_opt("initializer", initializer),
            );
        }
        let body_open = self.find(id_range.1, range.1, b'{').unwrap_or(id_range.1);
        let body = self
            .make(AstNodeType::TSEnumBody, Range(body_open, range.1))
            .with("members", members);
        Ok(self
            .node_at(NativeKind::TsEnumDecl, range, AstNodeType::TSEnumDeclaration)
            .with("body", body)
            .with("const", decl.is_const)
            .with("declare", decl.declare)
            .with("id", id))
    }

    /// `module`, `namespace` and `global` declarations. Dotted namespace
    /// names collapse into one declaration with a qualified id.
    pub(crate) fn convert_ts_module(
        &mut self,
        decl: &TsModuleDecl,
        ctx: Ctx,
        start: Option<u32>,
    ) -> TsResult<Node> {
        let mut range = self.range(decl.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare"]));
        let id_start = match &decl.id {
            TsModuleName::Ident(ident) => self.range(ident.span).0,
            TsModuleName::Str(s) => self.range(s.span).0,
        };
        let decorators = self.stray_decorators(range.0, id_start);
        let modifiers = self.modifiers(range.0, id_start, &decorators, ConstMode::Keyword);
        self.check_grammar(
            &ModifierSite::new(SiteKind::ModuleDeclaration, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorators),
        )?;

        let ambient = decl.declare || ctx.in_ambient;
        let (kind, id) = match &decl.id {
            TsModuleName::Str(s) => {
                if !ambient {
                    self.invalid_ast("Only ambient modules can use quoted names.", id_start)?;
                }
                ("module", self.convert_str(s))
            }
            TsModuleName::Ident(ident) => {
                let kind = if decl.global {
                    "global"
                } else if word_before(self.text(), id_start) == "namespace" {
                    "namespace"
                } else {
                    "module"
                };
                (kind, self.convert_ident(ident))
            }
        };

        let inner = ctx.ambient(decl.declare || decl.global).value();
        let (id, body) = match &decl.body {
            Some(body) => self.convert_namespace_body(id, body, inner)?,
            None => {
                if kind == "namespace" {
                    self.invalid_ast("Expected a module body", range.0)?;
                }
                (id, None)
            }
        };
        Ok(self
            .node_at(NativeKind::TsModuleDecl, range, AstNodeType::TSModuleDeclaration)
            .with_opt("body", body)
            .with("declare", decl.declare)
            .with("global", decl.global)
            .with("id", id)
            .with("kind", kind))
    }

    fn convert_namespace_body(
        &mut self,
        mut id: Node,
        body: &TsNamespaceBody,
        ctx: Ctx,
    ) -> TsResult<(Node, Option<Node>)> {
        let mut body = body;
        loop {
            match body {
                TsNamespaceBody::TsModuleBlock(block) => {
                    let items = self.convert_module_block_items(&block.body, ctx)?;
                    let node = self
                        .node(NativeKind::TsModuleBlock, block.span, AstNodeType::TSModuleBlock)
                        .with("body", items);
                    return Ok((id, Some(node)));
                }
                TsNamespaceBody::TsNamespaceDecl(nested) => {
                    let right = self.convert_ident(&nested.id);
                    let range = Range(id.range.0, right.range.1);
                    id = self
                        .node_at(NativeKind::TsNamespaceDecl, range, AstNodeType::TSQualifiedName)
                        .with("left", id)
                        .with("right", right);
                    body = &nested.body;
                }
            }
        }
    }

    // ---- expressions ---------------------------------------------------------

    pub(crate) fn convert_ts_as(&mut self, expr: &TsAsExpr, ctx: Ctx) -> TsResult<Node> {
        let expression = self.convert_expr(&expr.expr, ctx.value())?;
        let type_annotation = self.convert_type(&expr.type_ann)?;
        Ok(self
            .node(NativeKind::TsAsExpr, expr.span, AstNodeType::TSAsExpression)
            .with("expression", expression)
            .with("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_ts_satisfies(&mut self, expr: &TsSatisfiesExpr, ctx: Ctx) -> TsResult<Node> {
        let expression = self.convert_expr(&expr.expr, ctx.value())?;
        let type_annotation = self.convert_type(&expr.type_ann)?;
        Ok(self
            .node(NativeKind::TsSatisfiesExpr, expr.span, AstNodeType::TSSatisfiesExpression)
            .with("expression", expression)
            .with("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_ts_type_assertion(&mut self, expr: &TsTypeAssertion, ctx: Ctx) -> TsResult<Node> {
        let type_annotation = self.convert_type(&expr.type_ann)?;
        let expression = self.convert_expr(&expr.expr, ctx.value())?;
        Ok(self
            .node(NativeKind::TsTypeAssertion, expr.span, AstNodeType::TSTypeAssertion)
            .with("expression", expression)
            .with("typeAnnotation", type_annotation))
    }

    pub(crate) fn convert_ts_instantiation(&mut self, expr: &TsInstantiation, ctx: Ctx) -> TsResult<Node> {
        let expression = self.convert_expr(&expr.expr, ctx.value())?;
        let type_arguments = self.convert_opt_type_args(Some(&*expr.type_args))?;
        Ok(self
            .node(NativeKind::TsInstantiation, expr.span, AstNodeType::TSInstantiationExpression)
            .with("expression", expression)
            .with("typeArguments", type_arguments))
    }

    /// `x as const` and `<const>x`. The `const` type is a reference to an
    /// identifier named `const`.
    pub(crate) fn convert_ts_const_assertion(&mut self, expr: &TsConstAssertion, ctx: Ctx) -> TsResult<Node> {
        let range = self.range(expr.span);
        let expression = self.convert_expr(&expr.expr, ctx.value())?;
        let angle = self.text().as_bytes().get(range.0 as usize) == Some(&b'<');
        let const_range = if angle {
            let start = self.next_token(range.0 + 1);
            Range(start, start + 5)
        } else {
            Range(range.1.saturating_sub(5), range.1)
        };
        let name = self
            .make(AstNodeType::Identifier, const_range)
            .with("decorators", Vec::<Node>::new())
            .with("name", "const")
            .with("optional", false);
        let type_annotation = self
            .make(AstNodeType::TSTypeReference, const_range)
            .with("typeName", name);
        let ty = if angle {
            AstNodeType::TSTypeAssertion
        } else {
            AstNodeType::TSAsExpression
        };
        Ok(self
            .node_at(NativeKind::TsConstAssertion, range, ty)
            .with("expression", expression)
            .with("typeAnnotation", type_annotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_before_skips_whitespace() {
        assert_eq!(word_before("declare namespace  A {}", 19), "namespace");
        assert_eq!(word_before("module A {}", 7), "module");
        assert_eq!(word_before("A", 0), "");
    }

    #[test]
    fn plus_minus_values() {
        assert_eq!(plus_minus(TruePlusMinus::True), Value::Bool(true));
        assert_eq!(plus_minus(TruePlusMinus::Minus), Value::from("-"));
    }
}
