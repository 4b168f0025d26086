use swc_common::Spanned;
use swc_ecma_ast::{ArrowExpr, BlockStmtOrExpr, FnDecl, FnExpr, Function, Ident, Param, Pat};

use super::{Converter, Ctx, decorator_ranges};
use crate::ast::{AstNodeType, Node};
use crate::error::TsResult;
use crate::grammar::{ModifierSite, SiteKind, SiteParent};
use crate::location::Range;
use crate::modifiers::ConstMode;
use crate::native::NativeKind;

/// Converted pieces shared by every function-like node.
pub(crate) struct FunctionParts {
    pub params: Vec<Node>,
    pub body: Option<Node>,
    pub return_type: Option<Node>,
    pub type_parameters: Option<Node>,
}

impl FunctionParts {
    /// Fills the common fields of a function node.
    pub fn apply(self, node: Node, function: &Function, id: Option<Node>, declare: bool) -> Node {
        let has_body = self.body.is_some();
        let mut node = node.with("async", function.is_async);
        if has_body || node.ty != AstNodeType::TSDeclareFunction {
            node = node.with("body", self.body);
        }
        node.with("declare", declare)
            .with("expression", false)
            .with("generator", function.is_generator)
            .with("id", id)
            .with("params", self.params)
            .with_opt("returnType", self.return_type)
            .with_opt("typeParameters", self.type_parameters)
    }
}

impl Converter<'_, '_> {
    pub(crate) fn convert_fn_decl(&mut self, decl: &FnDecl, ctx: Ctx, start: Option<u32>) -> TsResult<Node> {
        let mut range = self.range(decl.function.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare", "async"]));
        self.convert_function_declaration(&decl.function, Some(&decl.ident), decl.declare, ctx, range)
    }

    /// `function` declarations, including `export default function` and
    /// bodyless overload signatures.
    pub(crate) fn convert_function_declaration(
        &mut self,
        function: &Function,
        ident: Option<&Ident>,
        declare: bool,
        ctx: Ctx,
        range: Range,
    ) -> TsResult<Node> {
        let has_body = function.body.is_some();
        if declare {
            if has_body {
                return Err(self.grammar_error("An implementation cannot be declared in ambient contexts.", range.0));
            }
            if function.is_async {
                return Err(self.grammar_error("'async' modifier cannot be used in an ambient context.", range.0));
            }
            if function.is_generator {
                return Err(self.grammar_error("Generators are not allowed in an ambient context.", range.0));
            }
        } else if !has_body && function.is_generator {
            return Err(self.grammar_error("An overload signature cannot be declared as a generator.", range.0));
        }

        let limit = ident.map(|i| self.range(i.span).0).unwrap_or(range.1);
        let modifiers = self.modifiers(range.0, limit, &[], ConstMode::Keyword);
        let decorators = decorator_ranges(self, &function.decorators);
        self.check_grammar(
            &ModifierSite::new(SiteKind::FunctionDeclaration, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorators)
                .has_body(has_body),
        )?;

        let id = ident.map(|i| self.convert_ident(i));
        let owner = SiteParent::Function {
            kind: SiteKind::FunctionDeclaration,
            has_body,
            in_class_declaration: false,
        };
        let parts = self.convert_function_parts(function, owner, ctx.ambient(declare))?;
        let ty = if has_body {
            AstNodeType::FunctionDeclaration
        } else {
            AstNodeType::TSDeclareFunction
        };
        let node = self.node_at(NativeKind::FnDecl, range, ty);
        self.record(&node, NativeKind::Function, self.range(function.span));
        Ok(parts.apply(node, function, id, declare))
    }

    pub(crate) fn convert_fn_expr(&mut self, expr: &FnExpr, ctx: Ctx) -> TsResult<Node> {
        let range = self.range(expr.function.span);
        let limit = expr.ident.as_ref().map(|i| self.range(i.span).0).unwrap_or(range.1);
        let modifiers = self.modifiers(range.0, limit, &[], ConstMode::Keyword);
        self.check_grammar(
            &ModifierSite::new(SiteKind::FunctionExpression, ctx.container).modifiers(&modifiers),
        )?;

        let id = expr.ident.as_ref().map(|i| self.convert_ident(i));
        let owner = SiteParent::Function {
            kind: SiteKind::FunctionExpression,
            has_body: expr.function.body.is_some(),
            in_class_declaration: false,
        };
        let parts = self.convert_function_parts(&expr.function, owner, ctx)?;
        let node = self.node_at(NativeKind::FnExpr, range, AstNodeType::FunctionExpression);
        self.record(&node, NativeKind::Function, range);
        Ok(parts.apply(node, &expr.function, id, false))
    }

    pub(crate) fn convert_arrow(&mut self, arrow: &ArrowExpr, ctx: Ctx) -> TsResult<Node> {
        let ctx = ctx.value();
        let params = arrow
            .params
            .iter()
            .map(|p| self.convert_pat(p, ctx.pattern()))
            .collect::<TsResult<Vec<_>>>()?;
        let type_parameters = self.convert_opt_type_params(arrow.type_params.as_deref(), SiteParent::Other)?;
        let return_type = self.convert_opt_type_ann(arrow.return_type.as_deref())?;
        let (body, expression) = match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => (self.convert_block(block, ctx, true)?, false),
            BlockStmtOrExpr::Expr(expr) => (self.convert_expr(expr, ctx)?, true),
        };
        Ok(self
            .node(NativeKind::ArrowExpr, arrow.span, AstNodeType::ArrowFunctionExpression)
            .with("async", arrow.is_async)
            .with("body", body)
            .with("expression", expression)
            .with("generator", false)
            .with("id", None::<Node>)
            .with("params", params)
            .with_opt("returnType", return_type)
            .with_opt("typeParameters", type_parameters))
    }

    /// Function value of a method: starts at its type parameters or `(`.
    pub(crate) fn convert_method_function(
        &mut self,
        function: &Function,
        key_end: u32,
        ctx: Ctx,
        owner_kind: NativeKind,
    ) -> TsResult<Node> {
        let owner = SiteParent::Function {
            kind: SiteKind::MethodDeclaration,
            has_body: function.body.is_some(),
            in_class_declaration: false,
        };
        self.method_function_with_owner(function, key_end, ctx, owner, owner_kind)
    }

    pub(crate) fn method_function_with_owner(
        &mut self,
        function: &Function,
        key_end: u32,
        ctx: Ctx,
        owner: SiteParent,
        owner_kind: NativeKind,
    ) -> TsResult<Node> {
        let end = self.range(function.span).1;
        let paren = self.find(key_end, end, b'(').unwrap_or(key_end);
        let start = match function.type_params.as_deref() {
            Some(params) => self.range(params.span).0.min(paren),
            None => paren,
        };
        let parts = self.convert_function_parts(function, owner, ctx)?;
        let ty = if parts.body.is_some() {
            AstNodeType::FunctionExpression
        } else {
            AstNodeType::TSEmptyBodyFunctionExpression
        };
        let node = self.make(ty, Range(start, end));
        self.record(&node, NativeKind::Function, self.range(function.span));
        tracing::trace!(owner = %owner_kind, "converted method value");
        Ok(parts.apply(node, function, None, false))
    }

    pub(crate) fn convert_function_parts(
        &mut self,
        function: &Function,
        owner: SiteParent,
        ctx: Ctx,
    ) -> TsResult<FunctionParts> {
        let ctx = ctx.value();
        let type_parameters = self.convert_opt_type_params(function.type_params.as_deref(), SiteParent::Other)?;
        let params = self.convert_params(&function.params, owner, ctx)?;
        let return_type = self.convert_opt_type_ann(function.return_type.as_deref())?;
        let body = function
            .body
            .as_ref()
            .map(|b| self.convert_block(b, ctx, true))
            .transpose()?;
        Ok(FunctionParts {
            params,
            body,
            return_type,
            type_parameters,
        })
    }

    pub(crate) fn convert_params(&mut self, params: &[Param], owner: SiteParent, ctx: Ctx) -> TsResult<Vec<Node>> {
        params.iter().map(|param| self.convert_param(param, owner, ctx)).collect()
    }

    pub(crate) fn convert_param(&mut self, param: &Param, owner: SiteParent, ctx: Ctx) -> TsResult<Node> {
        let decorators = decorator_ranges(self, &param.decorators);
        let range = self.range(param.span);
        let pat_start = self.range(param.pat.span()).0;
        let start = decorators.first().map_or(range.0, |d| d.0.min(range.0));
        let modifiers = self.modifiers(start, pat_start, &decorators, ConstMode::Modifier);
        let is_this = matches!(&param.pat, Pat::Ident(binding) if &*binding.id.sym == "this");
        self.check_grammar(
            &ModifierSite::new(SiteKind::Parameter, owner)
                .modifiers(&modifiers)
                .decorators(&decorators)
                .this_param(is_this),
        )?;

        let mut node = self.convert_pat(&param.pat, ctx.pattern())?;
        if !param.decorators.is_empty() {
            let converted = self.convert_decorators(&param.decorators, ctx)?;
            node.set("decorators", converted);
        }
        self.record(&node, NativeKind::Param, range);
        Ok(node)
    }
}
