use swc_common::Spanned;
use swc_ecma_ast::{
    BlockStmt, Decl, Expr, ForHead, Pat, Stmt, SwitchCase, UsingDecl, VarDecl, VarDeclKind,
    VarDeclOrExpr, VarDeclarator,
};

use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node, Value};
use crate::error::TsResult;
use crate::grammar::{ModifierSite, SiteKind, SiteParent};
use crate::location::Range;
use crate::modifiers::ConstMode;
use crate::native::NativeKind;
use crate::node_utils::{declaration_kind, using_declaration_kind};

/// Which loop a for-in/of head belongs to, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopKind {
    ForIn,
    ForOf,
}

impl LoopKind {
    fn as_str(self) -> &'static str {
        match self {
            LoopKind::ForIn => "for...in",
            LoopKind::ForOf => "for...of",
        }
    }
}

impl Converter<'_, '_> {
    pub(crate) fn convert_stmt(&mut self, stmt: &Stmt, ctx: Ctx) -> TsResult<Node> {
        let ctx = ctx.value();
        match stmt {
            Stmt::Block(block) => self.convert_block(block, ctx, false),
            Stmt::Empty(s) => Ok(self.node(NativeKind::EmptyStmt, s.span, AstNodeType::EmptyStatement)),
            Stmt::Debugger(s) => {
                Ok(self.node(NativeKind::DebuggerStmt, s.span, AstNodeType::DebuggerStatement))
            }
            Stmt::With(s) => {
                let object = self.convert_expr(&s.obj, ctx)?;
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::WithStmt, s.span, AstNodeType::WithStatement)
                    .with("body", body)
                    .with("object", object))
            }
            Stmt::Return(s) => {
                let argument = s.arg.as_deref().map(|e| self.convert_expr(e, ctx)).transpose()?;
                Ok(self
                    .node(NativeKind::ReturnStmt, s.span, AstNodeType::ReturnStatement)
                    .with("argument", argument))
            }
            Stmt::Labeled(s) => {
                let label = self.convert_ident(&s.label);
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::LabeledStmt, s.span, AstNodeType::LabeledStatement)
                    .with("body", body)
                    .with("label", label))
            }
            Stmt::Break(s) => {
                let label = s.label.as_ref().map(|l| self.convert_ident(l));
                Ok(self
                    .node(NativeKind::BreakStmt, s.span, AstNodeType::BreakStatement)
                    .with("label", label))
            }
            Stmt::Continue(s) => {
                let label = s.label.as_ref().map(|l| self.convert_ident(l));
                Ok(self
                    .node(NativeKind::ContinueStmt, s.span, AstNodeType::ContinueStatement)
                    .with("label", label))
            }
            Stmt::If(s) => {
                let test = self.convert_expr(&s.test, ctx)?;
                let consequent = self.convert_stmt(&s.cons, ctx)?;
                let alternate = s.alt.as_deref().map(|a| self.convert_stmt(a, ctx)).transpose()?;
                Ok(self
                    .node(NativeKind::IfStmt, s.span, AstNodeType::IfStatement)
                    .with("alternate", alternate)
                    .with("consequent", consequent)
                    .with("test", test))
            }
            Stmt::Switch(s) => {
                let discriminant = self.convert_expr(&s.discriminant, ctx)?;
                let cases = s
                    .cases
                    .iter()
                    .map(|case| self.convert_switch_case(case, ctx))
                    .collect::<TsResult<Vec<_>>>()?;
                Ok(self
                    .node(NativeKind::SwitchStmt, s.span, AstNodeType::SwitchStatement)
                    .with("cases", cases)
                    .with("discriminant", discriminant))
            }
            Stmt::Throw(s) => {
                let argument = if matches!(s.arg.as_ref(), Expr::Invalid(_)) {
                    self.invalid_ast("A throw statement must throw an expression.", self.range(s.span).0)?;
                    None
                } else {
                    Some(self.convert_expr(&s.arg, ctx)?)
                };
                Ok(self
                    .node(NativeKind::ThrowStmt, s.span, AstNodeType::ThrowStatement)
                    .with("argument", argument))
            }
            Stmt::Try(s) => {
                let block = self.convert_block(&s.block, ctx, false)?;
                let handler = match &s.handler {
                    Some(clause) => {
                        let param = clause
                            .param
                            .as_ref()
                            .map(|p| self.convert_pat(p, ctx.pattern()))
                            .transpose()?;
                        let body = self.convert_block(&clause.body, ctx, false)?;
                        Some(
                            self.node(NativeKind::CatchClause, clause.span, AstNodeType::CatchClause)
                                .with("body", body)
                                .with("param", param),
                        )
                    }
                    None => None,
                };
                let finalizer = s
                    .finalizer
                    .as_ref()
                    .map(|f| self.convert_block(f, ctx, false))
                    .transpose()?;
                Ok(self
                    .node(NativeKind::TryStmt, s.span, AstNodeType::TryStatement)
                    .with("block", block)
                    .with("finalizer", finalizer)
                    .with("handler", handler))
            }
            Stmt::While(s) => {
                let test = self.convert_expr(&s.test, ctx)?;
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::WhileStmt, s.span, AstNodeType::WhileStatement)
                    .with("body", body)
                    .with("test", test))
            }
            Stmt::DoWhile(s) => {
                let body = self.convert_stmt(&s.body, ctx)?;
                let test = self.convert_expr(&s.test, ctx)?;
                Ok(self
                    .node(NativeKind::DoWhileStmt, s.span, AstNodeType::DoWhileStatement)
                    .with("body", body)
                    .with("test", test))
            }
            Stmt::For(s) => {
                let init = match &s.init {
                    Some(VarDeclOrExpr::VarDecl(decl)) => Some(self.convert_var_decl(decl, ctx, None, false)?),
                    Some(VarDeclOrExpr::Expr(expr)) => Some(self.convert_expr(expr, ctx)?),
                    None => None,
                };
                let test = s.test.as_deref().map(|e| self.convert_expr(e, ctx)).transpose()?;
                let update = s.update.as_deref().map(|e| self.convert_expr(e, ctx)).transpose()?;
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::ForStmt, s.span, AstNodeType::ForStatement)
                    .with("body", body)
                    .with("init", init)
                    .with("test", test)
                    .with("update", update))
            }
            Stmt::ForIn(s) => {
                let left = self.convert_for_head(&s.left, ctx, LoopKind::ForIn)?;
                let right = self.convert_expr(&s.right, ctx)?;
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::ForInStmt, s.span, AstNodeType::ForInStatement)
                    .with("body", body)
                    .with("left", left)
                    .with("right", right))
            }
            Stmt::ForOf(s) => {
                let left = self.convert_for_head(&s.left, ctx, LoopKind::ForOf)?;
                let right = self.convert_expr(&s.right, ctx)?;
                let body = self.convert_stmt(&s.body, ctx)?;
                Ok(self
                    .node(NativeKind::ForOfStmt, s.span, AstNodeType::ForOfStatement)
                    .with("await", s.is_await)
                    .with("body", body)
                    .with("left", left)
                    .with("right", right))
            }
            Stmt::Decl(decl) => self.convert_decl(decl, ctx, None),
            Stmt::Expr(s) => {
                let expression = self.convert_expr(&s.expr, ctx)?;
                Ok(self
                    .node(NativeKind::ExprStmt, s.span, AstNodeType::ExpressionStatement)
                    .with("expression", expression))
            }
        }
    }

    /// `function_body` enables the directive prologue.
    pub(crate) fn convert_block(&mut self, block: &BlockStmt, ctx: Ctx, function_body: bool) -> TsResult<Node> {
        let stmts: Vec<&Stmt> = block.stmts.iter().collect();
        let ctx = if function_body { ctx.within(SiteParent::Other) } else { ctx };
        let body = self.convert_statement_list(&stmts, ctx, function_body)?;
        Ok(self
            .node(NativeKind::BlockStmt, block.span, AstNodeType::BlockStatement)
            .with("body", body))
    }

    fn convert_switch_case(&mut self, case: &SwitchCase, ctx: Ctx) -> TsResult<Node> {
        let test = case.test.as_deref().map(|e| self.convert_expr(e, ctx)).transpose()?;
        let consequent = case
            .cons
            .iter()
            .map(|s| self.convert_stmt(s, ctx))
            .collect::<TsResult<Vec<_>>>()?;
        Ok(self
            .node(NativeKind::SwitchCase, case.span, AstNodeType::SwitchCase)
            .with("consequent", consequent)
            .with("test", test))
    }

    /// Converts a declaration. `start` overrides the range start when the
    /// declaration is wrapped by an export.
    pub(crate) fn convert_decl(&mut self, decl: &Decl, ctx: Ctx, start: Option<u32>) -> TsResult<Node> {
        match decl {
            Decl::Class(class) => self.convert_class_decl(class, ctx, start),
            Decl::Fn(function) => self.convert_fn_decl(function, ctx, start),
            Decl::Var(var) => self.convert_var_decl(var, ctx, start, true),
            Decl::Using(using) => self.convert_using_decl(using, ctx, start, true),
            Decl::TsInterface(interface) => self.convert_interface(interface, ctx, start),
            Decl::TsTypeAlias(alias) => self.convert_type_alias(alias, ctx, start),
            Decl::TsEnum(decl) => self.convert_enum(decl, ctx, start),
            Decl::TsModule(module) => self.convert_ts_module(module, ctx, start),
        }
    }

    /// `statement` is false for `for` heads, which skip the initializer checks.
    pub(crate) fn convert_var_decl(
        &mut self,
        decl: &VarDecl,
        ctx: Ctx,
        start: Option<u32>,
        statement: bool,
    ) -> TsResult<Node> {
        let kind = declaration_kind(decl.kind);
        let mut range = self.range(decl.span);
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare"]));
        let ambient = decl.declare || ctx.in_ambient;

        if statement {
            let modifiers = self.modifiers(range.0, self.range(decl.span).1, &[], ConstMode::Keyword);
            self.check_grammar(
                &ModifierSite::new(SiteKind::VariableStatement, ctx.container)
                    .modifiers(&modifiers)
                    .declaration_kind(kind),
            )?;
        }

        let declarations = self.convert_declarators(&decl.decls, ctx.ambient(decl.declare))?;
        self.check_declarators(&decl.decls, range, kind, decl.declare, ambient, statement)?;
        if statement && decl.kind == VarDeclKind::Const && !ambient {
            for declarator in &decl.decls {
                if declarator.init.is_none() {
                    return Err(self.grammar_error(
                        "'const' declarations must be initialized.",
                        self.range(declarator.span).0,
                    ));
                }
            }
        }

        Ok(self
            .node_at(NativeKind::VarDecl, range, AstNodeType::VariableDeclaration)
            .with("declarations", declarations)
            .with("declare", decl.declare)
            .with("kind", kind))
    }

    pub(crate) fn convert_using_decl(
        &mut self,
        decl: &UsingDecl,
        ctx: Ctx,
        start: Option<u32>,
        statement: bool,
    ) -> TsResult<Node> {
        let kind = using_declaration_kind(decl.is_await);
        let mut range = self.range(decl.span);
        if let Some(start) = start {
            range.0 = start;
        }

        if statement {
            let modifiers = self.modifiers(range.0, range.1, &[], ConstMode::Keyword);
            self.check_grammar(
                &ModifierSite::new(SiteKind::VariableStatement, ctx.container)
                    .modifiers(&modifiers)
                    .declaration_kind(kind),
            )?;
        }

        let declarations = self.convert_declarators(&decl.decls, ctx)?;
        self.check_declarators(&decl.decls, range, kind, false, ctx.in_ambient, statement)?;
        if statement {
            for declarator in &decl.decls {
                if declarator.init.is_none() {
                    return Err(self.grammar_error(
                        format!("'{kind}' declarations must be initialized."),
                        self.range(declarator.span).0,
                    ));
                }
                if !matches!(declarator.name, Pat::Ident(_)) {
                    return Err(self.grammar_error(
                        format!("'{kind}' declarations may not have binding patterns."),
                        self.range(declarator.name.span()).0,
                    ));
                }
            }
        }

        Ok(self
            .node_at(NativeKind::UsingDecl, range, AstNodeType::VariableDeclaration)
            .with("declarations", declarations)
            .with("declare", false)
            .with("kind", kind))
    }

    fn convert_declarators(&mut self, decls: &[VarDeclarator], ctx: Ctx) -> TsResult<Vec<Node>> {
        decls
            .iter()
            .map(|declarator| {
                let id = self.convert_pat(&declarator.name, ctx.pattern())?;
                let init = declarator
                    .init
                    .as_deref()
                    .map(|e| self.convert_expr(e, ctx.value()))
                    .transpose()?;
                Ok(self
                    .node(NativeKind::VarDeclarator, declarator.span, AstNodeType::VariableDeclarator)
                    .with("definite", declarator.definite)
                    .with("id", id)
                    .with("init", init))
            })
            .collect()
    }

    fn check_declarators(
        &self,
        decls: &[VarDeclarator],
        range: Range,
        kind: &str,
        declare: bool,
        ambient: bool,
        statement: bool,
    ) -> TsResult<()> {
        if decls.is_empty() {
            self.invalid_ast(
                "A variable declaration list must have at least one variable declarator.",
                range.0,
            )?;
        }
        if declare || matches!(kind, "const" | "using" | "await using") {
            if let Some(declarator) = decls.iter().find(|d| d.definite) {
                return Err(self.grammar_error(
                    "A definite assignment assertion '!' is not permitted in this context.",
                    self.range(declarator.span).0,
                ));
            }
        }
        if statement && ambient {
            let typed = |d: &VarDeclarator| matches!(&d.name, Pat::Ident(b) if b.type_ann.is_some());
            let offending = decls
                .iter()
                .find(|d| d.init.is_some() && (matches!(kind, "let" | "var") || typed(d)));
            if let Some(declarator) = offending {
                return Err(self.grammar_error(
                    "Initializers are not permitted in ambient contexts.",
                    self.range(declarator.span).0,
                ));
            }
        }
        Ok(())
    }

    fn convert_for_head(&mut self, head: &ForHead, ctx: Ctx, loop_kind: LoopKind) -> TsResult<Option<Node>> {
        let loop_name = loop_kind.as_str();
        match head {
            ForHead::VarDecl(decl) => {
                self.check_for_declarations(&decl.decls, self.range(decl.span), loop_name)?;
                Ok(Some(self.convert_var_decl(decl, ctx, None, false)?))
            }
            ForHead::UsingDecl(decl) => {
                self.check_for_declarations(&decl.decls, self.range(decl.span), loop_name)?;
                Ok(Some(self.convert_using_decl(decl, ctx, None, false)?))
            }
            ForHead::Pat(pat) => {
                let assignable = match pat.as_ref() {
                    Pat::Expr(expr) => matches!(
                        unwrap_parens(expr),
                        Expr::Ident(_) | Expr::Member(_) | Expr::SuperProp(_) | Expr::Array(_) | Expr::Object(_)
                    ),
                    Pat::Invalid(_) => false,
                    _ => true,
                };
                if !assignable {
                    self.invalid_ast(
                        &format!(
                            "The left-hand side of a '{loop_name}' statement must be a variable or a property access."
                        ),
                        self.range(pat.span()).0,
                    )?;
                    return Ok(None);
                }
                Ok(Some(self.convert_pat(pat, ctx.pattern())?))
            }
        }
    }

    fn check_for_declarations(&self, decls: &[VarDeclarator], range: Range, loop_name: &str) -> TsResult<()> {
        if decls.len() != 1 {
            self.invalid_ast(
                &format!("Only a single variable declaration is allowed in a '{loop_name}' statement."),
                range.0,
            )?;
        }
        if let Some(declarator) = decls.iter().find(|d| d.init.is_some()) {
            self.invalid_ast(
                &format!("The variable declaration of a '{loop_name}' statement cannot have an initializer."),
                self.range(declarator.span).0,
            )?;
        }
        Ok(())
    }

    /// Declarations inside a namespace body.
    pub(crate) fn convert_module_block_items(
        &mut self,
        items: &[swc_ecma_ast::ModuleItem],
        ctx: Ctx,
    ) -> TsResult<Vec<Node>> {
        let items: Vec<_> = items.iter().collect();
        let ctx = ctx.within(SiteParent::ModuleBlock);
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(match item {
                swc_ecma_ast::ModuleItem::ModuleDecl(decl) => self.convert_module_decl(decl, ctx)?,
                swc_ecma_ast::ModuleItem::Stmt(stmt) => self.convert_stmt(stmt, ctx)?,
            });
        }
        Ok(out)
    }

    pub(crate) fn list(&self, nodes: Vec<Option<Node>>) -> Value {
        Value::List(nodes.into_iter().map(Value::from).collect())
    }
}

fn unwrap_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_parens(&paren.expr),
        other => other,
    }
}
