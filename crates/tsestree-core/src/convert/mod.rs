//! Native tree to ESTree conversion.
//!
//! [`Converter`] walks the swc tree top-down. Each native construct has a
//! builder function returning one output [`Node`]; contextual state travels
//! in a [`Ctx`] value passed down by copy. Kinds without a dedicated builder
//! go through the generic deep copy in [`fallback`].

mod class;
mod expression;
mod fallback;
mod function;
mod jsx;
mod module;
mod pattern;
mod statement;
pub(crate) mod text;
mod typescript;

use swc_common::Span;
use swc_ecma_ast::{Expr, Lit, ModuleItem, Program, Stmt};

use crate::ast::{AstNodeType, Node, NodeId, Value};
use crate::error::{TsError, TsErrorKind, TsResult};
use crate::grammar::{self, ModifierSite, SiteParent};
use crate::location::{Range, SourceText};
use crate::modifiers::{self, ConstMode, Modifier};
use crate::native::{NativeKey, NativeKind};
use crate::node_maps::NodeMaps;
use crate::options::ParseOptions;
use crate::scanner::{self, skip_trivia};

/// Contextual flags threaded through the recursive descent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ctx {
    /// Array and object literals convert to destructuring patterns.
    pub allow_pattern: bool,
    /// Inside a `declare` declaration or ambient module.
    pub in_ambient: bool,
    /// Syntactic container of the statements being converted.
    pub container: SiteParent,
}

impl Ctx {
    pub fn root() -> Self {
        Self {
            allow_pattern: false,
            in_ambient: false,
            container: SiteParent::SourceFile,
        }
    }

    pub fn pattern(self) -> Self {
        Self {
            allow_pattern: true,
            ..self
        }
    }

    pub fn value(self) -> Self {
        Self {
            allow_pattern: false,
            ..self
        }
    }

    pub fn ambient(self, in_ambient: bool) -> Self {
        Self {
            in_ambient: self.in_ambient || in_ambient,
            ..self
        }
    }

    pub fn within(self, container: SiteParent) -> Self {
        Self { container, ..self }
    }
}

pub(crate) struct Converter<'a, 's> {
    source: &'s SourceText<'a>,
    options: &'s ParseOptions,
    next_id: u32,
    maps: Option<NodeMaps>,
    fallbacks: usize,
}

impl<'a, 's> Converter<'a, 's> {
    pub fn new(source: &'s SourceText<'a>, options: &'s ParseOptions, preserve_maps: bool) -> Self {
        Self {
            source,
            options,
            next_id: 0,
            maps: preserve_maps.then(NodeMaps::new),
            fallbacks: 0,
        }
    }

    pub fn into_maps(self) -> Option<NodeMaps> {
        self.maps
    }

    pub fn node_count(&self) -> u32 {
        self.next_id
    }

    pub fn convert_program(&mut self, program: &Program) -> TsResult<Node> {
        let ctx = Ctx::root();
        let (body, source_type) = match program {
            Program::Module(module) => {
                let items: Vec<&ModuleItem> = module.body.iter().collect();
                (self.convert_module_items(&items, ctx)?, "module")
            }
            Program::Script(script) => {
                let stmts: Vec<&Stmt> = script.body.iter().collect();
                (self.convert_statement_list(&stmts, ctx, true)?, "script")
            }
        };

        let text = self.text();
        let mut start = 0;
        if text.starts_with("#!") {
            start = text
                .find(['\n', '\r'])
                .unwrap_or(text.len());
        }
        let range = Range(skip_trivia(text, start) as u32, self.source.len());
        let program_span = match program {
            Program::Module(module) => module.span,
            Program::Script(script) => script.span,
        };
        let mut node = self
            .node_at(NativeKind::Program, range, AstNodeType::Program)
            .with("body", Value::nodes(body))
            .with("sourceType", source_type);
        if let Some(maps) = self.maps.as_mut() {
            maps.record(node.id, NativeKey::new(NativeKind::Program, self.source.range_of(program_span)));
        }
        self.fix_parent_locations(&mut node);
        if self.fallbacks > 0 {
            tracing::debug!(fallbacks = self.fallbacks, "converted nodes through generic fallback");
        }
        Ok(node)
    }

    fn convert_module_items(&mut self, items: &[&ModuleItem], ctx: Ctx) -> TsResult<Vec<Node>> {
        let mut out = Vec::with_capacity(items.len());
        let mut in_prologue = true;
        for item in items {
            let node = match item {
                ModuleItem::ModuleDecl(decl) => {
                    in_prologue = false;
                    self.convert_module_decl(decl, ctx)?
                }
                ModuleItem::Stmt(stmt) => {
                    let directive = in_prologue.then(|| self.directive_of(stmt)).flatten();
                    in_prologue = directive.is_some();
                    let mut node = self.convert_stmt(stmt, ctx)?;
                    if let Some(directive) = directive {
                        node.set("directive", directive);
                    }
                    node
                }
            };
            out.push(node);
        }
        Ok(out)
    }

    /// Converts a statement list, marking a leading directive prologue when
    /// `directives` is set.
    pub(crate) fn convert_statement_list(
        &mut self,
        stmts: &[&Stmt],
        ctx: Ctx,
        directives: bool,
    ) -> TsResult<Vec<Node>> {
        let mut out = Vec::with_capacity(stmts.len());
        let mut in_prologue = directives;
        for stmt in stmts {
            let directive = in_prologue.then(|| self.directive_of(stmt)).flatten();
            in_prologue = directive.is_some();
            let mut node = self.convert_stmt(stmt, ctx)?;
            if let Some(directive) = directive {
                node.set("directive", directive);
            }
            out.push(node);
        }
        Ok(out)
    }

    /// Raw text of a string-literal expression statement, without quotes.
    fn directive_of(&self, stmt: &Stmt) -> Option<String> {
        let Stmt::Expr(expr_stmt) = stmt else {
            return None;
        };
        let Expr::Lit(Lit::Str(s)) = expr_stmt.expr.as_ref() else {
            return None;
        };
        let raw = self.source.slice_span(s.span);
        Some(raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default().to_string())
    }

    // ---- source helpers ------------------------------------------------

    pub(crate) fn text(&self) -> &'a str {
        self.source.text()
    }

    pub(crate) fn range(&self, span: Span) -> Range {
        self.source.range_of(span)
    }

    pub(crate) fn slice(&self, range: Range) -> &'a str {
        self.source.slice(range)
    }

    pub(crate) fn options(&self) -> &ParseOptions {
        self.options
    }

    /// Offset of the first token at or after `pos`.
    pub(crate) fn next_token(&self, pos: u32) -> u32 {
        skip_trivia(self.text(), pos as usize) as u32
    }

    /// Offset of punctuation byte `target` between `from` and `limit`.
    pub(crate) fn find(&self, from: u32, limit: u32, target: u8) -> Option<u32> {
        scanner::find_punctuation(self.text(), from as usize, limit as usize, target)
            .map(|pos| pos as u32)
    }

    pub(crate) fn modifiers(
        &self,
        start: u32,
        limit: u32,
        decorators: &[Range],
        mode: ConstMode,
    ) -> Vec<Modifier> {
        modifiers::scan_modifiers(self.text(), start, limit, decorators, mode)
    }

    /// Decorators swc parsed and dropped for a declaration starting at
    /// `start`, up to `limit`.
    pub(crate) fn stray_decorators(&self, start: u32, limit: u32) -> Vec<Range> {
        modifiers::scan_stray_decorators(self.text(), start, limit)
    }

    /// Moves `start` back over the given modifier keywords written directly
    /// before it.
    pub(crate) fn extend_over_keywords(&self, start: u32, allowed: &[&str]) -> u32 {
        let text = self.text();
        let mut pos = start as usize;
        loop {
            let before = text[..pos].trim_end();
            let word_start = before
                .char_indices()
                .rev()
                .find(|(_, c)| !scanner::is_identifier_part(*c))
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            let word = &before[word_start..];
            let preceded_by_dot = before[..word_start].trim_end().ends_with('.');
            if word.is_empty() || preceded_by_dot || !allowed.contains(&word) {
                return pos as u32;
            }
            pos = word_start;
        }
    }

    // ---- node construction ---------------------------------------------

    fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A node without a native counterpart.
    pub(crate) fn make(&mut self, ty: AstNodeType, range: Range) -> Node {
        let id = self.alloc();
        Node::new(id, ty, range, self.source.loc_of(range))
    }

    pub(crate) fn node(&mut self, kind: NativeKind, span: Span, ty: AstNodeType) -> Node {
        let range = self.range(span);
        self.node_at(kind, range, ty)
    }

    pub(crate) fn node_at(&mut self, kind: NativeKind, range: Range, ty: AstNodeType) -> Node {
        let node = self.make(ty, range);
        if let Some(maps) = self.maps.as_mut() {
            maps.record(node.id, NativeKey::new(kind, range));
        }
        node
    }

    /// Adds a second native origin to an already built node.
    pub(crate) fn record(&mut self, node: &Node, kind: NativeKind, range: Range) {
        if let Some(maps) = self.maps.as_mut() {
            maps.record(node.id, NativeKey::new(kind, range));
        }
    }

    pub(crate) fn set_range(&self, node: &mut Node, range: Range) {
        node.range = range;
        node.loc = self.source.loc_of(range);
    }

    /// Widens `node` so that it covers `range`.
    pub(crate) fn widen(&self, node: &mut Node, range: Range) {
        let cover = node.range.cover(&range);
        if cover != node.range {
            self.set_range(node, cover);
        }
    }

    /// Widens every node to contain all of its children.
    fn fix_parent_locations(&self, node: &mut Node) {
        let mut cover = node.range;
        node.for_each_child_mut(|child| {
            self.fix_parent_locations(child);
            cover = cover.cover(&child.range);
        });
        if cover != node.range {
            self.set_range(node, cover);
        }
    }

    pub(crate) fn count_fallback(&mut self) {
        self.fallbacks += 1;
    }

    // ---- errors --------------------------------------------------------

    pub(crate) fn error(&self, kind: TsErrorKind, message: impl Into<String>, offset: u32) -> TsError {
        let error = TsError::new(kind, message, offset, self.source.lines());
        tracing::debug!(message = %error.message, index = error.index, "conversion failed");
        error
    }

    /// Structural violation: an error unless invalid trees are allowed.
    pub(crate) fn invalid_ast(&self, message: &str, offset: u32) -> TsResult<()> {
        if self.options.allow_invalid_ast {
            return Ok(());
        }
        Err(self.error(TsErrorKind::InvalidAst, message, offset))
    }

    /// Grammar violation that is never suppressed.
    pub(crate) fn grammar_error(&self, message: impl Into<String>, offset: u32) -> TsError {
        self.error(TsErrorKind::Grammar, message, offset)
    }

    pub(crate) fn check_grammar(&self, site: &ModifierSite<'_>) -> TsResult<()> {
        if self.options.allow_invalid_ast {
            return Ok(());
        }
        grammar::check_modifiers(site)
            .map_err(|e| self.error(TsErrorKind::Grammar, e.message, e.offset))
    }
}

pub(crate) fn decorator_ranges(
    cx: &Converter<'_, '_>,
    decorators: &[swc_ecma_ast::Decorator],
) -> Vec<Range> {
    decorators.iter().map(|d| cx.range(d.span)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::BytePos;

    #[test]
    fn ctx_flags_compose() {
        let ctx = Ctx::root().pattern().ambient(true);
        assert!(ctx.allow_pattern);
        assert!(ctx.in_ambient);
        let inner = ctx.value().ambient(false);
        assert!(!inner.allow_pattern);
        assert!(inner.in_ambient);
    }

    #[test]
    fn extend_over_keywords_walks_back() {
        let source = SourceText::new("declare abstract class A {}", BytePos(0));
        let options = ParseOptions::default();
        let cx = Converter::new(&source, &options, false);
        assert_eq!(cx.extend_over_keywords(17, &["declare", "abstract"]), 0);
        assert_eq!(cx.extend_over_keywords(17, &["abstract"]), 8);
        assert_eq!(cx.extend_over_keywords(17, &[]), 17);
    }

    #[test]
    fn member_access_is_not_a_keyword() {
        let source = SourceText::new("a.declare\nclass A {}", BytePos(0));
        let options = ParseOptions::default();
        let cx = Converter::new(&source, &options, false);
        assert_eq!(cx.extend_over_keywords(10, &["declare"]), 10);
    }

    #[test]
    fn widen_recomputes_location() {
        let source = SourceText::new("ab\ncd", BytePos(0));
        let options = ParseOptions::default();
        let mut cx = Converter::new(&source, &options, false);
        let mut node = cx.make(AstNodeType::Identifier, Range(0, 1));
        cx.widen(&mut node, Range(3, 5));
        assert_eq!(node.range, Range(0, 5));
        assert_eq!(node.loc.end.line, 2);
    }
}
