//! Walks a program and counts references to class members.
//!
//! `this` is resolved lexically: class member bodies see their own class,
//! arrow functions inherit, standalone functions and object-literal methods
//! reset it unless a `this: C` parameter names an enclosing class.

use std::collections::HashMap;

use swc_common::Span;
use swc_ecma_ast::{
    AssignExpr, AssignOp, AssignTarget, AssignTargetPat, AutoAccessor, BinExpr, BinaryOp, Class,
    ClassDecl, ClassExpr, ClassMember, ClassMethod, ClassProp, Constructor, Expr, ExprStmt,
    Function, GetterProp, Key, MemberExpr, MemberProp, MethodKind, ObjectPat, ObjectPatProp,
    ParamOrTsParamProp, Pat, PrivateMethod, PrivateName, PrivateProp, Program, PropName,
    SetterProp, SimpleAssignTarget, TsEntityName, TsParamPropParam, TsType, UpdateExpr,
    VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::scope::{
    ClassScope, FunctionScope, Member, MemberKey, MemberKind, ThisContext, ThisScopeId,
    ThisScopeKind, ThisScopeTree,
};

/// Result of analyzing a whole program: every class scope, keyed by the
/// span of its class body node.
#[derive(Debug, Default)]
pub struct ClassScopeAnalysis {
    pub tree: ThisScopeTree,
    classes: HashMap<Span, ThisScopeId>,
    order: Vec<ThisScopeId>,
}

impl ClassScopeAnalysis {
    pub fn class_at(&self, span: Span) -> Option<&ClassScope> {
        self.classes.get(&span).and_then(|&id| self.tree.class(id))
    }

    /// Class scopes in source order of their class nodes.
    pub fn classes(&self) -> impl Iterator<Item = (ThisScopeId, &ClassScope)> {
        self.order
            .iter()
            .filter_map(|&id| self.tree.class(id).map(|class| (id, class)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Counts member references for every class in `program`.
pub fn analyze_class_member_usage(program: &Program) -> ClassScopeAnalysis {
    let mut analyzer = ClassScopeAnalyzer::new();
    program.visit_with(&mut analyzer);
    analyzer.into_analysis()
}

#[derive(Debug)]
pub struct ClassScopeAnalyzer {
    tree: ThisScopeTree,
    classes: HashMap<Span, ThisScopeId>,
    order: Vec<ThisScopeId>,
    current: Option<ThisScopeId>,
    context: ThisContext,
}

impl Default for ClassScopeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassScopeAnalyzer {
    pub fn new() -> Self {
        Self {
            tree: ThisScopeTree::new(),
            classes: HashMap::new(),
            order: Vec::new(),
            current: None,
            context: ThisContext::None,
        }
    }

    pub fn tree(&self) -> &ThisScopeTree {
        &self.tree
    }

    pub fn into_analysis(self) -> ClassScopeAnalysis {
        ClassScopeAnalysis {
            tree: self.tree,
            classes: self.classes,
            order: self.order,
        }
    }

    /// Analyzes one class and everything nested in it, returning the id of
    /// its class scope.
    pub fn analyze_class(&mut self, class: &Class, name: Option<&str>) -> ThisScopeId {
        for decorator in &class.decorators {
            decorator.visit_with(self);
        }
        if let Some(super_class) = &class.super_class {
            super_class.visit_with(self);
        }

        let mut scope = ClassScope::new(name.map(str::to_string));
        for member in &class.body {
            declare_members(&mut scope, member);
        }
        let id = self
            .tree
            .create_scope(ThisScopeKind::Class(scope), self.current, class.span);
        self.classes.insert(class.span, id);
        self.order.push(id);
        tracing::trace!(class = name.unwrap_or("<anonymous>"), "registered class scope");

        let saved_scope = self.current.replace(id);
        let saved_context = self.context;
        for member in &class.body {
            self.walk_member(member, id, saved_context);
        }
        self.context = saved_context;
        self.current = saved_scope;
        id
    }

    fn walk_member(&mut self, member: &ClassMember, class: ThisScopeId, outer: ThisContext) {
        let own = |is_static| ThisContext::SelfRef { class, is_static };
        match member {
            ClassMember::Constructor(ctor) => {
                self.walk_key(&ctor.key, outer);
                self.context = own(false);
                for param in &ctor.params {
                    param.visit_with(self);
                }
                if let Some(body) = &ctor.body {
                    body.visit_with(self);
                }
            }
            ClassMember::Method(method) => {
                self.walk_key(&method.key, outer);
                self.walk_method_function(&method.function, own(method.is_static));
            }
            ClassMember::PrivateMethod(method) => {
                self.walk_method_function(&method.function, own(method.is_static));
            }
            ClassMember::ClassProp(prop) => {
                self.context = outer;
                prop.decorators.visit_with(self);
                self.walk_key(&prop.key, outer);
                self.context = own(prop.is_static);
                if let Some(value) = &prop.value {
                    value.visit_with(self);
                }
            }
            ClassMember::PrivateProp(prop) => {
                self.context = outer;
                prop.decorators.visit_with(self);
                self.context = own(prop.is_static);
                if let Some(value) = &prop.value {
                    value.visit_with(self);
                }
            }
            ClassMember::AutoAccessor(accessor) => {
                self.context = outer;
                accessor.decorators.visit_with(self);
                if let Key::Public(key) = &accessor.key {
                    self.walk_key(key, outer);
                }
                self.context = own(accessor.is_static);
                if let Some(value) = &accessor.value {
                    value.visit_with(self);
                }
            }
            ClassMember::StaticBlock(block) => {
                self.context = own(true);
                block.body.visit_with(self);
            }
            ClassMember::TsIndexSignature(_) | ClassMember::Empty(_) => {}
        }
    }

    /// Computed keys are evaluated outside the class body.
    fn walk_key(&mut self, key: &PropName, outer: ThisContext) {
        if let PropName::Computed(computed) = key {
            self.context = outer;
            computed.expr.visit_with(self);
        }
    }

    /// Method implementations keep the owning class as `this`.
    fn walk_method_function(&mut self, function: &Function, context: ThisContext) {
        self.context = context;
        function.decorators.visit_with(self);
        function.params.visit_with(self);
        if let Some(body) = &function.body {
            body.visit_with(self);
        }
    }

    /// Runs `walk` inside a new function scope with the given `this`.
    fn with_function_scope(&mut self, span: Span, context: ThisContext, walk: impl FnOnce(&mut Self)) {
        let id = self.tree.create_scope(
            ThisScopeKind::Function(FunctionScope { context }),
            self.current,
            span,
        );
        let saved_scope = self.current.replace(id);
        let saved_context = std::mem::replace(&mut self.context, context);
        walk(self);
        self.context = saved_context;
        self.current = saved_scope;
    }

    /// `this` for a standalone function: delegated when its first parameter
    /// is `this: C` and `C` names an enclosing class.
    fn function_context(&self, function: &Function) -> ThisContext {
        let Some(first) = function.params.first() else {
            return ThisContext::None;
        };
        let Pat::Ident(binding) = &first.pat else {
            return ThisContext::None;
        };
        if &*binding.id.sym != "this" {
            return ThisContext::None;
        }
        let Some(annotation) = &binding.type_ann else {
            return ThisContext::None;
        };
        let TsType::TsTypeRef(reference) = annotation.type_ann.as_ref() else {
            return ThisContext::None;
        };
        let TsEntityName::Ident(type_name) = &reference.type_name else {
            return ThisContext::None;
        };
        self.current
            .and_then(|scope| self.tree.find_class_named(scope, &type_name.sym))
            .map_or(ThisContext::None, ThisContext::Delegated)
    }

    /// Class and member table that `this` resolves to.
    fn this_table(&self) -> Option<(ThisScopeId, bool)> {
        match self.context {
            ThisContext::None => None,
            ThisContext::SelfRef { class, is_static } => Some((class, is_static)),
            ThisContext::Delegated(class) => Some((class, false)),
        }
    }

    /// Counts a reference through `this` in the current context.
    fn reference_this(&mut self, key: MemberKey) {
        if let Some((class, is_static)) = self.this_table() {
            self.reference(class, &key, is_static);
        }
    }

    fn reference(&mut self, class: ThisScopeId, key: &MemberKey, is_static: bool) {
        if let Some(scope) = self.tree.class_mut(class) {
            if scope.reference(key, is_static) {
                tracing::trace!(member = %key.display_name(), is_static, "counted member reference");
            }
        }
    }

    /// Member named by a `this.<prop>` access, when statically known.
    fn this_member_key(member: &MemberExpr) -> Option<MemberKey> {
        if !matches!(unparen(&member.obj), Expr::This(_)) {
            return None;
        }
        member_prop_key(&member.prop)
    }

    /// One reference per top-level property destructured directly off `this`.
    fn reference_destructured(&mut self, pattern: &ObjectPat) {
        for prop in &pattern.props {
            let key = match prop {
                ObjectPatProp::KeyValue(kv) => prop_name_key(&kv.key),
                ObjectPatProp::Assign(assign) => Some(MemberKey::Public(assign.key.id.sym.to_string())),
                ObjectPatProp::Rest(_) => None,
            };
            if let Some(key) = key {
                self.reference_this(key);
            }
        }
    }

    /// Visits an assignment whose target is `this.<member>`. The write is not
    /// a read, except for accessors, where it runs the setter.
    fn visit_write_only(&mut self, target: &MemberExpr, value: Option<&Expr>) {
        if let (Some(key), Some((class, is_static))) = (Self::this_member_key(target), self.this_table()) {
            let is_accessor = self
                .tree
                .class(class)
                .and_then(|scope| scope.member(&key, is_static))
                .is_some_and(|member| member.is_accessor());
            if is_accessor {
                self.reference(class, &key, is_static);
            }
        }
        if let MemberProp::Computed(computed) = &target.prop {
            computed.expr.visit_with(self);
        }
        if let Some(value) = value {
            value.visit_with(self);
        }
    }
}

impl Visit for ClassScopeAnalyzer {
    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.analyze_class(&node.class, Some(&*node.ident.sym));
    }

    fn visit_class_expr(&mut self, node: &ClassExpr) {
        let name = node.ident.as_ref().map(|ident| &*ident.sym);
        self.analyze_class(&node.class, name);
    }

    fn visit_class(&mut self, node: &Class) {
        self.analyze_class(node, None);
    }

    fn visit_function(&mut self, node: &Function) {
        let context = self.function_context(node);
        self.with_function_scope(node.span, context, |this| node.visit_children_with(this));
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.with_function_scope(node.span, ThisContext::None, |this| node.visit_children_with(this));
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.with_function_scope(node.span, ThisContext::None, |this| node.visit_children_with(this));
    }

    fn visit_member_expr(&mut self, node: &MemberExpr) {
        if let Some(key) = Self::this_member_key(node) {
            self.reference_this(key);
        } else if let Expr::Ident(object) = unparen(&node.obj) {
            let class = self
                .current
                .and_then(|scope| self.tree.find_class_named(scope, &object.sym));
            if let (Some(class), Some(key)) = (class, member_prop_key(&node.prop)) {
                self.reference(class, &key, true);
            }
        }
        node.visit_children_with(self);
    }

    fn visit_bin_expr(&mut self, node: &BinExpr) {
        if node.op == BinaryOp::In {
            if let Expr::PrivateName(name) = node.left.as_ref() {
                let key = private_key(name);
                let class = self
                    .current
                    .and_then(|scope| self.tree.find_class_declaring(scope, &key));
                if let Some(scope) = class.and_then(|id| self.tree.class_mut(id)) {
                    scope.reference_any(&key);
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_expr_stmt(&mut self, node: &ExprStmt) {
        match unparen(&node.expr) {
            Expr::Assign(assign) => {
                if let Some(target) = this_member_target(assign) {
                    self.visit_write_only(target, Some(&*assign.right));
                    return;
                }
            }
            Expr::Update(update) => {
                if let Some(target) = this_member_update(update) {
                    self.visit_write_only(target, None);
                    return;
                }
            }
            _ => {}
        }
        node.visit_children_with(self);
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        if node.op == AssignOp::Assign {
            if let Some(target) = this_member_target(node) {
                self.visit_write_only(target, Some(&*node.right));
                return;
            }
            if let AssignTarget::Pat(AssignTargetPat::Object(pattern)) = &node.left {
                if matches!(unparen(&node.right), Expr::This(_)) {
                    self.reference_destructured(pattern);
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let (Pat::Object(pattern), Some(init)) = (&node.name, &node.init) {
            if matches!(unparen(init), Expr::This(_)) {
                self.reference_destructured(pattern);
            }
        }
        node.visit_children_with(self);
    }
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        other => other,
    }
}

fn this_member_target(assign: &AssignExpr) -> Option<&MemberExpr> {
    let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = &assign.left else {
        return None;
    };
    ClassScopeAnalyzer::this_member_key(member).map(|_| member)
}

fn this_member_update(update: &UpdateExpr) -> Option<&MemberExpr> {
    let Expr::Member(member) = unparen(&update.arg) else {
        return None;
    };
    ClassScopeAnalyzer::this_member_key(member).map(|_| member)
}

fn private_key(name: &PrivateName) -> MemberKey {
    MemberKey::Private(name.name.to_string())
}

fn member_prop_key(prop: &MemberProp) -> Option<MemberKey> {
    match prop {
        MemberProp::Ident(ident) => Some(MemberKey::Public(ident.sym.to_string())),
        MemberProp::PrivateName(name) => Some(private_key(name)),
        MemberProp::Computed(computed) => literal_key(&computed.expr),
    }
}

fn literal_key(expr: &Expr) -> Option<MemberKey> {
    match unparen(expr) {
        Expr::Lit(swc_ecma_ast::Lit::Str(s)) => Some(MemberKey::Public(s.value.to_string())),
        Expr::Lit(swc_ecma_ast::Lit::Num(n)) => Some(MemberKey::Public(number_key(n.value))),
        _ => None,
    }
}

fn number_key(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Key of a property name; computed keys count only when they are literals.
fn prop_name_key(name: &PropName) -> Option<MemberKey> {
    match name {
        PropName::Ident(ident) => Some(MemberKey::Public(ident.sym.to_string())),
        PropName::Str(s) => Some(MemberKey::Public(s.value.to_string())),
        PropName::Num(n) => Some(MemberKey::Public(number_key(n.value))),
        PropName::BigInt(b) => Some(MemberKey::Public(b.value.to_string())),
        PropName::Computed(computed) => literal_key(&computed.expr),
    }
}

fn method_kind(kind: MethodKind) -> MemberKind {
    match kind {
        MethodKind::Method => MemberKind::Method,
        MethodKind::Getter | MethodKind::Setter => MemberKind::Accessor,
    }
}

fn declare_members(scope: &mut ClassScope, member: &ClassMember) {
    match member {
        ClassMember::Constructor(ctor) => declare_parameter_properties(scope, ctor),
        ClassMember::Method(method) => declare_method(scope, method),
        ClassMember::PrivateMethod(method) => declare_private_method(scope, method),
        ClassMember::ClassProp(prop) => declare_property(scope, prop),
        ClassMember::PrivateProp(prop) => declare_private_property(scope, prop),
        ClassMember::AutoAccessor(accessor) => declare_auto_accessor(scope, accessor),
        ClassMember::StaticBlock(_) | ClassMember::TsIndexSignature(_) | ClassMember::Empty(_) => {}
    }
}

fn declare_parameter_properties(scope: &mut ClassScope, ctor: &Constructor) {
    for param in &ctor.params {
        let ParamOrTsParamProp::TsParamProp(prop) = param else {
            continue;
        };
        let binding = match &prop.param {
            TsParamPropParam::Ident(binding) => Some(binding),
            TsParamPropParam::Assign(assign) => match assign.left.as_ref() {
                Pat::Ident(binding) => Some(binding),
                _ => None,
            },
        };
        if let Some(binding) = binding {
            scope.declare(Member {
                key: MemberKey::Public(binding.id.sym.to_string()),
                kind: MemberKind::ParameterProperty,
                is_static: false,
                accessibility: prop.accessibility,
                span: binding.id.span,
                references: 0,
            });
        }
    }
}

fn declare_method(scope: &mut ClassScope, method: &ClassMethod) {
    if let Some(key) = prop_name_key(&method.key) {
        scope.declare(Member {
            key,
            kind: method_kind(method.kind),
            is_static: method.is_static,
            accessibility: method.accessibility,
            span: prop_name_span(&method.key),
            references: 0,
        });
    }
}

fn declare_private_method(scope: &mut ClassScope, method: &PrivateMethod) {
    scope.declare(Member {
        key: private_key(&method.key),
        kind: method_kind(method.kind),
        is_static: method.is_static,
        accessibility: method.accessibility,
        span: method.key.span,
        references: 0,
    });
}

fn declare_property(scope: &mut ClassScope, prop: &ClassProp) {
    if let Some(key) = prop_name_key(&prop.key) {
        scope.declare(Member {
            key,
            kind: MemberKind::Property,
            is_static: prop.is_static,
            accessibility: prop.accessibility,
            span: prop_name_span(&prop.key),
            references: 0,
        });
    }
}

fn declare_private_property(scope: &mut ClassScope, prop: &PrivateProp) {
    scope.declare(Member {
        key: private_key(&prop.key),
        kind: MemberKind::Property,
        is_static: prop.is_static,
        accessibility: prop.accessibility,
        span: prop.key.span,
        references: 0,
    });
}

fn declare_auto_accessor(scope: &mut ClassScope, accessor: &AutoAccessor) {
    let (key, span) = match &accessor.key {
        Key::Private(name) => (Some(private_key(name)), name.span),
        Key::Public(name) => (prop_name_key(name), prop_name_span(name)),
    };
    if let Some(key) = key {
        scope.declare(Member {
            key,
            kind: MemberKind::Accessor,
            is_static: accessor.is_static,
            accessibility: accessor.accessibility,
            span,
            references: 0,
        });
    }
}

fn prop_name_span(name: &PropName) -> Span {
    match name {
        PropName::Ident(ident) => ident.span,
        PropName::Str(s) => s.span,
        PropName::Num(n) => n.span,
        PropName::BigInt(b) => b.span,
        PropName::Computed(computed) => computed.span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsestree_core::parser::Parser;

    fn analyze(code: &str) -> ClassScopeAnalysis {
        let parsed = Parser::new().parse_program(code).unwrap();
        analyze_class_member_usage(&parsed.program)
    }

    fn references(analysis: &ClassScopeAnalysis, class_index: usize, name: &str) -> u32 {
        let (_, class) = analysis.classes().nth(class_index).unwrap();
        class
            .members()
            .iter()
            .find(|m| m.name() == name)
            .map(|m| m.references)
            .unwrap_or_else(|| panic!("no member {name}"))
    }

    #[test]
    fn literal_keys_normalize_numbers() {
        assert_eq!(number_key(1.0), "1");
        assert_eq!(number_key(1.5), "1.5");
    }

    #[test]
    fn registers_every_member_kind() {
        let analysis = analyze(
            "abstract class C {
                constructor(private a: number, public b = 1) {}
                #p = 1;
                static s = 2;
                get v() { return 1; }
                set v(x) {}
                accessor q = 3;
                abstract m(): void;
                #n() {}
                [k: string]: unknown;
                static {}
            }",
        );
        let (_, class) = analysis.classes().next().unwrap();
        let mut names: Vec<_> = class.members().iter().map(|m| m.name()).collect();
        names.sort();
        assert_eq!(names, ["#n", "#p", "a", "b", "m", "q", "s", "v"]);
    }

    #[test]
    fn computed_keys_count_only_literals() {
        let analysis = analyze("class C { ['lit'] = 1; [sym] = 2; }");
        let (_, class) = analysis.classes().next().unwrap();
        assert_eq!(class.members().len(), 1);
        assert_eq!(class.members()[0].name(), "lit");
    }

    #[test]
    fn this_access_in_methods_counts() {
        let analysis = analyze("class C { #x = 1; y = 2; m() { return this.#x + this['y']; } }");
        assert_eq!(references(&analysis, 0, "#x"), 1);
        assert_eq!(references(&analysis, 0, "y"), 1);
    }

    #[test]
    fn arrow_functions_inherit_this() {
        let analysis = analyze("class C { #x = 1; m() { return () => this.#x; } }");
        assert_eq!(references(&analysis, 0, "#x"), 1);
    }

    #[test]
    fn standalone_functions_reset_this() {
        let analysis = analyze("class C { #x = 1; m() { return function () { return this.#x; }; } }");
        assert_eq!(references(&analysis, 0, "#x"), 0);
    }

    #[test]
    fn typed_this_parameter_delegates() {
        let analysis = analyze(
            "class C { private x = 1; m() { return function (this: C) { return this.x; }; } }",
        );
        assert_eq!(references(&analysis, 0, "x"), 1);
    }

    #[test]
    fn object_literal_methods_reset_this() {
        let analysis = analyze(
            "class C { private x = 1; m() { return { get g() { return this.x; }, n() { return this.x; } }; } }",
        );
        assert_eq!(references(&analysis, 0, "x"), 0);
    }

    #[test]
    fn write_only_statements_are_not_reads() {
        let analysis = analyze(
            "class C { #a = 0; #b = 0; #c = 0; m() { this.#a = 1; this.#b += 1; this.#c++; } }",
        );
        assert_eq!(references(&analysis, 0, "#a"), 0);
        assert_eq!(references(&analysis, 0, "#b"), 0);
        assert_eq!(references(&analysis, 0, "#c"), 0);
    }

    #[test]
    fn writing_an_accessor_runs_it() {
        let analysis = analyze(
            "class C { set #s(v) {} accessor #a = 1; #f = 0; m() { this.#s = 1; this.#a = 2; this.#f = 3; } }",
        );
        assert_eq!(references(&analysis, 0, "#s"), 1);
        assert_eq!(references(&analysis, 0, "#a"), 1);
        assert_eq!(references(&analysis, 0, "#f"), 0);
    }

    #[test]
    fn compound_assignment_in_expression_position_reads() {
        let analysis = analyze("class C { #a = 0; m() { return this.#a += 1; } }");
        assert_eq!(references(&analysis, 0, "#a"), 1);
    }

    #[test]
    fn destructuring_off_this_counts_top_level_properties() {
        let analysis = analyze(
            "class C { private x = 1; private y = 2; private z = 3; m() { const { x, y: { z } } = this; } }",
        );
        assert_eq!(references(&analysis, 0, "x"), 1);
        assert_eq!(references(&analysis, 0, "y"), 1);
        assert_eq!(references(&analysis, 0, "z"), 0);
    }

    #[test]
    fn static_access_by_class_name() {
        let analysis = analyze("class C { private static s = 1; m() { return C.s; } }");
        assert_eq!(references(&analysis, 0, "s"), 1);
    }

    #[test]
    fn static_methods_see_static_table() {
        let analysis = analyze("class C { private static s = 1; private t = 2; static m() { return this.s + this.t; } }");
        assert_eq!(references(&analysis, 0, "s"), 1);
        assert_eq!(references(&analysis, 0, "t"), 0);
    }

    #[test]
    fn private_in_checks_nearest_declaring_class() {
        let analysis = analyze("class C { #x = 1; static is(o) { return #x in o; } }");
        assert_eq!(references(&analysis, 0, "#x"), 1);
    }

    #[test]
    fn nested_classes_get_child_scopes() {
        let analysis = analyze("class Outer { m() { class Inner {} return Inner; } }");
        assert_eq!(analysis.len(), 2);
        let (outer, _) = analysis.classes().next().unwrap();
        let (inner, _) = analysis.classes().nth(1).unwrap();
        assert_eq!(analysis.tree.get(inner).parent, Some(outer));
    }
}
