use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrayLit, AssignExpr, AssignOp, AssignTarget, AssignTargetPat, BigInt, CallExpr, Callee, Expr,
    ExprOrSpread, GetterProp, Lit, MemberExpr, MemberProp, MetaPropExpr, MetaPropKind, Number,
    ObjectLit, OptChainBase, OptChainExpr, PrivateName, Prop, PropName, PropOrSpread, SetterProp,
    SimpleAssignTarget, SuperProp, SuperPropExpr, Tpl, TplElement,
};

use super::text::{bigint_value, unescape};
use super::{Converter, Ctx};
use crate::ast::{AstNodeType, Node, Value};
use crate::error::TsResult;
use crate::location::Range;
use crate::native::NativeKind;
use crate::node_utils::{
    assignment_operator, binary_operator, binary_shape, unary_operator, update_operator,
};
use crate::scanner::template_span_end;

/// Whether `expr` continues an optional chain started further down.
fn is_chain(expr: &Expr) -> bool {
    match expr {
        Expr::OptChain(_) => true,
        Expr::Member(member) => is_chain(&member.obj),
        Expr::Call(call) => match &call.callee {
            Callee::Expr(callee) => is_chain(callee),
            _ => false,
        },
        Expr::TsNonNull(non_null) => is_chain(&non_null.expr),
        _ => false,
    }
}

impl Converter<'_, '_> {
    pub(crate) fn convert_expr(&mut self, expr: &Expr, ctx: Ctx) -> TsResult<Node> {
        if is_chain(expr) {
            let element = self.convert_chain_element(expr, ctx.value())?;
            let range = element.range;
            return Ok(self.make(AstNodeType::ChainExpression, range).with("expression", element));
        }
        match expr {
            Expr::This(this) => Ok(self.node(NativeKind::ThisExpr, this.span, AstNodeType::ThisExpression)),
            Expr::Array(array) if ctx.allow_pattern => self.convert_array_as_pattern(array, ctx),
            Expr::Array(array) => self.convert_array_lit(array, ctx),
            Expr::Object(object) if ctx.allow_pattern => self.convert_object_as_pattern(object, ctx),
            Expr::Object(object) => self.convert_object_lit(object, ctx),
            Expr::Fn(function) => self.convert_fn_expr(function, ctx.value()),
            Expr::Unary(unary) => {
                let argument = self.convert_expr(&unary.arg, ctx.value())?;
                Ok(self
                    .node(NativeKind::UnaryExpr, unary.span, AstNodeType::UnaryExpression)
                    .with("argument", argument)
                    .with("operator", unary_operator(unary.op))
                    .with("prefix", true))
            }
            Expr::Update(update) => {
                let argument = self.convert_expr(&update.arg, ctx.value())?;
                Ok(self
                    .node(NativeKind::UpdateExpr, update.span, AstNodeType::UpdateExpression)
                    .with("argument", argument)
                    .with("operator", update_operator(update.op))
                    .with("prefix", update.prefix))
            }
            Expr::Bin(bin) => {
                let left = self.convert_expr(&bin.left, ctx.value())?;
                let right = self.convert_expr(&bin.right, ctx.value())?;
                Ok(self
                    .node(NativeKind::BinExpr, bin.span, binary_shape(bin.op).node_type())
                    .with("left", left)
                    .with("operator", binary_operator(bin.op))
                    .with("right", right))
            }
            Expr::Assign(assign) if ctx.allow_pattern && assign.op == AssignOp::Assign => {
                let left = self.convert_assign_target(&assign.left, ctx.pattern())?;
                let right = self.convert_expr(&assign.right, ctx.value())?;
                Ok(self
                    .node(NativeKind::AssignExpr, assign.span, AstNodeType::AssignmentPattern)
                    .with("decorators", Vec::<Node>::new())
                    .with("left", left)
                    .with("optional", false)
                    .with("right", right))
            }
            Expr::Assign(assign) => self.convert_assign(assign, ctx),
            Expr::Member(member) => self.convert_member(member, ctx.value(), false, false),
            Expr::SuperProp(super_prop) => self.convert_super_prop(super_prop, ctx.value()),
            Expr::Cond(cond) => {
                let test = self.convert_expr(&cond.test, ctx.value())?;
                let consequent = self.convert_expr(&cond.cons, ctx.value())?;
                let alternate = self.convert_expr(&cond.alt, ctx.value())?;
                Ok(self
                    .node(NativeKind::CondExpr, cond.span, AstNodeType::ConditionalExpression)
                    .with("alternate", alternate)
                    .with("consequent", consequent)
                    .with("test", test))
            }
            Expr::Call(call) => self.convert_call(call, ctx.value(), false),
            Expr::New(new) => {
                let callee = self.convert_expr(&new.callee, ctx.value())?;
                let arguments = match &new.args {
                    Some(args) => self.convert_args(args, ctx.value())?,
                    None => Vec::new(),
                };
                let type_arguments = self.convert_opt_type_args(new.type_args.as_deref())?;
                Ok(self
                    .node(NativeKind::NewExpr, new.span, AstNodeType::NewExpression)
                    .with("arguments", arguments)
                    .with("callee", callee)
                    .with_opt("typeArguments", type_arguments))
            }
            Expr::Seq(seq) => {
                let mut expressions = Vec::with_capacity(seq.exprs.len());
                for e in &seq.exprs {
                    self.flatten_sequence(e, ctx.value(), &mut expressions)?;
                }
                Ok(self
                    .node(NativeKind::SeqExpr, seq.span, AstNodeType::SequenceExpression)
                    .with("expressions", expressions))
            }
            Expr::Ident(ident) => Ok(self.convert_ident(ident)),
            Expr::Lit(lit) => self.convert_lit(lit),
            Expr::Tpl(tpl) => self.convert_tpl(tpl, ctx.value()),
            Expr::TaggedTpl(tagged) => {
                let tag = self.convert_expr(&tagged.tag, ctx.value())?;
                let type_arguments = self.convert_opt_type_args(tagged.type_params.as_deref())?;
                let quasi = self.convert_tpl(&tagged.tpl, ctx.value())?;
                Ok(self
                    .node(NativeKind::TaggedTpl, tagged.span, AstNodeType::TaggedTemplateExpression)
                    .with("quasi", quasi)
                    .with("tag", tag)
                    .with_opt("typeArguments", type_arguments))
            }
            Expr::Arrow(arrow) => self.convert_arrow(arrow, ctx.value()),
            Expr::Class(class) => {
                let range = self.range(class.class.span);
                self.convert_class(&class.class, class.ident.as_ref(), false, ctx.value(), range)
            }
            Expr::Yield(expr) => {
                let argument = expr.arg.as_deref().map(|a| self.convert_expr(a, ctx.value())).transpose()?;
                Ok(self
                    .node(NativeKind::YieldExpr, expr.span, AstNodeType::YieldExpression)
                    .with("argument", argument)
                    .with("delegate", expr.delegate))
            }
            Expr::MetaProp(meta) => Ok(self.convert_meta_prop(meta)),
            Expr::Await(expr) => {
                let argument = self.convert_expr(&expr.arg, ctx.value())?;
                Ok(self
                    .node(NativeKind::AwaitExpr, expr.span, AstNodeType::AwaitExpression)
                    .with("argument", argument))
            }
            Expr::Paren(paren) => self.convert_expr(&paren.expr, ctx),
            Expr::JSXMember(member) => {
                let mut node = self.convert_jsx_member(member);
                let fields = vec![
                    ("object", node.remove("object").unwrap_or(Value::Null)),
                    ("property", node.remove("property").unwrap_or(Value::Null)),
                ];
                self.deep_copy(NativeKind::JsxMemberExpression, node.range, fields)
            }
            Expr::JSXNamespacedName(name) => {
                let mut node = self.convert_jsx_namespaced_name(name);
                let fields = vec![
                    ("namespace", node.remove("namespace").unwrap_or(Value::Null)),
                    ("name", node.remove("name").unwrap_or(Value::Null)),
                ];
                self.deep_copy(NativeKind::JsxNamespacedName, node.range, fields)
            }
            Expr::JSXEmpty(empty) => {
                let range = self.range(empty.span);
                self.deep_copy(NativeKind::JsxEmptyExpression, range, Vec::new())
            }
            Expr::JSXElement(element) => self.convert_jsx_element(element, ctx.value()),
            Expr::JSXFragment(fragment) => self.convert_jsx_fragment(fragment, ctx.value()),
            Expr::TsTypeAssertion(expr) => self.convert_ts_type_assertion(expr, ctx),
            Expr::TsConstAssertion(expr) => self.convert_ts_const_assertion(expr, ctx),
            Expr::TsNonNull(expr) => {
                let expression = self.convert_expr(&expr.expr, ctx)?;
                Ok(self
                    .node(NativeKind::TsNonNullExpr, expr.span, AstNodeType::TSNonNullExpression)
                    .with("expression", expression))
            }
            Expr::TsAs(expr) => self.convert_ts_as(expr, ctx),
            Expr::TsInstantiation(expr) => self.convert_ts_instantiation(expr, ctx),
            Expr::TsSatisfies(expr) => self.convert_ts_satisfies(expr, ctx),
            Expr::PrivateName(name) => Ok(self.convert_private_name(name)),
            Expr::OptChain(chain) => {
                let element = self.convert_opt_chain(chain, ctx.value())?;
                let range = element.range;
                Ok(self.make(AstNodeType::ChainExpression, range).with("expression", element))
            }
            Expr::Invalid(invalid) => {
                let range = self.range(invalid.span);
                self.deep_copy(NativeKind::Invalid, range, Vec::new())
            }
        }
    }

    fn flatten_sequence(&mut self, expr: &Expr, ctx: Ctx, out: &mut Vec<Node>) -> TsResult<()> {
        if let Expr::Seq(inner) = expr {
            for e in &inner.exprs {
                self.flatten_sequence(e, ctx, out)?;
            }
            return Ok(());
        }
        out.push(self.convert_expr(expr, ctx)?);
        Ok(())
    }

    // ---- literals --------------------------------------------------------

    pub(crate) fn convert_lit(&mut self, lit: &Lit) -> TsResult<Node> {
        Ok(match lit {
            Lit::Str(s) => self.convert_str(s),
            Lit::Bool(b) => {
                let raw = self.source.slice_span(b.span);
                self.node(NativeKind::Bool, b.span, AstNodeType::Literal)
                    .with("raw", raw)
                    .with("value", b.value)
            }
            Lit::Null(n) => self
                .node(NativeKind::Null, n.span, AstNodeType::Literal)
                .with("raw", "null")
                .with("value", Value::Null),
            Lit::Num(n) => self.convert_number(n),
            Lit::BigInt(b) => self.convert_bigint(b),
            Lit::Regex(regex) => {
                let raw = self.source.slice_span(regex.span);
                let pattern = Value::Object(vec![
                    ("flags", Value::from(&*regex.flags)),
                    ("pattern", Value::from(&*regex.exp)),
                ]);
                self.node(NativeKind::Regex, regex.span, AstNodeType::Literal)
                    .with("raw", raw)
                    .with("regex", pattern)
                    .with("value", Value::Null)
            }
            Lit::JSXText(text) => self.convert_jsx_text(text),
        })
    }

    pub(crate) fn convert_number(&mut self, n: &Number) -> Node {
        let raw = self.source.slice_span(n.span);
        self.node(NativeKind::Number, n.span, AstNodeType::Literal)
            .with("raw", raw)
            .with("value", n.value)
    }

    pub(crate) fn convert_bigint(&mut self, b: &BigInt) -> Node {
        let raw = self.source.slice_span(b.span);
        self.node(NativeKind::BigInt, b.span, AstNodeType::Literal)
            .with("bigint", bigint_value(raw))
            .with("raw", raw)
            .with("value", Value::Null)
    }

    pub(crate) fn convert_private_name(&mut self, name: &PrivateName) -> Node {
        let mut range = self.range(name.span);
        let text = self.text().as_bytes();
        if text.get(range.0 as usize) != Some(&b'#') && range.0 > 0 && text.get(range.0 as usize - 1) == Some(&b'#') {
            range.0 -= 1;
        }
        self.node_at(NativeKind::PrivateName, range, AstNodeType::PrivateIdentifier)
            .with("name", &*name.name)
    }

    fn convert_tpl(&mut self, tpl: &Tpl, ctx: Ctx) -> TsResult<Node> {
        let range = self.range(tpl.span);
        let expressions = tpl
            .exprs
            .iter()
            .map(|e| self.convert_expr(e, ctx))
            .collect::<TsResult<Vec<_>>>()?;
        let ends: Vec<u32> = expressions.iter().map(|e| e.range.1).collect();
        let quasis = self.template_elements(range, &tpl.quasis, &ends);
        Ok(self
            .node_at(NativeKind::Tpl, range, AstNodeType::TemplateLiteral)
            .with("expressions", expressions)
            .with("quasis", quasis))
    }

    /// Template elements with ranges spanning their delimiters. `part_ends`
    /// are the end offsets of the interpolated parts.
    pub(crate) fn template_elements(&mut self, range: Range, quasis: &[TplElement], part_ends: &[u32]) -> Vec<Node> {
        let mut elements = Vec::with_capacity(quasis.len());
        for (i, quasi) in quasis.iter().enumerate() {
            let start = match i.checked_sub(1).and_then(|prev| part_ends.get(prev)) {
                Some(part_end) => self.find(*part_end, range.1, b'}').unwrap_or(*part_end),
                None => range.0,
            };
            let end = (template_span_end(self.text(), start as usize) as u32).min(range.1);
            let tail = i + 1 == quasis.len();
            let delimiter = if tail { 1 } else { 2 };
            let raw_range = Range(start + 1, end.saturating_sub(delimiter).max(start + 1));
            let raw = self.slice(raw_range);
            let cooked = match unescape(raw) {
                Some(cooked) => Value::Str(cooked),
                None => Value::Null,
            };
            let element = self
                .node_at(NativeKind::TplElement, Range(start, end), AstNodeType::TemplateElement)
                .with("tail", tail)
                .with("value", Value::Object(vec![("cooked", cooked), ("raw", Value::from(raw))]));
            self.record(&element, NativeKind::TplElement, self.range(quasi.span));
            elements.push(element);
        }
        elements
    }

    fn convert_meta_prop(&mut self, meta: &MetaPropExpr) -> Node {
        let range = self.range(meta.span);
        let (meta_name, property_name) = match meta.kind {
            MetaPropKind::NewTarget => ("new", "target"),
            MetaPropKind::ImportMeta => ("import", "meta"),
        };
        let meta_node = self
            .make(AstNodeType::Identifier, Range(range.0, range.0 + meta_name.len() as u32))
            .with("decorators", Vec::<Node>::new())
            .with("name", meta_name)
            .with("optional", false);
        let property = self
            .make(
                AstNodeType::Identifier,
                Range(range.1.saturating_sub(property_name.len() as u32), range.1),
            )
            .with("decorators", Vec::<Node>::new())
            .with("name", property_name)
            .with("optional", false);
        self.node_at(NativeKind::MetaPropExpr, range, AstNodeType::MetaProperty)
            .with("meta", meta_node)
            .with("property", property)
    }

    // ---- members and calls -----------------------------------------------

    fn convert_chain_element(&mut self, expr: &Expr, ctx: Ctx) -> TsResult<Node> {
        match expr {
            Expr::OptChain(chain) => self.convert_opt_chain(chain, ctx),
            Expr::Member(member) if is_chain(&member.obj) => self.convert_member(member, ctx, false, true),
            Expr::Call(call) if is_chain(expr) => self.convert_call(call, ctx, true),
            Expr::TsNonNull(non_null) if is_chain(&non_null.expr) => {
                let expression = self.convert_chain_element(&non_null.expr, ctx)?;
                Ok(self
                    .node(NativeKind::TsNonNullExpr, non_null.span, AstNodeType::TSNonNullExpression)
                    .with("expression", expression))
            }
            other => self.convert_expr(other, ctx),
        }
    }

    fn convert_opt_chain(&mut self, chain: &OptChainExpr, ctx: Ctx) -> TsResult<Node> {
        let mut node = match chain.base.as_ref() {
            OptChainBase::Member(member) => self.convert_member(member, ctx, chain.optional, true)?,
            OptChainBase::Call(call) => {
                let callee = self.convert_chain_element(&call.callee, ctx)?;
                let arguments = self.convert_args(&call.args, ctx)?;
                let type_arguments = self.convert_opt_type_args(call.type_args.as_deref())?;
                self.node(NativeKind::OptCall, call.span, AstNodeType::CallExpression)
                    .with("arguments", arguments)
                    .with("callee", callee)
                    .with("optional", chain.optional)
                    .with_opt("typeArguments", type_arguments)
            }
        };
        let range = self.range(chain.span);
        self.record(&node, NativeKind::OptChainExpr, range);
        self.widen(&mut node, range);
        Ok(node)
    }

    pub(crate) fn convert_member(&mut self, member: &MemberExpr, ctx: Ctx, optional: bool, chain: bool) -> TsResult<Node> {
        let object = if chain {
            self.convert_chain_element(&member.obj, ctx)?
        } else {
            self.convert_expr(&member.obj, ctx.value())?
        };
        let (property, computed) = match &member.prop {
            MemberProp::Ident(name) => (self.convert_ident_name(name), false),
            MemberProp::PrivateName(name) => (self.convert_private_name(name), false),
            MemberProp::Computed(computed) => (self.convert_expr(&computed.expr, ctx.value())?, true),
        };
        Ok(self
            .node(NativeKind::MemberExpr, member.span, AstNodeType::MemberExpression)
            .with("computed", computed)
            .with("object", object)
            .with("optional", optional)
            .with("property", property))
    }

    fn convert_super_prop(&mut self, super_prop: &SuperPropExpr, ctx: Ctx) -> TsResult<Node> {
        let object = self.node(NativeKind::Super, super_prop.obj.span, AstNodeType::Super);
        let (property, computed) = match &super_prop.prop {
            SuperProp::Ident(name) => (self.convert_ident_name(name), false),
            SuperProp::Computed(computed) => (self.convert_expr(&computed.expr, ctx)?, true),
        };
        Ok(self
            .node(NativeKind::SuperPropExpr, super_prop.span, AstNodeType::MemberExpression)
            .with("computed", computed)
            .with("object", object)
            .with("optional", false)
            .with("property", property))
    }

    fn convert_call(&mut self, call: &CallExpr, ctx: Ctx, chain: bool) -> TsResult<Node> {
        let callee = match &call.callee {
            Callee::Import(_) => {
                let source = call.args.first().map(|a| self.convert_expr(&a.expr, ctx)).transpose()?;
                let options = call.args.get(1).map(|a| self.convert_expr(&a.expr, ctx)).transpose()?;
                return Ok(self
                    .node(NativeKind::CallExpr, call.span, AstNodeType::ImportExpression)
                    .with("options", options)
                    .with("source", source));
            }
            Callee::Super(s) => self.node(NativeKind::Super, s.span, AstNodeType::Super),
            Callee::Expr(callee) if chain => self.convert_chain_element(callee, ctx)?,
            Callee::Expr(callee) => self.convert_expr(callee, ctx)?,
        };
        let arguments = self.convert_args(&call.args, ctx)?;
        let type_arguments = self.convert_opt_type_args(call.type_args.as_deref())?;
        Ok(self
            .node(NativeKind::CallExpr, call.span, AstNodeType::CallExpression)
            .with("arguments", arguments)
            .with("callee", callee)
            .with("optional", false)
            .with_opt("typeArguments", type_arguments))
    }

    fn convert_args(&mut self, args: &[ExprOrSpread], ctx: Ctx) -> TsResult<Vec<Node>> {
        args.iter().map(|arg| self.convert_expr_or_spread(arg, ctx)).collect()
    }

    fn convert_expr_or_spread(&mut self, arg: &ExprOrSpread, ctx: Ctx) -> TsResult<Node> {
        let argument = self.convert_expr(&arg.expr, ctx)?;
        match arg.spread {
            Some(spread) => Ok(self.spread(spread, argument, AstNodeType::SpreadElement)),
            None => Ok(argument),
        }
    }

    /// `...argument` as a spread or rest node.
    fn spread(&mut self, dots: Span, argument: Node, ty: AstNodeType) -> Node {
        let range = Range(self.range(dots).0, argument.range.1);
        let node = self.node_at(NativeKind::SpreadElement, range, ty).with("argument", argument);
        if ty == AstNodeType::RestElement {
            return node
                .with("decorators", Vec::<Node>::new())
                .with("optional", false);
        }
        node
    }

    // ---- assignment --------------------------------------------------------

    fn convert_assign(&mut self, assign: &AssignExpr, ctx: Ctx) -> TsResult<Node> {
        let left = self.convert_assign_target(&assign.left, ctx.pattern())?;
        let right = self.convert_expr(&assign.right, ctx.value())?;
        Ok(self
            .node(NativeKind::AssignExpr, assign.span, AstNodeType::AssignmentExpression)
            .with("left", left)
            .with("operator", assignment_operator(assign.op))
            .with("right", right))
    }

    fn convert_assign_target(&mut self, target: &AssignTarget, ctx: Ctx) -> TsResult<Node> {
        match target {
            AssignTarget::Simple(simple) => match simple {
                SimpleAssignTarget::Ident(binding) => self.convert_binding_ident(binding),
                SimpleAssignTarget::Member(member) => self.convert_member(member, ctx.value(), false, false),
                SimpleAssignTarget::SuperProp(super_prop) => self.convert_super_prop(super_prop, ctx.value()),
                SimpleAssignTarget::Paren(paren) => self.convert_expr(&paren.expr, ctx),
                SimpleAssignTarget::OptChain(chain) => {
                    let element = self.convert_opt_chain(chain, ctx.value())?;
                    let range = element.range;
                    Ok(self.make(AstNodeType::ChainExpression, range).with("expression", element))
                }
                SimpleAssignTarget::TsAs(expr) => self.convert_ts_as(expr, ctx),
                SimpleAssignTarget::TsSatisfies(expr) => self.convert_ts_satisfies(expr, ctx),
                SimpleAssignTarget::TsNonNull(expr) => {
                    let expression = self.convert_expr(&expr.expr, ctx)?;
                    Ok(self
                        .node(NativeKind::TsNonNullExpr, expr.span, AstNodeType::TSNonNullExpression)
                        .with("expression", expression))
                }
                SimpleAssignTarget::TsTypeAssertion(expr) => self.convert_ts_type_assertion(expr, ctx),
                SimpleAssignTarget::TsInstantiation(expr) => self.convert_ts_instantiation(expr, ctx),
                SimpleAssignTarget::Invalid(invalid) => {
                    let range = self.range(invalid.span);
                    self.deep_copy(NativeKind::Invalid, range, Vec::new())
                }
            },
            AssignTarget::Pat(pat) => match pat {
                AssignTargetPat::Array(array) => self.convert_array_pat(array, ctx.pattern()),
                AssignTargetPat::Object(object) => self.convert_object_pat(object, ctx.pattern()),
                AssignTargetPat::Invalid(invalid) => {
                    let range = self.range(invalid.span);
                    self.deep_copy(NativeKind::Invalid, range, Vec::new())
                }
            },
        }
    }

    // ---- array and object literals ------------------------------------------

    fn convert_array_lit(&mut self, array: &ArrayLit, ctx: Ctx) -> TsResult<Node> {
        let elements = array
            .elems
            .iter()
            .map(|elem| elem.as_ref().map(|e| self.convert_expr_or_spread(e, ctx)).transpose())
            .collect::<TsResult<Vec<_>>>()?;
        let elements = self.list(elements);
        Ok(self
            .node(NativeKind::ArrayLit, array.span, AstNodeType::ArrayExpression)
            .with("elements", elements))
    }

    fn convert_array_as_pattern(&mut self, array: &ArrayLit, ctx: Ctx) -> TsResult<Node> {
        let mut elements = Vec::with_capacity(array.elems.len());
        for elem in &array.elems {
            let Some(elem) = elem else {
                elements.push(None);
                continue;
            };
            let argument = self.convert_expr(&elem.expr, ctx.pattern())?;
            elements.push(Some(match elem.spread {
                Some(dots) => self.spread(dots, argument, AstNodeType::RestElement),
                None => argument,
            }));
        }
        let elements = self.list(elements);
        Ok(self
            .node(NativeKind::ArrayLit, array.span, AstNodeType::ArrayPattern)
            .with("decorators", Vec::<Node>::new())
            .with("elements", elements)
            .with("optional", false))
    }

    fn convert_object_lit(&mut self, object: &ObjectLit, ctx: Ctx) -> TsResult<Node> {
        let properties = object
            .props
            .iter()
            .map(|prop| match prop {
                PropOrSpread::Spread(spread) => {
                    let argument = self.convert_expr(&spread.expr, ctx)?;
                    Ok(self.spread(spread.dot3_token, argument, AstNodeType::SpreadElement))
                }
                PropOrSpread::Prop(prop) => self.convert_prop(prop, ctx),
            })
            .collect::<TsResult<Vec<_>>>()?;
        Ok(self
            .node(NativeKind::ObjectLit, object.span, AstNodeType::ObjectExpression)
            .with("properties", properties))
    }

    fn convert_object_as_pattern(&mut self, object: &ObjectLit, ctx: Ctx) -> TsResult<Node> {
        let properties = object
            .props
            .iter()
            .map(|prop| match prop {
                PropOrSpread::Spread(spread) => {
                    let argument = self.convert_expr(&spread.expr, ctx.pattern())?;
                    Ok(self.spread(spread.dot3_token, argument, AstNodeType::RestElement))
                }
                PropOrSpread::Prop(prop) => self.convert_prop(prop, ctx.pattern()),
            })
            .collect::<TsResult<Vec<_>>>()?;
        Ok(self
            .node(NativeKind::ObjectLit, object.span, AstNodeType::ObjectPattern)
            .with("decorators", Vec::<Node>::new())
            .with("optional", false)
            .with("properties", properties))
    }

    fn property(&mut self, kind: NativeKind, range: Range, key: Node, value: Node) -> Node {
        self.node_at(kind, range, AstNodeType::Property)
            .with("computed", false)
            .with("key", key)
            .with("kind", "init")
            .with("method", false)
            .with("optional", false)
            .with("shorthand", false)
            .with("value", value)
    }

    fn convert_prop(&mut self, prop: &Prop, ctx: Ctx) -> TsResult<Node> {
        match prop {
            Prop::Shorthand(ident) => {
                let key = self.convert_ident(ident);
                let value = self.convert_ident(ident);
                let range = key.range;
                let mut node = self.property(NativeKind::Ident, range, key, value);
                node.set("shorthand", true);
                Ok(node)
            }
            Prop::KeyValue(kv) => {
                let key = self.convert_prop_name(&kv.key, ctx.value())?;
                let value = self.convert_expr(&kv.value, ctx)?;
                let range = Range(self.prop_name_range(&kv.key).0, value.range.1);
                let mut node = self.property(NativeKind::KeyValueProp, range, key, value);
                node.set("computed", matches!(kv.key, PropName::Computed(_)));
                Ok(node)
            }
            Prop::Assign(assign) => {
                let key = self.convert_ident(&assign.key);
                let left = self.convert_ident(&assign.key);
                let right = self.convert_expr(&assign.value, ctx.value())?;
                let range = Range(key.range.0, right.range.1);
                let value = self
                    .make(AstNodeType::AssignmentPattern, range)
                    .with("decorators", Vec::<Node>::new())
                    .with("left", left)
                    .with("optional", false)
                    .with("right", right);
                let mut node = self.property(NativeKind::AssignProp, range, key, value);
                node.set("shorthand", true);
                Ok(node)
            }
            Prop::Getter(getter) => self.convert_getter_prop(getter, ctx.value()),
            Prop::Setter(setter) => self.convert_setter_prop(setter, ctx.value()),
            Prop::Method(method) => {
                let key_range = self.prop_name_range(&method.key);
                let key = self.convert_prop_name(&method.key, ctx.value())?;
                let value = self.convert_method_function(&method.function, key_range.1, ctx.value(), NativeKind::MethodProp)?;
                let start = self.method_prop_start(key_range.0);
                let range = Range(start, value.range.1);
                let mut node = self.property(NativeKind::MethodProp, range, key, value);
                node.set("computed", matches!(method.key, PropName::Computed(_)));
                node.set("method", true);
                Ok(node)
            }
        }
    }

    /// Start of an object method, including `async` and `*`.
    fn method_prop_start(&self, key_start: u32) -> u32 {
        let before = self.text()[..key_start as usize].trim_end();
        let start = if before.ends_with('*') {
            (before.len() - 1) as u32
        } else {
            key_start
        };
        self.extend_over_keywords(start, &["async"])
    }

    fn convert_getter_prop(&mut self, getter: &GetterProp, ctx: Ctx) -> TsResult<Node> {
        let key_range = self.prop_name_range(&getter.key);
        let key = self.convert_prop_name(&getter.key, ctx)?;
        let return_type = self.convert_opt_type_ann(getter.type_ann.as_deref())?;
        let body = getter.body.as_ref().map(|b| self.convert_block(b, ctx, true)).transpose()?;
        let range = self.range(getter.span);
        let value = self.accessor_function(key_range.1, range.1, Vec::new(), body, return_type);
        let mut node = self.property(NativeKind::GetterProp, range, key, value);
        node.set("computed", matches!(getter.key, PropName::Computed(_)));
        node.set("kind", "get");
        Ok(node)
    }

    fn convert_setter_prop(&mut self, setter: &SetterProp, ctx: Ctx) -> TsResult<Node> {
        let key_range = self.prop_name_range(&setter.key);
        let key = self.convert_prop_name(&setter.key, ctx)?;
        let mut params = Vec::with_capacity(2);
        if let Some(this_param) = &setter.this_param {
            params.push(self.convert_pat(this_param, ctx.pattern())?);
        }
        params.push(self.convert_pat(&setter.param, ctx.pattern())?);
        let body = setter.body.as_ref().map(|b| self.convert_block(b, ctx, true)).transpose()?;
        let range = self.range(setter.span);
        let value = self.accessor_function(key_range.1, range.1, params, body, None);
        let mut node = self.property(NativeKind::SetterProp, range, key, value);
        node.set("computed", matches!(setter.key, PropName::Computed(_)));
        node.set("kind", "set");
        Ok(node)
    }

    pub(crate) fn accessor_function(
        &mut self,
        key_end: u32,
        end: u32,
        params: Vec<Node>,
        body: Option<Node>,
        return_type: Option<Node>,
    ) -> Node {
        let start = self.find(key_end, end, b'(').unwrap_or(key_end);
        let ty = if body.is_some() {
            AstNodeType::FunctionExpression
        } else {
            AstNodeType::TSEmptyBodyFunctionExpression
        };
        self.make(ty, Range(start, end))
            .with("async", false)
            .with("body", body)
            .with("declare", false)
            .with("expression", false)
            .with("generator", false)
            .with("id", None::<Node>)
            .with("params", params)
            .with_opt("returnType", return_type)
    }

    pub(crate) fn convert_prop_name(&mut self, name: &PropName, ctx: Ctx) -> TsResult<Node> {
        Ok(match name {
            PropName::Ident(ident) => self.convert_ident_name(ident),
            PropName::Str(s) => self.convert_str(s),
            PropName::Num(n) => self.convert_number(n),
            PropName::BigInt(b) => self.convert_bigint(b),
            PropName::Computed(computed) => {
                let node = self.convert_expr(&computed.expr, ctx.value())?;
                self.record(&node, NativeKind::ComputedPropName, self.range(computed.span));
                node
            }
        })
    }

    /// Source range of a property key, brackets included.
    pub(crate) fn prop_name_range(&self, name: &PropName) -> Range {
        self.range(name.span())
    }
}
