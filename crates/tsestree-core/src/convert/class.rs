use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    AutoAccessor, Class, ClassDecl, ClassMember, ClassMethod, ClassProp, Constructor, Decorator,
    Function, Ident, Key, MethodKind, ParamOrTsParamProp, PrivateMethod, PrivateProp, PropName,
    StaticBlock, Stmt, TsExprWithTypeArgs, TsParamProp, TsParamPropParam,
};

use super::{Converter, Ctx, decorator_ranges};
use crate::ast::{AstNodeType, Node};
use crate::error::TsResult;
use crate::grammar::{ModifierSite, SiteKind, SiteParent};
use crate::location::Range;
use crate::modifiers::ConstMode;
use crate::native::NativeKind;
use crate::node_utils::accessibility_str;
use crate::scanner::{scan_word, skip_trivia};

/// One `extends` or `implements` clause as written in the class header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeritageClause {
    pub keyword: Range,
    pub implements: bool,
    pub types: Vec<Range>,
}

/// Splits the header text between `from` and `to` into heritage clauses.
/// Commas and keywords nested inside brackets are ignored.
pub(crate) fn scan_heritage(text: &str, from: u32, to: u32) -> Vec<HeritageClause> {
    let bytes = text.as_bytes();
    let to = (to as usize).min(text.len());
    let mut clauses: Vec<HeritageClause> = Vec::new();
    let mut depth = 0usize;
    let mut pos = from as usize;
    let mut current: Option<(usize, usize)> = None;

    fn flush(clauses: &mut [HeritageClause], current: &mut Option<(usize, usize)>) {
        if let (Some((start, end)), Some(clause)) = (current.take(), clauses.last_mut()) {
            clause.types.push(Range(start as u32, end as u32));
        }
    }

    while pos < to {
        pos = skip_trivia(text, pos);
        if pos >= to {
            break;
        }
        if let Some(end) = scan_word(text, pos) {
            let word = &text[pos..end];
            if depth == 0 && (word == "extends" || word == "implements") {
                flush(&mut clauses, &mut current);
                clauses.push(HeritageClause {
                    keyword: Range(pos as u32, end as u32),
                    implements: word == "implements",
                    types: Vec::new(),
                });
            } else {
                let start = current.map_or(pos, |(s, _)| s);
                current = Some((start, end));
            }
            pos = end;
            continue;
        }
        let b = bytes[pos];
        match b {
            b'<' | b'(' | b'[' | b'{' => depth += 1,
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                flush(&mut clauses, &mut current);
                pos += 1;
                continue;
            }
            _ => {}
        }
        let mut next = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
        if b == b'"' || b == b'\'' {
            while next < to && bytes[next] != b {
                next += if bytes[next] == b'\\' { 2 } else { 1 };
            }
            next = (next + 1).min(to);
        }
        let start = current.map_or(pos, |(s, _)| s);
        current = Some((start, next));
        pos = next;
    }
    flush(&mut clauses, &mut current);
    clauses
}

/// Flags shared by every class element.
#[derive(Debug, Clone, Copy, Default)]
struct MemberFlags {
    is_static: bool,
    is_abstract: bool,
    is_optional: bool,
    is_override: bool,
    accessibility: Option<&'static str>,
}

impl MemberFlags {
    fn apply_accessibility(self, mut node: Node) -> Node {
        if let Some(accessibility) = self.accessibility {
            node.set("accessibility", accessibility);
        }
        node
    }
}

struct PropertyParts {
    key: Node,
    computed: bool,
    value: Option<Node>,
    type_annotation: Option<Node>,
    decorators: Vec<Node>,
    flags: MemberFlags,
    declare: bool,
    definite: bool,
    readonly: bool,
}

impl PropertyParts {
    fn apply(self, node: Node) -> Node {
        self.flags
            .apply_accessibility(node)
            .with("computed", self.computed)
            .with("declare", self.declare)
            .with("decorators", self.decorators)
            .with("definite", self.definite)
            .with("key", self.key)
            .with("optional", self.flags.is_optional)
            .with("override", self.flags.is_override)
            .with("readonly", self.readonly)
            .with("static", self.flags.is_static)
            .with_opt("typeAnnotation", self.type_annotation)
            .with("value", self.value)
    }
}

/// The class a member is converted for.
#[derive(Debug, Clone, Copy)]
struct ClassInfo {
    parent: SiteParent,
    declaration: bool,
}

impl Converter<'_, '_> {
    pub(crate) fn convert_class_decl(&mut self, decl: &ClassDecl, ctx: Ctx, start: Option<u32>) -> TsResult<Node> {
        let mut range = self.range(decl.class.span);
        if let Some(first) = decl.class.decorators.first() {
            range.0 = range.0.min(self.range(first.span).0);
        }
        range.0 = start.unwrap_or_else(|| self.extend_over_keywords(range.0, &["declare", "abstract"]));
        let mut node = self.convert_class(&decl.class, Some(&decl.ident), true, ctx, range)?;
        node.set("declare", decl.declare);
        Ok(node)
    }

    /// Converts a class declaration or expression over `range`.
    pub(crate) fn convert_class(
        &mut self,
        class: &Class,
        ident: Option<&Ident>,
        declaration: bool,
        ctx: Ctx,
        range: Range,
    ) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &class.decorators);
        let (site_kind, parent) = if declaration {
            (SiteKind::ClassDeclaration, SiteParent::ClassDeclaration)
        } else {
            (SiteKind::ClassExpression, SiteParent::ClassExpression)
        };
        let scan_start = decorator_ranges.first().map_or(range.0, |d| d.0.min(range.0));
        let modifiers = self.modifiers(scan_start, range.1, &decorator_ranges, ConstMode::Keyword);
        self.check_grammar(
            &ModifierSite::new(site_kind, ctx.container)
                .modifiers(&modifiers)
                .decorators(&decorator_ranges),
        )?;

        let body_open = self.class_body_open(class, ident, range);
        let header_start = [
            ident.map(|i| self.range(i.span).1),
            class.type_params.as_deref().map(|p| self.range(p.span).1),
            decorator_ranges.last().map(|d| d.1),
        ]
        .into_iter()
        .flatten()
        .fold(range.0, u32::max);
        let clauses = scan_heritage(self.text(), header_start, body_open);
        self.check_class_heritage(&clauses)?;

        let ctx = ctx.value();
        let decorators = self.convert_decorators(&class.decorators, ctx)?;
        let id = ident.map(|i| self.convert_ident(i));
        let type_parameters = self.convert_opt_type_params(class.type_params.as_deref(), parent)?;
        let super_class = class
            .super_class
            .as_deref()
            .map(|e| self.convert_expr(e, ctx))
            .transpose()?;
        let super_type_arguments = self.convert_opt_type_args(class.super_type_params.as_deref())?;
        let implements = class
            .implements
            .iter()
            .map(|i| self.convert_heritage_type(i, AstNodeType::TSClassImplements, ctx))
            .collect::<TsResult<Vec<_>>>()?;

        let info = ClassInfo { parent, declaration };
        let mut members = Vec::with_capacity(class.body.len());
        for member in &class.body {
            if let Some(node) = self.convert_class_member(member, info, ctx.within(parent))? {
                members.push(node);
            }
        }
        let body = self
            .make(AstNodeType::ClassBody, Range(body_open, range.1))
            .with("body", members);

        let ty = if declaration {
            AstNodeType::ClassDeclaration
        } else {
            AstNodeType::ClassExpression
        };
        let kind = if declaration { NativeKind::ClassDecl } else { NativeKind::ClassExpr };
        let node = self.node_at(kind, range, ty);
        self.record(&node, NativeKind::Class, self.range(class.span));
        Ok(node
            .with("abstract", class.is_abstract)
            .with("body", body)
            .with("declare", false)
            .with("decorators", decorators)
            .with("id", id)
            .with("implements", implements)
            .with("superClass", super_class)
            .with_opt("superTypeArguments", super_type_arguments)
            .with_opt("typeParameters", type_parameters))
    }

    /// Offset of the `{` opening the class body.
    fn class_body_open(&self, class: &Class, ident: Option<&Ident>, range: Range) -> u32 {
        let header_end = [
            ident.map(|i| self.range(i.span).1),
            class.type_params.as_deref().map(|p| self.range(p.span).1),
            class.super_class.as_deref().map(|e| self.range(e.span()).1),
            class.super_type_params.as_deref().map(|p| self.range(p.span).1),
            class.implements.last().map(|i| self.range(i.span).1),
        ]
        .into_iter()
        .flatten()
        .fold(range.0, u32::max);
        self.find(header_end, range.1, b'{').unwrap_or(header_end)
    }

    fn check_class_heritage(&self, clauses: &[HeritageClause]) -> TsResult<()> {
        let mut seen_extends = false;
        let mut seen_implements = false;
        for clause in clauses {
            let word = if clause.implements { "implements" } else { "extends" };
            if clause.types.is_empty() {
                self.invalid_ast(&format!("'{word}' list cannot be empty."), clause.keyword.0)?;
            }
            if clause.implements {
                if seen_implements {
                    self.invalid_ast("'implements' clause already seen.", clause.keyword.0)?;
                }
                seen_implements = true;
                continue;
            }
            if seen_extends {
                self.invalid_ast("'extends' clause already seen.", clause.keyword.0)?;
            }
            if seen_implements {
                self.invalid_ast("'extends' clause must precede 'implements' clause.", clause.keyword.0)?;
            }
            if let Some(second) = clause.types.get(1) {
                self.invalid_ast("Classes can only extend a single class.", second.0)?;
            }
            seen_extends = true;
        }
        Ok(())
    }

    /// `TSClassImplements` or `TSInterfaceHeritage`.
    pub(crate) fn convert_heritage_type(
        &mut self,
        heritage: &TsExprWithTypeArgs,
        ty: AstNodeType,
        ctx: Ctx,
    ) -> TsResult<Node> {
        let expression = self.convert_expr(&heritage.expr, ctx.value())?;
        let type_arguments = self.convert_opt_type_args(heritage.type_args.as_deref())?;
        Ok(self
            .node(NativeKind::TsExprWithTypeArgs, heritage.span, ty)
            .with("expression", expression)
            .with_opt("typeArguments", type_arguments))
    }

    pub(crate) fn convert_decorators(&mut self, decorators: &[Decorator], ctx: Ctx) -> TsResult<Vec<Node>> {
        let mut out = Vec::with_capacity(decorators.len());
        for decorator in decorators {
            let expression = self.convert_expr(&decorator.expr, ctx.value())?;
            out.push(
                self.node(NativeKind::Decorator, decorator.span, AstNodeType::Decorator)
                    .with("expression", expression),
            );
        }
        Ok(out)
    }

    fn convert_class_member(&mut self, member: &ClassMember, class: ClassInfo, ctx: Ctx) -> TsResult<Option<Node>> {
        let node = match member {
            ClassMember::Constructor(ctor) => self.convert_constructor(ctor, class, ctx)?,
            ClassMember::Method(method) => self.convert_class_method(method, class, ctx)?,
            ClassMember::PrivateMethod(method) => self.convert_private_method(method, class, ctx)?,
            ClassMember::ClassProp(prop) => self.convert_class_prop(prop, class, ctx)?,
            ClassMember::PrivateProp(prop) => self.convert_private_prop(prop, class, ctx)?,
            ClassMember::AutoAccessor(accessor) => self.convert_auto_accessor(accessor, class, ctx)?,
            ClassMember::StaticBlock(block) => self.convert_static_block(block, ctx)?,
            ClassMember::TsIndexSignature(signature) => self.convert_index_signature(signature, class.parent, ctx)?,
            ClassMember::Empty(_) => return Ok(None),
        };
        Ok(Some(node))
    }

    /// Range of a member, widened over its decorators.
    fn member_range(&self, span: Span, decorators: &[Range]) -> Range {
        let mut range = self.range(span);
        if let Some(first) = decorators.first() {
            range.0 = range.0.min(first.0);
        }
        range
    }

    fn check_member(
        &self,
        kind: SiteKind,
        class: ClassInfo,
        range: Range,
        key_start: u32,
        decorators: &[Range],
        has_body: bool,
    ) -> TsResult<()> {
        let modifiers = self.modifiers(range.0, key_start, decorators, ConstMode::Modifier);
        self.check_grammar(
            &ModifierSite::new(kind, class.parent)
                .modifiers(&modifiers)
                .decorators(decorators)
                .has_body(has_body),
        )
    }

    fn convert_class_method(&mut self, method: &ClassMethod, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let key_range = self.prop_name_range(&method.key);
        let key = self.convert_prop_name(&method.key, ctx)?;
        let flags = MemberFlags {
            is_static: method.is_static,
            is_abstract: method.is_abstract,
            is_optional: method.is_optional,
            is_override: method.is_override,
            accessibility: method.accessibility.map(accessibility_str),
        };
        let computed = matches!(method.key, PropName::Computed(_));
        self.method_definition(method.span, key, key_range, computed, &method.function, method.kind, flags, class, ctx)
    }

    fn convert_private_method(&mut self, method: &PrivateMethod, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let key = self.convert_private_name(&method.key);
        let key_range = key.range;
        let flags = MemberFlags {
            is_static: method.is_static,
            is_abstract: method.is_abstract,
            is_optional: method.is_optional,
            is_override: method.is_override,
            accessibility: method.accessibility.map(accessibility_str),
        };
        self.method_definition(method.span, key, key_range, false, &method.function, method.kind, flags, class, ctx)
    }

    #[allow(clippy::too_many_arguments)]
    fn method_definition(
        &mut self,
        span: Span,
        key: Node,
        key_range: Range,
        computed: bool,
        function: &Function,
        kind: MethodKind,
        flags: MemberFlags,
        class: ClassInfo,
        ctx: Ctx,
    ) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &function.decorators);
        let range = self.member_range(span, &decorator_ranges);
        let has_body = function.body.is_some();
        let (site_kind, kind_str) = match kind {
            MethodKind::Method => (SiteKind::MethodDeclaration, "method"),
            MethodKind::Getter => (SiteKind::GetAccessor, "get"),
            MethodKind::Setter => (SiteKind::SetAccessor, "set"),
        };
        self.check_member(site_kind, class, range, key_range.0, &decorator_ranges, has_body)?;

        let decorators = self.convert_decorators(&function.decorators, ctx)?;
        let owner = SiteParent::Function {
            kind: site_kind,
            has_body,
            in_class_declaration: class.declaration,
        };
        let value = self.method_function_with_owner(function, key_range.1, ctx, owner, NativeKind::ClassMethod)?;
        let ty = if flags.is_abstract {
            AstNodeType::TSAbstractMethodDefinition
        } else {
            AstNodeType::MethodDefinition
        };
        let node = self.node_at(NativeKind::ClassMethod, range, ty);
        Ok(flags
            .apply_accessibility(node)
            .with("computed", computed)
            .with("decorators", decorators)
            .with("key", key)
            .with("kind", kind_str)
            .with("optional", flags.is_optional)
            .with("override", flags.is_override)
            .with("static", flags.is_static)
            .with("value", value))
    }

    fn convert_constructor(&mut self, ctor: &Constructor, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let range = self.range(ctor.span);
        let key_range = self.prop_name_range(&ctor.key);
        let has_body = ctor.body.is_some();
        let decorators = self.stray_decorators(range.0, key_range.0);
        self.check_member(SiteKind::Constructor, class, range, key_range.0, &decorators, has_body)?;

        let key = self.convert_prop_name(&ctor.key, ctx)?;
        let owner = SiteParent::Function {
            kind: SiteKind::Constructor,
            has_body,
            in_class_declaration: class.declaration,
        };
        let mut params = Vec::with_capacity(ctor.params.len());
        for param in &ctor.params {
            let node = match param {
                ParamOrTsParamProp::Param(param) => self.convert_param(param, owner, ctx)?,
                ParamOrTsParamProp::TsParamProp(prop) => self.convert_param_prop(prop, owner, ctx)?,
            };
            params.push(node);
        }
        let body = ctor
            .body
            .as_ref()
            .map(|b| self.convert_block(b, ctx, true))
            .transpose()?;
        let value = self.accessor_function(key_range.1, range.1, params, body, None);
        let flags = MemberFlags {
            is_optional: ctor.is_optional,
            accessibility: ctor.accessibility.map(accessibility_str),
            ..MemberFlags::default()
        };
        let node = self.node_at(NativeKind::Constructor, range, AstNodeType::MethodDefinition);
        Ok(flags
            .apply_accessibility(node)
            .with("computed", matches!(ctor.key, PropName::Computed(_)))
            .with("decorators", Vec::<Node>::new())
            .with("key", key)
            .with("kind", "constructor")
            .with("optional", ctor.is_optional)
            .with("override", false)
            .with("static", false)
            .with("value", value))
    }

    fn convert_param_prop(&mut self, prop: &TsParamProp, owner: SiteParent, ctx: Ctx) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &prop.decorators);
        let range = self.member_range(prop.span, &decorator_ranges);
        let param_start = match &prop.param {
            TsParamPropParam::Ident(binding) => self.range(binding.id.span).0,
            TsParamPropParam::Assign(assign) => self.range(assign.span).0,
        };
        let modifiers = self.modifiers(range.0, param_start, &decorator_ranges, ConstMode::Modifier);
        self.check_grammar(
            &ModifierSite::new(SiteKind::Parameter, owner)
                .modifiers(&modifiers)
                .decorators(&decorator_ranges),
        )?;

        let decorators = self.convert_decorators(&prop.decorators, ctx)?;
        let parameter = match &prop.param {
            TsParamPropParam::Ident(binding) => self.convert_binding_ident(binding)?,
            TsParamPropParam::Assign(assign) => self.convert_assign_pat(assign, ctx.pattern())?,
        };
        let flags = MemberFlags {
            accessibility: prop.accessibility.map(accessibility_str),
            ..MemberFlags::default()
        };
        let node = self.node_at(NativeKind::TsParamProp, range, AstNodeType::TSParameterProperty);
        Ok(flags
            .apply_accessibility(node)
            .with("decorators", decorators)
            .with("override", prop.is_override)
            .with("parameter", parameter)
            .with("readonly", prop.readonly)
            .with("static", false))
    }

    fn convert_class_prop(&mut self, prop: &ClassProp, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &prop.decorators);
        let range = self.member_range(prop.span, &decorator_ranges);
        let key_range = self.prop_name_range(&prop.key);
        self.check_member(SiteKind::PropertyDeclaration, class, range, key_range.0, &decorator_ranges, true)?;
        let value_range = prop.value.as_deref().map(|v| self.range(v.span()));
        self.check_property(
            key_range.1,
            range.1,
            false,
            prop.is_abstract,
            prop.definite,
            prop.type_ann.is_some(),
            value_range,
        )?;

        let parts = PropertyParts {
            key: self.convert_prop_name(&prop.key, ctx)?,
            computed: matches!(prop.key, PropName::Computed(_)),
            value: prop.value.as_deref().map(|v| self.convert_expr(v, ctx.value())).transpose()?,
            type_annotation: self.convert_opt_type_ann(prop.type_ann.as_deref())?,
            decorators: self.convert_decorators(&prop.decorators, ctx)?,
            flags: MemberFlags {
                is_static: prop.is_static,
                is_abstract: prop.is_abstract,
                is_optional: prop.is_optional,
                is_override: prop.is_override,
                accessibility: prop.accessibility.map(accessibility_str),
            },
            declare: prop.declare,
            definite: prop.definite,
            readonly: prop.readonly,
        };
        let ty = if prop.is_abstract {
            AstNodeType::TSAbstractPropertyDefinition
        } else {
            AstNodeType::PropertyDefinition
        };
        let node = self.node_at(NativeKind::ClassProp, range, ty);
        Ok(parts.apply(node))
    }

    fn convert_private_prop(&mut self, prop: &PrivateProp, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &prop.decorators);
        let range = self.member_range(prop.span, &decorator_ranges);
        let key = self.convert_private_name(&prop.key);
        let key_range = key.range;
        self.check_member(SiteKind::PropertyDeclaration, class, range, key_range.0, &decorator_ranges, true)?;
        let value_range = prop.value.as_deref().map(|v| self.range(v.span()));
        self.check_property(
            key_range.1,
            range.1,
            false,
            false,
            prop.definite,
            prop.type_ann.is_some(),
            value_range,
        )?;

        let parts = PropertyParts {
            key,
            computed: false,
            value: prop.value.as_deref().map(|v| self.convert_expr(v, ctx.value())).transpose()?,
            type_annotation: self.convert_opt_type_ann(prop.type_ann.as_deref())?,
            decorators: self.convert_decorators(&prop.decorators, ctx)?,
            flags: MemberFlags {
                is_static: prop.is_static,
                is_optional: prop.is_optional,
                is_override: prop.is_override,
                accessibility: prop.accessibility.map(accessibility_str),
                ..MemberFlags::default()
            },
            declare: false,
            definite: prop.definite,
            readonly: prop.readonly,
        };
        let node = self.node_at(NativeKind::PrivateProp, range, AstNodeType::PropertyDefinition);
        Ok(parts.apply(node))
    }

    fn convert_auto_accessor(&mut self, accessor: &AutoAccessor, class: ClassInfo, ctx: Ctx) -> TsResult<Node> {
        let decorator_ranges = decorator_ranges(self, &accessor.decorators);
        let range = self.member_range(accessor.span, &decorator_ranges);
        let (key, computed) = match &accessor.key {
            Key::Private(name) => (self.convert_private_name(name), false),
            Key::Public(name) => (
                self.convert_prop_name(name, ctx)?,
                matches!(name, PropName::Computed(_)),
            ),
        };
        let key_range = match &accessor.key {
            Key::Public(name) => self.prop_name_range(name),
            Key::Private(_) => key.range,
        };
        self.check_member(SiteKind::PropertyDeclaration, class, range, key_range.0, &decorator_ranges, true)?;
        let after_key = self.next_token(key_range.1);
        let definite = self.text().as_bytes().get(after_key as usize) == Some(&b'!');
        let value_range = accessor.value.as_deref().map(|v| self.range(v.span()));
        self.check_property(
            key_range.1,
            range.1,
            true,
            accessor.is_abstract,
            definite,
            accessor.type_ann.is_some(),
            value_range,
        )?;

        let parts = PropertyParts {
            key,
            computed,
            value: accessor.value.as_deref().map(|v| self.convert_expr(v, ctx.value())).transpose()?,
            type_annotation: self.convert_opt_type_ann(accessor.type_ann.as_deref())?,
            decorators: self.convert_decorators(&accessor.decorators, ctx)?,
            flags: MemberFlags {
                is_static: accessor.is_static,
                is_abstract: accessor.is_abstract,
                is_override: accessor.is_override,
                accessibility: accessor.accessibility.map(accessibility_str),
                ..MemberFlags::default()
            },
            declare: false,
            definite,
            readonly: false,
        };
        let ty = if accessor.is_abstract {
            AstNodeType::TSAbstractAccessorProperty
        } else {
            AstNodeType::AccessorProperty
        };
        let node = self.node_at(NativeKind::AutoAccessor, range, ty);
        Ok(parts.apply(node))
    }

    /// Checks on property declarations that apply regardless of
    /// `allow_invalid_ast`.
    #[allow(clippy::too_many_arguments)]
    fn check_property(
        &self,
        key_end: u32,
        end: u32,
        accessor: bool,
        is_abstract: bool,
        definite: bool,
        has_type: bool,
        value: Option<Range>,
    ) -> TsResult<()> {
        let after_key = self.next_token(key_end);
        let bytes = self.text().as_bytes();
        if accessor && bytes.get(after_key as usize) == Some(&b'?') {
            return Err(self.grammar_error("'accessor' properties cannot be declared optional.", after_key));
        }
        if definite {
            let mark = self.find(key_end, end, b'!').unwrap_or(after_key);
            if value.is_some() {
                return Err(self.grammar_error(
                    "Declarations with initializers cannot also have definite assignment assertions.",
                    mark,
                ));
            }
            if !has_type {
                return Err(self.grammar_error(
                    "Declarations with definite assignment assertions must also have type annotations.",
                    mark,
                ));
            }
        }
        if let (true, Some(value)) = (is_abstract, value) {
            return Err(self.grammar_error("Abstract property cannot have an initializer.", value.0));
        }
        Ok(())
    }

    fn convert_static_block(&mut self, block: &StaticBlock, ctx: Ctx) -> TsResult<Node> {
        let stmts: Vec<&Stmt> = block.body.stmts.iter().collect();
        let body = self.convert_statement_list(&stmts, ctx.within(SiteParent::Other), false)?;
        let node = self.node(NativeKind::StaticBlock, block.span, AstNodeType::StaticBlock);
        self.record(&node, NativeKind::BlockStmt, self.range(block.body.span));
        Ok(node.with("body", body))
    }
}
