//! Modifier and decorator placement checks.
//!
//! The upstream parser accepts modifiers in places the TypeScript binder
//! would reject. [`check_modifiers`] reports the first misplaced modifier or
//! decorator of one declaration, pointing at the offending keyword.

use crate::location::Range;
use crate::modifiers::{Modifier, ModifierKind};

/// Syntactic kind of the declaration carrying the modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    ClassDeclaration,
    ClassExpression,
    PropertyDeclaration,
    MethodDeclaration,
    GetAccessor,
    SetAccessor,
    Constructor,
    ClassStaticBlock,
    IndexSignature,
    PropertySignature,
    MethodSignature,
    Parameter,
    TypeParameter,
    FunctionDeclaration,
    FunctionExpression,
    ArrowFunction,
    VariableStatement,
    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    ModuleDeclaration,
    ImportEqualsDeclaration,
    ConstructorType,
    Other,
}

/// The syntactic container of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteParent {
    SourceFile,
    ModuleBlock,
    ClassDeclaration,
    ClassExpression,
    Interface,
    TypeAlias,
    TypeLiteral,
    /// Parameters: the owning function.
    Function {
        kind: SiteKind,
        has_body: bool,
        in_class_declaration: bool,
    },
    Other,
}

impl SiteParent {
    pub fn is_class_like(self) -> bool {
        matches!(self, SiteParent::ClassDeclaration | SiteParent::ClassExpression)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModifierSite<'a> {
    pub kind: SiteKind,
    pub parent: SiteParent,
    pub modifiers: &'a [Modifier],
    pub decorators: &'a [Range],
    pub has_body: bool,
    pub is_this_param: bool,
    /// `let`, `const`, `using`, ... for variable statements.
    pub declaration_kind: Option<&'static str>,
}

impl<'a> ModifierSite<'a> {
    pub fn new(kind: SiteKind, parent: SiteParent) -> Self {
        Self {
            kind,
            parent,
            modifiers: &[],
            decorators: &[],
            has_body: true,
            is_this_param: false,
            declaration_kind: None,
        }
    }

    pub fn modifiers(mut self, modifiers: &'a [Modifier]) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn decorators(mut self, decorators: &'a [Range]) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn has_body(mut self, has_body: bool) -> Self {
        self.has_body = has_body;
        self
    }

    pub fn this_param(mut self, is_this_param: bool) -> Self {
        self.is_this_param = is_this_param;
        self
    }

    pub fn declaration_kind(mut self, kind: &'static str) -> Self {
        self.declaration_kind = Some(kind);
        self
    }

    fn has(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub message: String,
    pub offset: u32,
}

impl GrammarError {
    fn at(range: Range, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: range.0,
        }
    }
}

fn can_be_decorated(site: &ModifierSite<'_>) -> bool {
    match site.kind {
        SiteKind::ClassDeclaration | SiteKind::ClassExpression => true,
        SiteKind::PropertyDeclaration => match site.parent {
            SiteParent::ClassDeclaration => true,
            SiteParent::ClassExpression => !site.has(ModifierKind::Abstract),
            _ => false,
        },
        SiteKind::GetAccessor | SiteKind::SetAccessor | SiteKind::MethodDeclaration => {
            site.has_body && site.parent.is_class_like()
        }
        SiteKind::Parameter => match site.parent {
            SiteParent::Function {
                kind,
                has_body,
                in_class_declaration,
            } => {
                has_body
                    && matches!(
                        kind,
                        SiteKind::Constructor | SiteKind::MethodDeclaration | SiteKind::SetAccessor
                    )
                    && !site.is_this_param
                    && in_class_declaration
            }
            _ => false,
        },
        _ => false,
    }
}

pub fn check_modifiers(site: &ModifierSite<'_>) -> Result<(), GrammarError> {
    if let Some(decorator) = site.decorators.first() {
        if !can_be_decorated(site) {
            if site.kind == SiteKind::MethodDeclaration && !site.has_body {
                return Err(GrammarError::at(
                    *decorator,
                    "A decorator can only decorate a method implementation, not an overload.",
                ));
            }
            return Err(GrammarError::at(*decorator, "Decorators are not valid here."));
        }
    }

    for modifier in site.modifiers {
        check_one(site, modifier)?;
    }
    Ok(())
}

fn check_one(site: &ModifierSite<'_>, modifier: &Modifier) -> Result<(), GrammarError> {
    let kind = modifier.kind;
    let word = kind.as_str();
    let fail = |message: String| Err(GrammarError::at(modifier.range, message));

    if kind != ModifierKind::Readonly {
        if matches!(site.kind, SiteKind::PropertySignature | SiteKind::MethodSignature) {
            return fail(format!("'{word}' modifier cannot appear on a type member"));
        }
        if site.kind == SiteKind::IndexSignature
            && (kind != ModifierKind::Static || !site.parent.is_class_like())
        {
            return fail(format!("'{word}' modifier cannot appear on an index signature"));
        }
    }

    if !matches!(kind, ModifierKind::In | ModifierKind::Out | ModifierKind::Const)
        && site.kind == SiteKind::TypeParameter
    {
        return fail(format!("'{word}' modifier cannot appear on a type parameter"));
    }

    if matches!(kind, ModifierKind::In | ModifierKind::Out)
        && (site.kind != SiteKind::TypeParameter
            || !matches!(
                site.parent,
                SiteParent::Interface
                    | SiteParent::ClassDeclaration
                    | SiteParent::ClassExpression
                    | SiteParent::TypeAlias
            ))
    {
        return fail(format!(
            "'{word}' modifier can only appear on a type parameter of a class, interface or type alias"
        ));
    }

    if kind == ModifierKind::Readonly
        && !matches!(
            site.kind,
            SiteKind::PropertyDeclaration
                | SiteKind::PropertySignature
                | SiteKind::IndexSignature
                | SiteKind::Parameter
        )
    {
        return fail(
            "'readonly' modifier can only appear on a property declaration or index signature."
                .into(),
        );
    }

    if kind == ModifierKind::Declare
        && site.parent.is_class_like()
        && site.kind != SiteKind::PropertyDeclaration
    {
        return fail(format!(
            "'{word}' modifier cannot appear on class elements of this kind."
        ));
    }

    if kind == ModifierKind::Declare && site.kind == SiteKind::VariableStatement {
        if let Some(declaration_kind @ ("using" | "await using")) = site.declaration_kind {
            return fail(format!(
                "'declare' modifier cannot appear on a '{declaration_kind}' declaration."
            ));
        }
    }

    if kind == ModifierKind::Abstract
        && !matches!(
            site.kind,
            SiteKind::ClassDeclaration
                | SiteKind::ConstructorType
                | SiteKind::MethodDeclaration
                | SiteKind::PropertyDeclaration
                | SiteKind::GetAccessor
                | SiteKind::SetAccessor
        )
    {
        return fail(format!(
            "'{word}' modifier can only appear on a class, method, or property declaration."
        ));
    }

    if matches!(
        kind,
        ModifierKind::Static | ModifierKind::Public | ModifierKind::Protected | ModifierKind::Private
    ) && matches!(site.parent, SiteParent::ModuleBlock | SiteParent::SourceFile)
    {
        return fail(format!(
            "'{word}' modifier cannot appear on a module or namespace element."
        ));
    }

    if kind == ModifierKind::Accessor && site.kind != SiteKind::PropertyDeclaration {
        return fail("'accessor' modifier can only appear on a property declaration.".into());
    }

    if kind == ModifierKind::Async
        && !matches!(
            site.kind,
            SiteKind::MethodDeclaration
                | SiteKind::FunctionDeclaration
                | SiteKind::FunctionExpression
                | SiteKind::ArrowFunction
        )
    {
        return fail("'async' modifier cannot be used here.".into());
    }

    if site.kind == SiteKind::Parameter
        && matches!(
            kind,
            ModifierKind::Static | ModifierKind::Export | ModifierKind::Declare | ModifierKind::Async
        )
    {
        return fail(format!("'{word}' modifier cannot appear on a parameter."));
    }

    if kind.is_accessibility() {
        if let Some(other) = site
            .modifiers
            .iter()
            .find(|other| other.range != modifier.range && other.kind.is_accessibility())
        {
            return Err(GrammarError::at(
                other.range,
                "Accessibility modifier already seen.",
            ));
        }
    }

    if site.kind == SiteKind::Parameter
        && (kind.is_accessibility()
            || matches!(kind, ModifierKind::Readonly | ModifierKind::Override))
    {
        let in_constructor_body = matches!(
            site.parent,
            SiteParent::Function {
                kind: SiteKind::Constructor,
                has_body: true,
                ..
            }
        );
        if !in_constructor_body {
            return fail("A parameter property is only allowed in a constructor implementation.".into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(kind: ModifierKind, start: u32) -> Modifier {
        Modifier::new(kind, Range(start, start + kind.as_str().len() as u32))
    }

    fn class_method<'a>() -> ModifierSite<'a> {
        ModifierSite::new(SiteKind::MethodDeclaration, SiteParent::ClassDeclaration)
    }

    #[test]
    fn clean_site_passes() {
        let mods = [m(ModifierKind::Public, 0), m(ModifierKind::Static, 7)];
        assert!(check_modifiers(&class_method().modifiers(&mods)).is_ok());
    }

    #[test]
    fn decorator_on_overload_is_rejected() {
        let decorators = [Range(2, 6)];
        let site = class_method().decorators(&decorators).has_body(false);
        let err = check_modifiers(&site).unwrap_err();
        assert_eq!(
            err.message,
            "A decorator can only decorate a method implementation, not an overload."
        );
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn decorator_on_function_is_rejected() {
        let decorators = [Range(0, 4)];
        let site = ModifierSite::new(SiteKind::FunctionDeclaration, SiteParent::SourceFile)
            .decorators(&decorators);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "Decorators are not valid here."
        );
    }

    #[test]
    fn decorator_on_abstract_property_of_class_expression_is_rejected() {
        let decorators = [Range(0, 4)];
        let mods = [m(ModifierKind::Abstract, 5)];
        let site = ModifierSite::new(SiteKind::PropertyDeclaration, SiteParent::ClassExpression)
            .decorators(&decorators)
            .modifiers(&mods);
        assert!(check_modifiers(&site).is_err());

        let site = ModifierSite::new(SiteKind::PropertyDeclaration, SiteParent::ClassDeclaration)
            .decorators(&decorators)
            .modifiers(&mods);
        assert!(check_modifiers(&site).is_ok());
    }

    #[test]
    fn parameter_decorators_need_a_class_method_with_body() {
        let decorators = [Range(12, 16)];
        let parent = SiteParent::Function {
            kind: SiteKind::Constructor,
            has_body: true,
            in_class_declaration: true,
        };
        let site = ModifierSite::new(SiteKind::Parameter, parent).decorators(&decorators);
        assert!(check_modifiers(&site).is_ok());

        let this_site = site.this_param(true);
        assert!(check_modifiers(&this_site).is_err());

        let free = SiteParent::Function {
            kind: SiteKind::FunctionDeclaration,
            has_body: true,
            in_class_declaration: false,
        };
        let site = ModifierSite::new(SiteKind::Parameter, free).decorators(&decorators);
        assert!(check_modifiers(&site).is_err());
    }

    #[test]
    fn type_member_modifiers() {
        let mods = [m(ModifierKind::Public, 4)];
        let site = ModifierSite::new(SiteKind::PropertySignature, SiteParent::Interface)
            .modifiers(&mods);
        let err = check_modifiers(&site).unwrap_err();
        assert_eq!(err.message, "'public' modifier cannot appear on a type member");
        assert_eq!(err.offset, 4);

        let readonly = [m(ModifierKind::Readonly, 4)];
        let site = ModifierSite::new(SiteKind::PropertySignature, SiteParent::Interface)
            .modifiers(&readonly);
        assert!(check_modifiers(&site).is_ok());
    }

    #[test]
    fn static_index_signature_only_in_classes() {
        let mods = [m(ModifierKind::Static, 0)];
        let in_class = ModifierSite::new(SiteKind::IndexSignature, SiteParent::ClassDeclaration)
            .modifiers(&mods);
        assert!(check_modifiers(&in_class).is_ok());

        let in_interface = ModifierSite::new(SiteKind::IndexSignature, SiteParent::Interface)
            .modifiers(&mods);
        assert_eq!(
            check_modifiers(&in_interface).unwrap_err().message,
            "'static' modifier cannot appear on an index signature"
        );
    }

    #[test]
    fn variance_modifiers_only_on_declaration_type_parameters() {
        let mods = [m(ModifierKind::In, 1)];
        let ok = ModifierSite::new(SiteKind::TypeParameter, SiteParent::Interface).modifiers(&mods);
        assert!(check_modifiers(&ok).is_ok());

        let parent = SiteParent::Function {
            kind: SiteKind::FunctionDeclaration,
            has_body: true,
            in_class_declaration: false,
        };
        let bad = ModifierSite::new(SiteKind::TypeParameter, parent).modifiers(&mods);
        assert_eq!(
            check_modifiers(&bad).unwrap_err().message,
            "'in' modifier can only appear on a type parameter of a class, interface or type alias"
        );

        let public = [m(ModifierKind::Public, 1)];
        let bad = ModifierSite::new(SiteKind::TypeParameter, SiteParent::Interface)
            .modifiers(&public);
        assert_eq!(
            check_modifiers(&bad).unwrap_err().message,
            "'public' modifier cannot appear on a type parameter"
        );
    }

    #[test]
    fn readonly_placement() {
        let mods = [m(ModifierKind::Readonly, 0)];
        let site = class_method().modifiers(&mods);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'readonly' modifier can only appear on a property declaration or index signature."
        );
    }

    #[test]
    fn declare_in_class_only_on_properties() {
        let mods = [m(ModifierKind::Declare, 0)];
        assert!(check_modifiers(&class_method().modifiers(&mods)).is_err());
        let prop = ModifierSite::new(SiteKind::PropertyDeclaration, SiteParent::ClassDeclaration)
            .modifiers(&mods);
        assert!(check_modifiers(&prop).is_ok());
    }

    #[test]
    fn declare_using_is_rejected() {
        let mods = [m(ModifierKind::Declare, 0)];
        let site = ModifierSite::new(SiteKind::VariableStatement, SiteParent::SourceFile)
            .modifiers(&mods)
            .declaration_kind("await using");
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'declare' modifier cannot appear on a 'await using' declaration."
        );

        let site = ModifierSite::new(SiteKind::VariableStatement, SiteParent::SourceFile)
            .modifiers(&mods)
            .declaration_kind("const");
        assert!(check_modifiers(&site).is_ok());
    }

    #[test]
    fn abstract_placement() {
        let mods = [m(ModifierKind::Abstract, 0)];
        let site = ModifierSite::new(SiteKind::InterfaceDeclaration, SiteParent::SourceFile)
            .modifiers(&mods);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'abstract' modifier can only appear on a class, method, or property declaration."
        );
    }

    #[test]
    fn accessibility_at_top_level() {
        let mods = [m(ModifierKind::Private, 0)];
        let site = ModifierSite::new(SiteKind::FunctionDeclaration, SiteParent::ModuleBlock)
            .modifiers(&mods);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'private' modifier cannot appear on a module or namespace element."
        );
    }

    #[test]
    fn accessor_and_async_placement() {
        let accessor = [m(ModifierKind::Accessor, 0)];
        assert_eq!(
            check_modifiers(&class_method().modifiers(&accessor))
                .unwrap_err()
                .message,
            "'accessor' modifier can only appear on a property declaration."
        );

        let async_mod = [m(ModifierKind::Async, 0)];
        let site = ModifierSite::new(SiteKind::PropertyDeclaration, SiteParent::ClassDeclaration)
            .modifiers(&async_mod);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'async' modifier cannot be used here."
        );
    }

    #[test]
    fn duplicate_accessibility_points_at_second_keyword() {
        let mods = [m(ModifierKind::Public, 0), m(ModifierKind::Private, 7)];
        let err = check_modifiers(&class_method().modifiers(&mods)).unwrap_err();
        assert_eq!(err.message, "Accessibility modifier already seen.");
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn parameter_modifiers() {
        let ctor = SiteParent::Function {
            kind: SiteKind::Constructor,
            has_body: true,
            in_class_declaration: true,
        };
        let export = [m(ModifierKind::Export, 0)];
        let site = ModifierSite::new(SiteKind::Parameter, ctor).modifiers(&export);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "'export' modifier cannot appear on a parameter."
        );

        let private = [m(ModifierKind::Private, 0)];
        let site = ModifierSite::new(SiteKind::Parameter, ctor).modifiers(&private);
        assert!(check_modifiers(&site).is_ok());

        let overload = SiteParent::Function {
            kind: SiteKind::Constructor,
            has_body: false,
            in_class_declaration: true,
        };
        let site = ModifierSite::new(SiteKind::Parameter, overload).modifiers(&private);
        assert_eq!(
            check_modifiers(&site).unwrap_err().message,
            "A parameter property is only allowed in a constructor implementation."
        );
    }
}
