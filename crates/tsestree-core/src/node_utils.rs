//! Stateless classifiers over native node kinds and operators.

use swc_ecma_ast::{
    Accessibility, AssignOp, BinaryOp, Expr, MemberProp, PropName, TsKeywordTypeKind, UnaryOp,
    UpdateOp, VarDeclKind,
};

use crate::ast::AstNodeType;
use crate::modifiers::{Modifier, ModifierKind};
use crate::native::NativeKind;
use crate::scanner::TokenKind;

/// Shape a binary operator converts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryShape {
    Logical,
    Binary,
}

impl BinaryShape {
    pub fn node_type(self) -> AstNodeType {
        match self {
            BinaryShape::Logical => AstNodeType::LogicalExpression,
            BinaryShape::Binary => AstNodeType::BinaryExpression,
        }
    }
}

pub fn binary_shape(op: BinaryOp) -> BinaryShape {
    match op {
        BinaryOp::LogicalOr | BinaryOp::LogicalAnd | BinaryOp::NullishCoalescing => {
            BinaryShape::Logical
        }
        _ => BinaryShape::Binary,
    }
}

pub fn binary_operator(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::EqEq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::EqEqEq => "===",
        BinaryOp::NotEqEq => "!==",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::LShift => "<<",
        BinaryOp::RShift => ">>",
        BinaryOp::ZeroFillRShift => ">>>",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::BitAnd => "&",
        BinaryOp::LogicalOr => "||",
        BinaryOp::LogicalAnd => "&&",
        BinaryOp::In => "in",
        BinaryOp::InstanceOf => "instanceof",
        BinaryOp::Exp => "**",
        BinaryOp::NullishCoalescing => "??",
    }
}

pub fn assignment_operator(op: AssignOp) -> &'static str {
    match op {
        AssignOp::Assign => "=",
        AssignOp::AddAssign => "+=",
        AssignOp::SubAssign => "-=",
        AssignOp::MulAssign => "*=",
        AssignOp::DivAssign => "/=",
        AssignOp::ModAssign => "%=",
        AssignOp::LShiftAssign => "<<=",
        AssignOp::RShiftAssign => ">>=",
        AssignOp::ZeroFillRShiftAssign => ">>>=",
        AssignOp::BitOrAssign => "|=",
        AssignOp::BitXorAssign => "^=",
        AssignOp::BitAndAssign => "&=",
        AssignOp::ExpAssign => "**=",
        AssignOp::AndAssign => "&&=",
        AssignOp::OrAssign => "||=",
        AssignOp::NullishAssign => "??=",
    }
}

pub fn is_assignment_operator(text: &str) -> bool {
    matches!(
        text,
        "=" | "+="
            | "-="
            | "*="
            | "/="
            | "%="
            | "<<="
            | ">>="
            | ">>>="
            | "|="
            | "^="
            | "&="
            | "**="
            | "&&="
            | "||="
            | "??="
    )
}

pub fn unary_operator(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Minus => "-",
        UnaryOp::Plus => "+",
        UnaryOp::Bang => "!",
        UnaryOp::Tilde => "~",
        UnaryOp::TypeOf => "typeof",
        UnaryOp::Void => "void",
        UnaryOp::Delete => "delete",
    }
}

pub fn update_operator(op: UpdateOp) -> &'static str {
    match op {
        UpdateOp::PlusPlus => "++",
        UpdateOp::MinusMinus => "--",
    }
}

pub fn is_comma_sequence(expr: &Expr) -> bool {
    matches!(expr, Expr::Seq(_))
}

pub fn is_token(kind: TokenKind) -> bool {
    !matches!(kind, TokenKind::JsxText)
}

pub fn is_punctuator(kind: TokenKind) -> bool {
    kind == TokenKind::Punctuator
}

pub fn is_keyword(kind: TokenKind) -> bool {
    kind == TokenKind::Keyword
}

pub fn is_jsx_token(kind: NativeKind) -> bool {
    matches!(
        kind,
        NativeKind::JsxElement
            | NativeKind::JsxFragment
            | NativeKind::JsxOpeningElement
            | NativeKind::JsxClosingElement
            | NativeKind::JsxOpeningFragment
            | NativeKind::JsxClosingFragment
            | NativeKind::JsxAttribute
            | NativeKind::JsxSpreadAttribute
            | NativeKind::JsxExpressionContainer
            | NativeKind::JsxSpreadChild
            | NativeKind::JsxText
            | NativeKind::JsxMemberExpression
            | NativeKind::JsxNamespacedName
            | NativeKind::JsxEmptyExpression
    )
}

pub fn has_modifier(modifiers: &[Modifier], kind: ModifierKind) -> bool {
    modifiers.iter().any(|m| m.kind == kind)
}

/// First of `public` / `protected` / `private`, in source order.
pub fn get_accessibility(modifiers: &[Modifier]) -> Option<&'static str> {
    modifiers.iter().find_map(|m| match m.kind {
        ModifierKind::Public => Some("public"),
        ModifierKind::Protected => Some("protected"),
        ModifierKind::Private => Some("private"),
        _ => None,
    })
}

pub fn accessibility_str(accessibility: Accessibility) -> &'static str {
    match accessibility {
        Accessibility::Public => "public",
        Accessibility::Protected => "protected",
        Accessibility::Private => "private",
    }
}

pub fn declaration_kind(kind: VarDeclKind) -> &'static str {
    match kind {
        VarDeclKind::Var => "var",
        VarDeclKind::Let => "let",
        VarDeclKind::Const => "const",
    }
}

pub fn using_declaration_kind(is_await: bool) -> &'static str {
    if is_await { "await using" } else { "using" }
}

pub fn is_computed_property_name(name: &PropName) -> bool {
    matches!(name, PropName::Computed(_))
}

pub fn is_computed_member(prop: &MemberProp) -> bool {
    matches!(prop, MemberProp::Computed(_))
}

pub fn keyword_type(kind: TsKeywordTypeKind) -> AstNodeType {
    match kind {
        TsKeywordTypeKind::TsAnyKeyword => AstNodeType::TSAnyKeyword,
        TsKeywordTypeKind::TsUnknownKeyword => AstNodeType::TSUnknownKeyword,
        TsKeywordTypeKind::TsNumberKeyword => AstNodeType::TSNumberKeyword,
        TsKeywordTypeKind::TsObjectKeyword => AstNodeType::TSObjectKeyword,
        TsKeywordTypeKind::TsBooleanKeyword => AstNodeType::TSBooleanKeyword,
        TsKeywordTypeKind::TsBigIntKeyword => AstNodeType::TSBigIntKeyword,
        TsKeywordTypeKind::TsStringKeyword => AstNodeType::TSStringKeyword,
        TsKeywordTypeKind::TsSymbolKeyword => AstNodeType::TSSymbolKeyword,
        TsKeywordTypeKind::TsVoidKeyword => AstNodeType::TSVoidKeyword,
        TsKeywordTypeKind::TsUndefinedKeyword => AstNodeType::TSUndefinedKeyword,
        TsKeywordTypeKind::TsNullKeyword => AstNodeType::TSNullKeyword,
        TsKeywordTypeKind::TsNeverKeyword => AstNodeType::TSNeverKeyword,
        TsKeywordTypeKind::TsIntrinsicKeyword => AstNodeType::TSIntrinsicKeyword,
    }
}

/// Output node type for a modifier keyword in `TSParameterProperty`-less
/// positions such as abstract constructor types.
pub fn modifier_keyword_type(kind: ModifierKind) -> Option<AstNodeType> {
    Some(match kind {
        ModifierKind::Abstract => AstNodeType::TSAbstractKeyword,
        ModifierKind::Async => AstNodeType::TSAsyncKeyword,
        ModifierKind::Declare => AstNodeType::TSDeclareKeyword,
        ModifierKind::Export => AstNodeType::TSExportKeyword,
        ModifierKind::Private => AstNodeType::TSPrivateKeyword,
        ModifierKind::Protected => AstNodeType::TSProtectedKeyword,
        ModifierKind::Public => AstNodeType::TSPublicKeyword,
        ModifierKind::Readonly => AstNodeType::TSReadonlyKeyword,
        ModifierKind::Static => AstNodeType::TSStaticKeyword,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;

    #[test]
    fn logical_operators_get_logical_shape() {
        assert_eq!(binary_shape(BinaryOp::LogicalOr), BinaryShape::Logical);
        assert_eq!(binary_shape(BinaryOp::LogicalAnd), BinaryShape::Logical);
        assert_eq!(binary_shape(BinaryOp::NullishCoalescing), BinaryShape::Logical);
        assert_eq!(binary_shape(BinaryOp::Add), BinaryShape::Binary);
        assert_eq!(binary_shape(BinaryOp::In), BinaryShape::Binary);
    }

    #[test]
    fn operator_spellings() {
        assert_eq!(binary_operator(BinaryOp::ZeroFillRShift), ">>>");
        assert_eq!(assignment_operator(AssignOp::NullishAssign), "??=");
        assert_eq!(unary_operator(UnaryOp::TypeOf), "typeof");
        assert_eq!(update_operator(UpdateOp::MinusMinus), "--");
    }

    #[test]
    fn assignment_operator_recognition() {
        assert!(is_assignment_operator("="));
        assert!(is_assignment_operator(">>>="));
        assert!(!is_assignment_operator("=="));
        assert!(!is_assignment_operator("=>"));
    }

    #[test]
    fn accessibility_is_first_match() {
        let modifiers = vec![
            Modifier::new(ModifierKind::Static, Range(0, 6)),
            Modifier::new(ModifierKind::Private, Range(7, 14)),
            Modifier::new(ModifierKind::Public, Range(15, 21)),
        ];
        assert_eq!(get_accessibility(&modifiers), Some("private"));
        assert!(has_modifier(&modifiers, ModifierKind::Static));
        assert!(!has_modifier(&modifiers, ModifierKind::Readonly));
        assert_eq!(get_accessibility(&[]), None);
    }

    #[test]
    fn declaration_kinds() {
        assert_eq!(declaration_kind(VarDeclKind::Let), "let");
        assert_eq!(using_declaration_kind(true), "await using");
        assert_eq!(using_declaration_kind(false), "using");
    }

    #[test]
    fn jsx_kinds_are_jsx_tokens() {
        assert!(is_jsx_token(NativeKind::JsxText));
        assert!(!is_jsx_token(NativeKind::Ident));
    }
}
