//! Adapter vocabulary for the native (swc) tree.
//!
//! swc nodes have no identity beyond their position in memory, so a native
//! node is identified by its kind and source range. [`NativeKind`] is the
//! closed list of native kinds the converter knows about.

use std::fmt;

use crate::location::Range;

macro_rules! native_kinds {
    ($($variant:ident),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NativeKind {
            $($variant,)*
        }

        impl NativeKind {
            pub const ALL: &'static [NativeKind] = &[$(NativeKind::$variant,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(NativeKind::$variant => stringify!($variant),)*
                }
            }

            /// Output type name used when a node of this kind is deep-copied.
            pub fn fallback_type_name(self) -> &'static str {
                match self {
                    $(NativeKind::$variant => concat!("TS", stringify!($variant)),)*
                }
            }
        }
    };
}

native_kinds!(
    Program,
    // statements
    BlockStmt,
    EmptyStmt,
    DebuggerStmt,
    WithStmt,
    ReturnStmt,
    LabeledStmt,
    BreakStmt,
    ContinueStmt,
    IfStmt,
    SwitchStmt,
    SwitchCase,
    ThrowStmt,
    TryStmt,
    CatchClause,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    ForInStmt,
    ForOfStmt,
    ExprStmt,
    VarDecl,
    VarDeclarator,
    UsingDecl,
    FnDecl,
    ClassDecl,
    // modules
    ImportDecl,
    ImportNamedSpecifier,
    ImportDefaultSpecifier,
    ImportStarAsSpecifier,
    ImportAttribute,
    ExportDecl,
    NamedExport,
    ExportNamedSpecifier,
    ExportNamespaceSpecifier,
    ExportDefaultSpecifier,
    ExportDefaultDecl,
    ExportDefaultExpr,
    ExportAll,
    // expressions
    ThisExpr,
    ArrayLit,
    ObjectLit,
    FnExpr,
    UnaryExpr,
    UpdateExpr,
    BinExpr,
    AssignExpr,
    MemberExpr,
    SuperPropExpr,
    CondExpr,
    CallExpr,
    NewExpr,
    SeqExpr,
    Ident,
    Str,
    Number,
    Bool,
    Null,
    BigInt,
    Regex,
    Tpl,
    TplElement,
    TaggedTpl,
    ArrowExpr,
    ClassExpr,
    YieldExpr,
    MetaPropExpr,
    AwaitExpr,
    ParenExpr,
    PrivateName,
    OptChainExpr,
    OptCall,
    Super,
    Import,
    SpreadElement,
    Invalid,
    // properties and patterns
    KeyValueProp,
    AssignProp,
    GetterProp,
    SetterProp,
    MethodProp,
    ComputedPropName,
    BindingIdent,
    ArrayPat,
    ObjectPat,
    RestPat,
    AssignPat,
    KeyValuePatProp,
    AssignPatProp,
    // functions and classes
    Function,
    Param,
    Class,
    Constructor,
    ClassMethod,
    PrivateMethod,
    ClassProp,
    PrivateProp,
    StaticBlock,
    AutoAccessor,
    TsParamProp,
    Decorator,
    TsIndexSignature,
    // TypeScript
    TsTypeAnn,
    TsTypeParamDecl,
    TsTypeParam,
    TsTypeParamInstantiation,
    TsKeywordType,
    TsThisType,
    TsFnType,
    TsConstructorType,
    TsTypeRef,
    TsQualifiedName,
    TsTypeQuery,
    TsImportType,
    TsTypeLit,
    TsArrayType,
    TsTupleType,
    TsTupleElement,
    TsOptionalType,
    TsRestType,
    TsUnionType,
    TsIntersectionType,
    TsConditionalType,
    TsInferType,
    TsParenthesizedType,
    TsTypeOperator,
    TsIndexedAccessType,
    TsMappedType,
    TsLitType,
    TsTplLitType,
    TsTypePredicate,
    TsCallSignatureDecl,
    TsConstructSignatureDecl,
    TsPropertySignature,
    TsGetterSignature,
    TsSetterSignature,
    TsMethodSignature,
    TsInterfaceDecl,
    TsInterfaceBody,
    TsExprWithTypeArgs,
    TsTypeAliasDecl,
    TsEnumDecl,
    TsEnumMember,
    TsModuleDecl,
    TsModuleBlock,
    TsNamespaceDecl,
    TsImportEqualsDecl,
    TsExternalModuleRef,
    TsExportAssignment,
    TsNamespaceExportDecl,
    TsAsExpr,
    TsConstAssertion,
    TsSatisfiesExpr,
    TsNonNullExpr,
    TsTypeAssertion,
    TsInstantiation,
    // JSX
    JsxElement,
    JsxFragment,
    JsxOpeningElement,
    JsxClosingElement,
    JsxOpeningFragment,
    JsxClosingFragment,
    JsxAttribute,
    JsxSpreadAttribute,
    JsxExpressionContainer,
    JsxSpreadChild,
    JsxText,
    JsxMemberExpression,
    JsxNamespacedName,
    JsxEmptyExpression,
);

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a native node: its kind and file-relative range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeKey {
    pub kind: NativeKind,
    pub start: u32,
    pub end: u32,
}

impl NativeKey {
    pub fn new(kind: NativeKind, range: Range) -> Self {
        Self {
            kind,
            start: range.0,
            end: range.1,
        }
    }

    pub fn range(&self) -> Range {
        Range(self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_are_prefixed() {
        assert_eq!(NativeKind::Invalid.fallback_type_name(), "TSInvalid");
        assert_eq!(NativeKind::ParenExpr.as_str(), "ParenExpr");
    }

    #[test]
    fn all_lists_every_kind_once() {
        let mut names: Vec<_> = NativeKind::ALL.iter().map(|k| k.as_str()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn keys_compare_by_kind_and_range() {
        let a = NativeKey::new(NativeKind::Ident, Range(0, 1));
        let b = NativeKey::new(NativeKind::BindingIdent, Range(0, 1));
        assert_ne!(a, b);
        assert_eq!(a.range(), Range(0, 1));
    }
}
