//! Class member usage analysis.

mod analyzer;
mod scope;

pub use analyzer::{ClassScopeAnalysis, ClassScopeAnalyzer, analyze_class_member_usage};
pub use scope::{
    AncestorIter, ClassScope, FunctionScope, Member, MemberKey, MemberKind, ThisContext, ThisScope,
    ThisScopeId, ThisScopeKind, ThisScopeTree,
};
