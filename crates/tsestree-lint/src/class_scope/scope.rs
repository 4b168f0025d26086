//! This-scope tree: class bodies and the standalone functions nested in them.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;
use swc_ecma_ast::Accessibility;

pub type ThisScopeId = Id<ThisScope>;

/// Identity of a member inside one class. Private names live in their own
/// namespace so `#x` and `x` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberKey {
    Public(String),
    Private(String),
}

impl MemberKey {
    /// Name as written in source, `#` included for private names.
    pub fn display_name(&self) -> String {
        match self {
            MemberKey::Public(name) => name.clone(),
            MemberKey::Private(name) => format!("#{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Property,
    Accessor,
    ParameterProperty,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub key: MemberKey,
    pub kind: MemberKind,
    pub is_static: bool,
    pub accessibility: Option<Accessibility>,
    /// Span of the member name.
    pub span: Span,
    pub references: u32,
}

impl Member {
    pub fn name(&self) -> String {
        self.key.display_name()
    }

    pub fn is_private(&self) -> bool {
        matches!(self.key, MemberKey::Private(_)) || self.accessibility == Some(Accessibility::Private)
    }

    pub fn is_protected(&self) -> bool {
        self.accessibility == Some(Accessibility::Protected)
    }

    pub fn is_public(&self) -> bool {
        !self.is_private() && !self.is_protected()
    }

    pub fn is_accessor(&self) -> bool {
        self.kind == MemberKind::Accessor
    }
}

/// Member table of one class body. Static and instance members are looked
/// up separately.
#[derive(Debug, Default)]
pub struct ClassScope {
    pub name: Option<String>,
    members: Vec<Member>,
    instance: HashMap<MemberKey, usize>,
    statics: HashMap<MemberKey, usize>,
}

impl ClassScope {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Registers a member. A second declaration with the same key (getter and
    /// setter pair, overloads) shares the first entry.
    pub fn declare(&mut self, member: Member) {
        let table = if member.is_static {
            &mut self.statics
        } else {
            &mut self.instance
        };
        if table.contains_key(&member.key) {
            return;
        }
        table.insert(member.key.clone(), self.members.len());
        self.members.push(member);
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, key: &MemberKey, is_static: bool) -> Option<&Member> {
        let table = if is_static { &self.statics } else { &self.instance };
        table.get(key).map(|&index| &self.members[index])
    }

    pub fn declares(&self, key: &MemberKey) -> bool {
        self.instance.contains_key(key) || self.statics.contains_key(key)
    }

    /// Counts one reference. Returns whether the member exists.
    pub fn reference(&mut self, key: &MemberKey, is_static: bool) -> bool {
        let table = if is_static { &self.statics } else { &self.instance };
        match table.get(key) {
            Some(&index) => {
                self.members[index].references += 1;
                true
            }
            None => false,
        }
    }

    /// Counts one reference in whichever table declares `key`.
    pub fn reference_any(&mut self, key: &MemberKey) -> bool {
        self.reference(key, false) || self.reference(key, true)
    }
}

/// What `this` refers to inside a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThisContext {
    /// Unrelated to any analyzed class.
    None,
    /// Inside the class's own body; `is_static` selects the member table.
    SelfRef { class: ThisScopeId, is_static: bool },
    /// A standalone function declaring `this: C` for an enclosing class `C`.
    Delegated(ThisScopeId),
}

#[derive(Debug)]
pub struct FunctionScope {
    pub context: ThisContext,
}

#[derive(Debug)]
pub enum ThisScopeKind {
    Class(ClassScope),
    Function(FunctionScope),
}

#[derive(Debug)]
pub struct ThisScope {
    pub id: ThisScopeId,
    pub kind: ThisScopeKind,
    pub parent: Option<ThisScopeId>,
    pub children: Vec<ThisScopeId>,
    pub span: Span,
}

impl ThisScope {
    pub fn as_class(&self) -> Option<&ClassScope> {
        match &self.kind {
            ThisScopeKind::Class(class) => Some(class),
            ThisScopeKind::Function(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ThisScopeTree {
    arena: Arena<ThisScope>,
}

impl ThisScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_scope(&mut self, kind: ThisScopeKind, parent: Option<ThisScopeId>, span: Span) -> ThisScopeId {
        let id = self.arena.alloc_with_id(|id| ThisScope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
        });
        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }
        id
    }

    pub fn get(&self, id: ThisScopeId) -> &ThisScope {
        &self.arena[id]
    }

    pub fn class(&self, id: ThisScopeId) -> Option<&ClassScope> {
        self.arena[id].as_class()
    }

    pub fn class_mut(&mut self, id: ThisScopeId) -> Option<&mut ClassScope> {
        match &mut self.arena[id].kind {
            ThisScopeKind::Class(class) => Some(class),
            ThisScopeKind::Function(_) => None,
        }
    }

    pub fn ancestors(&self, id: ThisScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    /// Nearest class scope, starting at `from`, whose declared name is `name`.
    pub fn find_class_named(&self, from: ThisScopeId, name: &str) -> Option<ThisScopeId> {
        self.ancestors(from)
            .find(|scope| scope.as_class().and_then(|c| c.name.as_deref()) == Some(name))
            .map(|scope| scope.id)
    }

    /// Nearest class scope, starting at `from`, that declares `key`.
    pub fn find_class_declaring(&self, from: ThisScopeId, key: &MemberKey) -> Option<ThisScopeId> {
        self.ancestors(from)
            .find(|scope| scope.as_class().is_some_and(|c| c.declares(key)))
            .map(|scope| scope.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThisScope> {
        self.arena.iter().map(|(_, scope)| scope)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ThisScopeTree,
    current: Option<ThisScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a ThisScope;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = &self.tree.arena[self.current?];
        self.current = scope.parent;
        Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::DUMMY_SP;

    fn member(key: MemberKey, kind: MemberKind, is_static: bool) -> Member {
        Member {
            key,
            kind,
            is_static,
            accessibility: None,
            span: DUMMY_SP,
            references: 0,
        }
    }

    fn class_scope(tree: &mut ThisScopeTree, name: &str, parent: Option<ThisScopeId>) -> ThisScopeId {
        tree.create_scope(
            ThisScopeKind::Class(ClassScope::new(Some(name.to_string()))),
            parent,
            DUMMY_SP,
        )
    }

    #[test]
    fn private_and_public_keys_do_not_collide() {
        let mut class = ClassScope::new(None);
        class.declare(member(MemberKey::Private("x".into()), MemberKind::Property, false));
        class.declare(member(MemberKey::Public("x".into()), MemberKind::Property, false));

        assert_eq!(class.members().len(), 2);
        assert!(class.reference(&MemberKey::Private("x".into()), false));
        assert_eq!(class.member(&MemberKey::Private("x".into()), false).unwrap().references, 1);
        assert_eq!(class.member(&MemberKey::Public("x".into()), false).unwrap().references, 0);
    }

    #[test]
    fn accessor_pair_shares_one_member() {
        let mut class = ClassScope::new(None);
        class.declare(member(MemberKey::Public("v".into()), MemberKind::Accessor, false));
        class.declare(member(MemberKey::Public("v".into()), MemberKind::Accessor, false));

        assert_eq!(class.members().len(), 1);
    }

    #[test]
    fn static_and_instance_tables_are_separate() {
        let mut class = ClassScope::new(None);
        class.declare(member(MemberKey::Public("s".into()), MemberKind::Property, true));

        assert!(!class.reference(&MemberKey::Public("s".into()), false));
        assert!(class.reference(&MemberKey::Public("s".into()), true));
        assert!(class.reference_any(&MemberKey::Public("s".into())));
        assert_eq!(class.members()[0].references, 2);
    }

    #[test]
    fn display_name_keeps_hash() {
        assert_eq!(MemberKey::Private("x".into()).display_name(), "#x");
        assert_eq!(MemberKey::Public("x".into()).display_name(), "x");
    }

    #[test]
    fn member_visibility_predicates() {
        let mut m = member(MemberKey::Public("p".into()), MemberKind::Method, false);
        assert!(m.is_public());
        m.accessibility = Some(Accessibility::Private);
        assert!(m.is_private());
        m.accessibility = Some(Accessibility::Protected);
        assert!(m.is_protected());
        assert!(!m.is_public());
    }

    #[test]
    fn finds_enclosing_class_by_name() {
        let mut tree = ThisScopeTree::new();
        let outer = class_scope(&mut tree, "Outer", None);
        let function = tree.create_scope(
            ThisScopeKind::Function(FunctionScope {
                context: ThisContext::None,
            }),
            Some(outer),
            DUMMY_SP,
        );
        let inner = class_scope(&mut tree, "Inner", Some(function));

        assert_eq!(tree.find_class_named(inner, "Outer"), Some(outer));
        assert_eq!(tree.find_class_named(inner, "Inner"), Some(inner));
        assert_eq!(tree.find_class_named(function, "Inner"), None);
        assert_eq!(tree.get(outer).children, vec![function]);
    }

    #[test]
    fn finds_nearest_class_declaring_a_key() {
        let mut tree = ThisScopeTree::new();
        let outer = class_scope(&mut tree, "Outer", None);
        let inner = class_scope(&mut tree, "Inner", Some(outer));
        let key = MemberKey::Private("x".into());
        tree.class_mut(outer).unwrap().declare(member(key.clone(), MemberKind::Property, false));

        assert_eq!(tree.find_class_declaring(inner, &key), Some(outer));

        tree.class_mut(inner).unwrap().declare(member(key.clone(), MemberKind::Property, false));
        assert_eq!(tree.find_class_declaring(inner, &key), Some(inner));
    }
}
