//! Two-way identity maps between output nodes and native nodes.
//!
//! Native nodes are interned to dense [`NativeId`]s; output nodes already
//! carry dense [`NodeId`]s. Both directions are plain index tables.

use std::collections::HashMap;

use crate::ast::NodeId;
use crate::native::NativeKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(pub u32);

#[derive(Debug, Clone, Default)]
pub struct NodeMaps {
    interned: HashMap<NativeKey, NativeId>,
    natives: Vec<NativeKey>,
    es_to_native: Vec<Option<NativeId>>,
    native_to_es: Vec<Option<NodeId>>,
}

impl NodeMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, key: NativeKey) -> NativeId {
        if let Some(id) = self.interned.get(&key) {
            return *id;
        }
        let id = NativeId(self.natives.len() as u32);
        self.natives.push(key);
        self.native_to_es.push(None);
        self.interned.insert(key, id);
        id
    }

    /// Associates an output node with the native node it came from. The
    /// reverse direction keeps its first entry.
    pub fn record(&mut self, node: NodeId, native: NativeKey) {
        let native_id = self.intern(native);
        let index = node.0 as usize;
        if self.es_to_native.len() <= index {
            self.es_to_native.resize(index + 1, None);
        }
        self.es_to_native[index] = Some(native_id);
        let slot = &mut self.native_to_es[native_id.0 as usize];
        if slot.is_none() {
            *slot = Some(node);
        }
    }

    pub fn native_of(&self, node: NodeId) -> Option<NativeKey> {
        let id = (*self.es_to_native.get(node.0 as usize)?)?;
        self.natives.get(id.0 as usize).copied()
    }

    pub fn es_node_of(&self, native: &NativeKey) -> Option<NodeId> {
        let id = self.interned.get(native)?;
        self.native_to_es.get(id.0 as usize).copied().flatten()
    }

    pub fn native_id(&self, native: &NativeKey) -> Option<NativeId> {
        self.interned.get(native).copied()
    }

    pub fn native_key(&self, id: NativeId) -> Option<NativeKey> {
        self.natives.get(id.0 as usize).copied()
    }

    /// Number of output nodes with a recorded native origin.
    pub fn len(&self) -> usize {
        self.es_to_native.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn native_count(&self) -> usize {
        self.natives.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Range;
    use crate::native::NativeKind;

    fn key(kind: NativeKind, start: u32, end: u32) -> NativeKey {
        NativeKey::new(kind, Range(start, end))
    }

    #[test]
    fn interning_is_stable() {
        let mut maps = NodeMaps::new();
        let a = maps.intern(key(NativeKind::Ident, 0, 1));
        let b = maps.intern(key(NativeKind::Ident, 0, 1));
        assert_eq!(a, b);
        assert_eq!(maps.native_count(), 1);
    }

    #[test]
    fn reverse_map_keeps_first_writer() {
        let mut maps = NodeMaps::new();
        let decl = key(NativeKind::ClassDecl, 0, 20);
        maps.record(NodeId(5), decl);
        maps.record(NodeId(9), decl);

        assert_eq!(maps.es_node_of(&decl), Some(NodeId(5)));
        assert_eq!(maps.native_of(NodeId(9)), Some(decl));
        assert_eq!(maps.native_of(NodeId(5)), Some(decl));
        assert_eq!(maps.len(), 2);
    }

    #[test]
    fn unknown_lookups_are_none() {
        let maps = NodeMaps::new();
        assert_eq!(maps.native_of(NodeId(0)), None);
        assert_eq!(maps.es_node_of(&key(NativeKind::Ident, 0, 1)), None);
        assert!(maps.is_empty());
    }
}
