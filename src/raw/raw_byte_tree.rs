use core::ops::ControlFlow;

use super::arena::Arena;
use super::cursor::Cursor;
use super::handle::Handle;
use super::node::{Node, copy_payload};
use super::stack::{Growth, Stack};
use crate::compare::Comparator;
use crate::destructor::Destructor;
use crate::error::Result;
use crate::slot::{Side, Slot};
use crate::tracing_helpers::{debug_log, trace_log, warn_log};

/// The unbalanced binary search tree backing `ByteTree`.
///
/// Every node lives in `nodes`; child links and the root link are handles into it, so each node
/// has exactly one owner (its parent's link or `root`).
pub(crate) struct RawByteTree<C, D: Destructor> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of nodes reachable from `root`.
    len: usize,
    compare: C,
    destroy: D,
    /// Capacity policy for traversal stacks.
    growth: Growth,
}

impl<C, D: Destructor> RawByteTree<C, D> {
    pub(crate) const fn new(compare: C, destroy: D, growth: Growth) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            compare,
            destroy,
            growth,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        self.nodes.try_reserve(additional)
    }

    pub(crate) fn nodes(&self) -> &Arena<Node> {
        &self.nodes
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) const fn growth(&self) -> Growth {
        self.growth
    }

    /// The node currently held by `slot`, if any.
    #[inline]
    pub(crate) fn target(&self, slot: Slot) -> Option<Handle> {
        match slot.link() {
            None => self.root,
            Some((parent, side)) => self.nodes.get(parent).child(side),
        }
    }

    /// Points `slot` at `node`; `len` is the caller's business.
    fn set_target(&mut self, slot: Slot, node: Option<Handle>) {
        match slot.link() {
            None => self.root = node,
            Some((parent, side)) => self.nodes.get_mut(parent).set_child(side, node),
        }
    }

    pub(crate) fn data_at(&self, slot: Slot) -> Option<&[u8]> {
        self.target(slot).map(|h| self.nodes.get(h).data())
    }

    pub(crate) fn data_at_mut(&mut self, slot: Slot) -> Option<&mut [u8]> {
        let handle = self.target(slot)?;
        Some(self.nodes.get_mut(handle).data_mut())
    }

    /// The slot at the end of the all-`side` chain from the root.
    fn extreme(&self, side: Side) -> Option<Slot> {
        let mut current = self.root?;
        let mut slot = Slot::ROOT;
        while let Some(next) = self.nodes.get(current).child(side) {
            slot = Slot::child_of(current, side);
            current = next;
        }
        Some(slot)
    }

    pub(crate) fn min_slot(&self) -> Option<Slot> {
        self.extreme(Side::Left)
    }

    pub(crate) fn max_slot(&self) -> Option<Slot> {
        self.extreme(Side::Right)
    }

    /// Visits every payload in order until `f` breaks.
    pub(crate) fn each<'a, B, F>(&'a self, mut f: F) -> Option<B>
    where
        F: FnMut(&'a [u8]) -> ControlFlow<B>,
    {
        let mut cursor = Cursor::new(&self.nodes, self.root, false, self.growth);
        while let Some(handle) = cursor.next(&self.nodes) {
            if let ControlFlow::Break(value) = f(self.nodes.get(handle).data()) {
                return Some(value);
            }
        }
        None
    }

    /// Length of the longest root-to-leaf path, counted in nodes.
    pub(crate) fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Stack<(Handle, usize)> = Stack::with_growth(self.growth);
        if let Some(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((handle, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = self.nodes.get(handle);
            for side in [Side::Left, Side::Right] {
                if let Some(child) = node.child(side) {
                    stack.push((child, depth + 1));
                }
            }
        }
        deepest
    }

    /// Frees one detached node, handing its payload to the destructor.
    fn destroy_node(&mut self, handle: Handle) {
        let node = self.nodes.take(handle);
        self.destroy.destroy(node.into_data());
    }

    /// Destroys the detached subtree under `root`, children before parents.
    ///
    /// Returns the number of nodes destroyed.
    fn prune(&mut self, root: Handle) -> usize {
        let mut destroyed = 0;
        let mut stack = Stack::with_growth(self.growth);
        stack.push(root);
        while let Some(handle) = stack.pop() {
            let node = self.nodes.get_mut(handle);
            if node.is_leaf() {
                self.destroy_node(handle);
                destroyed += 1;
                continue;
            }
            // Revisit this node once both subtrees are gone; the left one goes first.
            let [left, right] = node.take_children();
            stack.push(handle);
            for child in [right, left].into_iter().flatten() {
                stack.push(child);
            }
        }
        destroyed
    }

    pub(crate) fn clear(&mut self) {
        debug_log!(len = self.len, "clearing tree");
        if let Some(root) = self.root.take() {
            self.prune(root);
        }
        self.nodes.clear();
        self.len = 0;
    }
}

impl<C: Comparator, D: Destructor> RawByteTree<C, D> {
    /// Finds the slot holding the node that compares equal to `key`, or the empty slot where it
    /// belongs.
    pub(crate) fn find(&self, key: &[u8]) -> Slot {
        let mut slot = Slot::ROOT;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match Side::toward(self.compare.compare(key, node.data())) {
                None => return slot,
                Some(side) => {
                    slot = Slot::child_of(handle, side);
                    current = node.child(side);
                }
            }
        }
        slot
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.data_at(self.find(key))
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        let slot = self.find(key);
        self.data_at_mut(slot)
    }

    /// Attaches a copy of `data` at the empty `slot`.
    fn attach_new(&mut self, slot: Slot, data: &[u8]) -> Result<()> {
        let handle = self.nodes.try_alloc(Node::new(copy_payload(data)?))?;
        self.set_target(slot, Some(handle));
        self.len += 1;
        Ok(())
    }

    /// Inserts a copy of `data` unless a node with an equal key exists.
    ///
    /// Returns the slot holding the (new or existing) node and whether it is new.
    pub(crate) fn insert(&mut self, data: &[u8]) -> Result<(Slot, bool)> {
        let slot = self.find(data);
        if self.target(slot).is_some() {
            trace_log!(len = data.len(), "insert rejected, key present");
            return Ok((slot, false));
        }
        self.attach_new(slot, data)?;
        trace_log!(len = data.len(), size = self.len, "inserted node");
        Ok((slot, true))
    }

    /// Inserts `data`, overwriting the payload of an existing node with an equal key.
    ///
    /// The replaced node keeps its position and both subtrees. Returns whether a node was
    /// replaced.
    pub(crate) fn replace(&mut self, data: &[u8]) -> Result<bool> {
        let slot = self.find(data);
        let Some(handle) = self.target(slot) else {
            self.attach_new(slot, data)?;
            trace_log!(len = data.len(), size = self.len, "replace inserted node");
            return Ok(false);
        };
        // Copy first so a failed allocation leaves the old payload in place.
        let fresh = copy_payload(data)?;
        let old = self.nodes.get_mut(handle).replace_data(fresh);
        self.destroy.destroy(old);
        trace_log!(len = data.len(), "replaced node");
        Ok(true)
    }

    /// Removes the node held by `slot`, re-inserting its two subtrees whole from the root.
    pub(crate) fn delete(&mut self, slot: Slot) -> bool {
        let Some(handle) = self.target(slot) else {
            return false;
        };
        let [left, right] = self.nodes.get_mut(handle).take_children();
        self.set_target(slot, None);
        self.destroy_node(handle);
        self.len -= 1;
        for subtree in [left, right].into_iter().flatten() {
            self.reattach(subtree);
        }
        trace_log!(size = self.len, "deleted node");
        true
    }

    pub(crate) fn remove(&mut self, key: &[u8]) -> bool {
        self.delete(self.find(key))
    }

    /// Hangs a detached subtree back into the tree at the slot its root's key belongs in.
    fn reattach(&mut self, subtree: Handle) {
        let slot = self.find(self.nodes.get(subtree).data());
        if self.target(slot).is_none() {
            self.set_target(slot, Some(subtree));
            return;
        }
        // Only reachable when the comparator is not a consistent total order.
        let lost = self.prune(subtree);
        warn_log!(lost, "subtree root collided with an existing key during delete; subtree dropped");
        self.len -= lost;
    }
}

impl<C, D: Destructor> Drop for RawByteTree<C, D> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::compare::{Lexicographic, UntilByte};
    use crate::destructor::NoDestructor;
    use crate::error::Error;
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use proptest::prelude::*;

    impl<C: Comparator, D: Destructor> RawByteTree<C, D> {
        /// Checks ordering, ownership, and size bookkeeping. Panics on the first violation.
        pub(crate) fn validate_invariants(&self) {
            let mut seen = alloc::vec![false; Arena::<Node>::MAX_LEN];
            let mut reachable = 0;
            let mut stack: Vec<Handle> = self.root.into_iter().collect();
            while let Some(handle) = stack.pop() {
                assert!(!seen[handle.to_index()], "node {handle:?} reachable twice");
                seen[handle.to_index()] = true;
                reachable += 1;
                let node = self.nodes.get(handle);
                for side in [Side::Left, Side::Right] {
                    if let Some(child) = node.child(side) {
                        stack.push(child);
                    }
                }
            }
            assert_eq!(reachable, self.len, "len does not match reachable nodes");
            assert_eq!(self.nodes.len(), self.len, "arena holds unreachable nodes");

            let mut in_order: Vec<&[u8]> = Vec::new();
            self.each(|data| {
                in_order.push(data);
                ControlFlow::<()>::Continue(())
            });
            for pair in in_order.windows(2) {
                assert_eq!(
                    self.compare.compare(pair[0], pair[1]),
                    core::cmp::Ordering::Less,
                    "in-order walk not strictly increasing"
                );
            }
        }
    }

    type KvTree<D> = RawByteTree<Lexicographic<UntilByte>, D>;

    fn kv_tree() -> KvTree<NoDestructor> {
        RawByteTree::new(Lexicographic::with_key_len(UntilByte(b'=')), NoDestructor, Growth::DEFAULT)
    }

    fn collect<C, D: Destructor>(tree: &RawByteTree<C, D>) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        tree.each(|data| {
            out.push(data.to_vec());
            ControlFlow::<()>::Continue(())
        });
        out
    }

    fn payload(key: &[u8], value: &[u8]) -> Vec<u8> {
        let mut out = key.to_vec();
        out.push(b'=');
        out.extend_from_slice(value);
        out
    }

    #[test]
    fn find_returns_empty_slot_for_missing_key() {
        let mut tree = kv_tree();
        assert_eq!(tree.find(b"m"), Slot::ROOT);
        tree.insert(b"m=1").unwrap();
        let slot = tree.find(b"a");
        assert_eq!(slot.side(), Some(Side::Left));
        assert!(tree.target(slot).is_none());
        assert_eq!(tree.data_at(tree.find(b"m")), Some(&b"m=1"[..]));
    }

    #[test]
    fn delete_reinserts_subtrees_whole() {
        // m is the root with l and r subtrees; deleting m makes the left subtree's root the new
        // root and hangs the right subtree beneath it.
        let mut tree = kv_tree();
        for key in [b"m", b"f", b"t", b"c", b"h", b"p", b"w"] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.depth(), 3);
        assert!(tree.remove(b"m"));
        tree.validate_invariants();

        let root = tree.root().unwrap();
        assert_eq!(tree.nodes.get(root).data(), b"f");
        let h = tree.target(tree.find(b"h")).unwrap();
        assert_eq!(tree.find(b"t").link(), Some((h, Side::Right)));
        // t's subtree moved as a unit under h.
        assert_eq!(tree.depth(), 4);
        assert_eq!(collect(&tree), [&b"c"[..], b"f", b"h", b"p", b"t", b"w"]);
    }

    #[test]
    fn replace_keeps_subtrees() {
        let mut tree = kv_tree();
        for data in [&b"m=1"[..], b"f=2", b"t=3"] {
            tree.insert(data).unwrap();
        }
        let depth = tree.depth();
        assert!(tree.replace(b"m=changed").unwrap());
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.depth(), depth);
        assert_eq!(tree.get(b"m"), Some(&b"m=changed"[..]));
        assert!(tree.min_slot().is_some_and(|s| tree.data_at(s) == Some(&b"f=2"[..])));
        tree.validate_invariants();
    }

    #[test]
    fn min_max_on_empty_tree() {
        let tree = kv_tree();
        assert_eq!(tree.min_slot(), None);
        assert_eq!(tree.max_slot(), None);
        assert_eq!(tree.depth(), 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn each_stops_at_first_break() {
        let mut tree = kv_tree();
        for key in [b"d", b"b", b"a", b"c", b"e"] {
            tree.insert(key).unwrap();
        }
        let mut visited = 0;
        let found = tree.each(|data| {
            visited += 1;
            if data == b"c" { ControlFlow::Break(data.to_vec()) } else { ControlFlow::Continue(()) }
        });
        assert_eq!(found.as_deref(), Some(&b"c"[..]));
        assert_eq!(visited, 3);
    }

    #[test]
    fn clear_destroys_children_before_parents() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut tree = RawByteTree::new(
            Lexicographic::new(),
            move |data: Box<[u8]>| sink.borrow_mut().push(data.to_vec()),
            Growth::DEFAULT,
        );
        for key in [b"d", b"b", b"f", b"a", b"c", b"e", b"g"] {
            tree.insert(key).unwrap();
        }
        tree.clear();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(*log.borrow(), [&b"a"[..], b"c", b"b", b"e", b"g", b"f", b"d"]);
    }

    #[test]
    fn inconsistent_comparator_keeps_len_honest() {
        // Flips its answer after a few calls, so re-insertion during delete can collide.
        let calls = core::cell::Cell::new(0u32);
        let flaky = |a: &[u8], b: &[u8]| {
            calls.set(calls.get() + 1);
            if calls.get() > 2 { core::cmp::Ordering::Equal } else { a.cmp(b) }
        };
        let mut tree = RawByteTree::new(flaky, NoDestructor, Growth::DEFAULT);
        for key in [b"b", b"a", b"c"] {
            tree.insert(key).unwrap();
        }
        assert!(tree.delete(Slot::ROOT));
        // The right subtree collided with the new root and was dropped whole.
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes.len(), tree.len());
    }

    #[test]
    fn full_tree_rejects_new_nodes_unchanged() {
        // Two key bytes, one value byte. Handles are 16 bits wide under test.
        let key_prefix = |_: &[u8]| 2usize;
        let mut tree = RawByteTree::new(Lexicographic::with_key_len(key_prefix), NoDestructor, Growth::DEFAULT);
        let full = Arena::<Node>::MAX_LEN;
        // Bit-reversed order keeps the tree shallow.
        for i in 0..u16::try_from(full).unwrap() {
            let [hi, lo] = i.reverse_bits().to_be_bytes();
            assert!(tree.insert(&[hi, lo, 0]).unwrap().1);
        }
        assert_eq!(tree.len(), full);

        // 0xffff is the one key not yet present.
        assert_eq!(tree.insert(&[0xff, 0xff, 0]), Err(Error::CapacityExceeded { max: full }));
        assert_eq!(tree.replace(&[0xff, 0xff, 0]), Err(Error::CapacityExceeded { max: full }));
        assert!(tree.target(tree.find(&[0xff, 0xff])).is_none());
        assert_eq!(tree.len(), full);
        tree.validate_invariants();

        // Overwriting needs no new node.
        assert!(tree.replace(&[0x12, 0x34, 9]).unwrap());
        assert_eq!(tree.get(&[0x12, 0x34]), Some(&[0x12, 0x34, 9][..]));
        assert!(!tree.insert(&[0x12, 0x34, 1]).unwrap().1);

        // Deleting frees a handle for the next insert.
        assert!(tree.remove(&[0x00, 0x00]));
        assert!(tree.insert(&[0xff, 0xff, 0]).unwrap().1);
        assert_eq!(tree.len(), full);
        tree.validate_invariants();
    }

    #[derive(Clone, Debug)]
    enum Op {
        InsertNew(Vec<u8>, Vec<u8>),
        Replace(Vec<u8>, Vec<u8>),
        Remove(Vec<u8>),
        DeleteMin,
        DeleteMax,
        Get(Vec<u8>),
        Clear,
    }

    fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(b'a'..=b'e', 0..4)
    }

    fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(any::<u8>(), 0..4)
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            8 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Op::InsertNew(k, v)),
            3 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Op::Replace(k, v)),
            4 => key_strategy().prop_map(Op::Remove),
            1 => Just(Op::DeleteMin),
            1 => Just(Op::DeleteMax),
            2 => key_strategy().prop_map(Op::Get),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tree_matches_btreemap(ops in prop::collection::vec(op_strategy(), 0..300)) {
            let destroyed = Rc::new(RefCell::new(0usize));
            let counter = Rc::clone(&destroyed);
            let mut tree = RawByteTree::new(
                Lexicographic::with_key_len(UntilByte(b'=')),
                move |_: Box<[u8]>| *counter.borrow_mut() += 1,
                Growth::new(2, 1),
            );
            let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
            let mut created = 0usize;

            for op in &ops {
                match op {
                    Op::InsertNew(k, v) => {
                        let (slot, is_new) = tree.insert(&payload(k, v)).unwrap();
                        prop_assert_eq!(is_new, !model.contains_key(k));
                        if is_new {
                            created += 1;
                        }
                        let stored = payload(k, model.entry(k.clone()).or_insert_with(|| v.clone()));
                        prop_assert_eq!(tree.data_at(slot), Some(stored.as_slice()));
                    }
                    Op::Replace(k, v) => {
                        let replaced = tree.replace(&payload(k, v)).unwrap();
                        created += 1;
                        prop_assert_eq!(replaced, model.insert(k.clone(), v.clone()).is_some());
                    }
                    Op::Remove(k) => {
                        prop_assert_eq!(tree.remove(k), model.remove(k).is_some());
                        prop_assert!(tree.target(tree.find(k)).is_none());
                    }
                    Op::DeleteMin => {
                        let slot = tree.min_slot();
                        prop_assert_eq!(slot.is_some(), model.pop_first().is_some());
                        if let Some(slot) = slot {
                            prop_assert!(tree.delete(slot));
                        }
                    }
                    Op::DeleteMax => {
                        let slot = tree.max_slot();
                        prop_assert_eq!(slot.is_some(), model.pop_last().is_some());
                        if let Some(slot) = slot {
                            prop_assert!(tree.delete(slot));
                        }
                    }
                    Op::Get(k) => {
                        let expected = model.get(k).map(|v| payload(k, v));
                        prop_assert_eq!(tree.get(k).map(<[u8]>::to_vec), expected);
                    }
                    Op::Clear => {
                        tree.clear();
                        model.clear();
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(*destroyed.borrow(), created - tree.len());
            }

            let expected: Vec<Vec<u8>> = model.iter().map(|(k, v)| payload(k, v)).collect();
            prop_assert_eq!(collect(&tree), expected);
            drop(tree);
            prop_assert_eq!(*destroyed.borrow(), created);
        }
    }
}
