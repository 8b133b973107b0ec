use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;
use super::stack::{Growth, Stack};
use crate::slot::Side;

/// In-order walk state kept on an explicit stack instead of the call stack.
///
/// The stack holds the ancestors whose own payload and far subtree are still pending. The top
/// of the stack is always the next node in walk order.
#[derive(Clone, Debug)]
pub(crate) struct Cursor {
    stack: Stack<Handle>,
    near: Side,
}

impl Cursor {
    pub(crate) fn new(nodes: &Arena<Node>, root: Option<Handle>, reverse: bool, growth: Growth) -> Self {
        let mut cursor = Self {
            stack: Stack::with_growth(growth),
            near: Side::near(reverse),
        };
        cursor.enter(nodes, root);
        cursor
    }

    /// Pushes `from` and its chain of near children.
    fn enter(&mut self, nodes: &Arena<Node>, mut from: Option<Handle>) {
        while let Some(handle) = from {
            self.stack.push(handle);
            from = nodes.get(handle).child(self.near);
        }
    }

    /// Yields the next node in walk order, priming the stack from its far subtree.
    pub(crate) fn next(&mut self, nodes: &Arena<Node>) -> Option<Handle> {
        let handle = self.stack.pop()?;
        self.enter(nodes, nodes.get(handle).child(self.near.opposite()));
        Some(handle)
    }

    /// Number of ancestors still waiting on the stack.
    pub(crate) fn pending(&self) -> usize {
        self.stack.len()
    }
}
