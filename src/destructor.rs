use alloc::boxed::Box;

/// Receives each payload as its node leaves the tree.
///
/// The tree calls [`destroy`](Destructor::destroy) exactly once per node, at the moment the node
/// is removed by [`delete`](crate::ByteTree::delete), [`remove`](crate::ByteTree::remove),
/// [`replace`](crate::ByteTree::replace), [`clear`](crate::ByteTree::clear), or when the tree is
/// dropped. It is never called for a node that is still reachable.
///
/// Any `FnMut(Box<[u8]>)` closure is a destructor.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use byte_tree::Builder;
///
/// let removed = RefCell::new(Vec::new());
/// let mut tree = Builder::new()
///     .destructor(|payload: Box<[u8]>| removed.borrow_mut().push(payload))
///     .build()
///     .unwrap();
///
/// tree.insert_new(b"a").unwrap();
/// tree.insert_new(b"b").unwrap();
/// assert!(tree.remove(b"a"));
/// drop(tree);
///
/// assert_eq!(removed.into_inner(), [Box::from(&b"a"[..]), Box::from(&b"b"[..])]);
/// ```
pub trait Destructor {
    /// Takes ownership of a payload removed from the tree.
    fn destroy(&mut self, data: Box<[u8]>);
}

impl<F> Destructor for F
where
    F: FnMut(Box<[u8]>),
{
    #[inline]
    fn destroy(&mut self, data: Box<[u8]>) {
        self(data);
    }
}

/// Frees payloads without further action. The default destructor.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NoDestructor;

impl Destructor for NoDestructor {
    #[inline]
    fn destroy(&mut self, data: Box<[u8]>) {
        drop(data);
    }
}
