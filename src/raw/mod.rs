mod arena;
mod cursor;
mod handle;
mod node;
mod raw_byte_tree;
mod stack;

pub(crate) use arena::Arena;
pub(crate) use cursor::Cursor;
pub(crate) use handle::Handle;
pub(crate) use node::Node;
pub(crate) use raw_byte_tree::RawByteTree;
pub(crate) use stack::Growth;
