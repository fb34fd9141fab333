use crate::index::{IndexType, NodeIndex};

/// Key stored by the tree.
pub type Key = i32;

/// Node of the red-black tree.
///
/// A slot whose `key` is `None` is either the sentinel at index zero or
/// a vacant slot waiting on the free list; the `parent` field of a
/// vacant slot chains to the next free slot.
#[derive(Debug)]
pub struct Node<Ix> {
    /// Left child
    pub left: Option<NodeIndex<Ix>>,
    /// Right child
    pub right: Option<NodeIndex<Ix>>,
    /// Parent
    pub parent: Option<NodeIndex<Ix>>,
    /// Color of the node
    pub color: Color,

    /// Key of the node
    pub key: Option<Key>,
}

// Convenient getter/setter methods
impl<Ix> Node<Ix>
where
    Ix: IndexType,
{
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn key(&self) -> Key {
        self.key.unwrap()
    }

    pub fn left(&self) -> NodeIndex<Ix> {
        self.left.unwrap()
    }

    pub fn right(&self) -> NodeIndex<Ix> {
        self.right.unwrap()
    }

    pub fn parent(&self) -> NodeIndex<Ix> {
        self.parent.unwrap()
    }

    pub fn is_sentinel(&self) -> bool {
        self.key.is_none()
    }

    pub fn is_black(&self) -> bool {
        matches!(self.color, Color::Black)
    }

    pub fn is_red(&self) -> bool {
        matches!(self.color, Color::Red)
    }

    pub fn set_color(color: Color) -> impl FnOnce(&mut Node<Ix>) {
        move |node: &mut Node<Ix>| {
            node.color = color;
        }
    }

    pub fn set_left(left: NodeIndex<Ix>) -> impl FnOnce(&mut Node<Ix>) {
        move |node: &mut Node<Ix>| {
            let _ignore = node.left.replace(left);
        }
    }

    pub fn set_right(right: NodeIndex<Ix>) -> impl FnOnce(&mut Node<Ix>) {
        move |node: &mut Node<Ix>| {
            let _ignore = node.right.replace(right);
        }
    }

    pub fn set_parent(parent: NodeIndex<Ix>) -> impl FnOnce(&mut Node<Ix>) {
        move |node: &mut Node<Ix>| {
            let _ignore = node.parent.replace(parent);
        }
    }
}

/// The color of the node
#[derive(Debug, Clone, Copy)]
pub enum Color {
    /// Red node
    Red,
    /// Black node
    Black,
}
