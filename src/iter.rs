use crate::index::{IndexType, NodeIndex};
use crate::node::{Key, Node};
use crate::rbtree::RbTree;

/// Pushes a link of nodes on the left to stack.
fn left_link<Ix>(tree_ref: &RbTree<Ix>, mut x: NodeIndex<Ix>) -> Vec<NodeIndex<Ix>>
where
    Ix: IndexType,
{
    let mut nodes = vec![];
    while !tree_ref.node_ref(x, Node::is_sentinel) {
        nodes.push(x);
        x = tree_ref.node_ref(x, Node::left);
    }
    nodes
}

/// An iterator over the keys of a `RbTree`, in ascending order.
#[derive(Debug)]
pub struct Iter<'a, Ix> {
    /// Reference to the tree
    tree_ref: &'a RbTree<Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<'a, Ix> Iter<'a, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn new(tree_ref: &'a RbTree<Ix>) -> Self {
        Iter {
            tree_ref,
            stack: left_link(tree_ref, tree_ref.root),
        }
    }
}

impl<Ix> Iterator for Iter<'_, Ix>
where
    Ix: IndexType,
{
    type Item = Key;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.stack.is_empty() {
            return None;
        }
        let x = self.stack.pop().unwrap();
        self.stack.extend(left_link(
            self.tree_ref,
            self.tree_ref.node_ref(x, Node::right),
        ));
        Some(self.tree_ref.node_ref(x, Node::key))
    }
}

impl<'a, Ix> IntoIterator for &'a RbTree<Ix>
where
    Ix: IndexType,
{
    type Item = Key;
    type IntoIter = Iter<'a, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
