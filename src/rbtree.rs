use crate::error::Error;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::iter::Iter;
use crate::node::{Color, Key, Node};

/// An ordered multiset of integer keys backed by a red-black tree.
///
/// Nodes live in a vector arena and refer to each other by index, with
/// the sentinel at index zero standing in for every absent child and
/// the root's parent. Erased slots are recycled through a free list, so
/// a [`NodeIndex`] stays valid until the node it names is erased.
#[derive(Debug)]
pub struct RbTree<Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<Ix>>,
    /// Root of the tree
    pub(crate) root: NodeIndex<Ix>,
    /// Head of the free list threaded through vacant slots
    pub(crate) free_head: NodeIndex<Ix>,
    /// Number of keys in the tree
    pub(crate) len: usize,
}

impl<Ix> RbTree<Ix>
where
    Ix: IndexType,
{
    /// Creates a new `RbTree` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = vec![Self::new_sentinel()];
        nodes.reserve(capacity);
        RbTree {
            nodes,
            root: Self::sentinel(),
            free_head: Self::sentinel(),
            len: 0,
        }
    }

    /// Insert a key into the tree, returning the index of the new node.
    ///
    /// Duplicate keys are kept; each call creates its own node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeLimit`] when every slot addressable by the
    /// index width is occupied, and [`Error::Alloc`] when the arena
    /// fails to reserve storage. The tree is unchanged on error.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let first = tree.insert(17).unwrap();
    /// let second = tree.insert(17).unwrap();
    /// assert_ne!(first, second);
    /// assert_eq!(tree.len(), 2);
    /// ```
    #[inline]
    pub fn insert(&mut self, key: Key) -> Result<NodeIndex<Ix>, Error> {
        let z = self.allocate(key)?;
        self.insert_inner(z);
        Ok(z)
    }

    /// Erase the node at the given index, returning its key.
    ///
    /// The slot is recycled by later inserts; indices of other live
    /// nodes are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIndex`] when the index is out of bounds,
    /// names the sentinel, or names a slot that holds no live node.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let node = tree.insert(7).unwrap();
    /// assert_eq!(tree.erase(node), Ok(7));
    /// assert!(tree.erase(node).is_err());
    /// ```
    #[inline]
    pub fn erase(&mut self, node: NodeIndex<Ix>) -> Result<Key, Error> {
        if !self.is_live(node) {
            return Err(Error::InvalidIndex);
        }
        Ok(self.remove_at(node))
    }

    /// Remove one occurrence of the key, returning `true` if one was found.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let _ignore = tree.insert(4);
    /// assert!(tree.remove(4));
    /// assert!(!tree.remove(4));
    /// ```
    #[inline]
    pub fn remove(&mut self, key: Key) -> bool {
        match self.find(key) {
            Some(node) => {
                let _ignore = self.remove_at(node);
                true
            }
            None => false,
        }
    }

    /// Find a node holding the given key.
    ///
    /// When the key occurs more than once, the node closest to the root
    /// is returned.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// let node = tree.insert(11).unwrap();
    /// assert_eq!(tree.find(11), Some(node));
    /// assert_eq!(tree.find(12), None);
    /// ```
    #[inline]
    pub fn find(&self, key: Key) -> Option<NodeIndex<Ix>> {
        let mut x = self.root;
        while !self.node_ref(x, Node::is_sentinel) {
            if self.node_ref(x, Node::key) == key {
                return Some(x);
            }
            if key < self.node_ref(x, Node::key) {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        None
    }

    /// Check if the tree holds the given key.
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Return the key held by the node, or `None` if the index does not
    /// refer to a live node.
    #[inline]
    pub fn key(&self, node: NodeIndex<Ix>) -> Option<Key> {
        self.nodes.get(node.index()).and_then(|n| n.key)
    }

    /// Find the node with the minimum key, or `None` if the tree is empty.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// assert_eq!(tree.min(), None);
    /// for key in [5, 3, 9] {
    ///     let _ignore = tree.insert(key);
    /// }
    /// assert_eq!(tree.min().and_then(|n| tree.key(n)), Some(3));
    /// ```
    #[inline]
    pub fn min(&self) -> Option<NodeIndex<Ix>> {
        if self.node_ref(self.root, Node::is_sentinel) {
            return None;
        }
        Some(self.tree_minimum(self.root))
    }

    /// Find the node with the maximum key, or `None` if the tree is empty.
    #[inline]
    pub fn max(&self) -> Option<NodeIndex<Ix>> {
        if self.node_ref(self.root, Node::is_sentinel) {
            return None;
        }
        Some(self.tree_maximum(self.root))
    }

    /// Get an iterator over the keys of the tree, in ascending order.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, Ix> {
        Iter::new(self)
    }

    /// Collect the keys of the tree into a vector, in ascending order.
    #[inline]
    #[must_use]
    pub fn to_vec(&self) -> Vec<Key> {
        self.iter().collect()
    }

    /// Copy every key into the destination in ascending order, returning
    /// the number of keys written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] when the destination is too
    /// small; the destination is left untouched in that case.
    ///
    /// # Example
    /// ```rust
    /// use rb_key_tree::RbTree;
    ///
    /// let mut tree = RbTree::new();
    /// for key in [3, 1, 2] {
    ///     let _ignore = tree.insert(key);
    /// }
    /// let mut out = [0; 4];
    /// assert_eq!(tree.copy_into(&mut out), Ok(3));
    /// assert_eq!(out, [1, 2, 3, 0]);
    /// ```
    #[inline]
    pub fn copy_into(&self, dst: &mut [Key]) -> Result<usize, Error> {
        if self.len > dst.len() {
            return Err(Error::CapacityExceeded {
                len: self.len,
                capacity: dst.len(),
            });
        }
        for (slot, key) in dst.iter_mut().zip(self.iter()) {
            *slot = key;
        }
        Ok(self.len)
    }

    /// Remove all keys from the tree
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = Self::sentinel();
        self.free_head = Self::sentinel();
        self.len = 0;
    }

    /// Return the number of keys in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the tree contains no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RbTree {
    /// Create an empty `RbTree`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Self::new_sentinel()],
            root: Self::sentinel(),
            free_head: Self::sentinel(),
            len: 0,
        }
    }
}

impl Default for RbTree {
    #[inline]
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<Ix> RbTree<Ix>
where
    Ix: IndexType,
{
    /// Create a new sentinel node
    fn new_sentinel() -> Node<Ix> {
        Node {
            key: None,
            left: None,
            right: None,
            parent: None,
            color: Color::Black,
        }
    }

    /// Create a new tree node
    fn new_node(key: Key) -> Node<Ix> {
        Node {
            key: Some(key),
            left: Some(Self::sentinel()),
            right: Some(Self::sentinel()),
            parent: Some(Self::sentinel()),
            color: Color::Red,
        }
    }

    /// Get the sentinel node index
    fn sentinel() -> NodeIndex<Ix> {
        NodeIndex::new(0)
    }
}

impl<Ix> RbTree<Ix>
where
    Ix: IndexType,
{
    /// Link a detached node into the tree.
    fn insert_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = Self::sentinel();
        let mut x = self.root;

        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            if self.node_ref(z, Node::key) < self.node_ref(x, Node::key) {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        self.node_mut(z, Node::set_parent(y));
        if self.node_ref(y, Node::is_sentinel) {
            self.root = z;
        } else if self.node_ref(z, Node::key) < self.node_ref(y, Node::key) {
            self.node_mut(y, Node::set_left(z));
        } else {
            self.node_mut(y, Node::set_right(z));
        }
        self.node_mut(z, Node::set_color(Color::Red));

        self.insert_fixup(z);

        self.len = self.len.wrapping_add(1);
    }

    /// Unlink a node from the tree.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = z;
        let mut y_orig_color = self.node_ref(y, Node::color);
        let x;
        if self.left_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
        } else if self.right_ref(z, Node::is_sentinel) {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
        } else {
            y = self.tree_minimum(self.node_ref(z, Node::right));
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.right_mut(y, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.left_mut(y, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));
        }

        if matches!(y_orig_color, Color::Black) {
            self.remove_fixup(x);
        }

        self.len = self.len.wrapping_sub(1);
    }

    /// Unlink a live node and recycle its slot, returning its key.
    fn remove_at(&mut self, z: NodeIndex<Ix>) -> Key {
        let key = self.node_ref(z, Node::key);
        self.remove_inner(z);
        self.release(z);
        key
    }

    /// Take a slot for a new node, reusing the free list before growing
    /// the arena.
    fn allocate(&mut self, key: Key) -> Result<NodeIndex<Ix>, Error> {
        if self.free_head != Self::sentinel() {
            let slot = self.free_head;
            self.free_head = self.node_ref(slot, Node::parent);
            self.node_mut(slot, |n| *n = Self::new_node(key));
            return Ok(slot);
        }
        let node_idx = NodeIndex::new(self.nodes.len());
        if node_idx == NodeIndex::end() {
            return Err(Error::NodeLimit);
        }
        self.nodes.try_reserve(1)?;
        self.nodes.push(Self::new_node(key));
        Ok(node_idx)
    }

    /// Return a slot to the free list, chained through its parent field.
    fn release(&mut self, node: NodeIndex<Ix>) {
        let next = self.free_head;
        self.node_mut(node, |n| {
            *n = Node {
                key: None,
                left: None,
                right: None,
                parent: Some(next),
                color: Color::Black,
            };
        });
        self.free_head = node;
    }

    /// Check if an index refers to a live node.
    fn is_live(&self, node: NodeIndex<Ix>) -> bool {
        self.nodes.get(node.index()).is_some_and(|n| !n.is_sentinel())
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent_ref(z, Node::is_sentinel) {
                break;
            }
            if self.is_left_child(self.node_ref(z, Node::parent)) {
                let y = self.grand_parent_ref(z, Node::right);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_right_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.left_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.right_rotate(self.parent_ref(z, Node::parent));
                }
            } else {
                let y = self.grand_parent_ref(z, Node::left);
                if self.node_ref(y, Node::is_red) {
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.node_mut(y, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    z = self.parent_ref(z, Node::parent);
                } else {
                    if self.is_left_child(z) {
                        z = self.node_ref(z, Node::parent);
                        self.right_rotate(z);
                    }
                    self.parent_mut(z, Node::set_color(Color::Black));
                    self.grand_parent_mut(z, Node::set_color(Color::Red));
                    self.left_rotate(self.parent_ref(z, Node::parent));
                }
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let mut w;
            if self.is_left_child(x) {
                w = self.parent_ref(x, Node::right);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::right);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.left_ref(w, Node::is_black) && self.right_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.right_ref(w, Node::is_black) {
                        self.left_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.right_rotate(w);
                        w = self.parent_ref(x, Node::right);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.right_mut(w, Node::set_color(Color::Black));
                    self.left_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            } else {
                w = self.parent_ref(x, Node::left);
                if self.node_ref(w, Node::is_red) {
                    self.node_mut(w, Node::set_color(Color::Black));
                    self.parent_mut(x, Node::set_color(Color::Red));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    w = self.parent_ref(x, Node::left);
                }
                if self.node_ref(w, Node::is_sentinel) {
                    break;
                }
                if self.right_ref(w, Node::is_black) && self.left_ref(w, Node::is_black) {
                    self.node_mut(w, Node::set_color(Color::Red));
                    x = self.node_ref(x, Node::parent);
                } else {
                    if self.left_ref(w, Node::is_black) {
                        self.right_mut(w, Node::set_color(Color::Black));
                        self.node_mut(w, Node::set_color(Color::Red));
                        self.left_rotate(w);
                        w = self.parent_ref(x, Node::left);
                    }
                    self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                    self.parent_mut(x, Node::set_color(Color::Black));
                    self.left_mut(w, Node::set_color(Color::Black));
                    self.right_rotate(self.node_ref(x, Node::parent));
                    x = self.root;
                }
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.right_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::right);
        self.node_mut(x, Node::set_right(self.node_ref(y, Node::left)));
        if !self.left_ref(y, Node::is_sentinel) {
            self.left_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(x));
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) {
        if self.left_ref(x, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, Node::left);
        self.node_mut(x, Node::set_left(self.node_ref(y, Node::right)));
        if !self.right_ref(y, Node::is_sentinel) {
            self.right_mut(y, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(x));
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else if self.is_left_child(x) {
            self.parent_mut(x, Node::set_left(y));
        } else {
            self.parent_mut(x, Node::set_right(y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Find the node with the minimum key in a subtree.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.left_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Find the node with the maximum key in a subtree.
    fn tree_maximum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.right_ref(x, Node::is_sentinel) {
            x = self.node_ref(x, Node::right);
        }
        x
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.parent_ref(u, Node::is_sentinel) {
            self.root = v;
        } else if self.is_left_child(u) {
            self.parent_mut(u, Node::set_left(v));
        } else {
            self.parent_mut(u, Node::set_right(v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    /// Check if a node is a left child of its parent.
    fn is_left_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::left) == node
    }

    /// Check if a node is a right child of its parent.
    fn is_right_child(&self, node: NodeIndex<Ix>) -> bool {
        self.parent_ref(node, Node::right) == node
    }
}

// Convenient methods for reference or mutate current/parent/left/right node
impl<'a, Ix> RbTree<Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    pub(crate) fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    pub(crate) fn left_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&self.nodes[idx])
    }

    pub(crate) fn right_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&self.nodes[idx])
    }

    pub(crate) fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn left_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].left().index();
        op(&mut self.nodes[idx])
    }

    fn right_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].right().index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }
}
