use std::collections::HashSet;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;
use crate::node::{Color, Node};

struct KeyGenerator {
    rng: StdRng,
    unique: HashSet<Key>,
    limit: i32,
}

impl KeyGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 100_000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> Key {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> Key {
        let mut key = self.next();
        while self.unique.contains(&key) {
            key = self.next();
        }
        self.unique.insert(key);
        key
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl RbTree {
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    fn check_rb_properties(&self) {
        assert!(matches!(
            self.node_ref(self.root, Node::color),
            Color::Black
        ));
        self.check_children_color(self.root);
        self.check_black_height(self.root);
    }

    fn check_children_color(&self, x: NodeIndex<u32>) {
        if self.node_ref(x, Node::is_sentinel) {
            return;
        }
        self.check_children_color(self.node_ref(x, Node::left));
        self.check_children_color(self.node_ref(x, Node::right));
        if self.node_ref(x, Node::is_red) {
            assert!(matches!(self.left_ref(x, Node::color), Color::Black));
            assert!(matches!(self.right_ref(x, Node::color), Color::Black));
        }
    }

    fn check_black_height(&self, x: NodeIndex<u32>) -> usize {
        if self.node_ref(x, Node::is_sentinel) {
            return 0;
        }
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }

    fn check_links(&self) {
        if self.node_ref(self.root, Node::is_sentinel) {
            return;
        }
        assert!(self.parent_ref(self.root, Node::is_sentinel));
        self.check_links_inner(self.root);
    }

    fn check_links_inner(&self, x: NodeIndex<u32>) {
        if !self.left_ref(x, Node::is_sentinel) {
            assert_eq!(self.left_ref(x, Node::parent), x);
            self.check_links_inner(self.node_ref(x, Node::left));
        }
        if !self.right_ref(x, Node::is_sentinel) {
            assert_eq!(self.right_ref(x, Node::parent), x);
            self.check_links_inner(self.node_ref(x, Node::right));
        }
    }

    fn check_sorted(&self) {
        let keys = self.to_vec();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(keys.len(), self.len());
    }
}

fn with_tree_and_generator(test_fn: impl Fn(RbTree, KeyGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = KeyGenerator::new(seed);
        let tree = RbTree::new();
        test_fn(tree, gen);
    }
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys {
            let _ignore = tree.insert(key);
        }
        tree.check_rb_properties();
        tree.check_links();
        tree.check_sorted();
    });
}

#[test]
fn properties_hold_after_each_insert_and_remove() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
            tree.check_rb_properties();
        }
        tree.check_links();
        tree.check_sorted();
        gen.shuffle(&mut keys);
        for key in keys {
            assert!(tree.remove(key));
            tree.check_rb_properties();
        }
        assert!(tree.is_empty());
    });
}

#[test]
fn tree_len_will_update() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        assert_eq!(tree.len(), 100);
        for key in keys.iter().copied() {
            assert!(tree.remove(key));
        }
        assert_eq!(tree.len(), 0);

        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        for key in keys.into_iter().rev() {
            assert!(tree.remove(key));
        }
        assert_eq!(tree.len(), 0);
        assert!(tree.node_ref(tree.root, Node::is_sentinel));
        assert!(tree.to_vec().is_empty());
    });
}

#[test]
fn find_reports_present_and_absent_keys() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        let inserted: HashSet<_> = keys.into_iter().collect();
        let probes: Vec<_> = std::iter::repeat_with(|| gen.next()).take(1000).collect();
        for probe in probes {
            assert_eq!(tree.contains(probe), inserted.contains(&probe));
            match tree.find(probe) {
                Some(node) => assert_eq!(tree.key(node), Some(probe)),
                None => assert!(!inserted.contains(&probe)),
            }
        }
    });
}

#[test]
fn remove_non_exist_key_will_do_nothing() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys {
            let _ignore = tree.insert(key);
        }
        assert_eq!(tree.len(), 1000);
        let absent: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in absent {
            assert!(!tree.remove(key));
        }
        assert_eq!(tree.len(), 1000);
    });
}

#[test]
fn iterate_through_tree_is_sorted() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        keys.sort_unstable();
        for (got, expect) in tree.iter().zip(keys.iter()) {
            assert_eq!(got, *expect);
        }
        assert_eq!(tree.iter().count(), keys.len());

        let mut looped = Vec::new();
        for key in &tree {
            looped.push(key);
        }
        assert_eq!(looped, keys);
        assert_eq!(tree.to_vec(), keys);
    });
}

#[test]
fn min_and_max_follow_the_key_range() {
    with_tree_and_generator(|mut tree, mut gen| {
        assert_eq!(tree.min(), None);
        assert_eq!(tree.max(), None);
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        let lowest = keys.iter().copied().min().unwrap();
        let highest = keys.iter().copied().max().unwrap();
        assert_eq!(tree.min().and_then(|n| tree.key(n)), Some(lowest));
        assert_eq!(tree.max().and_then(|n| tree.key(n)), Some(highest));

        assert!(tree.remove(lowest));
        assert!(tree.remove(highest));
        let second_lowest = keys.iter().copied().filter(|&k| k != lowest).min();
        let second_highest = keys.iter().copied().filter(|&k| k != highest).max();
        assert_eq!(tree.min().and_then(|n| tree.key(n)), second_lowest);
        assert_eq!(tree.max().and_then(|n| tree.key(n)), second_highest);
    });
}

#[test]
fn duplicate_keys_are_all_kept() {
    let mut tree = RbTree::new();
    let mut handles = Vec::new();
    for _ in 0..5 {
        handles.push(tree.insert(42).unwrap());
    }
    let _ignore = tree.insert(41);
    let _ignore = tree.insert(43);
    assert_eq!(tree.len(), 7);
    assert_eq!(tree.to_vec(), vec![41, 42, 42, 42, 42, 42, 43]);
    tree.check_rb_properties();

    for node in handles {
        assert_eq!(tree.erase(node), Ok(42));
    }
    assert_eq!(tree.to_vec(), vec![41, 43]);
    assert!(!tree.contains(42));
}

#[test]
fn erase_rejects_indices_without_a_live_node() {
    let mut tree = RbTree::new();
    let node = tree.insert(3).unwrap();
    assert_eq!(tree.erase(NodeIndex::new(0)), Err(Error::InvalidIndex));
    assert_eq!(tree.erase(NodeIndex::new(17)), Err(Error::InvalidIndex));
    assert_eq!(tree.erase(node), Ok(3));
    assert_eq!(tree.erase(node), Err(Error::InvalidIndex));
    assert!(tree.is_empty());
}

#[test]
fn handles_stay_valid_across_other_removals() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(500)
            .collect();
        let mut handles: Vec<_> = keys
            .into_iter()
            .map(|key| (tree.insert(key).unwrap(), key))
            .collect();
        gen.shuffle(&mut handles);

        let mut fresh = Vec::new();
        for (i, (node, key)) in handles.into_iter().enumerate() {
            assert_eq!(tree.key(node), Some(key));
            assert_eq!(tree.erase(node), Ok(key));
            if i % 50 == 0 {
                let key = gen.next_unique();
                fresh.push((tree.insert(key).unwrap(), key));
            }
        }
        for (node, key) in fresh {
            assert_eq!(tree.erase(node), Ok(key));
        }
        assert!(tree.is_empty());
    });
}

#[test]
fn erased_slots_are_recycled() {
    let mut tree = RbTree::new();
    let handles: Vec<_> = (0..8).map(|key| tree.insert(key).unwrap()).collect();
    assert_eq!(tree.nodes.len(), 9);
    for node in handles.iter().take(4) {
        let _ignore = tree.erase(*node);
    }
    for key in 8..12 {
        let _ignore = tree.insert(key);
    }
    assert_eq!(tree.nodes.len(), 9);
    assert_eq!(tree.to_vec(), vec![4, 5, 6, 7, 8, 9, 10, 11]);
    tree.check_rb_properties();
    tree.check_links();
}

#[test]
fn node_limit_is_reported_for_narrow_indices() {
    let mut tree = RbTree::<u8>::with_capacity(0);
    for key in 0..254 {
        assert!(tree.insert(key).is_ok());
    }
    assert_eq!(tree.insert(254), Err(Error::NodeLimit));
    assert!(tree.remove(0));
    let node = tree.insert(254).unwrap();
    assert_eq!(tree.key(node), Some(254));
    assert_eq!(tree.insert(255), Err(Error::NodeLimit));
    assert_eq!(tree.len(), 254);
}

#[test]
fn copy_into_checks_destination_capacity() {
    let mut tree = RbTree::new();
    for key in [10, 20, 30, 15, 25, 5] {
        let _ignore = tree.insert(key);
    }

    let mut small = [-1; 5];
    assert_eq!(
        tree.copy_into(&mut small),
        Err(Error::CapacityExceeded {
            len: 6,
            capacity: 5
        })
    );
    assert_eq!(small, [-1; 5]);

    let mut exact = [0; 6];
    assert_eq!(tree.copy_into(&mut exact), Ok(6));
    assert_eq!(exact, [5, 10, 15, 20, 25, 30]);

    let mut wide = [-1; 8];
    assert_eq!(tree.copy_into(&mut wide), Ok(6));
    assert_eq!(wide, [5, 10, 15, 20, 25, 30, -1, -1]);
}

#[test]
fn copy_into_matches_iteration_order() {
    with_tree_and_generator(|mut tree, mut gen| {
        let keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for key in keys {
            let _ignore = tree.insert(key);
        }
        let mut out = vec![0; tree.len()];
        assert_eq!(tree.copy_into(&mut out), Ok(tree.len()));
        assert_eq!(out, tree.to_vec());
    });
}

#[test]
fn remove_of_known_key_keeps_order() {
    let mut tree = RbTree::new();
    for key in [10, 20, 30, 15, 25, 5] {
        let _ignore = tree.insert(key);
    }
    assert_eq!(tree.to_vec(), vec![5, 10, 15, 20, 25, 30]);
    let node = tree.find(20).unwrap();
    assert_eq!(tree.erase(node), Ok(20));
    assert_eq!(tree.to_vec(), vec![5, 10, 15, 25, 30]);
    tree.check_rb_properties();
    tree.check_links();
}

#[test]
fn drain_by_extremes_empties_the_tree() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut keys: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(300)
            .collect();
        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        keys.sort_unstable();

        for &expect in &keys {
            let node = tree.min().unwrap();
            assert_eq!(tree.erase(node), Ok(expect));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.min(), None);

        for key in keys.clone() {
            let _ignore = tree.insert(key);
        }
        for &expect in keys.iter().rev() {
            let node = tree.max().unwrap();
            assert_eq!(tree.erase(node), Ok(expect));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.max(), None);
    });
}

#[test]
fn tree_clear_is_ok() {
    let mut tree = RbTree::new();
    let _ignore = tree.insert(1);
    let _ignore = tree.insert(2);
    let stale = tree.insert(3).unwrap();
    assert_eq!(tree.len(), 3);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert!(tree.is_empty());
    assert_eq!(tree.nodes.len(), 1);
    assert!(tree.nodes[0].is_sentinel());
    assert_eq!(tree.erase(stale), Err(Error::InvalidIndex));

    let node = tree.insert(9).unwrap();
    assert_eq!(tree.key(node), Some(9));
}

#[test]
fn empty_tree_exports_nothing() {
    let tree = RbTree::new();
    assert_eq!(tree.to_vec(), Vec::<Key>::new());
    let mut out: [Key; 0] = [];
    assert_eq!(tree.copy_into(&mut out), Ok(0));
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn errors_format_with_context() {
    let err = Error::CapacityExceeded {
        len: 4,
        capacity: 2,
    };
    assert_eq!(
        err.to_string(),
        "tree holds 4 keys but the destination capacity is 2"
    );
    assert_eq!(
        Error::NodeLimit.to_string(),
        "reached the maximum node count for the index width"
    );
    assert_eq!(
        Error::InvalidIndex.to_string(),
        "node index does not refer to a live node"
    );
}
