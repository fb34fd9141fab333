use rb_key_tree::{Error, RbTree};

fn main() {
    let mut tree = RbTree::new();
    for key in [10, 20, 30, 15, 25, 5] {
        tree.insert(key).unwrap();
    }

    let mut sorted = [0; 6];
    assert_eq!(tree.copy_into(&mut sorted), Ok(6));
    assert_eq!(sorted, [5, 10, 15, 20, 25, 30]);

    let mut too_small = [0; 4];
    assert_eq!(
        tree.copy_into(&mut too_small),
        Err(Error::CapacityExceeded {
            len: 6,
            capacity: 4
        })
    );
    assert_eq!(too_small, [0; 4]);

    assert!(tree.remove(20));
    assert_eq!(tree.to_vec(), vec![5, 10, 15, 25, 30]);

    let ascending: Vec<_> = tree.iter().collect();
    assert_eq!(ascending, tree.to_vec());
}
