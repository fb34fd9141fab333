use rb_key_tree::RbTree;

fn main() {
    let mut tree = RbTree::new();
    let keys = [4, 8, 15, 16, 23, 42];
    let handles: Vec<_> = keys
        .into_iter()
        .map(|key| tree.insert(key).unwrap())
        .collect();

    // Erasing a node leaves every other handle untouched.
    assert_eq!(tree.erase(handles[1]), Ok(8));
    assert_eq!(tree.erase(handles[4]), Ok(23));
    for (i, &node) in handles.iter().enumerate() {
        if i == 1 || i == 4 {
            assert_eq!(tree.key(node), None);
        } else {
            assert_eq!(tree.key(node), Some(keys[i]));
        }
    }

    // The most recently freed slot is reused by the next insert.
    let reused = tree.insert(7).unwrap();
    assert_eq!(reused, handles[4]);
    assert_eq!(tree.key(reused), Some(7));

    assert!(tree.erase(handles[1]).is_err());
    assert_eq!(tree.to_vec(), vec![4, 7, 15, 16, 42]);
}
