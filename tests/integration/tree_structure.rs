//! Tree construction properties over whole entry sets.

use folio::tree::{count_nodes, find_by_name, TreeBuilder, TreeNode};
use folio::types::FlatEntry;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn entries() -> Vec<FlatEntry> {
    vec![
        FlatEntry::dir("docs", "d-docs"),
        FlatEntry::file("docs/intro.md", "s1"),
        FlatEntry::file("docs/guide/setup.md", "s2"),
        FlatEntry::dir("docs/guide", "d-guide"),
        FlatEntry::file("assets/logo.png", "s3"),
        FlatEntry::file("readme.md", "s4"),
        FlatEntry::dir("empty", "d-empty"),
        FlatEntry::file("a/b/c.txt", "s5"),
    ]
}

/// Node identities per level: (depth, path, is_folder).
fn identities(tree: &[TreeNode]) -> BTreeSet<(usize, String, bool)> {
    let mut out = BTreeSet::new();
    let mut stack: Vec<(usize, &TreeNode)> = tree.iter().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.insert((depth, node.path().to_string(), node.is_folder()));
        stack.extend(node.children().iter().map(|c| (depth + 1, c)));
    }
    out
}

#[test]
fn intermediate_segments_create_folders() {
    let tree = TreeBuilder::build(&[FlatEntry::file("a/b/c.txt", "sha")]);
    assert_eq!(tree.len(), 1);
    let a = &tree[0];
    assert!(a.is_folder());
    let b = &a.children()[0];
    assert!(b.is_folder());
    assert_eq!(b.path(), "a/b");
    let c = &b.children()[0];
    assert!(!c.is_folder());
    assert_eq!(c.path(), "a/b/c.txt");
    assert_eq!(count_nodes(&tree), 3);
}

#[test]
fn explicit_directory_after_auto_creation_is_reused() {
    let tree = TreeBuilder::build(&entries());
    let docs: Vec<_> = tree.iter().filter(|n| n.name() == "docs").collect();
    assert_eq!(docs.len(), 1);
    let guides: Vec<_> = docs[0]
        .children()
        .iter()
        .filter(|n| n.name() == "guide")
        .collect();
    assert_eq!(guides.len(), 1);
    match guides[0] {
        TreeNode::Folder(folder) => assert_eq!(folder.sha.as_deref(), Some("d-guide")),
        TreeNode::File(_) => panic!("guide should be a folder"),
    }
}

#[test]
fn lookup_is_stable_across_calls() {
    let tree = TreeBuilder::build(&entries());
    let first = find_by_name(&tree, "setup").map(|f| f.path.clone());
    for _ in 0..10 {
        assert_eq!(find_by_name(&tree, "setup").map(|f| f.path.clone()), first);
    }
    assert_eq!(first.as_deref(), Some("docs/guide/setup.md"));
}

proptest! {
    #[test]
    fn permutations_build_equivalent_trees(order in Just(entries()).prop_shuffle()) {
        let expected = identities(&TreeBuilder::build(&entries()));
        let tree = TreeBuilder::build(&order);
        prop_assert_eq!(identities(&tree), expected);
        prop_assert_eq!(count_nodes(&tree), 11);
    }
}
