//! Name-based file lookup over a built tree.
//!
//! Wikilinks name files without folders, so a target is resolved by walking
//! the tree. The walk is an explicit-stack depth-first search that pops the
//! last pushed node first: the last root is explored first, and within a
//! folder its last child. With duplicate base names the winner is whichever
//! file this order reaches first.

use crate::tree::node::{FileNode, TreeNode};
use std::collections::HashMap;

/// Find a file whose base name (trailing `.md` removed) equals `name`.
pub fn find_by_name<'a>(tree: &'a [TreeNode], name: &str) -> Option<&'a FileNode> {
    walk(tree).find(|file| file.base_name() == name)
}

/// Find the file carrying a given blob sha.
pub fn find_by_sha<'a>(tree: &'a [TreeNode], sha: &str) -> Option<&'a FileNode> {
    walk(tree).find(|file| file.sha == sha)
}

/// Iterate files in lookup order.
fn walk(tree: &[TreeNode]) -> impl Iterator<Item = &FileNode> {
    let mut stack: Vec<&TreeNode> = tree.iter().collect();
    std::iter::from_fn(move || {
        while let Some(node) = stack.pop() {
            match node {
                TreeNode::File(file) => return Some(file),
                TreeNode::Folder(folder) => stack.extend(folder.children.iter()),
            }
        }
        None
    })
}

/// Base name -> candidate files, built once per document.
///
/// Candidates are stored in lookup order, so `resolve` always agrees with
/// [`find_by_name`]; the remaining candidates only feed diagnostics.
#[derive(Debug, Default)]
pub struct NameIndex<'a> {
    by_name: HashMap<&'a str, Vec<&'a FileNode>>,
}

impl<'a> NameIndex<'a> {
    pub fn build(tree: &'a [TreeNode]) -> Self {
        let mut by_name: HashMap<&'a str, Vec<&'a FileNode>> = HashMap::new();
        for file in walk(tree) {
            by_name.entry(file.base_name()).or_default().push(file);
        }
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<&'a FileNode> {
        self.by_name
            .get(name)
            .and_then(|candidates| candidates.first().copied())
    }

    pub fn candidates(&self, name: &str) -> &[&'a FileNode] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.candidates(name).len() > 1
    }

    /// Number of distinct base names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
