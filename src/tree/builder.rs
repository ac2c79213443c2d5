//! Nested tree construction from the flat recursive listing.

use crate::tree::node::{FileNode, FolderNode, TreeNode};
use crate::types::{EntryMode, FlatEntry};

/// Builds the folder/file tree from flat entries in encounter order.
///
/// Entries may arrive in any order: an intermediate segment creates its folder
/// on demand, and a later explicit directory entry for the same path reuses it.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Build the root-level node sequence.
    ///
    /// Hidden entries must already be filtered out by the caller.
    pub fn build<'a, I>(entries: I) -> Vec<TreeNode>
    where
        I: IntoIterator<Item = &'a FlatEntry>,
    {
        let mut root = Vec::new();
        for entry in entries {
            Self::insert(&mut root, entry);
        }
        root
    }

    fn insert(root: &mut Vec<TreeNode>, entry: &FlatEntry) {
        if entry.path.is_empty() {
            return;
        }

        let parts: Vec<&str> = entry.path.split('/').collect();
        let last = parts.len() - 1;
        let mut level = root;
        let mut current_path = String::with_capacity(entry.path.len());

        for (index, part) in parts.iter().enumerate() {
            if !current_path.is_empty() {
                current_path.push('/');
            }
            current_path.push_str(part);

            if index < last {
                level = &mut find_or_create_folder(level, part, &current_path).children;
                continue;
            }

            match entry.mode {
                EntryMode::Dir => {
                    let folder = find_or_create_folder(level, part, &current_path);
                    if folder.sha.is_none() {
                        folder.sha = Some(entry.sha.clone());
                    }
                }
                EntryMode::File => level.push(TreeNode::File(FileNode {
                    name: part.to_string(),
                    path: current_path.clone(),
                    sha: entry.sha.clone(),
                    url: entry.url.clone(),
                })),
            }
        }
    }
}

/// Folders are matched by name among folders only; a file of the same name
/// occupies a separate slot.
fn find_or_create_folder<'a>(
    level: &'a mut Vec<TreeNode>,
    name: &str,
    path: &str,
) -> &'a mut FolderNode {
    let index = match level
        .iter()
        .position(|node| matches!(node, TreeNode::Folder(folder) if folder.name == name))
    {
        Some(index) => index,
        None => {
            level.push(TreeNode::Folder(FolderNode {
                name: name.to_string(),
                path: path.to_string(),
                sha: None,
                children: Vec::new(),
            }));
            level.len() - 1
        }
    };

    match &mut level[index] {
        TreeNode::Folder(folder) => folder,
        TreeNode::File(_) => unreachable!("position matched a folder"),
    }
}
