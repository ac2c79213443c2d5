//! Repository tree node types

use serde::{Deserialize, Serialize};

/// File node representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FileNode {
    /// Name with a trailing `.md` removed, used for wikilink matching.
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix(".md").unwrap_or(&self.name)
    }

    pub fn is_markdown(&self) -> bool {
        self.name.ends_with(".md")
    }
}

/// Folder node representation
///
/// `sha` stays `None` for folders created from an intermediate path segment
/// until (and unless) the explicit directory entry is seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub name: String,
    pub path: String,
    pub sha: Option<String>,
    pub children: Vec<TreeNode>,
}

/// Repository tree node. Folders are exactly the nodes owning `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Folder(FolderNode),
    File(FileNode),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.name,
            TreeNode::File(file) => &file.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => &folder.path,
            TreeNode::File(file) => &file.path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Folder(folder) => &folder.children,
            TreeNode::File(_) => &[],
        }
    }
}

/// Count every node below (and including) the given roots.
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes
        .iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}
