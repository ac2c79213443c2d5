//! Repository tree: node types, construction from flat entries, name lookup.

pub mod builder;
pub mod lookup;
pub mod node;

pub use builder::TreeBuilder;
pub use lookup::{find_by_name, find_by_sha, NameIndex};
pub use node::{count_nodes, FileNode, FolderNode, TreeNode};
