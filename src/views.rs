//! Navigation views
//!
//! Renders the repository tree as nested `folder`/`file` blocks. Folders on
//! the way to the open file carry the `open` class.

use crate::drawing::formula::escape_xml;
use crate::tree::TreeNode;
use crate::types::RepoRef;
use std::fmt::Write as _;

/// Render the navigation tree for `repo`, expanding folders above `open_path`.
pub fn render_tree_html(
    tree: &[TreeNode],
    repo: &RepoRef,
    app_prefix: &str,
    open_path: Option<&str>,
) -> String {
    let mut out = String::from("<div class=\"tree\">");
    let prefix = app_prefix.trim_end_matches('/');
    for node in tree {
        render_node(&mut out, node, repo, prefix, open_path.unwrap_or_default());
    }
    out.push_str("</div>");
    out
}

fn render_node(out: &mut String, node: &TreeNode, repo: &RepoRef, prefix: &str, open_path: &str) {
    match node {
        TreeNode::Folder(folder) => {
            let class = if is_open(open_path, &folder.path) {
                "folder open"
            } else {
                "folder"
            };
            let _ = write!(
                out,
                "<div class=\"{}\"><button class=\"toggle\">{}</button><div class=\"nested\">",
                class,
                escape_xml(&folder.name)
            );
            for child in &folder.children {
                render_node(out, child, repo, prefix, open_path);
            }
            out.push_str("</div></div>");
        }
        TreeNode::File(file) => {
            let _ = write!(
                out,
                "<div class=\"file\"><a href=\"{}/{}/{}?sha={}\">{}</a></div>",
                prefix,
                repo,
                file.path,
                file.sha,
                escape_xml(&file.name)
            );
        }
    }
}

/// A folder is open when the open file lives beneath it.
fn is_open(open_path: &str, folder_path: &str) -> bool {
    open_path
        .strip_prefix(folder_path)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}
