//! Format trees and views as terminal text.

use crate::drawing::DrawingDocument;
use crate::tree::{count_nodes, TreeNode};
use crate::types::RepoRef;
use crate::viewer::{Body, ViewOutcome, ViewPage};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Indented tree listing: folders in bold, files with a short sha.
pub fn format_tree_text(repo: &RepoRef, tree: &[TreeNode]) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("{} ({} nodes)", repo, count_nodes(tree)))
    );
    for node in tree {
        push_node(&mut out, node, 0);
    }
    out
}

fn push_node(out: &mut String, node: &TreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        TreeNode::Folder(folder) => {
            out.push_str(&format!("{}{}/\n", indent, folder.name.bold()));
            for child in &folder.children {
                push_node(out, child, depth + 1);
            }
        }
        TreeNode::File(file) => {
            out.push_str(&format!(
                "{}{} {}\n",
                indent,
                file.name,
                short_sha(&file.sha).dimmed()
            ));
        }
    }
}

/// Flat table of every node: path, kind and sha.
pub fn format_tree_table(tree: &[TreeNode]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Kind", "Sha"]);
    let mut stack: Vec<&TreeNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            TreeNode::Folder(folder) => {
                let sha = folder.sha.as_deref().map(short_sha).unwrap_or("-");
                table.add_row(vec![folder.path.as_str(), "folder", sha]);
                stack.extend(folder.children.iter().rev());
            }
            TreeNode::File(file) => {
                table.add_row(vec![file.path.as_str(), "file", short_sha(&file.sha)]);
            }
        }
    }
    table.to_string()
}

/// Human-readable summary of a rendered view; markdown and text bodies are printed as is.
pub fn format_view_text(page: &ViewPage) -> String {
    match &page.outcome {
        ViewOutcome::Markdown { name, path, html } => {
            format!("{}\n{}\n\n{}\n", format_section_heading(name), path.dimmed(), html)
        }
        ViewOutcome::Drawing {
            name,
            path,
            document,
        } => format!(
            "{}\n{}\n\n{}\n",
            format_section_heading(name),
            path.dimmed(),
            format_drawing_summary(document)
        ),
        ViewOutcome::Content {
            name,
            path,
            content_type,
            body,
        } => {
            let mut out = format!(
                "{}\n{} ({})\n\n",
                format_section_heading(name),
                path.dimmed(),
                content_type
            );
            match body {
                Body::Text(text) => out.push_str(text),
                Body::Binary(bytes) => {
                    out.push_str(&format!("<{} bytes of binary content>", bytes.len()))
                }
            }
            out.push('\n');
            out
        }
        ViewOutcome::Placeholder { name, body } => {
            format!("{}\n\n{}\n", format_section_heading(name).yellow(), body)
        }
    }
}

/// Asset table for a processed drawing.
pub fn format_drawing_summary(document: &DrawingDocument) -> String {
    let files = document.assets();
    if files.is_empty() {
        return "No embedded files".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "MIME type", "Size", "Data URL bytes"]);
    for asset in files.values() {
        let size = asset
            .size
            .map(|s| format!("{}x{}", s.width, s.height))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            asset.id.clone(),
            asset.mime_type.clone(),
            size,
            asset.data_url.len().to_string(),
        ]);
    }
    table.to_string()
}

fn short_sha(sha: &str) -> &str {
    &sha[..sha.len().min(7)]
}
