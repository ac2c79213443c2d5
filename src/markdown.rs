//! Wikilink and embed rewriting for markdown documents.
//!
//! Three passes run in a fixed order, each a global substitution:
//! fenced `smiles` blocks, `![[embed]]` wikilinks, then `[[link]]` wikilinks.
//! Nothing here fails; unresolved targets become fallback markup.

use crate::config::ViewerConfig;
use crate::drawing::formula::escape_xml;
use crate::tree::{FileNode, NameIndex, TreeNode};
use crate::types::RepoRef;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

static SMILES_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```smiles\s+([\s\S]*?)```").expect("smiles pattern"));
static EMBED_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\[([^\]]+)\]\]").expect("embed pattern"));
static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("wikilink pattern"));

/// Anchor used for links whose target does not exist.
pub const FILE_NOT_FOUND_ANCHOR: &str = "#file-not-found";

/// Rewrites a document's custom markup against one repository tree.
pub struct MarkdownLinkResolver<'a> {
    index: NameIndex<'a>,
    repo: &'a RepoRef,
    config: &'a ViewerConfig,
}

impl<'a> MarkdownLinkResolver<'a> {
    pub fn new(tree: &'a [TreeNode], repo: &'a RepoRef, config: &'a ViewerConfig) -> Self {
        Self {
            index: NameIndex::build(tree),
            repo,
            config,
        }
    }

    /// Apply all three passes.
    pub fn resolve(&self, text: &str) -> String {
        let text = rewrite_smiles(text);
        let text = self.rewrite_embeds(&text);
        self.rewrite_links(&text)
    }

    fn rewrite_embeds(&self, text: &str) -> String {
        EMBED_LINK
            .replace_all(text, |caps: &Captures| {
                let target = caps[1].trim();
                match self.lookup(target) {
                    Some(file) if file.is_markdown() => format!(
                        "<iframe src=\"{}&raw=true\" title=\"{}\" class=\"markdown-iframe\" width=\"100%\" style=\"min-height: 600px\"></iframe>\n\n",
                        self.view_path(file),
                        escape_xml(target)
                    ),
                    Some(file) => {
                        // The viewer serves the blob bytes with their content type.
                        let src = self.view_path(file);
                        let title = escape_xml(target);
                        format!("<img src=\"{}\" title=\"{}\" alt=\"{}\"/>\n\n", src, title, title)
                    }
                    None => format!(
                        "<img src=\"{}\" title=\"Not found\" alt=\"Not found\"/>\n\n",
                        self.config.not_found_image
                    ),
                }
            })
            .into_owned()
    }

    fn rewrite_links(&self, text: &str) -> String {
        WIKI_LINK
            .replace_all(text, |caps: &Captures| {
                let target = caps[1].trim();
                if let Some(heading) = target.strip_prefix('#') {
                    let heading = heading.trim();
                    return format!("<a href=\"#{}\">{}</a>", encode_fragment(heading), heading);
                }
                match self.lookup(target) {
                    Some(file) => format!("<a href=\"{}\">{}</a>", self.view_path(file), target),
                    None => format!("[{}]({})", target, FILE_NOT_FOUND_ANCHOR),
                }
            })
            .into_owned()
    }

    fn lookup(&self, target: &str) -> Option<&'a FileNode> {
        let found = self.index.resolve(target);
        if self.index.is_ambiguous(target) {
            let candidates: Vec<&str> = self
                .index
                .candidates(target)
                .iter()
                .map(|file| file.path.as_str())
                .collect();
            debug!(name = target, ?candidates, "Ambiguous wikilink target");
        }
        if found.is_none() {
            debug!(name = target, "Wikilink target not found");
        }
        found
    }

    /// `{prefix}/{owner}/{repo}/{path}?sha={sha}`
    fn view_path(&self, file: &FileNode) -> String {
        format!(
            "{}/{}/{}?sha={}",
            self.config.app_prefix.trim_end_matches('/'),
            self.repo,
            file.path,
            file.sha
        )
    }
}

fn rewrite_smiles(text: &str) -> String {
    SMILES_BLOCK
        .replace_all(text, |caps: &Captures| {
            format!("\n\n<svg data-smiles=\"{}\" />\n\n", escape_xml(caps[1].trim()))
        })
        .into_owned()
}

/// Percent-encode like `encodeURIComponent`, which keeps `!'()*` literal.
fn encode_fragment(text: &str) -> String {
    let mut encoded = urlencoding::encode(text).into_owned();
    for (escaped, literal) in [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")] {
        encoded = encoded.replace(escaped, literal);
    }
    encoded
}

/// Convenience wrapper for one-off rewrites.
pub fn render_markdown(
    text: &str,
    tree: &[TreeNode],
    repo: &RepoRef,
    config: &ViewerConfig,
) -> String {
    MarkdownLinkResolver::new(tree, repo, config).resolve(text)
}
