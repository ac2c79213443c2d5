//! Folio: a git repository as a document viewer.
//!
//! Builds a navigation tree from a repository's flat listing, rewrites
//! wikilinks and embeds in markdown documents, and turns drawing documents
//! into self-contained scenes with inline assets.

pub mod config;
pub mod drawing;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod path_codec;
pub mod source;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod viewer;
pub mod views;
