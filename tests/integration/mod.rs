//! Integration tests for the folio viewer pipeline

mod drawing_pipeline;
mod support;
mod tree_structure;
mod viewer_pipeline;
