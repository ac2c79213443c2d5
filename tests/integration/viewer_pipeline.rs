//! End-to-end views over an in-memory repository.

use crate::integration::support::{drawing_markdown, repo, InMemorySource};
use folio::config::ViewerConfig;
use folio::path_codec::encode_segment;
use folio::viewer::{Body, RepositoryViewer, ViewOutcome, ViewRequest, PLACEHOLDER_NAME};

fn source() -> InMemorySource {
    InMemorySource::new()
        .with_file(".github/workflows/ci.yml", "s-ci", b"on: push")
        .with_dir("notes", "d-notes")
        .with_file(
            "notes/index.md",
            "s-index",
            b"# Index\n\nSee [[plan]], [[#Goals]] and [[ghost]].\n\n![[logo.png]]\n",
        )
        .with_file("notes/plan.md", "s-plan", b"Plan body")
        .with_file("assets/logo.png", "s-logo", &[0x89, b'P', b'N', b'G'])
        .with_file("site/style.css", "s-css", b"body { color: red; }")
}

fn viewer(source: InMemorySource) -> RepositoryViewer<InMemorySource> {
    RepositoryViewer::new(source, ViewerConfig::default())
}

#[tokio::test]
async fn markdown_view_rewrites_links() {
    let viewer = viewer(source());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("notes/index.md"))
        .await;

    match &page.outcome {
        ViewOutcome::Markdown { name, path, html } => {
            assert_eq!(name, "index");
            assert_eq!(path, "notes/index.md");
            assert!(html.contains("<a href=\"/app/octo/notes/notes/plan.md?sha=s-plan\">plan</a>"));
            assert!(html.contains("<a href=\"#Goals\">Goals</a>"));
            assert!(html.contains("[ghost](#file-not-found)"));
            assert!(html.contains("src=\"/app/octo/notes/assets/logo.png?sha=s-logo\""));
        }
        other => panic!("expected markdown, got {:?}", other),
    }
    assert!(!page.raw);
}

#[tokio::test]
async fn hidden_entries_are_not_in_the_tree() {
    let viewer = viewer(source());
    let page = viewer.render(&ViewRequest::new(repo())).await;
    assert!(page.tree.iter().all(|node| !node.name().starts_with('.')));
    assert_eq!(page.tree.len(), 3);
}

#[tokio::test]
async fn no_file_requested_shows_intro() {
    let viewer = viewer(source());
    let page = viewer.render(&ViewRequest::new(repo())).await;
    match &page.outcome {
        ViewOutcome::Placeholder { name, body } => {
            assert_eq!(name, PLACEHOLDER_NAME);
            assert!(body.starts_with("Open a file to get started."));
        }
        other => panic!("expected placeholder, got {:?}", other),
    }
}

#[tokio::test]
async fn sha_request_resolves_path_from_tree() {
    let viewer = viewer(source());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_sha("s-plan").raw(true))
        .await;
    match &page.outcome {
        ViewOutcome::Markdown { name, html, .. } => {
            assert_eq!(name, "plan");
            assert_eq!(html, "Plan body");
        }
        other => panic!("expected markdown, got {:?}", other),
    }
    assert!(page.raw);
    assert_eq!(viewer.source().blob_calls(), 1);
}

#[tokio::test]
async fn images_are_binary_and_css_is_text() {
    let viewer = viewer(source());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("assets/logo.png"))
        .await;
    match page.outcome {
        ViewOutcome::Content {
            content_type, body, ..
        } => {
            assert_eq!(content_type, "image/png");
            assert_eq!(body, Body::Binary(vec![0x89, b'P', b'N', b'G']));
        }
        other => panic!("expected content, got {:?}", other),
    }

    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("site/style.css"))
        .await;
    match page.outcome {
        ViewOutcome::Content {
            content_type, body, ..
        } => {
            assert_eq!(content_type, "text/css");
            assert_eq!(body, Body::Text("body { color: red; }".to_string()));
        }
        other => panic!("expected content, got {:?}", other),
    }
}

#[tokio::test]
async fn upstream_failure_degrades_to_placeholder() {
    let viewer = viewer(source());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("notes/missing.md"))
        .await;
    match &page.outcome {
        ViewOutcome::Placeholder { body, .. } => {
            assert!(body.contains("Github API error (404 Not Found)"));
        }
        other => panic!("expected placeholder, got {:?}", other),
    }
    // The tree was fetched before the failure and is still shown.
    assert_eq!(page.tree.len(), 3);
}

#[tokio::test]
async fn tree_failure_degrades_with_empty_tree() {
    let viewer = viewer(source().failing_tree());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("notes/plan.md"))
        .await;
    assert!(page.outcome.is_placeholder());
    assert!(page.tree.is_empty());
}

#[tokio::test]
async fn parent_segments_are_rejected() {
    let viewer = viewer(source());
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("notes/../secrets.md"))
        .await;
    match &page.outcome {
        ViewOutcome::Placeholder { body, .. } => assert!(body.contains("Invalid path")),
        other => panic!("expected placeholder, got {:?}", other),
    }
    assert_eq!(viewer.source().contents_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn legacy_file_query_opens_the_file() {
    let viewer = viewer(source());
    let request = ViewRequest::from_file_query(repo(), &encode_segment("notes/plan.md")).unwrap();
    let page = viewer.render(&request).await;
    assert_eq!(page.outcome.name(), "plan");
}

#[tokio::test]
async fn drawing_marker_routes_to_drawing_pipeline() {
    let scene = serde_json::json!({
        "type": "excalidraw",
        "elements": [{"id": "img", "type": "image", "fileId": "x", "width": 10, "height": 20}]
    });
    let text = drawing_markdown(&scene, &["x: [[logo.png]]"]);
    let viewer = viewer(source().with_file("drawings/board.excalidraw.md", "s-board", text.as_bytes()));
    let page = viewer
        .render(&ViewRequest::new(repo()).with_path("drawings/board.excalidraw.md"))
        .await;
    match &page.outcome {
        ViewOutcome::Drawing { name, document, .. } => {
            assert_eq!(name, "board.excalidraw");
            let files = document.assets();
            assert_eq!(files["file-0"].data_url, "data:image/png;base64,iVBORw==");
            assert_eq!(document.elements().unwrap()[0]["fileId"], "file-0");
        }
        other => panic!("expected drawing, got {:?}", other),
    }
}
