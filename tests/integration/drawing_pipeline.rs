//! Drawing documents processed against an in-memory repository.

use crate::integration::support::{drawing_markdown, repo, InMemorySource};
use folio::drawing::lz::{compress_to_base64, decompress_from_base64};
use folio::drawing::{DrawingProcessor, ReconcileMode};
use folio::error::ApiError;
use folio::tree::{TreeBuilder, TreeNode};
use folio::types::FlatEntry;
use serde_json::json;

fn tree() -> Vec<TreeNode> {
    TreeBuilder::build(&[
        FlatEntry::file("img/photo.JPG", "s-photo"),
        FlatEntry::file("img/chart.svg", "s-chart"),
    ])
}

fn source() -> InMemorySource {
    InMemorySource::new()
        .with_file("img/photo.JPG", "s-photo", b"\xff\xd8\xff")
        .with_file("img/chart.svg", "s-chart", b"<svg/>")
}

fn scene() -> serde_json::Value {
    json!({
        "type": "excalidraw",
        "version": 2,
        "source": "https://excalidraw.com",
        "elements": [
            {"id": "a", "type": "image", "fileId": "f1", "width": 300, "height": 200},
            {"id": "t", "type": "text", "text": "label"},
            {"id": "b", "type": "image", "fileId": "f2", "width": 50, "height": 25},
            {"id": "c", "type": "image", "fileId": "f3", "width": 40.5, "height": 12}
        ],
        "appState": {"viewBackgroundColor": "#ffffff"},
        "files": {}
    })
}

#[test]
fn payload_round_trips_through_compressor() {
    let original = scene().to_string();
    let restored = decompress_from_base64(&compress_to_base64(&original)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&restored).unwrap();
    assert_eq!(parsed, scene());
}

#[tokio::test]
async fn mixed_directives_reconcile_in_order() {
    let text = drawing_markdown(
        &scene(),
        &[
            "f1: [[photo.JPG]]",
            "f2: [[chart.svg#section]]",
            "f3: $$E = mc^2$$",
        ],
    );
    let document = DrawingProcessor::default()
        .process(&text, &tree(), &source(), &repo())
        .await
        .unwrap();

    let elements = document.elements().and_then(|e| e.as_array()).unwrap();
    assert_eq!(elements[0]["fileId"], "file-0");
    assert!(elements[1].get("fileId").is_none());
    assert_eq!(elements[2]["fileId"], "file-1");
    assert_eq!(elements[3]["fileId"], "file-2");

    let files = document.assets();
    assert_eq!(files["file-0"].mime_type, "image/jpeg");
    assert_eq!(files["file-0"].data_url, "data:image/jpeg;base64,/9j/");
    assert_eq!(files["file-1"].mime_type, "image/svg+xml");
    assert_eq!(files["file-2"].mime_type, "image/svg+xml");
    assert_eq!(files["file-2"].size.unwrap().width, 40.5);
    assert_eq!(files["file-0"].size.unwrap().height, 200.0);

    // Untouched keys survive.
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["appState"]["viewBackgroundColor"], "#ffffff");
    assert_eq!(value["version"], 2);
}

#[tokio::test]
async fn tagged_drawing_skips_fetches() {
    let text = drawing_markdown(&scene(), &["tags: [architecture]", "f1: [[photo.JPG]]"]);
    let source = source();
    let document = DrawingProcessor::default()
        .process(&text, &tree(), &source, &repo())
        .await
        .unwrap();
    assert_eq!(serde_json::to_value(&document).unwrap(), scene());
    assert_eq!(source.blob_calls(), 0);
}

#[tokio::test]
async fn strict_mode_accepts_exact_pairing() {
    let text = drawing_markdown(
        &scene(),
        &["f1: [[photo.JPG]]", "f2: [[chart.svg]]", "f3: $$x$$"],
    );
    let result = DrawingProcessor::new(ReconcileMode::Strict)
        .process(&text, &tree(), &source(), &repo())
        .await;
    assert!(result.is_ok());

    let short = drawing_markdown(&scene(), &["f1: [[photo.JPG]]", "f2: [[nope.png]]"]);
    let result = DrawingProcessor::new(ReconcileMode::Strict)
        .process(&short, &tree(), &source(), &repo())
        .await;
    assert!(matches!(
        result,
        Err(ApiError::ReconcileError {
            declared: 1,
            referenced: 3
        })
    ));
}

#[tokio::test]
async fn missing_payload_is_a_decode_error() {
    let result = DrawingProcessor::default()
        .process("excalidraw-plugin: parsed\n## Embedded Files\n%%", &tree(), &source(), &repo())
        .await;
    assert!(matches!(result, Err(ApiError::DecodeError(_))));
}
