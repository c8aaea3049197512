use indexsync_model::{FieldNode, MappingTree, ModelError};
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn decodes_leaf_and_object_fields() {
    let tree = MappingTree::from_json(&json!({
        "properties": {
            "title": {"type": "text", "analyzer": "english"},
            "user": {"properties": {"id": {"type": "keyword"}}}
        }
    }))
    .unwrap();

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.get("title").unwrap().field_type(), Some("text"));
    let user = tree.get("user").unwrap();
    assert!(!user.is_leaf());
    assert_eq!(
        user.properties().unwrap()["id"],
        FieldNode::leaf("keyword")
    );
}

#[test]
fn leaf_keeps_extra_parameters() {
    let tree = MappingTree::from_json(&json!({
        "properties": {"ts": {"type": "date", "format": "epoch_millis"}}
    }))
    .unwrap();

    let FieldNode::Leaf { params, .. } = tree.get("ts").unwrap() else {
        panic!("expected leaf");
    };
    assert_eq!(params["format"], "epoch_millis");
    assert!(!params.contains_key("type"));
}

#[test]
fn empty_document_is_empty_tree() {
    let tree = MappingTree::from_json(&json!({})).unwrap();
    assert!(tree.is_empty());
    assert_eq!(tree.leaf_count(), 0);
}

#[test]
fn root_parameters_are_carried() {
    let tree = MappingTree::from_json(&json!({"dynamic": "strict", "properties": {}})).unwrap();
    assert_eq!(tree.params["dynamic"], "strict");
    assert_eq!(tree.to_json(), json!({"dynamic": "strict", "properties": {}}));
}

#[test]
fn object_keeps_extra_parameters() {
    let doc = json!({
        "properties": {
            "user": {"dynamic": "strict", "properties": {"id": {"type": "keyword"}}}
        }
    });
    let tree = MappingTree::from_json(&doc).unwrap();

    let user = tree.get("user").unwrap();
    assert_eq!(user.params()["dynamic"], "strict");
    assert_eq!(user.properties().unwrap().len(), 1);
    assert_eq!(tree.to_json(), doc);
}

// ── Malformed input ──────────────────────────────────────────────

#[test]
fn rejects_field_with_type_and_properties() {
    let err = MappingTree::from_json(&json!({
        "properties": {"f": {"type": "nested", "properties": {}}}
    }))
    .unwrap_err();

    match err {
        ModelError::MalformedField { path, .. } => {
            assert_eq!(path, r#"mappings["properties"]["f"]"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_field_with_neither_key() {
    let err = MappingTree::from_json(&json!({
        "properties": {"outer": {"properties": {"inner": {"index": false}}}}
    }))
    .unwrap_err();

    match err {
        ModelError::MalformedField { path, reason } => {
            assert_eq!(
                path,
                r#"mappings["properties"]["outer"]["properties"]["inner"]"#
            );
            assert!(reason.contains("neither"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_non_string_type() {
    let err = MappingTree::from_json(&json!({"properties": {"f": {"type": 3}}})).unwrap_err();
    assert!(matches!(err, ModelError::MalformedField { .. }));
}

#[test]
fn rejects_non_object_properties() {
    let err = MappingTree::from_json(&json!({"properties": ["f"]})).unwrap_err();
    assert!(matches!(err, ModelError::MalformedField { .. }));
}

#[test]
fn rejects_invalid_json_text() {
    let err = MappingTree::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ModelError::Serialization(_)));
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn encodes_remote_update_shape() {
    let tree = MappingTree::new()
        .with_field("a", FieldNode::leaf("keyword"))
        .with_field(
            "b",
            FieldNode::object([("c", FieldNode::leaf("long").with_param("index", json!(false)))]),
        );

    assert_eq!(
        tree.to_json(),
        json!({
            "properties": {
                "a": {"type": "keyword"},
                "b": {"properties": {"c": {"type": "long", "index": false}}}
            }
        })
    );
}

#[test]
fn serde_goes_through_remote_shape() {
    let tree = MappingTree::from_fields([("a", FieldNode::leaf("text"))]);
    let text = serde_json::to_string(&tree).unwrap();
    let back: MappingTree = serde_json::from_str(&text).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn leaf_count_walks_nested_objects() {
    let tree = MappingTree::from_fields([
        ("a", FieldNode::leaf("text")),
        (
            "b",
            FieldNode::object([
                ("c", FieldNode::leaf("long")),
                ("d", FieldNode::object([("e", FieldNode::leaf("ip"))])),
            ]),
        ),
    ]);
    assert_eq!(tree.leaf_count(), 3);
}
