use json_lens_core::{Instance, Keywords, DIALECT_2019_09, DIALECT_2020_12};
use serde_json::json;

#[test]
fn annotation_is_append_only() {
    let a = Instance::parse(r#"{"name": "x"}"#);
    let b = a.annotate("title", json!("first"));
    let c = b.annotate("title", json!("second"));

    assert_eq!(
        c.annotation("title", DIALECT_2020_12),
        &[json!("second"), json!("first")]
    );
    assert_eq!(
        b.annotation("title", DIALECT_2020_12),
        &[json!("first")]
    );
    // The original Instance never sees the updates
    assert_eq!(a.annotation("title", DIALECT_2020_12), &[] as &[serde_json::Value]);
}

#[test]
fn annotations_are_pointer_scoped() {
    let root = Instance::parse(r#"{"a": 1, "b": 2}"#);
    let annotated = root.step("a").annotate("default", json!(1));

    assert_eq!(
        annotated.annotation("default", DIALECT_2020_12),
        &[json!(1)]
    );
    // Same store, different pointer: nothing recorded at /b
    let b = annotated.get("#/b").unwrap();
    assert_eq!(b.annotation("default", DIALECT_2020_12), &[] as &[serde_json::Value]);
}

#[test]
fn annotating_survives_navigation() {
    let root = Instance::parse(r#"{"a": {"b": 1}}"#);
    let annotated = root.step("a").annotate("description", json!("inner"));

    // Navigating away and back through the same store keeps the record
    let back = annotated.get("#/a").unwrap();
    assert_eq!(
        back.annotation("description", DIALECT_2020_12),
        &[json!("inner")]
    );
}

#[test]
fn keyword_resolution_is_dialect_aware() {
    let root = Instance::parse(r#"[1, 2]"#);
    // Recorded under the 2020-12 identifier for `items`
    let annotated = root.annotate("items", json!(true));

    assert_eq!(annotated.annotation("items", DIALECT_2020_12), &[json!(true)]);
    // The 2019-09 `items` resolves to a different identifier
    assert_eq!(
        annotated.annotation("items", DIALECT_2019_09),
        &[] as &[serde_json::Value]
    );
    // The canonical identifier finds it regardless of dialect
    assert_eq!(
        annotated.annotation("https://json-schema.org/keyword/items", DIALECT_2019_09),
        &[json!(true)]
    );
}

#[test]
fn annotated_with_returns_carrying_instances() {
    let root = Instance::parse(r#"{"a": {"deep": true}, "b": 2, "c": 3}"#);
    let annotated = root
        .step("a")
        .annotate("deprecated", json!(true))
        .get("#/c")
        .unwrap()
        .annotate("deprecated", json!(false));

    let carriers = annotated.annotated_with("deprecated", DIALECT_2020_12);
    let pointers: Vec<&str> = carriers.iter().map(|i| i.pointer()).collect();
    assert_eq!(pointers, vec!["/a", "/c"]);
    // Carriers are live Instances resolved against the document
    assert_eq!(carriers[0].value(), Some(json!({"deep": true})));

    // A keyword nobody recorded yields no carriers
    assert!(annotated.annotated_with("title", DIALECT_2020_12).is_empty());
}

#[test]
fn annotations_at_absent_locations() {
    // Annotating an absent location records under its pointer; the node
    // stays absent
    let root = Instance::parse(r#"{"a": 1}"#);
    let ghost = root.step("missing").annotate("title", json!("ghost"));
    assert_eq!(ghost.annotation("title", DIALECT_2020_12), &[json!("ghost")]);
    assert_eq!(ghost.value(), None);
}

#[test]
fn custom_registry() {
    let mut keywords = Keywords::standard();
    keywords.register("urn:dialect:custom", "hint", "https://example.com/keyword/hint");

    let root = Instance::parse_with(r#"{"a": 1}"#, "urn:dialect:custom", keywords);
    let annotated = root.annotate("hint", json!("check"));

    assert_eq!(
        annotated.annotation("hint", "urn:dialect:custom"),
        &[json!("check")]
    );
    // Under a dialect without the registration the short name resolves to
    // itself, which is a different identifier
    assert_eq!(
        annotated.annotation("hint", DIALECT_2020_12),
        &[] as &[serde_json::Value]
    );
}
