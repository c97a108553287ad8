use json_lens_core::{Instance, JsonKind, Position};
use serde_json::json;

const SOURCE: &str = "{\n  \"servers\": [\n    { \"host\": \"a\" },\n    { \"host\": \"b\" }\n  ]\n}";

#[test]
fn start_and_end_positions() {
    let root = Instance::parse(SOURCE);
    let servers = root.step("servers");

    assert_eq!(servers.start_position(), Some(Position::new(1, 13)));
    assert_eq!(servers.end_position(), Some(Position::new(4, 3)));
    assert_eq!(root.start_position(), Some(Position::new(0, 0)));
}

#[test]
fn absent_instances_have_no_positions() {
    let root = Instance::parse(SOURCE);
    let missing = root.step("nope");
    assert_eq!(missing.start_position(), None);
    assert_eq!(missing.end_position(), None);
    assert_eq!(missing.text_length(), None);
}

#[test]
fn text_length_is_byte_exact() {
    let root = Instance::parse(r#"{"k": "héllo"}"#);
    // Quotes plus five characters, é takes two bytes
    assert_eq!(root.step("k").text_length(), Some(8));
}

#[test]
fn position_to_instance() {
    let root = Instance::parse(SOURCE);
    // Inside the second "host" string value
    let hit = root.instance_at_position(Position::new(3, 15));
    assert_eq!(hit.pointer(), "/servers/1/host");
    assert_eq!(hit.value(), Some(json!("b")));
}

#[test]
fn position_on_a_key_maps_to_its_property() {
    let root = Instance::parse(SOURCE);
    // Inside the "servers" key itself
    let hit = root.instance_at_position(Position::new(1, 4));
    assert_eq!(hit.pointer(), "/servers");
    assert_eq!(hit.kind(), JsonKind::String);
}

#[test]
fn position_outside_any_node_is_absent() {
    let root = Instance::parse("  {\"a\": 1}  ");
    let hit = root.instance_at_position(Position::new(0, 0));
    assert_eq!(hit.kind(), JsonKind::Undefined);
    assert_eq!(hit.pointer(), "");
}

#[test]
fn position_roundtrip_at_node_starts() {
    let root = Instance::parse(SOURCE);
    for pointer in ["/servers", "/servers/0", "/servers/1/host"] {
        let instance = root.get(&format!("#{pointer}")).unwrap();
        let start = instance.start_position().unwrap();
        let hit = root.instance_at_position(start);
        assert_eq!(hit.pointer(), pointer, "roundtrip for {pointer}");
    }
}

#[test]
fn positions_count_utf16_units() {
    let root = Instance::parse("{\"e\": \"😀\", \"after\": 1}");
    let after = root.step("after");
    // The emoji is four bytes but two UTF-16 units
    assert_eq!(after.start_position(), Some(Position::new(0, 21)));
}
