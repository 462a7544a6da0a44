//! End-to-end reader scenarios through the public API

use zmark::{
    parse_document, parse_document_bytes, parse_document_with_config, Category, Declaration,
    ErrorKind, FormatConfig, Node,
};

#[test]
fn parses_declaration_and_root() {
    let doc = parse_document("<?xml version=\"1.0\"?><config env=\"prod\"><port>8080</port></config>")
        .unwrap();
    assert_eq!(doc.declaration, Declaration::default());
    assert_eq!(doc.root.name(), "config");
    assert_eq!(doc.root.attribute("env"), Some("prod"));
    let children = doc.root.children().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].value(), Some("8080".to_string()));
}

#[test]
fn nested_same_named_containers() {
    // the depth stack must not match the inner closing tag to the outer open
    let doc = parse_document("<a><a>x</a></a>").unwrap();
    let outer = doc.root.children().unwrap();
    assert_eq!(outer.len(), 1);
    match &outer[0] {
        Node::Leaf { name, .. } => assert_eq!(name, "a"),
        other => panic!("expected inner leaf, got {other:?}"),
    }
    assert_eq!(outer[0].value(), Some("x".to_string()));
}

#[test]
fn unmatched_closing_tag_references_both_names() {
    let err = parse_document("<a><b></a>").unwrap_err();
    let message = err.to_string();
    assert!(matches!(err.kind(), ErrorKind::MismatchedTag { .. }));
    assert!(message.contains('a'));
    assert!(message.contains('b'));
}

#[test]
fn missing_equals_names_the_attribute() {
    let err = parse_document("<a b \"v\">x</a>").unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::MissingEquals {
            attribute: "b".to_string()
        }
    );
}

#[test]
fn declaration_without_version_fails() {
    let err = parse_document("<?xml standalone=\"no\"?><a/>").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::MissingVersion);
    assert_eq!(err.category(), Category::Syntax);
}

#[test]
fn duplicate_element_attribute_is_last_write_wins() {
    let doc = parse_document("<a x=\"1\" x=\"2\"/>").unwrap();
    assert_eq!(doc.root.attribute("x"), Some("2"));
}

#[test]
fn self_closing_has_no_children_or_value() {
    let doc = parse_document("<a/>").unwrap();
    assert!(doc.root.is_self_closing());
    assert_eq!(doc.root.children(), None);
    assert_eq!(doc.root.value(), None);
}

#[test]
fn attributes_can_be_disallowed_by_policy() {
    let config = FormatConfig::default().with_allow_attributes(false);
    let err = parse_document_with_config("<a x=\"1\"/>", &config).unwrap_err();
    assert_eq!(err.category(), Category::Configuration);

    // the same document without attributes is fine under the same policy
    assert!(parse_document_with_config("<a/>", &config).is_ok());
}

#[test]
fn trailing_content_is_fatal() {
    let err = parse_document("<a/>more").unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TrailingContent);
}

#[test]
fn byte_input_decoded_with_configured_charset() {
    let config = FormatConfig::default().with_charset("ISO-8859-1");
    let bytes: Vec<u8> = b"<a v=\"\xe9\"/>".to_vec();
    let doc = parse_document_bytes(&bytes, &config).unwrap();
    assert_eq!(doc.root.attribute("v"), Some("\u{e9}"));
}

#[test]
fn utf16_byte_input_decoded() {
    let config = FormatConfig::default().with_charset("UTF-16");
    let mut bytes = vec![0xff, 0xfe];
    for unit in "<a v=\"é\"/>".encode_utf16() {
        bytes.extend(unit.to_le_bytes());
    }
    let doc = parse_document_bytes(&bytes, &config).unwrap();
    assert_eq!(doc.root.attribute("v"), Some("é"));
}

#[test]
fn attribute_entities_round_trip_through_model() {
    let doc = parse_document("<a msg=\"fish &amp; chips\"/>").unwrap();
    assert_eq!(doc.root.attribute("msg"), Some("fish & chips"));
}

#[test]
fn deep_nesting_parses() {
    let mut input = String::new();
    for _ in 0..100 {
        input.push_str("<d>");
    }
    input.push_str("<leaf>x</leaf>");
    for _ in 0..100 {
        input.push_str("</d>");
    }
    let doc = parse_document(&input).unwrap();
    let mut node = &doc.root;
    let mut depth = 0;
    while let Some(children) = node.children() {
        assert_eq!(children.len(), 1);
        node = &children[0];
        depth += 1;
    }
    assert_eq!(depth, 100);
    assert_eq!(node.value(), Some("x".to_string()));
}
