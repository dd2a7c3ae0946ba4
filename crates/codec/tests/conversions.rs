use serde_json::{json, Value};
use tooldesk_codec::{
    decode, format_xml, xml_to_json, CodecError, NodeValue, StructuralNode, TEXT_KEY,
};

const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- sample catalog -->
<catalog xmlns:bk="urn:books">
    <bk:book id="1" lang="en">
        <title>Rust &amp; You</title>
        <price>12.50</price>
    </bk:book>
    <bk:book id="2"><title>Second</title><price/></bk:book>
    <note>loose text</note>
</catalog>
"#;

#[test]
fn catalog_projects_to_expected_structure() {
    let value: Value = serde_json::from_str(&xml_to_json(CATALOG).expect("convert")).unwrap();
    assert_eq!(
        value,
        json!({
            "catalog": {
                "@attributes": {"bk": "urn:books"},
                "book": [
                    {
                        "@attributes": {"id": "1", "lang": "en"},
                        "title": {"#text": "Rust & You"},
                        "price": {"#text": "12.50"}
                    },
                    {
                        "@attributes": {"id": "2"},
                        "title": {"#text": "Second"},
                        "price": {}
                    }
                ],
                "note": {"#text": "loose text"}
            }
        })
    );
}

#[test]
fn catalog_formats_with_two_space_indent() {
    let formatted = format_xml(CATALOG).expect("format");
    let expected = [
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "<!-- sample catalog -->",
        r#"<catalog xmlns:bk="urn:books">"#,
        r#"  <bk:book id="1" lang="en">"#,
        "    <title>Rust &amp; You</title>",
        "    <price>12.50</price>",
        "  </bk:book>",
        r#"  <bk:book id="2">"#,
        "    <title>Second</title>",
        "    <price/>",
        "  </bk:book>",
        "  <note>loose text</note>",
        "</catalog>",
    ]
    .join("\n");
    assert_eq!(formatted, expected);
}

#[test]
fn formatting_is_stable() {
    let once = format_xml(CATALOG).expect("format");
    let twice = format_xml(&once).expect("format again");
    assert_eq!(once, twice);
}

#[test]
fn text_beside_children_is_recorded_under_text_key() {
    // Character data next to child elements still lands under `#text`, so a
    // consumer cannot tell mixed content from a text-only element by key alone.
    let node = decode("<a>body<text>inner</text></a>").expect("decode");
    let a = node.child("a").expect("root");
    assert_eq!(a.text(), Some("body"));
    assert_eq!(a.child("text").and_then(StructuralNode::text), Some("inner"));
    assert_eq!(a.len(), 2);

    let text_only = decode("<a>body</a>").expect("decode");
    let a = text_only.child("a").expect("root");
    assert!(matches!(a.get(TEXT_KEY), Some(NodeValue::Text(text)) if text == "body"));
}

#[test]
fn mismatched_tags_carry_a_position() {
    match decode("<a>\n  <b>\n</a>") {
        Err(CodecError::Malformed { position, .. }) => assert!(position.is_some()),
        other => panic!("expected malformed, got {other:?}"),
    }
}

#[test]
fn deeply_nested_input_is_rejected_as_malformed() {
    let depth = 50_000;
    let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
    assert!(matches!(xml_to_json(&xml), Err(CodecError::Malformed { .. })));
}
