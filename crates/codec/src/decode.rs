//! XML to [`StructuralNode`] decoding.

use std::collections::BTreeMap;

use crate::error::CodecError;
use crate::node::{NodeValue, StructuralNode, ATTRIBUTES_KEY, TEXT_KEY};
use crate::tokens::{local_name, Attribute, Token, Tokenizer};

/// Deepest element nesting [`decode`] accepts; each level is one stack frame.
pub const MAX_DEPTH: usize = 512;

/// Decodes an XML document into its structural projection.
/// 將 XML 文件解碼為結構化投影。
///
/// The result maps each root element's local name to its node. Surrounding
/// whitespace is ignored; a document without any element is malformed.
pub fn decode(xml: &str) -> Result<StructuralNode, CodecError> {
    decode_tokens(Tokenizer::new(xml.trim()))
}

/// Decodes an already tokenized document.
///
/// Unbalanced streams are reported as [`CodecError::Malformed`] even when the
/// producer did not check them.
pub fn decode_tokens<I>(tokens: I) -> Result<StructuralNode, CodecError>
where
    I: IntoIterator<Item = Result<Token, CodecError>>,
{
    let mut tokens = tokens.into_iter();
    let mut document = StructuralNode::new();
    let mut roots = 0usize;
    while let Some(token) = tokens.next() {
        match token? {
            Token::Start { name, attributes } => {
                let node = decode_element(&mut tokens, &name, attributes, 1)?;
                // A later root with the same name replaces the earlier one.
                document.insert(local_name(&name), NodeValue::Node(node));
                roots += 1;
            }
            Token::End { name } => {
                return Err(CodecError::malformed(format!(
                    "unexpected closing tag </{name}>"
                )))
            }
            _ => {}
        }
    }
    if roots == 0 {
        return Err(CodecError::malformed("document has no root element"));
    }
    tracing::debug!(roots, "decoded XML document");
    Ok(document)
}

fn decode_element<I>(
    tokens: &mut I,
    open: &str,
    attributes: Vec<Attribute>,
    depth: usize,
) -> Result<StructuralNode, CodecError>
where
    I: Iterator<Item = Result<Token, CodecError>>,
{
    if depth > MAX_DEPTH {
        return Err(CodecError::malformed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    let mut node = StructuralNode::new();
    if !attributes.is_empty() {
        let attributes: BTreeMap<String, String> = attributes
            .into_iter()
            .map(|attribute| (local_name(&attribute.name).to_string(), attribute.value))
            .collect();
        node.insert(ATTRIBUTES_KEY, NodeValue::Attributes(attributes));
    }

    let mut text = String::new();
    while let Some(token) = tokens.next() {
        match token? {
            Token::Start { name, attributes } => {
                let child = decode_element(tokens, &name, attributes, depth + 1)?;
                node.merge_child(local_name(&name), child);
            }
            Token::Text(chunk) => text.push_str(chunk.trim()),
            Token::End { name } if name == open => {
                if !text.is_empty() {
                    node.insert(TEXT_KEY, NodeValue::Text(text));
                }
                return Ok(node);
            }
            Token::End { name } => {
                return Err(CodecError::malformed(format!(
                    "expected </{open}>, found </{name}>"
                )))
            }
            Token::Comment(_) | Token::Instruction(_) | Token::Doctype(_) => {}
        }
    }
    Err(CodecError::malformed(format!(
        "unexpected end of document, <{open}> is not closed"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn to_json(xml: &str) -> Value {
        serde_json::to_value(decode(xml).expect("decode")).unwrap()
    }

    #[test]
    fn repeated_items_become_an_array() {
        assert_eq!(
            to_json("<root><item>a</item><item>b</item></root>"),
            json!({"root": {"item": [{"#text": "a"}, {"#text": "b"}]}})
        );
    }

    #[test]
    fn attributes_and_empty_children() {
        assert_eq!(
            to_json(r#"<a x="1"><b/></a>"#),
            json!({"a": {"@attributes": {"x": "1"}, "b": {}}})
        );
    }

    #[test]
    fn text_is_kept_alongside_children() {
        // Mixed content flattens: chunks are trimmed and concatenated.
        assert_eq!(
            to_json("<p> Hello <b>bold</b> world </p>"),
            json!({"p": {"#text": "Helloworld", "b": {"#text": "bold"}}})
        );
    }

    #[test]
    fn whitespace_only_text_is_dropped() {
        assert_eq!(to_json("<a>\n   \n</a>"), json!({"a": {}}));
    }

    #[test]
    fn namespace_prefixes_are_stripped() {
        assert_eq!(
            to_json(r#"<s:Envelope xmlns:s="urn:x"><s:Body>ok</s:Body></s:Envelope>"#),
            json!({"Envelope": {
                "@attributes": {"s": "urn:x"},
                "Body": {"#text": "ok"}
            }})
        );
    }

    #[test]
    fn truncated_document_is_malformed() {
        let err = decode("<root><item>").unwrap_err();
        assert!(matches!(err, CodecError::Malformed { .. }));
    }

    fn nested(depth: usize) -> String {
        format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth))
    }

    #[test]
    fn nesting_up_to_the_limit_decodes() {
        assert!(decode(&nested(MAX_DEPTH)).is_ok());
    }

    #[test]
    fn very_deep_nesting_is_rejected_instead_of_overflowing() {
        match decode(&nested(50_000)).unwrap_err() {
            CodecError::Malformed { message, .. } => {
                assert_eq!(message, format!("nesting deeper than {MAX_DEPTH} levels"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn document_without_elements_is_malformed() {
        assert!(matches!(
            decode("   just text  "),
            Err(CodecError::Malformed { .. })
        ));
        assert!(decode("").is_err());
    }

    #[test]
    fn unbalanced_token_streams_are_rejected() {
        let tokens = vec![
            Ok(Token::Start {
                name: "a".into(),
                attributes: Vec::new(),
            }),
            Ok(Token::End { name: "b".into() }),
        ];
        let err = decode_tokens(tokens).unwrap_err();
        match err {
            CodecError::Malformed { position, message } => {
                assert_eq!(position, None);
                assert_eq!(message, "expected </a>, found </b>");
            }
            other => panic!("unexpected error {other:?}"),
        }

        let unterminated = vec![Ok(Token::Start {
            name: "a".into(),
            attributes: Vec::new(),
        })];
        assert!(decode_tokens(unterminated).is_err());
    }
}
