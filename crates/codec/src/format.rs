//! Pretty-printing of XML documents.

use quick_xml::escape::{escape, partial_escape};

use crate::error::CodecError;
use crate::tokens::{Token, Tokenizer};

/// Indentation unit used by [`format_xml`].
pub const INDENT: &str = "  ";

/// Re-indents `xml` with two spaces per nesting level.
/// 以每層兩個空白重新縮排 XML。
///
/// Comments, processing instructions and the DOCTYPE survive; whitespace-only
/// text between tags does not. An element holding only text stays on one line
/// and an element with no content is written self-closing.
pub fn format_xml(xml: &str) -> Result<String, CodecError> {
    let tokens = Tokenizer::new(xml.trim()).collect::<Result<Vec<_>, _>>()?;
    Ok(encode(&tokens))
}

/// Serializes tokens back into indented markup.
pub fn encode(tokens: &[Token]) -> String {
    let tokens = merge_text(tokens);
    let mut out = String::new();
    let mut depth = 0usize;
    let mut last = Written::Nothing;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Start { name, attributes } => {
                new_line(&mut out, depth);
                out.push('<');
                out.push_str(name);
                for attribute in attributes {
                    out.push(' ');
                    out.push_str(&attribute.name);
                    out.push_str("=\"");
                    out.push_str(&escape(attribute.value.as_str()));
                    out.push('"');
                }
                out.push('>');
                depth += 1;
                last = Written::Open;
            }
            Token::End { name } => {
                depth = depth.saturating_sub(1);
                match last {
                    Written::Open => {
                        out.pop();
                        out.push_str("/>");
                    }
                    Written::InlineText => {
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                    Written::Nothing | Written::Block => {
                        new_line(&mut out, depth);
                        out.push_str("</");
                        out.push_str(name);
                        out.push('>');
                    }
                }
                last = Written::Block;
            }
            Token::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                let closes_next = matches!(tokens.get(index + 1), Some(Token::End { .. }));
                if matches!(last, Written::Open) && closes_next {
                    out.push_str(&partial_escape(text));
                    last = Written::InlineText;
                } else {
                    new_line(&mut out, depth);
                    out.push_str(&partial_escape(text));
                    last = Written::Block;
                }
            }
            Token::Comment(comment) => {
                new_line(&mut out, depth);
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
                last = Written::Block;
            }
            Token::Instruction(body) => {
                new_line(&mut out, depth);
                out.push_str("<?");
                out.push_str(body);
                out.push_str("?>");
                last = Written::Block;
            }
            Token::Doctype(doctype) => {
                new_line(&mut out, depth);
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype);
                out.push('>');
                last = Written::Block;
            }
        }
    }
    out
}

#[derive(Clone, Copy)]
enum Written {
    Nothing,
    Open,
    InlineText,
    Block,
}

fn new_line(out: &mut String, depth: usize) {
    if !out.is_empty() {
        out.push('\n');
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

/// Joins adjacent text tokens (text split by CDATA sections, for instance).
fn merge_text(tokens: &[Token]) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (merged.last_mut(), token) {
            (Some(Token::Text(previous)), Token::Text(next)) => previous.push_str(next),
            _ => merged.push(token.clone()),
        }
    }
    merged
}
