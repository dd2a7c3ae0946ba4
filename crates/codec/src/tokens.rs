//! Thin token layer over `quick_xml` shared by the decoder and the formatter.
//! 以 `quick_xml` 為基礎的標記層，供解碼器與格式化器共用。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::CodecError;

/// A single attribute with its value already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One lexical unit of an XML document.
/// XML 文件中的單一語彙單元。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Opening tag. `name` is the qualified name as written.
    Start {
        name: String,
        attributes: Vec<Attribute>,
    },
    End {
        name: String,
    },
    /// Character data with entities resolved. CDATA sections arrive here too.
    Text(String),
    Comment(String),
    /// Processing instruction or XML declaration; holds what sits between `<?` and `?>`.
    Instruction(String),
    Doctype(String),
}

/// Strips a namespace prefix: `soap:Body` becomes `Body`.
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map_or(qualified, |(_, local)| local)
}

/// Streams [`Token`]s out of a document.
///
/// Self-closing elements are expanded into a `Start`/`End` pair. Reaching the
/// end of input with elements still open yields a [`CodecError::Malformed`],
/// after which the iterator is exhausted.
pub struct Tokenizer<'a> {
    reader: Reader<&'a [u8]>,
    open: Vec<String>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.expand_empty_elements(true);
        Self {
            reader,
            open: Vec::new(),
            finished: false,
        }
    }

    fn fail(&mut self, message: impl std::fmt::Display) -> Option<Result<Token, CodecError>> {
        self.finished = true;
        let position = self.reader.buffer_position();
        Some(Err(CodecError::malformed_at(position, message)))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => return self.fail(err),
            };
            let token = match event {
                Event::Start(start) => match start_token(&start) {
                    Ok(token) => {
                        if let Token::Start { name, .. } = &token {
                            self.open.push(name.clone());
                        }
                        token
                    }
                    Err(message) => return self.fail(message),
                },
                Event::End(end) => {
                    let name = match utf8(end.name().as_ref()) {
                        Ok(name) => name,
                        Err(message) => return self.fail(message),
                    };
                    match self.open.pop() {
                        Some(open) if open == name => Token::End { name },
                        Some(open) => {
                            return self.fail(format!("expected </{open}>, found </{name}>"))
                        }
                        None => return self.fail(format!("unexpected closing tag </{name}>")),
                    }
                }
                Event::Text(text) => match text.unescape() {
                    Ok(text) => Token::Text(text.into_owned()),
                    Err(err) => return self.fail(err),
                },
                Event::CData(data) => Token::Text(String::from_utf8_lossy(&data).into_owned()),
                Event::Comment(comment) => {
                    Token::Comment(String::from_utf8_lossy(&comment).into_owned())
                }
                Event::Decl(decl) => {
                    Token::Instruction(String::from_utf8_lossy(&decl).into_owned())
                }
                Event::PI(instruction) => {
                    Token::Instruction(String::from_utf8_lossy(&instruction).into_owned())
                }
                Event::DocType(doctype) => {
                    Token::Doctype(String::from_utf8_lossy(&doctype).trim().to_string())
                }
                // Unreachable with expanded empty elements.
                Event::Empty(_) => continue,
                Event::Eof => {
                    if let Some(open) = self.open.last().cloned() {
                        return self.fail(format!(
                            "unexpected end of document, <{open}> is not closed"
                        ));
                    }
                    self.finished = true;
                    return None;
                }
            };
            return Some(Ok(token));
        }
    }
}

fn start_token(start: &BytesStart<'_>) -> Result<Token, String> {
    let name = utf8(start.name().as_ref())?;
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        let value = attribute.unescape_value().map_err(|err| err.to_string())?;
        attributes.push(Attribute {
            name: utf8(attribute.key.as_ref())?,
            value: value.into_owned(),
        });
    }
    Ok(Token::Start { name, attributes })
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|err| format!("name is not valid UTF-8: {err}"))
}
