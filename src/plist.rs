//! Minimal reader for Apple XML property lists.
//!
//! Parses a whole document into a [`Value`] tree. Structure errors (missing
//! root, stray text, truncation) are reported; scalar kinds the caller does
//! not care about (`<date>`, `<data>`) are kept as raw text.

use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, thiserror::Error)]
pub enum PlistError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed text content: {0}")]
    Text(String),
    #[error("document has no <plist> root")]
    MissingRoot,
    #[error("<plist> holds no value")]
    EmptyDocument,
    #[error("unexpected <{0}> element")]
    UnexpectedElement(String),
    #[error("unexpected closing </{0}>")]
    UnexpectedClose(String),
    #[error("stray text {0:?} between elements")]
    StrayText(String),
    #[error("unexpected end of document")]
    UnexpectedEof,
    #[error("invalid <{kind}> value {text:?}")]
    InvalidScalar { kind: &'static str, text: String },
}

/// A parsed property-list value. Dict entries keep document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Date(String),
    Data(String),
    Array(Vec<Value>),
    Dict(Vec<(String, Value)>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// First entry with the given key, when this value is a dict.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Parse one plist document from a buffered reader.
pub fn parse<R: BufRead>(input: R) -> Result<Value, PlistError> {
    Parser::new(input).document()
}

/// Structural token: element markup with blank text, comments, declarations
/// and processing instructions already skipped.
enum Token {
    Open { name: Vec<u8>, empty: bool },
    Close(Vec<u8>),
    Text(String),
    Eof,
}

impl Token {
    fn unexpected(self) -> PlistError {
        match self {
            Token::Open { name, .. } => {
                PlistError::UnexpectedElement(String::from_utf8_lossy(&name).into_owned())
            }
            Token::Close(name) => {
                PlistError::UnexpectedClose(String::from_utf8_lossy(&name).into_owned())
            }
            Token::Text(text) => PlistError::StrayText(text),
            Token::Eof => PlistError::UnexpectedEof,
        }
    }
}

struct Parser<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> Parser<R> {
    fn new(input: R) -> Self {
        Self {
            reader: Reader::from_reader(input),
            buf: Vec::new(),
        }
    }

    fn document(&mut self) -> Result<Value, PlistError> {
        match self.next_token()? {
            Token::Open { name, empty } if name == b"plist" => {
                if empty {
                    return Err(PlistError::EmptyDocument);
                }
            }
            _ => return Err(PlistError::MissingRoot),
        }

        let value = match self.next_token()? {
            Token::Open { name, empty } => self.value(&name, empty)?,
            Token::Close(name) if name == b"plist" => return Err(PlistError::EmptyDocument),
            token => return Err(token.unexpected()),
        };

        match self.next_token()? {
            Token::Close(name) if name == b"plist" => {}
            token => return Err(token.unexpected()),
        }
        match self.next_token()? {
            Token::Eof => Ok(value),
            token => Err(token.unexpected()),
        }
    }

    fn value(&mut self, name: &[u8], empty: bool) -> Result<Value, PlistError> {
        match name {
            b"dict" if empty => Ok(Value::Dict(Vec::new())),
            b"dict" => self.dict(),
            b"array" if empty => Ok(Value::Array(Vec::new())),
            b"array" => self.array(),
            b"string" => self.scalar_text(name, empty).map(Value::String),
            b"integer" => {
                let text = self.scalar_text(name, empty)?;
                text.trim()
                    .parse()
                    .map(Value::Integer)
                    .map_err(|_| PlistError::InvalidScalar {
                        kind: "integer",
                        text,
                    })
            }
            b"real" => {
                let text = self.scalar_text(name, empty)?;
                text.trim()
                    .parse()
                    .map(Value::Real)
                    .map_err(|_| PlistError::InvalidScalar { kind: "real", text })
            }
            b"true" => {
                self.scalar_text(name, empty)?;
                Ok(Value::Boolean(true))
            }
            b"false" => {
                self.scalar_text(name, empty)?;
                Ok(Value::Boolean(false))
            }
            b"date" => self.scalar_text(name, empty).map(Value::Date),
            b"data" => self.scalar_text(name, empty).map(Value::Data),
            other => Err(PlistError::UnexpectedElement(
                String::from_utf8_lossy(other).into_owned(),
            )),
        }
    }

    fn dict(&mut self) -> Result<Value, PlistError> {
        let mut entries = Vec::new();
        loop {
            match self.next_token()? {
                Token::Open { name, empty } if name == b"key" => {
                    let key = if empty {
                        String::new()
                    } else {
                        self.element_text(b"key")?
                    };
                    let value = match self.next_token()? {
                        Token::Open { name, empty } => self.value(&name, empty)?,
                        token => return Err(token.unexpected()),
                    };
                    entries.push((key, value));
                }
                Token::Close(name) if name == b"dict" => return Ok(Value::Dict(entries)),
                token => return Err(token.unexpected()),
            }
        }
    }

    fn array(&mut self) -> Result<Value, PlistError> {
        let mut items = Vec::new();
        loop {
            match self.next_token()? {
                Token::Open { name, empty } => items.push(self.value(&name, empty)?),
                Token::Close(name) if name == b"array" => return Ok(Value::Array(items)),
                token => return Err(token.unexpected()),
            }
        }
    }

    fn scalar_text(&mut self, name: &[u8], empty: bool) -> Result<String, PlistError> {
        if empty {
            Ok(String::new())
        } else {
            self.element_text(name)
        }
    }

    /// Text content of the current element, up to its closing tag. Unlike
    /// [`Parser::next_token`] this keeps whitespace-only content.
    fn element_text(&mut self, end: &[u8]) -> Result<String, PlistError> {
        let mut text = String::new();
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(t) => {
                    let chunk = t.unescape().map_err(|e| PlistError::Text(e.to_string()))?;
                    text.push_str(&chunk);
                }
                Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t.into_inner())),
                Event::End(e) if e.name().as_ref() == end => return Ok(text),
                Event::Start(e) | Event::Empty(e) => {
                    return Err(PlistError::UnexpectedElement(
                        String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    ))
                }
                Event::Eof => return Err(PlistError::UnexpectedEof),
                _ => {}
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, PlistError> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    return Ok(Token::Open {
                        name: e.name().as_ref().to_vec(),
                        empty: false,
                    })
                }
                Event::Empty(e) => {
                    return Ok(Token::Open {
                        name: e.name().as_ref().to_vec(),
                        empty: true,
                    })
                }
                Event::End(e) => return Ok(Token::Close(e.name().as_ref().to_vec())),
                Event::Text(t) => {
                    // blank text between elements is layout, not content
                    if !t.iter().all(|b| b.is_ascii_whitespace()) {
                        let text = t.unescape().map_err(|e| PlistError::Text(e.to_string()))?;
                        return Ok(Token::Text(text.into_owned()));
                    }
                }
                Event::CData(t) => {
                    return Ok(Token::Text(
                        String::from_utf8_lossy(&t.into_inner()).into_owned(),
                    ))
                }
                Event::Eof => return Ok(Token::Eof),
                _ => {}
            }
        }
    }
}
