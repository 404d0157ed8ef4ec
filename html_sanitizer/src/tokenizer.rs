//! Forgiving HTML tokenizer
//!
//! Lexes any string into a flat token stream. There is no error path: input
//! that cannot be lexed (an unterminated tag, quote or comment) ends the
//! stream, so whatever follows it is dropped rather than guessed at.

use crate::entities;

/// Elements whose bodies are never parsed as markup
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "textarea", "title",
];

/// A single attribute with its value already decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name
    pub name: String,
    /// Decoded value, `None` for a bare attribute
    pub value: Option<String>,
}

/// HTML token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Character data with references decoded
    Text(String),
    /// Opening tag
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    /// Closing tag
    EndTag { name: String },
    /// Unparsed body of a raw-text element
    RawText { element: String, text: String },
    /// `<!-- ... -->`
    Comment(String),
    /// Doctype, processing instruction or bogus comment
    Declaration(String),
}

/// Streaming tokenizer over a borrowed input
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    pending_raw_text: Option<String>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending_raw_text: None,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Marks the rest of the input as consumed and ends the stream
    fn abandon(&mut self) -> Option<Token> {
        self.pos = self.input.len();
        None
    }

    fn starts_markup(&self, at: usize) -> bool {
        let bytes = self.bytes();
        bytes[at] == b'<'
            && bytes
                .get(at + 1)
                .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
    }

    fn lex_text(&mut self) -> Token {
        let start = self.pos;
        let mut end = start + 1;
        while end < self.input.len() && !self.starts_markup(end) {
            end += 1;
        }
        self.pos = end;
        Token::Text(entities::decode(&self.input[start..end]))
    }

    fn lex_raw_text(&mut self, element: String) -> Token {
        let start = self.pos;
        let end = find_end_tag(self.input, start, &element).unwrap_or(self.input.len());
        self.pos = end;
        Token::RawText {
            element,
            text: self.input[start..end].to_string(),
        }
    }

    fn lex_comment(&mut self) -> Option<Token> {
        let body_start = self.pos + 4;
        let rest = &self.input[self.pos..];

        // `<!-->` and `<!--->` are complete (empty) comments
        if rest.starts_with("<!-->") {
            self.pos += 5;
            return Some(Token::Comment(String::new()));
        }
        if rest.starts_with("<!--->") {
            self.pos += 6;
            return Some(Token::Comment(String::new()));
        }

        let body = &self.input[body_start..];
        let close = [body.find("-->").map(|i| (i, 3)), body.find("--!>").map(|i| (i, 4))]
            .into_iter()
            .flatten()
            .min_by_key(|&(i, _)| i);

        match close {
            Some((i, len)) => {
                self.pos = body_start + i + len;
                Some(Token::Comment(body[..i].to_string()))
            }
            None => self.abandon(),
        }
    }

    fn lex_declaration(&mut self) -> Option<Token> {
        let body_start = self.pos + 2;
        match self.input[body_start..].find('>') {
            Some(i) => {
                self.pos = body_start + i + 1;
                Some(Token::Declaration(
                    self.input[body_start..body_start + i].to_string(),
                ))
            }
            None => self.abandon(),
        }
    }

    /// Lexes `<name attrs...>` or `</name attrs...>`
    fn lex_tag(&mut self, is_end: bool) -> Option<Token> {
        let bytes = self.bytes();
        let len = bytes.len();
        let mut i = self.pos + if is_end { 2 } else { 1 };

        let name_start = i;
        while i < len && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
            i += 1;
        }
        let name = self.input[name_start..i].to_ascii_lowercase();

        let mut attributes = Vec::new();
        let mut self_closing = false;

        loop {
            while i < len && (is_space(bytes[i]) || bytes[i] == b'/') {
                if bytes[i] == b'/' {
                    self_closing = bytes.get(i + 1) == Some(&b'>');
                }
                i += 1;
            }
            if i >= len {
                return self.abandon();
            }
            if bytes[i] == b'>' {
                i += 1;
                break;
            }
            self_closing = false;

            // An attribute name may begin with any character, including '='
            let attr_start = i;
            i += 1;
            while i < len
                && !is_space(bytes[i])
                && bytes[i] != b'/'
                && bytes[i] != b'>'
                && bytes[i] != b'='
            {
                i += 1;
            }
            let attr_name = self.input[attr_start..i].to_ascii_lowercase();

            while i < len && is_space(bytes[i]) {
                i += 1;
            }

            let mut value = None;
            if i < len && bytes[i] == b'=' {
                i += 1;
                while i < len && is_space(bytes[i]) {
                    i += 1;
                }
                if i >= len {
                    return self.abandon();
                }
                match bytes[i] {
                    quote @ (b'"' | b'\'') => {
                        let value_start = i + 1;
                        let close = bytes[value_start..].iter().position(|&b| b == quote);
                        match close {
                            Some(offset) => {
                                let raw = &self.input[value_start..value_start + offset];
                                value = Some(entities::decode_attribute(raw));
                                i = value_start + offset + 1;
                            }
                            None => return self.abandon(),
                        }
                    }
                    _ => {
                        let value_start = i;
                        while i < len && !is_space(bytes[i]) && bytes[i] != b'>' {
                            i += 1;
                        }
                        value = Some(entities::decode_attribute(&self.input[value_start..i]));
                    }
                }
            }

            attributes.push(Attribute {
                name: attr_name,
                value,
            });
        }

        self.pos = i;

        if is_end {
            return Some(Token::EndTag { name });
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.pending_raw_text = Some(name.clone());
        }

        Some(Token::StartTag {
            name,
            attributes,
            self_closing,
        })
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(element) = self.pending_raw_text.take() {
            if !self.at_end() {
                return Some(self.lex_raw_text(element));
            }
        }
        if self.at_end() {
            return None;
        }

        if !self.starts_markup(self.pos) {
            return Some(self.lex_text());
        }

        let rest = &self.input[self.pos..];
        let next = self.bytes()[self.pos + 1];
        match next {
            b'!' if rest.starts_with("<!--") => self.lex_comment(),
            b'!' | b'?' => self.lex_declaration(),
            b'/' => {
                let is_tag = self
                    .bytes()
                    .get(self.pos + 2)
                    .is_some_and(|b| b.is_ascii_alphabetic());
                if is_tag {
                    self.lex_tag(true)
                } else {
                    self.lex_declaration()
                }
            }
            _ => self.lex_tag(false),
        }
    }
}

/// Tokenizes an entire input
pub fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input).collect()
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Finds `</element` (case-insensitive) followed by a tag delimiter
fn find_end_tag(input: &str, from: usize, element: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let needle = element.as_bytes();
    let mut i = from;

    while let Some(offset) = input[i..].find("</") {
        let at = i + offset;
        let name_start = at + 2;
        let name_end = name_start + needle.len();
        if name_end <= bytes.len() && bytes[name_start..name_end].eq_ignore_ascii_case(needle) {
            let delimited = bytes
                .get(name_end)
                .map_or(true, |&b| is_space(b) || b == b'/' || b == b'>');
            if delimited {
                return Some(at);
            }
        }
        i = at + 2;
    }
    None
}
