//! Trivia-aware re-scanner over raw source text.
//!
//! The swc parse discards comments and token boundaries, so tokens and
//! comments are recovered by scanning the text again. Context-dependent
//! lexemes (regular expressions, template continuations, JSX text and names,
//! the `>` that closes a type argument list) cannot be told apart by the
//! scanner alone; [`LexicalHints`] records, from the native tree, which lexing
//! mode applies at a given offset.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Boolean,
    Identifier,
    Keyword,
    Null,
    Numeric,
    Punctuator,
    String,
    RegularExpression,
    Template,
    #[serde(rename = "JSXIdentifier")]
    JsxIdentifier,
    #[serde(rename = "JSXText")]
    JsxText,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Boolean => "Boolean",
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Null => "Null",
            TokenKind::Numeric => "Numeric",
            TokenKind::Punctuator => "Punctuator",
            TokenKind::String => "String",
            TokenKind::RegularExpression => "RegularExpression",
            TokenKind::Template => "Template",
            TokenKind::JsxIdentifier => "JSXIdentifier",
            TokenKind::JsxText => "JSXText",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentKind {
    Block,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    Token { kind: TokenKind, start: u32, end: u32 },
    Comment { kind: CommentKind, start: u32, end: u32 },
}

/// Lexing mode forced at an exact offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Regex { end: u32 },
    /// A `}` closing a template placeholder; scanning resumes in template mode.
    TemplateContinuation,
    JsxText { end: u32 },
    JsxIdentifier { end: u32 },
    JsxString { end: u32 },
    /// A lone `<` or `>` delimiting a type parameter/argument list.
    SingleAngle,
}

#[derive(Debug, Clone, Default)]
pub struct LexicalHints {
    hints: HashMap<u32, Hint>,
}

impl LexicalHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, offset: u32, hint: Hint) {
        self.hints.entry(offset).or_insert(hint);
    }

    pub fn get(&self, offset: u32) -> Option<Hint> {
        self.hints.get(&offset).copied()
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Classifies an identifier-like word the way ESTree token lists do.
pub fn word_token_kind(word: &str) -> TokenKind {
    match word {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        w if is_keyword(w) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|rest| rest.chars().next())
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$' || c == '\\' || (!c.is_ascii() && c.is_alphabetic())
}

pub fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c)
        || c.is_ascii_digit()
        || c == '\u{200C}'
        || c == '\u{200D}'
        || (!c.is_ascii() && c.is_alphanumeric())
}

/// Skips whitespace and comments starting at `pos`.
pub fn skip_trivia(text: &str, mut pos: usize) -> usize {
    loop {
        let Some(c) = char_at(text, pos) else {
            return pos;
        };
        if is_whitespace(c) {
            pos += c.len_utf8();
        } else if text[pos..].starts_with("//") {
            pos = line_comment_end(text, pos);
        } else if text[pos..].starts_with("/*") {
            pos = block_comment_end(text, pos);
        } else {
            return pos;
        }
    }
}

fn line_comment_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| is_line_terminator(*c))
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn block_comment_end(text: &str, pos: usize) -> usize {
    text[pos + 2..]
        .find("*/")
        .map(|i| pos + 2 + i + 2)
        .unwrap_or(text.len())
}

/// Returns the end of the identifier word starting at `pos`, if any.
pub fn scan_word(text: &str, pos: usize) -> Option<usize> {
    let first = char_at(text, pos)?;
    if !is_identifier_start(first) {
        return None;
    }
    let mut end = pos;
    while let Some(c) = char_at(text, end) {
        if c == '\\' {
            // \uXXXX or \u{...}
            end += 1;
            if text[end..].starts_with("u{") {
                end = text[end..].find('}').map(|i| end + i + 1).unwrap_or(text.len());
            } else {
                end = (end + 5).min(text.len());
            }
        } else if is_identifier_part(c) {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    Some(end)
}

/// Finds the first occurrence of the punctuation byte `target` at or after
/// `pos`, skipping trivia, strings and identifier words. Stops at `limit`.
pub fn find_punctuation(text: &str, mut pos: usize, limit: usize, target: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    let limit = limit.min(text.len());
    while pos < limit {
        pos = skip_trivia(text, pos);
        if pos >= limit {
            break;
        }
        let b = bytes[pos];
        if b == target {
            return Some(pos);
        }
        if b == b'"' || b == b'\'' {
            pos = string_end(text, pos);
        } else if let Some(end) = scan_word(text, pos) {
            pos = end;
        } else {
            pos += char_at(text, pos).map(char::len_utf8).unwrap_or(1);
        }
    }
    None
}

fn string_end(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[pos];
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' | b'\r' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Scans template characters after a '`' or a placeholder-closing '}' up to and
/// including the next '`' or '${'.
pub fn template_span_end(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return i + 1,
            b'$' if bytes.get(i + 1) == Some(&b'{') => return i + 2,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn number_end(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos;
    let radix_prefix = bytes[i] == b'0'
        && matches!(bytes.get(i + 1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'));
    if radix_prefix {
        i += 2;
        while i < bytes.len() && (bytes[i].is_ascii_hexdigit() || bytes[i] == b'_') {
            i += 1;
        }
    } else {
        while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
                i += 1;
            }
        }
        if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
            let mut j = i + 1;
            if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
                j += 1;
            }
            if j < bytes.len() && bytes[j].is_ascii_digit() {
                i = j;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_') {
                    i += 1;
                }
            }
        }
    }
    if i < bytes.len() && bytes[i] == b'n' {
        i += 1;
    }
    i
}

pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    hints: &'a LexicalHints,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str, hints: &'a LexicalHints) -> Self {
        let pos = if text.starts_with("#!") {
            line_comment_end(text, 0)
        } else {
            0
        };
        Self { text, pos, hints }
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Lexeme {
        let end = end.clamp(start + 1, self.text.len().max(start + 1));
        self.pos = end.min(self.text.len());
        Lexeme::Token {
            kind,
            start: start as u32,
            end: self.pos as u32,
        }
    }

    fn hinted(&mut self, hint: Hint, start: usize) -> Lexeme {
        match hint {
            Hint::Regex { end } => self.token(TokenKind::RegularExpression, start, end as usize),
            Hint::TemplateContinuation => {
                let end = template_span_end(self.text, start);
                self.token(TokenKind::Template, start, end)
            }
            Hint::JsxText { end } | Hint::JsxString { end } => {
                self.token(TokenKind::JsxText, start, end as usize)
            }
            Hint::JsxIdentifier { end } => self.token(TokenKind::JsxIdentifier, start, end as usize),
            Hint::SingleAngle => self.token(TokenKind::Punctuator, start, start + 1),
        }
    }

    fn punctuator(&mut self, start: usize) -> Lexeme {
        let rest = &self.text[start..];
        for p in PUNCTUATORS {
            if rest.starts_with(p) {
                // `a ? .5 : b` is a conditional, not optional chaining.
                if *p == "?."
                    && rest
                        .as_bytes()
                        .get(2)
                        .is_some_and(|b| b.is_ascii_digit())
                {
                    continue;
                }
                return self.token(TokenKind::Punctuator, start, start + p.len());
            }
        }
        let width = char_at(self.text, start).map(char::len_utf8).unwrap_or(1);
        self.token(TokenKind::Punctuator, start, start + width)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        let text = self.text;
        loop {
            let c = char_at(text, self.pos)?;
            let start = self.pos;
            // JSX text may begin with whitespace.
            if let Some(hint) = self.hints.get(start as u32) {
                return Some(self.hinted(hint, start));
            }
            if is_whitespace(c) {
                self.pos += c.len_utf8();
                continue;
            }
            let rest = &text[start..];
            if rest.starts_with("//") {
                self.pos = line_comment_end(text, start);
                return Some(Lexeme::Comment {
                    kind: CommentKind::Line,
                    start: start as u32,
                    end: self.pos as u32,
                });
            }
            if rest.starts_with("/*") {
                self.pos = block_comment_end(text, start);
                return Some(Lexeme::Comment {
                    kind: CommentKind::Block,
                    start: start as u32,
                    end: self.pos as u32,
                });
            }

            if let Some(end) = scan_word(text, start) {
                let kind = word_token_kind(&text[start..end]);
                return Some(self.token(kind, start, end));
            }

            let next_is_digit = rest.as_bytes().get(1).is_some_and(|b| b.is_ascii_digit());
            return Some(match c {
                '0'..='9' => {
                    let end = number_end(text, start);
                    self.token(TokenKind::Numeric, start, end)
                }
                '.' if next_is_digit => {
                    let end = number_end(text, start);
                    self.token(TokenKind::Numeric, start, end)
                }
                '"' | '\'' => {
                    let end = string_end(text, start);
                    self.token(TokenKind::String, start, end)
                }
                '`' => {
                    let end = template_span_end(text, start);
                    self.token(TokenKind::Template, start, end)
                }
                '#' => match scan_word(text, start + 1) {
                    Some(end) => self.token(TokenKind::Identifier, start, end),
                    None => self.punctuator(start),
                },
                _ => self.punctuator(start),
            });
        }
    }
}
