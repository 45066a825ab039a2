//! JavaScript tokenizer.
//!
//! Produces the significant tokens of a source text. Whitespace and comments
//! are dropped; a token remembers whether a line break preceded it so the
//! printer can keep automatic semicolon insertion intact.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, keyword or reserved word.
    Word,
    Number,
    String,
    Template,
    Regex,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// 1-based line the token starts on.
    pub line: usize,
    pub newline_before: bool,
}

impl Token<'_> {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Word && self.text == text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub line: usize,
    pub message: &'static str,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error. {}", self.message)
    }
}

impl std::error::Error for LexError {}

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

/// Words after which a `/` starts a regular expression.
const REGEX_PREFIX_WORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case",
    "do", "else", "yield", "await",
];

/// Words an `if (...)`-style head belongs to.
pub const CONTROL_HEADS: &[&str] = &["if", "for", "while", "with"];

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'\\' || b >= 0x80
}

/// Split `source` into tokens, stopping at the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    tokens: Vec<Token<'a>>,
    /// One entry per open `(`: whether it starts a control head.
    parens: Vec<bool>,
    /// The last token is a `)` closing a control head.
    after_control_head: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            parens: Vec::new(),
            after_control_head: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek(0)?;
        self.pos += 1;
        // A `\r\n` pair counts once, at the `\n`.
        if b == b'\n' || (b == b'\r' && self.peek(0) != Some(b'\n')) {
            self.line += 1;
        }
        Some(b)
    }

    /// The next character is `\n`, `\r`, U+2028 or U+2029.
    fn at_line_terminator(&self) -> bool {
        match self.peek(0) {
            Some(b'\n' | b'\r') => true,
            Some(0xe2) => self.peek(1) == Some(0x80) && matches!(self.peek(2), Some(0xa8 | 0xa9)),
            _ => false,
        }
    }

    fn at_control_head(&self) -> bool {
        let n = self.tokens.len();
        n > 0
            && self.tokens[n - 1].kind == TokenKind::Word
            && CONTROL_HEADS.contains(&self.tokens[n - 1].text)
            && !(n > 1 && (self.tokens[n - 2].is_punct(".") || self.tokens[n - 2].is_punct("?.")))
    }

    fn error(&self, line: usize, message: &'static str) -> LexError {
        LexError { line, message }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, LexError> {
        loop {
            let newline_before = self.skip_trivia()?;
            let Some(b) = self.peek(0) else {
                return Ok(self.tokens);
            };

            let start = self.pos;
            let line = self.line;
            let mut closes_control_head = false;
            let kind = match b {
                b'"' | b'\'' => {
                    self.string(b)?;
                    TokenKind::String
                }
                b'`' => {
                    self.template()?;
                    TokenKind::Template
                }
                b'0'..=b'9' => {
                    self.number();
                    TokenKind::Number
                }
                b'.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => {
                    self.number();
                    TokenKind::Number
                }
                b'/' if self.regex_allowed() => {
                    self.regex()?;
                    TokenKind::Regex
                }
                b if is_ident_byte(b) => {
                    while self.peek(0).is_some_and(is_ident_byte) {
                        self.bump();
                    }
                    TokenKind::Word
                }
                _ => {
                    let rest = &self.src[self.pos..];
                    let punct = PUNCTUATORS
                        .iter()
                        .find(|p| rest.starts_with(**p))
                        .ok_or_else(|| self.error(line, "illegal character"))?;
                    self.pos += punct.len();
                    match *punct {
                        "(" => {
                            let control = self.at_control_head();
                            self.parens.push(control);
                        }
                        ")" => closes_control_head = self.parens.pop().unwrap_or(false),
                        _ => {}
                    }
                    TokenKind::Punct
                }
            };

            self.after_control_head = closes_control_head;
            self.tokens.push(Token {
                kind,
                text: &self.src[start..self.pos],
                line,
                newline_before,
            });
        }
    }

    /// Skip whitespace and comments. Returns whether a line break was seen.
    fn skip_trivia(&mut self) -> Result<bool, LexError> {
        let mut newline = false;
        while let Some(b) = self.peek(0) {
            match b {
                b'\n' | b'\r' => {
                    newline = true;
                    self.bump();
                }
                b' ' | b'\t' | 0x0b | 0x0c => {
                    self.bump();
                }
                b'/' if self.peek(1) == Some(b'/') => {
                    while self.peek(0).is_some() && !self.at_line_terminator() {
                        self.bump();
                    }
                }
                b'/' if self.peek(1) == Some(b'*') => {
                    let line = self.line;
                    self.pos += 2;
                    loop {
                        match self.bump() {
                            Some(b'*') if self.peek(0) == Some(b'/') => {
                                self.pos += 1;
                                break;
                            }
                            Some(b'\n' | b'\r') => newline = true,
                            Some(0xe2)
                                if self.peek(0) == Some(0x80)
                                    && matches!(self.peek(1), Some(0xa8 | 0xa9)) =>
                            {
                                newline = true
                            }
                            Some(_) => {}
                            None => return Err(self.error(line, "unterminated comment")),
                        }
                    }
                }
                // U+00A0, U+FEFF and the Unicode line separators.
                0xc2 if self.peek(1) == Some(0xa0) => self.pos += 2,
                0xef if self.src[self.pos..].starts_with('\u{feff}') => self.pos += 3,
                0xe2 if self.src[self.pos..].starts_with(['\u{2028}', '\u{2029}']) => {
                    newline = true;
                    self.pos += 3;
                }
                _ => break,
            }
        }
        Ok(newline)
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(prev) => match prev.kind {
                TokenKind::Punct => match prev.text {
                    // `if (x) /re/.test(y)`
                    ")" => self.after_control_head,
                    "]" | "}" => false,
                    _ => true,
                },
                TokenKind::Word => REGEX_PREFIX_WORDS.contains(&prev.text),
                _ => false,
            },
        }
    }

    fn string(&mut self, quote: u8) -> Result<(), LexError> {
        let line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some(b) if b == quote => return Ok(()),
                Some(b'\\') => {
                    if self.bump() == Some(b'\r') && self.peek(0) == Some(b'\n') {
                        self.bump();
                    }
                }
                Some(b'\n' | b'\r') | None => {
                    return Err(self.error(line, "unterminated string literal"))
                }
                Some(_) => {}
            }
        }
    }

    fn template(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.bump();
        loop {
            match self.bump() {
                Some(b'`') => return Ok(()),
                Some(b'\\') => {
                    self.bump();
                }
                Some(b'$') if self.peek(0) == Some(b'{') => {
                    self.bump();
                    self.substitution(line)?;
                }
                Some(_) => {}
                None => return Err(self.error(line, "unterminated template literal")),
            }
        }
    }

    /// Skip the code of a `${...}` substitution, up to its closing brace.
    fn substitution(&mut self, line: usize) -> Result<(), LexError> {
        let mut depth = 1usize;
        while let Some(b) = self.peek(0) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return Ok(());
                    }
                }
                b'"' | b'\'' => {
                    self.string(b)?;
                    continue;
                }
                b'`' => {
                    self.template()?;
                    continue;
                }
                b'/' if matches!(self.peek(1), Some(b'/') | Some(b'*')) => {
                    self.skip_trivia()?;
                    continue;
                }
                _ => {}
            }
            self.bump();
        }
        Err(self.error(line, "unterminated template literal"))
    }

    fn regex(&mut self) -> Result<(), LexError> {
        let line = self.line;
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                Some(b'/') if !in_class => break,
                Some(b'[') => in_class = true,
                Some(b']') => in_class = false,
                Some(b'\\') => {
                    if matches!(self.bump(), Some(b'\n' | b'\r') | None) {
                        return Err(self.error(line, "unterminated regular expression literal"));
                    }
                }
                Some(b'\n' | b'\r') | None => {
                    return Err(self.error(line, "unterminated regular expression literal"))
                }
                Some(_) => {}
            }
        }
        while self.peek(0).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.bump();
        }
        Ok(())
    }

    fn number(&mut self) {
        let radix_prefixed = self.peek(0) == Some(b'0')
            && matches!(self.peek(1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B'));
        let mut seen_dot = false;
        let mut seen_exponent = false;

        while let Some(b) = self.peek(0) {
            match b {
                b'.' if !seen_dot && !seen_exponent && !radix_prefixed => seen_dot = true,
                b'e' | b'E' if !radix_prefixed => {
                    seen_exponent = true;
                    if matches!(self.peek(1), Some(b'+' | b'-')) {
                        self.bump();
                    }
                }
                b if b.is_ascii_alphanumeric() || b == b'_' => {}
                _ => break,
            }
            self.bump();
        }
    }
}
