//! Line-oriented tokenizer with Python-style indentation tracking.
//!
//! Blank and comment-only lines produce no tokens. Every logical line ends in
//! a `Newline`, and changes in leading whitespace are reported as
//! `Indent`/`Dedent` pairs. Newlines inside parentheses or after a trailing
//! backslash continue the current logical line.

use crate::error::ConvertError;

const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Name(String),
    Int(i64),
    Plus,
    Minus,
    Star,
    Slash,
    Gt,
    Ge,
    Lt,
    Le,
    EqEq,
    NotEq,
    Assign,
    LParen,
    RParen,
    Comma,
    Colon,
    Newline,
    Indent,
    Dedent,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, ConvertError> {
    Lexer::default().run(source)
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    indents: Vec<usize>,
    paren_depth: usize,
    continued: bool,
}

impl Lexer {
    fn run(mut self, source: &str) -> Result<Vec<Token>, ConvertError> {
        let mut last_line = 0;
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            last_line = line;
            self.physical_line(raw, line)?;
        }

        let end = last_line.max(1);
        if self.paren_depth > 0 {
            return Err(ConvertError::syntax(end, "'(' was never closed"));
        }
        if self.continued {
            return Err(ConvertError::syntax(end, "unexpected end of file after '\\'"));
        }
        self.finish_logical_line(end);
        for _ in self.indents.drain(..) {
            self.tokens.push(Token {
                kind: TokenKind::Dedent,
                line: end,
            });
        }
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line: end,
        });
        Ok(self.tokens)
    }

    fn physical_line(&mut self, raw: &str, line: usize) -> Result<(), ConvertError> {
        let joining = self.paren_depth > 0 || self.continued;
        self.continued = false;

        let (width, rest) = split_indentation(raw);
        let body = rest.trim_end();
        if !joining && (body.is_empty() || body.starts_with('#')) {
            return Ok(());
        }
        if !joining {
            self.indent_to(width, line)?;
        }

        let chars: Vec<char> = body.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                ' ' | '\t' | '\x0c' => i += 1,
                '#' => break,
                '\\' if i + 1 == chars.len() => {
                    self.continued = true;
                    i += 1;
                }
                '0'..='9' => {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    if i < chars.len() && (chars[i] == '.' || chars[i] == 'e' || chars[i] == 'E') {
                        return Err(ConvertError::unsupported(line, "floating-point literal"));
                    }
                    if i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                        return Err(ConvertError::syntax(line, "invalid decimal literal"));
                    }
                    let digits: String = chars[start..i].iter().collect();
                    if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
                        return Err(ConvertError::syntax(
                            line,
                            "leading zeros in decimal integer literals are not permitted",
                        ));
                    }
                    let value = digits
                        .parse::<i64>()
                        .map_err(|_| ConvertError::syntax(line, format!("integer literal {digits} is too large")))?;
                    self.push(TokenKind::Int(value), line);
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let start = i;
                    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                        i += 1;
                    }
                    let name: String = chars[start..i].iter().collect();
                    self.push(TokenKind::Name(name), line);
                }
                '\'' | '"' => return Err(ConvertError::unsupported(line, "string literal")),
                _ => {
                    let next = chars.get(i + 1).copied();
                    let (kind, len) = match (c, next) {
                        ('>', Some('=')) => (TokenKind::Ge, 2),
                        ('<', Some('=')) => (TokenKind::Le, 2),
                        ('=', Some('=')) => (TokenKind::EqEq, 2),
                        ('!', Some('=')) => (TokenKind::NotEq, 2),
                        ('>', _) => (TokenKind::Gt, 1),
                        ('<', _) => (TokenKind::Lt, 1),
                        ('=', _) => (TokenKind::Assign, 1),
                        ('+', _) => (TokenKind::Plus, 1),
                        ('-', _) => (TokenKind::Minus, 1),
                        ('*', _) => (TokenKind::Star, 1),
                        ('/', _) => (TokenKind::Slash, 1),
                        (',', _) => (TokenKind::Comma, 1),
                        (':', _) => (TokenKind::Colon, 1),
                        ('(', _) => {
                            self.paren_depth += 1;
                            (TokenKind::LParen, 1)
                        }
                        (')', _) => {
                            if self.paren_depth == 0 {
                                return Err(ConvertError::syntax(line, "unmatched ')'"));
                            }
                            self.paren_depth -= 1;
                            (TokenKind::RParen, 1)
                        }
                        _ => {
                            return Err(ConvertError::syntax(
                                line,
                                format!("unexpected character '{c}'"),
                            ))
                        }
                    };
                    self.push(kind, line);
                    i += len;
                }
            }
        }

        if self.paren_depth == 0 && !self.continued {
            self.finish_logical_line(line);
        }
        Ok(())
    }

    fn indent_to(&mut self, width: usize, line: usize) -> Result<(), ConvertError> {
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, line);
            return Ok(());
        }
        while self.indents.last().is_some_and(|&level| level > width) {
            self.indents.pop();
            self.push(TokenKind::Dedent, line);
        }
        if self.indents.last().copied().unwrap_or(0) != width {
            return Err(ConvertError::Indentation {
                line,
                message: "unindent does not match any outer indentation level".into(),
            });
        }
        Ok(())
    }

    fn finish_logical_line(&mut self, line: usize) {
        let open = self
            .tokens
            .last()
            .is_some_and(|token| !matches!(token.kind, TokenKind::Newline | TokenKind::Dedent));
        if open {
            self.push(TokenKind::Newline, line);
        }
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }
}

fn split_indentation(raw: &str) -> (usize, &str) {
    let mut width = 0;
    for (offset, c) in raw.char_indices() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
            '\x0c' => width = 0,
            _ => return (width, &raw[offset..]),
        }
    }
    (width, "")
}

#[cfg(test)]
#[path = "tests/lexer_tests.rs"]
mod tests;
