use std::sync::Arc;

use crate::frontend::source::SourceFile;
use crate::frontend::stream::TokenStream;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::config::lexer::{keyword, MAX_CHAR, NUMBER};

/// On-demand scanner. Lexical problems are not raised here; they come out as
/// `TokenKind::Error` tokens whose text is the message, and the parser
/// reports them when it reaches them.
pub struct Lexer {
    file: Arc<SourceFile>,
    text: String,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            file: SourceFile::new(name, text),
            text: text.to_string(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.text[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some('{') => {
                    let (line, column) = (self.line, self.column);
                    self.bump(); // Consume '{'
                    loop {
                        match self.bump() {
                            Some('}') => break,
                            Some(_) => {}
                            None => {
                                return Some(Token::new(TokenKind::Error, "Unterminated comment", line, column))
                            }
                        }
                    }
                }
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                _ => return None,
            }
        }
    }

    fn scan_token(&mut self) -> Token {
        if let Some(error) = self.skip_whitespace_and_comments() {
            return error;
        }
        let (line, column) = (self.line, self.column);
        match self.peek() {
            None => Token::new(TokenKind::Eof, "", line, column),
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => self.scan_identifier(line, column),
            Some(ch) if ch.is_ascii_digit() => self.scan_number(line, column),
            Some('"') => self.scan_string(line, column),
            Some('\'') => self.scan_char(line, column),
            Some(_) => self.scan_operator(line, column),
        }
    }

    fn scan_identifier(&mut self, line: usize, column: usize) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.bump();
        }
        let word = &self.text[start..self.pos];
        let kind = if word.eq_ignore_ascii_case("true") || word.eq_ignore_ascii_case("false") {
            TokenKind::BooleanLit
        } else {
            keyword(word).unwrap_or(TokenKind::Ident)
        };
        Token::new(kind, word, line, column)
    }

    fn scan_number(&mut self, line: usize, column: usize) -> Token {
        let rest = &self.text[self.pos..];
        let (len, is_real) = match NUMBER.captures(rest) {
            Some(caps) => (
                caps[0].len(),
                caps.name("fraction").is_some() || caps.name("exponent").is_some(),
            ),
            None => return Token::new(TokenKind::Error, "Invalid number", line, column),
        };
        let literal = rest[..len].to_string();
        for _ in 0..literal.chars().count() {
            self.bump();
        }
        if is_real {
            return Token::new(TokenKind::RealLit, literal, line, column);
        }
        // `ldc.i4` takes a 32-bit operand
        if literal.parse::<i32>().is_err() {
            return Token::new(
                TokenKind::Error,
                format!("Integer literal {} is out of range", literal),
                line,
                column,
            );
        }
        Token::new(TokenKind::IntegerLit, literal, line, column)
    }

    fn scan_string(&mut self, line: usize, column: usize) -> Token {
        self.bump(); // Consume opening quote
        let mut literal = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Token::new(TokenKind::StringLit, literal, line, column);
                }
                Some('\n') | None => {
                    return Token::new(TokenKind::Error, "Unterminated string literal", line, column)
                }
                Some(ch) => {
                    literal.push(ch);
                    self.bump();
                }
            }
        }
    }

    fn scan_char(&mut self, line: usize, column: usize) -> Token {
        self.bump(); // Consume opening quote
        match (self.peek(), self.peek_second()) {
            (Some(ch), Some('\'')) if ch > MAX_CHAR => Token::new(
                TokenKind::Error,
                "Char literal must fit in a single UTF-16 unit",
                line,
                column,
            ),
            (Some(ch), Some('\'')) if ch != '\n' => {
                self.bump();
                self.bump();
                Token::new(TokenKind::CharLit, ch.to_string(), line, column)
            }
            _ => Token::new(
                TokenKind::Error,
                "Char literal must hold exactly one character",
                line,
                column,
            ),
        }
    }

    fn scan_operator(&mut self, line: usize, column: usize) -> Token {
        let Some(ch) = self.bump() else {
            return Token::new(TokenKind::Eof, "", line, column);
        };
        let next = self.peek();
        let (kind, text) = match (ch, next) {
            (':', Some('=')) => (TokenKind::Assign, ":="),
            ('<', Some('>')) => (TokenKind::Neq, "<>"),
            ('<', Some('=')) => (TokenKind::Leq, "<="),
            ('>', Some('=')) => (TokenKind::Geq, ">="),
            (':', _) => (TokenKind::Colon, ":"),
            ('<', _) => (TokenKind::Lt, "<"),
            ('>', _) => (TokenKind::Gt, ">"),
            ('=', _) => (TokenKind::Eq, "="),
            ('+', _) => (TokenKind::Add, "+"),
            ('-', _) => (TokenKind::Sub, "-"),
            ('*', _) => (TokenKind::Mul, "*"),
            ('/', _) => (TokenKind::Div, "/"),
            (';', _) => (TokenKind::Semi, ";"),
            ('.', _) => (TokenKind::Period, "."),
            (',', _) => (TokenKind::Comma, ","),
            ('(', _) => (TokenKind::Open, "("),
            (')', _) => (TokenKind::Close, ")"),
            _ => {
                return Token::new(TokenKind::Error, format!("Unknown character '{}'", ch), line, column)
            }
        };
        if text.len() == 2 {
            self.bump();
        }
        Token::new(kind, text, line, column)
    }
}

impl TokenStream for Lexer {
    fn next_token(&mut self) -> Token {
        self.scan_token()
    }

    fn source(&self) -> &Arc<SourceFile> {
        &self.file
    }
}

// Convenience function: scan everything, up to and including `Eof`
pub fn scan(name: &str, text: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(name, text);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is(TokenKind::Eof);
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}
