use std::sync::Arc;

use crate::frontend::source::SourceFile;
use crate::frontend::token::{Token, TokenKind};

/// The parser's view of the scanner: one token at a time, `Eof` forever
/// once the input is exhausted.
pub trait TokenStream {
    fn next_token(&mut self) -> Token;

    /// The text the tokens came from, for diagnostics.
    fn source(&self) -> &Arc<SourceFile>;
}

/// Tokens that were produced up front.
pub struct TokenList {
    tokens: std::vec::IntoIter<Token>,
    source: Arc<SourceFile>,
    last: (usize, usize),
}

impl TokenList {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_source(tokens, SourceFile::anonymous())
    }

    pub fn with_source(tokens: Vec<Token>, source: Arc<SourceFile>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            source,
            last: (1, 1),
        }
    }
}

impl TokenStream for TokenList {
    fn next_token(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last = (token.line, token.column);
                token
            }
            None => Token::new(TokenKind::Eof, "", self.last.0, self.last.1),
        }
    }

    fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }
}
