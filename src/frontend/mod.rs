pub mod lexer;
pub mod parser;
pub mod source;
pub mod stream;
pub mod token;

pub use lexer::Lexer;
pub use parser::Parser;
pub use source::SourceFile;
pub use stream::{TokenList, TokenStream};
pub use token::{Token, TokenKind};
