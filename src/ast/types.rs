use std::fmt;

use crate::frontend::token::TokenKind;

/// Semantic type carried by every expression and declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Real,
    Bool,
    Char,
    String,
    Void,
    Unknown,
}

impl Type {
    /// Type of a literal token, or of a type keyword in a declaration.
    pub fn from_token(kind: TokenKind) -> Type {
        match kind {
            TokenKind::IntegerLit | TokenKind::Integer => Type::Integer,
            TokenKind::RealLit | TokenKind::Real => Type::Real,
            TokenKind::BooleanLit | TokenKind::Boolean => Type::Bool,
            TokenKind::CharLit | TokenKind::Char => Type::Char,
            TokenKind::StringLit | TokenKind::String => Type::String,
            _ => Type::Unknown,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Real)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Integer => "integer",
            Type::Real => "real",
            Type::Bool => "boolean",
            Type::Char => "char",
            Type::String => "string",
            Type::Void => "void",
            Type::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
