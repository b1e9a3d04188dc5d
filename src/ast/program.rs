use crate::ast::{Declarations, Stmt};
use crate::frontend::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub declarations: Declarations,
    /// Always a `Stmt::Compound`.
    pub body: Stmt,
}

impl Block {
    pub fn new(declarations: Declarations, body: Stmt) -> Self {
        Self { declarations, body }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: Token,
    pub block: Block,
}

impl Program {
    pub fn new(name: Token, block: Block) -> Self {
        Self { name, block }
    }
}
