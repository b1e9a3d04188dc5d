use crate::ast::Expr;
use crate::frontend::token::Token;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Compound(Vec<Stmt>),
    Assign {
        name: Token,
        expr: Expr,
    },
    Write {
        newline: bool,
        args: Vec<Expr>,
    },
    If {
        condition: Expr,
        then_part: Box<Stmt>,
        else_part: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Repeat {
        body: Vec<Stmt>,
        condition: Expr,
    },
    For {
        var: Token,
        ascending: bool,
        start: Expr,
        end: Expr,
        body: Box<Stmt>,
    },
    Read {
        names: Vec<Token>,
    },
    Call {
        name: Token,
        args: Vec<Expr>,
    },
}
