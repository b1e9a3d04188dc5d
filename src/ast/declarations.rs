use crate::ast::{Block, Type};
use crate::frontend::token::Token;

/// Where a variable lives; fixed when the variable is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Static field of the program class.
    Global,
    /// Local slot of a routine body.
    Local,
    /// Routine parameter, read-only.
    Argument,
    /// Property of the runtime support library.
    StdLib,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: Token,
    /// A literal token; the constant is inlined wherever it is read.
    pub value: Token,
}

impl ConstDecl {
    pub fn ty(&self) -> Type {
        Type::from_token(self.value.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub ty: Type,
    pub storage: Storage,
}

impl VarDecl {
    pub fn new(name: Token, ty: Type, storage: Storage) -> Self {
        Self { name, ty, storage }
    }
}

/// A function, or a procedure when `ret` is `Type::Void`.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Token,
    pub params: Vec<VarDecl>,
    pub ret: Type,
    pub block: Block,
}

impl FnDecl {
    pub fn is_procedure(&self) -> bool {
        self.ret == Type::Void
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declarations {
    pub consts: Vec<ConstDecl>,
    pub vars: Vec<VarDecl>,
    pub funcs: Vec<FnDecl>,
}
