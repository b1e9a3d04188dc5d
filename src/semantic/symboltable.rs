use std::collections::HashMap;

use crate::ast::{ConstDecl, FnDecl, Storage, Type, VarDecl};
use crate::frontend::token::Token;
use crate::utils::config::stdlib;
use crate::utils::errors::{CodeGenError, CodeGenResult};

#[derive(Debug, Clone, PartialEq)]
pub struct VarSymbol {
    pub name: String,
    pub ty: Type,
    pub storage: Storage,
}

impl VarSymbol {
    pub fn new(name: &str, ty: Type, storage: Storage) -> Self {
        Self {
            name: name.to_string(),
            ty,
            storage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineSymbol {
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub std_lib: bool,
}

/// What a name was declared as.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Const(ConstDecl),
    Var(VarSymbol),
    Routine(RoutineSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Const(decl) => &decl.name.text,
            Symbol::Var(var) => &var.name,
            Symbol::Routine(routine) => &routine.name,
        }
    }
}

impl From<&ConstDecl> for Symbol {
    fn from(decl: &ConstDecl) -> Self {
        Symbol::Const(decl.clone())
    }
}

impl From<&VarDecl> for Symbol {
    fn from(decl: &VarDecl) -> Self {
        Symbol::Var(VarSymbol::new(&decl.name.text, decl.ty, decl.storage))
    }
}

impl From<&FnDecl> for Symbol {
    fn from(decl: &FnDecl) -> Self {
        Symbol::Routine(RoutineSymbol {
            name: decl.name.text.clone(),
            params: decl.params.iter().map(|p| p.ty).collect(),
            ret: decl.ret,
            std_lib: false,
        })
    }
}

#[derive(Debug, Default)]
struct Scope {
    symbols: HashMap<String, Symbol>,
    // Routine body scope, as opposed to the program or library scope
    local: bool,
}

/// Lexical scopes, innermost last. The bottom scope holds the runtime
/// library and is never dropped.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut root = Scope::default();
        for property in stdlib::PROPERTIES {
            root.symbols.insert(
                property.name.to_string(),
                Symbol::Var(VarSymbol::new(property.name, property.ty, Storage::StdLib)),
            );
        }
        for function in stdlib::FUNCTIONS {
            root.symbols.insert(
                function.name.to_string(),
                Symbol::Routine(RoutineSymbol {
                    name: function.name.to_string(),
                    params: function.params.to_vec(),
                    ret: function.ret,
                    std_lib: true,
                }),
            );
        }
        Self { scopes: vec![root] }
    }

    pub fn push_scope(&mut self, local: bool) {
        self.scopes.push(Scope {
            symbols: HashMap::new(),
            local,
        });
    }

    /// Remove the innermost scope; the library scope stays.
    pub fn pop_scope(&mut self) -> bool {
        if self.scopes.len() <= 1 {
            return false;
        }
        self.scopes.pop();
        true
    }

    /// Insert into the innermost scope. A name already declared in that same
    /// scope is replaced and the displaced symbol handed back.
    pub fn add(&mut self, symbol: Symbol) -> Option<Symbol> {
        let scope = self.scopes.last_mut()?;
        scope.symbols.insert(symbol.name().to_string(), symbol)
    }

    // Get a symbol by name, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_with_depth(name).map(|(symbol, _)| symbol)
    }

    /// Like `lookup`, also reporting the index of the scope the name was found in.
    pub fn lookup_with_depth(&self, name: &str) -> Option<(&Symbol, usize)> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(depth, scope)| scope.symbols.get(name).map(|symbol| (symbol, depth)))
    }

    pub fn find(&self, token: &Token) -> CodeGenResult<&Symbol> {
        self.lookup(&token.text).ok_or_else(|| CodeGenError::undefined(token))
    }

    /// Resolve a call target. Variables on the way out are skipped, so the
    /// result variable of a function does not hide the function itself.
    pub fn find_routine(&self, token: &Token) -> CodeGenResult<&RoutineSymbol> {
        let mut shadowed = false;
        for scope in self.scopes.iter().rev() {
            match scope.symbols.get(&token.text) {
                Some(Symbol::Routine(routine)) => return Ok(routine),
                Some(_) => shadowed = true,
                None => {}
            }
        }
        if shadowed {
            Err(CodeGenError::NotCallable(token.text.clone()))
        } else {
            Err(CodeGenError::undefined(token))
        }
    }

    pub fn in_local_scope(&self) -> bool {
        self.scopes.last().map_or(false, |scope| scope.local)
    }

    /// Index of the innermost scope.
    pub fn current_depth(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn get_scopes_len(&self) -> usize {
        self.scopes.len()
    }
}
