pub mod scope;
pub mod symboltable;
pub mod typecheck;

pub use scope::Scoped;
pub use symboltable::{RoutineSymbol, Symbol, SymbolTable, VarSymbol};
pub use typecheck::TypeChecker;
