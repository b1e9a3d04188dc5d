use psic::ast::{Storage, Type};
use psic::errors::CodeGenError;
use psic::frontend::token::Token;
use psic::semantic::scope::Scoped;
use psic::semantic::symboltable::{RoutineSymbol, Symbol, SymbolTable, VarSymbol};

fn var(name: &str, ty: Type, storage: Storage) -> Symbol {
    Symbol::Var(VarSymbol::new(name, ty, storage))
}

fn var_type(table: &SymbolTable, name: &str) -> Option<Type> {
    match table.find(&Token::ident(name)) {
        Ok(Symbol::Var(v)) => Some(v.ty),
        _ => None,
    }
}

struct Walker {
    table: SymbolTable,
}

impl Scoped for Walker {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_table_creation() {
        let table = SymbolTable::new();
        assert_eq!(table.get_scopes_len(), 1);
        assert!(!table.in_local_scope());
    }

    #[test]
    fn test_standard_library_is_visible() -> Result<(), CodeGenError> {
        let table = SymbolTable::new();
        match table.find(&Token::ident("pi"))? {
            Symbol::Var(pi) => {
                assert_eq!(pi.ty, Type::Real);
                assert_eq!(pi.storage, Storage::StdLib);
            }
            other => panic!("pi should be a variable, found {:?}", other),
        }
        let sqrt = table.find_routine(&Token::ident("sqrt"))?;
        assert!(sqrt.std_lib);
        assert_eq!(sqrt.params, vec![Type::Real]);
        assert_eq!(sqrt.ret, Type::Real);
        assert!(table.lookup("abs").is_some());
        assert!(table.lookup("random").is_some());
        Ok(())
    }

    #[test]
    fn test_insert_and_find_symbol() -> Result<(), CodeGenError> {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        assert!(table.add(var("x", Type::Integer, Storage::Global)).is_none());
        match table.find(&Token::ident("x"))? {
            Symbol::Var(v) => assert_eq!(v.storage, Storage::Global),
            other => panic!("unexpected symbol {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_find_undefined_carries_location() {
        let table = SymbolTable::new();
        let token = Token::new(psic::frontend::token::TokenKind::Ident, "ghost", 7, 3);
        let err = table.find(&token).unwrap_err();
        assert_eq!(
            err,
            CodeGenError::UndefinedSymbol {
                name: "ghost".to_string(),
                line: 7,
                column: 3
            }
        );
    }

    #[test]
    fn test_redeclaration_replaces_and_returns_previous() {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        table.add(var("x", Type::Integer, Storage::Global));
        let displaced = table.add(var("x", Type::Real, Storage::Global));
        assert_eq!(displaced, Some(var("x", Type::Integer, Storage::Global)));
        assert_eq!(var_type(&table, "x"), Some(Type::Real));
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        table.add(var("x", Type::Integer, Storage::Global));

        table.push_scope(true);
        assert!(table.in_local_scope());
        table.add(var("x", Type::String, Storage::Local));
        assert_eq!(var_type(&table, "x"), Some(Type::String));
        assert!(table.pop_scope());

        assert_eq!(var_type(&table, "x"), Some(Type::Integer));
        assert!(!table.in_local_scope());
    }

    #[test]
    fn test_lookup_with_depth() {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        table.add(var("g", Type::Integer, Storage::Global));
        table.push_scope(true);
        table.add(var("l", Type::Integer, Storage::Local));

        assert_eq!(table.current_depth(), 2);
        assert_eq!(table.lookup_with_depth("g").map(|(_, d)| d), Some(1));
        assert_eq!(table.lookup_with_depth("l").map(|(_, d)| d), Some(2));
        assert_eq!(table.lookup_with_depth("pi").map(|(_, d)| d), Some(0));
        assert!(table.lookup_with_depth("missing").is_none());
    }

    #[test]
    fn test_library_scope_cannot_be_dropped() {
        let mut table = SymbolTable::new();
        assert!(!table.pop_scope());
        assert!(table.lookup("pi").is_some());
    }

    #[test]
    fn test_find_routine_skips_result_variable() -> Result<(), CodeGenError> {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        table.add(Symbol::Routine(RoutineSymbol {
            name: "fact".to_string(),
            params: vec![Type::Integer],
            ret: Type::Integer,
            std_lib: false,
        }));
        table.push_scope(true);
        table.add(var("fact", Type::Integer, Storage::Local));

        assert!(matches!(table.find(&Token::ident("fact"))?, Symbol::Var(_)));
        let routine = table.find_routine(&Token::ident("fact"))?;
        assert_eq!(routine.ret, Type::Integer);
        assert!(!routine.std_lib);
        Ok(())
    }

    #[test]
    fn test_find_routine_rejects_variables() {
        let mut table = SymbolTable::new();
        table.push_scope(false);
        table.add(var("x", Type::Integer, Storage::Global));
        assert_eq!(
            table.find_routine(&Token::ident("x")).unwrap_err(),
            CodeGenError::NotCallable("x".to_string())
        );
        assert!(matches!(
            table.find_routine(&Token::ident("nothing")),
            Err(CodeGenError::UndefinedSymbol { .. })
        ));
    }

    #[test]
    fn test_with_scope_balances_on_success() -> Result<(), CodeGenError> {
        let mut walker = Walker {
            table: SymbolTable::new(),
        };
        let seen = walker.with_scope(true, |w| {
            w.table.add(var("tmp", Type::Integer, Storage::Local));
            assert!(w.table.in_local_scope());
            Ok::<_, CodeGenError>(w.table.get_scopes_len())
        })?;
        assert_eq!(seen, 2);
        assert_eq!(walker.table.get_scopes_len(), 1);
        assert!(walker.table.lookup("tmp").is_none());
        Ok(())
    }

    #[test]
    fn test_with_scope_balances_on_failure() {
        let mut walker = Walker {
            table: SymbolTable::new(),
        };
        let result: Result<(), CodeGenError> = walker.with_scope(false, |w| {
            w.with_scope(true, |w| {
                w.table.add(var("tmp", Type::Integer, Storage::Local));
                Err(CodeGenError::unsupported("bail out"))
            })
        });
        assert!(result.is_err());
        assert_eq!(walker.table.get_scopes_len(), 1);
        assert!(walker.table.lookup("tmp").is_none());
    }
}
