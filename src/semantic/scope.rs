use crate::semantic::symboltable::SymbolTable;

/// Anything that walks the tree with a symbol table in hand.
///
/// Scopes are only ever entered through `with_scope`, which pops the scope
/// again however the body returns, so the stack stays balanced even when
/// compilation is abandoned halfway through a routine.
pub trait Scoped {
    fn symbols(&mut self) -> &mut SymbolTable;

    fn with_scope<T, E, F>(&mut self, local: bool, body: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        self.symbols().push_scope(local);
        let result = body(self);
        self.symbols().pop_scope();
        result
    }
}
