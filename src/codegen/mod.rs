pub mod code_emitter;
pub mod expression_handlers;
pub mod labels;
pub mod procedure_handlers;
pub mod statement_handlers;
pub mod symbol_helpers;

use std::mem;

use crate::ast::Program;
use crate::codegen::code_emitter::StringCodeEmitter;
use crate::codegen::labels::{Label, LabelAllocator};
use crate::semantic::scope::Scoped;
use crate::semantic::symboltable::SymbolTable;
use crate::utils::errors::CodeGenResult;

/// Lowers a typed program to IL assembly text.
///
/// The generator owns everything it mutates: the output buffer, the label
/// counter and the symbol table. Routine bodies are produced in a buffer of
/// their own and parked in `methods` until the enclosing class body is
/// written, so a nested routine never lands inside another method.
pub struct CodeGenerator {
    pub(crate) code: String,
    pub(crate) methods: Vec<String>,
    pub(crate) labels: LabelAllocator,
    pub(crate) symbol_table: SymbolTable,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoped for CodeGenerator {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            code: String::with_capacity(4096),
            methods: Vec::new(),
            labels: LabelAllocator::new(),
            symbol_table: SymbolTable::new(),
        }
    }

    pub fn generate(mut self, program: &Program) -> CodeGenResult<String> {
        procedure_handlers::handle_program(&mut self, program)?;
        Ok(self.code)
    }

    pub(crate) fn emitter(&mut self) -> StringCodeEmitter<'_> {
        StringCodeEmitter::new(&mut self.code)
    }

    pub(crate) fn create_label(&mut self) -> Label {
        self.labels.create_label()
    }

    /// Run `body` against an empty buffer and hand back what it wrote. The
    /// outer buffer is restored whether or not `body` succeeds.
    pub(crate) fn in_method<F>(&mut self, body: F) -> CodeGenResult<String>
    where
        F: FnOnce(&mut Self) -> CodeGenResult<()>,
    {
        let outer = mem::take(&mut self.code);
        let result = body(self);
        let method = mem::replace(&mut self.code, outer);
        result.map(|_| method)
    }
}

/// Generate IL for `program` with a fresh generator.
pub fn generate(program: &Program) -> CodeGenResult<String> {
    CodeGenerator::new().generate(program)
}
