use super::CodeGenerator;
use crate::{
    ast::{Storage, Type},
    codegen::code_emitter::CodeEmitter,
    frontend::token::Token,
    semantic::symboltable::{RoutineSymbol, Symbol, VarSymbol},
    utils::config::{
        assembly::{PROGRAM_CLASS, STD_LIB_CLASS},
        types::il_name,
    },
    utils::errors::{CodeGenError, CodeGenResult},
};

/// IL spelling of a semantic type.
pub fn il_type(ty: Type) -> CodeGenResult<&'static str> {
    il_name(ty).ok_or_else(|| CodeGenError::unsupported(format!("value of type {}", ty)))
}

pub fn get_variable_symbol(gen: &CodeGenerator, name: &Token) -> CodeGenResult<VarSymbol> {
    match gen.symbol_table.find(name)? {
        Symbol::Var(var) => Ok(var.clone()),
        _ => Err(CodeGenError::NotAVariable(name.text.clone())),
    }
}

pub fn get_routine_symbol(gen: &CodeGenerator, name: &Token) -> CodeGenResult<RoutineSymbol> {
    gen.symbol_table.find_routine(name).cloned()
}

/// Push the value of `name`. Constants are inlined as literals.
pub fn emit_load(gen: &mut CodeGenerator, name: &Token) -> CodeGenResult<()> {
    let symbol = gen.symbol_table.find(name)?.clone();
    match symbol {
        Symbol::Const(decl) => super::expression_handlers::emit_literal(gen, &decl.value, decl.ty()),
        Symbol::Var(var) => emit_load_var(gen, &var),
        Symbol::Routine(routine) => Err(CodeGenError::NotAVariable(routine.name)),
    }
}

fn emit_load_var(gen: &mut CodeGenerator, var: &VarSymbol) -> CodeGenResult<()> {
    let ty = il_type(var.ty)?;
    let mut emitter = gen.emitter();
    match var.storage {
        Storage::Argument => emitter.emit_ldarg(&var.name),
        Storage::Local => emitter.emit_ldloc(&var.name),
        Storage::StdLib => emitter.emit_call(&format!("{} {}::get_{}()", ty, STD_LIB_CLASS, var.name)),
        Storage::Global => emitter.emit_ldsfld(ty, PROGRAM_CLASS, &var.name),
    }
}

/// Pop the top of the stack into the variable `name`.
pub fn emit_store(gen: &mut CodeGenerator, name: &Token) -> CodeGenResult<()> {
    let var = get_variable_symbol(gen, name)?;
    let ty = il_type(var.ty)?;
    let mut emitter = gen.emitter();
    match var.storage {
        Storage::Local => emitter.emit_stloc(&var.name),
        Storage::Global => emitter.emit_stsfld(ty, PROGRAM_CLASS, &var.name),
        Storage::Argument | Storage::StdLib => Err(CodeGenError::NotAssignable(var.name)),
    }
}
