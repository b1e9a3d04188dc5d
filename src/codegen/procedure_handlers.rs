use std::mem;

use super::statement_handlers::handle_stmt;
use super::symbol_helpers::{emit_load, il_type};
use super::CodeGenerator;
use crate::{
    ast::{Block, Declarations, FnDecl, Program, Storage, VarDecl},
    codegen::code_emitter::CodeEmitter,
    semantic::scope::Scoped,
    semantic::symboltable::{Symbol, VarSymbol},
    utils::config::assembly::{
        ASSEMBLY_VERSION, EXTERN_CONSOLE, EXTERN_PSILIB, EXTERN_RUNTIME, PROGRAM_CLASS,
    },
    utils::errors::{CodeGenError, CodeGenResult},
    utils::string_utils::to_csv,
};

pub fn handle_program(gen: &mut CodeGenerator, program: &Program) -> CodeGenResult<()> {
    {
        let mut emitter = gen.emitter();
        emitter.emit_directive(EXTERN_RUNTIME)?;
        emitter.emit_directive(EXTERN_CONSOLE)?;
        emitter.emit_directive(EXTERN_PSILIB)?;
        emitter.emit_directive(&format!(
            ".assembly {} {{ .ver {} }}",
            program.name.text, ASSEMBLY_VERSION
        ))?;
        emitter.emit_blank()?;
        emitter.emit_directive(&format!(".class {} {{", PROGRAM_CLASS))?;
    }

    gen.with_scope(false, |gen| {
        handle_declarations(gen, &program.block.declarations)?;
        for method in mem::take(&mut gen.methods) {
            gen.code.push_str(&method);
        }

        let mut emitter = gen.emitter();
        emitter.emit_member(".method static void Main () {")?;
        emitter.emit(".entrypoint")?;
        handle_stmt(gen, &program.block.body)?;
        let mut emitter = gen.emitter();
        emitter.emit_ret()?;
        emitter.emit_member("}")
    })?;

    gen.emitter().emit_directive("}")
}

pub fn handle_block(gen: &mut CodeGenerator, block: &Block) -> CodeGenResult<()> {
    handle_declarations(gen, &block.declarations)?;
    handle_stmt(gen, &block.body)
}

fn handle_declarations(gen: &mut CodeGenerator, declarations: &Declarations) -> CodeGenResult<()> {
    // Constants emit nothing; reads inline the value
    for decl in &declarations.consts {
        gen.symbol_table.add(Symbol::from(decl));
    }
    for decl in &declarations.vars {
        handle_var_decl(gen, decl)?;
    }
    for decl in &declarations.funcs {
        handle_fn_decl(gen, decl)?;
    }
    Ok(())
}

/// Registers the variable and reserves its storage: a local slot inside a
/// routine body, a static field at program level.
pub fn handle_var_decl(gen: &mut CodeGenerator, decl: &VarDecl) -> CodeGenResult<()> {
    gen.symbol_table.add(Symbol::from(decl));
    let ty = il_type(decl.ty)?;
    let in_routine = gen.symbol_table.in_local_scope();
    let mut emitter = gen.emitter();
    match decl.storage {
        Storage::Local if in_routine => emitter.emit(&format!(".locals init ({} {})", ty, decl.name.text)),
        Storage::Global => emitter.emit_member(&format!(".field static {} {}", ty, decl.name.text)),
        storage => Err(CodeGenError::unsupported(format!(
            "{:?} variable '{}' declared at this level",
            storage, decl.name.text
        ))),
    }
}

pub fn handle_fn_decl(gen: &mut CodeGenerator, decl: &FnDecl) -> CodeGenResult<()> {
    // Registered first so the body can call itself
    gen.symbol_table.add(Symbol::from(decl));

    let ret = il_type(decl.ret)?;
    let params = decl
        .params
        .iter()
        .map(|param| Ok(format!("{} {}", il_type(param.ty)?, param.name.text)))
        .collect::<CodeGenResult<Vec<_>>>()?;

    let method = gen.in_method(|gen| {
        gen.with_scope(true, |gen| {
            for param in &decl.params {
                let symbol = VarSymbol::new(&param.name.text, param.ty, Storage::Argument);
                gen.symbol_table.add(Symbol::Var(symbol));
            }
            gen.emitter().emit_member(&format!(
                ".method static {} {} ({}) {{",
                ret,
                decl.name.text,
                to_csv(&params)
            ))?;

            // A function returns whatever was last assigned to its own name
            if !decl.is_procedure() {
                let result = VarDecl::new(decl.name.clone(), decl.ret, Storage::Local);
                handle_var_decl(gen, &result)?;
            }
            handle_block(gen, &decl.block)?;
            if !decl.is_procedure() {
                emit_load(gen, &decl.name)?;
            }

            let mut emitter = gen.emitter();
            emitter.emit_ret()?;
            emitter.emit_member("}")
        })
    })?;
    gen.methods.push(method);
    Ok(())
}
