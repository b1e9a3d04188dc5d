use super::expression_handlers::{handle_call, handle_expr};
use super::symbol_helpers::{emit_load, emit_store, il_type};
use super::CodeGenerator;
use crate::{
    ast::{Expr, Stmt, Type},
    codegen::code_emitter::CodeEmitter,
    frontend::token::Token,
    utils::config::assembly::{CONSOLE_WRITE, CONSOLE_WRITELN},
    utils::errors::{CodeGenError, CodeGenResult},
};

pub fn handle_stmt(gen: &mut CodeGenerator, stmt: &Stmt) -> CodeGenResult<()> {
    match stmt {
        Stmt::Compound(stmts) => handle_compound(gen, stmts),
        Stmt::Assign { name, expr } => handle_assign(gen, name, expr),
        Stmt::Write { newline, args } => handle_write(gen, *newline, args),
        Stmt::If {
            condition,
            then_part,
            else_part,
        } => handle_if(gen, condition, then_part, else_part.as_deref()),
        Stmt::While { condition, body } => handle_while(gen, condition, body),
        Stmt::Repeat { body, condition } => handle_repeat(gen, body, condition),
        Stmt::For {
            var,
            ascending,
            start,
            end,
            body,
        } => handle_for(gen, var, *ascending, start, end, body),
        Stmt::Read { .. } => Err(CodeGenError::unsupported("read statement")),
        Stmt::Call { name, args } => handle_call_stmt(gen, name, args),
    }
}

fn handle_compound(gen: &mut CodeGenerator, stmts: &[Stmt]) -> CodeGenResult<()> {
    for stmt in stmts {
        handle_stmt(gen, stmt)?;
    }
    Ok(())
}

fn handle_assign(gen: &mut CodeGenerator, name: &Token, expr: &Expr) -> CodeGenResult<()> {
    handle_expr(gen, expr)?;
    emit_store(gen, name)
}

fn handle_write(gen: &mut CodeGenerator, newline: bool, args: &[Expr]) -> CodeGenResult<()> {
    for arg in args {
        handle_expr(gen, arg)?;
        let ty = il_type(arg.ty)?;
        gen.emitter().emit_call(&format!("{} ({})", CONSOLE_WRITE, ty))?;
    }
    if newline {
        gen.emitter().emit_call(CONSOLE_WRITELN)?;
    }
    Ok(())
}

fn handle_if(
    gen: &mut CodeGenerator,
    condition: &Expr,
    then_part: &Stmt,
    else_part: Option<&Stmt>,
) -> CodeGenResult<()> {
    let else_label = gen.create_label();
    handle_expr(gen, condition)?;
    gen.emitter().emit_brfalse(&else_label)?;
    handle_stmt(gen, then_part)?;
    match else_part {
        Some(else_part) => {
            let end_label = gen.create_label();
            gen.emitter().emit_jump(&end_label)?;
            gen.emitter().emit_label(&else_label)?;
            handle_stmt(gen, else_part)?;
            gen.emitter().emit_label(&end_label)
        }
        None => gen.emitter().emit_label(&else_label),
    }
}

// Condition at the bottom: jump there first, loop back while it holds
fn handle_while(gen: &mut CodeGenerator, condition: &Expr, body: &Stmt) -> CodeGenResult<()> {
    let body_label = gen.create_label();
    let test_label = gen.create_label();
    gen.emitter().emit_jump(&test_label)?;
    gen.emitter().emit_label(&body_label)?;
    handle_stmt(gen, body)?;
    gen.emitter().emit_label(&test_label)?;
    handle_expr(gen, condition)?;
    gen.emitter().emit_brtrue(&body_label)
}

fn handle_repeat(gen: &mut CodeGenerator, body: &[Stmt], condition: &Expr) -> CodeGenResult<()> {
    let body_label = gen.create_label();
    gen.emitter().emit_label(&body_label)?;
    handle_compound(gen, body)?;
    handle_expr(gen, condition)?;
    gen.emitter().emit_brfalse(&body_label)
}

/// Both bounds are inclusive. The end bound is evaluated again on every
/// test, and the loop exits once the variable has passed it.
fn handle_for(
    gen: &mut CodeGenerator,
    var: &Token,
    ascending: bool,
    start: &Expr,
    end: &Expr,
    body: &Stmt,
) -> CodeGenResult<()> {
    let (step, passed) = if ascending { ("add", "cgt") } else { ("sub", "clt") };
    let body_label = gen.create_label();
    let test_label = gen.create_label();

    handle_expr(gen, start)?;
    emit_store(gen, var)?;
    gen.emitter().emit_jump(&test_label)?;

    gen.emitter().emit_label(&body_label)?;
    handle_stmt(gen, body)?;
    emit_load(gen, var)?;
    gen.emitter().emit("ldc.i4.1")?;
    gen.emitter().emit(step)?;
    emit_store(gen, var)?;

    gen.emitter().emit_label(&test_label)?;
    emit_load(gen, var)?;
    handle_expr(gen, end)?;
    gen.emitter().emit(passed)?;
    gen.emitter().emit_brfalse(&body_label)
}

fn handle_call_stmt(gen: &mut CodeGenerator, name: &Token, args: &[Expr]) -> CodeGenResult<()> {
    let ret = handle_call(gen, name, args)?;
    if ret != Type::Void {
        gen.emitter().emit_pop()?;
    }
    Ok(())
}
