use super::symbol_helpers::{emit_load, get_routine_symbol, il_type};
use super::CodeGenerator;
use crate::{
    ast::{Expr, ExprKind, Type},
    codegen::code_emitter::CodeEmitter,
    frontend::token::{Token, TokenKind},
    utils::config::assembly::{INT_TO_STRING, PROGRAM_CLASS, STD_LIB_CLASS, STRING_CONCAT},
    utils::errors::{CodeGenError, CodeGenResult},
    utils::string_utils::to_csv,
};

/// Leave the value of `expr` on the evaluation stack.
pub fn handle_expr(gen: &mut CodeGenerator, expr: &Expr) -> CodeGenResult<()> {
    match &expr.kind {
        ExprKind::Literal(value) => emit_literal(gen, value, expr.ty),
        ExprKind::Identifier(name) => emit_load(gen, name),
        ExprKind::Unary { op, expr: operand } => handle_unary(gen, op, operand),
        ExprKind::Binary { left, op, right } => handle_binary(gen, left, op, right),
        ExprKind::Call { name, args } => handle_call(gen, name, args).map(|_| ()),
        ExprKind::Cast(inner) => handle_cast(gen, inner, expr.ty),
    }
}

pub fn emit_literal(gen: &mut CodeGenerator, value: &Token, ty: Type) -> CodeGenResult<()> {
    let mut emitter = gen.emitter();
    match ty {
        Type::String => emitter.emit_ldstr(&value.text),
        Type::Integer => emitter.emit(&format!("ldc.i4 {}", value.text)),
        Type::Real => emitter.emit_ldc_r8(&value.text),
        Type::Bool => emitter.emit_ldc_i4(i64::from(value.text.eq_ignore_ascii_case("true"))),
        Type::Char => {
            let code = value.text.chars().next().map_or(0, |ch| ch as u32);
            emitter.emit_ldc_i4(i64::from(code))
        }
        Type::Void | Type::Unknown => Err(CodeGenError::unsupported(format!(
            "literal {} of type {}",
            value, ty
        ))),
    }
}

fn handle_unary(gen: &mut CodeGenerator, op: &Token, operand: &Expr) -> CodeGenResult<()> {
    handle_expr(gen, operand)?;
    let mut emitter = gen.emitter();
    match op.kind {
        TokenKind::Sub => emitter.emit("neg"),
        TokenKind::Not => {
            emitter.emit("ldc.i4.0")?;
            emitter.emit("ceq")
        }
        // Unary plus leaves the operand as it is
        _ => Ok(()),
    }
}

fn handle_binary(gen: &mut CodeGenerator, left: &Expr, op: &Token, right: &Expr) -> CodeGenResult<()> {
    // A string on the left means concatenation, whatever the operator
    let instructions = if left.ty == Type::String {
        None
    } else {
        Some(binary_instructions(op.kind)?)
    };
    handle_expr(gen, left)?;
    handle_expr(gen, right)?;
    let mut emitter = gen.emitter();
    match instructions {
        None => emitter.emit_call(STRING_CONCAT),
        Some(instructions) => {
            for instruction in instructions {
                emitter.emit(instruction)?;
            }
            Ok(())
        }
    }
}

fn binary_instructions(op: TokenKind) -> CodeGenResult<&'static [&'static str]> {
    let instructions: &'static [&'static str] = match op {
        TokenKind::Add => &["add"],
        TokenKind::Sub => &["sub"],
        TokenKind::Mul => &["mul"],
        TokenKind::Div => &["div"],
        TokenKind::Mod => &["rem"],
        TokenKind::And => &["and"],
        TokenKind::Or => &["or"],
        TokenKind::Eq => &["ceq"],
        TokenKind::Lt => &["clt"],
        TokenKind::Gt => &["cgt"],
        // Negated forms: compare, then test the result against zero
        TokenKind::Geq => &["clt", "ldc.i4.0", "ceq"],
        TokenKind::Leq => &["cgt", "ldc.i4.0", "ceq"],
        TokenKind::Neq => &["ceq", "ldc.i4.0", "ceq"],
        other => return Err(CodeGenError::unsupported(format!("binary operator {}", other))),
    };
    Ok(instructions)
}

/// Push the arguments and call the routine. Returns its return type so a
/// call statement can discard a value nobody reads.
pub fn handle_call(gen: &mut CodeGenerator, name: &Token, args: &[Expr]) -> CodeGenResult<Type> {
    let routine = get_routine_symbol(gen, name)?;
    let ret = il_type(routine.ret)?;
    let params = routine
        .params
        .iter()
        .map(|ty| il_type(*ty))
        .collect::<CodeGenResult<Vec<_>>>()?;
    for arg in args {
        handle_expr(gen, arg)?;
    }
    let owner = if routine.std_lib { STD_LIB_CLASS } else { PROGRAM_CLASS };
    gen.emitter()
        .emit_call(&format!("{} {}::{} ({})", ret, owner, routine.name, to_csv(params)))?;
    Ok(routine.ret)
}

fn handle_cast(gen: &mut CodeGenerator, inner: &Expr, target: Type) -> CodeGenResult<()> {
    let conversion = match (inner.ty, target) {
        (Type::Integer, Type::Real) => "conv.r8".to_string(),
        (Type::Integer, Type::String) => format!("call {}", INT_TO_STRING),
        (from, to) => {
            return Err(CodeGenError::unsupported(format!(
                "conversion from {} to {}",
                from, to
            )))
        }
    };
    handle_expr(gen, inner)?;
    gen.emitter().emit(&conversion)
}
