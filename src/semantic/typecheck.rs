use std::sync::Arc;

use crate::ast::{Block, Declarations, Expr, ExprKind, FnDecl, Program, Stmt, Storage, Type};
use crate::frontend::source::SourceFile;
use crate::frontend::token::{Token, TokenKind};
use crate::semantic::scope::Scoped;
use crate::semantic::symboltable::{RoutineSymbol, Symbol, SymbolTable, VarSymbol};
use crate::utils::errors::{CodeGenError, Diagnostic};

type CheckResult<T> = Result<T, Diagnostic>;

/// Resolves every name and gives every expression a type, inserting the
/// implicit conversions the generator relies on.
pub struct TypeChecker {
    file: Arc<SourceFile>,
    symbol_table: SymbolTable,
}

impl Scoped for TypeChecker {
    fn symbols(&mut self) -> &mut SymbolTable {
        &mut self.symbol_table
    }
}

impl TypeChecker {
    pub fn new(file: Arc<SourceFile>) -> Self {
        Self {
            file,
            symbol_table: SymbolTable::new(),
        }
    }

    pub fn annotate(mut self, program: Program) -> CheckResult<Program> {
        let Program { name, block } = program;
        let block = self.with_scope(false, |checker| checker.block(block))?;
        Ok(Program::new(name, block))
    }

    fn error(&self, token: &Token, message: impl Into<String>) -> Diagnostic {
        Diagnostic::at(&self.file, token, message)
    }

    fn declare(&mut self, name: &Token, symbol: Symbol) -> CheckResult<()> {
        match self.symbol_table.add(symbol) {
            Some(_) => Err(self.error(name, format!("Duplicate declaration of '{}'", name.text))),
            None => Ok(()),
        }
    }

    fn block(&mut self, block: Block) -> CheckResult<Block> {
        let Block { declarations, body } = block;
        let declarations = self.declarations(declarations)?;
        let body = self.statement(body)?;
        Ok(Block::new(declarations, body))
    }

    fn declarations(&mut self, declarations: Declarations) -> CheckResult<Declarations> {
        let Declarations { consts, vars, funcs } = declarations;
        for decl in &consts {
            self.declare(&decl.name, Symbol::from(decl))?;
        }
        for decl in &vars {
            self.declare(&decl.name, Symbol::from(decl))?;
        }
        let mut checked = Vec::with_capacity(funcs.len());
        for func in funcs {
            checked.push(self.routine(func)?);
        }
        Ok(Declarations {
            consts,
            vars,
            funcs: checked,
        })
    }

    fn routine(&mut self, func: FnDecl) -> CheckResult<FnDecl> {
        // Declared before the body so the routine can call itself.
        self.declare(&func.name, Symbol::from(&func))?;
        let FnDecl {
            name,
            params,
            ret,
            block,
        } = func;
        let block = self.with_scope(true, |checker| {
            for param in &params {
                let symbol = VarSymbol::new(&param.name.text, param.ty, Storage::Argument);
                checker.declare(&param.name, Symbol::Var(symbol))?;
            }
            if ret != Type::Void {
                let result = VarSymbol::new(&name.text, ret, Storage::Local);
                checker.declare(&name, Symbol::Var(result))?;
            }
            checker.block(block)
        })?;
        Ok(FnDecl {
            name,
            params,
            ret,
            block,
        })
    }

    fn statements(&mut self, stmts: Vec<Stmt>) -> CheckResult<Vec<Stmt>> {
        stmts.into_iter().map(|stmt| self.statement(stmt)).collect()
    }

    fn statement(&mut self, stmt: Stmt) -> CheckResult<Stmt> {
        let checked = match stmt {
            Stmt::Compound(stmts) => Stmt::Compound(self.statements(stmts)?),
            Stmt::Assign { name, expr } => {
                let target = self.assignable(&name)?;
                let expr = self.expression(expr)?;
                let found = expr.ty;
                let expr = coerce(expr, target).ok_or_else(|| {
                    self.error(&name, format!("Cannot assign {} to '{}' of type {}", found, name.text, target))
                })?;
                Stmt::Assign { name, expr }
            }
            Stmt::Write { newline, args } => {
                let args = args
                    .into_iter()
                    .map(|arg| self.expression(arg))
                    .collect::<CheckResult<Vec<_>>>()?;
                Stmt::Write { newline, args }
            }
            Stmt::If {
                condition,
                then_part,
                else_part,
            } => {
                let condition = self.condition(condition)?;
                let then_part = Box::new(self.statement(*then_part)?);
                let else_part = match else_part {
                    Some(stmt) => Some(Box::new(self.statement(*stmt)?)),
                    None => None,
                };
                Stmt::If {
                    condition,
                    then_part,
                    else_part,
                }
            }
            Stmt::While { condition, body } => {
                let condition = self.condition(condition)?;
                let body = Box::new(self.statement(*body)?);
                Stmt::While { condition, body }
            }
            Stmt::Repeat { body, condition } => {
                let body = self.statements(body)?;
                let condition = self.condition(condition)?;
                Stmt::Repeat { body, condition }
            }
            Stmt::For {
                var,
                ascending,
                start,
                end,
                body,
            } => {
                if self.assignable(&var)? != Type::Integer {
                    return Err(self.error(&var, format!("For loop variable '{}' must be an integer", var.text)));
                }
                let start = self.bound(start)?;
                let end = self.bound(end)?;
                let body = Box::new(self.statement(*body)?);
                Stmt::For {
                    var,
                    ascending,
                    start,
                    end,
                    body,
                }
            }
            Stmt::Read { names } => {
                for name in &names {
                    self.assignable(name)?;
                }
                Stmt::Read { names }
            }
            Stmt::Call { name, args } => {
                let (args, _) = self.call(&name, args)?;
                Stmt::Call { name, args }
            }
        };
        Ok(checked)
    }

    fn condition(&mut self, expr: Expr) -> CheckResult<Expr> {
        let expr = self.expression(expr)?;
        if expr.ty != Type::Bool {
            return Err(self.error(expr.anchor(), format!("Condition must be boolean, found {}", expr.ty)));
        }
        Ok(expr)
    }

    fn bound(&mut self, expr: Expr) -> CheckResult<Expr> {
        let expr = self.expression(expr)?;
        if expr.ty != Type::Integer {
            return Err(self.error(expr.anchor(), format!("For loop bounds must be integers, found {}", expr.ty)));
        }
        Ok(expr)
    }

    /// Type of the variable `name`, provided it may be written to here.
    fn assignable(&self, name: &Token) -> CheckResult<Type> {
        match self.resolve(name)? {
            Symbol::Var(var) => match var.storage {
                Storage::Global | Storage::Local => Ok(var.ty),
                Storage::Argument => Err(self.error(name, format!("Cannot assign to parameter '{}'", name.text))),
                Storage::StdLib => Err(self.error(name, format!("Cannot assign to library property '{}'", name.text))),
            },
            Symbol::Const(_) => Err(self.error(name, format!("Cannot assign to constant '{}'", name.text))),
            Symbol::Routine(_) => Err(self.error(name, format!("Cannot assign to routine '{}'", name.text))),
        }
    }

    /// Look a name up, refusing locals and parameters of an enclosing routine.
    fn resolve(&self, name: &Token) -> CheckResult<&Symbol> {
        let (symbol, depth) = self
            .symbol_table
            .lookup_with_depth(&name.text)
            .ok_or_else(|| self.error(name, format!("Unknown identifier '{}'", name.text)))?;
        if let Symbol::Var(VarSymbol {
            storage: Storage::Local | Storage::Argument,
            ..
        }) = symbol
        {
            if depth != self.symbol_table.current_depth() {
                return Err(self.error(
                    name,
                    format!("Cannot access '{}' of an enclosing routine", name.text),
                ));
            }
        }
        Ok(symbol)
    }

    fn routine_symbol(&self, name: &Token) -> CheckResult<RoutineSymbol> {
        match self.symbol_table.find_routine(name) {
            Ok(routine) => Ok(routine.clone()),
            Err(CodeGenError::NotCallable(_)) => {
                Err(self.error(name, format!("'{}' is not a procedure or function", name.text)))
            }
            Err(_) => Err(self.error(name, format!("Unknown identifier '{}'", name.text))),
        }
    }

    fn call(&mut self, name: &Token, args: Vec<Expr>) -> CheckResult<(Vec<Expr>, Type)> {
        let routine = self.routine_symbol(name)?;
        if args.len() != routine.params.len() {
            return Err(self.error(
                name,
                format!(
                    "'{}' expects {} argument(s), found {}",
                    name.text,
                    routine.params.len(),
                    args.len()
                ),
            ));
        }
        let mut checked = Vec::with_capacity(args.len());
        for (index, (arg, param)) in args.into_iter().zip(&routine.params).enumerate() {
            let arg = self.expression(arg)?;
            let (found, anchor) = (arg.ty, arg.anchor().clone());
            let arg = coerce(arg, *param).ok_or_else(|| {
                self.error(
                    &anchor,
                    format!("Argument {} of '{}' must be {}, found {}", index + 1, name.text, param, found),
                )
            })?;
            checked.push(arg);
        }
        Ok((checked, routine.ret))
    }

    fn expression(&mut self, expr: Expr) -> CheckResult<Expr> {
        let Expr { kind, ty } = expr;
        match kind {
            ExprKind::Literal(token) => Ok(Expr {
                kind: ExprKind::Literal(token),
                ty,
            }),
            ExprKind::Identifier(name) => {
                let ty = match self.resolve(&name)? {
                    Symbol::Const(decl) => decl.ty(),
                    Symbol::Var(var) => var.ty,
                    Symbol::Routine(_) => {
                        return Err(self.error(&name, format!("Routine '{}' used as a value", name.text)))
                    }
                };
                Ok(Expr::identifier(name).with_type(ty))
            }
            ExprKind::Unary { op, expr } => self.unary(op, *expr),
            ExprKind::Binary { left, op, right } => self.binary(*left, op, *right),
            ExprKind::Call { name, args } => {
                let (args, ret) = self.call(&name, args)?;
                if ret == Type::Void {
                    return Err(self.error(&name, format!("Procedure '{}' does not return a value", name.text)));
                }
                Ok(Expr::call(name, args).with_type(ret))
            }
            ExprKind::Cast(inner) => Ok(Expr::cast(self.expression(*inner)?, ty)),
        }
    }

    fn unary(&mut self, op: Token, operand: Expr) -> CheckResult<Expr> {
        let operand = self.expression(operand)?;
        let ty = match op.kind {
            TokenKind::Not if operand.ty == Type::Bool => Type::Bool,
            TokenKind::Add | TokenKind::Sub if operand.ty.is_numeric() => operand.ty,
            _ => {
                return Err(self.error(
                    &op,
                    format!("Operator '{}' cannot be applied to {}", op.text, operand.ty),
                ))
            }
        };
        Ok(Expr::unary(op, operand).with_type(ty))
    }

    fn binary(&mut self, left: Expr, op: Token, right: Expr) -> CheckResult<Expr> {
        let left = self.expression(left)?;
        let right = self.expression(right)?;
        let (lhs, rhs) = (left.ty, right.ty);
        let numeric = lhs.is_numeric() && rhs.is_numeric();
        let (left, right, ty) = match op.kind {
            TokenKind::Add if lhs == Type::String || rhs == Type::String => {
                match (stringify(left), stringify(right)) {
                    (Some(left), Some(right)) => (left, right, Type::String),
                    _ => return Err(self.mismatch(&op, lhs, rhs)),
                }
            }
            TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div if numeric => promote(left, right),
            TokenKind::Mod if lhs == Type::Integer && rhs == Type::Integer => (left, right, Type::Integer),
            TokenKind::And | TokenKind::Or if lhs == rhs && matches!(lhs, Type::Bool | Type::Integer) => {
                (left, right, lhs)
            }
            TokenKind::Eq | TokenKind::Neq | TokenKind::Lt | TokenKind::Leq | TokenKind::Gt | TokenKind::Geq
                if numeric =>
            {
                let (left, right, _) = promote(left, right);
                (left, right, Type::Bool)
            }
            TokenKind::Eq | TokenKind::Neq | TokenKind::Lt | TokenKind::Leq | TokenKind::Gt | TokenKind::Geq
                if lhs == Type::Char && rhs == Type::Char =>
            {
                (left, right, Type::Bool)
            }
            TokenKind::Eq | TokenKind::Neq if lhs == Type::Bool && rhs == Type::Bool => (left, right, Type::Bool),
            _ => return Err(self.mismatch(&op, lhs, rhs)),
        };
        Ok(Expr::binary(left, op, right).with_type(ty))
    }

    fn mismatch(&self, op: &Token, lhs: Type, rhs: Type) -> Diagnostic {
        self.error(
            op,
            format!("Operator '{}' cannot be applied to {} and {}", op.text, lhs, rhs),
        )
    }
}

// Integer operands are widened to real when the other side is real
fn promote(left: Expr, right: Expr) -> (Expr, Expr, Type) {
    match (left.ty, right.ty) {
        (Type::Integer, Type::Integer) => (left, right, Type::Integer),
        (Type::Integer, _) => (Expr::cast(left, Type::Real), right, Type::Real),
        (_, Type::Integer) => (left, Expr::cast(right, Type::Real), Type::Real),
        _ => (left, right, Type::Real),
    }
}

fn stringify(expr: Expr) -> Option<Expr> {
    match expr.ty {
        Type::String => Some(expr),
        Type::Integer => Some(Expr::cast(expr, Type::String)),
        _ => None,
    }
}

/// Fit `expr` into a slot of type `target`, or `None` if it cannot.
fn coerce(expr: Expr, target: Type) -> Option<Expr> {
    match (expr.ty, target) {
        (found, target) if found == target => Some(expr),
        (Type::Integer, Type::Real) => Some(Expr::cast(expr, Type::Real)),
        _ => None,
    }
}

/// Convenience wrapper: annotate a parsed program.
pub fn annotate(file: &Arc<SourceFile>, program: Program) -> CheckResult<Program> {
    TypeChecker::new(Arc::clone(file)).annotate(program)
}
