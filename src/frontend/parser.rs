use std::sync::Arc;

use crate::ast::{Block, ConstDecl, Declarations, Expr, FnDecl, Program, Stmt, Storage, Type, VarDecl};
use crate::frontend::lexer::Lexer;
use crate::frontend::source::SourceFile;
use crate::frontend::stream::TokenStream;
use crate::frontend::token::Token;
use crate::frontend::token::TokenKind;
use crate::utils::errors::{Diagnostic, ParseError};

type ParseResult<T> = Result<T, ParseError>;

const LITERALS: &[TokenKind] = &[
    TokenKind::IntegerLit,
    TokenKind::RealLit,
    TokenKind::BooleanLit,
    TokenKind::CharLit,
    TokenKind::StringLit,
];
const TYPES: &[TokenKind] = &[
    TokenKind::Integer,
    TokenKind::Real,
    TokenKind::Boolean,
    TokenKind::String,
    TokenKind::Char,
];

/// Recursive descent parser. It looks at the current token and remembers the
/// two it consumed last: assignment and call statements are recognised one
/// token after their identifier has gone by.
pub struct Parser<S: TokenStream> {
    stream: S,
    token: Token,
    prev: Token,
    prev_prev: Token,
    // Routine nesting, decides the storage of declared variables
    depth: usize,
}

impl<S: TokenStream> Parser<S> {
    pub fn new(mut stream: S) -> Self {
        let token = stream.next_token();
        Self {
            prev: token.clone(),
            prev_prev: token.clone(),
            token,
            stream,
            depth: 0,
        }
    }

    pub fn source(&self) -> &Arc<SourceFile> {
        self.stream.source()
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        let program = self.program()?;
        if !self.peek(&[TokenKind::Eof]) {
            return Err(self.unexpected());
        }
        Ok(program)
    }

    /**
     * program = "program" IDENT ";" block "." .
     */
    fn program(&mut self) -> ParseResult<Program> {
        self.expect(&[TokenKind::Program])?;
        let name = self.expect(&[TokenKind::Ident])?;
        self.expect(&[TokenKind::Semi])?;
        let block = self.block()?;
        self.expect(&[TokenKind::Period])?;
        Ok(Program::new(name, block))
    }

    /**
     * block = declarations compound-stmt .
     */
    fn block(&mut self) -> ParseResult<Block> {
        let declarations = self.declarations()?;
        let body = self.compound_stmt()?;
        Ok(Block::new(declarations, body))
    }

    /**
     * declarations = [const-decls] [var-decls] [procfn-decls] .
     */
    fn declarations(&mut self) -> ParseResult<Declarations> {
        let mut decls = Declarations::default();
        if self.match_any(&[TokenKind::Const]) {
            loop {
                decls.consts.push(self.const_decl()?);
                self.expect(&[TokenKind::Semi])?;
                if !self.peek(&[TokenKind::Ident]) {
                    break;
                }
            }
        }
        if self.match_any(&[TokenKind::Var]) {
            let storage = if self.depth == 0 { Storage::Global } else { Storage::Local };
            loop {
                decls.vars.extend(self.var_decls(storage)?);
                self.expect(&[TokenKind::Semi])?;
                if !self.peek(&[TokenKind::Ident]) {
                    break;
                }
            }
        }
        while self.match_any(&[TokenKind::Procedure, TokenKind::Function]) {
            decls.funcs.push(self.routine_decl()?);
        }
        Ok(decls)
    }

    // const-decl = IDENT "=" literal
    fn const_decl(&mut self) -> ParseResult<ConstDecl> {
        let name = self.expect(&[TokenKind::Ident])?;
        self.expect(&[TokenKind::Eq])?;
        let value = self.expect(LITERALS)?;
        Ok(ConstDecl { name, value })
    }

    /**
     * procfn-decl = ( "procedure" | "function" ) IDENT "(" { var-decl [";"] } ")"
     *               [ ":" type ] ";" block ";" .
     * The return type is required for functions and absent for procedures.
     */
    fn routine_decl(&mut self) -> ParseResult<FnDecl> {
        let is_function = self.prev.is(TokenKind::Function);
        let name = self.expect(&[TokenKind::Ident])?;
        self.expect(&[TokenKind::Open])?;
        let mut params = Vec::new();
        while self.peek(&[TokenKind::Ident]) {
            params.extend(self.var_decls(Storage::Argument)?);
            self.match_any(&[TokenKind::Semi]);
        }
        self.expect(&[TokenKind::Close])?;
        let ret = if is_function {
            self.expect(&[TokenKind::Colon])?;
            self.type_name()?
        } else {
            Type::Void
        };
        self.expect(&[TokenKind::Semi])?;

        self.depth += 1;
        let block = self.block();
        self.depth -= 1;
        let block = block?;
        self.expect(&[TokenKind::Semi])?;
        Ok(FnDecl { name, params, ret, block })
    }

    // ident-list = IDENT { "," IDENT }
    fn ident_list(&mut self) -> ParseResult<Vec<Token>> {
        let mut names = Vec::new();
        loop {
            names.push(self.expect(&[TokenKind::Ident])?);
            if !self.match_any(&[TokenKind::Comma]) {
                break;
            }
        }
        Ok(names)
    }

    // var-decl = ident-list ":" type
    fn var_decls(&mut self, storage: Storage) -> ParseResult<Vec<VarDecl>> {
        let names = self.ident_list()?;
        self.expect(&[TokenKind::Colon])?;
        let ty = self.type_name()?;
        Ok(names.into_iter().map(|name| VarDecl::new(name, ty, storage)).collect())
    }

    // type = integer | real | boolean | string | char
    fn type_name(&mut self) -> ParseResult<Type> {
        let token = self.expect(TYPES)?;
        Ok(Type::from_token(token.kind))
    }

    /**
     * statement = write-stmt | read-stmt | assign-stmt | call-stmt | if-stmt
     *           | while-stmt | repeat-stmt | for-stmt | compound-stmt .
     */
    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.token.kind {
            TokenKind::Write | TokenKind::Writeln => {
                self.advance();
                self.write_stmt()
            }
            TokenKind::Ident => {
                self.advance();
                if self.match_any(&[TokenKind::Assign]) {
                    self.assign_stmt()
                } else {
                    self.call_stmt()
                }
            }
            TokenKind::Read => {
                self.advance();
                self.read_stmt()
            }
            TokenKind::Repeat => {
                self.advance();
                self.repeat_stmt()
            }
            TokenKind::While => {
                self.advance();
                self.while_stmt()
            }
            TokenKind::If => {
                self.advance();
                self.if_stmt()
            }
            TokenKind::For => {
                self.advance();
                self.for_stmt()
            }
            TokenKind::Begin => self.compound_stmt(),
            _ => Err(self.unexpected()),
        }
    }

    // compound-stmt = "begin" [ statement { ";" statement } ] "end"
    fn compound_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(&[TokenKind::Begin])?;
        let mut stmts = Vec::new();
        while !self.match_any(&[TokenKind::End]) {
            stmts.push(self.statement()?);
            self.match_any(&[TokenKind::Semi]);
        }
        Ok(Stmt::Compound(stmts))
    }

    // assign-stmt = IDENT ":=" expression
    fn assign_stmt(&mut self) -> ParseResult<Stmt> {
        let name = self.prev_prev.clone();
        let expr = self.expression()?;
        Ok(Stmt::Assign { name, expr })
    }

    // call-stmt = IDENT [ arglist ]
    fn call_stmt(&mut self) -> ParseResult<Stmt> {
        let name = self.prev.clone();
        let args = if self.peek(&[TokenKind::Open]) { self.arg_list()? } else { Vec::new() };
        Ok(Stmt::Call { name, args })
    }

    // write-stmt = "write" arglist | "writeln" [ arglist ]
    fn write_stmt(&mut self) -> ParseResult<Stmt> {
        let newline = self.prev.is(TokenKind::Writeln);
        let args = if newline && !self.peek(&[TokenKind::Open]) { Vec::new() } else { self.arg_list()? };
        Ok(Stmt::Write { newline, args })
    }

    // read-stmt = "read" "(" ident-list ")"
    fn read_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect_msg(TokenKind::Open, "Expecting open brace")?;
        let names = self.ident_list()?;
        self.expect_msg(TokenKind::Close, "Expecting close brace")?;
        Ok(Stmt::Read { names })
    }

    // if-stmt = "if" expression "then" statement [ "else" statement ]
    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        let condition = self.expression()?;
        self.expect_msg(TokenKind::Then, "Expecting then statement")?;
        let then_part = Box::new(self.statement()?);
        self.match_any(&[TokenKind::Semi]);
        let else_part = if self.match_any(&[TokenKind::Else]) {
            let stmt = self.statement()?;
            self.match_any(&[TokenKind::Semi]);
            Some(Box::new(stmt))
        } else {
            None
        };
        Ok(Stmt::If { condition, then_part, else_part })
    }

    // while-stmt = "while" expression "do" statement
    fn while_stmt(&mut self) -> ParseResult<Stmt> {
        let condition = self.expression()?;
        self.expect_msg(TokenKind::Do, "Expecting do statement")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    // repeat-stmt = "repeat" { statement [";"] } "until" expression
    fn repeat_stmt(&mut self) -> ParseResult<Stmt> {
        let mut body = Vec::new();
        while !self.peek(&[TokenKind::Until]) {
            body.push(self.statement()?);
            self.match_any(&[TokenKind::Semi]);
        }
        self.expect_msg(TokenKind::Until, "Expecting until condition")?;
        let condition = self.expression()?;
        Ok(Stmt::Repeat { body, condition })
    }

    // for-stmt = "for" IDENT ":=" expression ( "to" | "downto" ) expression "do" statement
    fn for_stmt(&mut self) -> ParseResult<Stmt> {
        let var = self.expect_msg(TokenKind::Ident, "Expecting identifier")?;
        self.expect(&[TokenKind::Assign])?;
        let start = self.expression()?;
        let ascending = self.match_any(&[TokenKind::To]);
        if !ascending {
            self.expect(&[TokenKind::Downto])?;
        }
        let end = self.expression()?;
        self.expect_msg(TokenKind::Do, "Expecting do statement")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::For { var, ascending, start, end, body })
    }

    // expression = equality .
    fn expression(&mut self) -> ParseResult<Expr> {
        self.equality()
    }

    // equality = comparison [ ("=" | "<>") comparison ] .
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;
        if self.match_any(&[TokenKind::Eq, TokenKind::Neq]) {
            let op = self.prev.clone();
            expr = Expr::binary(expr, op, self.comparison()?);
        }
        Ok(expr)
    }

    // comparison = term [ ("<" | "<=" | ">" | ">=") term ] .
    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;
        if self.match_any(&[TokenKind::Lt, TokenKind::Leq, TokenKind::Gt, TokenKind::Geq]) {
            let op = self.prev.clone();
            expr = Expr::binary(expr, op, self.term()?);
        }
        Ok(expr)
    }

    // term = factor { ( "+" | "-" | "or" ) factor } .
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;
        while self.match_any(&[TokenKind::Add, TokenKind::Sub, TokenKind::Or]) {
            let op = self.prev.clone();
            expr = Expr::binary(expr, op, self.factor()?);
        }
        Ok(expr)
    }

    // factor = unary { ( "*" | "/" | "and" | "mod" ) unary } .
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;
        while self.match_any(&[TokenKind::Mul, TokenKind::Div, TokenKind::And, TokenKind::Mod]) {
            let op = self.prev.clone();
            expr = Expr::binary(expr, op, self.unary()?);
        }
        Ok(expr)
    }

    // unary = ( "-" | "+" ) unary | primary .
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_any(&[TokenKind::Add, TokenKind::Sub]) {
            let op = self.prev.clone();
            return Ok(Expr::unary(op, self.unary()?));
        }
        self.primary()
    }

    // primary = IDENT [ arglist ] | literal | "(" expression ")" | "not" primary .
    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_any(&[TokenKind::Ident]) {
            let name = self.prev.clone();
            if self.peek(&[TokenKind::Open]) {
                return Ok(Expr::call(name, self.arg_list()?));
            }
            return Ok(Expr::identifier(name));
        }
        if self.match_any(LITERALS) {
            return Ok(Expr::literal(self.prev.clone()));
        }
        if self.match_any(&[TokenKind::Not]) {
            let op = self.prev.clone();
            return Ok(Expr::unary(op, self.primary()?));
        }
        self.expect_msg(TokenKind::Open, "Expecting identifier or literal")?;
        let expr = self.expression()?;
        self.expect(&[TokenKind::Close])?;
        Ok(expr)
    }

    // arglist = "(" [ expression { "," expression } ] ")"
    fn arg_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        self.expect(&[TokenKind::Open])?;
        if !self.peek(&[TokenKind::Close]) {
            args.push(self.expression()?);
        }
        while self.match_any(&[TokenKind::Comma]) {
            args.push(self.expression()?);
        }
        self.expect(&[TokenKind::Close])?;
        Ok(args)
    }

    // Expect one of `kinds`; the consumed token is returned
    fn expect(&mut self, kinds: &[TokenKind]) -> ParseResult<Token> {
        if self.match_any(kinds) {
            return Ok(self.prev.clone());
        }
        let expected: Vec<_> = kinds.iter().map(ToString::to_string).collect();
        Err(self.fail(format!("Expecting {}", expected.join(" or "))))
    }

    fn expect_msg(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.match_any(&[kind]) {
            return Ok(self.prev.clone());
        }
        Err(self.fail(message))
    }

    // Like match_any, but does not consume the token
    fn peek(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.token.kind)
    }

    // Consume the current token if it is one of `kinds`
    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        if self.peek(kinds) {
            self.advance();
            return true;
        }
        false
    }

    fn advance(&mut self) {
        let next = self.stream.next_token();
        let current = std::mem::replace(&mut self.token, next);
        self.prev_prev = std::mem::replace(&mut self.prev, current);
    }

    // A lexical error token wins over the grammar's message
    fn fail(&self, message: impl Into<String>) -> ParseError {
        let message = if self.token.is(TokenKind::Error) {
            self.token.text.clone()
        } else {
            message.into()
        };
        Diagnostic::at(self.stream.source(), &self.token, message)
    }

    fn unexpected(&self) -> ParseError {
        self.fail(format!("Unexpected {}", self.token))
    }
}

// Convenience function: scan and parse a whole source text
pub fn parse(name: &str, text: &str) -> ParseResult<Program> {
    Parser::new(Lexer::new(name, text)).parse()
}
