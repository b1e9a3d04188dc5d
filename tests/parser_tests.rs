use psic::ast::{Expr, ExprKind, Program, Stmt, Storage, Type};
use psic::errors::ParseError;
use psic::frontend::parser::parse;
use psic::frontend::token::{Token, TokenKind};
use psic::frontend::{Parser, TokenList};

fn wrap(body: &str) -> String {
    format!("program test;\nbegin\n{}\nend.", body)
}

fn body(program: &Program) -> &[Stmt] {
    match &program.block.body {
        Stmt::Compound(stmts) => stmts,
        other => panic!("block body is not compound: {:?}", other),
    }
}

fn assigned_expr(program: &Program) -> &Expr {
    match &body(program)[0] {
        Stmt::Assign { expr, .. } => expr,
        other => panic!("expected assignment, found {:?}", other),
    }
}

fn binary_parts(expr: &Expr) -> (&Expr, TokenKind, &Expr) {
    match &expr.kind {
        ExprKind::Binary { left, op, right } => (left, op.kind, right),
        other => panic!("expected binary expression, found {:?}", other),
    }
}

fn literal_text(expr: &Expr) -> &str {
    match &expr.kind {
        ExprKind::Literal(token) | ExprKind::Identifier(token) => &token.text,
        other => panic!("expected leaf, found {:?}", other),
    }
}

#[test]
fn test_minimal_program() -> Result<(), ParseError> {
    let program = parse("test.pas", "program hello;\nbegin\nend.")?;
    assert_eq!(program.name.text, "hello");
    assert!(body(&program).is_empty());
    Ok(())
}

#[test]
fn test_multiplication_binds_tighter_than_addition() -> Result<(), ParseError> {
    let program = parse("test.pas", &wrap("x := 1 + 2 * 3"))?;
    let (left, op, right) = binary_parts(assigned_expr(&program));
    assert_eq!(op, TokenKind::Add);
    assert_eq!(literal_text(left), "1");
    let (l, inner, r) = binary_parts(right);
    assert_eq!(inner, TokenKind::Mul);
    assert_eq!((literal_text(l), literal_text(r)), ("2", "3"));
    Ok(())
}

#[test]
fn test_additive_operators_are_left_associative() -> Result<(), ParseError> {
    let program = parse("test.pas", &wrap("x := a - b - c"))?;
    let (left, op, right) = binary_parts(assigned_expr(&program));
    assert_eq!(op, TokenKind::Sub);
    assert_eq!(literal_text(right), "c");
    let (l, inner, r) = binary_parts(left);
    assert_eq!(inner, TokenKind::Sub);
    assert_eq!((literal_text(l), literal_text(r)), ("a", "b"));
    Ok(())
}

#[test]
fn test_relational_binds_looser_than_arithmetic() -> Result<(), ParseError> {
    let program = parse("test.pas", &wrap("b := x + 1 < y * 2 = true"))?;
    let (left, op, right) = binary_parts(assigned_expr(&program));
    assert_eq!(op, TokenKind::Eq);
    assert_eq!(literal_text(right), "true");
    let (sum, cmp, product) = binary_parts(left);
    assert_eq!(cmp, TokenKind::Lt);
    assert_eq!(binary_parts(sum).1, TokenKind::Add);
    assert_eq!(binary_parts(product).1, TokenKind::Mul);
    Ok(())
}

#[test]
fn test_parentheses_and_unary() -> Result<(), ParseError> {
    let program = parse("test.pas", &wrap("x := -(1 + 2) * 3"))?;
    let (left, op, _) = binary_parts(assigned_expr(&program));
    assert_eq!(op, TokenKind::Mul);
    match &left.kind {
        ExprKind::Unary { op, expr } => {
            assert_eq!(op.kind, TokenKind::Sub);
            assert_eq!(binary_parts(expr).1, TokenKind::Add);
        }
        other => panic!("expected unary, found {:?}", other),
    }
    Ok(())
}

#[test]
fn test_literals_are_typed_at_construction() -> Result<(), ParseError> {
    let program = parse("test.pas", &wrap("writeln(1, 2.5, \"s\", 'c', true, x)"))?;
    match &body(&program)[0] {
        Stmt::Write { newline, args } => {
            assert!(*newline);
            let types: Vec<_> = args.iter().map(|a| a.ty).collect();
            assert_eq!(
                types,
                vec![Type::Integer, Type::Real, Type::String, Type::Char, Type::Bool, Type::Unknown]
            );
        }
        other => panic!("expected writeln, found {:?}", other),
    }
    Ok(())
}

#[test]
fn test_declarations_and_storage() -> Result<(), ParseError> {
    let source = "program test;
const limit = 10;
var a, b: integer; s: string;
function twice(n: integer): integer;
var tmp: integer;
begin
  tmp := n * 2;
  twice := tmp
end;
procedure show();
begin
  writeln
end;
begin
  a := twice(limit);
  show
end.";
    let program = parse("test.pas", source)?;
    let decls = &program.block.declarations;
    assert_eq!(decls.consts.len(), 1);
    assert_eq!(decls.consts[0].ty(), Type::Integer);
    assert_eq!(decls.vars.len(), 3);
    assert!(decls.vars.iter().all(|v| v.storage == Storage::Global));
    assert_eq!(decls.vars[2].ty, Type::String);

    let twice = &decls.funcs[0];
    assert_eq!(twice.ret, Type::Integer);
    assert!(!twice.is_procedure());
    assert_eq!(twice.params[0].storage, Storage::Argument);
    assert_eq!(twice.block.declarations.vars[0].storage, Storage::Local);

    let show = &decls.funcs[1];
    assert!(show.is_procedure());
    assert!(show.params.is_empty());

    match &body(&program)[1] {
        Stmt::Call { name, args } => {
            assert_eq!(name.text, "show");
            assert!(args.is_empty());
        }
        other => panic!("expected call, found {:?}", other),
    }
    Ok(())
}

#[test]
fn test_control_flow_statements() -> Result<(), ParseError> {
    let source = wrap(
        "if a > 1 then b := 1 else b := 2;
while a < 10 do a := a + 1;
repeat a := a - 1; until a = 0;
for i := 10 downto 1 do write(i);
read(a, b)",
    );
    let program = parse("test.pas", &source)?;
    let stmts = body(&program);
    assert!(matches!(&stmts[0], Stmt::If { else_part: Some(_), .. }));
    assert!(matches!(&stmts[1], Stmt::While { .. }));
    assert!(matches!(&stmts[2], Stmt::Repeat { body, .. } if body.len() == 1));
    assert!(matches!(&stmts[3], Stmt::For { ascending: false, .. }));
    assert!(matches!(&stmts[4], Stmt::Read { names } if names.len() == 2));
    Ok(())
}

#[test]
fn test_missing_then_reports_location() {
    let err = parse("test.pas", "program test;\nbegin\n  if a > 1 b := 2\nend.").unwrap_err();
    assert_eq!(err.message, "Expecting then statement");
    assert_eq!((err.line, err.column), (3, 12));
}

#[test]
fn test_missing_operand() {
    let err = parse("test.pas", &wrap("x := 1 +")).unwrap_err();
    assert_eq!(err.message, "Expecting identifier or literal");
    assert_eq!(err.line, 4);
}

#[test]
fn test_expect_lists_alternatives() {
    let err = parse("test.pas", "program test;\nvar x: list;\nbegin end.").unwrap_err();
    assert_eq!(
        err.message,
        "Expecting «integer» or «real» or «boolean» or «string» or «char»"
    );
    assert_eq!((err.line, err.column), (2, 8));
}

#[test]
fn test_trailing_input_is_rejected() {
    let err = parse("test.pas", "program test;\nbegin end. x").unwrap_err();
    assert_eq!(err.message, "Unexpected x");
}

#[test]
fn test_lexical_error_message_is_reported() {
    let err = parse("test.pas", &wrap("x := 1 # 2")).unwrap_err();
    assert_eq!(err.message, "Unknown character '#'");
}

#[test]
fn test_diagnostic_excerpt() {
    let err = parse("demo.pas", "program test;\nbegin\n  x := ;\nend.").unwrap_err();
    let excerpt = err.excerpt();
    assert!(excerpt.starts_with("File: demo.pas\n"));
    assert!(excerpt.contains("   3│  x := ;"));
    assert!(excerpt.contains("   4│end."));
    assert!(excerpt.contains("Expecting identifier or literal"));
    assert_eq!(err.to_string(), "demo.pas:3:8: Expecting identifier or literal");
}

#[test]
fn test_parse_from_token_list() -> Result<(), ParseError> {
    let tokens = vec![
        Token::new(TokenKind::Program, "program", 1, 1),
        Token::ident("p"),
        Token::new(TokenKind::Semi, ";", 1, 10),
        Token::new(TokenKind::Begin, "begin", 2, 1),
        Token::new(TokenKind::End, "end", 3, 1),
        Token::new(TokenKind::Period, ".", 3, 4),
    ];
    let program = Parser::new(TokenList::new(tokens)).parse()?;
    assert_eq!(program.name.text, "p");
    Ok(())
}
