use psic::ast::{ExprKind, Program, Stmt, Type};
use psic::errors::Diagnostic;
use psic::frontend::parser::parse;
use psic::frontend::SourceFile;
use psic::semantic::TypeChecker;

fn check(source: &str) -> Result<Program, Diagnostic> {
    let program = parse("test.pas", source)?;
    TypeChecker::new(SourceFile::new("test.pas", source)).annotate(program)
}

fn check_err(source: &str) -> Diagnostic {
    match check(source) {
        Ok(_) => panic!("expected a diagnostic for:\n{}", source),
        Err(err) => err,
    }
}

fn body(program: &Program) -> &[Stmt] {
    match &program.block.body {
        Stmt::Compound(stmts) => stmts,
        other => panic!("block body is not compound: {:?}", other),
    }
}

#[test]
fn test_identifiers_take_declared_types() -> Result<(), Diagnostic> {
    let program = check(
        "program t;
var s: string; c: char; b: boolean;
begin
  writeln(s, c, b, pi)
end.",
    )?;
    match &body(&program)[0] {
        Stmt::Write { args, .. } => {
            let types: Vec<_> = args.iter().map(|a| a.ty).collect();
            assert_eq!(types, vec![Type::String, Type::Char, Type::Bool, Type::Real]);
        }
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_integer_promoted_to_real_in_arithmetic() -> Result<(), Diagnostic> {
    let program = check("program t;\nvar r: real;\nbegin\n  r := 1 + 2.5\nend.")?;
    match &body(&program)[0] {
        Stmt::Assign { expr, .. } => {
            assert_eq!(expr.ty, Type::Real);
            match &expr.kind {
                ExprKind::Binary { left, .. } => {
                    assert_eq!(left.ty, Type::Real);
                    assert!(matches!(&left.kind, ExprKind::Cast(inner) if inner.ty == Type::Integer));
                }
                other => panic!("unexpected expression {:?}", other),
            }
        }
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_integer_assigned_to_real_is_cast() -> Result<(), Diagnostic> {
    let program = check("program t;\nvar r: real;\nbegin\n  r := 3\nend.")?;
    match &body(&program)[0] {
        Stmt::Assign { expr, .. } => {
            assert_eq!(expr.ty, Type::Real);
            assert!(matches!(expr.kind, ExprKind::Cast(_)));
        }
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_string_concatenation_casts_integers() -> Result<(), Diagnostic> {
    let program = check("program t;\nvar s: string;\nbegin\n  s := \"n = \" + 42\nend.")?;
    match &body(&program)[0] {
        Stmt::Assign { expr, .. } => {
            assert_eq!(expr.ty, Type::String);
            match &expr.kind {
                ExprKind::Binary { right, .. } => {
                    assert_eq!(right.ty, Type::String);
                    assert!(matches!(right.kind, ExprKind::Cast(_)));
                }
                other => panic!("unexpected expression {:?}", other),
            }
        }
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_relations_are_boolean() -> Result<(), Diagnostic> {
    let program = check("program t;\nvar i: integer;\nbegin\n  if i <= 2.0 then i := 1\nend.")?;
    match &body(&program)[0] {
        Stmt::If { condition, .. } => assert_eq!(condition.ty, Type::Bool),
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_function_result_and_recursion() -> Result<(), Diagnostic> {
    let program = check(
        "program t;
function fact(n: integer): integer;
begin
  if n < 2 then fact := 1 else fact := n * fact(n - 1)
end;
begin
  writeln(fact(5))
end.",
    )?;
    match &body(&program)[0] {
        Stmt::Write { args, .. } => assert_eq!(args[0].ty, Type::Integer),
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_library_call_promotes_argument() -> Result<(), Diagnostic> {
    let program = check("program t;\nvar r: real;\nbegin\n  r := sqrt(2)\nend.")?;
    match &body(&program)[0] {
        Stmt::Assign { expr, .. } => match &expr.kind {
            ExprKind::Call { args, .. } => {
                assert_eq!(args[0].ty, Type::Real);
                assert!(matches!(args[0].kind, ExprKind::Cast(_)));
            }
            other => panic!("unexpected expression {:?}", other),
        },
        other => panic!("unexpected statement {:?}", other),
    }
    Ok(())
}

#[test]
fn test_undeclared_identifier() {
    let err = check_err("program t;\nbegin\n  x := 1\nend.");
    assert_eq!(err.message, "Unknown identifier 'x'");
    assert_eq!((err.line, err.column), (3, 3));
}

#[test]
fn test_duplicate_declaration() {
    let err = check_err("program t;\nvar x: integer; x: real;\nbegin\nend.");
    assert_eq!(err.message, "Duplicate declaration of 'x'");
}

#[test]
fn test_shadowing_in_routine_is_allowed() -> Result<(), Diagnostic> {
    check(
        "program t;
var x: integer;
procedure p(x: string);
begin
  writeln(x)
end;
begin
  x := 1;
  p(\"a\")
end.",
    )?;
    Ok(())
}

#[test]
fn test_assignment_restrictions() {
    let err = check_err("program t;\nconst k = 1;\nbegin\n  k := 2\nend.");
    assert_eq!(err.message, "Cannot assign to constant 'k'");

    let err = check_err("program t;\nprocedure p(a: integer);\nbegin\n  a := 2\nend;\nbegin\nend.");
    assert_eq!(err.message, "Cannot assign to parameter 'a'");

    let err = check_err("program t;\nbegin\n  pi := 3.0\nend.");
    assert_eq!(err.message, "Cannot assign to library property 'pi'");
}

#[test]
fn test_type_mismatch_in_assignment() {
    let err = check_err("program t;\nvar i: integer;\nbegin\n  i := 2.5\nend.");
    assert_eq!(err.message, "Cannot assign real to 'i' of type integer");
}

#[test]
fn test_string_relations_are_rejected() {
    let err = check_err("program t;\nvar s: string;\nbegin\n  if s = \"a\" then s := \"b\"\nend.");
    assert_eq!(err.message, "Operator '=' cannot be applied to string and string");
}

#[test]
fn test_condition_must_be_boolean() {
    let err = check_err("program t;\nvar i: integer;\nbegin\n  while i do i := 0\nend.");
    assert_eq!(err.message, "Condition must be boolean, found integer");
}

#[test]
fn test_argument_checks() {
    let err = check_err("program t;\nvar i: integer;\nbegin\n  i := abs(1, 2)\nend.");
    assert_eq!(err.message, "'abs' expects 1 argument(s), found 2");

    let err = check_err("program t;\nvar i: integer;\nbegin\n  i := abs(\"x\")\nend.");
    assert_eq!(err.message, "Argument 1 of 'abs' must be integer, found string");
}

#[test]
fn test_procedure_used_as_value() {
    let err = check_err(
        "program t;\nvar i: integer;\nprocedure p();\nbegin\nend;\nbegin\n  i := p()\nend.",
    );
    assert_eq!(err.message, "Procedure 'p' does not return a value");
}

#[test]
fn test_calling_a_variable() {
    let err = check_err("program t;\nvar i: integer;\nbegin\n  i\nend.");
    assert_eq!(err.message, "'i' is not a procedure or function");
}

#[test]
fn test_enclosing_routine_locals_are_out_of_reach() {
    let err = check_err(
        "program t;
procedure outer();
var hidden: integer;
procedure inner();
begin
  writeln(hidden)
end;
begin
  hidden := 1
end;
begin
  outer
end.",
    );
    assert_eq!(err.message, "Cannot access 'hidden' of an enclosing routine");
    assert_eq!(err.line, 6);
}

#[test]
fn test_for_loop_requires_integers() {
    let err = check_err("program t;\nvar r: real;\nbegin\n  for r := 1 to 3 do writeln(r)\nend.");
    assert_eq!(err.message, "For loop variable 'r' must be an integer");
}
