/*
*                    psic -- PSI (Pascal) compiler.
*
* program      = "program" IDENT ";" block "." ;
* block        = declarations compound-stmt ;
* declarations = [ "const" { IDENT "=" literal ";" } ]
*                [ "var" { ident-list ":" type ";" } ]
*                { ( "procedure" | "function" ) IDENT "(" [ param-groups ] ")"
*                  [ ":" type ] ";" block ";" } ;
* statement    = write-stmt | read-stmt | assign-stmt | call-stmt | if-stmt
*              | while-stmt | repeat-stmt | for-stmt | compound-stmt ;
* expression   = comparison [ ( "=" | "<>" ) comparison ] ;
* comparison   = term [ ( "<" | "<=" | ">" | ">=" ) term ] ;
* term         = factor { ( "+" | "-" | "or" ) factor } ;
* factor       = unary { ( "*" | "/" | "and" | "mod" ) unary } ;
* unary        = ( "+" | "-" ) unary | primary ;
* primary      = IDENT [ arglist ] | literal | "(" expression ")" | "not" primary ;
*/

mod declarations;
mod expressions;
mod program;
mod statements;
mod types;

pub use declarations::{ConstDecl, Declarations, FnDecl, Storage, VarDecl};
pub use expressions::{Expr, ExprKind};
pub use program::{Block, Program};
pub use statements::Stmt;
pub use types::Type;
