use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod codegen;
pub mod frontend;
pub mod semantic;
pub mod utils;

pub use utils::errors;

pub const VERSION: &str = "0.1.0";

use crate::errors::{PsiError, PsiResult};
use crate::frontend::{Lexer, Parser};
use crate::semantic::TypeChecker;

pub fn read(filename: &Path) -> PsiResult<String> {
    match filename.extension() {
        Some(ext) if ext == "pas" => {}
        _ => return Err(PsiError::FileReadError("File must have a .pas extension".to_string())),
    }
    // Open the path in read-only mode, returns `io::Result<File>`
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Source text in, IL assembly text out.
pub fn compile(name: &str, text: &str) -> PsiResult<String> {
    let mut parser = Parser::new(Lexer::new(name, text));
    let program = parser.parse()?;
    let program = TypeChecker::new(parser.source().clone()).annotate(program)?;
    Ok(codegen::generate(&program)?)
}
