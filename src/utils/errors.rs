use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::frontend::source::SourceFile;
use crate::frontend::token::Token;

/// A located, user-facing error: the program text is wrong.
///
/// Carries the whole source so a caller can render a pointer-style excerpt
/// without going back to the file system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{line}:{column}: {message}", .file.name)]
pub struct Diagnostic {
    pub file: Arc<SourceFile>,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Syntax errors are diagnostics raised by the parser.
pub type ParseError = Diagnostic;

impl Diagnostic {
    pub fn new(file: Arc<SourceFile>, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a diagnostic anchored at a token.
    pub fn at(file: &Arc<SourceFile>, token: &Token, message: impl Into<String>) -> Self {
        Self::new(Arc::clone(file), token.line, token.column, message)
    }

    /// Render the failing line with two lines of context above it, a caret
    /// under the failing column and the message centered beneath the caret.
    pub fn excerpt(&self) -> String {
        let mut out = String::new();
        let header = format!("File: {}", self.file.name);
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"\u{2500}".repeat(header.chars().count()));
        out.push('\n');

        let first = self.line.saturating_sub(2).max(1);
        for number in first..=self.line {
            if let Some(text) = self.file.line(number) {
                out.push_str(&format!("{:>4}\u{2502}{}\n", number, text));
            }
        }

        let pad = self.column + 4;
        out.push_str(&" ".repeat(pad));
        out.push_str("^\n");
        out.push_str(&" ".repeat(pad.saturating_sub(self.message.chars().count() / 2)));
        out.push_str(&self.message);
        out.push('\n');

        if let Some(text) = self.file.line(self.line + 1) {
            out.push_str(&format!("{:>4}\u{2502}{}\n", self.line + 1, text));
        }
        out
    }
}

/// Internal failures of the generator: the construct is valid source but the
/// back end cannot lower it, or the tree handed over is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeGenError {
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    #[error("undefined symbol '{name}' at line {line} column {column}")]
    UndefinedSymbol {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("'{0}' is not a variable")]
    NotAVariable(String),

    #[error("'{0}' is not a function or procedure")]
    NotCallable(String),

    #[error("'{0}' cannot be assigned to")]
    NotAssignable(String),

    #[error("fmt error")]
    Format,
}

impl CodeGenError {
    /// Create an "unsupported construct" error
    pub fn unsupported(construct: impl Into<String>) -> Self {
        CodeGenError::Unsupported(construct.into())
    }

    /// Create an undefined-symbol error located at `token`
    pub fn undefined(token: &Token) -> Self {
        CodeGenError::UndefinedSymbol {
            name: token.text.clone(),
            line: token.line,
            column: token.column,
        }
    }
}

#[derive(Debug, Error)]
pub enum PsiError {
    // File and I/O errors
    #[error("File read error: {0}")]
    FileReadError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    // Source errors, reported to the user with an excerpt
    #[error("{0}")]
    Syntax(#[from] Diagnostic),

    // Generator defects
    #[error("Code generation error: {0}")]
    CodeGen(#[from] CodeGenError),

    // Compilation pipeline errors
    #[error("Compilation error in {stage}: {message}")]
    CompilationError { stage: String, message: String },
}

impl PsiError {
    /// Create a compilation error for a specific stage
    pub fn compilation_error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        PsiError::CompilationError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            PsiError::Syntax(diag) => Some(diag),
            _ => None,
        }
    }
}

// Type alias for Result with PsiError
pub type PsiResult<T> = Result<T, PsiError>;

pub type CodeGenResult<T> = Result<T, CodeGenError>;
