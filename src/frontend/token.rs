use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Program,
    Var,
    Const,
    If,
    Then,
    Else,
    While,
    For,
    To,
    Downto,
    Do,
    Begin,
    End,
    Repeat,
    Until,
    Procedure,
    Function,
    Read,
    Write,
    Writeln,
    Not,
    Or,
    And,
    Mod,
    Integer,
    Real,
    Boolean,
    String,
    Char,
    // Operators
    Add,
    Sub,
    Mul,
    Div,
    Neq,
    Leq,
    Geq,
    Eq,
    Lt,
    Gt,
    Assign,
    // Punctuation
    Semi,
    Period,
    Comma,
    Open,
    Close,
    Colon,
    // Literals
    IntegerLit,
    RealLit,
    BooleanLit,
    CharLit,
    StringLit,
    // Others
    Ident,
    Eof,
    Error,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Program | Var | Const | If | Then | Else | While | For | To | Downto | Do | Begin
                | End | Repeat | Until | Procedure | Function | Read | Write | Writeln | Not
                | Or | And | Mod | Integer | Real | Boolean | String | Char
        )
    }

    /// Spelling used in "Expecting ..." messages.
    pub fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            Program => "program",
            Var => "var",
            Const => "const",
            If => "if",
            Then => "then",
            Else => "else",
            While => "while",
            For => "for",
            To => "to",
            Downto => "downto",
            Do => "do",
            Begin => "begin",
            End => "end",
            Repeat => "repeat",
            Until => "until",
            Procedure => "procedure",
            Function => "function",
            Read => "read",
            Write => "write",
            Writeln => "writeln",
            Not => "not",
            Or => "or",
            And => "and",
            Mod => "mod",
            Integer => "integer",
            Real => "real",
            Boolean => "boolean",
            String => "string",
            Char => "char",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Neq => "<>",
            Leq => "<=",
            Geq => ">=",
            Eq => "=",
            Lt => "<",
            Gt => ">",
            Assign => ":=",
            Semi => ";",
            Period => ".",
            Comma => ",",
            Open => "(",
            Close => ")",
            Colon => ":",
            IntegerLit => "integer literal",
            RealLit => "real literal",
            BooleanLit => "boolean literal",
            CharLit => "char literal",
            StringLit => "string literal",
            Ident => "identifier",
            Eof => "EOF",
            Error => "ERROR",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_keyword() {
            write!(f, "\u{ab}{}\u{bb}", self.describe())
        } else {
            f.write_str(self.describe())
        }
    }
}

/// A scanned lexeme. `line` and `column` are 1-based and only feed diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Synthesized identifier with no source position.
    pub fn ident(name: &str) -> Self {
        Self::new(TokenKind::Ident, name, 0, 0)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof | TokenKind::Error => write!(f, "{}", self.kind.describe()),
            kind if kind.is_keyword() => write!(f, "{}", kind),
            TokenKind::StringLit => write!(f, "\"{}\"", self.text),
            TokenKind::CharLit => write!(f, "'{}'", self.text),
            _ => f.write_str(&self.text),
        }
    }
}
