// IL assembly layout
pub mod assembly {
    // Fixed header: runtime, console and runtime-support library references
    pub const EXTERN_RUNTIME: &str =
        ".assembly extern System.Runtime { .publickeytoken = (B0 3F 5F 7F 11 D5 0A 3A) .ver 7:0:0:0 }";
    pub const EXTERN_CONSOLE: &str =
        ".assembly extern System.Console { .publickeytoken = (B0 3F 5F 7F 11 D5 0A 3A) .ver 7:0:0:0 }";
    pub const EXTERN_PSILIB: &str = ".assembly extern PSILib { .ver 1:0:0:0 }";
    pub const ASSEMBLY_VERSION: &str = "0:0:0:0";

    // Qualifiers used in call and field references
    pub const PROGRAM_CLASS: &str = "Program";
    pub const STD_LIB_CLASS: &str = "[PSILib]PSILib.Lib";

    // Call targets
    pub const CONSOLE_WRITE: &str = "void [System.Console]System.Console::Write";
    pub const CONSOLE_WRITELN: &str = "void [System.Console]System.Console::WriteLine ()";
    pub const STRING_CONCAT: &str = "string [System.Runtime]System.String::Concat (string, string)";
    pub const INT_TO_STRING: &str = "string [PSILib]PSILib.Helper::CIntStr (int32)";

    // Indentation
    pub const MEMBER_INDENT: &str = "  ";
    pub const INSTRUCTION_INDENT: &str = "    ";
    pub const LABEL_INDENT: &str = "    ";
}

// Jump target naming
pub mod labels {
    pub const LABEL_PREFIX: &str = "IL_";
    pub const LABEL_WIDTH: usize = 4;
}

// Semantic type to IL type-name mapping
pub mod types {
    use crate::ast::Type;

    pub fn il_name(ty: Type) -> Option<&'static str> {
        match ty {
            Type::String => Some("string"),
            Type::Integer => Some("int32"),
            Type::Real => Some("float64"),
            Type::Bool => Some("bool"),
            Type::Char => Some("char"),
            Type::Void => Some("void"),
            Type::Unknown => None,
        }
    }
}

// Scanner tables
pub mod lexer {
    use lazy_static::lazy_static;
    use regex::Regex;
    use std::collections::HashMap;

    use crate::frontend::token::TokenKind;

    // A .NET `char` is one UTF-16 code unit
    pub const MAX_CHAR: char = '\u{FFFF}';

    lazy_static! {
        pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
            use TokenKind::*;
            [
                ("program", Program), ("var", Var), ("const", Const), ("if", If),
                ("then", Then), ("else", Else), ("while", While), ("for", For),
                ("to", To), ("downto", Downto), ("do", Do), ("begin", Begin),
                ("end", End), ("repeat", Repeat), ("until", Until),
                ("procedure", Procedure), ("function", Function), ("read", Read),
                ("write", Write), ("writeln", Writeln), ("not", Not), ("or", Or),
                ("and", And), ("mod", Mod), ("integer", Integer), ("real", Real),
                ("boolean", Boolean), ("string", String), ("char", Char),
            ]
            .into_iter()
            .collect()
        };

        /// Integer or real literal anchored at the scan position.
        pub static ref NUMBER: Regex =
            Regex::new(r"^[0-9]+(?P<fraction>\.[0-9]+)?(?P<exponent>[eE][+-]?[0-9]+)?")
                .expect("number pattern is valid");
    }

    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS.get(word.to_ascii_lowercase().as_str()).copied()
    }
}

// Members of the runtime support library, visible from every program
pub mod stdlib {
    use crate::ast::Type;

    pub struct LibProperty {
        pub name: &'static str,
        pub ty: Type,
    }

    pub struct LibFunction {
        pub name: &'static str,
        pub params: &'static [Type],
        pub ret: Type,
    }

    pub const PROPERTIES: &[LibProperty] = &[LibProperty { name: "pi", ty: Type::Real }];

    pub const FUNCTIONS: &[LibFunction] = &[
        LibFunction { name: "sqrt", params: &[Type::Real], ret: Type::Real },
        LibFunction { name: "abs", params: &[Type::Integer], ret: Type::Integer },
        LibFunction { name: "random", params: &[Type::Integer], ret: Type::Integer },
    ];
}
