use crate::codegen::labels::Label;
use crate::utils::config::assembly::{INSTRUCTION_INDENT, LABEL_INDENT, MEMBER_INDENT};
use crate::utils::errors::CodeGenResult;
use crate::utils::string_utils::write_line;

/// Text sink for IL. Only `emit_line` is required; every instruction helper
/// is layered on top of it.
pub trait CodeEmitter {
    fn emit_line(&mut self, indent: &str, text: &str) -> CodeGenResult<()>;

    // Assembly-level directives, unindented
    fn emit_directive(&mut self, text: &str) -> CodeGenResult<()> {
        self.emit_line("", text)
    }

    // Class members: fields and method headers/footers
    fn emit_member(&mut self, text: &str) -> CodeGenResult<()> {
        self.emit_line(MEMBER_INDENT, text)
    }

    fn emit(&mut self, instruction: &str) -> CodeGenResult<()> {
        self.emit_line(INSTRUCTION_INDENT, instruction)
    }

    fn emit_label(&mut self, label: &Label) -> CodeGenResult<()> {
        self.emit_line(LABEL_INDENT, &format!("{}:", label))
    }

    fn emit_blank(&mut self) -> CodeGenResult<()> {
        self.emit_line("", "")
    }

    fn emit_ldc_i4(&mut self, value: i64) -> CodeGenResult<()> {
        self.emit(&format!("ldc.i4 {}", value))
    }

    fn emit_ldc_r8(&mut self, literal: &str) -> CodeGenResult<()> {
        self.emit(&format!("ldc.r8 {}", literal))
    }

    fn emit_ldstr(&mut self, text: &str) -> CodeGenResult<()> {
        self.emit(&format!("ldstr \"{}\"", text.replace('\\', "\\\\")))
    }

    fn emit_ldarg(&mut self, name: &str) -> CodeGenResult<()> {
        self.emit(&format!("ldarg {}", name))
    }

    fn emit_ldloc(&mut self, name: &str) -> CodeGenResult<()> {
        self.emit(&format!("ldloc {}", name))
    }

    fn emit_stloc(&mut self, name: &str) -> CodeGenResult<()> {
        self.emit(&format!("stloc {}", name))
    }

    fn emit_ldsfld(&mut self, ty: &str, owner: &str, name: &str) -> CodeGenResult<()> {
        self.emit(&format!("ldsfld {} {}::{}", ty, owner, name))
    }

    fn emit_stsfld(&mut self, ty: &str, owner: &str, name: &str) -> CodeGenResult<()> {
        self.emit(&format!("stsfld {} {}::{}", ty, owner, name))
    }

    fn emit_call(&mut self, target: &str) -> CodeGenResult<()> {
        self.emit(&format!("call {}", target))
    }

    fn emit_jump(&mut self, label: &Label) -> CodeGenResult<()> {
        self.emit(&format!("br {}", label))
    }

    fn emit_brfalse(&mut self, label: &Label) -> CodeGenResult<()> {
        self.emit(&format!("brfalse {}", label))
    }

    fn emit_brtrue(&mut self, label: &Label) -> CodeGenResult<()> {
        self.emit(&format!("brtrue {}", label))
    }

    fn emit_pop(&mut self) -> CodeGenResult<()> {
        self.emit("pop")
    }

    fn emit_ret(&mut self) -> CodeGenResult<()> {
        self.emit("ret")
    }
}

pub struct StringCodeEmitter<'a> {
    output: &'a mut String,
}

impl<'a> StringCodeEmitter<'a> {
    pub fn new(output: &'a mut String) -> Self {
        StringCodeEmitter { output }
    }
}

impl<'a> CodeEmitter for StringCodeEmitter<'a> {
    fn emit_line(&mut self, indent: &str, text: &str) -> CodeGenResult<()> {
        if text.is_empty() {
            return write_line(self.output, format_args!(""));
        }
        write_line(self.output, format_args!("{}{}", indent, text))
    }
}
