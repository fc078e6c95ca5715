use crate::error::EngineError;

// The supported instruction set, decoded once from the uppercased mnemonic
// string instead of dispatched on it repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Mov,
    Xchg,
    Push,
    Pop,
    Add,
    Sub,
    Inc,
    Dec,
    Neg,
    Cmp,
    Mul,
    Div,
    And,
    Or,
    Xor,
    Not,
    Jmp,
    Je,
    Jne,
    Jg,
    Jge,
    Jl,
    Jle,
    Call,
    Ret,
    Iret,
    Loop,
    In,
    Out,
}

impl Opcode {
    pub fn parse(mnemonic: &str) -> Result<Opcode, EngineError> {
        Ok(match mnemonic.to_ascii_uppercase().as_str() {
            "MOV" => Opcode::Mov,
            "XCHG" => Opcode::Xchg,
            "PUSH" => Opcode::Push,
            "POP" => Opcode::Pop,
            "ADD" => Opcode::Add,
            "SUB" => Opcode::Sub,
            "INC" => Opcode::Inc,
            "DEC" => Opcode::Dec,
            "NEG" => Opcode::Neg,
            "CMP" => Opcode::Cmp,
            "MUL" => Opcode::Mul,
            "DIV" => Opcode::Div,
            "AND" => Opcode::And,
            "OR" => Opcode::Or,
            "XOR" => Opcode::Xor,
            "NOT" => Opcode::Not,
            "JMP" => Opcode::Jmp,
            "JE" => Opcode::Je,
            "JNE" => Opcode::Jne,
            "JG" => Opcode::Jg,
            "JGE" => Opcode::Jge,
            "JL" => Opcode::Jl,
            "JLE" => Opcode::Jle,
            "CALL" => Opcode::Call,
            "RET" => Opcode::Ret,
            "IRET" => Opcode::Iret,
            "LOOP" => Opcode::Loop,
            "IN" => Opcode::In,
            "OUT" => Opcode::Out,
            other => return Err(EngineError::NotImplemented(other.to_string())),
        })
    }

    pub fn is_conditional_jump(self) -> bool {
        matches!(
            self,
            Opcode::Je | Opcode::Jne | Opcode::Jg | Opcode::Jge | Opcode::Jl | Opcode::Jle
        )
    }

    /// True for opcodes whose sole operand is a label name rather than a
    /// register/immediate/memory operand.
    pub fn takes_label(self) -> bool {
        self.is_conditional_jump() || matches!(self, Opcode::Jmp | Opcode::Call | Opcode::Loop)
    }
}
