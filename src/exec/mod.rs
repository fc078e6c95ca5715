use std::collections::HashMap;

use crate::assembler::DecodedInstruction;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::registers::RegisterFile;

mod control;
mod logic;
mod math;
mod transfer;

/// Dispatches one decoded instruction. `ip` has already been advanced past
/// this instruction by the caller, so branch handlers are free to overwrite
/// it.
pub fn execute(
    decoded: &DecodedInstruction,
    regs: &mut RegisterFile,
    bus: &mut Bus,
    labels: &HashMap<String, u16>,
) -> Result<(), EngineError> {
    match decoded.opcode() {
        Opcode::Mov | Opcode::Xchg | Opcode::Push | Opcode::Pop | Opcode::In | Opcode::Out => {
            transfer::handle(decoded, regs, bus)
        }
        Opcode::Add | Opcode::Sub | Opcode::Inc | Opcode::Dec | Opcode::Neg | Opcode::Cmp
        | Opcode::Mul | Opcode::Div => math::handle(decoded, regs, bus),
        Opcode::And | Opcode::Or | Opcode::Xor | Opcode::Not => logic::handle(decoded, regs, bus),
        Opcode::Jmp
        | Opcode::Je
        | Opcode::Jne
        | Opcode::Jg
        | Opcode::Jge
        | Opcode::Jl
        | Opcode::Jle
        | Opcode::Call
        | Opcode::Ret
        | Opcode::Iret
        | Opcode::Loop => control::handle(decoded, regs, bus, labels),
    }
}
