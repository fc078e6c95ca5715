use std::collections::HashMap;

use crate::assembler::DecodedInstruction;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::registers::{Flags, RegisterFile, Width};

pub fn handle(
    decoded: &DecodedInstruction,
    regs: &mut RegisterFile,
    bus: &mut Bus,
    labels: &HashMap<String, u16>,
) -> Result<(), EngineError> {
    match decoded.opcode() {
        Opcode::Jmp => jump_to(decoded, regs, labels),
        Opcode::Je => {
            let condition = regs.flag(Flags::ZF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Jne => {
            let condition = !regs.flag(Flags::ZF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Jg => {
            let condition = !regs.flag(Flags::ZF) && regs.flag(Flags::SF) == regs.flag(Flags::OF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Jge => {
            let condition = regs.flag(Flags::SF) == regs.flag(Flags::OF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Jl => {
            let condition = regs.flag(Flags::SF) != regs.flag(Flags::OF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Jle => {
            let condition = regs.flag(Flags::ZF) || regs.flag(Flags::SF) != regs.flag(Flags::OF);
            jump_if(decoded, regs, labels, condition)
        }
        Opcode::Call => call(decoded, regs, bus, labels),
        Opcode::Ret => ret(regs, bus),
        Opcode::Iret => ret(regs, bus),
        Opcode::Loop => loop_op(decoded, regs, labels),
        other => Err(EngineError::NotImplemented(format!("{:?}", other))),
    }
}

fn label_target(decoded: &DecodedInstruction, labels: &HashMap<String, u16>) -> Result<u16, EngineError> {
    let name = decoded
        .label()
        .ok_or_else(|| EngineError::InvalidOperand("missing branch target".to_string()))?;
    labels
        .get(name)
        .copied()
        .ok_or_else(|| EngineError::UnknownLabel(name.to_string()))
}

fn jump_to(decoded: &DecodedInstruction, regs: &mut RegisterFile, labels: &HashMap<String, u16>) -> Result<(), EngineError> {
    regs.ip = label_target(decoded, labels)?;
    Ok(())
}

fn jump_if(
    decoded: &DecodedInstruction,
    regs: &mut RegisterFile,
    labels: &HashMap<String, u16>,
    condition: bool,
) -> Result<(), EngineError> {
    let target = label_target(decoded, labels)?;
    if condition {
        regs.ip = target;
    }
    Ok(())
}

/// `CALL` pushes the already-advanced return address, then jumps.
fn call(
    decoded: &DecodedInstruction,
    regs: &mut RegisterFile,
    bus: &mut Bus,
    labels: &HashMap<String, u16>,
) -> Result<(), EngineError> {
    let target = label_target(decoded, labels)?;
    let return_ip = regs.ip;
    regs.sp = regs.sp.wrapping_sub(2);
    bus.write(regs.ss, regs.sp, return_ip, Width::Word);
    regs.ip = target;
    Ok(())
}

// RET and IRET share the same pop-into-ip semantics here; there's no
// separate flags/cs frame to restore.
fn ret(regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let target = bus.read(regs.ss, regs.sp, Width::Word);
    regs.sp = regs.sp.wrapping_add(2);
    regs.ip = target;
    Ok(())
}

/// Decrements `cx`, then jumps while it is still nonzero.
fn loop_op(decoded: &DecodedInstruction, regs: &mut RegisterFile, labels: &HashMap<String, u16>) -> Result<(), EngineError> {
    regs.cx = regs.cx.wrapping_sub(1);
    let target = label_target(decoded, labels)?;
    if regs.cx != 0 {
        regs.ip = target;
    }
    Ok(())
}
