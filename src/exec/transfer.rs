use crate::assembler::DecodedInstruction;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::operand::{infer_width, Operand};
use crate::registers::{RegisterFile, Width};

pub fn handle(decoded: &DecodedInstruction, regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let operands = decoded.operands();
    match decoded.opcode() {
        Opcode::Mov => mov(operands, regs, bus),
        Opcode::Xchg => xchg(operands, regs, bus),
        Opcode::Push => push(operands, regs, bus),
        Opcode::Pop => pop(operands, regs, bus),
        Opcode::In => io_in(operands, regs, bus),
        Opcode::Out => io_out(operands, regs, bus),
        other => Err(EngineError::NotImplemented(format!("{:?}", other))),
    }
}

fn operand_at<'a>(operands: &'a [Operand], index: usize) -> Result<&'a Operand, EngineError> {
    operands
        .get(index)
        .ok_or_else(|| EngineError::InvalidOperand(format!("operand {}", index)))
}

fn mov(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let src = operand_at(operands, 1)?;
    let width = infer_width(operands);
    let value = src.read(regs, bus, width);
    dest.write(regs, bus, value, width)
}

fn xchg(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let src = operand_at(operands, 1)?;
    let width = infer_width(operands);
    let dest_value = dest.read(regs, bus, width);
    let src_value = src.read(regs, bus, width);
    src.write(regs, bus, dest_value, width)?;
    dest.write(regs, bus, src_value, width)
}

fn push(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let src = operand_at(operands, 0)?;
    let value = src.read(regs, bus, Width::Word);
    regs.sp = regs.sp.wrapping_sub(2);
    bus.write(regs.ss, regs.sp, value, Width::Word);
    Ok(())
}

fn pop(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let value = bus.read(regs.ss, regs.sp, Width::Word);
    regs.sp = regs.sp.wrapping_add(2);
    dest.write(regs, bus, value, Width::Word)
}

fn io_in(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let port = operand_at(operands, 1)?;
    let port_value = port.read(regs, bus, Width::Word);
    bus.log_line(&format!("[IO] IN port {:04X}h -> 0", port_value));
    dest.write(regs, bus, 0, Width::Word)
}

fn io_out(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let port = operand_at(operands, 0)?;
    let src = operand_at(operands, 1)?;
    let port_value = port.read(regs, bus, Width::Word);
    let value = src.read(regs, bus, Width::Word);
    bus.log_line(&format!("[IO] OUT port {:04X}h <- {:04X}h", port_value, value));
    Ok(())
}
