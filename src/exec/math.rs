use crate::assembler::DecodedInstruction;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::operand::{infer_width, Operand};
use crate::registers::{AluOp, RegisterFile, Reg, Width};

pub fn handle(decoded: &DecodedInstruction, regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let operands = decoded.operands();
    match decoded.opcode() {
        Opcode::Add => binary(operands, regs, bus, AluOp::Add),
        Opcode::Sub => binary(operands, regs, bus, AluOp::Sub),
        Opcode::Inc => unary(operands, regs, bus, AluOp::Inc),
        Opcode::Dec => unary(operands, regs, bus, AluOp::Dec),
        Opcode::Neg => unary(operands, regs, bus, AluOp::Neg),
        Opcode::Cmp => cmp(operands, regs, bus),
        Opcode::Mul => mul(operands, regs, bus),
        Opcode::Div => div(operands, regs, bus),
        other => Err(EngineError::NotImplemented(format!("{:?}", other))),
    }
}

fn operand_at<'a>(operands: &'a [Operand], index: usize) -> Result<&'a Operand, EngineError> {
    operands
        .get(index)
        .ok_or_else(|| EngineError::InvalidOperand(format!("operand {}", index)))
}

fn binary(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus, op: AluOp) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let src = operand_at(operands, 1)?;
    let width = infer_width(operands);
    let v1 = dest.read(regs, bus, width);
    let v2 = src.read(regs, bus, width);
    let result = regs.alu(op, v1, v2, width);
    dest.write(regs, bus, result, width)
}

fn unary(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus, op: AluOp) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let width = infer_width(operands);
    let v1 = dest.read(regs, bus, width);
    let result = regs.alu(op, v1, 1, width);
    dest.write(regs, bus, result, width)
}

// CMP runs the same subtraction as SUB for its flag effects but discards
// the result; the destination is never written.
fn cmp(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let src = operand_at(operands, 1)?;
    let width = infer_width(operands);
    let v1 = dest.read(regs, bus, width);
    let v2 = src.read(regs, bus, width);
    regs.alu(AluOp::Sub, v1, v2, width);
    Ok(())
}

/// Unsigned multiply: `AL * src -> AX` at byte width, `AX * src -> DX:AX`
/// at word width. Flags are left untouched.
fn mul(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let src = operand_at(operands, 0)?;
    let width = infer_width(&[src.clone()]);
    match width {
        Width::Byte => {
            let al = regs.get(Reg::Al) as u32;
            let value = src.read(regs, bus, Width::Byte) as u32;
            regs.set(Reg::Ax, (al * value) as u16);
        }
        Width::Word => {
            let ax = regs.get(Reg::Ax) as u32;
            let value = src.read(regs, bus, Width::Word) as u32;
            let full = ax * value;
            regs.set(Reg::Ax, (full & 0xFFFF) as u16);
            regs.set(Reg::Dx, (full >> 16) as u16);
        }
    }
    Ok(())
}

/// Unsigned divide: `AX / src -> AL` quotient, `AH` remainder at byte width;
/// `DX:AX / src -> AX` quotient, `DX` remainder at word width.
fn div(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let src = operand_at(operands, 0)?;
    let width = infer_width(&[src.clone()]);
    match width {
        Width::Byte => {
            let dividend = regs.get(Reg::Ax) as u32;
            let divisor = src.read(regs, bus, Width::Byte) as u32;
            if divisor == 0 {
                return Err(EngineError::DivideByZero);
            }
            regs.set(Reg::Al, (dividend / divisor) as u16 & 0xFF);
            regs.set(Reg::Ah, (dividend % divisor) as u16 & 0xFF);
        }
        Width::Word => {
            let ax = regs.get(Reg::Ax) as u32;
            let dx = regs.get(Reg::Dx) as u32;
            let dividend = (dx << 16) | ax;
            let divisor = src.read(regs, bus, Width::Word) as u32;
            if divisor == 0 {
                return Err(EngineError::DivideByZero);
            }
            regs.set(Reg::Ax, (dividend / divisor) as u16);
            regs.set(Reg::Dx, (dividend % divisor) as u16);
        }
    }
    Ok(())
}
