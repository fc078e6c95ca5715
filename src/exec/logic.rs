use crate::assembler::DecodedInstruction;
use crate::bus::Bus;
use crate::error::EngineError;
use crate::opcode::Opcode;
use crate::operand::{infer_width, Operand};
use crate::registers::{AluOp, RegisterFile};

pub fn handle(decoded: &DecodedInstruction, regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let operands = decoded.operands();
    match decoded.opcode() {
        Opcode::And => binary(operands, regs, bus, AluOp::And),
        Opcode::Or => binary(operands, regs, bus, AluOp::Or),
        Opcode::Xor => binary(operands, regs, bus, AluOp::Xor),
        Opcode::Not => not(operands, regs, bus),
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

/// `NOT` complements its operand's bits in place. Unlike the other logic
/// operations it leaves every flag untouched, so it bypasses `alu()`
/// entirely rather than routing through a flag-updating path.
fn not(operands: &[Operand], regs: &mut RegisterFile, bus: &mut Bus) -> Result<(), EngineError> {
    let dest = operand_at(operands, 0)?;
    let width = infer_width(operands);
    let value = dest.read(regs, bus, width);
    let result = (!value) & width.mask() as u16;
    dest.write(regs, bus, result, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::Loader;
    use crate::registers::Flags;

    fn decode(source: &str) -> DecodedInstruction {
        let mut loader = Loader::new();
        loader.load(source, 0, 1 << 20).unwrap();
        loader.program.get(&0usize).unwrap().decoded.clone().unwrap()
    }

    #[test]
    fn xor_self_clears_and_sets_zero_flag() {
        let decoded = decode("XOR AX, AX");
        let mut regs = RegisterFile::new();
        regs.ax = 0x1234;
        let mut bus = Bus::new(1024);
        handle(&decoded, &mut regs, &mut bus).unwrap();
        assert_eq!(regs.ax, 0);
        assert!(regs.flag(Flags::ZF));
    }

    #[test]
    fn not_leaves_flags_untouched() {
        let decoded = decode("NOT AX");
        let mut regs = RegisterFile::new();
        regs.ax = 0x00FF;
        regs.flags.insert(Flags::ZF | Flags::CF);
        let mut bus = Bus::new(1024);
        handle(&decoded, &mut regs, &mut bus).unwrap();
        assert_eq!(regs.ax, 0xFF00);
        assert!(regs.flag(Flags::ZF));
        assert!(regs.flag(Flags::CF));
    }
}
