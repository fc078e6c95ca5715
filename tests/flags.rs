mod support;

use edu8086::registers::Flags;
use support::run;

#[test]
fn eight_bit_half_preservation() {
    let engine = run("MOV AX, 0x1234\nMOV AL, 0xFF");
    let regs = engine.registers();
    assert_eq!(regs.ax, 0x12FF);
    assert_eq!(regs.get(edu8086::registers::Reg::Ah), 0x12);
    assert_eq!(regs.get(edu8086::registers::Reg::Al), 0xFF);
}

#[test]
fn cmp_updates_flags_without_writing_destination() {
    let engine = run("MOV AX, 5\nCMP AX, 5");
    let regs = engine.registers();
    assert_eq!(regs.ax, 5);
    assert!(regs.flag(Flags::ZF));
}

#[test]
fn not_leaves_every_flag_untouched() {
    let engine = run("MOV AX, 1\nSUB AX, 1\nNOT AX");
    let regs = engine.registers();
    // SUB AX,1 leaves ZF set (result 0); NOT must not clear it even though
    // its own result (0xFFFF) is nonzero.
    assert!(regs.flag(Flags::ZF));
    assert_eq!(regs.ax, 0xFFFF);
}

#[test]
fn xor_self_clears_register_and_sets_zero_flag() {
    let engine = run("MOV AX, 0x55AA\nXOR AX, AX");
    let regs = engine.registers();
    assert_eq!(regs.ax, 0);
    assert!(regs.flag(Flags::ZF));
    assert!(!regs.flag(Flags::SF));
}

#[test]
fn and_or_leave_carry_and_overflow_untouched() {
    let engine = run("MOV AX, 0xFFFF\nADD AX, 1\nMOV AX, 0x0F\nAND AX, 0xFF");
    let regs = engine.registers();
    // The ADD AX,1 on 0xFFFF sets CF and OF; the later AND must not clear them.
    assert!(regs.flag(Flags::CF));
}
