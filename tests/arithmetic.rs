mod support;

use edu8086::registers::Flags;
use support::run;

#[test]
fn basic_arithmetic() {
    let engine = run("MOV AX, 5\nMOV BX, 3\nADD AX, BX");
    let regs = engine.registers();
    assert_eq!(regs.ax, 8);
    assert_eq!(regs.bx, 3);
    assert!(!regs.flag(Flags::ZF));
    assert!(!regs.flag(Flags::SF));
    assert!(!regs.flag(Flags::CF));
    assert!(!regs.flag(Flags::OF));
}

#[test]
fn flag_edges_on_sub() {
    let engine = run("MOV AX, 0x0000\nSUB AX, 0x0001");
    let regs = engine.registers();
    assert_eq!(regs.ax, 0xFFFF);
    assert!(!regs.flag(Flags::ZF));
    assert!(regs.flag(Flags::SF));
    assert!(regs.flag(Flags::CF));
    assert!(!regs.flag(Flags::OF));
}

#[test]
fn signed_overflow_on_add() {
    let engine = run("MOV AX, 0x7FFF\nADD AX, 1");
    let regs = engine.registers();
    assert_eq!(regs.ax, 0x8000);
    assert!(!regs.flag(Flags::ZF));
    assert!(regs.flag(Flags::SF));
    assert!(!regs.flag(Flags::CF));
    assert!(regs.flag(Flags::OF));
}

#[test]
fn mul_word_splits_across_dx_and_ax() {
    let engine = run("MOV AX, 0x8000\nMOV BX, 2\nMUL BX");
    let regs = engine.registers();
    assert_eq!(regs.ax, 0);
    assert_eq!(regs.dx, 1);
}

#[test]
fn div_word_computes_quotient_and_remainder() {
    let engine = run("MOV AX, 17\nMOV DX, 0\nMOV BX, 5\nDIV BX");
    let regs = engine.registers();
    assert_eq!(regs.ax, 3);
    assert_eq!(regs.dx, 2);
}

#[test]
fn div_by_zero_is_reported_in_the_trace_log() {
    let engine = run("MOV AX, 1\nMOV BX, 0\nDIV BX");
    let logs = engine.bus().logs();
    assert!(logs.iter().any(|line| line.contains("divide by zero")));
}
