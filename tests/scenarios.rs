mod support;

use edu8086::engine::{Engine, SegmentInit, StepOutcome};
use support::run;

#[test]
fn push_then_pop_restores_stack_pointer_and_value() {
    let mut engine = Engine::new(1 << 20);
    engine.load("MOV AX, 0x1234\nPUSH AX\nPOP BX", SegmentInit::default()).unwrap();
    let sp_before = engine.registers().sp;
    engine.step(); // MOV
    let sp_after_mov = engine.registers().sp;
    engine.step(); // PUSH
    engine.step(); // POP
    let regs = engine.registers();
    assert_eq!(regs.bx, 0x1234);
    assert_eq!(regs.sp, sp_after_mov);
    assert_eq!(sp_before, sp_after_mov);
}

#[test]
fn ip_advances_by_decoded_size_for_non_control_instructions() {
    let mut engine = Engine::new(1 << 20);
    engine.load("MOV AX, 1\nADD AX, 1", SegmentInit::default()).unwrap();
    assert_eq!(engine.registers().ip, 0);
    engine.step();
    // MOV AX, 1 has two operands -> size 2 + 2*2 = 6.
    assert_eq!(engine.registers().ip, 6);
}

#[test]
fn step_returns_end_once_the_next_address_is_unmapped() {
    let mut engine = Engine::new(1 << 20);
    engine.load("MOV AX, 1", SegmentInit::default()).unwrap();
    assert_eq!(engine.step(), StepOutcome::Ok);
    assert_eq!(engine.step(), StepOutcome::End);
}

#[test]
fn snapshot_reports_registers_flags_memory_and_logs() {
    let engine = run("MOV AX, 5\nMOV BX, 3\nADD AX, BX");
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.registers.ax, 8);
    assert_eq!(snapshot.memory.len(), 256);
}

#[test]
fn reset_restores_construction_state() {
    let mut engine = Engine::new(1 << 20);
    engine.load("MOV AX, 5", SegmentInit::default()).unwrap();
    engine.run();
    assert_eq!(engine.registers().ax, 5);
    engine.reset();
    assert_eq!(engine.registers().ax, 0);
    assert_eq!(engine.step(), StepOutcome::End);
}
