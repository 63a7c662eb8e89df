//! End-to-end worked examples exercised through the public `Vm` API.

mod common;
use common::*;

use mvm::io::{MemInput, MemOutput};
use mvm::Vm;

#[test]
fn s1_arithmetic() {
    // PUSH 2; PUSH 3; ADD; PRINT; HALT
    let program = vec![PUSH, 2, PUSH, 3, ADD, PRINT, HALT];
    let mut vm = Vm::new(MemInput::new(vec![]), MemOutput::default());
    vm.spawn_process(program).unwrap();
    vm.exec().unwrap();
    assert_eq!(vm.output().buffer, "<0>: 5\n");
}

#[test]
fn s2_subtraction_order() {
    // PUSH 10; PUSH 3; SUB; PRINT; HALT -> second minus first = 7
    let program = vec![PUSH, 10, PUSH, 3, SUB, PRINT, HALT];
    let mut vm = Vm::new(MemInput::new(vec![]), MemOutput::default());
    vm.spawn_process(program).unwrap();
    vm.exec().unwrap();
    assert_eq!(vm.output().buffer, "<0>: 7\n");
}

#[test]
fn s3_fork_and_message() {
    // root: SCANS; PUSH -1; FORK 7; SEND; HALT
    // @7:   RECV; POP; PRINTS; HALT
    let program = vec![
        SCANS, PUSH, -1, FORK, 7, SEND, HALT, // 0..6
        RECV, POP, PRINTS, HALT, // 7..10
    ];
    let mut vm = Vm::new(MemInput::new(vec!["hello\n".to_string()]), MemOutput::default());
    vm.spawn_process(program).unwrap();
    vm.exec().unwrap();
    assert_eq!(vm.output().buffer, "<1>: hello\n");
}

#[test]
fn s4_divide_by_zero_is_fatal() {
    // A zero divisor on top of stack (last pushed) triggers DivZero.
    let program = vec![PUSH, 10, PUSH, 0, DIV];
    let mut vm = Vm::new(MemInput::new(vec![]), MemOutput::default());
    vm.spawn_process(program).unwrap();
    let err = vm.exec().unwrap_err();
    assert_eq!(format!("{}", err), "<0>: Division by zero");
}

#[test]
fn s5_broadcast_to_children() {
    // root forks 3 children that discard `from` and `len` before printing
    // the single payload word, then broadcasts a one-word message (42).
    let child = vec![RECV, POP, POP, PRINT, HALT];
    let root = vec![
        FORK, 14, // child a at absolute addr 14 (start of the appended child code)
        FORK, 14, // child b
        FORK, 14, // child c
        PUSH, 42, PUSH, 1, PUSH, -1, SEND, HALT,
    ];
    let child_addr = root.len();
    let mut program = root;
    program.extend(child);
    assert_eq!(program[child_addr], RECV);

    let mut vm = Vm::new(MemInput::new(vec![]), MemOutput::default());
    vm.spawn_process(program).unwrap();
    vm.exec().unwrap();

    let out = &vm.output().buffer;
    assert_eq!(out, "<1>: 42\n<2>: 42\n<3>: 42\n");
}

#[test]
fn s6_deadlock_quiescence() {
    // A single process blocks on RECV forever; the scheduler must still
    // exit cleanly rather than loop or error.
    let program = vec![RECV];
    let mut vm = Vm::new(MemInput::new(vec![]), MemOutput::default());
    let pid = vm.spawn_process(program).unwrap();
    vm.exec().unwrap();

    let proc = vm.table().get(pid).unwrap();
    assert!(proc.waiting);
    assert_eq!(proc.ip, 0);
}
