//! Instruction dispatch: `run_step` decodes and executes one opcode for
//! one process, and is the sole point where a process's state,
//! neighbors' mailboxes, and the process table are all touched at once.

use crate::bytecode::Opcode;
use crate::error::VmError;
use crate::io::{parse_int, LineInput, LineOutput};
use crate::limits::MSG_MAX;
use crate::runtime::message::{EnqueueError, Message};
use crate::runtime::process::ProcessRecord;
use crate::runtime::relations;
use crate::runtime::table::ProcessTable;
use crate::types::Pid;

/// Whether a step caused the process to stop running this scheduler
/// pass (terminated, or now blocked on `RECV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Blocked,
    Terminated,
}

/// Execute exactly one instruction for `pid`. Mutates `table` (for
/// `FORK`/`SEND`/`HALT`/`RECV`-unblocking) and drives `input`/`output`
/// for the two I/O opcodes.
pub fn run_step(
    table: &mut ProcessTable,
    pid: Pid,
    input: &mut dyn LineInput,
    output: &mut dyn LineOutput,
) -> Result<StepOutcome, VmError> {
    let op_word = {
        let p = table.get_mut(pid).expect("run_step on unknown pid");
        let ip = p.ip;
        match p.prog.fetch(ip) {
            Some(word) => {
                p.ip += 1;
                word
            }
            None => {
                // Running off the end of the program terminates the
                // process, same as HALT; it is not a missing-operand error.
                relations::terminate(table, pid);
                return Ok(StepOutcome::Terminated);
            }
        }
    };
    let op = Opcode::try_from(op_word)?;

    match op {
        Opcode::Halt => {
            relations::terminate(table, pid);
            return Ok(StepOutcome::Terminated);
        }
        Opcode::Push => {
            let imm = fetch_operand(table, pid)?;
            proc_mut(table, pid)?.push(imm)?;
        }
        Opcode::Pop => {
            proc_mut(table, pid)?.pop()?;
        }
        Opcode::Dup => {
            let top = proc_mut(table, pid)?.peek()?;
            proc_mut(table, pid)?.push(top)?;
        }
        Opcode::Swap => {
            let p = proc_mut(table, pid)?;
            let a = p.pop()?;
            let b = p.pop()?;
            p.push(a)?;
            p.push(b)?;
        }
        Opcode::Scan => {
            let line = input.read_line(15);
            let n = parse_int(&line);
            proc_mut(table, pid)?.push(n)?;
        }
        Opcode::Scans => {
            let line = input.read_line(255);
            let p = proc_mut(table, pid)?;
            for byte in line.bytes().rev() {
                push_payload(p, byte as i32)?;
            }
            push_payload(p, line.len() as i32)?;
        }
        Opcode::Print => {
            let val = proc_mut(table, pid)?.pop()?;
            output.write_str(&format!("<{}>: {}\n", pid, val));
        }
        Opcode::Prints => {
            let p = proc_mut(table, pid)?;
            let len = p.pop()? as usize;
            let mut bytes = Vec::with_capacity(len);
            for _ in 0..len {
                bytes.push(p.pop()? as u8);
            }
            output.write_str(&format!("<{}>: ", pid));
            output.write_str(&String::from_utf8_lossy(&bytes));
        }
        Opcode::Add => binary_op(table, pid, |x, y| Ok(y.wrapping_add(x)))?,
        Opcode::Sub => binary_op(table, pid, |x, y| Ok(y.wrapping_sub(x)))?,
        Opcode::Mul => binary_op(table, pid, |x, y| Ok(y.wrapping_mul(x)))?,
        Opcode::Div => binary_op(table, pid, |x, y| {
            if x == 0 {
                Err(VmError::DivZero)
            } else {
                Ok(y.wrapping_div(x))
            }
        })?,
        Opcode::Mod => binary_op(table, pid, |x, y| {
            if x == 0 {
                Err(VmError::DivZero)
            } else {
                Ok(y.wrapping_rem(x))
            }
        })?,
        Opcode::And => binary_op(table, pid, |x, y| Ok(y & x))?,
        Opcode::Or => binary_op(table, pid, |x, y| Ok(y | x))?,
        Opcode::Xor => binary_op(table, pid, |x, y| Ok(y ^ x))?,
        Opcode::Not => {
            let p = proc_mut(table, pid)?;
            let v = p.pop()?;
            p.push(!v)?;
        }
        Opcode::Lshift => binary_op(table, pid, |x, y| Ok(y << (x & 31)))?,
        Opcode::Rshift => binary_op(table, pid, |x, y| Ok(y >> (x & 31)))?,
        Opcode::Call => {
            let a1 = fetch_operand(table, pid)? as usize;
            let a2 = fetch_operand(table, pid)? as usize;
            let a3 = fetch_operand(table, pid)? as usize;
            let p = proc_mut(table, pid)?;
            let cond = p.pop()?;
            let ret_ip = p.ip;
            p.push_call(ret_ip)?;

            let target = if cond < 0 {
                arg_or_none(a1)
            } else if cond == 0 {
                arg_or_none(a2)
            } else {
                arg_or_none(a3)
            };
            if let Some(t) = target {
                proc_mut(table, pid)?.ip = t;
            }
        }
        Opcode::Ret => {
            let p = proc_mut(table, pid)?;
            let ret_ip = p.pop_call()?;
            p.ip = ret_ip;
        }
        Opcode::Fork => {
            let addr = fetch_operand(table, pid)? as usize;
            fork(table, pid, addr)?;
        }
        Opcode::Send => {
            send(table, pid)?;
        }
        Opcode::Recv => {
            let p = proc_mut(table, pid)?;
            match p.mailbox.dequeue() {
                Some(msg) => {
                    p.waiting = false;
                    for i in (0..msg.len).rev() {
                        push_payload(p, msg.data[i])?;
                    }
                    push_payload(p, msg.len as i32)?;
                    push_payload(p, msg.from.0)?;
                }
                None => {
                    p.waiting = true;
                    p.ip -= 1;
                    return Ok(StepOutcome::Blocked);
                }
            }
        }
    }

    Ok(StepOutcome::Continue)
}

fn proc_mut(table: &mut ProcessTable, pid: Pid) -> Result<&mut ProcessRecord, VmError> {
    table.get_mut(pid).ok_or(VmError::TgtDead)
}

/// Push an incoming `SCANS`/`RECV` payload word, reporting `NoSpace` (not
/// `StackOverflow`) on a full data stack: this is "no room for an
/// incoming payload", not an ordinary `PUSH`/arithmetic overflow.
fn push_payload(p: &mut ProcessRecord, value: i32) -> Result<(), VmError> {
    p.push(value).map_err(|_| VmError::NoSpace)
}

fn fetch_operand(table: &mut ProcessTable, pid: Pid) -> Result<i32, VmError> {
    let p = proc_mut(table, pid)?;
    let word = p.prog.fetch(p.ip).ok_or(VmError::NoOperand)?;
    p.ip += 1;
    Ok(word)
}

/// `CALL`'s three jump-target words are sentinel-checked (`-1` suppresses
/// that branch) rather than bounds-checked here; an out-of-range, non
/// sentinel target surfaces as `NoOperand` on the next `fetch` instead.
fn arg_or_none(addr: usize) -> Option<usize> {
    if addr == usize::MAX {
        None
    } else {
        Some(addr)
    }
}

fn binary_op(
    table: &mut ProcessTable,
    pid: Pid,
    f: impl Fn(i32, i32) -> Result<i32, VmError>,
) -> Result<(), VmError> {
    let p = proc_mut(table, pid)?;
    let x = p.pop()?;
    let y = p.pop()?;
    let result = f(x, y)?;
    p.push(result)
}

fn fork(table: &mut ProcessTable, pid: Pid, addr: usize) -> Result<(), VmError> {
    if proc_mut(table, pid)?.cp >= crate::limits::CHILD_MAX {
        return Err(VmError::NoSpace);
    }
    let prog = table
        .get(pid)
        .unwrap()
        .prog
        .child_view(addr)
        .ok_or(VmError::NoOperand)?;

    let child_pid = table.allocate()?;
    let child = ProcessRecord::new(child_pid, pid, prog);
    table.insert(child);
    proc_mut(table, pid)?.add_child(child_pid)?;
    Ok(())
}

fn send(table: &mut ProcessTable, pid: Pid) -> Result<(), VmError> {
    let (to, data) = {
        let p = proc_mut(table, pid)?;
        let to = p.pop()?;
        let len = p.pop()? as usize;
        if len > MSG_MAX {
            return Err(VmError::LargeMsg);
        }
        let mut data = Vec::with_capacity(len);
        for _ in 0..len {
            data.push(p.pop()?);
        }
        (to, data)
    };

    if to == -2 {
        let ppid = proc_mut(table, pid)?.ppid;
        if ppid.is_none() {
            return Err(VmError::TgtDead);
        }
        enqueue_to(table, pid, ppid, &data)?;
    } else if to == -1 {
        let children: Vec<Pid> = {
            let p = proc_mut(table, pid)?;
            p.children[..p.cp].to_vec()
        };
        for child in children {
            // A mid-list tombstone (a child that terminated out of order;
            // `remove_child` only compacts *trailing* tombstones) is not a
            // live target. Broadcast reaches every *live* child only.
            if child.is_none() {
                continue;
            }
            enqueue_to(table, pid, child, &data)?;
        }
    } else {
        let target = Pid(to);
        if relations::sendable(table, pid, target) {
            enqueue_to(table, pid, target, &data)?;
        }
    }
    Ok(())
}

fn enqueue_to(table: &mut ProcessTable, from: Pid, to: Pid, data: &[i32]) -> Result<(), VmError> {
    let target = table.get_mut(to).ok_or(VmError::TgtDead)?;
    let msg = Message::new(from, data);
    match target.mailbox.enqueue(msg) {
        Ok(()) => {
            target.waiting = false;
            Ok(())
        }
        Err(EnqueueError::Full) => Err(VmError::MsgQFull),
    }
}
