//! Fatal error taxonomy for the VM core.
//!
//! Every variant here is fatal to the offending process and, per spec,
//! aborts the entire scheduler run after being reported. There is no
//! try/catch inside the guest.

use thiserror::Error;

use crate::types::Pid;

/// One of the ten fatal runtime error kinds a `run_step` can raise.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// Process table full on `spawn`/`FORK`.
    #[error("no free process slot")]
    NoPid,

    /// Target mailbox full on enqueue.
    #[error("mailbox full")]
    MsgQFull,

    /// `SEND -2` (parent) when the process has no parent.
    #[error("target process is dead")]
    TgtDead,

    /// Pop/inspect on an empty data or call stack.
    #[error("stack empty")]
    StackEmpty,

    /// Insufficient operands remained in the program for the current opcode.
    #[error("missing operand")]
    NoOperand,

    /// `SEND` with `len > MSG_MAX`.
    #[error("message too large")]
    LargeMsg,

    /// Push on a full data or call stack.
    #[error("stack overflow")]
    StackOverflow,

    /// `CHILD_MAX` exceeded on `FORK`, or no room for an incoming
    /// `SCANS`/`RECV` payload.
    #[error("no space")]
    NoSpace,

    /// Unrecognised opcode.
    #[error("unknown opcode")]
    Unknown,

    /// `DIV`/`MOD` with a zero divisor.
    #[error("Division by zero")]
    DivZero,
}

/// A fatal error tagged with the process that raised it, ready to be
/// formatted as the scheduler's one-line diagnostic (`"<pid>: <message>"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatalError {
    pub pid: Pid,
    pub kind: VmError,
}

impl std::fmt::Display for FatalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>: {}", self.pid, self.kind)
    }
}

/// Result type for a single interpreter step.
pub type StepResult<T> = Result<T, VmError>;
