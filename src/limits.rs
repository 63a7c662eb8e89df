//! Capacity constants for the VM's fixed-size structures.
//!
//! These are compile-time constants rather than runtime configuration: every
//! per-process array (`stack`, `call_stack`, `children`, mailbox ring) is
//! sized from them once, at process creation, and never grows. A
//! reimplementation may raise these values but must expose them as constants.

/// Maximum depth of a process's data stack.
pub const STACK_MAX: usize = 2048;
/// Maximum depth of a process's call stack (return addresses).
pub const CALL_STACK_MAX: usize = 2048;
/// Maximum number of process-table slots ever in use at once.
pub const PROC_MAX: usize = 1028;
/// Maximum number of live children a single process may track.
pub const CHILD_MAX: usize = 1028;
/// Maximum number of messages a mailbox ring can hold (one slot is reserved
/// to distinguish empty from full; effective capacity is `MAIL_MAX - 1`).
pub const MAIL_MAX: usize = 1024;
/// Maximum number of data words a single message may carry.
pub const MSG_MAX: usize = 256;
/// Number of instructions a process gets per scheduler visit.
pub const TIME_SLICE: usize = 3;

/// Snapshot of the active capacity constants, for introspection by
/// embedders. The constants above are what the fixed-size arrays actually
/// use; this struct exists so a caller can log or report the limits a
/// particular build was compiled with, mirroring a runtime config value
/// without implying the arrays are resizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub stack_max: usize,
    pub call_stack_max: usize,
    pub proc_max: usize,
    pub child_max: usize,
    pub mail_max: usize,
    pub msg_max: usize,
    pub time_slice: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            stack_max: STACK_MAX,
            call_stack_max: CALL_STACK_MAX,
            proc_max: PROC_MAX,
            child_max: CHILD_MAX,
            mail_max: MAIL_MAX,
            msg_max: MSG_MAX,
            time_slice: TIME_SLICE,
        }
    }
}
