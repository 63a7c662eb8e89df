//! A miniature, cooperatively-scheduled, message-passing stack VM.
//!
//! Each process runs an independent bytecode program over its own
//! evaluation stack, call stack, and mailbox; processes form a
//! parent/child tree and communicate solely through asynchronous message
//! passing. The scheduler is single-threaded and deterministic: no
//! process ever actually runs in parallel with another.

#![warn(clippy::all)]

pub mod bytecode;
pub mod cli;
pub mod error;
pub mod io;
pub mod limits;
pub mod runtime;
pub mod types;

pub use error::{FatalError, VmError};
pub use limits::Limits;
pub use runtime::{ProcessTable, Vm};
pub use types::{Pid, Word};

/// Crate version, for embedders that want to report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
