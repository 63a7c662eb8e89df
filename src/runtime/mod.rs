//! The VM runtime: process table, mailboxes, relationship manager,
//! instruction dispatch, and the cooperative scheduler that drives them.

pub mod interp;
pub mod message;
pub mod process;
pub mod relations;
pub mod scheduler;
pub mod table;

pub use message::{Mailbox, Message};
pub use process::ProcessRecord;
pub use table::ProcessTable;

use crate::bytecode::Program;
use crate::error::FatalError;
use crate::io::{LineInput, LineOutput};
use crate::types::Pid;

/// The public embedder-facing VM handle: owns the process table and the
/// host I/O collaborators, and exposes the two operations an embedding
/// application needs: seed a root process, then run it to quiescence.
pub struct Vm<I, O> {
    table: ProcessTable,
    input: I,
    output: O,
}

impl<I: LineInput, O: LineOutput> Vm<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Vm {
            table: ProcessTable::new(),
            input,
            output,
        }
    }

    /// Spawn a root process (no parent) executing `program`. Returns its
    /// PID, or `NoPid` if the process table is already full.
    pub fn spawn_process(&mut self, program: Vec<i32>) -> Result<Pid, crate::error::VmError> {
        let pid = self.table.allocate()?;
        log::debug!("{}: spawned (root)", pid);
        self.table
            .insert(ProcessRecord::new(pid, Pid::NONE, Program::new(program)));
        Ok(pid)
    }

    /// Run every live process to quiescence. Returns the first fatal
    /// error encountered, already logged at `error!` by the scheduler.
    pub fn exec(&mut self) -> Result<(), FatalError> {
        scheduler::run(&mut self.table, &mut self.input, &mut self.output)
    }

    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
