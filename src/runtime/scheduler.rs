//! Cooperative round-robin scheduler.
//!
//! A single outer loop repeatedly sweeps the process table in PID
//! order, giving each live, non-blocked process a fixed burst of
//! `TIME_SLICE` steps, until a full sweep makes no progress at all
//! (every process is either terminated or blocked on `RECV`).

use log::{debug, error};

use crate::error::FatalError;
use crate::io::{LineInput, LineOutput};
use crate::limits::TIME_SLICE;
use crate::runtime::interp::{run_step, StepOutcome};
use crate::runtime::table::ProcessTable;

/// Drives every process in `table` to quiescence, reporting the first
/// fatal error (if any) as `Err`. A quiescent return is not itself an
/// error: some processes may remain alive and `waiting` forever (a
/// deadlock), which is a valid terminal state, not a fault.
pub fn run(
    table: &mut ProcessTable,
    input: &mut dyn LineInput,
    output: &mut dyn LineOutput,
) -> Result<(), FatalError> {
    loop {
        let mut progressed = false;

        for pid in table.iter_pids() {
            let runnable = match table.get(pid) {
                Some(p) => p.active && !p.waiting,
                None => false,
            };
            if !runnable {
                continue;
            }
            progressed = true;

            for _ in 0..TIME_SLICE {
                let still_runnable = match table.get(pid) {
                    Some(p) => p.active && !p.waiting,
                    None => false,
                };
                if !still_runnable {
                    break;
                }

                match run_step(table, pid, input, output) {
                    Ok(StepOutcome::Terminated) => {
                        debug!("{}: terminated", pid);
                        break;
                    }
                    Ok(StepOutcome::Blocked) => {
                        debug!("{}: blocked on RECV", pid);
                        break;
                    }
                    Ok(StepOutcome::Continue) => {}
                    Err(kind) => {
                        let fatal = FatalError { pid, kind };
                        error!("{}", fatal);
                        return Err(fatal);
                    }
                }
            }
        }

        if !progressed {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Program;
    use crate::io::{MemInput, MemOutput};
    use crate::runtime::process::ProcessRecord;
    use crate::types::Pid;

    #[test]
    fn runs_to_quiescence_on_halt() {
        let mut table = ProcessTable::new();
        let pid = table.allocate().unwrap();
        table.insert(ProcessRecord::new(
            pid,
            Pid::NONE,
            Program::new(vec![1, 2, 1, 3, 9, 7, 0]),
        ));
        let mut input = MemInput::new(vec![]);
        let mut output = MemOutput::default();
        run(&mut table, &mut input, &mut output).unwrap();
        assert_eq!(output.buffer, "<0>: 5\n");
    }

    #[test]
    fn lone_recv_leaves_process_waiting_without_erroring() {
        let mut table = ProcessTable::new();
        let pid = table.allocate().unwrap();
        table.insert(ProcessRecord::new(pid, Pid::NONE, Program::new(vec![24])));
        let mut input = MemInput::new(vec![]);
        let mut output = MemOutput::default();
        run(&mut table, &mut input, &mut output).unwrap();
        assert!(table.get(pid).unwrap().waiting);
        assert_eq!(table.get(pid).unwrap().ip, 0);
    }

    #[test]
    fn fatal_error_is_reported_and_halts_scheduler() {
        let mut table = ProcessTable::new();
        let pid = table.allocate().unwrap();
        table.insert(ProcessRecord::new(
            pid,
            Pid::NONE,
            Program::new(vec![1, 10, 1, 0, 12]),
        ));
        let mut input = MemInput::new(vec![]);
        let mut output = MemOutput::default();
        let err = run(&mut table, &mut input, &mut output).unwrap_err();
        assert_eq!(err.pid, pid);
    }
}
