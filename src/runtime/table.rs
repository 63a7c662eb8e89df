//! Process table and PID allocator.
//!
//! Backed by a `Vec` that grows lazily to its high-water mark instead of
//! eagerly allocating `PROC_MAX` slots up front (the original's static
//! `procs[PROC_MAX]` array is wasteful to mirror directly in Rust since
//! each slot now owns several kilobyte-sized boxed arrays). Allocation
//! and release stay O(1): the free-list is tried first, and only once
//! it's empty does the table grow.

use crate::error::VmError;
use crate::limits::PROC_MAX;
use crate::runtime::process::ProcessRecord;
use crate::types::Pid;

pub struct ProcessTable {
    slots: Vec<Option<ProcessRecord>>,
    free_list: Vec<Pid>,
    process_count: usize,
}

impl ProcessTable {
    pub fn new() -> Self {
        ProcessTable {
            slots: Vec::new(),
            free_list: Vec::new(),
            process_count: 0,
        }
    }

    /// Reserve a PID for a new process. Prefers the free-list; only
    /// bumps `process_count` when it's empty. Fails `NoPid` once
    /// `PROC_MAX` is reached with no released slots.
    pub fn allocate(&mut self) -> Result<Pid, VmError> {
        if let Some(pid) = self.free_list.pop() {
            return Ok(pid);
        }
        if self.process_count >= PROC_MAX {
            return Err(VmError::NoPid);
        }
        let pid = Pid::from_index(self.process_count);
        self.process_count += 1;
        self.slots.push(None);
        Ok(pid)
    }

    /// Install a freshly constructed record at its already-allocated PID.
    pub fn insert(&mut self, record: ProcessRecord) {
        let idx = record.pid.index().expect("insert requires a live pid");
        self.slots[idx] = Some(record);
    }

    /// Return a slot's PID to the free-list after `terminate` has run.
    pub fn release(&mut self, pid: Pid) {
        if let Some(idx) = pid.index() {
            self.slots[idx] = None;
        }
        self.free_list.push(pid);
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessRecord> {
        pid.index().and_then(|i| self.slots.get(i)).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut ProcessRecord> {
        pid.index().and_then(|i| self.slots.get_mut(i)).and_then(|s| s.as_mut())
    }

    /// Number of slots ever allocated (the high-water mark), i.e. the
    /// bound the scheduler's outer pass iterates over.
    pub fn process_count(&self) -> usize {
        self.process_count
    }

    pub fn iter_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        (0..self.process_count).map(Pid::from_index)
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        ProcessTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Program;

    #[test]
    fn allocate_bumps_high_water_mark() {
        let mut t = ProcessTable::new();
        let a = t.allocate().unwrap();
        let b = t.allocate().unwrap();
        assert_eq!(a, Pid(0));
        assert_eq!(b, Pid(1));
        assert_eq!(t.process_count(), 2);
    }

    #[test]
    fn release_recycles_before_growing() {
        let mut t = ProcessTable::new();
        let a = t.allocate().unwrap();
        t.insert(ProcessRecord::new(a, Pid::NONE, Program::new(vec![0])));
        t.release(a);
        let b = t.allocate().unwrap();
        assert_eq!(b, a);
        assert_eq!(t.process_count(), 1);
    }
}
