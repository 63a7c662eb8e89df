//! Parent/child visibility and termination cascades.
//!
//! The process tree itself lives on each [`ProcessRecord`] (`ppid` and
//! `children`); this module holds the operations that touch more than
//! one record at a time: `sendable`'s two-sided check and the orphan
//! cascade that `terminate` triggers.

use crate::runtime::table::ProcessTable;
use crate::types::Pid;

/// Whether `from` may address `to` directly (i.e. `to` is `from`'s
/// parent, or `to` is one of `from`'s live children). The `-1`/`-2`
/// pseudo-targets in `SEND` are resolved by the interpreter before this
/// is consulted.
pub fn sendable(table: &ProcessTable, from: Pid, to: Pid) -> bool {
    match table.get(from) {
        Some(proc) => to == proc.ppid || proc.is_child(to),
        None => false,
    }
}

/// Terminate `pid`: mark it dead, orphan its live children, tombstone
/// it in its parent's child list, and release the PID. Does not log or
/// report; callers do that.
pub fn terminate(table: &mut ProcessTable, pid: Pid) {
    let (ppid, children): (Pid, Vec<Pid>) = match table.get(pid) {
        Some(p) => (p.ppid, p.children[..p.cp].to_vec()),
        None => return,
    };

    if let Some(p) = table.get_mut(pid) {
        p.active = false;
    }

    for child in children {
        if let Some(c) = table.get_mut(child) {
            c.ppid = Pid::NONE;
        }
    }

    if !ppid.is_none() {
        if let Some(parent) = table.get_mut(ppid) {
            parent.remove_child(pid);
        }
    }

    table.release(pid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Program;
    use crate::runtime::process::ProcessRecord;

    fn spawn(table: &mut ProcessTable, ppid: Pid) -> Pid {
        let pid = table.allocate().unwrap();
        table.insert(ProcessRecord::new(pid, ppid, Program::new(vec![0])));
        pid
    }

    #[test]
    fn terminate_orphans_live_children() {
        let mut table = ProcessTable::new();
        let root = spawn(&mut table, Pid::NONE);
        let child = spawn(&mut table, root);
        table.get_mut(root).unwrap().add_child(child).unwrap();

        terminate(&mut table, root);

        assert!(!table.get(root).unwrap().active);
        assert_eq!(table.get(child).unwrap().ppid, Pid::NONE);
    }

    #[test]
    fn terminate_tombstones_parents_child_list() {
        let mut table = ProcessTable::new();
        let root = spawn(&mut table, Pid::NONE);
        let child = spawn(&mut table, root);
        table.get_mut(root).unwrap().add_child(child).unwrap();

        terminate(&mut table, child);

        assert_eq!(table.get(root).unwrap().cp, 0);
    }

    #[test]
    fn sendable_checks_parent_and_children() {
        let mut table = ProcessTable::new();
        let root = spawn(&mut table, Pid::NONE);
        let child = spawn(&mut table, root);
        table.get_mut(root).unwrap().add_child(child).unwrap();

        assert!(sendable(&table, child, root));
        assert!(sendable(&table, root, child));
        assert!(!sendable(&table, child, child));
    }
}
