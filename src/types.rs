//! Core identifiers shared across the runtime.

use std::fmt;

/// A VM word: every program word, stack slot, and message data word is one
/// of these. Matches the original C implementation's `int`.
pub type Word = i32;

/// Process identifier. Doubles as an index into the process table when
/// non-negative; `Pid::NONE` marks "no process" (the parent of a root, an
/// orphaned child, or the scheduler's absence-of-sender value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub i32);

impl Pid {
    /// Sentinel meaning "no process" (used for a root's parent, for an
    /// orphaned child's `ppid`, and as a tombstone in a child list).
    pub const NONE: Pid = Pid(-1);

    /// The table index this PID addresses, or `None` for `Pid::NONE`.
    pub fn index(self) -> Option<usize> {
        if self.0 >= 0 {
            Some(self.0 as usize)
        } else {
            None
        }
    }

    /// Build a `Pid` from a table index.
    pub fn from_index(index: usize) -> Self {
        Pid(index as i32)
    }

    pub fn is_none(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
