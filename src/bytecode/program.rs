//! Immutable program memory.
//!
//! A program is a flat array of signed integer words shared by a root
//! process and every process `FORK`ed from it. Children don't get a
//! copy: they get a view into the same backing array starting at the
//! `FORK` target address, matching the original embedder's `&program[addr]`
//! pointer arithmetic without needing unsafe code or lifetimes. The
//! backing array is reference-counted and outlives every view into it.

use std::sync::Arc;

/// A read-only view into shared program memory, addressed from `base`.
/// `ip` indexes relative to `base`, so a child `FORK`ed to address `addr`
/// sees word 0 of its own view as word `addr` of the root's.
#[derive(Debug, Clone)]
pub struct Program {
    words: Arc<Vec<i32>>,
    base: usize,
}

impl Program {
    /// Build the root program view over an entire word array.
    pub fn new(words: Vec<i32>) -> Self {
        Program {
            words: Arc::new(words),
            base: 0,
        }
    }

    /// Build a child view starting at absolute address `addr` within the
    /// same backing array. Returns `None` if `addr` is out of bounds.
    pub fn child_view(&self, addr: usize) -> Option<Program> {
        if addr > self.words.len() {
            return None;
        }
        Some(Program {
            words: Arc::clone(&self.words),
            base: addr,
        })
    }

    /// Fetch the word at relative index `ip`, or `None` past the end of
    /// the program (an exhausted program behaves like an implicit `HALT`).
    pub fn fetch(&self, ip: usize) -> Option<i32> {
        self.words.get(self.base + ip).copied()
    }

    /// The absolute address this view starts at, used to resolve `FORK`
    /// and `CALL` targets (which are always absolute, regardless of the
    /// caller's own base).
    pub fn base(&self) -> usize {
        self.base
    }

    /// Total length of the backing array, for bounds-checking absolute
    /// addresses supplied by `FORK`/`CALL`.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
