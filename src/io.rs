//! Host I/O collaborators and the numeric input parser.
//!
//! The VM core never touches a terminal or a file directly. `SCAN`,
//! `SCANS`, `PRINT`, and `PRINTS` go through these two traits, which the
//! CLI embedder wires to stdio and tests wire to in-memory buffers.

use std::collections::VecDeque;

use crate::types::Word;

/// Line-oriented input collaborator for `SCAN`/`SCANS`.
pub trait LineInput {
    /// Read one line, trailing newline included if present (matching
    /// `fgets`), up to `max_bytes`. Returns an empty string at EOF.
    fn read_line(&mut self, max_bytes: usize) -> String;
}

/// Line-oriented output collaborator for `PRINT`/`PRINTS`.
pub trait LineOutput {
    fn write_str(&mut self, s: &str);
}

/// Byte-level buffering shared by every `LineInput` so a line longer than
/// the caller's `max_bytes` cap leaves its unread tail in the stream
/// instead of discarding it, matching `fgets`. Operates on raw bytes
/// (not `char`s) so a cap that lands inside a multi-byte UTF-8 sequence
/// never panics; any such split is repaired with `from_utf8_lossy`.
#[derive(Debug)]
struct LineBuffer {
    pending: VecDeque<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        LineBuffer {
            pending: VecDeque::new(),
        }
    }

    /// Read up to `max_bytes`, pulling more input via `fill` only while
    /// no newline has been buffered yet and the cap hasn't been reached.
    /// `fill` writes into the given scratch slice and returns the number
    /// of bytes produced (`0` at EOF).
    fn read_line(&mut self, max_bytes: usize, mut fill: impl FnMut(&mut [u8]) -> usize) -> String {
        let mut chunk = [0u8; 256];
        while !self.pending.contains(&b'\n') && self.pending.len() < max_bytes {
            let n = fill(&mut chunk);
            if n == 0 {
                break;
            }
            self.pending.extend(&chunk[..n]);
        }

        let newline_at = self.pending.iter().position(|&b| b == b'\n');
        let take = match newline_at {
            Some(pos) => (pos + 1).min(max_bytes),
            None => max_bytes.min(self.pending.len()),
        };
        let bytes: Vec<u8> = self.pending.drain(..take).collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Reads from `std::io::stdin`.
pub struct StdIn {
    inner: std::io::Stdin,
    buf: LineBuffer,
}

impl StdIn {
    pub fn new() -> Self {
        StdIn {
            inner: std::io::stdin(),
            buf: LineBuffer::new(),
        }
    }
}

impl Default for StdIn {
    fn default() -> Self {
        StdIn::new()
    }
}

impl LineInput for StdIn {
    fn read_line(&mut self, max_bytes: usize) -> String {
        use std::io::Read;
        let StdIn { inner, buf } = self;
        let mut locked = inner.lock();
        buf.read_line(max_bytes, |chunk| locked.read(chunk).unwrap_or(0))
    }
}

/// Writes to `std::io::stdout`.
pub struct StdOut {
    inner: std::io::Stdout,
}

impl StdOut {
    pub fn new() -> Self {
        StdOut {
            inner: std::io::stdout(),
        }
    }
}

impl Default for StdOut {
    fn default() -> Self {
        StdOut::new()
    }
}

impl LineOutput for StdOut {
    fn write_str(&mut self, s: &str) {
        use std::io::Write;
        let _ = self.inner.lock().write_all(s.as_bytes());
    }
}

/// In-memory input, fed from a fixed byte source supplied up front. The
/// test collaborator: reads behave exactly like `StdIn`'s, including
/// leaving an over-cap remainder buffered for the next call.
#[derive(Debug, Default)]
pub struct MemInput {
    source: VecDeque<u8>,
    buf: LineBuffer,
}

impl MemInput {
    pub fn new(lines: impl IntoIterator<Item = String>) -> Self {
        let mut source = VecDeque::new();
        for line in lines {
            source.extend(line.into_bytes());
        }
        MemInput {
            source,
            buf: LineBuffer::new(),
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        LineBuffer::new()
    }
}

impl LineInput for MemInput {
    fn read_line(&mut self, max_bytes: usize) -> String {
        let MemInput { source, buf } = self;
        buf.read_line(max_bytes, |chunk| {
            let n = chunk.len().min(source.len());
            for slot in chunk.iter_mut().take(n) {
                *slot = source.pop_front().expect("checked len above");
            }
            n
        })
    }
}

/// In-memory output, capturing everything written. The test collaborator.
#[derive(Debug, Default)]
pub struct MemOutput {
    pub buffer: String,
}

impl LineOutput for MemOutput {
    fn write_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }
}

/// Parse a `SCAN` line as a signed integer, honoring the recursive
/// `<base>#<digits>` prefix: digits accumulate left-to-right in the
/// current base, and hitting a `#` after a nonzero accumulator switches
/// to interpreting that accumulator as the base for the remaining
/// digits. Digits beyond `0-9` (`a-z`/`A-Z`) extend this to bases up to
/// 35. Any other byte (including a trailing newline) stops the scan.
pub fn parse_int(s: &str) -> Word {
    parse_int_base(s, 10)
}

fn parse_int_base(s: &str, base: i64) -> Word {
    let mut chars = s.chars();
    let mut res: i64 = 0;
    loop {
        match chars.next() {
            Some(c) if c.is_ascii_digit() || c.is_ascii_alphabetic() => {
                let digit = c.to_digit(36);
                match digit {
                    Some(d) if (d as i64) < base => {
                        res = res * base + d as i64;
                    }
                    _ => break,
                }
            }
            Some('#') if res != 0 => {
                return parse_int_base(chars.as_str(), res);
            }
            _ => break,
        }
    }
    res as Word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimal() {
        assert_eq!(parse_int("42\n"), 42);
    }

    #[test]
    fn parses_base_prefix() {
        assert_eq!(parse_int("16#ff\n"), 255);
    }

    #[test]
    fn empty_line_is_zero() {
        assert_eq!(parse_int(""), 0);
    }

    #[test]
    fn mem_input_returns_queued_lines_then_empty() {
        let mut input = MemInput::new(vec!["hello\n".to_string()]);
        assert_eq!(input.read_line(255), "hello\n");
        assert_eq!(input.read_line(255), "");
    }

    #[test]
    fn mem_input_buffers_remainder_past_the_cap() {
        // A line longer than max_bytes must not be truncated and lost;
        // the unread tail stays available for the next read_line call.
        let mut input = MemInput::new(vec!["0123456789abcdef\n".to_string()]);
        assert_eq!(input.read_line(10), "0123456789");
        assert_eq!(input.read_line(10), "abcdef\n");
    }

    #[test]
    fn mem_input_cap_inside_a_utf8_char_boundary_does_not_panic() {
        // 'é' is two UTF-8 bytes; capping at 1 byte lands mid-character.
        // `String::truncate` would panic here; byte-level buffering plus
        // `from_utf8_lossy` must not.
        let mut input = MemInput::new(vec!["é\n".to_string()]);
        let first = input.read_line(1);
        assert!(!first.is_empty());
        let rest = input.read_line(10);
        assert!(rest.ends_with('\n'));
    }

    #[test]
    fn mem_input_keeps_newline_buffered_when_line_exceeds_cap() {
        let mut input = MemInput::new(vec!["abc\n".to_string()]);
        assert_eq!(input.read_line(2), "ab");
        assert_eq!(input.read_line(2), "c\n");
    }
}
