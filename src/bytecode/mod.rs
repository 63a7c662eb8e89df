//! The VM's bytecode: a flat, closed set of 25 opcodes over signed
//! integer words. There is no constant pool, no typed value
//! representation, and no function table. Every opcode's operands and
//! results live on a process's own data/call stacks.

pub mod program;

pub use program::Program;

use crate::error::VmError;

/// One of the 25 fixed opcodes. The discriminant order matches the
/// original instruction set exactly, since program images are raw
/// integer words and the ordinal value *is* the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Opcode {
    Halt = 0,
    Push,
    Pop,
    Dup,
    Swap,
    Scan,
    Scans,
    Print,
    Prints,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Not,
    Lshift,
    Rshift,
    Call,
    Ret,
    Fork,
    Send,
    Recv,
}

impl Opcode {
    /// Decode a raw program word into an opcode. Any value outside
    /// `0..=24` is `None`, which the interpreter turns into `Unknown`.
    pub fn decode(word: i32) -> Option<Opcode> {
        use Opcode::*;
        let op = match word {
            0 => Halt,
            1 => Push,
            2 => Pop,
            3 => Dup,
            4 => Swap,
            5 => Scan,
            6 => Scans,
            7 => Print,
            8 => Prints,
            9 => Add,
            10 => Sub,
            11 => Mul,
            12 => Div,
            13 => Mod,
            14 => And,
            15 => Or,
            16 => Xor,
            17 => Not,
            18 => Lshift,
            19 => Rshift,
            20 => Call,
            21 => Ret,
            22 => Fork,
            23 => Send,
            24 => Recv,
            _ => return None,
        };
        Some(op)
    }
}

impl TryFrom<i32> for Opcode {
    type Error = VmError;

    fn try_from(word: i32) -> Result<Self, Self::Error> {
        Opcode::decode(word).ok_or(VmError::Unknown)
    }
}
