use std::io;

use ls8_utils::Instruction;
use thiserror::Error;

/// A condition which stops the machine.
///
/// Whenever one of these is returned from execution, the core has already marked itself halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("unknown instruction 0b{opcode:08b} at address {pc:#04x}")]
    UnknownOpcode { opcode: u8, pc: usize },

    #[error("{} by zero at address {pc:#04x}", .instruction.mnemonic())]
    DivideByZero { instruction: Instruction, pc: usize },

    #[error("memory address {0:#x} is out of range")]
    AddressOutOfRange(usize),

    #[error("register R{0} does not exist")]
    RegisterOutOfRange(u8),

    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("console write failed: {0}")]
    Console(io::ErrorKind),
}

impl From<io::Error> for Fault {
    fn from(error: io::Error) -> Self {
        Fault::Console(error.kind())
    }
}
