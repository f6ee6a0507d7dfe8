use thiserror::Error;

/// Faults that stop a machine instance.
///
/// None of these are recoverable: the host must stop stepping and surface
/// the error. The instruction that raised one has not changed any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06X} at {pc:#05X}")]
    UnknownOpcode { opcode: u16, pc: u16 },

    #[error("stack overflow: call at {pc:#05X} exceeds the 16-frame call stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },

    #[error("address {address:#06X} is out of bounds")]
    OutOfBoundsAddress { address: usize },

    #[error("program is {len} bytes, at most {max} bytes fit in memory")]
    InvalidProgramLength { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
