use um_asm::Word;

use crate::heap::ArrayId;

/// A runtime fault: any condition that terminates execution abnormally.
///
/// One variant per fault kind the machine treats as a "machine exception".
/// The driver does not need to distinguish these to the user (every fault
/// maps to the same non-zero exit code), but keeping them as a typed sum
/// rather than a formatted string is what makes the boundary scenarios in
/// the test suite assertable by kind instead of by substring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    /// The decoded opcode is not one of the 14 legal operations.
    #[error("invalid opcode {0}")]
    InvalidOpcode(u8),

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// `OUTPUT` was asked to emit a value outside 0..=255.
    #[error("output value {0} is out of byte range")]
    OutputOutOfRange(Word),

    /// A read or write targeted an absent array identifier.
    #[error("array {0:?} is not live")]
    ArrayNotLive(ArrayId),

    /// A read or write targeted an offset at or beyond the array's length.
    #[error("offset {offset} is out of bounds for array {id:?} of length {length}")]
    ArrayOutOfBounds {
        id: ArrayId,
        offset: Word,
        length: usize,
    },

    /// An attempt to deallocate the reserved code array (identifier 0).
    #[error("cannot deallocate the reserved code array")]
    DeallocateReserved,

    /// An attempt to deallocate an identifier that is not currently live.
    #[error("cannot deallocate array {0:?}: not live")]
    DeallocateNotLive(ArrayId),

    /// The identifier space is exhausted: every identifier up to the cap is
    /// live.
    #[error("array identifier space exhausted")]
    ArenaExhausted,

    /// The program counter fell outside the bounds of array 0.
    #[error("program counter {pc} is out of bounds for code array of length {length}")]
    ProgramCounterOutOfBounds { pc: Word, length: usize },

    /// A read, write or flush against a host I/O stream failed.
    #[error("I/O error: {0}")]
    Io(String),
}
