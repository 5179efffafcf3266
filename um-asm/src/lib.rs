//! Atomic instruction encoding for the `um` virtual machine.
//!
//! This crate has no knowledge of registers-as-state, arrays, or I/O; it
//! only knows how to turn a raw 32-bit word into a tagged [`Instruction`] and
//! back. Keeping decode/encode free of `std::io` and of the engine's fault
//! types means it can be reused by anything that wants to reason about the
//! instruction stream without running it (a disassembler, a fuzzer seed
//! generator, or the engine itself).

mod instruction;

pub use instruction::{Instruction, RegisterId, Word, REGISTER_COUNT};
