//! Interpreter for the `um` virtual machine.
//!
//! Combines the register file, the array heap, a generic I/O port and the
//! fetch-decode-execute loop into [`Machine`], plus the image loader that
//! turns a raw byte stream into the word vector a [`Machine`] starts from.

mod engine;
mod fault;
mod heap;
mod io;
mod loader;
mod registers;

pub use engine::{Machine, MachineState};
pub use fault::Fault;
pub use heap::{ArrayHeap, ArrayId, MAX_ARRAYS};
pub use io::{IoPort, END_OF_INPUT};
pub use loader::{load_image, LoaderError};
pub use registers::Registers;
