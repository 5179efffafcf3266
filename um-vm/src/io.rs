use std::io::{Read, Write};

use um_asm::Word;

use crate::fault::Fault;

/// Word returned by [`IoPort::input`] at end of input.
pub const END_OF_INPUT: Word = Word::MAX;

/// Byte-oriented I/O over the host's standard streams.
///
/// Generic over the underlying reader/writer so tests can swap in in-memory
/// buffers instead of the real `Stdin`/`Stdout` handles, which is what makes
/// the end-to-end scenarios assertable without spawning a subprocess.
pub struct IoPort<R, W> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> IoPort<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Emit one byte. Faults if `value` does not fit in a byte, or if the
    /// underlying stream rejects the write.
    pub fn output(&mut self, value: Word) -> Result<(), Fault> {
        let byte = u8::try_from(value).map_err(|_| Fault::OutputOutOfRange(value))?;
        self.output
            .write_all(&[byte])
            .map_err(|e| Fault::Io(e.to_string()))?;
        Ok(())
    }

    /// Read one byte, or [`END_OF_INPUT`] once the stream is exhausted.
    /// Faults if the underlying stream reports an error.
    pub fn input(&mut self) -> Result<Word, Fault> {
        let mut byte = [0u8];
        match self.input.read(&mut byte) {
            Ok(0) => Ok(END_OF_INPUT),
            Ok(_) => Ok(Word::from(byte[0])),
            Err(e) => Err(Fault::Io(e.to_string())),
        }
    }

    /// Flush any buffered output. Must be called on both clean halt and
    /// fault exit so partial output is never lost.
    pub fn flush(&mut self) -> Result<(), Fault> {
        self.output.flush().map_err(|e| Fault::Io(e.to_string()))
    }
}
