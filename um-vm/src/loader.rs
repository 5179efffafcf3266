use std::io::{self, Read};

use byteorder::{BigEndian, ReadBytesExt};
use um_asm::Word;

/// Failure to materialize a program image from a byte stream.
///
/// Distinct from [`crate::fault::Fault`]: no VM exists yet when this is
/// raised, so there is nothing to transition to `Faulted`.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),

    #[error("image is empty")]
    Empty,

    #[error("image length {len} is not a multiple of 4 bytes ({trailing} trailing bytes)")]
    NotMultipleOfFour { len: usize, trailing: usize },
}

/// Read a byte stream into the word vector that becomes the initial content
/// of array 0.
///
/// The on-disk format is a sequence of 4-byte big-endian unsigned integers;
/// `vector[i]` is the i-th such word, decoded to host-native representation
/// regardless of the host's own endianness.
pub fn load_image<R: Read>(mut reader: R) -> Result<Vec<Word>, LoaderError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if bytes.is_empty() {
        return Err(LoaderError::Empty);
    }

    let trailing = bytes.len() % 4;
    if trailing != 0 {
        return Err(LoaderError::NotMultipleOfFour {
            len: bytes.len(),
            trailing,
        });
    }

    let mut cursor = io::Cursor::new(bytes);
    let word_count = cursor.get_ref().len() / 4;
    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        words.push(cursor.read_u32::<BigEndian>()?);
    }
    Ok(words)
}
