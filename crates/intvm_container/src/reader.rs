//! Seekable reader over a script's instruction stream.

use intvm_foundation::{Error, ErrorKind, Result};

/// Fetch-only cursor over compiled procedure bytes.
///
/// All reads are little-endian and advance the cursor. After a read,
/// [`offset`](InstructionStream::offset) reports the position just past the
/// bytes consumed; the run loop uses it for sequential fall-through.
pub trait InstructionStream {
    /// Repositions the cursor. Seeking to the end of the stream is allowed;
    /// seeking past it is an error.
    fn seek(&mut self, offset: usize) -> Result<()>;

    /// Reads a 16-bit unsigned value.
    fn read16(&mut self) -> Result<u16>;

    /// Reads a 32-bit signed value.
    fn read32(&mut self) -> Result<i32>;

    /// Returns the current cursor position.
    fn offset(&self) -> usize;

    /// Returns the total length of the stream in bytes.
    fn len(&self) -> usize;

    /// Returns true if the stream holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`InstructionStream`] over an owned byte buffer.
#[derive(Clone, Debug, Default)]
pub struct ByteReader {
    data: Vec<u8>,
    pos: usize,
}

impl ByteReader {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos.checked_add(N).filter(|end| *end <= self.data.len());
        let Some(end) = end else {
            return Err(Error::new(ErrorKind::UnexpectedEndOfCode {
                offset: self.pos,
                len: self.data.len(),
            }));
        };
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(buf)
    }
}

impl InstructionStream for ByteReader {
    fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.data.len() {
            return Err(Error::new(ErrorKind::InvalidAddress(
                i64::try_from(offset).unwrap_or(i64::MAX),
            )));
        }
        self.pos = offset;
        Ok(())
    }

    fn read16(&mut self) -> Result<u16> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    fn read32(&mut self) -> Result<i32> {
        self.take::<4>().map(i32::from_le_bytes)
    }

    fn offset(&self) -> usize {
        self.pos
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl From<Vec<u8>> for ByteReader {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for ByteReader {
    fn from(data: &[u8]) -> Self {
        Self::new(data)
    }
}
