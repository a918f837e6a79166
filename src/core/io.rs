use std::error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, ErrorKind};

/// A bounds-checked cursor over a byte slice.
///
/// Every read either succeeds completely or fails with an `UnexpectedEof` error and leaves
/// the cursor where it was. The position doubles as the count of consumed bytes, which the
/// frame scanner relies on to stay within the declared tag size.
pub struct BufStream<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> BufStream<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    /// Moves the cursor forward by `n` bytes, returning the bytes that were passed over.
    fn advance(&mut self, n: usize, err: StreamError) -> io::Result<&'a [u8]> {
        let data = self.peek(n).map_err(|_| io::Error::from(err))?;
        self.pos += n;
        Ok(data)
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        buf.copy_from_slice(self.advance(buf.len(), StreamError::BufferUnderread)?);
        Ok(())
    }

    pub fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
        let mut arr = [0; N];
        self.read_exact(&mut arr)?;
        Ok(arr)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        Ok(self.advance(1, StreamError::EndOfStream)?[0])
    }

    /// Big-endian.
    pub fn read_u16(&mut self) -> io::Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Big-endian.
    pub fn read_u32(&mut self) -> io::Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn skip(&mut self, n: usize) -> io::Result<()> {
        self.advance(n, StreamError::OutOfBounds).map(|_| ())
    }

    /// Consumes the next `n` bytes and returns them without copying.
    pub fn slice(&mut self, n: usize) -> io::Result<&'a [u8]> {
        self.advance(n, StreamError::BufferUnderread)
    }

    /// Returns the next `n` bytes without consuming them.
    pub fn peek(&self, n: usize) -> io::Result<&'a [u8]> {
        let src: &'a [u8] = self.src;

        self.pos
            .checked_add(n)
            .and_then(|end| src.get(self.pos..end))
            .ok_or_else(|| StreamError::BufferUnderread.into())
    }

    /// Finds the first occurrence of `needle` that is aligned to the width of the needle,
    /// returning everything before it. The needle itself is consumed but not returned.
    ///
    /// A missing needle is an error and does not move the cursor.
    pub fn search(&mut self, needle: &[u8]) -> io::Result<&'a [u8]> {
        let rest = &self.src[self.pos..];

        let found = rest
            .chunks_exact(needle.len())
            .position(|chunk| chunk == needle)
            .ok_or(StreamError::EndOfStream)?;

        let end = found * needle.len();
        self.pos += end + needle.len();

        Ok(&rest[..end])
    }

    /// Consumes whatever is left in the stream.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = &self.src[self.pos..];
        self.pos = self.src.len();
        rest
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[derive(Debug, Clone, Copy)]
pub enum StreamError {
    EndOfStream,
    BufferUnderread,
    OutOfBounds,
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::EndOfStream => write![f, "end of stream"],
            Self::BufferUnderread => write![f, "not enough data to fill buffer"],
            Self::OutOfBounds => write![f, "position out of bounds"],
        }
    }
}

impl error::Error for StreamError {}

impl From<StreamError> for io::Error {
    fn from(other: StreamError) -> Self {
        io::Error::new(ErrorKind::UnexpectedEof, other)
    }
}
