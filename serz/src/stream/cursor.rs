/*!
 A position-tracked view over the bytes of a stream.
*/

use crate::error::stream::StreamError;

/// Reads big-endian data from a borrowed buffer, failing instead of panicking at the end
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    /// The stream we want to parse
    stream: &'a [u8],
    /// The current index we are at in the stream, always `<= stream.len()`
    idx: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream, idx: 0 }
    }

    /// The offset of the next byte to be read
    pub fn current_index(&self) -> usize {
        self.idx
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.stream.len() - self.idx
    }

    /// Whether every byte has been read
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read exactly `n` bytes from the stream
    pub fn read_n(&mut self, n: usize) -> Result<&'a [u8], StreamError> {
        let range = self.peek_n(n)?;
        self.idx += n;
        Ok(range)
    }

    /// Get the next `n` bytes without advancing
    pub fn peek_n(&self, n: usize) -> Result<&'a [u8], StreamError> {
        self.idx
            .checked_add(n)
            .and_then(|end| self.stream.get(self.idx..end))
            .ok_or(StreamError::UnexpectedEnd(self.idx, n))
    }

    /// Get the next byte without advancing, used to dispatch on record tags
    pub fn peek_byte(&self) -> Result<u8, StreamError> {
        self.stream
            .get(self.idx)
            .copied()
            .ok_or(StreamError::UnexpectedEnd(self.idx, 1))
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, pos: usize) -> Result<(), StreamError> {
        if pos > self.stream.len() {
            return Err(StreamError::UnexpectedEnd(pos, 0));
        }
        self.idx = pos;
        Ok(())
    }

    /// Read a fixed number of bytes into an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut out = [0; N];
        out.copy_from_slice(self.read_n(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        let byte = self.peek_byte()?;
        self.idx += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, StreamError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, StreamError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::stream::StreamError, stream::cursor::ByteCursor};

    #[test]
    fn can_read_and_advance() {
        let bytes = [0xAC, 0xED, 0x00, 0x05, 0x70];
        let mut cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.read_u16(), Ok(0xACED));
        assert_eq!(cursor.read_u16(), Ok(5));
        assert_eq!(cursor.current_index(), 4);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn peek_does_not_advance() {
        let bytes = [0x73, 0x72];
        let cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.peek_byte(), Ok(0x73));
        assert_eq!(cursor.peek_n(2), Ok(&bytes[..]));
        assert_eq!(cursor.current_index(), 0);
    }

    #[test]
    fn cant_read_past_end() {
        let bytes = [0x00, 0x01, 0x02];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();

        assert_eq!(cursor.read_u32(), Err(StreamError::UnexpectedEnd(1, 4)));
        // A failed read leaves the position untouched
        assert_eq!(cursor.current_index(), 1);
    }

    #[test]
    fn cant_read_huge_length() {
        let bytes = [0x00];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_u8().unwrap();

        assert_eq!(
            cursor.read_n(usize::MAX),
            Err(StreamError::UnexpectedEnd(1, usize::MAX))
        );
    }

    #[test]
    fn can_seek_back() {
        let bytes = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&bytes);
        cursor.read_n(3).unwrap();
        assert!(cursor.is_empty());

        cursor.seek(1).unwrap();
        assert_eq!(cursor.read_u8(), Ok(0x02));
    }

    #[test]
    fn cant_seek_past_end() {
        let bytes = [0x01];
        let mut cursor = ByteCursor::new(&bytes);

        assert_eq!(cursor.seek(2), Err(StreamError::UnexpectedEnd(2, 0)));
        assert_eq!(cursor.seek(1), Ok(()));
    }
}
