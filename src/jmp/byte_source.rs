use crate::jmp::error::{JmpError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Positioned byte-level reads against a random-access JMP table file.
///
/// Every multi-byte field in the format is little-endian, so this is the
/// only endianness `ByteSource` ever reads.
pub struct ByteSource<R: Read + Seek> {
    reader: R,
}

impl<R: Read + Seek> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.reader.stream_position()?)
    }

    /// Reposition to an absolute file offset.
    pub fn seek(&mut self, abs_offset: u64) -> Result<()> {
        let len = self.reader.seek(SeekFrom::End(0))?;
        if abs_offset > len {
            return Err(JmpError::BadOffset(abs_offset));
        }
        self.reader.seek(SeekFrom::Start(abs_offset))?;
        Ok(())
    }

    /// Read exactly `n` bytes, failing with `TruncatedInput` if fewer remain.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut got = 0usize;
        while got < n {
            match self.reader.read(&mut buf[got..])? {
                0 => {
                    return Err(JmpError::TruncatedInput { expected: n, got });
                }
                k => got += k,
            }
        }
        Ok(buf)
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.reader.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.reader.read_i8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.reader.read_u16::<LittleEndian>()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.reader.read_i16::<LittleEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.reader.read_u32::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.reader.read_i32::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.reader.read_f64::<LittleEndian>()?)
    }
}
