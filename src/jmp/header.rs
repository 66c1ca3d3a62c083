use crate::jmp::byte_source::ByteSource;
use crate::jmp::error::{JmpError, Result};
use crate::jmp::types::HeaderInfo;
use std::io::{Read, Seek};

const MAGIC: [u8; 8] = [0xFF, 0xFF, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00];
const SECTION_TERMINATOR_TAG: u16 = 0xFFFF;

/// Result of walking the fixed + tagged header: the declared row/column
/// counts and encoding, plus the absolute file offsets of every column
/// descriptor, in declaration order.
pub struct HeaderWalk {
    pub info: HeaderInfo,
    pub column_offsets: Vec<u32>,
}

/// Validate the magic prefix, walk the tagged pre-data sections, and read
/// the column offset table. `src` must be positioned at byte 0.
pub fn read_header<R: Read + Seek>(src: &mut ByteSource<R>) -> Result<HeaderWalk> {
    let magic = src.read(8)?;
    if magic != MAGIC {
        return Err(JmpError::BadMagic);
    }

    let row_count = src.read_u32()? as usize;
    let column_count = src.read_u32()? as usize;
    src.skip(12)?;

    let encoding_label = read_tagged_string(src, 0x0006)?;
    let _timestamp = read_tagged_block(src, 0x0007)?;

    loop {
        let tag = src.read_u16()?;
        let len = src.read_u32()? as usize;
        src.read(len)?;
        if tag == SECTION_TERMINATOR_TAG {
            break;
        }
    }

    // Declared width of each offset; the decoder always treats offsets as
    // u32 regardless of what this field says.
    src.skip(2)?;

    let mut column_offsets = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        column_offsets.push(src.read_u32()?);
    }

    Ok(HeaderWalk {
        info: HeaderInfo {
            row_count,
            column_count,
            encoding_label,
        },
        column_offsets,
    })
}

fn read_tagged_block<R: Read + Seek>(src: &mut ByteSource<R>, expected_tag: u16) -> Result<Vec<u8>> {
    let tag = src.read_u16()?;
    if tag != expected_tag {
        let position = src.position()?;
        return Err(JmpError::MalformedHeader {
            position,
            detail: format!("expected tag 0x{expected_tag:04X}, got 0x{tag:04X}"),
        });
    }
    let len = src.read_u32()? as usize;
    src.read(len)
}

fn read_tagged_string<R: Read + Seek>(src: &mut ByteSource<R>, expected_tag: u16) -> Result<String> {
    let bytes = read_tagged_block(src, expected_tag)?;
    Ok(String::from_utf8(bytes)?)
}
