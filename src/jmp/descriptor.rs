use crate::jmp::byte_source::ByteSource;
use crate::jmp::error::{JmpError, Result};
use crate::jmp::options::ReadOptions;
use crate::jmp::types::{ColumnDescriptor, DataType, ListCheckEntry};
use std::io::{Read, Seek};

const TAG_NOTES: u16 = 0x01;
const TAG_LIST_CHECK: u16 = 0x04;
const TAG_RANGE_CHECK: u16 = 0x05;
const TAG_HIDDEN: u16 = 0x06;
const TAG_FORMULA: u16 = 0x07;
const TAG_LIST_CHECK_BYTE_MAP: u16 = 0x08;
const TAG_OPAQUE_09: u16 = 0x09;
const TAG_OPAQUE_0B: u16 = 0x0B;
const TAG_OPAQUE_0C: u16 = 0x0C;
const TAG_LONG_NAME: u16 = 0x0F;
const TAG_ROW_STATE: u16 = 0x10;
const TAG_OPAQUE_13: u16 = 0x13;

const NAME_PAD_WIDTH: u8 = 31;
const LIST_CHECK_MISSING_INDEX: u8 = 0xFF;

/// Parse one column descriptor at `offset`, returning everything the value
/// decoder needs: the resolved name, data type, format type, per-row byte
/// width, and an optional list-check dictionary.
pub fn parse_descriptor<R: Read + Seek>(
    src: &mut ByteSource<R>,
    offset: u32,
    column_index: usize,
    options: &ReadOptions,
) -> Result<ColumnDescriptor> {
    src.seek(offset as u64)?;

    let mut name = read_name(src)?;

    let data_type_code = src.read_u8()?;
    let data_type = DataType::from_code(data_type_code).ok_or(JmpError::UnsupportedDataType {
        code: data_type_code,
        column_index,
    })?;

    let _modeling_type = src.read_u8()?;
    let _display_width = src.read_u8()?;
    let format_type = src.read_u8()?;
    let bytes_per_row = src.read_u16()?;
    src.skip(2)?; // column-lock flag; width unreliable, treat opaquely
    let attr_count = src.read_u16()? as usize;
    src.skip(12)?; // opaque fixed header tail

    let mut list_check = None;
    let max_iterations = attr_count.saturating_sub(1);
    for _ in 0..max_iterations {
        let tag_offset = src.position()?;
        let tag = src.read_u16()?;
        match tag {
            TAG_NOTES | TAG_RANGE_CHECK | TAG_HIDDEN | TAG_FORMULA | TAG_OPAQUE_09
            | TAG_OPAQUE_0B | TAG_OPAQUE_0C | TAG_OPAQUE_13 | TAG_ROW_STATE => {
                let len = src.read_u32()? as usize;
                src.read(len)?;
            }
            TAG_LIST_CHECK_BYTE_MAP => {
                let n = src.read_u32()? as usize;
                src.read(n)?;
            }
            TAG_LIST_CHECK => {
                list_check = Some(read_list_check_dictionary(src, data_type, column_index)?);
            }
            TAG_LONG_NAME => {
                let len = src.read_u32()? as usize;
                name = String::from_utf8(src.read(len)?)?;
            }
            other => {
                if options.tolerate_unknown_attributes {
                    let len = src.read_u32()? as usize;
                    src.read(len)?;
                } else {
                    return Err(JmpError::UnknownAttribute {
                        tag: other,
                        column_index,
                        offset: tag_offset,
                    });
                }
            }
        }
    }

    Ok(ColumnDescriptor {
        name,
        data_type,
        format_type,
        bytes_per_row,
        list_check,
    })
}

fn read_name<R: Read + Seek>(src: &mut ByteSource<R>) -> Result<String> {
    let name_len = src.read_u8()?;
    let name = String::from_utf8(src.read(name_len as usize)?)?;
    if name_len < NAME_PAD_WIDTH + 1 {
        src.skip((NAME_PAD_WIDTH - name_len) as u64)?;
    }
    Ok(name)
}

fn read_list_check_dictionary<R: Read + Seek>(
    src: &mut ByteSource<R>,
    data_type: DataType,
    column_index: usize,
) -> Result<Vec<ListCheckEntry>> {
    let field_len = src.read_u32()? as usize;
    let item_count = src.read_u16()? as usize;
    if item_count == 0 {
        return Ok(Vec::new());
    }
    let record_len = (field_len - 2) / item_count;

    let mut entries = Vec::with_capacity(item_count);
    match data_type {
        DataType::Numeric => {
            for _ in 0..item_count {
                entries.push(ListCheckEntry::Numeric(src.read_f64()?));
            }
        }
        DataType::StringShort | DataType::StringLarge => {
            for _ in 0..item_count {
                if record_len.saturating_sub(1) < 256 {
                    let str_len = src.read_u8()? as usize;
                    let text = String::from_utf8(src.read(str_len)?)?;
                    src.read(record_len - str_len - 1)?;
                    entries.push(ListCheckEntry::Text(text));
                } else {
                    // Preserved compatibility quirk: the stored length byte is
                    // unreliable past a 256-byte record; the string is the
                    // NUL-terminated prefix of the fixed-size slot instead.
                    let _unreliable_len = src.read_u8()?;
                    let slot = src.read(record_len - 1)?;
                    let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
                    entries.push(ListCheckEntry::Text(String::from_utf8(
                        slot[..end].to_vec(),
                    )?));
                }
            }
        }
        DataType::RowState | DataType::Int8 | DataType::Int16 | DataType::Int32 => {
            // No documented dictionary layout for this data type; guessing
            // one risks silently desyncing the rest of the byte stream.
            return Err(JmpError::UnsupportedListCheckDataType {
                data_type,
                column_index,
            });
        }
    }

    Ok(entries)
}

/// `0xFF` is the list-check Missing sentinel regardless of dictionary length.
pub fn is_list_check_missing(index: u8) -> bool {
    index == LIST_CHECK_MISSING_INDEX
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn numeric_descriptor(name: &str, format_type: u8, bytes_per_row: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
        out.extend(vec![0u8; 31 - name.len()]);
        out.push(1); // Numeric
        out.push(0); // modeling type
        out.push(0); // display width
        out.push(format_type);
        out.extend_from_slice(&bytes_per_row.to_le_bytes());
        out.extend_from_slice(&[0, 0]); // lock flag
        out.extend_from_slice(&1u16.to_le_bytes()); // attrCount: no attributes
        out.extend(vec![0u8; 12]);
        out
    }

    #[test]
    fn parses_short_padded_name_and_numeric_type() {
        let bytes = numeric_descriptor("x", 0, 8);
        let mut src = ByteSource::new(Cursor::new(bytes));
        let desc = parse_descriptor(&mut src, 0, 0, &ReadOptions::default()).unwrap();
        assert_eq!(desc.name, "x");
        assert_eq!(desc.data_type, DataType::Numeric);
        assert!(!desc.is_list_check());
    }

    #[test]
    fn long_name_attribute_overrides_short_name() {
        let long_name = "a_very_long_column_name_exceeding_thirty_one_bytes";
        let mut bytes = numeric_descriptor("short", 0, 8);
        // Patch attrCount to 2 so the loop runs once.
        let attr_count_offset = 1 + 31 + 1 + 1 + 1 + 1 + 2 + 2;
        bytes[attr_count_offset..attr_count_offset + 2].copy_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&TAG_LONG_NAME.to_le_bytes());
        bytes.extend_from_slice(&(long_name.len() as u32).to_le_bytes());
        bytes.extend_from_slice(long_name.as_bytes());

        let mut src = ByteSource::new(Cursor::new(bytes));
        let desc = parse_descriptor(&mut src, 0, 0, &ReadOptions::default()).unwrap();
        assert_eq!(desc.name, long_name);
    }

    #[test]
    fn unknown_attribute_tag_is_hard_error_by_default() {
        let mut bytes = numeric_descriptor("x", 0, 8);
        let attr_count_offset = 1 + 31 + 1 + 1 + 1 + 1 + 2 + 2;
        bytes[attr_count_offset..attr_count_offset + 2].copy_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&0x99u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());

        let mut src = ByteSource::new(Cursor::new(bytes));
        let err = parse_descriptor(&mut src, 0, 3, &ReadOptions::default()).unwrap_err();
        match err {
            JmpError::UnknownAttribute { tag: 0x99, column_index: 3, .. } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_attribute_tag_tolerated_when_configured() {
        let mut bytes = numeric_descriptor("x", 0, 8);
        let attr_count_offset = 1 + 31 + 1 + 1 + 1 + 1 + 2 + 2;
        bytes[attr_count_offset..attr_count_offset + 2].copy_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&0x99u16.to_le_bytes());
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(b"abc");

        let mut src = ByteSource::new(Cursor::new(bytes));
        let options = ReadOptions {
            tolerate_unknown_attributes: true,
            ..ReadOptions::default()
        };
        let desc = parse_descriptor(&mut src, 0, 0, &options).unwrap();
        assert_eq!(desc.name, "x");
    }

    #[test]
    fn name_len_at_or_above_32_disables_padding_skip() {
        let name = "exactly_thirty_two_bytes_long!!!";
        assert_eq!(name.len(), 32);
        let mut out = Vec::new();
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
        out.push(1);
        out.push(0);
        out.push(0);
        out.push(0);
        out.extend_from_slice(&8u16.to_le_bytes());
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend(vec![0u8; 12]);

        let mut src = ByteSource::new(Cursor::new(out));
        let desc = parse_descriptor(&mut src, 0, 0, &ReadOptions::default()).unwrap();
        assert_eq!(desc.name, name);
    }

    #[test]
    fn list_check_dictionary_on_int8_column_is_rejected_not_guessed() {
        let mut bytes = numeric_descriptor("flag", 0, 1);
        bytes[32] = 0xFF; // dataType = Int8, no documented list-check layout
        let attr_count_offset = 1 + 31 + 1 + 1 + 1 + 1 + 2 + 2;
        bytes[attr_count_offset..attr_count_offset + 2].copy_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&TAG_LIST_CHECK.to_le_bytes());
        bytes.extend_from_slice(&10u32.to_le_bytes()); // fieldLen
        bytes.extend_from_slice(&1u16.to_le_bytes()); // item count
        bytes.extend_from_slice(&0.0f64.to_le_bytes());

        let mut src = ByteSource::new(Cursor::new(bytes));
        let err = parse_descriptor(&mut src, 0, 7, &ReadOptions::default()).unwrap_err();
        match err {
            JmpError::UnsupportedListCheckDataType {
                data_type: DataType::Int8,
                column_index: 7,
            } => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
