use crate::jmp::byte_source::ByteSource;
use crate::jmp::descriptor::is_list_check_missing;
use crate::jmp::error::Result;
use crate::jmp::options::ReadOptions;
use crate::jmp::temporal::{self, FormatClass};
use crate::jmp::types::{Cell, Column, ColumnDescriptor, ColumnType, DataType, ListCheckEntry};
use std::io::{Read, Seek};

const SHORT_STRING_MAX_FIELD: u16 = 0x0100;

/// Read exactly `row_count` rows for `descriptor` from the current
/// position and assemble the resulting column.
pub fn decode_column<R: Read + Seek>(
    src: &mut ByteSource<R>,
    descriptor: &ColumnDescriptor,
    row_count: usize,
    options: &ReadOptions,
) -> Result<Column> {
    let format_class = temporal::classify(descriptor.format_type);
    let is_temporal = descriptor.data_type == DataType::Numeric && format_class != FormatClass::NonTemporal;

    let col_type = if is_temporal {
        temporal::column_type_for(format_class)
    } else {
        logical_type(descriptor.data_type)
    };

    let values = match (descriptor.data_type, descriptor.is_list_check()) {
        (DataType::Numeric, false) => {
            decode_plain_numeric(src, row_count, is_temporal, format_class)?
        }
        (DataType::Numeric, true) => decode_list_check_numeric(
            src,
            descriptor,
            row_count,
            is_temporal,
            format_class,
        )?,
        (DataType::StringShort, false) | (DataType::StringLarge, false) => {
            decode_plain_string(src, descriptor.bytes_per_row, row_count)?
        }
        (DataType::StringShort, true) | (DataType::StringLarge, true) => {
            decode_list_check_string(src, descriptor, row_count, options)?
        }
        (DataType::RowState, _) => decode_row_state(src, row_count)?,
        (DataType::Int8, _) => decode_int8(src, row_count)?,
        (DataType::Int16, _) => decode_int16(src, row_count)?,
        (DataType::Int32, _) => decode_int32(src, row_count)?,
    };

    Ok(Column {
        name: descriptor.name.clone(),
        col_type,
        values,
    })
}

fn logical_type(data_type: DataType) -> ColumnType {
    match data_type {
        DataType::Numeric => ColumnType::Number,
        DataType::StringShort | DataType::StringLarge => ColumnType::String,
        DataType::RowState => ColumnType::RowState,
        DataType::Int8 => ColumnType::Int8,
        DataType::Int16 => ColumnType::Int16,
        DataType::Int32 => ColumnType::Int32,
    }
}

fn decode_plain_numeric<R: Read + Seek>(
    src: &mut ByteSource<R>,
    row_count: usize,
    is_temporal: bool,
    format_class: FormatClass,
) -> Result<Vec<Cell>> {
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let raw = src.read_f64()?;
        out.push(if is_temporal {
            temporal::to_cell(format_class, raw)
        } else {
            Cell::Number(raw)
        });
    }
    Ok(out)
}

fn decode_list_check_numeric<R: Read + Seek>(
    src: &mut ByteSource<R>,
    descriptor: &ColumnDescriptor,
    row_count: usize,
    is_temporal: bool,
    format_class: FormatClass,
) -> Result<Vec<Cell>> {
    let dict = descriptor.list_check.as_ref().expect("list-check dictionary present");
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let index = src.read_u8()?;
        if is_list_check_missing(index) {
            out.push(Cell::Missing);
            continue;
        }
        let raw = match &dict[index as usize] {
            ListCheckEntry::Numeric(v) => *v,
            ListCheckEntry::Text(_) => f64::NAN,
        };
        out.push(if is_temporal {
            temporal::to_cell(format_class, raw)
        } else {
            Cell::Number(raw)
        });
    }
    Ok(out)
}

fn decode_plain_string<R: Read + Seek>(
    src: &mut ByteSource<R>,
    bytes_per_row: u16,
    row_count: usize,
) -> Result<Vec<Cell>> {
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let text = if bytes_per_row <= SHORT_STRING_MAX_FIELD {
            let str_len = src.read_u8()? as usize;
            let text = String::from_utf8(src.read(str_len)?)?;
            let padding = bytes_per_row as usize - str_len - 1;
            src.read(padding)?;
            text
        } else {
            let slot = src.read(bytes_per_row as usize)?;
            let end = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
            String::from_utf8(slot[..end].to_vec())?
        };
        out.push(Cell::String(text));
    }
    Ok(out)
}

fn decode_list_check_string<R: Read + Seek>(
    src: &mut ByteSource<R>,
    descriptor: &ColumnDescriptor,
    row_count: usize,
    options: &ReadOptions,
) -> Result<Vec<Cell>> {
    let dict = descriptor.list_check.as_ref().expect("list-check dictionary present");
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let index = src.read_u8()?;
        if is_list_check_missing(index) {
            out.push(if options.missing_list_check_as_empty_string {
                Cell::String(String::new())
            } else {
                Cell::Missing
            });
            continue;
        }
        let text = match &dict[index as usize] {
            ListCheckEntry::Text(s) => s.clone(),
            ListCheckEntry::Numeric(n) => n.to_string(),
        };
        out.push(Cell::String(text));
    }
    Ok(out)
}

fn decode_row_state<R: Read + Seek>(src: &mut ByteSource<R>, row_count: usize) -> Result<Vec<Cell>> {
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        out.push(Cell::RowState(src.read_u16()?));
    }
    Ok(out)
}

fn decode_int8<R: Read + Seek>(src: &mut ByteSource<R>, row_count: usize) -> Result<Vec<Cell>> {
    const MISSING: i8 = -127;
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let v = src.read_i8()?;
        out.push(if v == MISSING { Cell::Missing } else { Cell::Int(v as i32) });
    }
    Ok(out)
}

fn decode_int16<R: Read + Seek>(src: &mut ByteSource<R>, row_count: usize) -> Result<Vec<Cell>> {
    const MISSING: i16 = -32767;
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let v = src.read_i16()?;
        out.push(if v == MISSING { Cell::Missing } else { Cell::Int(v as i32) });
    }
    Ok(out)
}

fn decode_int32<R: Read + Seek>(src: &mut ByteSource<R>, row_count: usize) -> Result<Vec<Cell>> {
    const MISSING: i32 = -2147483647;
    let mut out = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let v = src.read_i32()?;
        out.push(if v == MISSING { Cell::Missing } else { Cell::Int(v) });
    }
    Ok(out)
}
