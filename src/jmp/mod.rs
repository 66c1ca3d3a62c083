//! Decoder for the JMP 11 proprietary binary table file format.
//!
//! The format is undocumented, position-dependent, and mixes fixed and
//! length-prefixed sections. [`header`] walks the file header to locate the
//! per-column descriptor offsets, [`descriptor`] parses one column's
//! variable-length attribute stream, [`value`] decodes a column's row
//! values according to its data type and format type, and [`reader`] ties
//! the three together into a [`reader::JmpReader`] / [`read_jmp`] surface.

pub(crate) mod byte_source;
pub(crate) mod descriptor;
pub mod error;
pub mod header;
pub mod options;
pub mod reader;
pub mod temporal;
pub mod types;
pub(crate) mod value;

pub use error::{JmpError, Result};
pub use header::HeaderWalk;
pub use options::ReadOptions;
pub use reader::{read_jmp, read_jmp_with_options, JmpReader};
pub use types::{Cell, Column, ColumnType, HeaderInfo, Table};

use serde_json::json;
use std::path::Path;

/// Export column name/type/format-type metadata as a JSON string, without
/// decoding row values. Mirrors this codebase's `metadata_json` helpers on
/// the SAS/Stata/SPSS readers.
pub fn metadata_json(path: impl AsRef<Path>) -> Result<String> {
    use crate::jmp::byte_source::ByteSource;
    use crate::jmp::descriptor::parse_descriptor;
    use std::fs::File;

    let path = path.as_ref();
    let file = File::open(path)?;
    let mut src = ByteSource::new(file);
    let walk = header::read_header(&mut src)?;

    let options = ReadOptions::default();
    let columns = walk
        .column_offsets
        .iter()
        .enumerate()
        .map(|(index, &offset)| {
            let descriptor = parse_descriptor(&mut src, offset, index, &options)?;
            Ok(json!({
                "name": descriptor.name,
                "data_type": format!("{:?}", descriptor.data_type),
                "format_type": descriptor.format_type,
                "bytes_per_row": descriptor.bytes_per_row,
                "is_list_check": descriptor.is_list_check(),
            }))
        })
        .collect::<Result<Vec<_>>>()?;

    let v = json!({
        "row_count": walk.info.row_count,
        "column_count": walk.info.column_count,
        "encoding_label": walk.info.encoding_label,
        "columns": columns,
    });
    Ok(v.to_string())
}
