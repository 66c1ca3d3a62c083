use crate::jmp::byte_source::ByteSource;
use crate::jmp::descriptor::parse_descriptor;
use crate::jmp::error::{JmpError, Result};
use crate::jmp::header::read_header;
use crate::jmp::options::ReadOptions;
use crate::jmp::types::{HeaderInfo, Table};
use crate::jmp::value::decode_column;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// Owns the open/parse lifecycle for one JMP 11 table file.
///
/// Mirrors this codebase's `Sas7bdatReader`/`StataReader` facades: `open`
/// performs the header walk up front, and `read` performs the per-column
/// descriptor-parse + value-decode pass on demand.
pub struct JmpReader {
    path: PathBuf,
    header: HeaderInfo,
    column_offsets: Vec<u32>,
    options: ReadOptions,
}

impl JmpReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, ReadOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut src = ByteSource::new(file);
        let walk = read_header(&mut src)?;
        Ok(Self {
            path,
            header: walk.info,
            column_offsets: walk.column_offsets,
            options,
        })
    }

    pub fn header(&self) -> &HeaderInfo {
        &self.header
    }

    /// Decode every column and assemble the table. Opens a second handle on
    /// the same file so `open` and `read` stay independent, reentrant
    /// operations (matching `Sas7bdatReader::open` + per-read file handles).
    pub fn read(&self) -> Result<Table> {
        let file = File::open(&self.path)?;
        let mut src = ByteSource::new(file);
        read_table(&mut src, &self.header, &self.column_offsets, &self.options)
    }
}

fn read_table<R: Read + Seek>(
    src: &mut ByteSource<R>,
    header: &HeaderInfo,
    column_offsets: &[u32],
    options: &ReadOptions,
) -> Result<Table> {
    let mut columns = Vec::with_capacity(column_offsets.len());
    for (column_index, &offset) in column_offsets.iter().enumerate() {
        let descriptor = parse_descriptor(src, offset, column_index, options)?;
        let column = decode_column(src, &descriptor, header.row_count, options)?;
        if column.values.len() != header.row_count {
            return Err(JmpError::RowCountMismatch {
                column_name: column.name,
                got: column.values.len(),
                expected: header.row_count,
            });
        }
        columns.push(column);
    }
    Ok(Table { columns })
}

/// Decode a JMP 11 table file with default read options.
///
/// Returns `(status, message, table)`: status `0` on success, `-1` for a
/// header-level failure, `-2` for a column-level failure. No partial table
/// is ever returned alongside a non-zero status.
pub fn read_jmp(path: impl AsRef<Path>) -> (i32, String, Option<Table>) {
    read_jmp_with_options(path, ReadOptions::default())
}

pub fn read_jmp_with_options(
    path: impl AsRef<Path>,
    options: ReadOptions,
) -> (i32, String, Option<Table>) {
    let reader = match JmpReader::open_with_options(path, options) {
        Ok(reader) => reader,
        Err(e) => return (-1, e.to_string(), None),
    };
    match reader.read() {
        Ok(table) => (0, "No error".to_string(), Some(table)),
        Err(e) => (-2, e.to_string(), None),
    }
}
