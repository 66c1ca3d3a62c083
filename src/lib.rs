//! Pure Rust decoder for the JMP 11 proprietary binary table file format.
//!
//! This library walks a JMP 11 table file's header and per-column
//! descriptors and decodes row values into an in-memory [`Table`]. It does
//! not write the format, handle non-JMP-11 versions, or export to any
//! delimited-text or display representation — see `jmp::reader` for the
//! read-only surface this crate exposes.

pub mod jmp;

pub use jmp::{
    metadata_json, read_jmp, read_jmp_with_options, Cell, Column, ColumnType, HeaderInfo,
    JmpError, JmpReader, ReadOptions, Result as JmpResult, Table,
};
