use thiserror::Error;

#[derive(Debug, Error)]
pub enum JmpError {
    #[error("not a JMP 11 table: magic number mismatch")]
    BadMagic,

    #[error("malformed header at byte {position}: {detail}")]
    MalformedHeader { position: u64, detail: String },

    #[error("seek to offset {0} is beyond the end of the file")]
    BadOffset(u64),

    #[error("truncated input: expected {expected} bytes, got {got}")]
    TruncatedInput { expected: usize, got: usize },

    #[error("unknown attribute tag 0x{tag:04X} in column {column_index} at byte {offset}")]
    UnknownAttribute {
        tag: u16,
        column_index: usize,
        offset: u64,
    },

    #[error("unsupported data type code 0x{code:02X} in column {column_index}")]
    UnsupportedDataType { code: u8, column_index: usize },

    #[error(
        "column {column_index} has a list-check dictionary but its data type ({data_type:?}) \
         has no documented dictionary layout"
    )]
    UnsupportedListCheckDataType {
        data_type: crate::jmp::types::DataType,
        column_index: usize,
    },

    #[error("column '{column_name}' has {got} rows, expected {expected}")]
    RowCountMismatch {
        column_name: String,
        got: usize,
        expected: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in column text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, JmpError>;
