use crate::jmp::types::{Cell, ColumnType};
use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime};

/// The JMP 11 temporal epoch: 1904-01-01T00:00:00 UTC. Stored doubles are
/// seconds (with sub-second fraction) relative to this instant.
fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1904, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

const DATETIME_CODES: &[u8] = &[
    0x69, 0x6A, 0x73, 0x74, 0x7D, 0x7E, 0x77, 0x78, 0x86, 0x87, 0x7B, 0x7C, 0x80, 0x81, 0x89, 0x8A,
];
const TIME_CODES: &[u8] = &[0x79, 0x82];
const DATE_CODES: &[u8] = &[
    0x65, 0x6E, 0x6F, 0x8B, 0x70, 0x71, 0x72, 0x7A, 0x75, 0x76, 0x7F, 0x66, 0x67, 0x88,
];
const DURATION_CODES: &[u8] = &[0x6C, 0x6D, 0x83, 0x84, 0x85];

/// Which of the four temporal buckets (or "not temporal at all") a
/// `formatType` byte falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    DateTime,
    Time,
    Date,
    Duration,
    NonTemporal,
}

pub fn classify(format_type: u8) -> FormatClass {
    if DATETIME_CODES.contains(&format_type) {
        FormatClass::DateTime
    } else if TIME_CODES.contains(&format_type) {
        FormatClass::Time
    } else if DATE_CODES.contains(&format_type) {
        FormatClass::Date
    } else if DURATION_CODES.contains(&format_type) {
        FormatClass::Duration
    } else {
        FormatClass::NonTemporal
    }
}

/// The logical column type a temporal `formatType` maps to. Panics if
/// `class` is `NonTemporal` — callers only reach here after confirming the
/// column is temporal.
pub fn column_type_for(class: FormatClass) -> ColumnType {
    match class {
        FormatClass::DateTime => ColumnType::DateTime,
        FormatClass::Time => ColumnType::Time,
        FormatClass::Date => ColumnType::Date,
        FormatClass::Duration => ColumnType::Duration,
        FormatClass::NonTemporal => unreachable!("non-temporal format has no temporal column type"),
    }
}

/// Convert one stored double into a tagged `Cell`, given the format
/// class it belongs to. `seconds` is a signed seconds count (with
/// sub-second fraction); `NaN` maps to `Missing` regardless of class.
pub fn to_cell(class: FormatClass, seconds: f64) -> Cell {
    if seconds.is_nan() {
        return Cell::Missing;
    }

    let whole_seconds = seconds.floor() as i64;
    let micros = ((seconds - seconds.floor()) * 1_000_000.0).round() as i64;

    match class {
        FormatClass::Duration => Cell::Duration(whole_seconds * 1_000_000 + micros),
        FormatClass::DateTime | FormatClass::Time | FormatClass::Date => {
            let instant = epoch()
                + ChronoDuration::seconds(whole_seconds)
                + ChronoDuration::microseconds(micros);
            match class {
                FormatClass::Time => Cell::Time(instant.time()),
                FormatClass::Date => Cell::Date(instant.date()),
                FormatClass::DateTime => Cell::DateTime(instant),
                FormatClass::Duration => unreachable!(),
                FormatClass::NonTemporal => unreachable!(),
            }
        }
        FormatClass::NonTemporal => unreachable!("non-temporal format has no temporal mapping"),
    }
}
