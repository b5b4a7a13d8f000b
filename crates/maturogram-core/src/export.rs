//! # Export Module
//!
//! Tabular export of stored records.
//!
//! The CSV layout follows `schema::record_columns()`: one row per record,
//! one column per persisted field. Output is deterministic for a given
//! record set, so the checksum can be compared across exports.

use crate::record::MaturityRecord;
use crate::schema::{Column, record_columns};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// HEADER STYLE
// =============================================================================

/// How the CSV header row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Machine keys (`id`, `l1_q1`, `percentage_hm`, ...).
    #[default]
    Keys,
    /// Display labels (`S/N`, `Early Childhood: ...`, `Maturity Zone`).
    Labels,
}

impl FromStr for HeaderStyle {
    type Err = crate::MaturogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keys" => Ok(Self::Keys),
            "labels" => Ok(Self::Labels),
            other => Err(crate::MaturogramError::InvalidInput(format!(
                "unknown header style '{other}'"
            ))),
        }
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Quote a field if it contains a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<I>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = String>,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
        first = false;
    }
    out.push_str("\r\n");
}

/// Render records as CSV with a header row.
///
/// Rows keep the order of `records`. Line endings are CRLF.
#[must_use]
pub fn export_csv(records: &[MaturityRecord], style: HeaderStyle) -> String {
    let columns = record_columns();
    let mut out = String::new();

    push_row(
        &mut out,
        columns.iter().map(|column: &Column| match style {
            HeaderStyle::Keys => column.key(),
            HeaderStyle::Labels => column.label(),
        }),
    );
    for record in records {
        push_row(&mut out, columns.iter().map(|column| record.cell(column)));
    }
    out
}

// =============================================================================
// CHECKSUMS
// =============================================================================

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a checksum of exported bytes.
///
/// Detects accidental corruption. It is not collision resistant; enable
/// the `crypto-hash` feature for a BLAKE3 digest.
#[must_use]
pub fn checksum(data: &[u8]) -> u64 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Check exported bytes against a previously computed checksum.
#[must_use]
pub fn verify_checksum(data: &[u8], expected: u64) -> bool {
    checksum(data) == expected
}

/// BLAKE3 digest of exported bytes as a 64-character hex string.
///
/// Only available with the `crypto-hash` feature.
#[cfg(feature = "crypto-hash")]
#[must_use]
pub fn compute_blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

// =============================================================================
// TESTS
// =============================================================================
