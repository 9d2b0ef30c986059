//! Value-to-SQL-literal encoding.
//!
//! [`encode_literal`] is the pure core of the export pipeline: it maps one
//! typed value plus the column's declared type to a literal that, re-parsed
//! by the target database, reproduces the original value exactly. All
//! formatting is fixed and locale-independent.

use chrono::{NaiveDateTime, Timelike};

use crate::core::OraValue;

/// Fixed format for DATE literals, second precision.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encode one value as a SQL literal.
///
/// Total over every value the driver can hand back; the declared type only
/// influences the temporal rendering (DATE vs TIMESTAMP families).
pub fn encode_literal(value: &OraValue, declared_type: &str) -> String {
    match value {
        OraValue::Null => "NULL".to_string(),
        OraValue::Text(s) | OraValue::Other(s) => quote_string(s),
        OraValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        OraValue::Int(i) => i.to_string(),
        // Decimal and f64 Display both use '.' as the separator and
        // round-trip exactly; never the host locale.
        OraValue::Decimal(d) => d.to_string(),
        OraValue::Float(f) => f.to_string(),
        OraValue::DateTime(dt) | OraValue::Timestamp(dt) => encode_temporal(dt, declared_type),
        OraValue::Bytes(b) => format!("HEXTORAW('{}')", hex::encode_upper(b)),
    }
}

/// Single-quote a string, doubling every embedded single quote.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Render a temporal value according to the declared column type.
///
/// DATE columns get a second-precision `TO_DATE`; the TIMESTAMP family gets
/// `TO_TIMESTAMP` with seven fractional digits. Any other temporal declared
/// type falls back to the `TO_DATE` form.
fn encode_temporal(dt: &NaiveDateTime, declared_type: &str) -> String {
    if declared_type
        .trim()
        .to_uppercase()
        .starts_with("TIMESTAMP")
    {
        // FF7: hundreds of nanoseconds, zero-padded to seven digits.
        let frac = dt.nanosecond() / 100;
        format!(
            "TO_TIMESTAMP('{}.{:07}','YYYY-MM-DD HH24:MI:SS.FF7')",
            dt.format(DATE_FORMAT),
            frac
        )
    } else {
        format!("TO_DATE('{}','YYYY-MM-DD HH24:MI:SS')", dt.format(DATE_FORMAT))
    }
}
