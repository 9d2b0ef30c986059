//! Source database operations.
//!
//! The export core consumes a live source connection through the narrow
//! [`SourceConnection`] trait: catalog metadata lookups plus forward-only
//! row streaming. The production implementation is [`OdbcSource`]; tests
//! substitute in-memory fakes.

mod odbc;

pub use odbc::OdbcSource;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::{ColumnDescriptor, OraValue, Row};
use crate::error::Result;

/// Per-row sink handed to [`SourceConnection::stream_rows`]. Rows are pushed
/// one at a time in cursor order and never accumulated by the driver.
pub type RowSink<'a> = &'a mut (dyn FnMut(Row) -> Result<()> + Send);

/// Trait for source database operations.
#[async_trait]
pub trait SourceConnection: Send + Sync {
    /// The session's current schema, resolved once before any table export.
    async fn current_schema(&self) -> Result<String>;

    /// Column metadata for `(schema, table)` in catalog ordinal order.
    ///
    /// An absent or invisible table yields an empty list, not an error; the
    /// exporter turns zero columns into a hard failure.
    async fn columns(&self, schema: &str, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Execute an arbitrary SELECT and stream each row through `on_row`,
    /// converting values to [`OraValue`] by the declared column types.
    async fn stream_rows(
        &self,
        sql: &str,
        declared_types: &[String],
        on_row: RowSink<'_>,
    ) -> Result<()>;

    /// Connectivity check.
    async fn ping(&self) -> Result<()>;
}

/// Convert one fetched value (driver text form plus null indicator) into an
/// [`OraValue`] according to the column's declared type.
///
/// Total: a value that fails its type-specific parse is carried as text,
/// which still renders as a valid quoted literal.
pub fn convert_text_value(text: Option<String>, declared_type: &str) -> OraValue {
    let Some(text) = text else {
        return OraValue::Null;
    };
    let ty = declared_type.trim().to_uppercase();

    if ty.starts_with("TIMESTAMP") {
        return match parse_datetime(&text) {
            Some(dt) => OraValue::Timestamp(dt),
            None => OraValue::Text(text),
        };
    }

    match ty.as_str() {
        "DATE" => match parse_datetime(&text) {
            Some(dt) => OraValue::DateTime(dt),
            None => OraValue::Text(text),
        },
        "NUMBER" | "FLOAT" | "DECIMAL" | "NUMERIC" | "INTEGER" | "SMALLINT" => {
            parse_numeric(text)
        }
        "BINARY_FLOAT" | "BINARY_DOUBLE" => match text.parse::<f64>() {
            Ok(f) => OraValue::Float(f),
            Err(_) => OraValue::Text(text),
        },
        "BOOLEAN" => match text.as_str() {
            "1" | "TRUE" | "true" | "T" | "Y" => OraValue::Bool(true),
            "0" | "FALSE" | "false" | "F" | "N" => OraValue::Bool(false),
            _ => OraValue::Text(text),
        },
        // The Oracle ODBC driver hands RAW/BLOB values back hex-encoded.
        "RAW" | "LONG RAW" | "BLOB" => match hex::decode(&text) {
            Ok(bytes) => OraValue::Bytes(bytes),
            Err(_) => OraValue::Text(text),
        },
        "CHAR" | "NCHAR" | "VARCHAR2" | "NVARCHAR2" | "CLOB" | "NCLOB" | "LONG" => {
            OraValue::Text(text)
        }
        _ => OraValue::Other(text),
    }
}

fn parse_numeric(text: String) -> OraValue {
    if !text.contains(&['.', 'e', 'E'][..]) {
        if let Ok(i) = text.parse::<i64>() {
            return OraValue::Int(i);
        }
    }
    if let Ok(d) = text.parse::<Decimal>() {
        return OraValue::Decimal(d);
    }
    if let Ok(f) = text.parse::<f64>() {
        return OraValue::Float(f);
    }
    OraValue::Text(text)
}

fn parse_datetime(text: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use std::str::FromStr;

    #[test]
    fn test_null_indicator_wins_over_type() {
        assert_eq!(convert_text_value(None, "NUMBER"), OraValue::Null);
        assert_eq!(convert_text_value(None, "VARCHAR2"), OraValue::Null);
    }

    #[test]
    fn test_number_without_scale_becomes_int() {
        assert_eq!(
            convert_text_value(Some("42".into()), "NUMBER"),
            OraValue::Int(42)
        );
        assert_eq!(
            convert_text_value(Some("-7".into()), "NUMBER"),
            OraValue::Int(-7)
        );
    }

    #[test]
    fn test_number_with_scale_becomes_decimal() {
        assert_eq!(
            convert_text_value(Some("123.450".into()), "NUMBER"),
            OraValue::Decimal(Decimal::from_str("123.450").unwrap())
        );
    }

    #[test]
    fn test_number_wider_than_i64_still_exact() {
        let v = convert_text_value(Some("98765432109876543210".into()), "NUMBER");
        assert_eq!(
            v,
            OraValue::Decimal(Decimal::from_str("98765432109876543210").unwrap())
        );
    }

    #[test]
    fn test_binary_double_becomes_float() {
        assert_eq!(
            convert_text_value(Some("2.5".into()), "BINARY_DOUBLE"),
            OraValue::Float(2.5)
        );
    }

    #[test]
    fn test_date_parses_to_second_precision() {
        let v = convert_text_value(Some("2024-01-15 10:30:00".into()), "DATE");
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(v, OraValue::DateTime(expected));
    }

    #[test]
    fn test_date_only_text_gets_midnight() {
        let v = convert_text_value(Some("2024-01-15".into()), "DATE");
        match v {
            OraValue::DateTime(dt) => assert_eq!(dt.to_string(), "2024-01-15 00:00:00"),
            other => panic!("expected DateTime, got {other:?}"),
        }
    }

    #[test]
    fn test_timestamp_keeps_fraction() {
        let v = convert_text_value(Some("2024-01-15 10:30:00.123456700".into()), "TIMESTAMP(9)");
        match v {
            OraValue::Timestamp(dt) => assert_eq!(dt.nanosecond(), 123_456_700),
            other => panic!("expected Timestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_raw_decodes_driver_hex() {
        assert_eq!(
            convert_text_value(Some("DEADBEEF".into()), "RAW"),
            OraValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef])
        );
    }

    #[test]
    fn test_boolean_text_forms() {
        assert_eq!(
            convert_text_value(Some("1".into()), "BOOLEAN"),
            OraValue::Bool(true)
        );
        assert_eq!(
            convert_text_value(Some("FALSE".into()), "BOOLEAN"),
            OraValue::Bool(false)
        );
    }

    #[test]
    fn test_character_types_stay_text() {
        assert_eq!(
            convert_text_value(Some("hello".into()), "VARCHAR2"),
            OraValue::Text("hello".into())
        );
        assert_eq!(
            convert_text_value(Some("x".into()), "CHAR"),
            OraValue::Text("x".into())
        );
    }

    #[test]
    fn test_unknown_type_carried_as_other() {
        assert_eq!(
            convert_text_value(Some("AAAB12AADAAAAwPAAA".into()), "ROWID"),
            OraValue::Other("AAAB12AADAAAAwPAAA".into())
        );
    }

    #[test]
    fn test_unparseable_value_degrades_to_text() {
        assert_eq!(
            convert_text_value(Some("not-a-date".into()), "DATE"),
            OraValue::Text("not-a-date".into())
        );
        assert_eq!(
            convert_text_value(Some("zz".into()), "RAW"),
            OraValue::Text("zz".into())
        );
    }
}
