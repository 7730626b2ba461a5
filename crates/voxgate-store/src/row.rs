//! Conversion of `SELECT *` rows into [`Assistant`] records.

use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::types::chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use tracing::debug;
use voxgate_core::{Assistant, RepositoryError};

/// How a MySQL column is rendered as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Bytes,
    Text,
}

impl ColumnKind {
    fn from_type_name(name: &str) -> Self {
        match name {
            "BOOLEAN" => Self::Bool,
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => Self::Signed,
            "BIT" => Self::Unsigned,
            n if n.ends_with(" UNSIGNED") => Self::Unsigned,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME" => Self::DateTime,
            "TIMESTAMP" => Self::Timestamp,
            "JSON" => Self::Json,
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => Self::Bytes,
            // VARCHAR, CHAR, TEXT, DECIMAL, ENUM, SET, ...
            _ => Self::Text,
        }
    }
}

/// Converts every column of `row` into a JSON field named after the column.
pub(crate) fn assistant_from_row(row: &MySqlRow) -> Result<Assistant, RepositoryError> {
    let mut fields = Map::with_capacity(row.columns().len());

    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.type_info().name()).map_err(|e| {
            RepositoryError::Decode {
                column: column.name().to_string(),
                message: e.to_string(),
            }
        })?;
        fields.insert(column.name().to_string(), value);
    }

    Ok(Assistant::from_fields(fields))
}

fn column_value(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match ColumnKind::from_type_name(type_name) {
        ColumnKind::Bool => Value::Bool(row.try_get(idx)?),
        ColumnKind::Signed => Value::from(row.try_get_unchecked::<i64, _>(idx)?),
        ColumnKind::Unsigned => Value::from(row.try_get_unchecked::<u64, _>(idx)?),
        ColumnKind::Float => float_value(f64::from(row.try_get::<f32, _>(idx)?)),
        ColumnKind::Double => float_value(row.try_get::<f64, _>(idx)?),
        ColumnKind::Date => temporal(row.try_get::<NaiveDate, _>(idx), |d| d.to_string())?,
        ColumnKind::Time => temporal(row.try_get::<NaiveTime, _>(idx), |t| t.to_string())?,
        ColumnKind::DateTime => temporal(row.try_get::<NaiveDateTime, _>(idx), |dt| {
            dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
        })?,
        ColumnKind::Timestamp => {
            temporal(row.try_get::<DateTime<Utc>, _>(idx), |ts| ts.to_rfc3339())?
        }
        ColumnKind::Json => row.try_get::<Value, _>(idx)?,
        ColumnKind::Bytes => {
            let bytes: Vec<u8> = row.try_get(idx)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        ColumnKind::Text => Value::String(row.try_get_unchecked::<String, _>(idx)?),
    };

    Ok(value)
}

/// Zero dates (`0000-00-00`) and `TIME` values that are negative or past
/// 24 hours have no chrono form. They render as null instead of failing the
/// whole record.
fn temporal<T, F>(decoded: Result<T, sqlx::Error>, render: F) -> Result<Value, sqlx::Error>
where
    F: FnOnce(T) -> String,
{
    match decoded {
        Ok(value) => Ok(Value::String(render(value))),
        Err(sqlx::Error::ColumnDecode { index, source }) => {
            debug!("Column {} has no calendar value, rendering null: {}", index, source);
            Ok(Value::Null)
        }
        Err(e) => Err(e),
    }
}

/// NaN and infinities have no JSON form.
fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_kinds() {
        assert_eq!(ColumnKind::from_type_name("INT"), ColumnKind::Signed);
        assert_eq!(ColumnKind::from_type_name("BIGINT"), ColumnKind::Signed);
        assert_eq!(ColumnKind::from_type_name("INT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(ColumnKind::from_type_name("BIGINT UNSIGNED"), ColumnKind::Unsigned);
        assert_eq!(ColumnKind::from_type_name("BOOLEAN"), ColumnKind::Bool);
    }

    #[test]
    fn test_text_is_the_fallback() {
        for name in ["VARCHAR", "CHAR", "TEXT", "DECIMAL", "ENUM", "SET"] {
            assert_eq!(ColumnKind::from_type_name(name), ColumnKind::Text, "{}", name);
        }
    }

    #[test]
    fn test_temporal_and_binary_kinds() {
        assert_eq!(ColumnKind::from_type_name("DATETIME"), ColumnKind::DateTime);
        assert_eq!(ColumnKind::from_type_name("TIMESTAMP"), ColumnKind::Timestamp);
        assert_eq!(ColumnKind::from_type_name("DATE"), ColumnKind::Date);
        assert_eq!(ColumnKind::from_type_name("BLOB"), ColumnKind::Bytes);
        assert_eq!(ColumnKind::from_type_name("JSON"), ColumnKind::Json);
    }

    #[test]
    fn test_undecodable_temporal_values_become_null() {
        let zero_date = sqlx::Error::ColumnDecode {
            index: "\"criado_em\"".into(),
            source: "zero date".into(),
        };
        assert_eq!(temporal(Err(zero_date), |d: NaiveDate| d.to_string()).unwrap(), Value::Null);

        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            temporal(Ok(date), |d| d.to_string()).unwrap(),
            Value::String("2024-05-01".into())
        );

        let missing = sqlx::Error::ColumnNotFound("criado_em".into());
        assert!(temporal(Err(missing), |d: NaiveDate| d.to_string()).is_err());
    }

    #[test]
    fn test_non_finite_floats_become_null() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(f64::INFINITY), Value::Null);
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
    }
}
