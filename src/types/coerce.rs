//! Lenient deserializers for request fields that browsers send as strings.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::Value;

/// Largest value either store backend can hold; SQLite integers are signed.
pub const MAX_STORED_U64: u64 = i64::MAX as u64;

pub fn opt_u64<'de, D>(de: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < MAX_STORED_U64 as f64)
                    .map(|f| f as u64)
            })
            .ok_or_else(|| {
                D::Error::custom(format!("expected a non-negative integer, got {n}"))
            })?,
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| {
            D::Error::custom(format!("expected a non-negative integer, got {s:?}"))
        })?,
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a non-negative integer, got {other}"
            )));
        }
    };
    if parsed > MAX_STORED_U64 {
        return Err(D::Error::custom(format!(
            "{parsed} is larger than the maximum {MAX_STORED_U64}"
        )));
    }
    Ok(Some(parsed))
}

pub fn opt_bool<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.trim() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("expected a boolean, got {s:?}"))),
        },
        Some(Value::Number(n)) => match n.as_i64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("expected a boolean, got {n}"))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// Form ids arrive as JSON numbers from the dashboard, but as strings from query params.
pub fn opt_id<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid form id {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid form id {s:?}"))),
        Some(other) => Err(D::Error::custom(format!("invalid form id {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "opt_u64")]
        n: Option<u64>,
        #[serde(default, deserialize_with = "opt_bool")]
        b: Option<bool>,
        #[serde(default, deserialize_with = "opt_id")]
        id: Option<i64>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let p: Fields = serde_json::from_str(r#"{"n":"250","b":"false","id":"17"}"#).unwrap();
        assert_eq!(p.n, Some(250));
        assert_eq!(p.b, Some(false));
        assert_eq!(p.id, Some(17));

        let p: Fields = serde_json::from_str(r#"{"n":10,"b":true,"id":3}"#).unwrap();
        assert_eq!((p.n, p.b, p.id), (Some(10), Some(true), Some(3)));
    }

    #[test]
    fn missing_and_null_are_none() {
        let p: Fields = serde_json::from_str(r#"{"b":null}"#).unwrap();
        assert_eq!((p.n, p.b, p.id), (None, None, None));
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Fields>(r#"{"n":"soon"}"#).is_err());
        assert!(serde_json::from_str::<Fields>(r#"{"n":-4}"#).is_err());
        assert!(serde_json::from_str::<Fields>(r#"{"b":"maybe"}"#).is_err());
    }

    #[test]
    fn rejects_values_outside_signed_range() {
        assert!(serde_json::from_str::<Fields>(r#"{"n":1e20}"#).is_err());
        assert!(serde_json::from_str::<Fields>(r#"{"n":2.5}"#).is_err());
        assert!(serde_json::from_str::<Fields>(r#"{"n":9223372036854775808}"#).is_err());
        assert!(serde_json::from_str::<Fields>(r#"{"n":"18446744073709551615"}"#).is_err());

        let p: Fields = serde_json::from_str(r#"{"n":9223372036854775807}"#).unwrap();
        assert_eq!(p.n, Some(MAX_STORED_U64));
        let p: Fields = serde_json::from_str(r#"{"n":3000.0}"#).unwrap();
        assert_eq!(p.n, Some(3000));
    }
}
