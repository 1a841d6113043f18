//! Custom deserializers for the enrichment API's loosely-typed payloads.
//!
//! The backend serializes the same field as an integer, a float, or a quoted
//! number depending on which upstream feed produced it, and list fields
//! arrive as null, a bare string, or an array with non-string members mixed
//! in. These helpers coerce all of that into the shapes the viewer works
//! with instead of failing the whole payload.

use serde::{Deserialize, Deserializer};

/// Deserializes a response code from an integer, float, or numeric string.
/// The value stays wide; narrowing to the known code set happens when it is
/// mapped onto the enum, so off-range wire values never wrap.
///
/// # Accepted Formats
///
/// * **Numeric**: `1`, `-1`, `2.0`
/// * **String numeric**: `"3"`, `"-1"`
pub fn de_i64_forgiving<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(D::Error::custom("non-finite numeric for response code"));
                }
                Ok(f.round() as i64)
            } else {
                Err(D::Error::custom("invalid numeric for response code"))
            }
        }
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().or_else(|_| {
                s.parse::<f64>()
                    .map(|f| f.round() as i64)
                    .map_err(|_| D::Error::custom(format!("invalid response code: '{}'", s)))
            })
        }
        other => Err(D::Error::custom(format!(
            "invalid type for response code: {}",
            other
        ))),
    }
}

/// Deserializes a string list from null, a single string, or an array.
/// Non-string array members are stringified rather than rejected.
pub fn de_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(Vec::new()) };
    match v {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(s) => {
            if s.trim().is_empty() {
                Ok(Vec::new())
            } else {
                Ok(vec![s])
            }
        }
        serde_json::Value::Array(arr) => {
            let mut out = Vec::with_capacity(arr.len());
            for el in arr {
                match el {
                    serde_json::Value::String(s) => out.push(s),
                    serde_json::Value::Null => {}
                    other => out.push(other.to_string()),
                }
            }
            Ok(out)
        }
        other => Err(D::Error::custom(format!(
            "invalid type for string list: {}",
            other
        ))),
    }
}

/// Deserializes an optional count accepting integers, floats (rounded), and
/// numeric strings. Negative values clamp to zero.
pub fn de_option_u64_forgiving<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(Some(u))
            } else if let Some(i) = n.as_i64() {
                Ok(Some(if i < 0 { 0 } else { i as u64 }))
            } else if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(D::Error::custom("non-finite numeric for count"));
                }
                let r = f.round();
                Ok(Some(if r < 0.0 { 0 } else { r as u64 }))
            } else {
                Err(D::Error::custom("invalid numeric for count"))
            }
        }
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(u) = s.parse::<u64>() {
                Ok(Some(u))
            } else if let Ok(f) = s.parse::<f64>() {
                let r = f.round();
                Ok(Some(if r < 0.0 { 0 } else { r as u64 }))
            } else {
                Err(D::Error::custom(format!("invalid count value: '{}'", s)))
            }
        }
        other => Err(D::Error::custom(format!("invalid type for count: {}", other))),
    }
}

/// Deserializes an optional confidence value accepting floats, integers, and
/// numeric strings (the mapping serializer renders decimals as strings).
pub fn de_option_f64_forgiving<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let opt = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(v) = opt else { return Ok(None) };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("invalid numeric for confidence")),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid confidence value: '{}'", s)))
        }
        other => Err(D::Error::custom(format!(
            "invalid type for confidence: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct CodeWrap {
        #[serde(deserialize_with = "super::de_i64_forgiving")]
        code: i64,
    }

    #[derive(Deserialize)]
    struct ListWrap {
        #[serde(default, deserialize_with = "super::de_string_list")]
        tags: Vec<String>,
    }

    #[test]
    fn test_code_from_int_float_and_string() {
        let w: CodeWrap = serde_json::from_str(r#"{"code": -1}"#).unwrap();
        assert_eq!(w.code, -1);
        let w: CodeWrap = serde_json::from_str(r#"{"code": 2.0}"#).unwrap();
        assert_eq!(w.code, 2);
        let w: CodeWrap = serde_json::from_str(r#"{"code": "3"}"#).unwrap();
        assert_eq!(w.code, 3);
    }

    #[test]
    fn test_code_keeps_out_of_range_values_intact() {
        let w: CodeWrap = serde_json::from_str(r#"{"code": 255}"#).unwrap();
        assert_eq!(w.code, 255);
        let w: CodeWrap = serde_json::from_str(r#"{"code": -129}"#).unwrap();
        assert_eq!(w.code, -129);
    }

    #[test]
    fn test_code_rejects_non_numeric() {
        let res: Result<CodeWrap, _> = serde_json::from_str(r#"{"code": "clean"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_string_list_shapes() {
        let w: ListWrap = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        assert!(w.tags.is_empty());
        let w: ListWrap = serde_json::from_str(r#"{"tags": "apt"}"#).unwrap();
        assert_eq!(w.tags, vec!["apt"]);
        let w: ListWrap = serde_json::from_str(r#"{"tags": ["apt", 41, null]}"#).unwrap();
        assert_eq!(w.tags, vec!["apt", "41"]);
        let w: ListWrap = serde_json::from_str(r#"{}"#).unwrap();
        assert!(w.tags.is_empty());
    }
}
