//! JSON text for records and record maps.
//!
//! Records go through `serde`; maps go through `serde_json::Value` so scalar
//! JSON values can be stringified on the way in.

use recmap::RecordMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("key '{0}': nested values are not supported")]
    Nested(String),
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, JsonError> {
    Ok(serde_json::to_string(value)?)
}

pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse `text` into `T`. Blank input is `Ok(None)`; unknown fields are
/// ignored unless `T` denies them.
pub fn from_json<T: DeserializeOwned>(text: &str) -> Result<Option<T>, JsonError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(text)?))
}

/// Map → JSON object with keys in sorted order.
pub fn map_to_json(map: &RecordMap) -> Result<String, JsonError> {
    let object: serde_json::Map<String, serde_json::Value> = map
        .iter()
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
        .collect();
    Ok(serde_json::to_string(&object)?)
}

/// JSON object text → map. `null` entries are dropped.
pub fn map_from_json(text: &str) -> Result<RecordMap, JsonError> {
    map_from_value(serde_json::from_str(text)?, None)
}

/// JSON object → map.
///
/// Strings are taken as is; numbers and booleans use their JSON text. `null`
/// becomes `null_token`, or is dropped when there is none. Arrays and objects
/// are rejected.
pub fn map_from_value(
    value: serde_json::Value,
    null_token: Option<&str>,
) -> Result<RecordMap, JsonError> {
    let object = match value {
        serde_json::Value::Object(object) => object,
        other => return Err(JsonError::NotAnObject(kind(&other))),
    };

    let mut map = RecordMap::with_capacity(object.len());
    for (key, value) in object {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => match null_token {
                Some(token) => token.to_string(),
                None => {
                    tracing::trace!(key = %key, "dropping null entry");
                    continue;
                }
            },
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                return Err(JsonError::Nested(key));
            }
        };
        map.insert(key, text);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Quote {
        symbol: String,
        bid: f64,
    }

    #[test]
    fn record_json_round_trip() {
        let quote = Quote {
            symbol: "EURUSD".into(),
            bid: 1.085,
        };
        let text = to_json(&quote).unwrap();
        assert_eq!(text, r#"{"symbol":"EURUSD","bid":1.085}"#);
        assert_eq!(from_json::<Quote>(&text).unwrap(), Some(quote));
    }

    #[test]
    fn blank_input_is_none() {
        assert_eq!(from_json::<Quote>("  \n").unwrap(), None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let quote: Quote = from_json(r#"{"symbol":"X","bid":1.0,"ask":2.0}"#)
            .unwrap()
            .unwrap();
        assert_eq!(quote.symbol, "X");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(from_json::<Quote>("{"), Err(JsonError::Json(_))));
    }

    #[test]
    fn map_to_json_sorts_keys() {
        let map: RecordMap = [("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())].into();
        assert_eq!(map_to_json(&map).unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn scalars_are_stringified() {
        let map = map_from_json(r#"{"id":7,"ok":true,"name":"kim","gone":null}"#).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["id"], "7");
        assert_eq!(map["ok"], "true");
        assert_eq!(map["name"], "kim");
    }

    #[test]
    fn null_token_replaces_null() {
        let value = serde_json::json!({ "gone": null });
        let map = map_from_value(value, Some("null")).unwrap();
        assert_eq!(map["gone"], "null");
    }

    #[test]
    fn nested_and_non_objects_are_rejected() {
        assert!(matches!(map_from_json(r#"{"a":[1]}"#), Err(JsonError::Nested(ref k)) if k == "a"));
        assert!(matches!(map_from_json("[1,2]"), Err(JsonError::NotAnObject("array"))));
    }
}
