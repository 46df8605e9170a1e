use std::collections::HashMap;

use axum::body::Bytes;
use serde_json::{Map, Value};

use crate::api::RestError;

/// Request parameters merged from the query string and an optional JSON
/// object body. Body values win over query values.
#[derive(Debug, Clone, Default)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn from_query(query: HashMap<String, String>) -> Self {
        Self(
            query
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        )
    }

    pub fn from_request(query: HashMap<String, String>, body: &Bytes) -> Result<Self, RestError> {
        let mut params = Self::from_query(query);
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(params);
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => {
                params.0.extend(map);
                Ok(params)
            }
            Ok(_) => Err(RestError::invalid_json("expected an object")),
            Err(e) => Err(RestError::invalid_json(&e.to_string())),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    /// Fails with `rest_missing_callback_param` naming every absent key.
    pub fn require(&self, keys: &[&str]) -> Result<(), RestError> {
        let missing: Vec<&str> = keys.iter().copied().filter(|k| !self.has(k)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RestError::missing_params(&missing))
        }
    }

    /// Scalar value as a string. Numbers and booleans are stringified,
    /// arrays and objects yield `None`.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            _ => None,
        }
    }

    /// Like [`Params::string`], but an explicit JSON `null` is reported as
    /// `Some(None)` so callers can clear a field.
    pub fn nullable_string(&self, key: &str) -> Option<Option<String>> {
        match self.0.get(key)? {
            Value::Null => Some(None),
            _ => self.string(key).map(Some),
        }
    }

    /// Array of strings, or a comma-separated string.
    pub fn list(&self, key: &str) -> Result<Option<Vec<String>>, RestError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    _ => Err(RestError::invalid_param(key, "expected a list of strings")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(Value::String(s)) => Ok(Some(s.split(',').map(str::to_string).collect())),
            Some(_) => Err(RestError::invalid_param(key, "expected a list of strings")),
        }
    }

    pub fn bool(&self, key: &str, default: bool) -> Result<bool, RestError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => match self.string(key).as_deref() {
                Some("1") | Some("true") => Ok(true),
                Some("0") | Some("false") | Some("") => Ok(false),
                _ => Err(RestError::invalid_param(
                    key,
                    &format!("{} is not of type boolean", other),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_body_overrides_query() {
        let body = Bytes::from_static(br#"{"q": "body", "append": true}"#);
        let params = Params::from_request(query(&[("q", "query")]), &body).unwrap();
        assert_eq!(params.string("q").as_deref(), Some("body"));
        assert!(params.bool("append", false).unwrap());
    }

    #[test]
    fn test_require_lists_missing() {
        let params = Params::from_query(query(&[("q", "foo")]));
        assert!(params.require(&["q"]).is_ok());

        let err = params.require(&["q", "reassign", "other"]).unwrap_err();
        assert_eq!(err.code, "rest_missing_callback_param");
        assert_eq!(err.data["params"], serde_json::json!(["reassign", "other"]));
    }

    #[test]
    fn test_list_accepts_array_and_csv() {
        let body = Bytes::from_static(br#"{"coauthors": ["author1", "editor2"]}"#);
        let params = Params::from_request(HashMap::new(), &body).unwrap();
        assert_eq!(
            params.list("coauthors").unwrap(),
            Some(vec!["author1".to_string(), "editor2".to_string()])
        );

        let params = Params::from_query(query(&[("coauthors", "a,b")]));
        assert_eq!(params.list("coauthors").unwrap().map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_invalid_body() {
        let body = Bytes::from_static(b"[1, 2]");
        let err = Params::from_request(HashMap::new(), &body).unwrap_err();
        assert_eq!(err.code, "rest_invalid_json");
    }
}
