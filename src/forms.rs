//! Serde helpers for HTML form and query-string parameters.
//!
//! Browsers submit every field as a string and send empty strings for untouched
//! inputs and selects. These helpers turn blank values into `None` so validation
//! sees a missing value instead of a parse failure.

use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// Deserializes an optional string parameter, treating blank input as `None`
/// and parsing anything else with `FromStr`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Like `blank_as_none` for strings, but keeps the value untouched.
/// Used for passwords, where surrounding whitespace is significant.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.is_empty()))
}

/// Deserializes a boolean select or checkbox value.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`; blank input is `None`.
pub fn blank_as_none_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_bool(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid boolean `{}`", value))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(default, deserialize_with = "blank_as_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "blank_as_none")]
        project_id: Option<i32>,
        #[serde(default, deserialize_with = "blank_as_none")]
        due_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "blank_as_none_bool")]
        is_done: Option<bool>,
        #[serde(default, deserialize_with = "empty_as_none")]
        password: Option<String>,
    }

    #[test]
    fn test_blank_values_become_none() {
        let params: Params = serde_json::from_value(json!({
            "title": "   ",
            "project_id": "",
            "due_date": "",
            "is_done": ""
        }))
        .unwrap();
        assert!(params.title.is_none());
        assert!(params.project_id.is_none());
        assert!(params.due_date.is_none());
        assert!(params.is_done.is_none());
    }

    #[test]
    fn test_missing_values_become_none() {
        let params: Params = serde_json::from_value(json!({})).unwrap();
        assert!(params.title.is_none());
        assert!(params.is_done.is_none());
    }

    #[test]
    fn test_values_are_parsed_and_trimmed() {
        let params: Params = serde_json::from_value(json!({
            "title": "  Write roadmap ",
            "project_id": "12",
            "due_date": "2026-10-18",
            "is_done": "false"
        }))
        .unwrap();
        assert_eq!(params.title.as_deref(), Some("Write roadmap"));
        assert_eq!(params.project_id, Some(12));
        assert_eq!(params.due_date, NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(params.is_done, Some(false));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(serde_json::from_value::<Params>(json!({ "project_id": "abc" })).is_err());
        assert!(serde_json::from_value::<Params>(json!({ "is_done": "maybe" })).is_err());
        assert!(serde_json::from_value::<Params>(json!({ "due_date": "18/10/2026" })).is_err());
    }

    #[test]
    fn test_passwords_keep_their_whitespace() {
        let params: Params = serde_json::from_value(json!({ "password": " secret " })).unwrap();
        assert_eq!(params.password.as_deref(), Some(" secret "));

        let params: Params = serde_json::from_value(json!({ "password": "" })).unwrap();
        assert!(params.password.is_none());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("x"), None);
    }
}
