use serde::{Deserialize, Deserializer};
use serde_json::Value;

// The Xtream API sends ids and counters as either numbers or numeral
// strings, and omits or nulls fields at will. These helpers coerce all
// observed variants into one canonical shape at the parse boundary.

pub fn string_or_number_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    match &value {
        Value::String(s) => Ok(s.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Ok(value.to_string()),
    }
}

pub fn opt_string_or_number_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    match &value {
        Value::String(s) => {
            if s.is_empty() {
                Ok(None)
            } else {
                Ok(Some(s.to_string()))
            }
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

pub fn string_or_number_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => Ok(n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0)),
        Value::String(s) => Ok(s.trim().parse::<u32>().unwrap_or(0)),
        _ => Ok(0),
    }
}

pub fn opt_i64_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => Ok(n.as_i64()),
        Value::String(s) => Ok(s.trim().parse::<i64>().ok()),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "super::string_or_number_string")]
        id: String,
        #[serde(default, deserialize_with = "super::string_or_number_u32")]
        num: u32,
        #[serde(default, deserialize_with = "super::opt_string_or_number_string")]
        title: Option<String>,
    }

    #[test]
    fn test_coerce_number_variants() {
        let probe: Probe = serde_json::from_str(r#"{"id": 42, "num": "7", "title": 3}"#).unwrap();
        assert_eq!(probe.id, "42");
        assert_eq!(probe.num, 7);
        assert_eq!(probe.title.as_deref(), Some("3"));
    }

    #[test]
    fn test_coerce_null_and_missing() {
        let probe: Probe = serde_json::from_str(r#"{"id": null, "title": ""}"#).unwrap();
        assert_eq!(probe.id, "");
        assert_eq!(probe.num, 0);
        assert_eq!(probe.title, None);
    }
}
