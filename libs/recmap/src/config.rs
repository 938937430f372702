use serde::Deserialize;

use crate::error::ConvertError;

/// How a `Null` field value is written into a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Write `null_token` as the value. On the way back, `null_token` read
    /// into a nullable field is `None`.
    #[default]
    Literal,
    /// Leave the key out of the map.
    Omit,
}

/// What a field-level failure does to the whole conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First failing field aborts the call.
    #[default]
    Strict,
    /// Failing fields are logged, collected and skipped.
    #[serde(alias = "besteffort")]
    BestEffort,
}

/// Converter options — parsed from TOML.
///
/// ```toml
/// null_policy = "omit"
/// failure_policy = "best_effort"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConvertOptions {
    #[serde(default)]
    pub null_policy: NullPolicy,

    /// Text standing for `Null` under [`NullPolicy::Literal`].
    #[serde(default = "default_null_token")]
    pub null_token: String,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Longest ancestor chain accepted during introspection.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_null_token() -> String {
    "null".to_string()
}

fn default_max_depth() -> usize {
    32
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            null_policy: NullPolicy::default(),
            null_token: default_null_token(),
            failure_policy: FailurePolicy::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse options from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConvertError> {
        toml::from_str(toml_str).map_err(|e| ConvertError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(ConvertOptions::parse("").unwrap(), ConvertOptions::default());
    }

    #[test]
    fn parses_all_keys() {
        let opts = ConvertOptions::parse(
            r#"
            null_policy = "omit"
            null_token = "<nil>"
            failure_policy = "best_effort"
            max_depth = 4
            "#,
        )
        .unwrap();
        assert_eq!(opts.null_policy, NullPolicy::Omit);
        assert_eq!(opts.null_token, "<nil>");
        assert_eq!(opts.failure_policy, FailurePolicy::BestEffort);
        assert_eq!(opts.max_depth, 4);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = ConvertOptions::parse(r#"null_policy = "drop""#).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ConvertOptions::load("/nonexistent/recmap.toml").unwrap_err();
        assert!(matches!(err, ConvertError::Config(ref msg) if msg.contains("/nonexistent/recmap.toml")));
    }
}
