// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run configuration.

use serde::{Deserialize, Serialize};

/// How tags are recognized and how the verdict is decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Marker in front of `example<N>:`, `test:` and `error:`.
    pub tag_prefix: String,
    /// Name bound to the declaration being documented.
    pub self_alias: String,
    /// Whether a run without any test/error line fails.
    pub require_checks: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            tag_prefix: ">>".to_string(),
            self_alias: "cls".to_string(),
            require_checks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: CheckConfig = serde_json::from_str(r#"{"self_alias": "this"}"#).unwrap();
        assert_eq!(config.self_alias, "this");
        assert_eq!(config.tag_prefix, ">>");
        assert!(config.require_checks);
    }
}
