// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Registry configuration.
//!
//! [`Config`] implements `Deserialize`, so it can be embedded in any
//! application config file:
//!
//! ```toml
//! [norm]
//! defaultString = "varchar(255)"
//! unsupportedTypes = "placeholder"
//! ```

use serde::{Deserialize, Serialize};

/// What DDL generation does with a field type it cannot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTypes {
    /// Fail with [`NormError::UnsupportedType`](crate::NormError::UnsupportedType).
    #[default]
    Strict,

    /// Emit `unsupported type <name>` in place of the column type.
    Placeholder
}

/// Settings shared by every model of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Column type used for `String` fields without a `dbType` tag.
    pub default_string: String,

    /// Policy for field types with no SQL mapping.
    pub unsupported_types: UnsupportedTypes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_string:    "text".to_string(),
            unsupported_types: UnsupportedTypes::Strict
        }
    }
}

impl Config {
    /// Override the default string column type.
    #[must_use]
    pub fn with_default_string(mut self, db_type: impl Into<String>) -> Self {
        self.default_string = db_type.into();
        self
    }

    /// Override the unsupported type policy.
    #[must_use]
    pub fn with_unsupported_types(mut self, policy: UnsupportedTypes) -> Self {
        self.unsupported_types = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.default_string, "text");
        assert_eq!(config.unsupported_types, UnsupportedTypes::Strict);
    }

    #[test]
    fn deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"defaultString":"varchar(64)"}"#).unwrap();
        assert_eq!(config.default_string, "varchar(64)");
        assert_eq!(config.unsupported_types, UnsupportedTypes::Strict);
    }

    #[test]
    fn deserialize_placeholder_policy() {
        let config: Config = serde_json::from_str(r#"{"unsupportedTypes":"placeholder"}"#).unwrap();
        assert_eq!(config.default_string, "text");
        assert_eq!(config.unsupported_types, UnsupportedTypes::Placeholder);
    }

    #[test]
    fn builders() {
        let config = Config::default()
            .with_default_string("varchar")
            .with_unsupported_types(UnsupportedTypes::Placeholder);
        assert_eq!(config.default_string, "varchar");
        assert_eq!(config.unsupported_types, UnsupportedTypes::Placeholder);
    }
}
