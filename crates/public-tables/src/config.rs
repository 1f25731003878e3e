//! Plugin configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PublicTablesError, Result};

/// Key of this add-on's section in the host's plugin configuration.
pub const PLUGIN_NAME: &str = "public-tables";

/// Configuration for public tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicTablesConfig {
    /// Database holding `_public_tables`. The host's primary database when
    /// unset.
    #[serde(default)]
    pub database: Option<String>,
}

impl PublicTablesConfig {
    /// Configuration storing the list in the named database.
    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
        }
    }

    /// Parse this add-on's section of the host configuration.
    ///
    /// A missing or `null` section yields the defaults.
    pub fn from_plugin_config(section: Option<&Value>) -> Result<Self> {
        match section {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(value) => Self::deserialize(value)
                .map_err(|e| PublicTablesError::Configuration(e.to_string())),
        }
    }

    /// The configured database, with an empty name treated as unset.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref().filter(|name| !name.is_empty())
    }
}
