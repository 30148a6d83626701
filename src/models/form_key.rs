use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest local form id a plugin can address.
pub const MAX_LOCAL_ID: u32 = 0x00FF_FFFF;

/// Stable identity of a record: local id plus the plugin that defines it.
///
/// Textual form is `XXXXXX:Plugin.esm`, e.g. `012EB7:Skyrim.esm`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormKey {
    pub id: u32,
    pub plugin: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormKeyParseError {
    #[error("Form key {0:?} is missing the ':' separator")]
    MissingSeparator(String),

    #[error("Form key {0:?} has an invalid hex id")]
    InvalidId(String),

    #[error("Form key {0:?} has an empty plugin name")]
    EmptyPlugin(String),
}

impl FormKey {
    pub fn new(id: u32, plugin: impl Into<String>) -> Self {
        Self {
            id,
            plugin: plugin.into(),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.id, self.plugin)
    }
}

impl FromStr for FormKey {
    type Err = FormKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, plugin) = s
            .split_once(':')
            .ok_or_else(|| FormKeyParseError::MissingSeparator(s.to_string()))?;

        let id = u32::from_str_radix(id.trim(), 16)
            .ok()
            .filter(|id| *id <= MAX_LOCAL_ID)
            .ok_or_else(|| FormKeyParseError::InvalidId(s.to_string()))?;

        let plugin = plugin.trim();
        if plugin.is_empty() {
            return Err(FormKeyParseError::EmptyPlugin(s.to_string()));
        }

        Ok(Self::new(id, plugin))
    }
}

impl TryFrom<String> for FormKey {
    type Error = FormKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FormKey> for String {
    fn from(key: FormKey) -> Self {
        key.to_string()
    }
}
