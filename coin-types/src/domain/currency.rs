//! Currency domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upstream identifier of a cryptocurrency. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CurrencyId(u32);

/// Error returned when a string or integer is not a valid currency id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid currency id: {0} (expected a positive integer)")]
pub struct ParseCurrencyIdError(pub String);

impl CurrencyId {
    /// Creates a CurrencyId, rejecting zero.
    pub fn new(id: u32) -> Result<Self, ParseCurrencyIdError> {
        if id == 0 {
            return Err(ParseCurrencyIdError(id.to_string()));
        }
        Ok(Self(id))
    }

    /// Returns the raw integer value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyId {
    type Err = ParseCurrencyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s
            .trim()
            .parse()
            .map_err(|_| ParseCurrencyIdError(s.to_string()))?;
        Self::new(raw)
    }
}

impl TryFrom<u32> for CurrencyId {
    type Error = ParseCurrencyIdError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for CurrencyId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A single currency as returned by upstream.
///
/// The payload is opaque: `id`, `name`, `symbol` and `quote` are passed
/// through untouched. An empty record means "not found".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyRecord(Value);

impl CurrencyRecord {
    /// Wraps a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The "not found" record.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// True for an empty object or `null`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Convenience accessor for a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the record, returning the JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for CurrencyRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for CurrencyRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
