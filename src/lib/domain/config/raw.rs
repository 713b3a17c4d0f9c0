//! Raw, caller supplied configuration

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use super::{errors::ConfigurationError, ConfigKey};

/// A literal configuration value, before any coercion
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicitly empty
    Nil,

    /// A boolean
    Boolean(bool),

    /// An integer
    Integer(i64),

    /// Free text
    Text(String),

    /// A list of values
    List(Vec<Value>),

    /// A native enum spelling, such as `always` or `tlsv1.2`
    #[serde(skip_deserializing)]
    Atom(String),
}

impl Value {
    /// Creates an [`Value::Atom`]
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    /// `nil` or empty text, both of which count as "not supplied"
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }
}

/// A configuration value: either a literal or a reference to an environment
/// variable that is read every time the configuration is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "SerializedValue")]
pub enum ConfigValue {
    /// Used as is
    Literal(Value),

    /// Name of the environment variable holding the value
    Env(String),
}

impl ConfigValue {
    /// Creates an environment variable reference
    pub fn env(name: impl Into<String>) -> Self {
        Self::Env(name.into())
    }
}

/// On the wire an indirection is written as `{"env": "NAME"}`
#[derive(Deserialize)]
#[serde(untagged)]
enum SerializedValue {
    Env { env: String },
    Literal(Value),
}

impl From<SerializedValue> for ConfigValue {
    fn from(value: SerializedValue) -> Self {
        match value {
            SerializedValue::Env { env } => ConfigValue::Env(env),
            SerializedValue::Literal(value) => ConfigValue::Literal(value),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        ConfigValue::Literal(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Literal(Value::Text(value.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Literal(Value::Text(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Literal(Value::Integer(value))
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        ConfigValue::Literal(Value::Integer(value.into()))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Literal(Value::Boolean(value))
    }
}

/// Adapter configuration as supplied by the caller.
///
/// Keys are kept as text so that keys the adapter does not know about can be
/// carried along; they are ignored when the configuration is resolved.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(BTreeMap<String, ConfigValue>);

impl RawConfig {
    /// Creates an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the configuration with `key` set to `value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Iterates over every entry, recognized or not
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Checks that every required key has been supplied.
    ///
    /// Environment variable references count as supplied: they are only read
    /// when the configuration is resolved, so a variable missing now may
    /// exist by the time a message is delivered.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let missing: Vec<ConfigKey> = ConfigKey::REQUIRED
            .into_iter()
            .filter(|key| match self.get(key.as_str()) {
                None => true,
                Some(ConfigValue::Literal(value)) => value.is_blank(),
                Some(ConfigValue::Env(_)) => false,
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError::new(missing, self.clone()))
        }
    }
}

impl fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();

        for (key, value) in self.iter() {
            match value {
                ConfigValue::Literal(_) if key == ConfigKey::Password.as_str() => {
                    map.entry(&key, &"[redacted]")
                }
                _ => map.entry(&key, value),
            };
        }

        map.finish()
    }
}
