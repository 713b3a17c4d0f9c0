//! Configuration resolution
//!
//! Resolution runs in a fixed order: environment references are read, the
//! required keys are checked, then each recognized key is coerced to its
//! canonical type. Values that cannot be coerced are dropped rather than
//! rejected; keys with a default fall back to it.

use std::{collections::BTreeMap, env, str::FromStr};

use tracing::debug;

use super::{
    canonical::{DEFAULT_RETRIES, DEFAULT_TRANSPORT},
    AuthMode, CanonicalConfig, ConfigKey, ConfigValue, ConfigurationError, RawConfig, TlsMode,
    TlsVersion, Value,
};

/// Resolves `raw` into a [`CanonicalConfig`].
///
/// Environment variables are read on every call, so credentials can be
/// rotated without touching the configuration.
///
/// # Returns
/// - [`Ok`] with the canonical configuration.
/// - [`Err`] with a [`ConfigurationError`] naming every required key that is
///   missing, blank, or unusable.
pub fn resolve(raw: &RawConfig) -> Result<CanonicalConfig, ConfigurationError> {
    let values = resolve_indirections(raw);

    let server = required(&values, ConfigKey::Server, text);
    let port = required(&values, ConfigKey::Port, integer::<u16>);

    let (server, port) = match (server, port) {
        (Some(server), Some(port)) => (server, port),
        (server, port) => {
            let missing = [
                (ConfigKey::Server, server.is_none()),
                (ConfigKey::Port, port.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, missing)| missing.then_some(key))
            .collect();

            return Err(ConfigurationError::new(missing, raw.clone()));
        }
    };

    let mut config = CanonicalConfig::new(server, port);

    config.hostname = optional(&values, ConfigKey::Hostname, text);
    config.username = optional(&values, ConfigKey::Username, text);
    config.password = optional(&values, ConfigKey::Password, text);
    config.allowed_tls_versions =
        optional(&values, ConfigKey::AllowedTlsVersions, tls_versions);
    config.no_mx_lookups = optional(&values, ConfigKey::NoMxLookups, boolean);

    config.tls = optional(&values, ConfigKey::Tls, tls_mode).unwrap_or_default();
    config.ssl = optional(&values, ConfigKey::Ssl, boolean).unwrap_or(false);
    config.retries =
        optional(&values, ConfigKey::Retries, integer::<u32>).unwrap_or(DEFAULT_RETRIES);
    config.auth = optional(&values, ConfigKey::Auth, auth_mode).unwrap_or_default();
    config.transport = optional(&values, ConfigKey::Transport, text)
        .unwrap_or_else(|| DEFAULT_TRANSPORT.to_string());

    Ok(config)
}

/// Replaces environment references with the variable's current value and
/// drops keys the adapter does not recognize. `nil` values are dropped too,
/// so that a default applies in their place.
fn resolve_indirections(raw: &RawConfig) -> BTreeMap<ConfigKey, Value> {
    raw.iter()
        .filter_map(|(name, value)| {
            let Ok(key) = name.parse::<ConfigKey>() else {
                debug!("ignoring unknown configuration key {:?}", name);
                return None;
            };

            let value = match value {
                ConfigValue::Literal(value) => value.clone(),
                ConfigValue::Env(variable) => match env::var(variable) {
                    Ok(value) => Value::Text(value),
                    Err(_) => {
                        debug!("environment variable {} for key {} is not set", variable, key);
                        Value::Nil
                    }
                },
            };

            (value != Value::Nil).then_some((key, value))
        })
        .collect()
}

fn required<T>(
    values: &BTreeMap<ConfigKey, Value>,
    key: ConfigKey,
    coerce: fn(&Value) -> Option<T>,
) -> Option<T> {
    values
        .get(&key)
        .filter(|value| !value.is_blank())
        .and_then(|_| optional(values, key, coerce))
}

/// Coerces the value of `key`, returning `None` both when the key is absent
/// and when its value is not recognized.
fn optional<T>(
    values: &BTreeMap<ConfigKey, Value>,
    key: ConfigKey,
    coerce: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = values.get(&key)?;
    let coerced = coerce(value);

    if coerced.is_none() {
        debug!("dropping unrecognised value for configuration key {}", key);
    }

    coerced
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Text(text) | Value::Atom(text) => Some(text.clone()),
        _ => None,
    }
}

fn integer<T>(value: &Value) -> Option<T>
where
    T: TryFrom<i64> + FromStr,
{
    match value {
        Value::Integer(number) => T::try_from(*number).ok(),
        Value::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(flag) => Some(*flag),
        Value::Text(text) | Value::Atom(text) => match text.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn tls_mode(value: &Value) -> Option<TlsMode> {
    match value {
        Value::Text(name) | Value::Atom(name) => TlsMode::from_name(name),
        _ => None,
    }
}

fn auth_mode(value: &Value) -> Option<AuthMode> {
    match value {
        Value::Text(name) | Value::Atom(name) => AuthMode::from_name(name),
        _ => None,
    }
}

/// Accepts `"tlsv1.1,tlsv1.2"` or a list; unknown versions are skipped and
/// the input order is kept.
fn tls_versions(value: &Value) -> Option<Vec<TlsVersion>> {
    let names: Vec<&str> = match value {
        Value::Text(text) => text.split(',').map(str::trim).collect(),
        Value::List(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Text(name) | Value::Atom(name) => Some(name.trim()),
                _ => None,
            })
            .collect(),
        _ => return None,
    };

    let mut versions = Vec::new();

    for version in names.into_iter().filter_map(TlsVersion::from_name) {
        if !versions.contains(&version) {
            versions.push(version);
        }
    }

    Some(versions)
}
