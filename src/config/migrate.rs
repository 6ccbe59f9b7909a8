//! Bring an older configuration file up to date: keys added in later
//! versions are filled with their defaults, everything else is kept.

use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn expected_keys() -> Vec<(&'static str, String)> {
    let defaults = super::Config::default();
    vec![
        ("database", defaults.database),
        ("remote_store", defaults.remote_store),
        ("hours_alert", super::default_hours_alert()),
        ("week_start", super::default_week_start()),
    ]
}

/// Keys of the config file at `path` that are missing. A missing file
/// counts as every key missing.
pub fn missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let map = read_mapping(path)?;
    Ok(expected_keys()
        .into_iter()
        .filter(|(k, _)| !map.contains_key(Value::String(k.to_string())))
        .map(|(k, _)| k.to_string())
        .collect())
}

/// Add the missing keys to the config file at `path` and return their
/// names. The file is rewritten only when something was added.
pub fn check_and_fill(path: &Path) -> AppResult<Vec<String>> {
    let mut map = read_mapping(path)?;
    let mut added = Vec::new();

    for (key, default) in expected_keys() {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            map.insert(k, Value::String(default));
            added.push(key.to_string());
        }
    }

    if !added.is_empty() {
        let serialized = serde_yaml::to_string(&Value::Mapping(map))?;
        fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;
    }

    Ok(added)
}

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    if !path.exists() {
        return Ok(Mapping::new());
    }

    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    match serde_yaml::from_str::<Value>(&content)? {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
    }
}
