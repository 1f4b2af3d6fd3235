//! Session constraints.
//!
//! Constraints are an open map (callers may put anything in it) with two
//! recognized keys, `max_steps` and `max_retries`. Reading them never fails:
//! a missing or malformed value falls back to the default.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const MAX_STEPS: &str = "max_steps";
pub const MAX_RETRIES: &str = "max_retries";

pub const DEFAULT_MAX_STEPS: u64 = 3;
pub const DEFAULT_MAX_RETRIES: u64 = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constraints(BTreeMap<String, Value>);

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when the key is absent. Returns `true` if inserted.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value.into());
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn max_retries(&self) -> u64 {
        self.count(MAX_RETRIES).unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn max_steps(&self) -> u64 {
        self.count(MAX_STEPS).unwrap_or(DEFAULT_MAX_STEPS)
    }

    /// Read `key` as a non-negative integer.
    pub fn count(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(coerce_count)
    }
}

/// Accepts integers, whole non-negative floats, and decimal strings.
fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
