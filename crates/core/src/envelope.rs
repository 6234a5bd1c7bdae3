//! Response envelope and its pretty-printed encoding.
//!
//! Every JSON response body is an object whose top-level keys name the
//! payloads they carry (`{"movie": {...}}`), never a bare value. Encoding is
//! deterministic: keys are sorted, indentation is one tab per level, and the
//! output ends with exactly one newline.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Error produced when a payload cannot be represented as JSON.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode response: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

/// Named payloads making up a response body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    entries: BTreeMap<String, Value>,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an envelope holding a single payload under `key`.
    pub fn single<T>(key: impl Into<String>, payload: &T) -> Result<Self, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let mut envelope = Self::new();
        envelope.insert(key, payload)?;
        Ok(envelope)
    }

    /// Insert (or replace) the payload stored under `key`.
    ///
    /// The payload is converted to JSON eagerly so a value that cannot be
    /// represented fails here, before anything reaches the client.
    pub fn insert<T>(&mut self, key: impl Into<String>, payload: &T) -> Result<(), EncodeError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(payload)?;
        self.entries.insert(key.into(), value);
        Ok(())
    }

    /// Builder-style [`Envelope::insert`].
    pub fn with<T>(mut self, key: impl Into<String>, payload: &T) -> Result<Self, EncodeError>
    where
        T: Serialize + ?Sized,
    {
        self.insert(key, payload)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode as tab-indented JSON followed by a single `\n`.
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::with_capacity(128);
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
        self.serialize(&mut ser)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
