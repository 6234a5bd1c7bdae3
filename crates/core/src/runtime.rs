//! Movie runtime scalar.
//!
//! Runtimes are stored and compared as a plain number of minutes but travel
//! over the wire as a string of the form `"<minutes> mins"`. The two forms
//! always denote the same value: rendering is total, parsing is partial.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Literal suffix of the wire form, including the separating space.
pub const WIRE_SUFFIX: &str = " mins";

/// Errors produced when parsing the `"<n> mins"` wire form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeFormatError {
    #[error("invalid runtime format: expected \"<minutes> mins\"")]
    MissingSuffix,

    #[error("invalid runtime format: minutes must be a non-negative integer")]
    InvalidMinutes,

    #[error("invalid runtime format: minutes out of range")]
    OutOfRange,
}

/// Running time of a movie in whole minutes.
///
/// Equality and ordering use the integer, never the rendered string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(i32);

impl Runtime {
    pub const fn new(minutes: i32) -> Self {
        Self(minutes)
    }

    /// Storage form.
    pub const fn minutes(self) -> i32 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Render the wire form, e.g. `102 mins`.
    pub fn to_wire(self) -> String {
        format!("{}{WIRE_SUFFIX}", self.0)
    }

    /// Parse the wire form back into minutes.
    ///
    /// The body must be plain ASCII digits (no sign, no padding) followed by
    /// exactly one space and `mins`.
    pub fn from_wire(s: &str) -> Result<Self, RuntimeFormatError> {
        let digits = s
            .strip_suffix(WIRE_SUFFIX)
            .ok_or(RuntimeFormatError::MissingSuffix)?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RuntimeFormatError::InvalidMinutes);
        }

        digits
            .parse::<i32>()
            .map(Self)
            .map_err(|_| RuntimeFormatError::OutOfRange)
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Self(minutes)
    }
}

impl From<Runtime> for i32 {
    fn from(runtime: Runtime) -> Self {
        runtime.0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{WIRE_SUFFIX}", self.0)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct WireVisitor;

        impl Visitor<'_> for WireVisitor {
            type Value = Runtime;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string of the form \"<minutes> mins\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Runtime, E> {
                Runtime::from_wire(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(WireVisitor)
    }
}
