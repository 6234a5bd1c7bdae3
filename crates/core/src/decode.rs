//! Strict JSON request-body decoding.
//!
//! Decoding runs in four passes over the same buffered bytes:
//!
//! 1. **Size cap.** Bodies over the limit fail with [`DecodeError::TooLarge`]
//!    before any parsing happens.
//! 2. **Syntax.** The body must hold exactly one well-formed JSON value,
//!    optionally surrounded by whitespace.
//! 3. **Shape.** The top-level value must be an object.
//! 4. **Types.** The destination is deserialized. Every object key, at any
//!    depth, must be a field the destination declares there. The first
//!    failure in document order wins: an unknown key, or a type error
//!    reported against the top-level key whose value contains it.
//!
//! Every failure is reported as exactly one [`DecodeError`]. Destination types
//! that are not plain serde records are a bug in the calling code and cause a
//! panic instead.

use std::ops::Range;

use serde::de::{self, DeserializeOwned, IgnoredAny, Visitor};
use serde::{forward_to_deserialize_any, Deserialize, Deserializer};
use serde_json::error::Category;

/// Maximum accepted request body size (1 MiB).
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// A classified request-body decoding failure.
///
/// The `Display` output is safe to return to API clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body contains badly formatted JSON (at character {offset})")]
    MalformedSyntax { offset: usize },

    #[error("body contains badly formatted JSON")]
    TruncatedInput,

    #[error("{}", wrong_type_message(.field, .offset))]
    WrongType {
        field: Option<String>,
        offset: Option<usize>,
    },

    #[error("body contains unknown field \"{field}\"")]
    UnknownField { field: String },

    #[error("body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body must only contain a single JSON value")]
    MultipleValues,

    #[error("body must not be empty")]
    EmptyBody,

    #[error("{cause}")]
    Unclassified { cause: String },
}

fn wrong_type_message(field: &Option<String>, offset: &Option<usize>) -> String {
    match (field, offset) {
        (Some(field), _) => format!("body contains incorrect JSON type for field \"{field}\""),
        (None, Some(offset)) => {
            format!("body contains incorrect JSON type (at character {offset})")
        }
        (None, None) => "body contains incorrect JSON type".to_string(),
    }
}

/// Decode `bytes` into `T` using the default [`MAX_BODY_BYTES`] limit.
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    decode_slice_with_limit(bytes, MAX_BODY_BYTES)
}

/// Decode `bytes` into `T`, rejecting bodies longer than `limit`.
///
/// # Panics
///
/// Panics if `T` does not deserialize as a struct with named fields.
pub fn decode_slice_with_limit<T: DeserializeOwned>(
    bytes: &[u8],
    limit: usize,
) -> Result<T, DecodeError> {
    record_fields::<T>();

    let result = decode_checked(bytes, limit);
    if let Err(err) = &result {
        tracing::debug!(error = %err, len = bytes.len(), "Rejected JSON body");
    }
    result
}

fn decode_checked<T: DeserializeOwned>(bytes: &[u8], limit: usize) -> Result<T, DecodeError> {
    if bytes.len() > limit {
        return Err(DecodeError::TooLarge { limit });
    }
    if bytes.iter().all(|b| is_json_whitespace(*b)) {
        return Err(DecodeError::EmptyBody);
    }

    check_syntax(bytes)?;

    let members = scan_members(bytes)?;

    // Unknown keys are routed to `IgnoredAny` by serde derive; the callback
    // sees them as they are reached, so an earlier type error aborts first.
    let mut unknown = None;
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let result = serde_ignored::deserialize(&mut de, |path| {
        unknown.get_or_insert_with(|| ignored_key(&path));
    });

    match unknown {
        Some(field) => Err(DecodeError::UnknownField { field }),
        None => result.map_err(|err| classify_typed(&err, bytes, &members)),
    }
}

// ---------------------------------------------------------------------------
// Syntax pass
// ---------------------------------------------------------------------------

fn check_syntax(bytes: &[u8]) -> Result<(), DecodeError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    IgnoredAny::deserialize(&mut de).map_err(|err| match err.classify() {
        Category::Eof => DecodeError::TruncatedInput,
        Category::Syntax => DecodeError::MalformedSyntax {
            offset: byte_offset(bytes, err.line(), err.column()),
        },
        Category::Data | Category::Io => DecodeError::Unclassified {
            cause: err.to_string(),
        },
    })?;
    de.end().map_err(|_| DecodeError::MultipleValues)
}

// ---------------------------------------------------------------------------
// Shape pass
// ---------------------------------------------------------------------------

/// A top-level `"key": value` pair and the byte span of its value.
#[derive(Debug, PartialEq, Eq)]
struct Member {
    key: String,
    value: Range<usize>,
}

/// List the members of the top-level object.
///
/// Only called on input that already passed [`check_syntax`].
fn scan_members(bytes: &[u8]) -> Result<Vec<Member>, DecodeError> {
    let mut scan = Scanner { bytes, pos: 0 };
    let mut members = Vec::new();

    scan.skip_whitespace();
    if scan.peek() != Some(b'{') {
        scan.skip_value();
        return Err(DecodeError::WrongType {
            field: None,
            offset: Some(scan.pos),
        });
    }
    scan.pos += 1;

    loop {
        scan.skip_whitespace();
        if scan.peek() != Some(b'"') {
            break;
        }

        let key_start = scan.pos;
        scan.skip_string();
        let key = decode_key(&bytes[key_start..scan.pos]);

        scan.skip_whitespace();
        scan.pos += 1; // ':'
        scan.skip_whitespace();

        let value_start = scan.pos;
        scan.skip_value();
        members.push(Member {
            key,
            value: value_start..scan.pos,
        });

        scan.skip_whitespace();
        if scan.peek() != Some(b',') {
            break;
        }
        scan.pos += 1;
    }

    Ok(members)
}

/// The key an ignored value was stored under, without its parent path.
fn ignored_key(path: &serde_ignored::Path<'_>) -> String {
    match path {
        serde_ignored::Path::Map { key, .. } => key.clone(),
        other => other.to_string(),
    }
}

fn decode_key(raw: &[u8]) -> String {
    serde_json::from_slice(raw).unwrap_or_else(|_| String::from_utf8_lossy(raw).into_owned())
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Scanner<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_json_whitespace) {
            self.pos += 1;
        }
    }

    /// Skip a string starting at its opening quote, leaving `pos` past the
    /// closing quote.
    fn skip_string(&mut self) {
        self.pos += 1;
        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'\\' => self.pos += 1,
                b'"' => return,
                _ => {}
            }
        }
    }

    fn skip_value(&mut self) {
        match self.peek() {
            Some(b'"') => self.skip_string(),
            Some(b'{' | b'[') => {
                let mut depth = 0usize;
                while let Some(b) = self.peek() {
                    match b {
                        b'"' => {
                            self.skip_string();
                            continue;
                        }
                        b'{' | b'[' => depth += 1,
                        b'}' | b']' => {
                            depth -= 1;
                            if depth == 0 {
                                self.pos += 1;
                                return;
                            }
                        }
                        _ => {}
                    }
                    self.pos += 1;
                }
            }
            _ => {
                while let Some(b) = self.peek() {
                    if matches!(b, b',' | b'}' | b']') || is_json_whitespace(b) {
                        break;
                    }
                    self.pos += 1;
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Type pass
// ---------------------------------------------------------------------------

fn classify_typed(err: &serde_json::Error, bytes: &[u8], members: &[Member]) -> DecodeError {
    match err.classify() {
        Category::Data => {
            if let Some(field) = duplicate_field(err) {
                return DecodeError::Unclassified {
                    cause: format!("body contains duplicate field \"{field}\""),
                };
            }
            let offset = byte_offset(bytes, err.line(), err.column());
            match members
                .iter()
                .find(|m| m.value.start <= offset && offset <= m.value.end)
            {
                Some(member) => DecodeError::WrongType {
                    field: Some(member.key.clone()),
                    offset: Some(offset),
                },
                None => DecodeError::Unclassified {
                    cause: err.to_string(),
                },
            }
        }
        Category::Eof => DecodeError::TruncatedInput,
        Category::Syntax => DecodeError::MalformedSyntax {
            offset: byte_offset(bytes, err.line(), err.column()),
        },
        Category::Io => DecodeError::Unclassified {
            cause: err.to_string(),
        },
    }
}

/// serde derive reports a repeated key as "duplicate field `name`".
fn duplicate_field(err: &serde_json::Error) -> Option<String> {
    let message = err.to_string();
    let rest = message.strip_prefix("duplicate field `")?;
    rest.split('`').next().map(str::to_string)
}

/// Convert serde_json's 1-based line and in-line column into a byte offset.
fn byte_offset(bytes: &[u8], line: usize, column: usize) -> usize {
    if line <= 1 {
        return column;
    }
    let line_start = bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(line - 2)
        .map_or(bytes.len(), |(i, _)| i + 1);
    line_start + column
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

// ---------------------------------------------------------------------------
// Field enumeration
// ---------------------------------------------------------------------------

/// Names of the fields `T` accepts, as declared by its serde derive.
///
/// # Panics
///
/// Panics if `T` is not deserialized as a struct (maps, sequences, scalars,
/// enums and structs using `#[serde(flatten)]` have no closed field list).
pub fn record_fields<T: DeserializeOwned>() -> &'static [&'static str] {
    let mut fields = None;
    let _ = T::deserialize(FieldProbe {
        fields: &mut fields,
    });
    fields.unwrap_or_else(|| {
        panic!(
            "decode destination `{}` is not a struct with named fields",
            std::any::type_name::<T>()
        )
    })
}

/// Deserializer that records the field list passed to `deserialize_struct`
/// and fails every other request.
struct FieldProbe<'a> {
    fields: &'a mut Option<&'static [&'static str]>,
}

impl<'de> Deserializer<'de> for FieldProbe<'_> {
    type Error = de::value::Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom("not a struct"))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        *self.fields = Some(fields);
        Err(de::Error::custom("field probe"))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}
