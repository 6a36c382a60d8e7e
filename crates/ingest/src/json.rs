//! JSON log line flattening
//!
//! Converts a single JSON object into an ordered list of string fields
//! suitable for columnar storage:
//!
//! - nested objects are flattened into dotted names: `{"a":{"b":"c"}}` → `a.b=c`
//! - `null` values are skipped
//! - strings are stored decoded (unescaped)
//! - numbers, booleans and arrays are stored as their compact JSON text
//!   (`123`, `true`, `[1,2]`)
//!
//! Field names and values live in one backing buffer owned by the
//! extractor. [`Field`] views borrow from the extractor, so they are valid
//! until the next `parse*` call or until the extractor goes back to its
//! pool. Use [`Field::to_owned_field`] to keep a value longer.
//!
//! Object keys are visited in document order, straight off the token
//! stream. Keys that flatten to the same name (`{"a.b":1,"a":{"b":2}}`,
//! or a key repeated in one object) produce one field each; nothing is
//! deduplicated.
//!
//! Non-string leaf values are copied from the input text rather than
//! re-serialized, so `1e3` stays `1e3` and integers wider than 64 bits keep
//! every digit. Arrays only lose insignificant whitespace.

use std::fmt;

use once_cell::sync::OnceCell;
use serde::Deserializer as _;
use serde::de::{self, MapAccess, Visitor};
use serde_json::value::RawValue;
use tell_config::DEFAULT_PARSER_POOL_CAPACITY;

use crate::error::{ParseError, Result};
use crate::pool::{Pool, Pooled, Reusable};

/// Process-wide extractor pool used by [`acquire`] and [`release`]
static PARSER_POOL: OnceCell<Pool<FieldExtractor>> = OnceCell::new();

/// Size the process-wide pool
///
/// Must run before the first [`acquire`]; returns false if the pool already
/// exists, in which case its capacity is left unchanged.
pub fn init_parser_pool(capacity: usize) -> bool {
    PARSER_POOL.set(Pool::new(capacity)).is_ok()
}

/// Acquire an extractor from the process-wide pool
///
/// The extractor returns to the pool when the handle is dropped.
#[inline]
pub fn acquire() -> Pooled<'static, FieldExtractor> {
    parser_pool().get()
}

/// Return an extractor to the process-wide pool
///
/// The handle is consumed, so it cannot be used afterwards.
#[inline]
pub fn release(parser: Pooled<'static, FieldExtractor>) {
    parser.release();
}

/// The process-wide extractor pool
///
/// Created with [`DEFAULT_PARSER_POOL_CAPACITY`] unless
/// [`init_parser_pool`] ran first.
pub fn parser_pool() -> &'static Pool<FieldExtractor> {
    PARSER_POOL.get_or_init(|| Pool::new(DEFAULT_PARSER_POOL_CAPACITY))
}

/// Type of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    /// Classify raw JSON text by its first significant byte
    ///
    /// Returns `None` if the text does not start like any JSON value.
    pub fn of_raw(json: &str) -> Option<Self> {
        let first = json.bytes().find(|b| !b.is_ascii_whitespace())?;
        match first {
            b'n' => Some(Self::Null),
            b't' | b'f' => Some(Self::Bool),
            b'-' | b'0'..=b'9' => Some(Self::Number),
            b'"' => Some(Self::String),
            b'[' => Some(Self::Array),
            b'{' => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range into the backing buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    fn slice<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.start..self.end]
    }
}

#[derive(Debug, Clone, Copy)]
struct FieldSpan {
    name: Span,
    value: Span,
    /// `name` points into the renamed-names buffer instead of the main one
    renamed: bool,
}

impl FieldSpan {
    #[inline]
    fn view<'a>(&self, buf: &'a str, renamed: &'a str) -> Field<'a> {
        let names = if self.renamed { renamed } else { buf };
        Field {
            name: self.name.slice(names),
            value: self.value.slice(buf),
        }
    }
}

/// A flattened field borrowed from a [`FieldExtractor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl Field<'_> {
    /// Copy the field out of the extractor's buffer
    pub fn to_owned_field(&self) -> OwnedField {
        OwnedField {
            name: self.name.to_string(),
            value: self.value.to_string(),
        }
    }
}

/// A flattened field that outlives its extractor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedField {
    pub name: String,
    pub value: String,
}

/// Iterator over the fields of a [`FieldExtractor`], in flattening order
pub struct Fields<'a> {
    spans: std::slice::Iter<'a, FieldSpan>,
    buf: &'a str,
    renamed: &'a str,
}

impl<'a> Iterator for Fields<'a> {
    type Item = Field<'a>;

    #[inline]
    fn next(&mut self) -> Option<Field<'a>> {
        let span = self.spans.next()?;
        Some(span.view(self.buf, self.renamed))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.spans.size_hint()
    }
}

impl ExactSizeIterator for Fields<'_> {}

/// Flattens JSON log lines into fields
///
/// Not meant to be shared between threads; obtain one per caller from a
/// [`Pool`] (see [`acquire`]).
#[derive(Debug, Default)]
pub struct FieldExtractor {
    /// Parsed fields as spans into `buf` (and `renamed`)
    fields: Vec<FieldSpan>,

    /// Backing data for field names and values
    buf: String,

    /// Names assigned by `rename_field` since the last parse
    renamed: String,

    /// Dotted prefix of the object currently being flattened
    prefix: String,
}

impl FieldExtractor {
    /// Create an extractor with empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `msg` into fields, prepending `prefix` to every field name
    ///
    /// The backing buffer is cleared first, so fields from the previous
    /// call are gone.
    pub fn parse(&mut self, msg: &[u8], prefix: &str) -> Result<()> {
        self.parse_log_message(msg, prefix, true)
    }

    /// Parse `msg` into fields without clearing the backing buffer
    ///
    /// Only the field list is cleared; bytes written by earlier calls stay
    /// in the buffer until the next [`parse`](Self::parse), [`reset`](Self::reset)
    /// or release. The buffer grows with every call.
    pub fn parse_no_reset_buf(&mut self, msg: &[u8], prefix: &str) -> Result<()> {
        self.parse_log_message(msg, prefix, false)
    }

    fn parse_log_message(&mut self, msg: &[u8], prefix: &str, reset_buf: bool) -> Result<()> {
        if reset_buf {
            self.reset();
        } else {
            self.reset_no_buf();
        }

        // Anything but an object is validated whole, to tell malformed
        // input from a wrong root type
        let first = msg.iter().find(|b| !b.is_ascii_whitespace());
        if first != Some(&b'{') {
            let raw: &RawValue = serde_json::from_slice(msg)?;
            return match JsonKind::of_raw(raw.get()) {
                Some(kind) => Err(ParseError::unexpected_root(kind)),
                None => unreachable!("json value {:?} has no known type", raw.get()),
            };
        }

        self.prefix.push_str(prefix);
        let mut sink = FieldSink {
            dst: &mut self.fields,
            buf: &mut self.buf,
            prefix: &mut self.prefix,
        };
        let mut de = serde_json::Deserializer::from_slice(msg);
        if let Err(e) = append_log_fields(&mut sink, &mut de) {
            self.reset_no_buf();
            return Err(e.into());
        }
        Ok(())
    }

    /// Fields produced by the last successful parse
    #[inline]
    pub fn fields(&self) -> Fields<'_> {
        Fields {
            spans: self.fields.iter(),
            buf: &self.buf,
            renamed: &self.renamed,
        }
    }

    /// Field at position `index`
    pub fn get(&self, index: usize) -> Option<Field<'_>> {
        self.fields
            .get(index)
            .map(|span| span.view(&self.buf, &self.renamed))
    }

    /// First field named `name`
    pub fn find(&self, name: &str) -> Option<Field<'_>> {
        self.fields().find(|field| field.name == name)
    }

    /// Number of fields
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields were produced
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bytes currently held by the backing buffer
    #[inline]
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Rename the first field named `old_name` to `new_name`
    ///
    /// No-op if `old_name` is empty or not present. The backing buffer is
    /// left untouched; the new name lives in a side buffer that is cleared
    /// on the next parse.
    pub fn rename_field(&mut self, old_name: &str, new_name: &str) {
        if old_name.is_empty() {
            return;
        }

        let (buf, renamed) = (&self.buf, &self.renamed);
        let Some(index) = self
            .fields
            .iter()
            .position(|span| span.view(buf, renamed).name == old_name)
        else {
            return;
        };

        let start = self.renamed.len();
        self.renamed.push_str(new_name);
        let span = &mut self.fields[index];
        span.name = Span::new(start, self.renamed.len());
        span.renamed = true;
    }

    /// Clear fields, prefix and backing buffer, keeping capacity
    pub fn reset(&mut self) {
        self.reset_no_buf();
        self.buf.clear();
    }

    fn reset_no_buf(&mut self) {
        self.fields.clear();
        self.renamed.clear();
        self.prefix.clear();
    }
}

impl Reusable for FieldExtractor {
    fn reset(&mut self) {
        FieldExtractor::reset(self);
    }
}

/// Flattening target, borrowed from a [`FieldExtractor`] for one parse
struct FieldSink<'x> {
    dst: &'x mut Vec<FieldSpan>,
    buf: &'x mut String,
    prefix: &'x mut String,
}

/// Flatten the object at the head of `de` and check nothing trails it
fn append_log_fields<'de, R>(
    sink: &mut FieldSink<'_>,
    de: &mut serde_json::Deserializer<R>,
) -> serde_json::Result<()>
where
    R: serde_json::de::Read<'de>,
{
    (&mut *de).deserialize_map(&mut *sink)?;
    de.end()
}

impl<'de> Visitor<'de> for &mut FieldSink<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a json object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        // Entries are handled as they are read, so repeated keys each
        // produce a field
        while let Some(Key(key)) = map.next_key::<Key<'de>>()? {
            let value: &'de RawValue = map.next_value()?;
            self.append_log_field(&key, value.get())
                .map_err(de::Error::custom)?;
        }
        Ok(())
    }
}

impl FieldSink<'_> {
    fn append_log_field(&mut self, key: &str, value: &str) -> serde_json::Result<()> {
        let Some(kind) = JsonKind::of_raw(value) else {
            unreachable!("json value {value:?} has no known type");
        };

        let start = self.buf.len();
        match kind {
            JsonKind::Null => return Ok(()),
            JsonKind::Object => {
                // {"foo":{"bar":"baz"}} is stored as {"foo.bar":"baz"}
                let prefix_len = self.prefix.len();
                self.prefix.push_str(key);
                self.prefix.push('.');
                let mut de = serde_json::Deserializer::from_str(value);
                let result = append_log_fields(self, &mut de);
                self.prefix.truncate(prefix_len);
                return result;
            }
            JsonKind::String => {
                let mut de = serde_json::Deserializer::from_str(value);
                de.deserialize_str(AppendStr(self.buf))?;
            }
            JsonKind::Array => push_compact(self.buf, value),
            JsonKind::Number | JsonKind::Bool => self.buf.push_str(value),
        }
        let value = Span::new(start, self.buf.len());

        let start = self.buf.len();
        self.buf.push_str(self.prefix.as_str());
        self.buf.push_str(key);
        self.dst.push(FieldSpan {
            name: Span::new(start, self.buf.len()),
            value,
            renamed: false,
        });
        Ok(())
    }
}

/// Object key, borrowed from the input unless it contains escapes
struct Key<'de>(std::borrow::Cow<'de, str>);

impl<'de> de::Deserialize<'de> for Key<'de> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = Key<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object key")
            }

            fn visit_borrowed_str<E>(self, v: &'de str) -> std::result::Result<Key<'de>, E>
            where
                E: de::Error,
            {
                Ok(Key(v.into()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Key<'de>, E> {
                Ok(Key(v.to_owned().into()))
            }
        }

        deserializer.deserialize_str(KeyVisitor)
    }
}

/// Decodes a JSON string straight into the backing buffer
struct AppendStr<'b>(&'b mut String);

impl<'de> Visitor<'de> for AppendStr<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a json string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<(), E> {
        self.0.push_str(v);
        Ok(())
    }
}

/// Append `json` without whitespace outside of string literals
fn push_compact(buf: &mut String, json: &str) {
    if !json.bytes().any(|b| b.is_ascii_whitespace()) {
        buf.push_str(json);
        return;
    }

    let mut in_string = false;
    let mut escaped = false;
    for c in json.chars() {
        if in_string {
            buf.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            buf.push(c);
        } else if !c.is_ascii_whitespace() {
            buf.push(c);
        }
    }
}

#[cfg(test)]
#[path = "json_test.rs"]
mod json_test;
