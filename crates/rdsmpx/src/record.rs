//! Per-group output records.
//!
//! The decoder builds one [`Record`] per received group and serialises it
//! once at the end of the update. Keys keep the order in which the decoder
//! learned them, which matches the order a field-by-field printer would have
//! emitted.
//!
//! Two renderings are supported: the [`std::fmt::Display`] impl produces the
//! line format consumed by humans and the reference tooling, and the
//! [`serde::Serialize`] impl produces strict JSON (insertion-ordered keys)
//! for downstream machine consumers.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A single record value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    /// Frequencies in MHz, rendered with one decimal place.
    Freqs(Vec<f64>),
    /// A nested record, e.g. the open-data application announcement.
    Map(Vec<(String, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Freqs(freqs) => {
                write!(f, "[ ")?;
                for (i, freq) in freqs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:.1}", freq)?;
                }
                write!(f, " ]")
            }
            Value::Map(fields) => {
                write!(f, "{{ ")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Freqs(freqs) => {
                let mut seq = serializer.serialize_seq(Some(freqs.len()))?;
                for freq in freqs {
                    seq.serialize_element(freq)?;
                }
                seq.end()
            }
            Value::Map(fields) => serialize_fields(fields, serializer),
        }
    }
}

fn serialize_fields<S: Serializer>(
    fields: &[(String, Value)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (key, value) in fields {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// One decoded group, as an ordered set of key/value fields.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
    todo: bool,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Append a field. Re-pushing an existing key replaces its value in
    /// place, keeping the original position.
    pub fn push(&mut self, key: &str, value: Value) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key.to_string(), value));
        }
    }

    pub fn push_bool(&mut self, key: &str, value: bool) {
        self.push(key, Value::Bool(value));
    }

    pub fn push_str(&mut self, key: &str, value: impl Into<String>) {
        self.push(key, Value::Str(value.into()));
    }

    /// Mark the record as belonging to a group type the decoder does not
    /// implement; rendered as a `/* TODO */` comment in the line format.
    pub fn mark_todo(&mut self) {
        self.todo = true;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, (key, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        if self.todo {
            write!(f, " /* TODO */")?;
        }
        write!(f, " }}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // The TODO marker is a comment in the line format and has no JSON
        // representation; it is dropped here.
        serialize_fields(&self.fields, serializer)
    }
}
