//! Typed value model for structured documents
//!
//! [`Value`] is the normalized, format-independent representation of a
//! parsed JSON or YAML document. Mappings are ordered vectors with unique
//! keys, so source order survives a round-trip through the model without
//! depending on the ordering policy of any serializer's map type.

use super::address::{Address, Segment};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Generic document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Ordered list of values
    Sequence(Vec<Value>),
    /// Ordered map with unique string keys
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// Get a short type description for display.
    pub fn type_hint(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Check if this value is a container (sequence or mapping).
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Get the number of children for containers.
    pub fn child_count(&self) -> usize {
        match self {
            Value::Sequence(items) => items.len(),
            Value::Mapping(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Scalar text as shown in a tree label (strings unquoted).
    ///
    /// Containers render as an empty string.
    pub fn scalar_preview(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Sequence(_) | Value::Mapping(_) => String::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mapping helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert into a mapping, replacing an existing entry in place.
    ///
    /// Returns the previous value under `key`. Does nothing (and returns
    /// `None`) when `self` is not a mapping.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let Value::Mapping(entries) = self else {
            return None;
        };
        let key = key.into();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Remove a mapping entry, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let Value::Mapping(entries) = self else {
            return None;
        };
        let index = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(index).1)
    }

    /// Check whether a mapping contains `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        matches!(self, Value::Mapping(entries) if entries.iter().any(|(k, _)| k == key))
    }

    /// Keys of a mapping in order (empty for anything else).
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Value::Mapping(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Address resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn child(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Value::Sequence(items), Segment::Index(i)) => items.get(*i),
            (Value::Sequence(items), Segment::Key(k)) => items.get(k.parse::<usize>().ok()?),
            (Value::Mapping(entries), segment) => {
                let key = segment.as_key();
                entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    fn child_mut(&mut self, segment: &Segment) -> Option<&mut Value> {
        match (self, segment) {
            (Value::Sequence(items), Segment::Index(i)) => items.get_mut(*i),
            (Value::Sequence(items), Segment::Key(k)) => {
                items.get_mut(k.parse::<usize>().ok()?)
            }
            (Value::Mapping(entries), segment) => {
                let key = segment.as_key();
                entries
                    .iter_mut()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Resolve an address to a value. The root address resolves to `self`.
    pub fn get(&self, address: &Address) -> Option<&Value> {
        let mut node = self;
        for segment in address.segments() {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Mutable variant of [`Value::get`].
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Value> {
        let mut node = self;
        for segment in address.segments() {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    /// Replace the value at `address`. Returns `false` if it does not resolve.
    pub fn set(&mut self, address: &Address, value: Value) -> bool {
        match self.get_mut(address) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Render a float so it always reads back as a float.
pub(crate) fn format_float(f: f64) -> String {
    if !f.is_finite() || f.fract() != 0.0 {
        f.to_string()
    } else if f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{:e}", f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde glue
// ─────────────────────────────────────────────────────────────────────────────

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON-compatible value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        // Out-of-range unsigned integers degrade to floats
        Ok(i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or(Value::Float(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Value::Mapping(Vec::with_capacity(map.size_hint().unwrap_or(0)));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            mapping.insert(key, value);
        }
        Ok(mapping)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
