use std::slice;
use std::vec;

/// A single binary VDF value. Each variant maps to exactly one type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dict(TaggedDict),
    String(String),
    WideString(String),
    Int32(i32),
    Float32(f32),
    Pointer(i32),
    Color(i32),
    UInt64(u64),
    Int64(i64),
}

impl Value {
    /// Builds an integer value using the narrowest tag that holds `n`.
    ///
    /// `i32` range uses `Int32`, `i64` range uses `Int64`, anything else is
    /// masked to its low 64 bits and stored as `UInt64`.
    pub fn from_integer(n: i128) -> Self {
        if let Ok(v) = i32::try_from(n) {
            Value::Int32(v)
        } else if let Ok(v) = i64::try_from(n) {
            Value::Int64(v)
        } else {
            Value::UInt64(n as u64)
        }
    }

    /// Returns the type tag this value is written with.
    pub fn type_tag(&self) -> u8 {
        match self {
            Value::Dict(_) => super::TYPE_DICT,
            Value::String(_) => super::TYPE_STRING,
            Value::WideString(_) => super::TYPE_WIDE_STRING,
            Value::Int32(_) => super::TYPE_INT32,
            Value::Float32(_) => super::TYPE_FLOAT32,
            Value::Pointer(_) => super::TYPE_POINTER,
            Value::Color(_) => super::TYPE_COLOR,
            Value::UInt64(_) => super::TYPE_UINT64,
            Value::Int64(_) => super::TYPE_INT64,
        }
    }

    /// Returns the text of either string variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::WideString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns any integer variant widened to `i128`.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Int32(v) | Value::Pointer(v) | Value::Color(v) => Some(i128::from(*v)),
            Value::Int64(v) => Some(i128::from(*v)),
            Value::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&TaggedDict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut TaggedDict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl From<TaggedDict> for Value {
    fn from(d: TaggedDict) -> Self {
        Value::Dict(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::from_integer(i128::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::from_integer(i128::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Int32(i32::from(v))
    }
}

/// Ordered key/value dictionary.
///
/// Insertion order is the wire order. Entries decoded from a file are kept
/// verbatim, duplicates included, so re-encoding reproduces the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaggedDict {
    entries: Vec<(String, Value)>,
}

impl TaggedDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the nested dictionary stored under `key`.
    pub fn get_dict(&self, key: &str) -> Option<&TaggedDict> {
        self.get(key).and_then(Value::as_dict)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`, keeping the key's position if it already exists.
    ///
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Appends an entry without checking for an existing key.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Removes the first entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub(crate) fn entries(&self) -> slice::Iter<'_, (String, Value)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TaggedDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = TaggedDict::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl IntoIterator for TaggedDict {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
