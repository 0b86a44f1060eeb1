use bytes::Bytes;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;

/// A decoded bencode value.
///
/// Byte strings are kept as raw bytes; whether they are text is a question
/// for whoever renders the value, not for the decoder.
///
/// ```
/// use bdecode::{decode_bencoded_value, Value};
///
/// let value = decode_bencoded_value(b"d4:spaml1:a1:bee").unwrap();
/// let spam = value.get(b"spam").and_then(Value::as_list).unwrap();
/// assert_eq!(spam[1].as_str(), Some("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string, not necessarily valid UTF-8.
    ByteString(Bytes),
    /// Values in source order.
    List(Vec<Value>),
    /// Byte-string keys to values. Source key order is not kept.
    Dictionary(BTreeMap<Bytes, Value>),
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::ByteString(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::ByteString(_) => "byte string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as `&str` if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::ByteString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Bytes, Value>> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::ByteString(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<BTreeMap<Bytes, Value>> for Value {
    fn from(d: BTreeMap<Bytes, Value>) -> Self {
        Value::Dictionary(d)
    }
}

/// Serializes byte strings as text, replacing invalid UTF-8 with U+FFFD.
/// Use [`crate::json::to_json`] to pick a different policy.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::ByteString(b) => serializer.serialize_str(&String::from_utf8_lossy(b)),
            Value::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for item in l {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dictionary(d) => {
                let mut map = serializer.serialize_map(Some(d.len()))?;
                for (k, v) in d {
                    map.serialize_entry(&String::from_utf8_lossy(k), v)?;
                }
                map.end()
            }
        }
    }
}
