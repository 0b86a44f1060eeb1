use bytes::Bytes;
use clap::ValueEnum;
use serde_json::{Map, Number};

use crate::error::RenderError;
use crate::value::Value;

/// What to do with byte strings when rendering to JSON, which only has text strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BytesPolicy {
    /// Reinterpret as UTF-8, replacing invalid sequences with U+FFFD.
    #[default]
    Lossy,
    /// Refuse byte strings that are not valid UTF-8.
    Strict,
    /// Keep valid UTF-8 as text; hex-encode everything else.
    Hex,
}

impl BytesPolicy {
    fn render(self, bytes: &Bytes, path: &str) -> Result<String, RenderError> {
        match (self, std::str::from_utf8(bytes)) {
            (_, Ok(text)) => Ok(text.to_owned()),
            (BytesPolicy::Lossy, Err(_)) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            (BytesPolicy::Hex, Err(_)) => Ok(hex::encode(bytes)),
            (BytesPolicy::Strict, Err(_)) => Err(RenderError::InvalidUtf8 {
                path: path.to_owned(),
            }),
        }
    }
}

/// Converts a decoded tree into a `serde_json::Value`.
///
/// Integers become numbers, lists arrays, dictionaries objects. Byte strings
/// (values and keys alike) go through `policy`. Distinct keys that render to
/// the same text collapse into one entry; the one with the greater raw key wins.
pub fn to_json(value: &Value, policy: BytesPolicy) -> Result<serde_json::Value, RenderError> {
    render(value, policy, &mut String::from("$"))
}

// `path` is a JSONPath-like locator used in error messages.
fn render(
    value: &Value,
    policy: BytesPolicy,
    path: &mut String,
) -> Result<serde_json::Value, RenderError> {
    match value {
        Value::Integer(i) => Ok(serde_json::Value::Number(Number::from(*i))),
        Value::ByteString(b) => policy.render(b, path).map(serde_json::Value::String),
        Value::List(l) => {
            let mut array = Vec::with_capacity(l.len());
            for (index, item) in l.iter().enumerate() {
                let len = path.len();
                path.push_str(&format!("[{index}]"));
                array.push(render(item, policy, path)?);
                path.truncate(len);
            }
            Ok(serde_json::Value::Array(array))
        }
        Value::Dictionary(d) => {
            let mut object = Map::new();
            for (k, v) in d {
                let key = policy.render(k, path)?;
                let len = path.len();
                path.push('.');
                path.push_str(&key);
                let rendered = render(v, policy, path)?;
                path.truncate(len);
                object.insert(key, rendered);
            }
            Ok(serde_json::Value::Object(object))
        }
    }
}
