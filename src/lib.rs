//! Bencode decoding into a typed value tree, and rendering of that tree as JSON.
//!
//! ```
//! use bdecode::{decode_bencoded_value, json::{to_json, BytesPolicy}};
//!
//! let value = decode_bencoded_value(b"d3:cow3:moo4:spam4:eggse").unwrap();
//! let json = to_json(&value, BytesPolicy::Lossy).unwrap();
//! assert_eq!(json["cow"], "moo");
//! ```

pub mod error;
pub mod json;
pub mod parse;
pub mod value;

pub use error::{DecodeError, RenderError, Token};
pub use parse::{decode_all, decode_bencoded_value, Decoder, DEFAULT_MAX_DEPTH};
pub use value::Value;
