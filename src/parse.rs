use bytes::Bytes;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{DecodeError, Token};
use crate::value::Value;

/// How many lists/dictionaries may be nested inside each other before decoding
/// gives up. Keeps hostile input such as `llllll...` from exhausting the stack.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Recursive-descent bencode decoder over a borrowed buffer.
///
/// The cursor only moves forward, and only past bytes that belong to a
/// completed token. One decoder per buffer; decoders share nothing.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            position: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.position..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buf.len()
    }

    /// Decodes the next value, choosing the production from a single lookahead byte.
    pub fn decode(&mut self) -> Result<Value, DecodeError> {
        let Some(byte) = self.peek() else {
            return Err(DecodeError::EndOfInput {
                position: self.position,
            });
        };

        match byte {
            b'i' => self.decode_integer().map(Value::Integer),
            b'l' => self.nested(Self::decode_list),
            b'd' => self.nested(Self::decode_dictionary),
            b'0'..=b'9' => self.decode_byte_string().map(Value::ByteString),
            other => Err(DecodeError::Syntax {
                position: self.position,
                byte: other as char,
            }),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.position).copied()
    }

    /// Index of the first `needle` at or after `from`.
    fn find(&self, from: usize, needle: u8) -> Option<usize> {
        self.buf[from..]
            .iter()
            .position(|&b| b == needle)
            .map(|offset| from + offset)
    }

    fn nested(
        &mut self,
        production: fn(&mut Self) -> Result<Value, DecodeError>,
    ) -> Result<Value, DecodeError> {
        if self.depth >= self.max_depth {
            return Err(DecodeError::NestingTooDeep {
                position: self.position,
                limit: self.max_depth,
            });
        }
        tracing::trace!(position = self.position, depth = self.depth, "entering container");

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    // i<digits>e
    fn decode_integer(&mut self) -> Result<i64, DecodeError> {
        let start = self.position;
        let end = self
            .find(start + 1, b'e')
            .ok_or(DecodeError::UnterminatedToken {
                token: Token::Integer,
                position: start,
            })?;

        let num = parse_number(&self.buf[start + 1..end], start + 1)?;
        self.position = end + 1;
        Ok(num)
    }

    // <length>:<payload>
    fn decode_byte_string(&mut self) -> Result<Bytes, DecodeError> {
        let start = self.position;
        let colon = self
            .find(start, b':')
            .ok_or(DecodeError::MissingDelimiter { position: start })?;
        let len: usize = parse_number(&self.buf[start..colon], start)?;

        let payload_start = colon + 1;
        let available = self.buf.len() - payload_start;
        if len > available {
            return Err(DecodeError::TruncatedInput {
                position: start,
                declared: len,
                available,
            });
        }

        let end = payload_start + len;
        let payload = Bytes::copy_from_slice(&self.buf[payload_start..end]);
        self.position = end;
        Ok(payload)
    }

    // l<value>*e
    fn decode_list(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        self.position += 1;

        let mut list = Vec::new();
        while self.peek().is_some_and(|b| b != b'e') {
            list.push(self.decode()?);
        }

        self.close(Token::List, start)?;
        Ok(Value::List(list))
    }

    // d(<byte string><value>)*e
    fn decode_dictionary(&mut self) -> Result<Value, DecodeError> {
        let start = self.position;
        self.position += 1;

        let mut dict = BTreeMap::new();
        while let Some(byte) = self.peek().filter(|&b| b != b'e') {
            if !byte.is_ascii_digit() {
                return Err(DecodeError::Syntax {
                    position: self.position,
                    byte: byte as char,
                });
            }
            let key = self.decode_byte_string()?;
            let value = self.decode()?;
            // Repeated keys: the last one wins.
            dict.insert(key, value);
        }

        self.close(Token::Dictionary, start)?;
        Ok(Value::Dictionary(dict))
    }

    /// Consumes the terminating `e` of the container opened at `start`.
    fn close(&mut self, token: Token, start: usize) -> Result<(), DecodeError> {
        match self.peek() {
            Some(b'e') => {
                self.position += 1;
                Ok(())
            }
            _ => Err(DecodeError::UnterminatedToken {
                token,
                position: start,
            }),
        }
    }
}

fn parse_number<T: FromStr>(literal: &[u8], position: usize) -> Result<T, DecodeError> {
    std::str::from_utf8(literal)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| DecodeError::NumberFormat {
            position,
            literal: String::from_utf8_lossy(literal).into_owned(),
        })
}

/// Decodes the first value in `encoded`. Bytes after it are ignored.
pub fn decode_bencoded_value(encoded: &[u8]) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(encoded);
    let value = decoder.decode()?;
    if !decoder.is_exhausted() {
        tracing::debug!(
            position = decoder.position(),
            trailing = decoder.remaining().len(),
            "ignoring trailing data"
        );
    }
    Ok(value)
}

/// Decodes exactly one value spanning the whole of `encoded`.
pub fn decode_all(encoded: &[u8]) -> Result<Value, DecodeError> {
    let mut decoder = Decoder::new(encoded);
    let value = decoder.decode()?;
    if !decoder.is_exhausted() {
        return Err(DecodeError::TrailingData {
            position: decoder.position(),
        });
    }
    Ok(value)
}
