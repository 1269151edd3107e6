//! Redis Serialization Protocol (RESP) encoding and decoding.
//!
//! Decoding works on a borrowed byte slice and reports how many bytes a complete
//! frame occupied, so callers can keep partially received frames in their buffer
//! and account for exactly what was consumed.

use thiserror::Error;

/// Arrays nested deeper than this are rejected instead of decoded.
const MAX_NESTING_DEPTH: usize = 32;
/// Largest bulk string accepted, matching Redis' default `proto-max-bulk-len`.
const MAX_BULK_LENGTH: usize = 512 * 1024 * 1024;
/// Upper bound on the capacity reserved up front for an array's elements.
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

#[derive(Error, Debug, PartialEq)]
pub enum RespError {
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    #[error("unknown RESP type byte '{0}'")]
    UnknownRespType(char),
    #[error("failed to parse integer")]
    FailedToParseInteger,
    #[error("invalid bulk string")]
    InvalidBulkString,
    #[error("invalid array length")]
    InvalidArrayLength,
    #[error("connection closed in the middle of a frame")]
    UnexpectedEof,
    #[error("arrays nested too deeply")]
    NestingTooDeep,
}

impl RespError {
    pub fn as_string(&self) -> String {
        RespValue::Error(format!("ERR Protocol error: {}", self)).encode()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(String),
    NullBulkString,
    Array(Vec<RespValue>),
    NullArray,
}

impl RespValue {
    /// Decodes a single RESP frame from the start of `bytes`.
    ///
    /// Returns `Ok(None)` when the slice holds only part of a frame, and
    /// `Ok(Some((value, consumed)))` once a whole frame is available.
    pub fn decode(bytes: &[u8]) -> Result<Option<(RespValue, usize)>, RespError> {
        Self::decode_nested(bytes, 0)
    }

    fn decode_nested(bytes: &[u8], depth: usize) -> Result<Option<(RespValue, usize)>, RespError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(RespError::NestingTooDeep);
        }

        let Some((line, mut cursor)) = read_line(bytes, 0)? else {
            return Ok(None);
        };

        let Some(type_byte) = line.chars().next() else {
            return Err(RespError::UnknownRespType(' '));
        };
        let content = &line[type_byte.len_utf8()..];

        let value = match type_byte {
            '+' => RespValue::SimpleString(content.to_string()),
            '-' => RespValue::Error(content.to_string()),
            ':' => RespValue::Integer(parse_integer(content)?),
            '$' => {
                let length = parse_integer(content)?;

                if length == -1 {
                    return Ok(Some((RespValue::NullBulkString, cursor)));
                }

                let length = usize::try_from(length)
                    .ok()
                    .filter(|length| *length <= MAX_BULK_LENGTH)
                    .ok_or(RespError::InvalidBulkString)?;

                if bytes.len() < cursor + length + 2 {
                    return Ok(None);
                }

                if &bytes[cursor + length..cursor + length + 2] != b"\r\n" {
                    return Err(RespError::InvalidBulkString);
                }

                let data = std::str::from_utf8(&bytes[cursor..cursor + length])
                    .map_err(|_| RespError::InvalidUtf8)?;
                cursor += length + 2;

                RespValue::BulkString(data.to_string())
            }
            '*' => {
                let length = parse_integer(content)?;

                if length == -1 {
                    return Ok(Some((RespValue::NullArray, cursor)));
                }

                let length = usize::try_from(length).map_err(|_| RespError::InvalidArrayLength)?;
                let mut elements = Vec::with_capacity(length.min(MAX_PREALLOCATED_ELEMENTS));

                while elements.len() < length {
                    let Some((element, consumed)) =
                        RespValue::decode_nested(&bytes[cursor..], depth + 1)?
                    else {
                        return Ok(None);
                    };

                    elements.push(element);
                    cursor += consumed;
                }

                RespValue::Array(elements)
            }
            other => return Err(RespError::UnknownRespType(other)),
        };

        Ok(Some((value, cursor)))
    }

    pub fn encode(&self) -> String {
        match self {
            RespValue::SimpleString(s) => format!("+{}\r\n", s),
            RespValue::Error(msg) => format!("-{}\r\n", msg),
            RespValue::Integer(i) => format!(":{}\r\n", i),
            RespValue::BulkString(s) => format!("${}\r\n{}\r\n", s.len(), s),
            RespValue::NullBulkString => "$-1\r\n".to_string(),
            RespValue::Array(elements) => {
                let mut encoded = format!("*{}\r\n", elements.len());

                for element in elements {
                    encoded.push_str(&element.encode());
                }

                encoded
            }
            RespValue::NullArray => "*-1\r\n".to_string(),
        }
    }

    /// Builds the request form of a command, an array of bulk strings.
    pub fn command<S: AsRef<str>>(parts: &[S]) -> RespValue {
        RespValue::Array(
            parts
                .iter()
                .map(|part| RespValue::BulkString(part.as_ref().to_string()))
                .collect(),
        )
    }

    /// Joins replies that were already encoded into one array reply.
    pub fn encode_array_of_encoded(replies: &[String]) -> String {
        let mut encoded = format!("*{}\r\n", replies.len());

        for reply in replies {
            encoded.push_str(reply);
        }

        encoded
    }
}

/// Decodes a client request: a non-empty array made only of bulk strings.
pub fn parse_command(bytes: &[u8]) -> Result<Option<(Vec<String>, usize)>, RespError> {
    let Some((value, consumed)) = RespValue::decode(bytes)? else {
        return Ok(None);
    };

    let RespValue::Array(elements) = value else {
        return Err(RespError::InvalidArrayLength);
    };

    if elements.is_empty() {
        return Err(RespError::InvalidArrayLength);
    }

    let mut arguments = Vec::with_capacity(elements.len());

    for element in elements {
        match element {
            RespValue::BulkString(s) => arguments.push(s),
            _ => return Err(RespError::InvalidBulkString),
        }
    }

    Ok(Some((arguments, consumed)))
}

fn read_line(bytes: &[u8], start: usize) -> Result<Option<(&str, usize)>, RespError> {
    let Some(position) = bytes[start..].windows(2).position(|window| window == b"\r\n") else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&bytes[start..start + position])
        .map_err(|_| RespError::InvalidUtf8)?;

    Ok(Some((line, start + position + 2)))
}

fn parse_integer(content: &str) -> Result<i64, RespError> {
    content
        .parse::<i64>()
        .map_err(|_| RespError::FailedToParseInteger)
}
