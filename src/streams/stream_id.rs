use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum StreamError {
    #[error("ERR The ID specified in XADD must be greater than 0-0")]
    IdMustBeGreaterThanZero,
    #[error("ERR The ID specified in XADD is equal or smaller than the target stream top item")]
    IdNotIncreasing,
    #[error("ERR Invalid stream ID specified as stream command argument")]
    InvalidId,
}

/// Identifier of a stream entry, ordered by milliseconds first and sequence second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    pub fn new(ms: u64, seq: u64) -> Self {
        Self { ms, seq }
    }

    /// Parses `ms-seq` or a bare `ms`, in which case the sequence is 0.
    pub fn parse(input: &str) -> Result<Self, StreamError> {
        let (ms, seq) = match input.split_once('-') {
            Some((ms, seq)) => (ms, Some(seq)),
            None => (input, None),
        };

        let ms = ms.parse::<u64>().map_err(|_| StreamError::InvalidId)?;
        let seq = match seq {
            Some(seq) => seq.parse::<u64>().map_err(|_| StreamError::InvalidId)?,
            None => 0,
        };

        Ok(Self { ms, seq })
    }

    /// Parses an XRANGE bound where `-` and `+` stand for the lowest and highest ids.
    pub fn parse_range_bound(input: &str) -> Result<Self, StreamError> {
        match input {
            "-" => Ok(StreamId::MIN),
            "+" => Ok(StreamId::MAX),
            other => StreamId::parse(other),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// The id argument of XADD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamIdSpec {
    Explicit(StreamId),
    AutoSequence(u64),
    Auto,
}

impl StreamIdSpec {
    pub fn parse(input: &str) -> Result<Self, StreamError> {
        if input == "*" {
            return Ok(StreamIdSpec::Auto);
        }

        if let Some(ms) = input.strip_suffix("-*") {
            let ms = ms.parse::<u64>().map_err(|_| StreamError::InvalidId)?;
            return Ok(StreamIdSpec::AutoSequence(ms));
        }

        Ok(StreamIdSpec::Explicit(StreamId::parse(input)?))
    }

    /// Resolves the id for a new entry given the current top entry of the stream.
    pub fn resolve(&self, last: Option<StreamId>, now_ms: u64) -> Result<StreamId, StreamError> {
        match *self {
            StreamIdSpec::Explicit(id) => {
                if id == StreamId::MIN {
                    return Err(StreamError::IdMustBeGreaterThanZero);
                }

                match last {
                    Some(last) if id <= last => Err(StreamError::IdNotIncreasing),
                    _ => Ok(id),
                }
            }
            StreamIdSpec::AutoSequence(ms) => next_sequence(ms, last),
            StreamIdSpec::Auto => match last {
                Some(last) if now_ms <= last.ms => next_sequence(last.ms, Some(last)),
                _ => Ok(StreamId::new(now_ms, 0)),
            },
        }
    }
}

fn next_sequence(ms: u64, last: Option<StreamId>) -> Result<StreamId, StreamError> {
    match last {
        Some(last) if ms < last.ms => Err(StreamError::IdNotIncreasing),
        Some(last) if ms == last.ms => {
            let seq = last.seq.checked_add(1).ok_or(StreamError::IdNotIncreasing)?;
            Ok(StreamId::new(ms, seq))
        }
        None if ms == 0 => Ok(StreamId::new(0, 1)),
        _ => Ok(StreamId::new(ms, 0)),
    }
}
