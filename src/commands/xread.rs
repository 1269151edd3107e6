use std::time::Duration;

use tokio::time::{Instant, timeout_at};

use crate::{
    commands::{
        CommandError, CommandResult,
        stream_utils::{parse_count, read_streams, resolve_read_id},
    },
    key_value_store::KeyValueStore,
    resp::RespValue,
    streams::{StreamId, StreamWaiters},
};

#[derive(Debug, PartialEq)]
pub enum XreadBlock {
    NoBlock,
    Forever,
    Timeout(Duration),
}

pub struct XreadArguments {
    count: Option<usize>,
    block: XreadBlock,
    /// `(key, id)` pairs in request order; ids are unresolved so `$` can be
    /// read against the store at call time.
    streams: Vec<(String, String)>,
}

impl XreadArguments {
    /// `[COUNT count] [BLOCK milliseconds] STREAMS key [key ...] id [id ...]`
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 3 {
            return Err(CommandError::WrongNumberOfArguments("xread".to_string()));
        }

        let mut count = None;
        let mut block = XreadBlock::NoBlock;
        let mut index = 0;

        while index < arguments.len() {
            let option = arguments[index].to_uppercase();

            if option == "STREAMS" {
                let rest = &arguments[index + 1..];

                if rest.is_empty() || rest.len() % 2 != 0 {
                    return Err(CommandError::UnbalancedXreadStreams);
                }

                let (keys, ids) = rest.split_at(rest.len() / 2);

                return Ok(Self {
                    count,
                    block,
                    streams: keys.iter().cloned().zip(ids.iter().cloned()).collect(),
                });
            }

            let Some(value) = arguments.get(index + 1) else {
                return Err(CommandError::SyntaxError);
            };

            match option.as_str() {
                "COUNT" => count = Some(parse_count(value)?),
                "BLOCK" => {
                    let milliseconds = value
                        .parse::<u64>()
                        .map_err(|_| CommandError::InvalidTimeout)?;

                    block = match milliseconds {
                        0 => XreadBlock::Forever,
                        ms => XreadBlock::Timeout(Duration::from_millis(ms)),
                    };
                }
                _ => return Err(CommandError::SyntaxError),
            }

            index += 2;
        }

        Err(CommandError::SyntaxError)
    }
}

/// Handles the XREAD command.
///
/// Without BLOCK the reply is immediate: the new entries of every stream that
/// has some, or a null array when none has. With BLOCK the caller registers as
/// a waiter before looking at the store again, so an XADD landing between the
/// first read and the registration still wakes it. `BLOCK 0` waits forever;
/// a finite block does one last read when the deadline passes.
pub async fn xread(
    store: &KeyValueStore,
    stream_waiters: &StreamWaiters,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let xread_arguments = XreadArguments::parse(arguments)?;
    let deadline = match xread_arguments.block {
        XreadBlock::Timeout(duration) => Some(Instant::now() + duration),
        _ => None,
    };

    let requests: Vec<(String, StreamId)> = {
        let entries = store.read().await;

        xread_arguments
            .streams
            .iter()
            .map(|(key, id)| Ok((key.clone(), resolve_read_id(&entries, key, id)?)))
            .collect::<Result<_, CommandError>>()?
    };

    let response = read_streams(&*store.read().await, &requests, xread_arguments.count);

    if !response.is_empty() || xread_arguments.block == XreadBlock::NoBlock {
        return Ok(stream_response(response));
    }

    let keys = requests.iter().map(|(key, _)| key.clone()).collect();
    let mut registration = stream_waiters.register(keys);

    loop {
        let response = read_streams(&*store.read().await, &requests, xread_arguments.count);

        if !response.is_empty() {
            return Ok(stream_response(response));
        }

        match deadline {
            None => registration.notified().await,
            Some(deadline) => {
                if timeout_at(deadline, registration.notified()).await.is_err() {
                    let response =
                        read_streams(&*store.read().await, &requests, xread_arguments.count);
                    return Ok(stream_response(response));
                }
            }
        }
    }
}

fn stream_response(response: Vec<RespValue>) -> CommandResult {
    if response.is_empty() {
        return CommandResult::Response(RespValue::NullArray.encode());
    }

    CommandResult::Response(RespValue::Array(response).encode())
}
