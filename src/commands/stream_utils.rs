use crate::{
    commands::CommandError,
    key_value_store::{DataType, Entries, live_value},
    resp::RespValue,
    streams::{StreamId, entries_to_resp},
};

/// Parses the COUNT option shared by XRANGE and XREAD.
pub fn parse_count(argument: &str) -> Result<usize, CommandError> {
    argument
        .parse::<usize>()
        .map_err(|_| CommandError::NotAnInteger)
}

/// Resolves an XREAD id, where `$` means the stream's current last id. Keys
/// that hold no stream resolve to `0-0`.
pub fn resolve_read_id(
    entries: &Entries,
    key: &str,
    argument: &str,
) -> Result<StreamId, CommandError> {
    if argument != "$" {
        return Ok(StreamId::parse(argument)?);
    }

    match live_value(entries, key).map(|value| &value.data) {
        Some(DataType::Stream(stream)) => Ok(stream.last_id().unwrap_or(StreamId::MIN)),
        _ => Ok(StreamId::MIN),
    }
}

/// Builds `[key, [entry, ...]]` for every stream holding entries after its id,
/// in request order. Streams without new entries, and keys holding no stream,
/// are left out.
pub fn read_streams(
    entries: &Entries,
    requests: &[(String, StreamId)],
    count: Option<usize>,
) -> Vec<RespValue> {
    let mut response = Vec::new();

    for (key, after) in requests {
        let Some(DataType::Stream(stream)) = live_value(entries, key).map(|value| &value.data)
        else {
            continue;
        };

        let found = stream.entries_after(*after);
        let found = match count {
            Some(count) => &found[..count.min(found.len())],
            None => found,
        };

        if found.is_empty() {
            continue;
        }

        response.push(RespValue::Array(vec![
            RespValue::BulkString(key.clone()),
            entries_to_resp(found),
        ]));
    }

    response
}
