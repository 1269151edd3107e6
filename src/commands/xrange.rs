use crate::{
    commands::{CommandError, CommandResult, stream_utils::parse_count},
    key_value_store::{DataType, KeyValueStore, live_value},
    resp::RespValue,
    streams::{StreamId, entries_to_resp},
};

pub struct XrangeArguments {
    key: String,
    start: StreamId,
    end: StreamId,
    count: Option<usize>,
}

impl XrangeArguments {
    /// `key start end [COUNT count]`. `-` and `+` are the lowest and highest
    /// ids; an id without a sequence number means sequence 0.
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        let count = match arguments.len() {
            3 => None,
            5 if arguments[3].eq_ignore_ascii_case("COUNT") => Some(parse_count(&arguments[4])?),
            5 => return Err(CommandError::SyntaxError),
            _ => return Err(CommandError::WrongNumberOfArguments("xrange".to_string())),
        };

        Ok(Self {
            key: arguments[0].clone(),
            start: StreamId::parse_range_bound(&arguments[1])?,
            end: StreamId::parse_range_bound(&arguments[2])?,
            count,
        })
    }
}

/// Replies with the entries whose ids fall between start and end, both
/// inclusive. A missing key, or one holding a string, reads as an empty stream.
pub async fn xrange(
    store: &KeyValueStore,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let xrange_arguments = XrangeArguments::parse(arguments)?;
    let entries = store.read().await;

    let Some(DataType::Stream(stream)) =
        live_value(&entries, &xrange_arguments.key).map(|value| &value.data)
    else {
        return Ok(CommandResult::Response(RespValue::Array(vec![]).encode()));
    };

    let found = stream.range(xrange_arguments.start, xrange_arguments.end);
    let found = match xrange_arguments.count {
        Some(count) => &found[..count.min(found.len())],
        None => found,
    };

    Ok(CommandResult::Response(entries_to_resp(found).encode()))
}
