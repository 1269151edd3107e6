use jiff::Timestamp;

use crate::{
    commands::{CommandError, CommandResult},
    key_value_store::{DataType, KeyValueStore, Value, live_value_mut},
    resp::RespValue,
    streams::{StreamIdSpec, StreamValue, StreamWaiters},
};

pub struct XaddArguments {
    key: String,
    id: StreamIdSpec,
    fields: Vec<(String, String)>,
}

impl XaddArguments {
    pub fn parse(arguments: Vec<String>) -> Result<Self, CommandError> {
        if arguments.len() < 4 || arguments.len() % 2 != 0 {
            return Err(CommandError::WrongNumberOfArguments("xadd".to_string()));
        }

        let id = StreamIdSpec::parse(&arguments[1])?;

        let fields = arguments[2..]
            .chunks_exact(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect();

        Ok(Self {
            key: arguments[0].clone(),
            id,
            fields,
        })
    }
}

/// Appends an entry to the stream at the key, creating the stream if needed,
/// and wakes readers blocked on it.
///
/// The id is resolved and the entry appended under one exclusive lock, so
/// concurrent XADDs on a key never hand out the same id. The propagated form
/// carries the resolved id, so replicas store identical entries.
pub async fn xadd(
    store: &KeyValueStore,
    stream_waiters: &StreamWaiters,
    arguments: Vec<String>,
) -> Result<CommandResult, CommandError> {
    let xadd_arguments = XaddArguments::parse(arguments)?;
    let now_ms = u64::try_from(Timestamp::now().as_millisecond()).unwrap_or(0);

    let id = {
        let mut entries = store.write().await;

        match live_value_mut(&mut entries, &xadd_arguments.key) {
            Some(value) => {
                let DataType::Stream(ref mut stream) = value.data else {
                    return Err(CommandError::WrongType);
                };

                stream.append(xadd_arguments.id, xadd_arguments.fields.clone(), now_ms)?
            }
            None => {
                let mut stream = StreamValue::new();
                let id = stream.append(xadd_arguments.id, xadd_arguments.fields.clone(), now_ms)?;

                entries.insert(
                    xadd_arguments.key.clone(),
                    Value::new(DataType::Stream(stream)),
                );
                id
            }
        }
    };

    stream_waiters.notify(&xadd_arguments.key);

    let id = id.to_string();
    let mut propagated = vec!["XADD".to_string(), xadd_arguments.key, id.clone()];

    for (field, value) in xadd_arguments.fields {
        propagated.push(field);
        propagated.push(value);
    }

    Ok(CommandResult::Write {
        response: RespValue::BulkString(id).encode(),
        propagate: RespValue::command(&propagated),
    })
}
