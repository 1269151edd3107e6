//! Stream data type: entry ids, the ordered entry list and the registry of
//! blocked readers.

mod stream_id;
mod stream_value;
mod waiters;

pub use stream_id::{StreamError, StreamId, StreamIdSpec};
pub use stream_value::{StreamEntry, StreamValue, entries_to_resp};
pub use waiters::{StreamWaiters, WaiterRegistration};
