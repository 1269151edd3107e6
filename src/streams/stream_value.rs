use crate::resp::RespValue;
use crate::streams::stream_id::{StreamError, StreamId, StreamIdSpec};

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: Vec<(String, String)>,
}

impl StreamEntry {
    /// `[id, [field, value, ...]]`
    pub fn to_resp(&self) -> RespValue {
        let mut fields = Vec::with_capacity(self.fields.len() * 2);

        for (field, value) in &self.fields {
            fields.push(RespValue::BulkString(field.clone()));
            fields.push(RespValue::BulkString(value.clone()));
        }

        RespValue::Array(vec![
            RespValue::BulkString(self.id.to_string()),
            RespValue::Array(fields),
        ])
    }
}

/// Entries kept sorted by id. Ids only ever grow, so appending keeps the order
/// and lookups can binary search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamValue {
    entries: Vec<StreamEntry>,
}

impl StreamValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_id(&self) -> Option<StreamId> {
        self.entries.last().map(|entry| entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(
        &mut self,
        spec: StreamIdSpec,
        fields: Vec<(String, String)>,
        now_ms: u64,
    ) -> Result<StreamId, StreamError> {
        let id = spec.resolve(self.last_id(), now_ms)?;
        self.entries.push(StreamEntry { id, fields });

        Ok(id)
    }

    /// Entries with `start <= id <= end`.
    pub fn range(&self, start: StreamId, end: StreamId) -> &[StreamEntry] {
        if start > end {
            return &[];
        }

        let from = self.entries.partition_point(|entry| entry.id < start);
        let to = self.entries.partition_point(|entry| entry.id <= end);

        &self.entries[from..to]
    }

    /// Entries with `id > after`.
    pub fn entries_after(&self, after: StreamId) -> &[StreamEntry] {
        let from = self.entries.partition_point(|entry| entry.id <= after);

        &self.entries[from..]
    }
}

pub fn entries_to_resp(entries: &[StreamEntry]) -> RespValue {
    RespValue::Array(entries.iter().map(StreamEntry::to_resp).collect())
}
