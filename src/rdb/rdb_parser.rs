use std::collections::HashMap;

use jiff::Timestamp;

use crate::{
    key_value_store::{DataType, Entries, Value},
    rdb::{
        RdbError,
        encoding::RdbReader,
        opcode::{
            CHECKSUM_LENGTH, DATABASE_OPCODE, END_OF_FILE_OPCODE, EXPIRATION_MILLISECONDS_OPCODE,
            EXPIRATION_SECONDS_OPCODE, MAGIC_STRING, METADATA_OPCODE, RESIZE_DB_OPCODE,
            STRING_VALUE_TYPE, VERSION_LENGTH,
        },
    },
};

#[derive(Debug, Default, PartialEq)]
pub struct RdbSnapshot {
    pub version: String,
    pub metadata: HashMap<String, String>,
    pub entries: Entries,
}

#[derive(Debug)]
pub struct RdbParser<'a> {
    reader: RdbReader<'a>,
}

impl<'a> RdbParser<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            reader: RdbReader::new(bytes),
        }
    }

    pub fn parse(mut self) -> Result<RdbSnapshot, RdbError> {
        let mut snapshot = RdbSnapshot {
            version: self.parse_header()?,
            ..RdbSnapshot::default()
        };

        loop {
            let opcode = self.reader.read_u8()?;

            match opcode {
                METADATA_OPCODE => {
                    let key = self.reader.read_string()?;
                    let value = self.reader.read_string()?;
                    snapshot.metadata.insert(key, value);
                }
                DATABASE_OPCODE => {
                    self.reader.read_length()?;
                }
                RESIZE_DB_OPCODE => {
                    self.reader.read_length()?;
                    self.reader.read_length()?;
                }
                EXPIRATION_MILLISECONDS_OPCODE => {
                    let milliseconds = u64::from_le_bytes(self.reader.read_array()?);
                    let expiration = i64::try_from(milliseconds)
                        .ok()
                        .and_then(|ms| Timestamp::from_millisecond(ms).ok())
                        .ok_or(RdbError::InvalidExpiration(milliseconds))?;

                    let value_type = self.reader.read_u8()?;
                    self.parse_entry(&mut snapshot.entries, value_type, Some(expiration))?;
                }
                EXPIRATION_SECONDS_OPCODE => {
                    let seconds = u32::from_le_bytes(self.reader.read_array()?);
                    let expiration = Timestamp::from_second(i64::from(seconds))
                        .map_err(|_| RdbError::InvalidExpiration(u64::from(seconds)))?;

                    let value_type = self.reader.read_u8()?;
                    self.parse_entry(&mut snapshot.entries, value_type, Some(expiration))?;
                }
                END_OF_FILE_OPCODE => {
                    // Older versions end without a checksum.
                    if !self.reader.is_empty() {
                        self.reader.take(CHECKSUM_LENGTH)?;
                    }

                    return Ok(snapshot);
                }
                value_type => self.parse_entry(&mut snapshot.entries, value_type, None)?,
            }
        }
    }

    fn parse_header(&mut self) -> Result<String, RdbError> {
        let magic = self.reader.take(MAGIC_STRING.len())?;

        if magic != MAGIC_STRING {
            return Err(RdbError::InvalidMagicString);
        }

        let version = self.reader.take(VERSION_LENGTH)?;

        std::str::from_utf8(version)
            .map(str::to_string)
            .map_err(|_| RdbError::InvalidUtf8)
    }

    fn parse_entry(
        &mut self,
        entries: &mut Entries,
        value_type: u8,
        expiration: Option<Timestamp>,
    ) -> Result<(), RdbError> {
        if value_type != STRING_VALUE_TYPE {
            return Err(RdbError::UnsupportedValueType(value_type));
        }

        let key = self.reader.read_string()?;
        let value = self.reader.read_string()?;

        entries.insert(
            key,
            Value {
                data: DataType::String(value),
                expiration,
            },
        );

        Ok(())
    }
}
