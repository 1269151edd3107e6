use crate::rdb::RdbError;

#[derive(Debug, PartialEq)]
enum ValueEncoding {
    Length(usize),
    Int8,
    Int16,
    Int32,
    LzfCompressedString,
}

/// Cursor over the raw bytes of a snapshot.
#[derive(Debug)]
pub struct RdbReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> RdbReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], RdbError> {
        let end = self
            .cursor
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(RdbError::UnexpectedEof(self.cursor))?;

        let slice = &self.bytes[self.cursor..end];
        self.cursor = end;

        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, RdbError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], RdbError> {
        let slice = self.take(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(slice);

        Ok(array)
    }

    fn read_encoding(&mut self) -> Result<ValueEncoding, RdbError> {
        let byte = self.read_u8()?;

        // The two most significant bits select the encoding.
        match byte >> 6 {
            0b00 => Ok(ValueEncoding::Length((byte & 0b0011_1111) as usize)),
            0b01 => {
                let low = self.read_u8()? as usize;
                let high = (byte & 0b0011_1111) as usize;

                Ok(ValueEncoding::Length((high << 8) | low))
            }
            0b10 => match byte {
                0x80 => Ok(ValueEncoding::Length(
                    u32::from_be_bytes(self.read_array()?) as usize,
                )),
                0x81 => {
                    let length = u64::from_be_bytes(self.read_array()?);
                    let length = usize::try_from(length)
                        .map_err(|_| RdbError::InvalidLengthEncoding(byte))?;

                    Ok(ValueEncoding::Length(length))
                }
                _ => Err(RdbError::InvalidLengthEncoding(byte)),
            },
            _ => match byte & 0b0011_1111 {
                0 => Ok(ValueEncoding::Int8),
                1 => Ok(ValueEncoding::Int16),
                2 => Ok(ValueEncoding::Int32),
                3 => Ok(ValueEncoding::LzfCompressedString),
                _ => Err(RdbError::InvalidLengthEncoding(byte)),
            },
        }
    }

    /// Reads a length, as used by the resize and database selector sections.
    pub fn read_length(&mut self) -> Result<usize, RdbError> {
        let position = self.cursor;

        match self.read_encoding()? {
            ValueEncoding::Length(length) => Ok(length),
            _ => Err(RdbError::InvalidLengthEncoding(self.bytes[position])),
        }
    }

    /// Reads a string, which may be stored as raw bytes or as an integer.
    pub fn read_string(&mut self) -> Result<String, RdbError> {
        match self.read_encoding()? {
            ValueEncoding::Length(length) => {
                let bytes = self.take(length)?;

                String::from_utf8(bytes.to_vec()).map_err(|_| RdbError::InvalidUtf8)
            }
            ValueEncoding::Int8 => Ok((self.read_u8()? as i8).to_string()),
            ValueEncoding::Int16 => Ok(i16::from_le_bytes(self.read_array()?).to_string()),
            ValueEncoding::Int32 => Ok(i32::from_le_bytes(self.read_array()?).to_string()),
            ValueEncoding::LzfCompressedString => Err(RdbError::UnsupportedEncoding),
        }
    }
}
