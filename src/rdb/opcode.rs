pub const MAGIC_STRING: &[u8] = b"REDIS";
pub const VERSION_LENGTH: usize = 4;

pub const METADATA_OPCODE: u8 = 0xFA;
pub const RESIZE_DB_OPCODE: u8 = 0xFB;
pub const EXPIRATION_MILLISECONDS_OPCODE: u8 = 0xFC;
pub const EXPIRATION_SECONDS_OPCODE: u8 = 0xFD;
pub const DATABASE_OPCODE: u8 = 0xFE;
pub const END_OF_FILE_OPCODE: u8 = 0xFF;

pub const STRING_VALUE_TYPE: u8 = 0x00;

pub const CHECKSUM_LENGTH: usize = 8;
