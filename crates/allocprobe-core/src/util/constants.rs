/// One mebibyte (1,048,576 bytes)
pub const MB: usize = 1 << 20;

/// Byte written into every position of the buffer during the fill phase
pub const FILL_BYTE: u8 = b'w';
