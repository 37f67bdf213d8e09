//! Encoders for the ECMA-335 compressed integer formats read by [`super::Parser`].

use crate::Result;

/// Largest value representable by the compressed unsigned encoding.
pub const MAX_COMPRESSED_UINT: u32 = 0x1FFF_FFFF;

/// Appends `value` to `buffer` in compressed unsigned form (1, 2 or 4 bytes).
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if `value` exceeds [`MAX_COMPRESSED_UINT`].
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) -> Result<()> {
    match value {
        0..=0x7F => buffer.push(value as u8),
        0x80..=0x3FFF => {
            buffer.push(0x80 | (value >> 8) as u8);
            buffer.push(value as u8);
        }
        0x4000..=MAX_COMPRESSED_UINT => {
            buffer.push(0xC0 | (value >> 24) as u8);
            buffer.push((value >> 16) as u8);
            buffer.push((value >> 8) as u8);
            buffer.push(value as u8);
        }
        _ => {
            return Err(malformed_error!(
                "Value too large for compressed uint - {}",
                value
            ))
        }
    }

    Ok(())
}

/// Appends `value` to `buffer` in the signed form decoded by
/// [`super::Parser::read_compressed_int`].
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the magnitude does not fit the encoding.
pub fn write_compressed_int(value: i32, buffer: &mut Vec<u8>) -> Result<()> {
    let encoded = if value >= 0 {
        u64::from(value.unsigned_abs()) << 1
    } else {
        (u64::from(value.unsigned_abs() - 1) << 1) | 1
    };

    match u32::try_from(encoded) {
        Ok(encoded) if encoded <= MAX_COMPRESSED_UINT => write_compressed_uint(encoded, buffer),
        _ => Err(malformed_error!(
            "Value out of range for compressed int - {}",
            value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Parser;

    #[test]
    fn uint_sizes() {
        let cases: [(u32, &[u8]); 5] = [
            (0x03, &[0x03]),
            (0x80, &[0x80, 0x80]),
            (0x2E57, &[0xAE, 0x57]),
            (0x4000, &[0xC0, 0x00, 0x40, 0x00]),
            (0xFE_EFEE, &[0xC0, 0xFE, 0xEF, 0xEE]),
        ];

        for (value, expected) in cases {
            let mut buffer = Vec::new();
            write_compressed_uint(value, &mut buffer).unwrap();
            assert_eq!(buffer, expected, "value 0x{value:X}");
        }
    }

    #[test]
    fn uint_too_large() {
        let mut buffer = Vec::new();
        let result = write_compressed_uint(MAX_COMPRESSED_UINT + 1, &mut buffer);
        assert!(result.is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn int_matches_parser() {
        let mut buffer = Vec::new();
        for value in [0, 1, -1, 10, -5, 8191, -8192, 0xFE_EFEE, -0xFE_EFEE] {
            write_compressed_int(value, &mut buffer).unwrap();
        }

        let mut parser = Parser::new(&buffer);
        for value in [0, 1, -1, 10, -5, 8191, -8192, 0xFE_EFEE, -0xFE_EFEE] {
            assert_eq!(parser.read_compressed_int().unwrap(), value);
        }
        assert!(!parser.has_more_data());
    }

    #[test]
    fn int_out_of_range() {
        let mut buffer = Vec::new();
        assert!(write_compressed_int(i32::MAX, &mut buffer).is_err());
        assert!(write_compressed_int(i32::MIN, &mut buffer).is_err());
    }
}
