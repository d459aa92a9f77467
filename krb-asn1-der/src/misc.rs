use crate::{Asn1DerError, Result};
use krb_asn1::tag::Tag;
use std::io::Write;

const LONG_FORM: u8 = 0x80;

/// DER definite length
pub struct Length;

impl Length {
    /// Reads the length starting at `data[*pos]` and advances `pos` past it
    pub fn deserialize(data: &[u8], pos: &mut usize) -> Result<usize> {
        let first = *data.get(*pos).ok_or(Asn1DerError::TruncatedData)?;
        *pos += 1;

        if first & LONG_FORM == 0 {
            return Ok(first as usize);
        }

        let num_bytes = (first & !LONG_FORM) as usize;
        if num_bytes == 0 {
            debug_log!("length: INVALID (indefinite form)");
            return Err(Asn1DerError::InvalidLength);
        }
        if num_bytes > std::mem::size_of::<usize>() {
            debug_log!("length: UNSUPPORTED ({} length bytes)", num_bytes);
            return Err(Asn1DerError::UnsupportedValue);
        }

        let bytes = data.get(*pos..*pos + num_bytes).ok_or(Asn1DerError::TruncatedData)?;
        *pos += num_bytes;

        if bytes[0] == 0 {
            debug_log!("length: INVALID (leading zero)");
            return Err(Asn1DerError::InvalidLength);
        }

        let len = bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
        if len < LONG_FORM as usize {
            debug_log!("length: INVALID (long form used for {})", len);
            return Err(Asn1DerError::InvalidLength);
        }

        Ok(len)
    }

    /// Writes `len` and returns the amount of bytes written
    pub fn serialize<W: Write + ?Sized>(len: usize, writer: &mut W) -> Result<usize> {
        if len < LONG_FORM as usize {
            writer.write_all(&[len as u8])?;
            return Ok(1);
        }

        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        let significant = &bytes[skip..];

        writer.write_all(&[LONG_FORM | significant.len() as u8])?;
        writer.write_all(significant)?;

        Ok(1 + significant.len())
    }

    /// Returns how many bytes `len` takes once encoded
    pub fn encoded_len(len: usize) -> usize {
        if len < LONG_FORM as usize {
            1
        } else {
            1 + std::mem::size_of::<usize>() - (len.leading_zeros() as usize / 8)
        }
    }
}

/// DER INTEGER content helpers
pub struct Integer;

impl Integer {
    /// Checks that `content` is a minimal two's complement encoding
    pub fn validate(content: &[u8]) -> Result<()> {
        match content {
            [] => Err(Asn1DerError::InvalidData),
            [0x00, next, ..] if next & 0x80 == 0 => Err(Asn1DerError::InvalidData),
            [0xFF, next, ..] if next & 0x80 != 0 => Err(Asn1DerError::InvalidData),
            _ => Ok(()),
        }
    }

    pub fn deserialize_unsigned(content: &[u8]) -> Result<u128> {
        Self::validate(content)?;

        if content[0] & 0x80 != 0 {
            debug_log!("integer: UNSUPPORTED (negative value for an unsigned type)");
            return Err(Asn1DerError::UnsupportedValue);
        }

        let magnitude = if content[0] == 0 { &content[1..] } else { content };
        if magnitude.len() > std::mem::size_of::<u128>() {
            return Err(Asn1DerError::UnsupportedValue);
        }

        Ok(magnitude.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128))
    }

    pub fn serialize_unsigned(value: u128) -> Vec<u8> {
        let bytes = value.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count().min(bytes.len() - 1);

        let mut content = bytes[skip..].to_vec();
        if content[0] & 0x80 != 0 {
            content.insert(0, 0x00);
        }

        content
    }
}

/// Checks the content of a primitive value against the DER rules of its tag
pub fn check_primitive_content(tag: Tag, content: &[u8]) -> Result<()> {
    match tag {
        Tag::INTEGER => Integer::validate(content),
        Tag::BIT_STRING => match content.split_first() {
            Some((0, _)) => Ok(()),
            Some((unused_bits, [.., last])) if *unused_bits <= 7 && last & ((1u8 << unused_bits) - 1) == 0 => Ok(()),
            _ => {
                debug_log!("bit string: INVALID (bad unused bits)");
                Err(Asn1DerError::InvalidData)
            }
        },
        Tag::BOOLEAN => match content {
            [0x00] | [0xFF] => Ok(()),
            _ => Err(Asn1DerError::InvalidData),
        },
        Tag::NULL if !content.is_empty() => Err(Asn1DerError::InvalidData),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_round_trip() {
        for len in [0usize, 1, 127, 128, 255, 256, 65_535, 65_536] {
            let mut buf = Vec::new();
            let written = Length::serialize(len, &mut buf).unwrap();
            assert_eq!(written, buf.len());
            assert_eq!(written, Length::encoded_len(len));

            let mut pos = 0;
            assert_eq!(Length::deserialize(&buf, &mut pos).unwrap(), len);
            assert_eq!(pos, buf.len());
        }
    }

    #[test]
    fn length_rejects_non_minimal_forms() {
        let mut pos = 0;
        assert!(matches!(Length::deserialize(&[0x80], &mut pos), Err(Asn1DerError::InvalidLength)));

        let mut pos = 0;
        assert!(matches!(Length::deserialize(&[0x81, 0x05], &mut pos), Err(Asn1DerError::InvalidLength)));

        let mut pos = 0;
        assert!(matches!(Length::deserialize(&[0x82, 0x00, 0x90], &mut pos), Err(Asn1DerError::InvalidLength)));

        let mut pos = 0;
        assert!(matches!(Length::deserialize(&[0x82, 0x01], &mut pos), Err(Asn1DerError::TruncatedData)));
    }

    #[test]
    fn integer_rules() {
        assert!(Integer::validate(&[0x00]).is_ok());
        assert!(Integer::validate(&[0x00, 0x80]).is_ok());
        assert!(Integer::validate(&[0xFF, 0x7F]).is_ok());
        assert!(Integer::validate(&[]).is_err());
        assert!(Integer::validate(&[0x00, 0x05]).is_err());
        assert!(Integer::validate(&[0xFF, 0xFF]).is_err());

        assert_eq!(Integer::serialize_unsigned(0), vec![0x00]);
        assert_eq!(Integer::serialize_unsigned(0x80), vec![0x00, 0x80]);
        assert_eq!(Integer::deserialize_unsigned(&[0x00, 0x80]).unwrap(), 0x80);
        assert!(matches!(Integer::deserialize_unsigned(&[0x80]), Err(Asn1DerError::UnsupportedValue)));
    }

    #[test]
    fn bit_string_rules() {
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x00]).is_ok());
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x00, 0x40, 0x00, 0x00, 0x00]).is_ok());
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x04, 0xF0]).is_ok());
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x04, 0xF8]).is_err());
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x08, 0x00]).is_err());
        assert!(check_primitive_content(Tag::BIT_STRING, &[0x01]).is_err());
        assert!(check_primitive_content(Tag::BIT_STRING, &[]).is_err());
    }
}
