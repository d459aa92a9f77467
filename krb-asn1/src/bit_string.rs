use serde::{de, ser};
use std::fmt;

/// A bit string.
///
/// Bits are numbered from the most significant bit of the first payload byte, which is how
/// ASN.1 named bit lists (such as Kerberos flags) are laid out.
///
/// The first byte of the inner buffer holds the number of unused bits in the last payload byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitString {
    data: Vec<u8>,
}

impl BitString {
    /// Returns a zeroed bit string holding `num_bits` bits.
    pub fn with_len(num_bits: usize) -> BitString {
        let num_bytes = (num_bits + 7) / 8;
        let unused_bits = num_bytes * 8 - num_bits;

        let mut data = vec![0; num_bytes + 1];
        data[0] = unused_bits as u8;

        Self { data }
    }

    /// Builds a bit string using all the bits of `payload`.
    pub fn with_bytes<V: Into<Vec<u8>>>(payload: V) -> BitString {
        let mut data = vec![0x00];
        data.append(&mut payload.into());
        Self { data }
    }

    pub fn get_num_bits(&self) -> usize {
        (self.data.len() - 1) * 8 - self.data[0] as usize
    }

    /// Sets bit `i`. Returns `false` if `i` is out of range.
    pub fn set(&mut self, i: usize, val: bool) -> bool {
        if i >= self.get_num_bits() {
            return false;
        }

        let byte = &mut self.data[1 + i / 8];
        let mask = 0x80 >> (i % 8);
        if val {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }

        true
    }

    pub fn is_set(&self, i: usize) -> bool {
        if i >= self.get_num_bits() {
            return false;
        }

        self.data[1 + i / 8] & (0x80 >> (i % 8)) != 0
    }

    pub fn payload_view(&self) -> &[u8] {
        &self.data[1..]
    }

    pub fn into_payload(mut self) -> Vec<u8> {
        self.data.remove(0);
        self.data
    }
}

impl Default for BitString {
    fn default() -> Self {
        Self::with_len(0)
    }
}

impl ser::Serialize for BitString {
    fn serialize<S>(&self, serializer: S) -> Result<<S as ser::Serializer>::Ok, <S as ser::Serializer>::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_bytes(&self.data)
    }
}

impl<'de> de::Deserialize<'de> for BitString {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = BitString;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid buffer representing a bit string")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                self.visit_byte_buf(v.to_vec())
            }

            fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match v.first() {
                    Some(unused_bits) if *unused_bits <= 7 && (v.len() > 1 || *unused_bits == 0) => {
                        Ok(BitString { data: v })
                    }
                    _ => Err(E::invalid_value(
                        de::Unexpected::Bytes(&v),
                        &"a bit string with a valid unused bits count",
                    )),
                }
            }
        }

        deserializer.deserialize_byte_buf(Visitor)
    }
}
