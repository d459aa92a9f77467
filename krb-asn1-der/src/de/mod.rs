mod sequence;

use crate::de::sequence::{Sequence, TagPeek};
use crate::misc::{check_primitive_content, Integer, Length};
use crate::{Asn1DerError, Result};
use krb_asn1::tag::Tag;
use krb_asn1::wrapper::{
    encapsulator_tag, BitStringAsn1, GeneralStringAsn1, GeneralizedTimeAsn1, IntegerAsn1, OctetStringAsn1, Optional,
};
use krb_asn1::Asn1Type;
use serde::de::Visitor;
use serde::Deserialize;

/// Deserializes `T` from `bytes`
///
/// Fails with [`Asn1DerError::TrailingData`] if any byte remains after the value.
pub fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    debug_log!("deserialization using `from_bytes`");
    let mut deserializer = Deserializer::new_from_bytes(bytes);
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// An ASN.1-DER deserializer for `serde`
pub struct Deserializer<'de> {
    data: &'de [u8],
    pos: usize,
    container_ends: Vec<usize>,
    tag_for_next_object: Option<Tag>,
}

impl<'de> Deserializer<'de> {
    /// Creates a new deserializer over `bytes`
    pub fn new_from_bytes(bytes: &'de [u8]) -> Self {
        Self {
            data: bytes,
            pos: 0,
            container_ends: Vec::with_capacity(8),
            tag_for_next_object: None,
        }
    }

    /// Checks that the whole input has been consumed
    pub fn end(&self) -> Result<()> {
        if self.pos != self.data.len() {
            debug_log!("end: TRAILING DATA ({} bytes left)", self.data.len() - self.pos);
            return Err(Asn1DerError::TrailingData);
        }
        Ok(())
    }

    /// End of the innermost open container (or of the input)
    fn h_limit(&self) -> usize {
        self.container_ends.last().copied().unwrap_or(self.data.len())
    }

    fn h_is_exhausted(&self) -> bool {
        self.pos >= self.h_limit()
    }

    fn h_peek_tag(&self) -> Result<Tag> {
        if self.h_is_exhausted() {
            debug_log!("peek: TRUNCATED DATA (no tag left)");
            return Err(Asn1DerError::TruncatedData);
        }
        Ok(Tag::from(self.data[self.pos]))
    }

    /// Reads the tag and length of the next object, leaving `pos` at the start of its content
    fn h_next_tag_len(&mut self) -> Result<(Tag, usize)> {
        let limit = self.h_limit();
        let tag = self.h_peek_tag()?;

        let mut pos = self.pos + 1;
        let len = Length::deserialize(&self.data[..limit], &mut pos)?;
        if limit - pos < len {
            debug_log!("{}: TRUNCATED DATA (length {} exceeds {} available bytes)", tag, len, limit - pos);
            return Err(Asn1DerError::TruncatedData);
        }

        self.pos = pos;
        Ok((tag, len))
    }

    /// Reads the next object, checks its tag and returns its content
    fn h_next_object(&mut self, expected: Tag) -> Result<&'de [u8]> {
        let (tag, len) = self.h_next_tag_len()?;
        if tag != expected {
            debug_log!("next_object: INVALID (found {}, expected {})", tag, expected);
            return Err(Asn1DerError::InvalidData);
        }

        let data = self.data;
        let content = &data[self.pos..self.pos + len];
        self.pos += len;

        check_primitive_content(tag, content)?;

        Ok(content)
    }

    fn h_open_container(&mut self, expected: Tag) -> Result<()> {
        let (tag, len) = self.h_next_tag_len()?;
        if tag != expected {
            debug_log!("open_container: INVALID (found {}, expected {})", tag, expected);
            return Err(Asn1DerError::InvalidData);
        }

        debug_log!("> {} ({} bytes)", tag, len);
        self.container_ends.push(self.pos + len);
        Ok(())
    }

    fn h_close_container(&mut self) -> Result<()> {
        let end = self.container_ends.pop().ok_or(Asn1DerError::InvalidData)?;
        if self.pos != end {
            debug_log!("close_container: TRAILING DATA ({} bytes left)", end - self.pos);
            return Err(Asn1DerError::TrailingData);
        }
        Ok(())
    }

    fn h_take_tag(&mut self, default: Tag) -> Tag {
        self.tag_for_next_object.take().unwrap_or(default)
    }

    fn h_next_unsigned(&mut self) -> Result<u128> {
        self.tag_for_next_object = None;
        let content = self.h_next_object(Tag::INTEGER)?;
        Integer::deserialize_unsigned(content)
    }
}

impl<'de, 'a> serde::de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Asn1DerError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_any");
        match self.h_peek_tag()? {
            Tag::BOOLEAN => self.deserialize_bool(visitor),
            Tag::INTEGER => self.deserialize_u128(visitor),
            Tag::NULL => self.deserialize_unit(visitor),
            Tag::OCTET_STRING => self.deserialize_byte_buf(visitor),
            Tag::SEQUENCE => self.deserialize_seq(visitor),
            Tag::UTF8_STRING => self.deserialize_string(visitor),
            tag @ (Tag::BIT_STRING | Tag::GENERALIZED_TIME) => {
                self.tag_for_next_object = Some(tag);
                self.deserialize_byte_buf(visitor)
            }
            Tag::GENERAL_STRING => {
                self.tag_for_next_object = Some(Tag::GENERAL_STRING);
                self.deserialize_string(visitor)
            }
            tag if tag.is_constructed() && (tag.is_application() || tag.is_context_specific()) => {
                self.h_open_container(tag)?;
                let value = visitor.visit_newtype_struct(&mut *self)?;
                self.h_close_container()?;
                Ok(value)
            }
            _tag => {
                debug_log!("deserialize_any: INVALID (found {})", _tag);
                Err(Asn1DerError::InvalidData)
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_bool");
        let content = self.h_next_object(Tag::BOOLEAN)?;
        visitor.visit_bool(content[0] != 0)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_i8: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_i16: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_i32: UNSUPPORTED (use IntegerAsn1)");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_i64: UNSUPPORTED (use IntegerAsn1)");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_u8");
        let value = self.h_next_unsigned()?;
        visitor.visit_u8(u8::try_from(value).map_err(|_| Asn1DerError::UnsupportedValue)?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_u16");
        let value = self.h_next_unsigned()?;
        visitor.visit_u16(u16::try_from(value).map_err(|_| Asn1DerError::UnsupportedValue)?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_u32");
        let value = self.h_next_unsigned()?;
        visitor.visit_u32(u32::try_from(value).map_err(|_| Asn1DerError::UnsupportedValue)?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_u64");
        let value = self.h_next_unsigned()?;
        visitor.visit_u64(u64::try_from(value).map_err(|_| Asn1DerError::UnsupportedValue)?)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_u128");
        visitor.visit_u128(self.h_next_unsigned()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_f32: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_f64: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_char");
        let tag = self.h_take_tag(Tag::UTF8_STRING);
        let content = self.h_next_object(tag)?;
        let s = std::str::from_utf8(content).map_err(|_| Asn1DerError::InvalidData)?;

        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Asn1DerError::UnsupportedValue),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_str");
        let tag = self.h_take_tag(Tag::UTF8_STRING);
        let content = self.h_next_object(tag)?;
        visitor.visit_borrowed_str(std::str::from_utf8(content).map_err(|_| Asn1DerError::InvalidData)?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_string");
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_bytes");
        let tag = self.h_take_tag(Tag::OCTET_STRING);
        let content = self.h_next_object(tag)?;
        visitor.visit_borrowed_bytes(content)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_byte_buf");
        let tag = self.h_take_tag(Tag::OCTET_STRING);
        let content = self.h_next_object(tag)?;
        visitor.visit_byte_buf(content.to_vec())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_option");
        if self.h_is_exhausted() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_unit");
        self.h_next_object(Tag::NULL)?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_unit_struct: {}", _name);
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, name: &'static str, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_newtype_struct: {}", name);

        if let Some(tag) = encapsulator_tag(name) {
            self.h_open_container(tag)?;
            let value = visitor.visit_newtype_struct(&mut *self)?;
            self.h_close_container()?;
            return Ok(value);
        }

        match name {
            IntegerAsn1::NAME => self.tag_for_next_object = Some(Tag::INTEGER),
            BitStringAsn1::NAME => self.tag_for_next_object = Some(Tag::BIT_STRING),
            OctetStringAsn1::NAME => self.tag_for_next_object = Some(Tag::OCTET_STRING),
            GeneralStringAsn1::NAME => self.tag_for_next_object = Some(Tag::GENERAL_STRING),
            GeneralizedTimeAsn1::NAME => self.tag_for_next_object = Some(Tag::GENERALIZED_TIME),
            _ => {}
        }

        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_seq");
        self.h_open_container(Tag::SEQUENCE)?;
        let value = visitor.visit_seq(Sequence::new(&mut *self))?;
        self.h_close_container()?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_tuple: {}", _len);
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        debug_log!("deserialize_tuple_struct: {}({})", name, _len);
        if name == Optional::<()>::NAME {
            return visitor.visit_seq(TagPeek::new(self));
        }
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_map: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        debug_log!("deserialize_struct: {}", _name);
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        debug_log!("deserialize_enum: {} as choice", _name);
        visitor.visit_seq(TagPeek::new(self))
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_identifier: peek next tag id");
        let tag = self.h_peek_tag()?;
        debug_log!("next tag id: {}", tag);
        visitor.visit_u8(tag.inner())
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        debug_log!("deserialize_ignored_any");
        let (_, len) = self.h_next_tag_len()?;
        self.pos += len;
        visitor.visit_unit()
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krb_asn1::wrapper::{ExplicitContextTag0, ExplicitContextTag1};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Pair {
        a: ExplicitContextTag0<IntegerAsn1>,
        #[serde(default)]
        b: Optional<Option<ExplicitContextTag1<OctetStringAsn1>>>,
    }

    #[test]
    fn optional_field_absent_at_end() {
        let pair: Pair = from_bytes(b"\x30\x05\xA0\x03\x02\x01\x07").unwrap();
        assert_eq!(pair.a.0 .0, vec![0x07]);
        assert_eq!(pair.b.0, None);
    }

    #[test]
    fn optional_field_present() {
        let pair: Pair = from_bytes(b"\x30\x0B\xA0\x03\x02\x01\x07\xA1\x04\x04\x02\xCA\xFE").unwrap();
        assert_eq!(pair.b.0.unwrap().0 .0, vec![0xCA, 0xFE]);
    }

    #[test]
    fn unknown_field_is_trailing_data() {
        let res = from_bytes::<Pair>(b"\x30\x0A\xA0\x03\x02\x01\x07\xA2\x03\x02\x01\x01");
        assert!(matches!(res, Err(Asn1DerError::TrailingData)), "{:?}", res);
    }

    #[test]
    fn trailing_byte_inside_context_tag() {
        let res = from_bytes::<Pair>(b"\x30\x06\xA0\x04\x02\x01\x07\x00");
        assert!(matches!(res, Err(Asn1DerError::TrailingData)), "{:?}", res);
    }

    #[test]
    fn content_length_exceeding_container_is_truncated() {
        let res = from_bytes::<Pair>(b"\x30\x05\xA0\x03\x02\x02\x07\x00");
        assert!(matches!(res, Err(Asn1DerError::TruncatedData)), "{:?}", res);
    }
}
