mod sequence;

use crate::misc::{check_primitive_content, Integer, Length};
use crate::ser::sequence::Sequence;
use crate::{Asn1DerError, Result};
use krb_asn1::tag::Tag;
use krb_asn1::wrapper::{
    encapsulator_tag, BitStringAsn1, GeneralStringAsn1, GeneralizedTimeAsn1, IntegerAsn1, OctetStringAsn1,
};
use krb_asn1::Asn1Type;
use serde::ser::Impossible;
use serde::Serialize;
use std::io::Write;

/// Serializes `value` into a new vector
pub fn to_vec<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    debug_log!("serialization using `to_vec`");
    let mut buf = Vec::new();
    to_byte_buf(value, &mut buf)?;
    Ok(buf)
}

/// Serializes `value` at the end of `buf` and returns the number of bytes written
pub fn to_byte_buf<T: ?Sized + Serialize>(value: &T, buf: &mut Vec<u8>) -> Result<usize> {
    debug_log!("serialization using `to_byte_buf`");
    let mut serializer = Serializer::new_to_byte_buf(buf);
    value.serialize(&mut serializer)
}

/// Serializes `value` to `writer` and returns the number of bytes written
pub fn to_writer<'w, T: ?Sized + Serialize, W: Write + 'w>(value: &T, writer: W) -> Result<usize> {
    debug_log!("serialization using `to_writer`");
    let mut serializer = Serializer::new_to_writer(writer);
    value.serialize(&mut serializer)
}

/// An ASN.1-DER serializer for `serde`
pub struct Serializer<'se> {
    writer: Box<dyn Write + 'se>,
    tag_for_next_object: Option<Tag>,
}

impl<'se> Serializer<'se> {
    /// Creates a new serializer that appends to `buf`
    pub fn new_to_byte_buf(buf: &'se mut Vec<u8>) -> Self {
        Self::new_to_writer(buf)
    }

    /// Creates a new serializer that writes to `writer`
    pub fn new_to_writer<W: Write + 'se>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            tag_for_next_object: None,
        }
    }

    /// Writes a complete TLV object and returns its encoded size
    pub(crate) fn h_write_object(&mut self, tag: Tag, content: &[u8]) -> Result<usize> {
        self.writer.write_all(&[tag.inner()])?;
        let len_size = Length::serialize(content.len(), &mut self.writer)?;
        self.writer.write_all(content)?;
        Ok(1 + len_size + content.len())
    }

    fn h_write_primitive(&mut self, default: Tag, content: &[u8]) -> Result<usize> {
        let tag = self.tag_for_next_object.take().unwrap_or(default);
        check_primitive_content(tag, content)?;
        self.h_write_object(tag, content)
    }

    fn h_write_unsigned(&mut self, value: u128) -> Result<usize> {
        self.tag_for_next_object = None;
        let content = Integer::serialize_unsigned(value);
        self.h_write_object(Tag::INTEGER, &content)
    }
}

impl<'a, 'se> serde::ser::Serializer for &'a mut Serializer<'se> {
    type Ok = usize;
    type Error = Asn1DerError;

    type SerializeSeq = Sequence<'a, 'se>;
    type SerializeTuple = Sequence<'a, 'se>;
    type SerializeTupleStruct = Sequence<'a, 'se>;
    type SerializeTupleVariant = Impossible<usize, Asn1DerError>;
    type SerializeMap = Impossible<usize, Asn1DerError>;
    type SerializeStruct = Sequence<'a, 'se>;
    type SerializeStructVariant = Impossible<usize, Asn1DerError>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        debug_log!("serialize_bool: {}", v);
        self.tag_for_next_object = None;
        self.h_write_object(Tag::BOOLEAN, &[if v { 0xFF } else { 0x00 }])
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok> {
        debug_log!("serialize_i8: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok> {
        debug_log!("serialize_i16: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok> {
        debug_log!("serialize_i32: UNSUPPORTED (use IntegerAsn1)");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        debug_log!("serialize_i64: UNSUPPORTED (use IntegerAsn1)");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        debug_log!("serialize_u8: {}", v);
        self.h_write_unsigned(u128::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        debug_log!("serialize_u16: {}", v);
        self.h_write_unsigned(u128::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        debug_log!("serialize_u32: {}", v);
        self.h_write_unsigned(u128::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        debug_log!("serialize_u64: {}", v);
        self.h_write_unsigned(u128::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        debug_log!("serialize_u128: {}", v);
        self.h_write_unsigned(v)
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        debug_log!("serialize_f32: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        debug_log!("serialize_f64: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        debug_log!("serialize_char: {}", v);
        let mut buf = [0; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        debug_log!("serialize_str: {}", v);
        self.h_write_primitive(Tag::UTF8_STRING, v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        debug_log!("serialize_bytes ({} bytes)", v.len());
        self.h_write_primitive(Tag::OCTET_STRING, v)
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        debug_log!("serialize_none");
        Ok(0)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
        debug_log!("serialize_some");
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        debug_log!("serialize_unit");
        self.tag_for_next_object = None;
        self.h_write_object(Tag::NULL, &[])
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        debug_log!("serialize_unit_struct: {}", _name);
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        debug_log!("serialize_unit_variant: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, name: &'static str, value: &T) -> Result<Self::Ok> {
        debug_log!("serialize_newtype_struct: {}", name);

        if let Some(tag) = encapsulator_tag(name) {
            let mut content = Vec::new();
            value.serialize(&mut Serializer::new_to_byte_buf(&mut content))?;
            debug_log!("< {} ({} bytes)", tag, content.len());
            return self.h_write_object(tag, &content);
        }

        match name {
            IntegerAsn1::NAME => self.tag_for_next_object = Some(Tag::INTEGER),
            BitStringAsn1::NAME => self.tag_for_next_object = Some(Tag::BIT_STRING),
            OctetStringAsn1::NAME => self.tag_for_next_object = Some(Tag::OCTET_STRING),
            GeneralStringAsn1::NAME => self.tag_for_next_object = Some(Tag::GENERAL_STRING),
            GeneralizedTimeAsn1::NAME => self.tag_for_next_object = Some(Tag::GENERALIZED_TIME),
            _ => {}
        }

        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        debug_log!("serialize_newtype_variant: UNSUPPORTED (serialize the selected alternative directly)");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        debug_log!("serialize_seq");
        Ok(Sequence::new(self, Tag::SEQUENCE))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        debug_log!("serialize_tuple");
        Ok(Sequence::new(self, Tag::SEQUENCE))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        debug_log!("serialize_tuple_struct: {}", _name);
        Ok(Sequence::new(self, Tag::SEQUENCE))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        debug_log!("serialize_tuple_variant: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        debug_log!("serialize_map: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        debug_log!("serialize_struct: {}", _name);
        Ok(Sequence::new(self, Tag::SEQUENCE))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        debug_log!("serialize_struct_variant: UNSUPPORTED");
        Err(Asn1DerError::UnsupportedType)
    }

    fn is_human_readable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krb_asn1::wrapper::{ApplicationTag, ExplicitContextTag0, ExplicitContextTag1, Optional};

    #[derive(Serialize)]
    struct Pair {
        a: ExplicitContextTag0<IntegerAsn1>,
        b: Optional<Option<ExplicitContextTag1<OctetStringAsn1>>>,
    }

    #[test]
    fn absent_optional_is_omitted() {
        let pair = Pair {
            a: IntegerAsn1::from(7u8).into(),
            b: Optional(None),
        };
        assert_eq!(to_vec(&pair).unwrap(), b"\x30\x05\xA0\x03\x02\x01\x07");
    }

    #[test]
    fn application_tag_wraps_content() {
        let value: ApplicationTag<OctetStringAsn1, 14> = OctetStringAsn1(vec![0xCA, 0xFE]).into();
        assert_eq!(to_vec(&value).unwrap(), b"\x6E\x04\x04\x02\xCA\xFE");
    }

    #[test]
    fn long_form_length() {
        let value = OctetStringAsn1(vec![0xAB; 200]);
        let encoded = to_vec(&value).unwrap();
        assert_eq!(&encoded[..3], b"\x04\x81\xC8");
        assert_eq!(encoded.len(), 203);
    }

    #[test]
    fn non_minimal_integer_is_refused() {
        let value = IntegerAsn1(vec![0x00, 0x05]);
        assert!(matches!(to_vec(&value), Err(Asn1DerError::InvalidData)));
    }

    #[test]
    fn to_byte_buf_appends() {
        let mut buf = vec![0xFF];
        let written = to_byte_buf(&true, &mut buf).unwrap();
        assert_eq!(written, 3);
        assert_eq!(buf, b"\xFF\x01\x01\xFF");
    }
}
