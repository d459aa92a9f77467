use crate::ser::Serializer;
use crate::{Asn1DerError, Result};
use krb_asn1::tag::Tag;
use serde::ser::{SerializeSeq, SerializeStruct, SerializeTuple, SerializeTupleStruct};
use serde::Serialize;

/// Buffers the encoded elements so the container length is known before writing its header
pub struct Sequence<'a, 'se> {
    ser: &'a mut Serializer<'se>,
    tag: Tag,
    buf: Vec<u8>,
}

impl<'a, 'se> Sequence<'a, 'se> {
    pub fn new(ser: &'a mut Serializer<'se>, tag: Tag) -> Self {
        ser.tag_for_next_object = None;
        Self {
            ser,
            tag,
            buf: Vec::new(),
        }
    }

    fn h_push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut Serializer::new_to_byte_buf(&mut self.buf))?;
        Ok(())
    }

    fn h_finish(self) -> Result<usize> {
        self.ser.h_write_object(self.tag, &self.buf)
    }
}

impl<'a, 'se> SerializeSeq for Sequence<'a, 'se> {
    type Ok = usize;
    type Error = Asn1DerError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.h_push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.h_finish()
    }
}

impl<'a, 'se> SerializeTuple for Sequence<'a, 'se> {
    type Ok = usize;
    type Error = Asn1DerError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.h_push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.h_finish()
    }
}

impl<'a, 'se> SerializeTupleStruct for Sequence<'a, 'se> {
    type Ok = usize;
    type Error = Asn1DerError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.h_push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.h_finish()
    }
}

impl<'a, 'se> SerializeStruct for Sequence<'a, 'se> {
    type Ok = usize;
    type Error = Asn1DerError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        debug_log!("field: {}", _key);
        self.h_push(value)
    }

    fn end(self) -> Result<Self::Ok> {
        self.h_finish()
    }
}
