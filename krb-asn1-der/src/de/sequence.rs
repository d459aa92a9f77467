use crate::de::Deserializer;
use crate::{Asn1DerError, Result};
use serde::de::{DeserializeSeed, SeqAccess};

/// Gives access to the elements of an open container, until its end is reached
pub struct Sequence<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> Sequence<'a, 'de> {
    pub fn new(de: &'a mut Deserializer<'de>) -> Self {
        Self { de }
    }
}

impl<'a, 'de> SeqAccess<'de> for Sequence<'a, 'de> {
    type Error = Asn1DerError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.de.h_is_exhausted() {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

/// Yields a [`TagPeeker`](krb_asn1::tag::TagPeeker) for the next object, then the object itself
///
/// Nothing is yielded when the current container is exhausted, which is how absent
/// trailing optional fields are detected.
pub struct TagPeek<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    yielded: u8,
}

impl<'a, 'de> TagPeek<'a, 'de> {
    pub fn new(de: &'a mut Deserializer<'de>) -> Self {
        Self { de, yielded: 0 }
    }
}

impl<'a, 'de> SeqAccess<'de> for TagPeek<'a, 'de> {
    type Error = Asn1DerError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.yielded >= 2 || self.de.h_is_exhausted() {
            return Ok(None);
        }
        self.yielded += 1;
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(2 - self.yielded as usize)
    }
}
