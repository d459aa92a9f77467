use crate::bit_string::BitString;
use crate::date::GeneralizedTime;
use crate::tag::Tag;
use crate::Asn1Type;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

macro_rules! asn1_wrapper_impls {
    ($wrapper:ident($inner:ty), $tag:expr) => {
        impl Asn1Type for $wrapper {
            const TAG: Tag = $tag;
            const NAME: &'static str = stringify!($wrapper);
        }

        impl From<$inner> for $wrapper {
            fn from(inner: $inner) -> Self {
                Self(inner)
            }
        }

        impl From<$wrapper> for $inner {
            fn from(wrapper: $wrapper) -> $inner {
                wrapper.0
            }
        }

        impl Deref for $wrapper {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $wrapper {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl PartialEq<$inner> for $wrapper {
            fn eq(&self, other: &$inner) -> bool {
                self.0.eq(other)
            }
        }
    };
}

macro_rules! define_bytes_wrapper {
    ($(#[$meta:meta])* $wrapper:ident, $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Clone, Hash, Default, PartialOrd, Ord)]
        pub struct $wrapper(pub Vec<u8>);

        asn1_wrapper_impls!($wrapper(Vec<u8>), $tag);

        impl Serialize for $wrapper {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_newtype_struct(Self::NAME, serde_bytes::Bytes::new(&self.0))
            }
        }

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct Visitor;

                impl<'de> de::Visitor<'de> for Visitor {
                    type Value = $wrapper;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(concat!("a valid ", stringify!($wrapper)))
                    }

                    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
                    where
                        D: Deserializer<'de>,
                    {
                        Ok($wrapper(serde_bytes::ByteBuf::deserialize(deserializer)?.into_vec()))
                    }
                }

                deserializer.deserialize_newtype_struct(Self::NAME, Visitor)
            }
        }
    };
}

macro_rules! define_wrapper {
    ($(#[$meta:meta])* $wrapper:ident($inner:ty), $tag:expr) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
        pub struct $wrapper(pub $inner);

        asn1_wrapper_impls!($wrapper($inner), $tag);

        impl Serialize for $wrapper {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_newtype_struct(Self::NAME, &self.0)
            }
        }

        impl<'de> Deserialize<'de> for $wrapper {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct Visitor;

                impl<'de> de::Visitor<'de> for Visitor {
                    type Value = $wrapper;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(concat!("a valid ", stringify!($wrapper)))
                    }

                    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
                    where
                        D: Deserializer<'de>,
                    {
                        Ok($wrapper(<$inner>::deserialize(deserializer)?))
                    }
                }

                deserializer.deserialize_newtype_struct(Self::NAME, Visitor)
            }
        }
    };
}

define_bytes_wrapper! {
    /// Big-endian two's complement integer content, kept in its minimal DER form.
    IntegerAsn1, Tag::INTEGER
}

define_bytes_wrapper! {
    OctetStringAsn1, Tag::OCTET_STRING
}

define_wrapper! {
    BitStringAsn1(BitString), Tag::BIT_STRING
}

define_wrapper! {
    /// Kerberos restricts GeneralString to IA5 characters, so the content is kept as a `String`.
    GeneralStringAsn1(String), Tag::GENERAL_STRING
}

define_wrapper! {
    GeneralizedTimeAsn1(GeneralizedTime), Tag::GENERALIZED_TIME
}

impl Default for BitStringAsn1 {
    fn default() -> Self {
        Self(BitString::default())
    }
}

impl From<&str> for GeneralStringAsn1 {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl IntegerAsn1 {
    /// Keeps `bytes` as is: they must already be a minimal two's complement encoding.
    pub fn from_bytes_be_signed(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encodes an unsigned big-endian magnitude, adding a leading zero when the high bit is set.
    pub fn from_bytes_be_unsigned(bytes: Vec<u8>) -> Self {
        let first_significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        let mut magnitude = bytes[first_significant..].to_vec();

        if magnitude.first().map_or(true, |b| b & 0x80 != 0) {
            magnitude.insert(0, 0x00);
        }

        Self(magnitude)
    }

    pub fn as_signed_bytes_be(&self) -> &[u8] {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.first().map_or(false, |b| b & 0x80 != 0)
    }

    /// Returns `None` when the value doesn't fit.
    pub fn to_i64(&self) -> Option<i64> {
        if self.0.is_empty() || self.0.len() > 8 {
            return None;
        }

        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - self.0.len()..].copy_from_slice(&self.0);

        Some(i64::from_be_bytes(buf))
    }

    pub fn to_i32(&self) -> Option<i32> {
        self.to_i64().and_then(|v| i32::try_from(v).ok())
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.to_i64().and_then(|v| u32::try_from(v).ok())
    }
}

impl From<i64> for IntegerAsn1 {
    fn from(value: i64) -> Self {
        let bytes = value.to_be_bytes();

        let mut start = 0;
        while start < bytes.len() - 1 {
            let redundant_zero = bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0;
            let redundant_ones = bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0;
            if !(redundant_zero || redundant_ones) {
                break;
            }
            start += 1;
        }

        Self(bytes[start..].to_vec())
    }
}

impl From<i32> for IntegerAsn1 {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<u32> for IntegerAsn1 {
    fn from(value: u32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<u8> for IntegerAsn1 {
    fn from(value: u8) -> Self {
        Self::from(i64::from(value))
    }
}

/// `SEQUENCE OF T`
#[derive(Debug, PartialEq, Eq, Clone, Hash, PartialOrd, Ord)]
pub struct Asn1SequenceOf<T>(pub Vec<T>);

impl<T> Asn1Type for Asn1SequenceOf<T> {
    const TAG: Tag = Tag::SEQUENCE;
    const NAME: &'static str = "Asn1SequenceOf";
}

impl<T> Default for Asn1SequenceOf<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for Asn1SequenceOf<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T> Deref for Asn1SequenceOf<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Asn1SequenceOf<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Serialize> Serialize for Asn1SequenceOf<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(Self::NAME, &self.0)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Asn1SequenceOf<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> de::Visitor<'de> for Visitor<T> {
            type Value = Asn1SequenceOf<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid Asn1SequenceOf")
            }

            fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Ok(Asn1SequenceOf(Vec::<T>::deserialize(deserializer)?))
            }
        }

        deserializer.deserialize_newtype_struct(Self::NAME, Visitor(PhantomData))
    }
}

const APPLICATION_TAG_NAMES: [&str; 31] = [
    "ApplicationTag0",
    "ApplicationTag1",
    "ApplicationTag2",
    "ApplicationTag3",
    "ApplicationTag4",
    "ApplicationTag5",
    "ApplicationTag6",
    "ApplicationTag7",
    "ApplicationTag8",
    "ApplicationTag9",
    "ApplicationTag10",
    "ApplicationTag11",
    "ApplicationTag12",
    "ApplicationTag13",
    "ApplicationTag14",
    "ApplicationTag15",
    "ApplicationTag16",
    "ApplicationTag17",
    "ApplicationTag18",
    "ApplicationTag19",
    "ApplicationTag20",
    "ApplicationTag21",
    "ApplicationTag22",
    "ApplicationTag23",
    "ApplicationTag24",
    "ApplicationTag25",
    "ApplicationTag26",
    "ApplicationTag27",
    "ApplicationTag28",
    "ApplicationTag29",
    "ApplicationTag30",
];

const CONTEXT_TAG_NAMES: [&str; 31] = [
    "ExplicitContextTag0",
    "ExplicitContextTag1",
    "ExplicitContextTag2",
    "ExplicitContextTag3",
    "ExplicitContextTag4",
    "ExplicitContextTag5",
    "ExplicitContextTag6",
    "ExplicitContextTag7",
    "ExplicitContextTag8",
    "ExplicitContextTag9",
    "ExplicitContextTag10",
    "ExplicitContextTag11",
    "ExplicitContextTag12",
    "ExplicitContextTag13",
    "ExplicitContextTag14",
    "ExplicitContextTag15",
    "ExplicitContextTag16",
    "ExplicitContextTag17",
    "ExplicitContextTag18",
    "ExplicitContextTag19",
    "ExplicitContextTag20",
    "ExplicitContextTag21",
    "ExplicitContextTag22",
    "ExplicitContextTag23",
    "ExplicitContextTag24",
    "ExplicitContextTag25",
    "ExplicitContextTag26",
    "ExplicitContextTag27",
    "ExplicitContextTag28",
    "ExplicitContextTag29",
    "ExplicitContextTag30",
];

/// Returns the tag written around the content of an encapsulating wrapper
/// ([`ApplicationTag`] or [`ExplicitContextTag`]) given its serde name.
pub fn encapsulator_tag(name: &str) -> Option<Tag> {
    if let Some(number) = APPLICATION_TAG_NAMES.iter().position(|n| *n == name) {
        return Some(Tag::application(number as u8));
    }

    CONTEXT_TAG_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|number| Tag::context_specific(number as u8))
}

macro_rules! define_encapsulating_wrapper {
    ($(#[$meta:meta])* $wrapper:ident, $names:ident, $tag_fn:path) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Clone, Hash, Default, PartialOrd, Ord)]
        pub struct $wrapper<T, const N: u8>(pub T);

        impl<T, const N: u8> Asn1Type for $wrapper<T, N> {
            const TAG: Tag = $tag_fn(N);
            const NAME: &'static str = $names[N as usize];
        }

        impl<T, const N: u8> $wrapper<T, N> {
            pub fn into_inner(self) -> T {
                self.0
            }
        }

        impl<T, const N: u8> From<T> for $wrapper<T, N> {
            fn from(inner: T) -> Self {
                Self(inner)
            }
        }

        impl<T, const N: u8> Deref for $wrapper<T, N> {
            type Target = T;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<T, const N: u8> DerefMut for $wrapper<T, N> {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl<T: Serialize, const N: u8> Serialize for $wrapper<T, N> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_newtype_struct(<Self as Asn1Type>::NAME, &self.0)
            }
        }

        impl<'de, T: Deserialize<'de>, const N: u8> Deserialize<'de> for $wrapper<T, N> {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                struct Visitor<T, const N: u8>(PhantomData<T>);

                impl<'de, T: Deserialize<'de>, const N: u8> de::Visitor<'de> for Visitor<T, N> {
                    type Value = $wrapper<T, N>;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        write!(formatter, "a valid {}", <$wrapper<T, N> as Asn1Type>::NAME)
                    }

                    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
                    where
                        D: Deserializer<'de>,
                    {
                        Ok($wrapper(T::deserialize(deserializer)?))
                    }
                }

                deserializer.deserialize_newtype_struct(<Self as Asn1Type>::NAME, Visitor::<T, N>(PhantomData))
            }
        }
    };
}

define_encapsulating_wrapper! {
    /// `[APPLICATION N]` around the DER encoding of `T`.
    ApplicationTag, APPLICATION_TAG_NAMES, Tag::application
}

define_encapsulating_wrapper! {
    /// `[N] EXPLICIT` around the DER encoding of `T`.
    ExplicitContextTag, CONTEXT_TAG_NAMES, Tag::context_specific
}

pub type ExplicitContextTag0<T> = ExplicitContextTag<T, 0>;
pub type ExplicitContextTag1<T> = ExplicitContextTag<T, 1>;
pub type ExplicitContextTag2<T> = ExplicitContextTag<T, 2>;
pub type ExplicitContextTag3<T> = ExplicitContextTag<T, 3>;
pub type ExplicitContextTag4<T> = ExplicitContextTag<T, 4>;
pub type ExplicitContextTag5<T> = ExplicitContextTag<T, 5>;
pub type ExplicitContextTag6<T> = ExplicitContextTag<T, 6>;
pub type ExplicitContextTag7<T> = ExplicitContextTag<T, 7>;
pub type ExplicitContextTag8<T> = ExplicitContextTag<T, 8>;

/// Marks an `OPTIONAL` field.
///
/// Must wrap an `Option<T>` where `T` knows its tag. Presence is decided by peeking the next tag,
/// so struct fields of this type should carry `#[serde(default)]` to accept a missing trailing
/// element.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Default, PartialOrd, Ord)]
pub struct Optional<T>(pub T);

impl<T> Optional<T> {
    pub const NAME: &'static str = "Optional";
}

impl<T> From<T> for Optional<T> {
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

impl<T> Deref for Optional<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Optional<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(Self::NAME, &self.0)
    }
}

impl<'de, T> Deserialize<'de> for Optional<Option<T>>
where
    T: Deserialize<'de> + Asn1Type,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor<T>(PhantomData<T>);

        impl<'de, T> de::Visitor<'de> for Visitor<T>
        where
            T: Deserialize<'de> + Asn1Type,
        {
            type Value = Optional<Option<T>>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an optional {}", T::NAME)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                match seq.next_element::<crate::tag::TagPeeker>()? {
                    Some(peeker) if peeker.next_tag == T::TAG => Ok(Optional(seq.next_element::<T>()?)),
                    _ => Ok(Optional(None)),
                }
            }
        }

        deserializer.deserialize_tuple_struct(Optional::<()>::NAME, 2, Visitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encapsulator_tag_lookup() {
        assert_eq!(encapsulator_tag("ApplicationTag14"), Some(Tag::application(14)));
        assert_eq!(encapsulator_tag("ExplicitContextTag3"), Some(Tag::context_specific(3)));
        assert_eq!(encapsulator_tag(IntegerAsn1::NAME), None);
        assert_eq!(<ApplicationTag<(), 30> as Asn1Type>::NAME, "ApplicationTag30");
        assert_eq!(<ExplicitContextTag4<()> as Asn1Type>::TAG, Tag::context_specific(4));
    }

    #[test]
    fn integer_minimal_form() {
        assert_eq!(IntegerAsn1::from(5_i32).0, vec![0x05]);
        assert_eq!(IntegerAsn1::from(0_i32).0, vec![0x00]);
        assert_eq!(IntegerAsn1::from(128_i32).0, vec![0x00, 0x80]);
        assert_eq!(IntegerAsn1::from(-1_i32).0, vec![0xFF]);
        assert_eq!(IntegerAsn1::from(-129_i32).0, vec![0xFF, 0x7F]);
        assert_eq!(IntegerAsn1::from(u32::MAX).0, vec![0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(IntegerAsn1::from(-138_i32).0, vec![0xFF, 0x76]);
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(IntegerAsn1::from(-138_i32).to_i32(), Some(-138));
        assert_eq!(IntegerAsn1::from(u32::MAX).to_u32(), Some(u32::MAX));
        assert_eq!(IntegerAsn1::from(u32::MAX).to_i32(), None);
        assert_eq!(IntegerAsn1::from(-1_i32).to_u32(), None);
        assert_eq!(IntegerAsn1(vec![]).to_i64(), None);
        assert_eq!(IntegerAsn1(vec![1; 9]).to_i64(), None);
    }

    #[test]
    fn integer_from_unsigned_bytes() {
        assert_eq!(IntegerAsn1::from_bytes_be_unsigned(vec![0x80]).0, vec![0x00, 0x80]);
        assert_eq!(IntegerAsn1::from_bytes_be_unsigned(vec![0x00, 0x00, 0x7F]).0, vec![0x7F]);
        assert_eq!(IntegerAsn1::from_bytes_be_unsigned(vec![]).0, vec![0x00]);
    }
}
