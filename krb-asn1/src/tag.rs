use serde::de;
use std::fmt;

const CLASS_MASK: u8 = 0xC0;
const CONSTRUCTED: u8 = 0x20;
const NUMBER_MASK: u8 = 0x1F;

const CLASS_UNIVERSAL: u8 = 0x00;
const CLASS_APPLICATION: u8 = 0x40;
const CLASS_CONTEXT_SPECIFIC: u8 = 0x80;

/// Single-byte DER identifier octet.
///
/// Only tag numbers from 0 to 30 are representable, which covers every tag used by Kerberos.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Tag(u8);

impl Tag {
    pub const BOOLEAN: Self = Tag(0x01);
    pub const INTEGER: Self = Tag(0x02);
    pub const BIT_STRING: Self = Tag(0x03);
    pub const OCTET_STRING: Self = Tag(0x04);
    pub const NULL: Self = Tag(0x05);
    pub const UTF8_STRING: Self = Tag(0x0C);
    pub const IA5_STRING: Self = Tag(0x16);
    pub const GENERALIZED_TIME: Self = Tag(0x18);
    pub const GENERAL_STRING: Self = Tag(0x1B);
    pub const SEQUENCE: Self = Tag(0x30);

    /// Constructed application tag (`[APPLICATION number]`).
    #[inline]
    pub const fn application(number: u8) -> Self {
        Tag(CLASS_APPLICATION | CONSTRUCTED | (number & NUMBER_MASK))
    }

    /// Constructed context-specific tag, as used by explicit tagging (`[number] EXPLICIT`).
    #[inline]
    pub const fn context_specific(number: u8) -> Self {
        Tag(CLASS_CONTEXT_SPECIFIC | CONSTRUCTED | (number & NUMBER_MASK))
    }

    #[inline]
    pub const fn inner(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn number(self) -> u8 {
        self.0 & NUMBER_MASK
    }

    #[inline]
    pub const fn is_constructed(self) -> bool {
        self.0 & CONSTRUCTED == CONSTRUCTED
    }

    #[inline]
    pub const fn is_universal(self) -> bool {
        self.0 & CLASS_MASK == CLASS_UNIVERSAL
    }

    #[inline]
    pub const fn is_application(self) -> bool {
        self.0 & CLASS_MASK == CLASS_APPLICATION
    }

    #[inline]
    pub const fn is_context_specific(self) -> bool {
        self.0 & CLASS_MASK == CLASS_CONTEXT_SPECIFIC
    }
}

impl From<u8> for Tag {
    fn from(tag: u8) -> Self {
        Self(tag)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            tag if tag.is_application() && tag.is_constructed() => write!(f, "[APPLICATION {}]", tag.number()),
            tag if tag.is_context_specific() && tag.is_constructed() => write!(f, "[{}]", tag.number()),
            unknown => write!(f, "UNKNOWN({})", unknown.0),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({}[{:#04x}])", self, self.0)
    }
}

/// Used to peek next tag by using `Deserializer::deserialize_identifier`.
///
/// Can be used to implement ASN.1 Choice.
///
/// # Examples
/// ```
/// use serde::de;
/// use krb_asn1::{
///     wrapper::{GeneralStringAsn1, IntegerAsn1},
///     tag::{Tag, TagPeeker},
/// };
/// use std::fmt;
///
/// pub enum NameOrNumber {
///     Number(IntegerAsn1),
///     Name(GeneralStringAsn1),
/// }
///
/// impl<'de> de::Deserialize<'de> for NameOrNumber {
///     fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
///     where
///         D: de::Deserializer<'de>,
///     {
///         struct Visitor;
///
///         impl<'de> de::Visitor<'de> for Visitor {
///             type Value = NameOrNumber;
///
///             fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
///                 formatter.write_str("a valid NameOrNumber")
///             }
///
///             fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
///             where
///                 A: de::SeqAccess<'de>,
///             {
///                 let peeker: TagPeeker = seq
///                     .next_element()?
///                     .ok_or_else(|| de::Error::invalid_length(0, &self))?;
///                 match peeker.next_tag {
///                     Tag::INTEGER => seq
///                         .next_element()?
///                         .map(NameOrNumber::Number)
///                         .ok_or_else(|| de::Error::invalid_length(1, &self)),
///                     Tag::GENERAL_STRING => seq
///                         .next_element()?
///                         .map(NameOrNumber::Name)
///                         .ok_or_else(|| de::Error::invalid_length(1, &self)),
///                     _ => Err(de::Error::invalid_value(
///                         de::Unexpected::Other("[NameOrNumber] unsupported or unknown choice value"),
///                         &"a supported choice value",
///                     )),
///                 }
///             }
///         }
///
///         deserializer.deserialize_enum("NameOrNumber", &["Number", "Name"], Visitor)
///     }
/// }
///
/// let buffer = b"\x1B\x06ATHENA";
/// let choice: NameOrNumber = krb_asn1_der::from_bytes(buffer).unwrap();
/// match choice {
///     NameOrNumber::Number(_) => panic!("wrong variant"),
///     NameOrNumber::Name(name) => assert_eq!(name.0, "ATHENA"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagPeeker {
    pub next_tag: Tag,
}

impl<'de> de::Deserialize<'de> for TagPeeker {
    fn deserialize<D>(deserializer: D) -> Result<TagPeeker, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> de::Visitor<'de> for Visitor {
            type Value = TagPeeker;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid ASN.1 tag")
            }

            fn visit_u8<E>(self, v: u8) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(TagPeeker { next_tag: v.into() })
            }
        }

        deserializer.deserialize_identifier(Visitor)
    }
}
