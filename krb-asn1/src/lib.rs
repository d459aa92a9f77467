pub mod bit_string;
pub mod date;
pub mod tag;
pub mod wrapper;

use tag::Tag;

/// Associates a serde name and a DER tag to a type.
///
/// The serde name is what the DER serializer and deserializer dispatch on, so every wrapper
/// type must use a name unique to it.
pub trait Asn1Type {
    const TAG: Tag;
    const NAME: &'static str;
}
