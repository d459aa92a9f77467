//! Strict DER (de)serialization for `serde`.
//!
//! Only the distinguished form is produced and accepted: definite minimal lengths, minimal
//! integers, and no byte left over at the end of any container or at the end of the input.
//!
//! Tagging is driven by the wrapper types of `krb_asn1::wrapper`:
//! [`ApplicationTag`](krb_asn1::wrapper::ApplicationTag) and
//! [`ExplicitContextTag`](krb_asn1::wrapper::ExplicitContextTag) add a constructed tag around
//! their content, the primitive wrappers select the universal tag of the next value, and
//! [`Optional`](krb_asn1::wrapper::Optional) peeks the next tag to decide whether a field is present.

#[macro_use]
mod debug_log;

mod de;
mod misc;
mod ser;

pub use de::{from_bytes, Deserializer};
pub use ser::{to_byte_buf, to_vec, to_writer, Serializer};

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

/// A `krb_asn1_der` related error
#[derive(Debug)]
pub enum Asn1DerError {
    /// The data is truncated
    TruncatedData,

    /// Bytes remain after the end of a value
    TrailingData,

    /// The data is invalid (unexpected tag, non-minimal integer, malformed bit string...)
    InvalidData,

    /// The length is indefinite or not in its minimal form
    InvalidLength,

    /// The value may be valid but is unsupported (e.g. an integer that doesn't fit the target type)
    UnsupportedValue,

    /// The data type is not supported by the (de-)serializer
    UnsupportedType,

    /// Custom message emitted by a `serde` implementation
    Message(String),

    /// Some other underlying I/O error
    Io(io::Error),
}

impl Display for Asn1DerError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Asn1DerError::TruncatedData => write!(f, "the data is truncated"),
            Asn1DerError::TrailingData => write!(f, "unexpected trailing bytes after a value"),
            Asn1DerError::InvalidData => write!(f, "the data is invalid"),
            Asn1DerError::InvalidLength => write!(f, "the length is not in its minimal definite form"),
            Asn1DerError::UnsupportedValue => write!(f, "the value is not supported"),
            Asn1DerError::UnsupportedType => write!(f, "the data type is not supported"),
            Asn1DerError::Message(msg) => write!(f, "custom error: {}", msg),
            Asn1DerError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for Asn1DerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Asn1DerError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Asn1DerError {
    fn from(err: io::Error) -> Self {
        Asn1DerError::Io(err)
    }
}

impl serde::de::Error for Asn1DerError {
    fn custom<T: Display>(msg: T) -> Self {
        Asn1DerError::Message(msg.to_string())
    }
}

impl serde::ser::Error for Asn1DerError {
    fn custom<T: Display>(msg: T) -> Self {
        Asn1DerError::Message(msg.to_string())
    }
}

/// Syntactic sugar for `Result<T, Asn1DerError>`
pub type Result<T> = std::result::Result<T, Asn1DerError>;
