use krb_asn1::date::YearOutOfRange;
use krb_asn1_der::Asn1DerError;
use thiserror::Error;

use crate::crypto::KerberosCryptoError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] Asn1DerError),
    #[error(transparent)]
    Crypto(#[from] KerberosCryptoError),
    #[error("time cannot be encoded: {0}")]
    InvalidTime(#[from] YearOutOfRange),
    #[error("invalid {field}: expected {expected}, got {actual}")]
    InvalidField {
        field: &'static str,
        expected: i64,
        actual: i64,
    },
}

impl Error {
    /// Wrong key, wrong key usage or tampered data
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Error::Crypto(KerberosCryptoError::IntegrityCheck))
    }

    pub fn is_malformed_encoding(&self) -> bool {
        matches!(self, Error::MalformedEncoding(_))
    }

    pub fn is_unsupported_suite(&self) -> bool {
        matches!(self, Error::Crypto(KerberosCryptoError::UnsupportedSuite(_)))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
