//! Kerberos cipher suites ([RFC 3961](https://www.rfc-editor.org/rfc/rfc3961.html) profiles)
//!
//! Every suite is stateless: keys are passed to each operation and the key usage number is
//! mixed into the key schedule, so a ciphertext produced for one usage never decrypts under another.

pub(crate) mod aes;
pub(crate) mod common;
pub mod nfold;
pub(crate) mod rc4;
mod utils;

use thiserror::Error;

use crate::constants::{cksum_types, etypes};

pub use self::aes::{Aes128CtsHmacSha196, Aes256CtsHmacSha196};
pub use self::rc4::Rc4HmacMd5;

/// https://www.rfc-editor.org/rfc/rfc3962.html#section-4
/// the 8-octet ASCII string "kerberos"
pub const KERBEROS: &[u8; 8] = b"kerberos";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KerberosCryptoError {
    #[error("invalid key length: {0}. Expected: {1}")]
    KeyLength(usize, usize),
    #[error("invalid cipher length: {0}. Expected at least: {1}")]
    CipherLength(usize, usize),
    #[error("unsupported cipher suite: etype {0}")]
    UnsupportedSuite(i32),
    #[error("bad integrity: calculated hmac is different than provided in cipher")]
    IntegrityCheck,
    #[error("cipher pad error: {0}")]
    CipherPad(String),
    #[error("no key available for {0:?}")]
    MissingKey(CipherSuite),
}

pub type KerberosCryptoResult<T> = Result<T, KerberosCryptoError>;

pub trait Cipher {
    fn key_size(&self) -> usize;
    fn block_size(&self) -> usize;
    fn checksum_size(&self) -> usize;
    fn confounder_size(&self) -> usize;
    fn cipher_type(&self) -> CipherSuite;

    /// Derives the long-term base key. Pure: same inputs, same key.
    fn generate_key_from_password(&self, password: &str, salt: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    /// Encrypts `payload` behind a fresh random confounder and appends (or prepends) the integrity tag
    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    /// Checks the integrity tag before anything is returned
    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>>;

    fn verify_checksum(&self, key: &[u8], key_usage: i32, payload: &[u8], checksum: &[u8]) -> KerberosCryptoResult<()> {
        let calculated = self.checksum(key, key_usage, payload)?;
        common::verify_mac(&calculated, checksum)
    }
}

/// Closed set of supported cipher suites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherSuite {
    Aes256CtsHmacSha196,
    Aes128CtsHmacSha196,
    Rc4HmacMd5,
}

impl CipherSuite {
    pub const COUNT: usize = 3;

    /// Ordered by preference
    pub const ALL: [CipherSuite; Self::COUNT] = [
        CipherSuite::Aes256CtsHmacSha196,
        CipherSuite::Aes128CtsHmacSha196,
        CipherSuite::Rc4HmacMd5,
    ];

    pub fn etype(self) -> i32 {
        match self {
            CipherSuite::Aes256CtsHmacSha196 => etypes::AES256_CTS_HMAC_SHA1_96,
            CipherSuite::Aes128CtsHmacSha196 => etypes::AES128_CTS_HMAC_SHA1_96,
            CipherSuite::Rc4HmacMd5 => etypes::RC4_HMAC,
        }
    }

    pub fn checksum_type(self) -> i32 {
        match self {
            CipherSuite::Aes256CtsHmacSha196 => cksum_types::HMAC_SHA1_96_AES256,
            CipherSuite::Aes128CtsHmacSha196 => cksum_types::HMAC_SHA1_96_AES128,
            CipherSuite::Rc4HmacMd5 => cksum_types::HMAC_MD5,
        }
    }

    pub fn from_checksum_type(checksum_type: i32) -> KerberosCryptoResult<Self> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.checksum_type() == checksum_type)
            .ok_or(KerberosCryptoError::UnsupportedSuite(checksum_type))
    }

    pub(crate) fn index(self) -> usize {
        match self {
            CipherSuite::Aes256CtsHmacSha196 => 0,
            CipherSuite::Aes128CtsHmacSha196 => 1,
            CipherSuite::Rc4HmacMd5 => 2,
        }
    }
}

impl TryFrom<i32> for CipherSuite {
    type Error = KerberosCryptoError;

    fn try_from(etype: i32) -> Result<Self, Self::Error> {
        match etype {
            etypes::AES256_CTS_HMAC_SHA1_96 => Ok(CipherSuite::Aes256CtsHmacSha196),
            etypes::AES128_CTS_HMAC_SHA1_96 => Ok(CipherSuite::Aes128CtsHmacSha196),
            etypes::RC4_HMAC => Ok(CipherSuite::Rc4HmacMd5),
            _ => Err(KerberosCryptoError::UnsupportedSuite(etype)),
        }
    }
}

impl From<CipherSuite> for i32 {
    fn from(suite: CipherSuite) -> Self {
        suite.etype()
    }
}

macro_rules! dispatch {
    ($suite:expr, $cipher:ident => $call:expr) => {
        match $suite {
            CipherSuite::Aes256CtsHmacSha196 => {
                let $cipher = Aes256CtsHmacSha196;
                $call
            }
            CipherSuite::Aes128CtsHmacSha196 => {
                let $cipher = Aes128CtsHmacSha196;
                $call
            }
            CipherSuite::Rc4HmacMd5 => {
                let $cipher = Rc4HmacMd5;
                $call
            }
        }
    };
}

impl Cipher for CipherSuite {
    fn key_size(&self) -> usize {
        dispatch!(self, c => c.key_size())
    }

    fn block_size(&self) -> usize {
        dispatch!(self, c => c.block_size())
    }

    fn checksum_size(&self) -> usize {
        dispatch!(self, c => c.checksum_size())
    }

    fn confounder_size(&self) -> usize {
        dispatch!(self, c => c.confounder_size())
    }

    fn cipher_type(&self) -> CipherSuite {
        *self
    }

    fn generate_key_from_password(&self, password: &str, salt: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        dispatch!(self, c => c.generate_key_from_password(password, salt))
    }

    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        dispatch!(self, c => c.encrypt(key, key_usage, payload))
    }

    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        dispatch!(self, c => c.decrypt(key, key_usage, cipher_data))
    }

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        dispatch!(self, c => c.checksum(key, key_usage, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(17, CipherSuite::Aes128CtsHmacSha196)]
    #[case(18, CipherSuite::Aes256CtsHmacSha196)]
    #[case(23, CipherSuite::Rc4HmacMd5)]
    fn etype_round_trip(#[case] etype: i32, #[case] suite: CipherSuite) {
        assert_eq!(CipherSuite::try_from(etype).unwrap(), suite);
        assert_eq!(i32::from(suite), etype);
        assert_eq!(suite.cipher_type(), suite);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(16)]
    #[case(24)]
    #[case(-128)]
    fn unknown_etype(#[case] etype: i32) {
        assert_eq!(
            CipherSuite::try_from(etype),
            Err(KerberosCryptoError::UnsupportedSuite(etype))
        );
    }

    #[test]
    fn indices_are_dense() {
        for (i, suite) in CipherSuite::ALL.into_iter().enumerate() {
            assert_eq!(suite.index(), i);
        }
    }

    #[test]
    fn checksum_types() {
        assert_eq!(CipherSuite::from_checksum_type(-138), Ok(CipherSuite::Rc4HmacMd5));
        assert_eq!(CipherSuite::from_checksum_type(16), Ok(CipherSuite::Aes256CtsHmacSha196));
        assert!(CipherSuite::from_checksum_type(7).is_err());
    }

    #[test]
    fn rc4_sizes() {
        let suite = CipherSuite::Rc4HmacMd5;
        assert_eq!(suite.key_size(), 16);
        assert_eq!(suite.block_size(), 16);
        assert_eq!(suite.checksum_size(), 16);
        assert_eq!(suite.confounder_size(), 8);
    }
}
