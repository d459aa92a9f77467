use krb_asn1::wrapper::{IntegerAsn1, OctetStringAsn1, Optional};

use crate::crypto::{Cipher, CipherSuite, KerberosCryptoError};
use crate::data_types::{Checksum, EncryptedData};
use crate::error::Result;
use crate::key::KeyMaterial;

impl EncryptedData {
    pub fn new(suite: CipherSuite, kvno: Option<u32>, cipher: Vec<u8>) -> Self {
        Self {
            etype: IntegerAsn1::from(suite.etype()).into(),
            kvno: Optional(kvno.map(|kvno| IntegerAsn1::from(kvno).into())),
            cipher: OctetStringAsn1(cipher).into(),
        }
    }

    /// Encrypts `plaintext` with the default suite of `key`
    ///
    /// The key usage is bound into the key schedule but never stored in the envelope.
    pub fn encrypt(plaintext: &[u8], key: &KeyMaterial, key_usage: i32, kvno: Option<u32>) -> Result<Self> {
        let suite = key.suite();

        log::debug!(
            "encrypting {} bytes with {:?} (key usage {})",
            plaintext.len(),
            suite,
            key_usage
        );

        let cipher = suite.encrypt(key.base_key(suite)?, key_usage, plaintext)?;

        Ok(Self::new(suite, kvno, cipher))
    }

    /// Decrypts with the suite named by `etype`, verifying integrity first
    pub fn decrypt(&self, key: &KeyMaterial, key_usage: i32) -> Result<Vec<u8>> {
        let suite = self.cipher_suite()?;

        log::debug!(
            "decrypting {} bytes with {:?} (key usage {})",
            self.cipher.0 .0.len(),
            suite,
            key_usage
        );

        let plaintext = suite
            .decrypt(key.base_key(suite)?, key_usage, &self.cipher.0 .0)
            .map_err(|err| {
                log::debug!("decryption failed: {}", err);
                err
            })?;

        Ok(plaintext)
    }

    pub fn cipher_suite(&self) -> Result<CipherSuite> {
        let etype = self.etype.to_i32().ok_or(KerberosCryptoError::UnsupportedSuite(-1))?;

        Ok(CipherSuite::try_from(etype)?)
    }

    pub fn kvno(&self) -> Option<u32> {
        self.kvno.0.as_ref().and_then(|kvno| kvno.to_u32())
    }

    pub fn cipher(&self) -> &[u8] {
        &self.cipher.0 .0
    }
}

impl Checksum {
    /// Keyed checksum of `data` with the default suite of `key`
    pub fn compute(data: &[u8], key: &KeyMaterial, key_usage: i32) -> Result<Self> {
        let suite = key.suite();
        let checksum = suite.checksum(key.base_key(suite)?, key_usage, data)?;

        Ok(Self {
            checksum_type: IntegerAsn1::from(suite.checksum_type()).into(),
            checksum: OctetStringAsn1(checksum).into(),
        })
    }

    /// Recomputes the checksum with the suite named by its type and compares in constant time
    pub fn verify(&self, data: &[u8], key: &KeyMaterial, key_usage: i32) -> Result<()> {
        let checksum_type = self
            .checksum_type
            .to_i32()
            .ok_or(KerberosCryptoError::UnsupportedSuite(-1))?;
        let suite = CipherSuite::from_checksum_type(checksum_type)?;

        suite.verify_checksum(key.base_key(suite)?, key_usage, data, &self.checksum.0 .0)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::key_usages;

    #[test]
    fn round_trip_through_der() {
        let key = KeyMaterial::from_password("password", "EXAMPLE.COMuser", CipherSuite::Aes256CtsHmacSha196);

        let envelope = EncryptedData::encrypt(b"ticket part", &key, key_usages::TICKET_REP, Some(2)).unwrap();
        assert_eq!(envelope.kvno(), Some(2));
        assert_eq!(envelope.cipher_suite().unwrap(), CipherSuite::Aes256CtsHmacSha196);

        let encoded = krb_asn1_der::to_vec(&envelope).unwrap();
        let decoded: EncryptedData = krb_asn1_der::from_bytes(&encoded).unwrap();

        assert_eq!(decoded.decrypt(&key, key_usages::TICKET_REP).unwrap(), b"ticket part");
    }

    #[test]
    fn wrong_usage_is_an_integrity_error() {
        let key = KeyMaterial::from_password("password", "", CipherSuite::Rc4HmacMd5);
        let envelope = EncryptedData::encrypt(b"secret", &key, key_usages::AP_REQ_AUTHENTICATOR, None).unwrap();

        let err = envelope.decrypt(&key, key_usages::AP_REP_ENC).unwrap_err();

        assert!(err.is_integrity_error(), "{:?}", err);
    }

    #[test]
    fn unknown_etype() {
        let key = KeyMaterial::from_password("password", "", CipherSuite::Rc4HmacMd5);
        let mut envelope = EncryptedData::encrypt(b"secret", &key, 3, None).unwrap();
        envelope.etype = IntegerAsn1::from(1u8).into();

        let err = envelope.decrypt(&key, 3).unwrap_err();

        assert!(err.is_unsupported_suite(), "{:?}", err);
    }

    #[test]
    fn password_key_decrypts_other_suite() {
        let aes_key = KeyMaterial::from_password("password", "EXAMPLE.COMuser", CipherSuite::Aes128CtsHmacSha196);
        let rc4_key = KeyMaterial::from_password("password", "EXAMPLE.COMuser", CipherSuite::Rc4HmacMd5);

        let envelope = EncryptedData::encrypt(b"as-rep", &rc4_key, key_usages::AS_REP_ENC, None).unwrap();

        assert_eq!(envelope.decrypt(&aes_key, key_usages::AS_REP_ENC).unwrap(), b"as-rep");
    }

    #[test]
    fn checksum() {
        let key = KeyMaterial::from_password("password", "", CipherSuite::Rc4HmacMd5);

        let checksum = Checksum::compute(b"test-message", &key, 3).unwrap();
        assert_eq!(checksum.checksum_type.to_i32(), Some(-138));
        assert_eq!(hex::encode(&checksum.checksum.0 .0), "0784ac6db39a028bd43978af64ac5d67");

        assert!(checksum.verify(b"test-message", &key, 3).is_ok());
        assert!(checksum.verify(b"test-messagf", &key, 3).unwrap_err().is_integrity_error());
    }
}
