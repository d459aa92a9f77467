use rand::rngs::OsRng;
use rand::Rng;

use crate::crypto::{Cipher, CipherSuite, KerberosCryptoResult};

use super::decrypt::decrypt_message;
use super::encrypt::encrypt_message;
use super::{
    checksum_hmac_md5, derive_key_from_password, RC4_BLOCK_SIZE, RC4_CHECKSUM_SIZE, RC4_CONFOUNDER_SIZE, RC4_KEY_SIZE,
};

/// rc4-hmac (etype 23)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rc4HmacMd5;

impl Rc4HmacMd5 {
    pub fn new() -> Self {
        Self
    }
}

impl Cipher for Rc4HmacMd5 {
    fn key_size(&self) -> usize {
        RC4_KEY_SIZE
    }

    fn block_size(&self) -> usize {
        RC4_BLOCK_SIZE
    }

    fn checksum_size(&self) -> usize {
        RC4_CHECKSUM_SIZE
    }

    fn confounder_size(&self) -> usize {
        RC4_CONFOUNDER_SIZE
    }

    fn cipher_type(&self) -> CipherSuite {
        CipherSuite::Rc4HmacMd5
    }

    /// The salt is ignored
    fn generate_key_from_password(&self, password: &str, _salt: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        Ok(derive_key_from_password(password))
    }

    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        encrypt_message(key, key_usage, payload, OsRng.gen::<[u8; RC4_CONFOUNDER_SIZE]>())
    }

    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        decrypt_message(key, key_usage, cipher_data)
    }

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        checksum_hmac_md5(key, key_usage, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KerberosCryptoError;

    #[test]
    fn salt_is_ignored() {
        let cipher = Rc4HmacMd5::new();

        assert_eq!(
            cipher.generate_key_from_password("password", b"EXAMPLE.COMuser").unwrap(),
            cipher.generate_key_from_password("password", b"").unwrap()
        );
    }

    #[test]
    fn fresh_confounder_every_call() {
        let cipher = Rc4HmacMd5::new();
        let key = cipher.generate_key_from_password("password", b"").unwrap();

        let first = cipher.encrypt(&key, 11, b"authenticator").unwrap();
        let second = cipher.encrypt(&key, 11, b"authenticator").unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 16 + 8 + 13);
        assert_eq!(cipher.decrypt(&key, 11, &first).unwrap(), b"authenticator");
        assert_eq!(cipher.decrypt(&key, 11, &second).unwrap(), b"authenticator");
    }

    #[test]
    fn every_bit_flip_is_detected() {
        let cipher = Rc4HmacMd5::new();
        let key = cipher.generate_key_from_password("password", b"").unwrap();
        let cipher_data = cipher.encrypt(&key, 3, b"test-message").unwrap();

        for i in 0..cipher_data.len() * 8 {
            let mut tampered = cipher_data.clone();
            tampered[i / 8] ^= 1 << (i % 8);

            assert_eq!(
                cipher.decrypt(&key, 3, &tampered),
                Err(KerberosCryptoError::IntegrityCheck),
                "bit {} not detected",
                i
            );
        }
    }

    #[test]
    fn checksum_does_not_remap_usage() {
        let cipher = Rc4HmacMd5::new();
        let key = cipher.generate_key_from_password("password", b"").unwrap();

        let as_rep = cipher.checksum(&key, 3, b"test-message").unwrap();
        let tgs_rep = cipher.checksum(&key, 8, b"test-message").unwrap();

        assert_eq!(hex::encode(&as_rep), "0784ac6db39a028bd43978af64ac5d67");
        assert_eq!(hex::encode(&tgs_rep), "fd9a3c6e2ed2356ca2f40073c2b96014");
        assert!(cipher.verify_checksum(&key, 3, b"test-message", &as_rep).is_ok());
        assert_eq!(
            cipher.verify_checksum(&key, 3, b"test-message", &tgs_rep),
            Err(KerberosCryptoError::IntegrityCheck)
        );
    }
}
