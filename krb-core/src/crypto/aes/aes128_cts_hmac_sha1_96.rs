use rand::rngs::OsRng;
use rand::Rng;

use crate::crypto::{Cipher, CipherSuite, KerberosCryptoResult};

use super::decrypt::decrypt_message;
use super::encrypt::encrypt_message;
use super::{checksum_sha_aes, derive_key_from_password, AesSize, AES128_KEY_SIZE, AES_BLOCK_SIZE, AES_MAC_SIZE};

/// [aes128-cts-hmac-sha1-96](https://www.rfc-editor.org/rfc/rfc3962.html#section-6)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aes128CtsHmacSha196;

impl Aes128CtsHmacSha196 {
    pub fn new() -> Self {
        Self
    }
}

impl Cipher for Aes128CtsHmacSha196 {
    fn key_size(&self) -> usize {
        AES128_KEY_SIZE
    }

    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn checksum_size(&self) -> usize {
        AES_MAC_SIZE
    }

    fn confounder_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn cipher_type(&self) -> CipherSuite {
        CipherSuite::Aes128CtsHmacSha196
    }

    fn generate_key_from_password(&self, password: &str, salt: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        derive_key_from_password(password, salt, &AesSize::Aes128)
    }

    fn encrypt(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        encrypt_message(
            key,
            key_usage,
            payload,
            &AesSize::Aes128,
            OsRng.gen::<[u8; AES_BLOCK_SIZE]>(),
        )
    }

    fn decrypt(&self, key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        decrypt_message(key, key_usage, cipher_data, &AesSize::Aes128)
    }

    fn checksum(&self, key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
        checksum_sha_aes(key, key_usage, payload, &AesSize::Aes128)
    }
}

#[cfg(test)]
mod tests {
    use crate::crypto::aes::encrypt::encrypt_message;
    use crate::crypto::aes::{derive_key_from_password, AesSize};
    use crate::crypto::Cipher;

    use super::Aes128CtsHmacSha196;

    const PLAINTEXT: &[u8] = b"aes256_cts_hmac_sha1_96";

    #[test]
    fn encrypt_with_fixed_confounder() {
        let key = derive_key_from_password("test", "EXAMPLEp1", &AesSize::Aes128).unwrap();
        assert_eq!(hex::encode(&key), "c7c41666445d3a66931377391e8a3fe6");

        let confounder = [161, 52, 157, 33, 238, 232, 185, 93, 167, 130, 91, 180, 167, 165, 224, 78];
        let encrypted = encrypt_message(&key, 5, PLAINTEXT, &AesSize::Aes128, confounder).unwrap();

        assert_eq!(
            hex::encode(&encrypted),
            "4ee9de048686ec018c91352e1dc25742485f14a13b00a73bd3aa37b54cc6dd8f6834c8fcb5de8fb2d1c67b193d9eb99362e512"
        );
    }

    #[test]
    fn round_trip() {
        let cipher = Aes128CtsHmacSha196::new();
        let key = cipher.generate_key_from_password("test", b"EXAMPLEp1").unwrap();

        let encrypted = cipher.encrypt(&key, 11, PLAINTEXT).unwrap();
        assert_eq!(encrypted.len(), 16 + PLAINTEXT.len() + 12);

        assert_eq!(cipher.decrypt(&key, 11, &encrypted).unwrap(), PLAINTEXT);
    }

    #[test]
    fn checksum() {
        let cipher = Aes128CtsHmacSha196::new();
        let key = cipher.generate_key_from_password("test", b"EXAMPLEp1").unwrap();

        let checksum = cipher.checksum(&key, 5, PLAINTEXT).unwrap();

        assert_eq!(hex::encode(checksum), "da67fe7395774e5d519a7106");
    }
}
