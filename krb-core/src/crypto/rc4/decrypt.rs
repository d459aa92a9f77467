use crate::crypto::common::{hmac_md5, verify_mac};
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult};

use super::encrypt::apply_rc4;
use super::key_derivation::usage_salt;
use super::{RC4_CHECKSUM_SIZE, RC4_CONFOUNDER_SIZE, RC4_KEY_SIZE};

/// [Decryption](https://www.rfc-editor.org/rfc/rfc4757.html#section-5)
///
/// The 16-byte checksum that prefixes the cipher data is compared in constant time against the
/// one recomputed over the decrypted data before anything is returned.
pub fn decrypt_message(key: &[u8], key_usage: i32, cipher_data: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != RC4_KEY_SIZE {
        return Err(KerberosCryptoError::KeyLength(key.len(), RC4_KEY_SIZE));
    }

    if cipher_data.len() < RC4_CHECKSUM_SIZE + RC4_CONFOUNDER_SIZE {
        return Err(KerberosCryptoError::CipherLength(
            cipher_data.len(),
            RC4_CHECKSUM_SIZE + RC4_CONFOUNDER_SIZE,
        ));
    }

    let (checksum, encrypted) = cipher_data.split_at(RC4_CHECKSUM_SIZE);

    let k2 = hmac_md5(key, &usage_salt(key_usage))?;
    let k3 = hmac_md5(&k2, checksum)?;

    let mut plaintext = encrypted.to_vec();
    apply_rc4(&k3, &mut plaintext)?;

    let calculated_checksum = hmac_md5(&k2, &plaintext)?;
    verify_mac(&calculated_checksum, checksum)?;

    Ok(plaintext.split_off(RC4_CONFOUNDER_SIZE))
}
