use rc4::consts::U16;
use rc4::{KeyInit, Rc4, StreamCipher};

use crate::crypto::common::hmac_md5;
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult};

use super::key_derivation::usage_salt;
use super::{RC4_CONFOUNDER_SIZE, RC4_KEY_SIZE};

pub(super) fn apply_rc4(key: &[u8; 16], data: &mut [u8]) -> KerberosCryptoResult<()> {
    let mut cipher =
        Rc4::<U16>::new_from_slice(key).map_err(|_| KerberosCryptoError::KeyLength(key.len(), RC4_KEY_SIZE))?;
    cipher.apply_keystream(data);

    Ok(())
}

/// [Encryption](https://www.rfc-editor.org/rfc/rfc4757.html#section-5)
/// ```not_rust
/// K2 = HMAC(K1, salt)
/// CHKSUM = HMAC(K2, concat(confounder, data))
/// K3 = HMAC(K2, CHKSUM)
/// output = concat(CHKSUM, RC4(K3, concat(confounder, data)))
/// ```
pub fn encrypt_message(
    key: &[u8],
    key_usage: i32,
    payload: &[u8],
    confounder: [u8; RC4_CONFOUNDER_SIZE],
) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != RC4_KEY_SIZE {
        return Err(KerberosCryptoError::KeyLength(key.len(), RC4_KEY_SIZE));
    }

    let k2 = hmac_md5(key, &usage_salt(key_usage))?;

    let mut data = Vec::with_capacity(RC4_CONFOUNDER_SIZE + payload.len());
    data.extend_from_slice(&confounder);
    data.extend_from_slice(payload);

    let checksum = hmac_md5(&k2, &data)?;
    let k3 = hmac_md5(&k2, &checksum)?;

    apply_rc4(&k3, &mut data)?;

    let mut cipher_data = checksum.to_vec();
    cipher_data.extend_from_slice(&data);

    Ok(cipher_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rc4::derive_key_from_password;

    const CONFOUNDER: [u8; 8] = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];

    #[test]
    fn rc4_keystream() {
        // RC4 is symmetric, the test vector uses a 3-byte key so go through the crate directly
        let mut data = *b"message";
        let mut cipher = Rc4::<rc4::consts::U3>::new_from_slice(b"key").unwrap();
        cipher.apply_keystream(&mut data);

        assert_eq!(hex::encode(data), "6609479e45e81e");
    }

    #[test]
    fn fixed_confounder() {
        let key = derive_key_from_password("password");

        let cipher_data = encrypt_message(&key, 3, b"test-message", CONFOUNDER).unwrap();

        assert_eq!(
            hex::encode(&cipher_data),
            "5a60fd529693e675a664f581fe82ce0ad989f9373f9cbf26b2da4802513aa9457e8b7cf3"
        );
    }

    #[test]
    fn remapped_usages_share_ciphertext() {
        let key = derive_key_from_password("password");

        let as_rep = encrypt_message(&key, 3, b"test-message", CONFOUNDER).unwrap();
        let tgs_rep = encrypt_message(&key, 8, b"test-message", CONFOUNDER).unwrap();
        let sub_key = encrypt_message(&key, 9, b"test-message", CONFOUNDER).unwrap();

        assert_eq!(as_rep, tgs_rep);
        assert_eq!(as_rep, sub_key);
    }

    #[test]
    fn distinct_usages_give_distinct_ciphertext() {
        let key = derive_key_from_password("password");

        let authenticator = encrypt_message(&key, 11, b"test-message", CONFOUNDER).unwrap();
        let ap_rep = encrypt_message(&key, 12, b"test-message", CONFOUNDER).unwrap();

        assert_ne!(authenticator, ap_rep);
        assert_ne!(authenticator[..16], ap_rep[..16]);
        assert_ne!(authenticator[16..], ap_rep[16..]);

        let krb_priv = encrypt_message(&key, 13, b"test-message", CONFOUNDER).unwrap();
        let acceptor_sign = encrypt_message(&key, 23, b"test-message", CONFOUNDER).unwrap();
        assert_eq!(krb_priv, acceptor_sign);
    }

    #[test]
    fn empty_payload() {
        let key = derive_key_from_password("password");

        let cipher_data = encrypt_message(&key, 11, &[], CONFOUNDER).unwrap();

        assert_eq!(hex::encode(cipher_data), "66c5f2bff7fcbced452648906b26cfdb520a9d5bceb1a502");
    }

    #[test]
    fn wrong_key_length() {
        assert_eq!(
            encrypt_message(&[0; 15], 3, b"", CONFOUNDER),
            Err(KerberosCryptoError::KeyLength(15, 16))
        );
    }
}
