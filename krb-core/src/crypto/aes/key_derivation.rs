use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::crypto::nfold::n_fold;
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult, KERBEROS};

use super::encrypt::encrypt_aes;
use super::{AesSize, AES_BLOCK_SIZE};

/// https://www.rfc-editor.org/rfc/rfc3962.html#section-4
/// Default iteration count (rounds) for pbkdf2 function:
/// 00 00 10 00 (decimal 4,096, indicating 4,096 iterations)
pub const AES_ITERATION_COUNT: u32 = 0x1000;

// as given
fn random_to_key(data: Vec<u8>) -> Vec<u8> {
    data
}

/// [DK(Key, Constant)](https://www.rfc-editor.org/rfc/rfc3961.html#section-5.1)
pub fn derive_key(key: &[u8], well_known: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    let key_len = aes_size.key_length();
    if key.len() != key_len {
        return Err(KerberosCryptoError::KeyLength(key.len(), key_len));
    }

    let mut n_fold_usage = n_fold(well_known, AES_BLOCK_SIZE * 8);

    let mut out = Vec::with_capacity(key_len);

    while out.len() < key_len {
        n_fold_usage = encrypt_aes(key, &n_fold_usage, aes_size)?;
        out.extend_from_slice(&n_fold_usage);
    }
    out.truncate(key_len);

    Ok(random_to_key(out))
}

pub fn derive_key_from_password<P: AsRef<[u8]>, S: AsRef<[u8]>>(
    password: P,
    salt: S,
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    derive_key_from_password_with_iterations(password, salt, AES_ITERATION_COUNT, aes_size)
}

/// string-to-key with an explicit PBKDF2 iteration count (the `s2kparams` of an ETYPE-INFO2 entry)
pub fn derive_key_from_password_with_iterations<P: AsRef<[u8]>, S: AsRef<[u8]>>(
    password: P,
    salt: S,
    iterations: u32,
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    let mut tmp = vec![0; aes_size.key_length()];

    pbkdf2_hmac::<Sha1>(password.as_ref(), salt.as_ref(), iterations, &mut tmp);

    let temp_key = random_to_key(tmp);

    derive_key(&temp_key, KERBEROS, aes_size)
}
