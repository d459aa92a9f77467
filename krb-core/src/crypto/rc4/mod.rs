//! [RC4-HMAC](https://www.rfc-editor.org/rfc/rfc4757.html), the suite used by Active Directory
//! for accounts without AES keys.

mod decrypt;
mod encrypt;
mod key_derivation;
mod rc4_hmac_md5;

pub use key_derivation::{derive_key_from_password, usage_salt};
pub use rc4_hmac_md5::Rc4HmacMd5;

use md5::{Digest, Md5};

use crate::crypto::common::hmac_md5;
use crate::crypto::KerberosCryptoResult;

pub const RC4_KEY_SIZE: usize = 16;
pub const RC4_CHECKSUM_SIZE: usize = 16;
pub const RC4_CONFOUNDER_SIZE: usize = 8;
/// RC4 is a stream cipher; this is the MD5 output size advertised as the suite block size
pub const RC4_BLOCK_SIZE: usize = 16;

/// [Checksum](https://www.rfc-editor.org/rfc/rfc4757.html#section-4)
/// ```not_rust
/// Ksign = HMAC(Key, "signaturekey")
/// tmp = MD5(concat(T, data))
/// CHKSUM = HMAC(Ksign, tmp)
/// ```
/// The key usage `T` is taken as is, without the encryption remapping.
pub fn checksum_hmac_md5(key: &[u8], key_usage: i32, payload: &[u8]) -> KerberosCryptoResult<Vec<u8>> {
    let ksign = hmac_md5(key, b"signaturekey\0")?;

    let mut hasher = Md5::new();
    hasher.update(key_usage.to_le_bytes());
    hasher.update(payload);
    let tmp = hasher.finalize();

    Ok(hmac_md5(&ksign, &tmp)?.to_vec())
}
