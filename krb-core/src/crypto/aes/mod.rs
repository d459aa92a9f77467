mod aes128_cts_hmac_sha1_96;
mod aes256_cts_hmac_sha1_96;
mod decrypt;
mod encrypt;
mod key_derivation;

pub use aes128_cts_hmac_sha1_96::Aes128CtsHmacSha196;
pub use aes256_cts_hmac_sha1_96::Aes256CtsHmacSha196;
pub use key_derivation::{derive_key, derive_key_from_password, derive_key_from_password_with_iterations};

use crate::crypto::common::hmac_sha1;
use crate::crypto::utils::usage_kc;
use crate::crypto::KerberosCryptoResult;

/// [Assigned Numbers](https://www.rfc-editor.org/rfc/rfc3962.html#section-7)
/// HMAC output size = 96 bits
pub const AES_MAC_SIZE: usize = 12;
pub const AES_BLOCK_SIZE: usize = 16;

pub const AES128_KEY_SIZE: usize = 128 / 8;
pub const AES256_KEY_SIZE: usize = 256 / 8;

#[derive(Clone, Debug, PartialEq)]
pub enum AesSize {
    Aes256,
    Aes128,
}

impl AesSize {
    pub fn key_length(&self) -> usize {
        match self {
            AesSize::Aes256 => AES256_KEY_SIZE,
            AesSize::Aes128 => AES128_KEY_SIZE,
        }
    }
}

pub fn swap_two_last_blocks(data: &mut [u8]) {
    let len = data.len();
    let (head, last) = data.split_at_mut(len - AES_BLOCK_SIZE);
    let penultimate = &mut head[len - 2 * AES_BLOCK_SIZE..];
    penultimate.swap_with_slice(last);
}

/// [Checksum](https://www.rfc-editor.org/rfc/rfc3961.html#section-5.4)
/// `HMAC-SHA1(Kc, payload)` truncated to 96 bits
pub fn checksum_sha_aes(
    key: &[u8],
    key_usage: i32,
    payload: &[u8],
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    let kc = derive_key(key, &usage_kc(key_usage), aes_size)?;

    hmac_sha1(&kc, payload, AES_MAC_SIZE)
}
