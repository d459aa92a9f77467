use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, KeyIvInit};
use aes::{Aes128, Aes256};

use crate::crypto::common::{hmac_sha1, verify_mac};
use crate::crypto::utils::{usage_ke, usage_ki};
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult};

use super::key_derivation::derive_key;
use super::{swap_two_last_blocks, AesSize, AES_BLOCK_SIZE, AES_MAC_SIZE};

type Aes128CbcDecryptor = cbc::Decryptor<Aes128>;
type Aes256CbcDecryptor = cbc::Decryptor<Aes256>;

pub fn decrypt_aes(key: &[u8], cipher_data: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    let mut payload = cipher_data.to_vec();

    // RFC 3962: initial cipher state      All bits zero
    let iv = [0_u8; AES_BLOCK_SIZE];

    let result = match aes_size {
        AesSize::Aes256 => Aes256CbcDecryptor::new(key.into(), (&iv as &[u8]).into())
            .decrypt_padded_mut::<NoPadding>(&mut payload)
            .map(|_| ()),
        AesSize::Aes128 => Aes128CbcDecryptor::new(key.into(), (&iv as &[u8]).into())
            .decrypt_padded_mut::<NoPadding>(&mut payload)
            .map(|_| ()),
    };
    result.map_err(|err| KerberosCryptoError::CipherPad(format!("{:?}", err)))?;

    Ok(payload)
}

pub fn decrypt_aes_cts(key: &[u8], cipher_data: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if cipher_data.len() < AES_BLOCK_SIZE {
        return Err(KerberosCryptoError::CipherLength(cipher_data.len(), AES_BLOCK_SIZE));
    }

    if cipher_data.len() == AES_BLOCK_SIZE {
        return decrypt_aes(key, cipher_data, aes_size);
    }

    let pad_length = (AES_BLOCK_SIZE - (cipher_data.len() % AES_BLOCK_SIZE)) % AES_BLOCK_SIZE;

    let mut cipher_data = cipher_data.to_vec();
    if pad_length != 0 {
        // Decrypt Cn-1 with IV = 0.
        let start = cipher_data.len() + pad_length - 2 * AES_BLOCK_SIZE;

        let dn = decrypt_aes(key, &cipher_data[start..start + AES_BLOCK_SIZE], aes_size)?;

        cipher_data.extend_from_slice(&dn[AES_BLOCK_SIZE - pad_length..]);
    }

    swap_two_last_blocks(&mut cipher_data);

    let mut plaintext = decrypt_aes(key, &cipher_data, aes_size)?;
    plaintext.truncate(cipher_data.len() - pad_length);

    Ok(plaintext)
}

pub fn decrypt_message(
    key: &[u8],
    key_usage: i32,
    cipher_data: &[u8],
    aes_size: &AesSize,
) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    if cipher_data.len() < AES_BLOCK_SIZE + AES_MAC_SIZE {
        return Err(KerberosCryptoError::CipherLength(
            cipher_data.len(),
            AES_BLOCK_SIZE + AES_MAC_SIZE,
        ));
    }

    let (cipher_data, checksum) = cipher_data.split_at(cipher_data.len() - AES_MAC_SIZE);

    let ke = derive_key(key, &usage_ke(key_usage), aes_size)?;
    let plaintext = decrypt_aes_cts(&ke, cipher_data, aes_size)?;

    let ki = derive_key(key, &usage_ki(key_usage), aes_size)?;
    let calculated_checksum = hmac_sha1(&ki, &plaintext, AES_MAC_SIZE)?;

    verify_mac(&calculated_checksum, checksum)?;

    // [0..AES_BLOCK_SIZE..] = the first block is a random confounder bytes
    Ok(plaintext[AES_BLOCK_SIZE..].to_vec())
}
