use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes256};

use crate::crypto::common::hmac_sha1;
use crate::crypto::utils::{usage_ke, usage_ki};
use crate::crypto::{KerberosCryptoError, KerberosCryptoResult};

use super::key_derivation::derive_key;
use super::{swap_two_last_blocks, AesSize, AES_BLOCK_SIZE, AES_MAC_SIZE};

type Aes128CbcEncryptor = cbc::Encryptor<Aes128>;
type Aes256CbcEncryptor = cbc::Encryptor<Aes256>;

/// AES-CBC with a zero IV over block-aligned data
pub fn encrypt_aes(key: &[u8], plaintext: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    let mut payload = plaintext.to_vec();
    let payload_len = payload.len();

    // RFC 3962: initial cipher state      All bits zero
    let iv = [0_u8; AES_BLOCK_SIZE];

    let result = match aes_size {
        AesSize::Aes256 => Aes256CbcEncryptor::new(key.into(), (&iv as &[u8]).into())
            .encrypt_padded_mut::<NoPadding>(&mut payload, payload_len)
            .map(|_| ()),
        AesSize::Aes128 => Aes128CbcEncryptor::new(key.into(), (&iv as &[u8]).into())
            .encrypt_padded_mut::<NoPadding>(&mut payload, payload_len)
            .map(|_| ()),
    };
    result.map_err(|err| KerberosCryptoError::CipherPad(format!("{:?}", err)))?;

    Ok(payload)
}

/// [CBC with ciphertext stealing](https://www.rfc-editor.org/rfc/rfc3962.html#section-5)
pub fn encrypt_aes_cts(key: &[u8], payload: &[u8], aes_size: &AesSize) -> KerberosCryptoResult<Vec<u8>> {
    let pad_length = (AES_BLOCK_SIZE - (payload.len() % AES_BLOCK_SIZE)) % AES_BLOCK_SIZE;

    let mut padded_payload = payload.to_vec();
    padded_payload.extend_from_slice(&vec![0; pad_length]);

    let mut ciphertext = encrypt_aes(key, &padded_payload, aes_size)?;

    if ciphertext.len() <= AES_BLOCK_SIZE {
        return Ok(ciphertext);
    }

    swap_two_last_blocks(&mut ciphertext);
    ciphertext.truncate(payload.len());

    Ok(ciphertext)
}

/// `AES-CTS(Ke, confounder | payload) | HMAC-SHA1(Ki, confounder | payload)[..12]`
pub fn encrypt_message(
    key: &[u8],
    key_usage: i32,
    payload: &[u8],
    aes_size: &AesSize,
    confounder: [u8; AES_BLOCK_SIZE],
) -> KerberosCryptoResult<Vec<u8>> {
    if key.len() != aes_size.key_length() {
        return Err(KerberosCryptoError::KeyLength(key.len(), aes_size.key_length()));
    }

    let mut data_to_encrypt = Vec::with_capacity(AES_BLOCK_SIZE + payload.len());
    data_to_encrypt.extend_from_slice(&confounder);
    data_to_encrypt.extend_from_slice(payload);

    let ke = derive_key(key, &usage_ke(key_usage), aes_size)?;
    let mut encrypted = encrypt_aes_cts(&ke, &data_to_encrypt, aes_size)?;

    let ki = derive_key(key, &usage_ki(key_usage), aes_size)?;
    let checksum = hmac_sha1(&ki, &data_to_encrypt, AES_MAC_SIZE)?;

    encrypted.extend_from_slice(&checksum);

    Ok(encrypted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const CTS_KEY: &str = "636869636b656e207465726979616b69";

    // RFC 3962 appendix B
    #[rstest]
    #[case("4920776f756c64206c696b652074686520", "c6353568f2bf8cb4d8a580362da7ff7f97")]
    #[case(
        "4920776f756c64206c696b65207468652047656e6572616c20476175277320",
        "fc00783e0efdb2c1d445d4c8eff7ed2297687268d6ecccc0c07b25e25ecfe5"
    )]
    #[case(
        "4920776f756c64206c696b65207468652047656e6572616c2047617527732043",
        "39312523a78662d5be7fcbcc98ebf5a897687268d6ecccc0c07b25e25ecfe584"
    )]
    fn cts_vectors(#[case] plaintext: &str, #[case] expected: &str) {
        let key = hex::decode(CTS_KEY).unwrap();
        let plaintext = hex::decode(plaintext).unwrap();

        let ciphertext = encrypt_aes_cts(&key, &plaintext, &AesSize::Aes128).unwrap();

        assert_eq!(hex::encode(ciphertext), expected);
    }

    #[test]
    fn wrong_key_length() {
        assert_eq!(
            encrypt_aes(&[0; 16], &[0; 16], &AesSize::Aes256),
            Err(KerberosCryptoError::KeyLength(16, 32))
        );
    }
}
