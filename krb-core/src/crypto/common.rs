use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::crypto::{KerberosCryptoError, KerberosCryptoResult};

pub fn hmac_sha1(key: &[u8], payload: &[u8], mac_size: usize) -> KerberosCryptoResult<Vec<u8>> {
    let mut hmacker =
        Hmac::<Sha1>::new_from_slice(key).map_err(|_| KerberosCryptoError::KeyLength(key.len(), 20))?;

    hmacker.update(payload);

    let mut hmac = hmacker.finalize().into_bytes().to_vec();
    hmac.truncate(mac_size);

    Ok(hmac)
}

pub fn hmac_md5(key: &[u8], payload: &[u8]) -> KerberosCryptoResult<[u8; 16]> {
    let mut hmacker = Hmac::<Md5>::new_from_slice(key).map_err(|_| KerberosCryptoError::KeyLength(key.len(), 16))?;

    hmacker.update(payload);

    let mut mac = [0; 16];
    mac.copy_from_slice(&hmacker.finalize().into_bytes());

    Ok(mac)
}

/// Compares two integrity tags without leaking the position of the first difference
pub fn verify_mac(expected: &[u8], actual: &[u8]) -> KerberosCryptoResult<()> {
    if bool::from(expected.ct_eq(actual)) {
        Ok(())
    } else {
        Err(KerberosCryptoError::IntegrityCheck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_md5_rfc2202() {
        let mac = hmac_md5(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(hex::encode(mac), "750c783e6ab0b503eaa86e310a5db738");
    }

    #[test]
    fn hmac_sha1_is_truncated() {
        let mac = hmac_sha1(b"Jefe", b"what do ya want for nothing?", 12).unwrap();
        assert_eq!(hex::encode(mac), "effcdf6ae5eb2fa2d27416d5");
    }

    #[test]
    fn verify_mac_rejects_length_mismatch() {
        assert!(verify_mac(&[1, 2, 3], &[1, 2, 3]).is_ok());
        assert!(matches!(verify_mac(&[1, 2, 3], &[1, 2]), Err(KerberosCryptoError::IntegrityCheck)));
        assert!(matches!(verify_mac(&[1, 2, 3], &[1, 2, 4]), Err(KerberosCryptoError::IntegrityCheck)));
    }
}
