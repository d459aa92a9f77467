use md4::{Digest, Md4};

use crate::constants::key_usages;

/// `K = MD4(UNICODE(password))`, no salt
pub fn derive_key_from_password(password: &str) -> Vec<u8> {
    let utf16le: Vec<u8> = password.encode_utf16().flat_map(u16::to_le_bytes).collect();

    Md4::digest(utf16le).to_vec()
}

/// Message type salt: the little-endian key usage, after mapping the usages that share a
/// salt in the Microsoft implementation
pub fn usage_salt(key_usage: i32) -> [u8; 4] {
    let key_usage = match key_usage {
        key_usages::AS_REP_ENC | key_usages::TGS_REP_ENC_SUB_KEY => key_usages::TGS_REP_ENC_SESSION_KEY,
        key_usages::ACCEPTOR_SIGN => key_usages::KRB_PRIV_ENC_PART,
        other => other,
    };

    key_usage.to_le_bytes()
}
