//! [Key derivation constants](https://www.rfc-editor.org/rfc/rfc3961.html#section-5.3)

fn usage_constant(key_usage: i32, suffix: u8) -> [u8; 5] {
    let mut well_known = [suffix; 5];
    well_known[..4].copy_from_slice(&key_usage.to_be_bytes());
    well_known
}

/// Ke = DK(base-key, usage | 0xAA)
pub fn usage_ke(key_usage: i32) -> [u8; 5] {
    usage_constant(key_usage, 0xAA)
}

/// Ki = DK(base-key, usage | 0x55)
pub fn usage_ki(key_usage: i32) -> [u8; 5] {
    usage_constant(key_usage, 0x55)
}

/// Kc = DK(base-key, usage | 0x99)
pub fn usage_kc(key_usage: i32) -> [u8; 5] {
    usage_constant(key_usage, 0x99)
}
