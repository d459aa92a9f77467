//! # krb-core
//!
//! Kerberos 5 cipher suites (RC4-HMAC and AES-CTS-HMAC-SHA1-96), key material and the DER encoding
//! of the messages needed to present a ticket in an AP-REQ.

pub mod builders;
pub mod constants;
pub mod crypto;
pub mod data_types;
mod envelope;
pub mod error;
pub mod key;
pub mod messages;

pub use builders::{build_ap_req, build_ap_req_at};
pub use crypto::{Cipher, CipherSuite, KerberosCryptoError};
pub use error::{Error, Result};
pub use key::KeyMaterial;
