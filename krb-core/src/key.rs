use std::fmt;
use std::sync::OnceLock;

use zeroize::Zeroizing;

use crate::crypto::{Cipher, CipherSuite, KerberosCryptoError, KerberosCryptoResult};
use crate::data_types::EncryptionKey;

type KeySlot = OnceLock<KerberosCryptoResult<Zeroizing<Vec<u8>>>>;

/// Long-term secret of a principal, or a session key
///
/// Holds either a password, from which the base key of any suite can be derived, or a ready key
/// for a single suite. Derived keys are computed at most once per suite, even when several threads
/// ask for the same key concurrently, and are wiped from memory on drop like the password.
pub struct KeyMaterial {
    password: Option<Zeroizing<String>>,
    principal: Option<String>,
    salt: Vec<u8>,
    suite: CipherSuite,
    keys: [KeySlot; CipherSuite::COUNT],
}

impl KeyMaterial {
    pub fn from_password(password: impl Into<String>, salt: impl Into<Vec<u8>>, suite: CipherSuite) -> Self {
        Self {
            password: Some(Zeroizing::new(password.into())),
            principal: None,
            salt: salt.into(),
            suite,
            keys: Default::default(),
        }
    }

    /// Uses the default salt of [RFC 4120 section 4](https://www.rfc-editor.org/rfc/rfc4120#section-4):
    /// the realm followed by every component of the principal name
    pub fn with_principal(
        password: impl Into<String>,
        realm: &str,
        name_components: &[&str],
        suite: CipherSuite,
    ) -> Self {
        let mut salt = realm.as_bytes().to_vec();
        for component in name_components {
            salt.extend_from_slice(component.as_bytes());
        }

        let mut key = Self::from_password(password, salt, suite);
        key.principal = Some(format!("{}@{}", name_components.join("/"), realm));
        key
    }

    /// Wraps an existing key (e.g. a session key) of `suite`
    pub fn from_key(suite: CipherSuite, key: impl Into<Vec<u8>>) -> KerberosCryptoResult<Self> {
        let key = Zeroizing::new(key.into());
        if key.len() != suite.key_size() {
            return Err(KerberosCryptoError::KeyLength(key.len(), suite.key_size()));
        }

        let keys: [KeySlot; CipherSuite::COUNT] = Default::default();
        let _ = keys[suite.index()].set(Ok(key));

        Ok(Self {
            password: None,
            principal: None,
            salt: Vec::new(),
            suite,
            keys,
        })
    }

    /// Default suite of this key
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// Base key for the default suite
    pub fn key(&self) -> KerberosCryptoResult<&[u8]> {
        self.base_key(self.suite)
    }

    /// Base key for `suite`, derived from the password on first use
    pub fn base_key(&self, suite: CipherSuite) -> KerberosCryptoResult<&[u8]> {
        let slot = &self.keys[suite.index()];

        match slot.get_or_init(|| self.derive(suite)) {
            Ok(key) => Ok(key.as_slice()),
            Err(err) => Err(err.clone()),
        }
    }

    fn derive(&self, suite: CipherSuite) -> KerberosCryptoResult<Zeroizing<Vec<u8>>> {
        let password = self.password.as_ref().ok_or(KerberosCryptoError::MissingKey(suite))?;

        log::debug!("deriving {:?} base key", suite);

        suite
            .generate_key_from_password(password, &self.salt)
            .map(Zeroizing::new)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("principal", &self.principal)
            .field("suite", &self.suite)
            .field("has_password", &self.password.is_some())
            .finish_non_exhaustive()
    }
}

impl TryFrom<&EncryptionKey> for KeyMaterial {
    type Error = KerberosCryptoError;

    fn try_from(key: &EncryptionKey) -> Result<Self, Self::Error> {
        let etype = key.key_type.to_i32().ok_or(KerberosCryptoError::UnsupportedSuite(-1))?;
        let suite = CipherSuite::try_from(etype)?;

        Self::from_key(suite, key.key_value.0 .0.clone())
    }
}
