use std::fmt;
use std::path::Path;

use rcgen::KeyPair;
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

use crate::CertError;

/// Private signing key of a generated or loaded certificate. Owned by exactly
/// one holder; the only way out of process memory is `store::save`, which
/// writes it next to its certificate.
pub struct CertKeyPair {
    inner: KeyPair,
}

impl CertKeyPair {
    pub(crate) fn generate() -> Result<Self, CertError> {
        Ok(Self {
            inner: KeyPair::generate()?,
        })
    }

    pub(crate) fn parse_pem(origin: &Path, pem: &str) -> Result<Self, CertError> {
        let inner = KeyPair::from_pem(pem).map_err(|error| {
            CertError::parse(origin, format!("invalid private key PEM: {error}"))
        })?;
        Ok(Self { inner })
    }

    pub(crate) fn signing_key(&self) -> &KeyPair {
        &self.inner
    }

    pub(crate) fn private_key_pem(&self) -> String {
        self.inner.serialize_pem()
    }

    pub(crate) fn private_key_der(&self) -> PrivateKeyDer<'static> {
        PrivateKeyDer::from(PrivatePkcs8KeyDer::from(self.inner.serialize_der()))
    }

    /// Raw subject public key bytes, as they appear in the certificate's
    /// SubjectPublicKeyInfo bit string.
    pub fn public_key_raw(&self) -> &[u8] {
        self.inner.public_key_raw()
    }
}

impl fmt::Debug for CertKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertKeyPair")
            .field("public_key_len", &self.inner.public_key_raw().len())
            .finish_non_exhaustive()
    }
}
