use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::AssessmentConfig;

const NONCE_LEN: usize = 12;

/// Reversible encryption for PII fields before they leave the service.
///
/// AES-256-GCM keyed by the SHA-256 digest of a configured secret. Each call draws a fresh
/// nonce, so ciphertexts are `base64(nonce || ciphertext || tag)` and never repeat for the
/// same input.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl FieldCipher {
    pub fn from_secret(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Random per-process key. Ciphertexts cannot be read back after a restart.
    pub fn ephemeral() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    pub fn from_config(config: &AssessmentConfig) -> Self {
        match config.field_secret.as_deref() {
            Some(secret) => Self::from_secret(secret),
            None => {
                warn!("HEALTH_RISK_FIELD_SECRET not set; using an ephemeral field key");
                Self::ephemeral()
            }
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&sealed);
        Ok(STANDARD.encode(payload))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let payload = STANDARD.decode(encoded.trim())?;
        if payload.len() < NONCE_LEN {
            return Err(CipherError::Truncated);
        }

        let (nonce, sealed) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CipherError::Decrypt)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldCipher(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("field encryption failed")]
    Encrypt,
    #[error("field ciphertext failed authentication")]
    Decrypt,
    #[error("field ciphertext shorter than its nonce")]
    Truncated,
    #[error("field ciphertext is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("decrypted field is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
