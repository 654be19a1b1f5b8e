//! At-rest encryption for embeddable secrets
//!
//! A build step encrypts the flattened secrets map with AES-256-GCM and
//! embeds the base64 ciphertext (with the authentication tag appended)
//! plus the 96-bit nonce as constants. At runtime the master key arrives
//! out-of-band via the `GKM_MASTER_KEY` environment variable.
//!
//! Decryption is infallible: a missing, malformed or wrong key yields
//! an empty secret set so the process can still start in a degraded
//! no-secrets mode for diagnostics. Only encryption, a build-time
//! operator action, reports errors.

use crate::error::{Result, SecretError};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use rand::rngs::OsRng;
use std::collections::HashMap;

/// Environment variable carrying the master key
pub const MASTER_KEY_ENV: &str = "GKM_MASTER_KEY";

const NONCE_LEN: usize = 12;

/// Generate a fresh 256-bit master key, rendered as 64 hex characters
pub fn generate_master_key() -> String {
    crate::manager::generate_secret()
}

/// Encrypted secrets blob, both fields base64-encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedSecrets {
    /// Ciphertext with the 16-byte authentication tag appended
    pub ciphertext: String,
    /// 96-bit nonce
    pub nonce: String,
}

/// Encrypt an embeddable-secrets map under a 64-hex-char master key
pub fn encrypt_secrets(
    secrets: &HashMap<String, String>,
    master_key: &str,
) -> Result<SealedSecrets> {
    let key = decode_master_key(master_key).ok_or(SecretError::InvalidMasterKey)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let plaintext = serde_json::to_vec(secrets)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_slice())
        .map_err(|e| SecretError::Encryption(e.to_string()))?;

    Ok(SealedSecrets {
        ciphertext: BASE64.encode(ciphertext),
        nonce: BASE64.encode(nonce_bytes),
    })
}

/// Decrypt a sealed secrets blob, degrading to an empty map on any failure
pub fn decrypt_secrets(
    ciphertext: &str,
    nonce: &str,
    master_key: Option<&str>,
) -> HashMap<String, String> {
    let Some(master_key) = master_key else {
        tracing::warn!("No master key supplied, starting with an empty secret set");
        return HashMap::new();
    };

    let Some(key) = decode_master_key(master_key) else {
        tracing::warn!("Master key is not 64 hex characters, starting with an empty secret set");
        return HashMap::new();
    };

    let (Ok(ciphertext), Ok(nonce_bytes)) = (BASE64.decode(ciphertext), BASE64.decode(nonce))
    else {
        tracing::warn!("Sealed secrets are not valid base64, starting with an empty secret set");
        return HashMap::new();
    };
    if nonce_bytes.len() != NONCE_LEN {
        tracing::warn!("Sealed secrets nonce has the wrong length, starting with an empty secret set");
        return HashMap::new();
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    match cipher.decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice()) {
        Ok(plaintext) => match serde_json::from_slice(&plaintext) {
            Ok(secrets) => secrets,
            Err(e) => {
                tracing::warn!(error = %e, "Decrypted secrets are not valid JSON");
                HashMap::new()
            }
        },
        Err(_) => {
            // Wrong key or tampered ciphertext: the GCM tag does not verify
            tracing::warn!("Secret decryption failed, starting with an empty secret set");
            HashMap::new()
        }
    }
}

/// Decrypt using the master key from the process environment
pub fn decrypt_secrets_from_env(ciphertext: &str, nonce: &str) -> HashMap<String, String> {
    let master_key = std::env::var(MASTER_KEY_ENV).ok();
    decrypt_secrets(ciphertext, nonce, master_key.as_deref())
}

fn decode_master_key(master_key: &str) -> Option<[u8; 32]> {
    let bytes = hex::decode(master_key).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_secrets() -> HashMap<String, String> {
        let mut secrets = HashMap::new();
        secrets.insert("POSTGRES_PASSWORD".to_string(), "pgpass".to_string());
        secrets.insert("STRIPE_KEY".to_string(), "sk_live_x".to_string());
        secrets
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = generate_master_key();
        let sealed = encrypt_secrets(&sample_secrets(), &key).unwrap();

        let decrypted = decrypt_secrets(&sealed.ciphertext, &sealed.nonce, Some(&key));
        assert_eq!(decrypted, sample_secrets());
    }

    #[test]
    fn test_missing_key_degrades_to_empty() {
        let key = generate_master_key();
        let sealed = encrypt_secrets(&sample_secrets(), &key).unwrap();

        let decrypted = decrypt_secrets(&sealed.ciphertext, &sealed.nonce, None);
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_wrong_key_degrades_to_empty() {
        let key = generate_master_key();
        let sealed = encrypt_secrets(&sample_secrets(), &key).unwrap();

        let wrong = generate_master_key();
        let decrypted = decrypt_secrets(&sealed.ciphertext, &sealed.nonce, Some(&wrong));
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_malformed_key_degrades_to_empty() {
        let key = generate_master_key();
        let sealed = encrypt_secrets(&sample_secrets(), &key).unwrap();

        let decrypted = decrypt_secrets(&sealed.ciphertext, &sealed.nonce, Some("not-hex"));
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_tampered_ciphertext_degrades_to_empty() {
        let key = generate_master_key();
        let sealed = encrypt_secrets(&sample_secrets(), &key).unwrap();

        let mut bytes = BASE64.decode(&sealed.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        let tampered = BASE64.encode(bytes);

        let decrypted = decrypt_secrets(&tampered, &sealed.nonce, Some(&key));
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_encrypt_rejects_bad_key() {
        let result = encrypt_secrets(&sample_secrets(), "too-short");
        assert!(matches!(result, Err(SecretError::InvalidMasterKey)));
    }

    #[test]
    fn test_nonce_is_fresh_per_encryption() {
        let key = generate_master_key();
        let a = encrypt_secrets(&sample_secrets(), &key).unwrap();
        let b = encrypt_secrets(&sample_secrets(), &key).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
