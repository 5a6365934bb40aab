//! Keyed token signing for Pantry.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Length of the random fallback key generated when no secret is configured.
const FALLBACK_KEY_LEN: usize = 128;

/// Computes a keyed HMAC-SHA256 signature over arbitrary payloads.
///
/// Holds a single process-wide secret: either the operator-configured key or
/// a per-process random value generated once at startup. The key is immutable
/// for the process lifetime and safe for concurrent reads.
pub struct TokenSigner {
    key: Vec<u8>,
}

impl TokenSigner {
    /// Create a signer from the configured secret key.
    ///
    /// When the configured key is blank, a random temporary key is used and
    /// every outstanding client session becomes invalid on restart.
    pub fn new(secret_key: &str) -> Self {
        if secret_key.trim().is_empty() {
            warn!(
                "*** secret_key is not set, using a temporary random value. \
                 This is secure, but all client sessions will be reset upon server restart. ***"
            );
            let mut key = vec![0u8; FALLBACK_KEY_LEN];
            rand::rng().fill_bytes(&mut key);
            Self { key }
        } else {
            Self {
                key: secret_key.as_bytes().to_vec(),
            }
        }
    }

    /// Sign the given value and return a URL-safe base64 signature without
    /// padding.
    pub fn sign(&self, value: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC key of any length is valid");
        mac.update(value.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key material
        f.debug_struct("TokenSigner").finish()
    }
}
