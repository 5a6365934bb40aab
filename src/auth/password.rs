//! Password credential derivation for Pantry.
//!
//! Credentials are an explicit (hash, salt) pair: PBKDF2-HMAC-SHA256 with a
//! high iteration count, an 8-byte random salt generated fresh per
//! credential, and a fixed 128-bit derived key. Verification re-derives the
//! key from the candidate password and the stored salt and compares the
//! bytes exactly.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 65_536;

/// Salt length in bytes.
pub const SALT_LEN: usize = 8;

/// Derived key length in bytes (128 bits).
pub const KEY_LEN: usize = 16;

/// A stored password credential: derived hash plus the salt it was derived
/// with. Never returned to API callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// PBKDF2-derived key.
    pub hash: Vec<u8>,
    /// Random per-credential salt.
    pub salt: Vec<u8>,
}

/// Derive a key from a password and salt.
///
/// Deterministic for a fixed (password, salt) pair. The password is trimmed
/// of leading/trailing whitespace before derivation; no other normalization
/// is applied.
pub fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.trim().as_bytes(), salt, KDF_ITERATIONS, &mut key);
    key
}

/// Create a new credential for a password with a freshly generated salt.
pub fn hash_password(password: &str) -> Credential {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);

    Credential {
        hash: derive_key(password, &salt).to_vec(),
        salt: salt.to_vec(),
    }
}

/// Verify a candidate password against a stored credential.
pub fn verify_password(candidate: &str, credential: &Credential) -> bool {
    derive_key(candidate, &credential.salt)[..] == credential.hash[..]
}
