//! Authentication for Pantry: password credentials and stateless signed
//! session tokens.

mod password;
mod session;
mod signer;

pub use password::{
    derive_key, hash_password, verify_password, Credential, KDF_ITERATIONS, KEY_LEN, SALT_LEN,
};
pub use session::{AuthCookie, SessionAuthenticator, AUTH_COOKIE, AUTH_HEADER};
pub use signer::TokenSigner;
