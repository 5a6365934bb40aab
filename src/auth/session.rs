//! Stateless signed-session authentication for Pantry.
//!
//! A session token is `"{accountIdHex}.{issuedAtMillis}.{signature}"` where
//! the signature is an HMAC over the first two fields. No session state is
//! stored server-side and tokens carry no expiry; a token stays valid until
//! the signing secret changes.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::signer::TokenSigner;
use crate::{PantryError, Result};

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth";

/// Name of the fallback auth header for non-cookie clients. The same header
/// carries the token back to the client on login/register.
pub const AUTH_HEADER: &str = "X-Auth";

/// A cookie directive for the web layer to render as a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCookie {
    /// Cookie value (the session token, or empty to clear).
    pub value: String,
    /// Max-Age in seconds.
    pub max_age_secs: i64,
}

impl AuthCookie {
    /// Render as a `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly",
            AUTH_COOKIE, self.value, self.max_age_secs
        )
    }
}

/// Builds and verifies bearer session tokens.
pub struct SessionAuthenticator {
    signer: TokenSigner,
}

impl SessionAuthenticator {
    /// Create an authenticator around the given signer.
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    /// Generate a signed session token for the given account.
    pub fn generate(&self, account_id: i64) -> String {
        let payload = format!("{:x}.{}", account_id, current_millis());
        let signature = self.signer.sign(&payload);
        format!("{payload}.{signature}")
    }

    /// Verify a token and return the account id it was issued for.
    ///
    /// The timestamp is not checked; sessions do not time out.
    pub fn verify(&self, token: &str) -> Option<i64> {
        if token.trim().is_empty() {
            return None;
        }

        let parts: Vec<&str> = token.splitn(3, '.').collect();
        if parts.len() != 3 {
            return None;
        }

        let payload = format!("{}.{}", parts[0], parts[1]);
        if self.signer.sign(&payload) != parts[2] {
            debug!("session token signature mismatch");
            return None;
        }

        i64::from_str_radix(parts[0], 16).ok().filter(|id| *id >= 0)
    }

    /// Resolve the calling account from request credentials.
    ///
    /// The `auth` cookie takes precedence; the `X-Auth` header is the
    /// fallback for non-cookie clients. Pure lookup plus verify, no side
    /// effects.
    pub fn extract(&self, cookie: Option<&str>, header: Option<&str>) -> Result<i64> {
        if let Some(token) = cookie {
            return self
                .verify(token)
                .ok_or_else(|| PantryError::Auth("invalid session".to_string()));
        }

        if let Some(token) = header.filter(|t| !t.trim().is_empty()) {
            return self
                .verify(token)
                .ok_or_else(|| PantryError::Auth("invalid session".to_string()));
        }

        Err(PantryError::Auth("not logged in".to_string()))
    }

    /// Issue a fresh token and the cookie directive that carries it.
    ///
    /// The cookie is HTTP-only, valid for the whole site, and effectively
    /// non-expiring.
    pub fn issue(&self, account_id: i64) -> (String, AuthCookie) {
        let token = self.generate(account_id);
        let cookie = AuthCookie {
            value: token.clone(),
            max_age_secs: i32::MAX as i64,
        };
        (token, cookie)
    }

    /// Cookie directive that clears client-side session storage.
    ///
    /// The token signature itself stays valid server-side; there is no
    /// revocation.
    pub fn clear(&self) -> AuthCookie {
        AuthCookie {
            value: String::new(),
            max_age_secs: 0,
        }
    }
}

fn current_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> SessionAuthenticator {
        SessionAuthenticator::new(TokenSigner::new("test-secret"))
    }

    #[test]
    fn test_generate_format() {
        let auth = authenticator();
        let token = auth.generate(0x1234);

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "1234");
        assert!(parts[1].parse::<u128>().is_ok());
        assert!(!parts[2].is_empty());
    }

    #[test]
    fn test_verify_round_trip() {
        let auth = authenticator();
        for id in [1i64, 42, 0x7fff_ffff, i64::MAX] {
            let token = auth.generate(id);
            assert_eq!(auth.verify(&token), Some(id));
        }
    }

    #[test]
    fn test_verify_rejects_tampering() {
        let auth = authenticator();
        let token = auth.generate(42);

        // Mutating any single character invalidates the token
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
            if let Ok(mutated) = String::from_utf8(bytes) {
                if mutated == token {
                    continue;
                }
                assert_eq!(auth.verify(&mutated), None, "mutation at {i} accepted");
            }
        }
    }

    #[test]
    fn test_verify_rejects_malformed() {
        let auth = authenticator();
        assert_eq!(auth.verify(""), None);
        assert_eq!(auth.verify("   "), None);
        assert_eq!(auth.verify("only-one-part"), None);
        assert_eq!(auth.verify("two.parts"), None);
        assert_eq!(auth.verify("a.b.c"), None);
    }

    #[test]
    fn test_verify_rejects_non_hex_account() {
        let auth = authenticator();
        // Valid signature over a payload whose id field isn't hex
        let payload = "zzzz.12345";
        let signature = TokenSigner::new("test-secret").sign(payload);
        assert_eq!(auth.verify(&format!("{payload}.{signature}")), None);
    }

    #[test]
    fn test_verify_rejects_other_key() {
        let token = authenticator().generate(7);
        let other = SessionAuthenticator::new(TokenSigner::new("other-secret"));
        assert_eq!(other.verify(&token), None);
    }

    #[test]
    fn test_extract_cookie_precedence() {
        let auth = authenticator();
        let cookie_token = auth.generate(1);
        let header_token = auth.generate(2);

        let id = auth
            .extract(Some(&cookie_token), Some(&header_token))
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_extract_header_fallback() {
        let auth = authenticator();
        let token = auth.generate(9);
        assert_eq!(auth.extract(None, Some(&token)).unwrap(), 9);
    }

    #[test]
    fn test_extract_missing_credentials() {
        let auth = authenticator();
        assert!(matches!(
            auth.extract(None, None),
            Err(PantryError::Auth(_))
        ));
        assert!(matches!(
            auth.extract(None, Some("")),
            Err(PantryError::Auth(_))
        ));
    }

    #[test]
    fn test_extract_invalid_cookie_is_auth_error() {
        let auth = authenticator();
        // A bad cookie fails even when a good header is present
        let good = auth.generate(3);
        assert!(matches!(
            auth.extract(Some("bad.token.sig"), Some(&good)),
            Err(PantryError::Auth(_))
        ));
    }

    #[test]
    fn test_issue_and_clear_directives() {
        let auth = authenticator();
        let (token, cookie) = auth.issue(5);

        assert_eq!(cookie.value, token);
        assert_eq!(cookie.max_age_secs, i32::MAX as i64);
        let header = cookie.header_value();
        assert!(header.starts_with("auth="));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Path=/"));

        let clear = auth.clear();
        assert!(clear.value.is_empty());
        assert_eq!(clear.max_age_secs, 0);
        assert_eq!(clear.header_value(), "auth=; Max-Age=0; Path=/; HttpOnly");
    }

    #[test]
    fn test_no_expiry_enforced() {
        let auth = authenticator();
        // Forge an ancient timestamp with a valid signature: still accepted
        let payload = "2a.1000";
        let signature = TokenSigner::new("test-secret").sign(payload);
        assert_eq!(auth.verify(&format!("{payload}.{signature}")), Some(0x2a));
    }
}
