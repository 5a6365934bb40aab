//! Account registration, login, and update.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::auth::{hash_password, verify_password, Credential};
use crate::{PantryError, Result};

use super::model::{Account, AccountRecord};

/// Uniform login failure: the same kind and message whether the email is
/// unknown or the password is wrong, so callers can't enumerate accounts.
const LOGIN_FAILED: &str = "email or password is invalid";

/// Store for account records.
#[derive(Clone)]
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    /// Create a store over the given database pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new account.
    ///
    /// Email and password must be non-blank; the email is trimmed and
    /// lowercased and must not already be registered. The returned account
    /// carries no credential.
    pub async fn register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<Account> {
        if is_blank(email) || is_blank(password) {
            return Err(PantryError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let email = normalize_email(email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(PantryError::Conflict(
                "email is already in use, try another".to_string(),
            ));
        }

        let credential = hash_password(password);

        let result = sqlx::query(
            "INSERT INTO accounts (email, name, password_hash, password_salt)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&email)
        .bind(name)
        .bind(&credential.hash)
        .bind(&credential.salt)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The UNIQUE constraint is the authoritative guard; the lookup
            // above is only a fast path
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                PantryError::Conflict("email is already in use, try another".to_string())
            } else {
                PantryError::Database(e.to_string())
            }
        })?;

        let id = result.last_insert_rowid();
        info!(account_id = id, "registered new account");

        Ok(Account {
            id,
            email,
            name: name.map(str::to_string),
        })
    }

    /// Login with an email/password pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account> {
        let record = self
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| PantryError::Auth(LOGIN_FAILED.to_string()))?;

        if !verify_password(password, &record.credential) {
            debug!(account_id = record.id, "password mismatch on login");
            return Err(PantryError::Auth(LOGIN_FAILED.to_string()));
        }

        Ok(record.scrub())
    }

    /// Update the given account.
    ///
    /// Changing the email or password requires `old_password` to verify
    /// against the current credential. The display name is always
    /// overwritten with the supplied value, including to absent. The record
    /// is fully replaced.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
        old_password: Option<&str>,
    ) -> Result<Account> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| PantryError::NotFound("account".to_string()))?;

        let mut new_email = record.email.clone();
        let mut new_credential: Option<Credential> = None;

        let email = email.map(|e| normalize_email(e));
        if let Some(email) = email.filter(|e| !e.is_empty() && *e != record.email) {
            // Email change requires password verification
            if old_password.is_none_or(is_blank) {
                return Err(PantryError::Validation(
                    "password is required to change email address".to_string(),
                ));
            }
            if !verify_password(old_password.unwrap_or_default(), &record.credential) {
                return Err(PantryError::Validation("invalid password".to_string()));
            }
            if self.find_by_email(&email).await?.is_some() {
                return Err(PantryError::Conflict(
                    "email address already exists".to_string(),
                ));
            }
            new_email = email;
        }

        // A "change" that supplies the same value as the old password is
        // skipped entirely, so the salt does not rotate in that case
        let wants_password_change = password.is_some_and(|p| !is_blank(p))
            && (old_password.is_none_or(is_blank)
                || password.map(str::trim) != old_password.map(str::trim));
        if wants_password_change {
            if old_password.is_none_or(is_blank) {
                return Err(PantryError::Validation(
                    "previous password is required to change password".to_string(),
                ));
            }
            if !verify_password(old_password.unwrap_or_default(), &record.credential) {
                return Err(PantryError::Validation("invalid password".to_string()));
            }
            new_credential = Some(hash_password(password.unwrap_or_default()));
        }

        let credential = new_credential.unwrap_or(record.credential);

        // Full replace of the record
        let result = sqlx::query(
            "UPDATE accounts
             SET email = ?, name = ?, password_hash = ?, password_salt = ?
             WHERE id = ?",
        )
        .bind(&new_email)
        .bind(name)
        .bind(&credential.hash)
        .bind(&credential.salt)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PantryError::NotFound("account".to_string()));
        }

        info!(account_id = id, "updated account");

        Ok(Account {
            id,
            email: new_email,
            name: name.map(str::to_string),
        })
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: i64) -> Result<Account> {
        let record = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| PantryError::NotFound("account".to_string()))?;
        Ok(record.scrub())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>> {
        let row: Option<(i64, String, Option<String>, Vec<u8>, Vec<u8>)> = sqlx::query_as(
            "SELECT id, email, name, password_hash, password_salt FROM accounts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_record))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>> {
        let row: Option<(i64, String, Option<String>, Vec<u8>, Vec<u8>)> = sqlx::query_as(
            "SELECT id, email, name, password_hash, password_salt FROM accounts WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(into_record))
    }
}

fn into_record(row: (i64, String, Option<String>, Vec<u8>, Vec<u8>)) -> AccountRecord {
    AccountRecord {
        id: row.0,
        email: row.1,
        name: row.2,
        credential: Credential {
            hash: row.3,
            salt: row.4,
        },
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup() -> AccountStore {
        let db = Database::open_in_memory().await.unwrap();
        AccountStore::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_register() {
        let store = setup().await;

        let account = store
            .register(Some("Alice"), "Alice@Example.com", "pw123456")
            .await
            .unwrap();

        assert!(account.id > 0);
        assert_eq!(account.email, "alice@example.com");
        assert_eq!(account.name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_register_blank_inputs() {
        let store = setup().await;

        let result = store.register(None, "", "pw").await;
        assert!(matches!(result, Err(PantryError::Validation(_))));

        let result = store.register(None, "a@b.com", "   ").await;
        assert!(matches!(result, Err(PantryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let store = setup().await;
        store.register(Some("A"), "a@b.com", "pw1").await.unwrap();

        // Differs only in case and whitespace
        let result = store.register(Some("B"), "  A@B.com ", "pw2").await;
        assert!(matches!(result, Err(PantryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_distinct_credentials() {
        let store = setup().await;
        let a = store.register(None, "a@b.com", "same-pw").await.unwrap();
        let b = store.register(None, "b@b.com", "same-pw").await.unwrap();
        assert_ne!(a.id, b.id);

        // Fresh salts mean both logins still verify independently
        store.login("a@b.com", "same-pw").await.unwrap();
        store.login("b@b.com", "same-pw").await.unwrap();
    }

    #[tokio::test]
    async fn test_login() {
        let store = setup().await;
        let registered = store
            .register(Some("A"), "a@b.com", "pw123456")
            .await
            .unwrap();

        let account = store.login("a@b.com", "pw123456").await.unwrap();
        assert_eq!(account.id, registered.id);

        // Email lookup is normalized
        let account = store.login(" A@B.COM ", "pw123456").await.unwrap();
        assert_eq!(account.id, registered.id);
    }

    #[tokio::test]
    async fn test_login_uniform_failure() {
        let store = setup().await;
        store.register(None, "a@b.com", "pw123456").await.unwrap();

        let wrong_password = store.login("a@b.com", "nope").await.unwrap_err();
        let unknown_email = store.login("x@y.com", "pw123456").await.unwrap_err();

        // Same kind, same message for both failure modes
        match (&wrong_password, &unknown_email) {
            (PantryError::Auth(a), PantryError::Auth(b)) => assert_eq!(a, b),
            other => panic!("expected Auth errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_password_case_sensitive() {
        let store = setup().await;
        store.register(None, "a@x.com", "pw").await.unwrap();

        store.login("a@x.com", "pw").await.unwrap();
        assert!(matches!(
            store.login("a@x.com", "PW").await,
            Err(PantryError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_update_name_only() {
        let store = setup().await;
        let account = store
            .register(Some("Old"), "a@b.com", "pw123456")
            .await
            .unwrap();

        // Name changes never require the old password
        let updated = store
            .update(account.id, Some("New"), None, None, None)
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("New"));
        assert_eq!(updated.email, "a@b.com");

        // Name is always overwritten, including to absent
        let updated = store
            .update(account.id, None, None, None, None)
            .await
            .unwrap();
        assert!(updated.name.is_none());

        // Credential untouched
        store.login("a@b.com", "pw123456").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_unknown_account() {
        let store = setup().await;
        let result = store.update(999, Some("X"), None, None, None).await;
        assert!(matches!(result, Err(PantryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_email_requires_old_password() {
        let store = setup().await;
        let account = store.register(None, "a@b.com", "pw123456").await.unwrap();

        let result = store
            .update(account.id, None, Some("new@b.com"), None, None)
            .await;
        assert!(matches!(result, Err(PantryError::Validation(_))));

        let result = store
            .update(account.id, None, Some("new@b.com"), None, Some("wrong"))
            .await;
        assert!(matches!(result, Err(PantryError::Validation(_))));

        let updated = store
            .update(account.id, None, Some("New@B.com"), None, Some("pw123456"))
            .await
            .unwrap();
        assert_eq!(updated.email, "new@b.com");

        store.login("new@b.com", "pw123456").await.unwrap();
    }

    #[tokio::test]
    async fn test_update_same_email_no_password_needed() {
        let store = setup().await;
        let account = store
            .register(Some("A"), "a@b.com", "pw123456")
            .await
            .unwrap();

        // Supplying the unchanged email does not require verification
        let updated = store
            .update(account.id, Some("A"), Some(" A@B.com "), None, None)
            .await
            .unwrap();
        assert_eq!(updated.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let store = setup().await;
        store.register(None, "taken@b.com", "pw1").await.unwrap();
        let account = store.register(None, "a@b.com", "pw123456").await.unwrap();

        let result = store
            .update(
                account.id,
                None,
                Some("taken@b.com"),
                None,
                Some("pw123456"),
            )
            .await;
        assert!(matches!(result, Err(PantryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_password() {
        let store = setup().await;
        let account = store.register(None, "a@b.com", "old-pw").await.unwrap();

        // Missing old password
        let result = store
            .update(account.id, None, None, Some("new-pw"), None)
            .await;
        assert!(matches!(result, Err(PantryError::Validation(_))));

        // Wrong old password
        let result = store
            .update(account.id, None, None, Some("new-pw"), Some("wrong"))
            .await;
        assert!(matches!(result, Err(PantryError::Validation(_))));

        // Correct old password
        store
            .update(account.id, None, None, Some("new-pw"), Some("old-pw"))
            .await
            .unwrap();

        store.login("a@b.com", "new-pw").await.unwrap();
        assert!(matches!(
            store.login("a@b.com", "old-pw").await,
            Err(PantryError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn test_update_password_equal_to_old_is_skipped() {
        let store = setup().await;
        let account = store.register(None, "a@b.com", "pw123456").await.unwrap();

        // "Changing" to the same value is silently ignored, even with a
        // wrong old password it never reaches verification when equal
        store
            .update(account.id, None, None, Some("pw123456"), Some("pw123456"))
            .await
            .unwrap();

        store.login("a@b.com", "pw123456").await.unwrap();
    }

    #[tokio::test]
    async fn test_get_account() {
        let store = setup().await;
        let account = store
            .register(Some("A"), "a@b.com", "pw123456")
            .await
            .unwrap();

        let fetched = store.get_account(account.id).await.unwrap();
        assert_eq!(fetched, account);

        let result = store.get_account(12345).await;
        assert!(matches!(result, Err(PantryError::NotFound(_))));
    }
}
