//! Local accounts
//!
//! Accounts live in the local store under `accounts`; logging in writes the
//! `loggedInUser` marker and logging out removes it.

use std::sync::Arc;

use serde::Deserialize;

use crate::data::{ACCOUNTS_KEY, Account, LOGGED_IN_USER_KEY, LocalStore, LoggedInUser};
use crate::error::AppError;

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Account service
pub struct AccountService {
    store: Arc<LocalStore>,
}

impl AccountService {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// Register a new account
    ///
    /// # Errors
    /// `Validation` for blank fields, a malformed email or a taken username
    pub async fn sign_up(&self, form: SignUp) -> Result<LoggedInUser, AppError> {
        let name = form.name.trim().to_string();
        let username = form.username.trim().to_string();
        let email = form.email.trim().to_string();

        if name.is_empty() || username.is_empty() || form.password.is_empty() {
            return Err(AppError::Validation(
                "name, username and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("email is not valid".to_string()));
        }

        let salt = generate_salt();
        let password_digest = digest_password(&form.password, &salt)?;

        let account = self
            .store
            .update_json(ACCOUNTS_KEY, |accounts: &mut Vec<Account>| {
                if accounts.iter().any(|a| a.username == username) {
                    return Err(AppError::Validation(format!(
                        "username {username} is already taken"
                    )));
                }

                let account = Account {
                    id: accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1,
                    name,
                    username: username.clone(),
                    email,
                    salt,
                    password_digest,
                };
                accounts.push(account.clone());
                Ok(account)
            })
            .await?;

        tracing::info!(username = %account.username, id = account.id, "Account registered");
        Ok(account.marker())
    }

    /// Check credentials and write the logged-in marker
    ///
    /// # Errors
    /// `Unauthorized` for an unknown username or a wrong password
    pub async fn log_in(&self, credentials: &Credentials) -> Result<LoggedInUser, AppError> {
        let accounts: Vec<Account> = self.store.read_json(ACCOUNTS_KEY).await.unwrap_or_default();
        let account = accounts
            .iter()
            .find(|a| a.username == credentials.username.trim())
            .ok_or(AppError::Unauthorized)?;

        verify_password(&credentials.password, &account.salt, &account.password_digest)?;

        let marker = account.marker();
        self.store.write_json(LOGGED_IN_USER_KEY, &marker).await?;
        tracing::info!(username = %marker.username, "Logged in");
        Ok(marker)
    }

    /// Remove the logged-in marker if it names `username`
    ///
    /// A marker belonging to someone else is left alone.
    pub async fn log_out(&self, username: &str) -> Result<Option<LoggedInUser>, AppError> {
        let marker = match self.logged_in().await {
            Some(marker) if marker.username == username => marker,
            other => {
                tracing::debug!(
                    username,
                    marker_user = ?other.map(|m| m.username),
                    "Logout does not match logged-in marker"
                );
                return Ok(None);
            }
        };

        self.store.remove_item(LOGGED_IN_USER_KEY).await?;
        tracing::info!(username = %marker.username, "Logged out");
        Ok(Some(marker))
    }

    /// Current logged-in marker, if any
    pub async fn logged_in(&self) -> Option<LoggedInUser> {
        self.store.read_json(LOGGED_IN_USER_KEY).await
    }
}

fn generate_salt() -> String {
    use base64::{Engine as _, engine::general_purpose};
    use rand::RngCore;

    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    general_purpose::STANDARD.encode(salt)
}

type HmacSha256 = hmac::Hmac<sha2::Sha256>;

fn password_mac(password: &str, salt: &str) -> Result<HmacSha256, AppError> {
    use hmac::Mac;

    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|e| AppError::Encryption(e.to_string()))?;
    mac.update(password.as_bytes());
    Ok(mac)
}

fn digest_password(password: &str, salt: &str) -> Result<String, AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    let digest = password_mac(password, salt)?.finalize().into_bytes();
    Ok(general_purpose::STANDARD.encode(digest))
}

fn verify_password(password: &str, salt: &str, expected: &str) -> Result<(), AppError> {
    use base64::{Engine as _, engine::general_purpose};
    use hmac::Mac;

    let expected = general_purpose::STANDARD
        .decode(expected)
        .map_err(|_| AppError::Unauthorized)?;
    password_mac(password, salt)?
        .verify_slice(&expected)
        .map_err(|_| AppError::Unauthorized)
}
