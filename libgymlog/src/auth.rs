//! Authentication capability
//!
//! The identity provider is consumed through [`AuthProvider`]. Provider calls
//! are fallible; [`AuthService`] adapts them to what the UI needs (a success
//! flag or an optional value), logging every failure.
//!
//! [`InMemoryAuthProvider`] is a self-contained provider for tests and
//! offline builds. Passwords are stored as SHA-256 digests, never in clear.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::error::AuthError;

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, email: &str, password: &str, name: &str) -> AuthResult<()>;

    async fn login(&self, email: &str, password: &str) -> AuthResult<()>;

    async fn reset_password(&self, email: &str) -> AuthResult<()>;

    /// Display name of the signed-in user, if the provider knows it
    async fn user_name(&self) -> AuthResult<Option<String>>;

    async fn user_photo_url(&self) -> AuthResult<Option<String>>;

    /// Sign in with a token issued by an external identity provider
    async fn login_with_provider(&self, id_token: &str) -> AuthResult<()>;

    fn logout(&self);

    fn is_logged_in(&self) -> bool;
}

/// UI-facing adapter over an [`AuthProvider`]
///
/// Every failure is logged and collapsed into `false` / `None`.
#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> bool {
        report(
            "register",
            self.provider.register(email, password, name).await,
        )
        .is_some()
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        report("login", self.provider.login(email, password).await).is_some()
    }

    pub async fn reset_password(&self, email: &str) -> bool {
        report("reset password", self.provider.reset_password(email).await).is_some()
    }

    pub async fn user_name(&self) -> Option<String> {
        report("get user name", self.provider.user_name().await).flatten()
    }

    pub async fn user_photo_url(&self) -> Option<String> {
        report("get user photo URL", self.provider.user_photo_url().await).flatten()
    }

    pub async fn login_with_provider(&self, id_token: &str) -> bool {
        report(
            "login with provider",
            self.provider.login_with_provider(id_token).await,
        )
        .is_some()
    }

    pub fn logout(&self) {
        self.provider.logout();
        info!("User logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.provider.is_logged_in()
    }
}

fn report<T>(operation: &str, result: AuthResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(operation, error = %e, "Authentication call failed");
            None
        }
    }
}

/// Profile a token resolves to in [`InMemoryAuthProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    name: String,
    password_digest: Option<String>,
    photo_url: Option<String>,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, ProviderProfile>,
    current: Option<String>,
    reset_requests: Vec<String>,
    outage: Option<String>,
}

/// In-process identity provider
#[derive(Default)]
pub struct InMemoryAuthProvider {
    state: Mutex<AuthState>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `token` resolve to `profile` in `login_with_provider`
    pub fn register_token(&self, token: &str, profile: ProviderProfile) {
        self.lock().tokens.insert(token.to_string(), profile);
    }

    /// Fail every provider call with `message` until cleared
    pub fn set_outage(&self, message: Option<&str>) {
        self.lock().outage = message.map(str::to_string);
    }

    /// Emails for which a password reset was requested, oldest first
    pub fn reset_requests(&self) -> Vec<String> {
        self.lock().reset_requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        // A poisoned lock only means a panicking test; the state is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn available(state: &AuthState) -> AuthResult<()> {
        match &state.outage {
            Some(message) => Err(AuthError::Provider(message.clone())),
            None => Ok(()),
        }
    }

    fn current_account(state: &AuthState) -> AuthResult<&Account> {
        let email = state.current.as_ref().ok_or(AuthError::NotLoggedIn)?;
        state
            .accounts
            .get(email)
            .ok_or_else(|| AuthError::UnknownAccount(email.clone()))
    }
}

fn digest(password: &str) -> String {
    let hash = Sha256::digest(password.as_bytes());
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn register(&self, email: &str, password: &str, name: &str) -> AuthResult<()> {
        let mut state = self.lock();
        Self::available(&state)?;

        let email = normalize_email(email);
        if state.accounts.contains_key(&email) {
            return Err(AuthError::AccountExists(email));
        }

        state.accounts.insert(
            email.clone(),
            Account {
                name: name.to_string(),
                password_digest: Some(digest(password)),
                photo_url: None,
            },
        );
        state.current = Some(email);
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult<()> {
        let mut state = self.lock();
        Self::available(&state)?;

        let email = normalize_email(email);
        let account = state
            .accounts
            .get(&email)
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password_digest.as_deref() != Some(digest(password).as_str()) {
            return Err(AuthError::InvalidCredentials);
        }

        state.current = Some(email);
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> AuthResult<()> {
        let mut state = self.lock();
        Self::available(&state)?;

        let email = normalize_email(email);
        if !state.accounts.contains_key(&email) {
            return Err(AuthError::UnknownAccount(email));
        }
        state.reset_requests.push(email);
        Ok(())
    }

    async fn user_name(&self) -> AuthResult<Option<String>> {
        let state = self.lock();
        Self::available(&state)?;
        Ok(Some(Self::current_account(&state)?.name.clone()))
    }

    async fn user_photo_url(&self) -> AuthResult<Option<String>> {
        let state = self.lock();
        Self::available(&state)?;
        Ok(Self::current_account(&state)?.photo_url.clone())
    }

    async fn login_with_provider(&self, id_token: &str) -> AuthResult<()> {
        let mut state = self.lock();
        Self::available(&state)?;

        let profile = state
            .tokens
            .get(id_token)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        let email = normalize_email(&profile.email);

        // Merge: refresh name and photo, keep any existing password
        let account = state.accounts.entry(email.clone()).or_insert(Account {
            name: String::new(),
            password_digest: None,
            photo_url: None,
        });
        account.name = profile.name;
        if profile.photo_url.is_some() {
            account.photo_url = profile.photo_url;
        }

        state.current = Some(email);
        Ok(())
    }

    fn logout(&self) {
        self.lock().current = None;
    }

    fn is_logged_in(&self) -> bool {
        self.lock().current.is_some()
    }
}
