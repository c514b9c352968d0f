//! Login, registration and password reset

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::context::ScreenContext;
use crate::error::{Result, ScreenError};
use crate::screen::Screen;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const RESET_FAILED: &str = "Password reset failed";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUiState {
    pub is_loading: bool,
    pub logged_in: bool,
    pub user_name: Option<String>,
    pub reset_email_sent: bool,
    pub error_message: Option<String>,
}

pub struct AccountScreen {
    context: ScreenContext,
    state: Arc<watch::Sender<AccountUiState>>,
}

impl AccountScreen {
    pub fn new(context: ScreenContext) -> Self {
        let state = Arc::new(watch::Sender::new(AccountUiState {
            logged_in: context.auth.is_logged_in(),
            ..AccountUiState::default()
        }));
        Self { context, state }
    }

    /// Returns whether the provider accepted the credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        require("email", email)?;
        require("password", password)?;

        self.begin();
        let ok = self.context.auth.login(email, password).await;
        self.finish_sign_in(ok, LOGIN_FAILED).await;
        Ok(ok)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<bool> {
        require("email", email)?;
        require("password", password)?;

        self.begin();
        let ok = self.context.auth.register(email, password, name).await;
        self.finish_sign_in(ok, REGISTRATION_FAILED).await;
        Ok(ok)
    }

    pub async fn login_with_provider(&self, id_token: &str) -> Result<bool> {
        require("token", id_token)?;

        self.begin();
        let ok = self.context.auth.login_with_provider(id_token).await;
        self.finish_sign_in(ok, LOGIN_FAILED).await;
        Ok(ok)
    }

    /// Request a reset email
    pub async fn reset_password(&self, email: &str) -> Result<bool> {
        require("email", email)?;

        self.begin();
        let ok = self.context.auth.reset_password(email).await;
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.reset_email_sent = ok;
            s.error_message = (!ok).then(|| RESET_FAILED.to_string());
        });
        Ok(ok)
    }

    pub fn logout(&self) {
        self.context.auth.logout();
        info!("Signed out");
        self.state.send_replace(AccountUiState::default());
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
            s.reset_email_sent = false;
        });
    }

    /// A failed attempt keeps any earlier session
    async fn finish_sign_in(&self, ok: bool, failure: &str) {
        let logged_in = self.context.auth.is_logged_in();
        let user_name = if logged_in {
            self.context.auth.user_name().await
        } else {
            None
        };
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.logged_in = logged_in;
            s.user_name = user_name;
            s.error_message = (!ok).then(|| failure.to_string());
        });
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ScreenError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

impl Screen for AccountScreen {
    type State = AccountUiState;

    fn subscribe(&self) -> watch::Receiver<AccountUiState> {
        self.state.subscribe()
    }
}
