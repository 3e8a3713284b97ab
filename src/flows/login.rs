use crate::directory::{DirectoryError, UserDirectory};
use crate::error::{LoginError, PasswordError, ServerError};
use crate::state::{Signal, StateCell};
use crate::validate;
use std::sync::Arc;
use tokio::sync::watch;

/// Sign-in screen state machine. Field events arrive synchronously; `submit`
/// is the only suspension point (one directory call).
pub struct LoginFlow {
    directory: Arc<dyn UserDirectory>,
    state: StateCell<LoginState>,
    succeeded: Signal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub login: String,
    pub password: String,
    pub login_error: Option<LoginError>,
    pub password_error: Option<PasswordError>,
    /// Directory outcome of the last failed submission; distinct from the
    /// per-field slots above.
    pub sign_error: Option<ServerError>,
    pub loading: bool,
    pub password_visible: bool,
}

impl LoginFlow {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: StateCell::default(),
            succeeded: Signal::new(),
        }
    }

    pub fn state(&self) -> LoginState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    /// One-shot submit outcome; observers navigate away on the first `true`.
    pub fn succeeded(&self) -> &Signal {
        &self.succeeded
    }

    pub fn on_login_change(&self, value: &str) {
        if validate::contains_control(value) {
            return;
        }
        self.state.update(|s| {
            s.login = value.to_string();
            s.login_error = if !value.is_empty() && !validate::is_allowed_charset(value) {
                Some(LoginError::IncorrectSymbols)
            } else {
                None
            };
        });
    }

    pub fn on_password_change(&self, value: &str) {
        if validate::contains_control(value) {
            return;
        }
        self.state.update(|s| {
            s.password = value.to_string();
            s.password_error = if !value.is_empty() && !validate::is_allowed_charset(value) {
                Some(PasswordError::IncorrectSymbols)
            } else {
                None
            };
        });
    }

    pub fn on_toggle_password_visible(&self) {
        self.state.update(|s| s.password_visible = !s.password_visible);
    }

    /// Runs the validation chain and, if it passes, one directory sign-in
    /// call. Ignored while a previous submission is still in flight.
    pub async fn submit(&self) {
        if self.state.get().loading {
            return;
        }

        self.state.update(|s| {
            s.login_error = None;
            s.password_error = None;
            s.sign_error = None;
        });

        let snapshot = self.state.get();
        if let Err(e) = validate::validate_login(&snapshot.login) {
            self.state.update(|s| s.login_error = Some(e));
            return;
        }
        if let Err(e) = validate::validate_password(&snapshot.password) {
            self.state.update(|s| s.password_error = Some(e));
            return;
        }

        self.state.update(|s| s.loading = true);

        match self.directory.login(&snapshot.login, &snapshot.password).await {
            Ok(user) => {
                tracing::info!(username=%user.username, "signed in");
                self.state.update(|s| s.loading = false);
                self.succeeded.emit(true);
            }
            Err(err) => {
                let sign = match err {
                    DirectoryError::UserNotFound => ServerError::WrongCredentials,
                    DirectoryError::NotAvailable => ServerError::NotAvailable,
                    _ => ServerError::Unknown,
                };
                tracing::warn!(error=%err, "sign-in failed");
                self.state.update(|s| {
                    s.sign_error = Some(sign);
                    s.loading = false;
                });
                self.succeeded.emit(false);
            }
        }
    }
}
