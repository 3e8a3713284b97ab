use crate::directory::{DirectoryError, UserDirectory};
use crate::error::{LoginError, PasswordError, ServerError};
use crate::state::{Signal, StateCell};
use crate::validate;
use std::sync::Arc;
use tokio::sync::watch;

/// Sign-up screen state machine. Same shape as the sign-in flow plus the
/// repeat-password field, the strength rule, and the register call.
pub struct RegisterFlow {
    directory: Arc<dyn UserDirectory>,
    state: StateCell<RegisterState>,
    succeeded: Signal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterState {
    pub login: String,
    pub password: String,
    pub repeat_password: String,
    pub login_error: Option<LoginError>,
    pub password_error: Option<PasswordError>,
    pub repeat_password_error: Option<PasswordError>,
    pub sign_error: Option<ServerError>,
    pub loading: bool,
    pub password_visible: bool,
    pub repeat_password_visible: bool,
}

impl RegisterFlow {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: StateCell::default(),
            succeeded: Signal::new(),
        }
    }

    pub fn state(&self) -> RegisterState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<RegisterState> {
        self.state.subscribe()
    }

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

    pub fn on_repeat_password_change(&self, value: &str) {
        if validate::contains_control(value) {
            return;
        }
        self.state.update(|s| {
            s.repeat_password = value.to_string();
            s.repeat_password_error = if !value.is_empty() && !validate::is_allowed_charset(value) {
                Some(PasswordError::IncorrectSymbols)
            } else {
                None
            };
        });
    }

    /// Only one of the two password fields may be visible at a time.
    pub fn on_toggle_password_visible(&self) {
        self.state.update(|s| {
            s.password_visible = !s.password_visible;
            s.repeat_password_visible = false;
        });
    }

    pub fn on_toggle_repeat_password_visible(&self) {
        self.state.update(|s| {
            s.password_visible = false;
            s.repeat_password_visible = !s.repeat_password_visible;
        });
    }

    /// Full validation chain, then one register call. Ignored while a
    /// previous submission is still in flight.
    pub async fn submit(&self) {
        if self.state.get().loading {
            return;
        }

        self.state.update(|s| {
            s.login_error = None;
            s.password_error = None;
            s.repeat_password_error = None;
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
        if let Err(e) = validate::validate_strength(&snapshot.password) {
            self.state.update(|s| s.password_error = Some(e));
            return;
        }
        if let Err(e) = validate::validate_repeat(&snapshot.password, &snapshot.repeat_password) {
            self.state.update(|s| s.repeat_password_error = Some(e));
            return;
        }

        self.state.update(|s| s.loading = true);

        match self.directory.register(&snapshot.login, &snapshot.password).await {
            Ok(user) => {
                tracing::info!(username=%user.username, "account created");
                self.state.update(|s| s.loading = false);
                self.succeeded.emit(true);
            }
            Err(err) => {
                let sign = match err {
                    DirectoryError::AlreadyRegistered => ServerError::UserAlreadyExists,
                    DirectoryError::NotAvailable => ServerError::NotAvailable,
                    _ => ServerError::Unknown,
                };
                tracing::warn!(error=%err, "registration failed");
                self.state.update(|s| {
                    s.sign_error = Some(sign);
                    s.loading = false;
                });
                self.succeeded.emit(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{InMemoryDirectory, InstantLink};
    use crate::models::Credentials;

    fn flow() -> RegisterFlow {
        let dir = InMemoryDirectory::new(
            Arc::new(InstantLink),
            Credentials::new("admin123", "admin123"),
        );
        RegisterFlow::new(Arc::new(dir))
    }

    fn fill(flow: &RegisterFlow, login: &str, password: &str, repeat: &str) {
        flow.on_login_change(login);
        flow.on_password_change(password);
        flow.on_repeat_password_change(repeat);
    }

    #[tokio::test]
    async fn t_all_digit_password_is_weak() {
        let flow = flow();
        fill(&flow, "newuser1", "12345678", "12345678");

        flow.submit().await;
        assert_eq!(flow.state().password_error, Some(PasswordError::Weak));
    }

    #[tokio::test]
    async fn t_all_letter_password_is_weak() {
        let flow = flow();
        fill(&flow, "newuser1", "abcdefgh", "abcdefgh");

        flow.submit().await;
        assert_eq!(flow.state().password_error, Some(PasswordError::Weak));
    }

    #[tokio::test]
    async fn t_mixed_password_passes_strength() {
        let flow = flow();
        fill(&flow, "newuser1", "abcd1234", "abcd1234");

        flow.submit().await;
        assert_eq!(flow.state().password_error, None);
        assert!(flow.succeeded().last());
    }

    #[tokio::test]
    async fn t_repeat_mismatch() {
        let flow = flow();
        fill(&flow, "newuser1", "abcd1234", "abcd1239");

        flow.submit().await;

        let s = flow.state();
        assert_eq!(s.repeat_password_error, Some(PasswordError::Mismatch));
        assert_eq!(s.password_error, None);
        assert!(!s.loading);
    }

    #[tokio::test]
    async fn t_taken_username() {
        let flow = flow();
        fill(&flow, "admin123", "abcd1234", "abcd1234");

        flow.submit().await;

        let s = flow.state();
        assert_eq!(s.sign_error, Some(ServerError::UserAlreadyExists));
        assert!(!s.loading);
        assert!(!flow.succeeded().last());
    }

    #[test]
    fn t_visibility_toggles_are_exclusive() {
        let flow = flow();

        flow.on_toggle_password_visible();
        assert!(flow.state().password_visible);

        flow.on_toggle_repeat_password_visible();
        let s = flow.state();
        assert!(!s.password_visible);
        assert!(s.repeat_password_visible);

        flow.on_toggle_password_visible();
        let s = flow.state();
        assert!(s.password_visible);
        assert!(!s.repeat_password_visible);
    }

    #[test]
    fn t_strength_checked_at_submission_only() {
        let flow = flow();

        // typing an all-digit password raises no error until submit
        flow.on_password_change("12345678");
        assert_eq!(flow.state().password_error, None);
    }
}
