use crate::directory::{DirectoryError, UserDirectory};
use crate::error::ServerError;
use crate::state::{Signal, StateCell};
use std::sync::Arc;
use tokio::sync::watch;

/// Profile screen state machine. Fetch and log-out are tracked
/// independently; the presentation side renders at most one of
/// loading / fetch-error / logging-out / log-out-error / content.
pub struct ProfileFlow {
    directory: Arc<dyn UserDirectory>,
    state: StateCell<ProfileState>,
    logged_out: Signal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub username: String,
    pub loading: bool,
    pub logging_out: bool,
    pub fetch_error: Option<ServerError>,
    pub log_out_error: Option<ServerError>,
}

impl ProfileFlow {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            state: StateCell::default(),
            logged_out: Signal::new(),
        }
    }

    pub fn state(&self) -> ProfileState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    /// One-shot log-out outcome; also fires when a fetch discovers there is
    /// no session left to show.
    pub fn logged_out(&self) -> &Signal {
        &self.logged_out
    }

    /// Resolves the signed-in username. Call on screen entry; calling again
    /// after a failure is the retry path. Ignored while a fetch is already
    /// in flight.
    pub async fn fetch_user(&self) {
        if self.state.get().loading {
            return;
        }

        self.state.update(|s| s.loading = true);

        match self.directory.current_user().await {
            Ok(user) => {
                self.state.update(|s| {
                    s.username = user.username;
                    s.fetch_error = None;
                    s.loading = false;
                });
            }
            // Nobody is signed in: not an error, route back to the
            // pre-session screen.
            Err(DirectoryError::NotLoggedIn) => {
                self.state.update(|s| s.loading = false);
                self.logged_out.emit(true);
            }
            Err(err) => {
                let fetch = match err {
                    DirectoryError::NotAvailable => ServerError::NotAvailable,
                    _ => ServerError::Unknown,
                };
                tracing::warn!(error=%err, "profile fetch failed");
                self.state.update(|s| {
                    s.fetch_error = Some(fetch);
                    s.loading = false;
                });
            }
        }
    }

    /// Clears the session. Calling again after a failure is the retry path.
    /// Ignored while a log-out is already in flight.
    pub async fn log_out(&self) {
        if self.state.get().logging_out {
            return;
        }

        self.state.update(|s| s.logging_out = true);

        match self.directory.log_out().await {
            Ok(()) => {
                tracing::info!("signed out");
                self.state.update(|s| s.logging_out = false);
                self.logged_out.emit(true);
            }
            Err(err) => {
                let fail = match err {
                    DirectoryError::NotAvailable => ServerError::NotAvailable,
                    _ => ServerError::Unknown,
                };
                tracing::warn!(error=%err, "log-out failed");
                self.state.update(|s| {
                    s.log_out_error = Some(fail);
                    s.logging_out = false;
                });
                self.logged_out.emit(false);
            }
        }
    }

    /// Dismisses a failed log-out without navigating away.
    pub fn cancel_log_out(&self) {
        self.state.update(|s| s.log_out_error = None);
    }
}
