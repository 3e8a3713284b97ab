mod link;
mod memory;

pub use link::{FlakyLink, InstantLink, Link};
pub use memory::InMemoryDirectory;

use crate::models::User;
use thiserror::Error;

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failure outcomes a directory call can produce. Closed set; callers map
/// anything they do not expect onto their own unknown-error bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("server not available")]
    NotAvailable,

    #[error("user not found")]
    UserNotFound,

    #[error("user already registered")]
    AlreadyRegistered,

    #[error("no logged-in user")]
    NotLoggedIn,
}

/// Simulated remote user store. Every operation rides the configured link
/// (latency + independent transient-failure injection) before touching any
/// state; a failed transfer mutates nothing.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates an account and signs it in. Duplicate usernames are rejected
    /// (and clear the current session).
    async fn register(&self, login: &str, password: &str) -> DirectoryResult<User>;

    /// Exact-match credential lookup. A miss clears any current session
    /// before reporting `UserNotFound`.
    async fn login(&self, login: &str, password: &str) -> DirectoryResult<User>;

    /// The signed-in user, if any.
    async fn current_user(&self) -> DirectoryResult<User>;

    /// Clears the current session.
    async fn log_out(&self) -> DirectoryResult<()>;
}
