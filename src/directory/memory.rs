use super::{DirectoryError, DirectoryResult, Link, UserDirectory};
use crate::models::{Credentials, User};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory rendition of the remote user store. A single mutex guards both
/// the credentials map and the session slot, so check-then-insert in
/// `register` and read-then-set in `login` stay atomic under parallel
/// callers.
pub struct InMemoryDirectory {
    link: Arc<dyn Link>,
    inner: Mutex<Inner>,
}

struct Inner {
    /// Credentials are the lookup key; usernames stay unique because
    /// registration probes by user value before inserting.
    users: HashMap<Credentials, User>,
    session: Option<User>,
}

impl InMemoryDirectory {
    /// Builds the store with one pre-provisioned account.
    pub fn new(link: Arc<dyn Link>, seed: Credentials) -> Self {
        let mut users = HashMap::new();
        users.insert(seed.clone(), User::new(seed.login));

        Self {
            link,
            inner: Mutex::new(Inner { users, session: None }),
        }
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn register(&self, login: &str, password: &str) -> DirectoryResult<User> {
        self.link.transfer().await?;

        let mut inner = self.inner.lock();
        let user = User::new(login);

        if inner.users.values().any(|u| *u == user) {
            inner.session = None;
            tracing::warn!(%login, "registration rejected: username taken");
            return Err(DirectoryError::AlreadyRegistered);
        }

        inner.users.insert(Credentials::new(login, password), user.clone());
        inner.session = Some(user.clone());
        tracing::info!(%login, "account registered");

        Ok(user)
    }

    async fn login(&self, login: &str, password: &str) -> DirectoryResult<User> {
        self.link.transfer().await?;

        let mut inner = self.inner.lock();
        let found = inner.users.get(&Credentials::new(login, password)).cloned();

        // A miss overwrites any previous session with "none".
        inner.session = found.clone();

        match found {
            Some(user) => Ok(user),
            None => Err(DirectoryError::UserNotFound),
        }
    }

    async fn current_user(&self) -> DirectoryResult<User> {
        self.link.transfer().await?;

        self.inner
            .lock()
            .session
            .clone()
            .ok_or(DirectoryError::NotLoggedIn)
    }

    async fn log_out(&self) -> DirectoryResult<()> {
        self.link.transfer().await?;

        self.inner.lock().session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InstantLink;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new(Arc::new(InstantLink), Credentials::new("admin123", "admin123"))
    }

    #[tokio::test]
    async fn t_seeded_account_can_sign_in() {
        let dir = directory();

        let user = dir.login("admin123", "admin123").await.unwrap();
        assert_eq!(user.username, "admin123");
        assert_eq!(dir.current_user().await.unwrap().username, "admin123");
    }

    #[tokio::test]
    async fn t_register_then_login_round_trip() {
        let dir = directory();

        let created = dir.register("newuser1", "abcd1234").await.unwrap();
        assert_eq!(created.username, "newuser1");

        let user = dir.login("newuser1", "abcd1234").await.unwrap();
        assert_eq!(user.username, "newuser1");
    }

    #[tokio::test]
    async fn t_register_signs_the_new_account_in() {
        let dir = directory();

        dir.register("newuser1", "abcd1234").await.unwrap();
        assert_eq!(dir.current_user().await.unwrap().username, "newuser1");
    }

    #[tokio::test]
    async fn t_duplicate_registration_keeps_original_credentials() {
        let dir = directory();

        dir.register("newuser1", "abcd1234").await.unwrap();
        let err = dir.register("newuser1", "other999").await.unwrap_err();
        assert_eq!(err, DirectoryError::AlreadyRegistered);

        // first credentials still valid, second never stored
        assert!(dir.login("newuser1", "abcd1234").await.is_ok());
        assert_eq!(
            dir.login("newuser1", "other999").await.unwrap_err(),
            DirectoryError::UserNotFound
        );
    }

    #[tokio::test]
    async fn t_duplicate_registration_clears_session() {
        let dir = directory();

        dir.login("admin123", "admin123").await.unwrap();
        let _ = dir.register("admin123", "whatever1").await;

        assert_eq!(dir.current_user().await.unwrap_err(), DirectoryError::NotLoggedIn);
    }

    #[tokio::test]
    async fn t_login_miss_clears_existing_session() {
        let dir = directory();

        dir.login("admin123", "admin123").await.unwrap();
        assert_eq!(
            dir.login("admin123", "wrongpass").await.unwrap_err(),
            DirectoryError::UserNotFound
        );

        assert_eq!(dir.current_user().await.unwrap_err(), DirectoryError::NotLoggedIn);
    }

    #[tokio::test]
    async fn t_log_out_clears_session() {
        let dir = directory();

        dir.login("admin123", "admin123").await.unwrap();
        dir.log_out().await.unwrap();

        assert_eq!(dir.current_user().await.unwrap_err(), DirectoryError::NotLoggedIn);
    }

    #[tokio::test]
    async fn t_unavailable_link_mutates_nothing() {
        let flaky = Arc::new(crate::directory::FlakyLink::new(0..1, 1.0));
        let dir = InMemoryDirectory::new(flaky, Credentials::new("admin123", "admin123"));

        assert_eq!(
            dir.register("newuser1", "abcd1234").await.unwrap_err(),
            DirectoryError::NotAvailable
        );

        // nothing was stored while the server was down
        assert_eq!(dir.inner.lock().users.len(), 1);
        assert!(dir.inner.lock().session.is_none());
    }
}
