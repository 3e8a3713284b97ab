#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Username (distinct); equals the login the account was registered with
    pub username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into() }
    }
}
