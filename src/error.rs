use thiserror::Error;

/// Errors attached to the login field. The display string is the exact
/// message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please introduce yourself")]
    Empty,

    #[error("Only latin letters and digits are allowed")]
    IncorrectSymbols,
}

/// Errors attached to the password (or repeat-password) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("No way without a password")]
    Empty,

    #[error("Those characters look wrong, use latin letters and digits only")]
    IncorrectSymbols,

    #[error("Password must be at least 8 characters")]
    TooShort,

    /// Registration only: all-digits or all-letters passwords are rejected.
    #[error("That password looks weak, mix letters and digits")]
    Weak,

    /// Registration only: repeat-password does not equal password.
    #[error("Repeat the password")]
    Mismatch,
}

/// Errors originating from a directory response. These land in the flow's
/// sign-error slot, never on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("Have we met before?")]
    WrongCredentials,

    #[error("Try signing in, I already know you")]
    UserAlreadyExists,

    #[error("The server had its fill and went to sleep, try again later")]
    NotAvailable,

    #[error("I don't even know what to say")]
    Unknown,
}
