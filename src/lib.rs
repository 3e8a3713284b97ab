pub mod config;
pub mod directory;
pub mod error;
pub mod flows;
pub mod models;
pub mod state;
pub mod validate;

// Convenient re-exports (so call sites can do `turnstile::LoginFlow`, etc.)
pub use directory::{InMemoryDirectory, UserDirectory};
pub use flows::{LoginFlow, ProfileFlow, RegisterFlow};
