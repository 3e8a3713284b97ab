pub mod credentials;
pub mod user;

pub use credentials::Credentials;
pub use user::User;
