pub mod account;
pub mod admin;
pub mod catalog;
pub mod supervisor;
pub mod user;

pub use account::{normalize_email, AccountKind, AccountRecord, AuthContext};
pub use admin::Admin;
pub use supervisor::Supervisor;
pub use user::User;
