pub mod account_token;
pub mod email;
pub mod error;
pub mod jwt;
pub mod logger;
pub mod password;
