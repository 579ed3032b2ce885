pub mod auth_router;
pub mod catalog_router;
pub mod supervisor_router;
pub mod user_router;
