pub mod app;

pub use app::{create_router, App, AppError, AppServices};
