pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod response;

pub use error::AppError;
