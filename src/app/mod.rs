pub mod controller;
pub mod middleware;
pub mod model;
pub mod request;
pub mod response;
pub mod service;
mod state;

pub use state::AppState;
