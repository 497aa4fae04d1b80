mod app;

pub use app::{AppConfig, env_lookup, parse_port, resolve_public_url};
