use std::net::SocketAddr;

use thiserror::Error;

use super::Lifecycle;

/// Everything that stops the process before or while serving. All of them
/// are fatal.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[source] anyhow::Error),

    #[error("failed to initialize database: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("storage initialization already attempted (state: {0:?})")]
    AlreadyInitialized(Lifecycle),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    /// Storage failures are logged by the sequencer at the point they
    /// happen; callers only need to report the rest.
    pub fn already_logged(&self) -> bool {
        matches!(self, StartupError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_storage_failures_are_logged_at_the_source() {
        assert!(StartupError::Storage(anyhow::anyhow!("refused")).already_logged());
        assert!(!StartupError::Config(anyhow::anyhow!("bad origin")).already_logged());
        assert!(
            !StartupError::Serve(std::io::Error::other("reset")).already_logged()
        );
    }
}
