use sea_orm::DatabaseConnection;

use super::{StartupError, Storage};

/// Server lifecycle. `Ready` is only reachable through a successful storage
/// init, and only `Ready` hands out the connection routes are mounted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

pub struct Sequencer<S> {
    storage: S,
    lifecycle: Lifecycle,
}

impl<S: Storage> Sequencer<S> {
    pub fn new(storage: S) -> Self {
        Sequencer {
            storage,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn transition(&mut self, next: Lifecycle) {
        tracing::debug!(from = ?self.lifecycle, to = ?next, "lifecycle transition");
        self.lifecycle = next;
    }

    /// Runs storage init exactly once. No retries: a failure leaves the
    /// sequencer in `Failed`.
    pub async fn initialize(&mut self) -> Result<DatabaseConnection, StartupError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Err(StartupError::AlreadyInitialized(self.lifecycle));
        }

        self.transition(Lifecycle::Initializing);

        match self.storage.init().await {
            Ok(db) => {
                self.transition(Lifecycle::Ready);
                tracing::info!("database initialized successfully");
                Ok(db)
            }
            Err(err) => {
                self.transition(Lifecycle::Failed);
                tracing::error!(error = ?err, "failed to initialize database");
                Err(StartupError::Storage(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::bootstrap::DatabaseStorage;

    struct Unreachable {
        attempts: Arc<AtomicUsize>,
    }

    impl Storage for Unreachable {
        async fn init(&self) -> anyhow::Result<DatabaseConnection> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("connection refused")
        }
    }

    #[tokio::test]
    async fn failed_init_is_terminal() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut sequencer = Sequencer::new(Unreachable {
            attempts: attempts.clone(),
        });
        assert_eq!(sequencer.lifecycle(), Lifecycle::Uninitialized);

        let err = sequencer.initialize().await.unwrap_err();
        assert!(matches!(err, StartupError::Storage(_)));
        assert_eq!(sequencer.lifecycle(), Lifecycle::Failed);

        let err = sequencer.initialize().await.unwrap_err();
        assert!(matches!(err, StartupError::AlreadyInitialized(Lifecycle::Failed)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_init_reaches_ready() {
        let mut sequencer = Sequencer::new(DatabaseStorage::new("sqlite::memory:", 1));

        sequencer.initialize().await.unwrap();
        assert_eq!(sequencer.lifecycle(), Lifecycle::Ready);

        let err = sequencer.initialize().await.unwrap_err();
        assert!(matches!(err, StartupError::AlreadyInitialized(Lifecycle::Ready)));
    }
}
