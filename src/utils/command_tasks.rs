use std::future::Future;
use tokio::task::{JoinError, JoinSet};

/// Commands started by the interactive loop that may still be running when
/// the session ends.
#[derive(Default)]
pub struct CommandTasks {
    set: JoinSet<()>,
}

impl CommandTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn<F>(&mut self, command: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        while let Some(finished) = self.set.try_join_next() {
            Self::report(finished);
        }
        self.set.spawn(command);
    }

    /// Commands not yet collected, finished or not.
    pub fn pending(&self) -> usize {
        self.set.len()
    }

    /// Waits for every command to run to completion.
    pub async fn drain(&mut self) {
        while let Some(finished) = self.set.join_next().await {
            Self::report(finished);
        }
    }

    /// Aborts whatever is still running and returns how many commands were
    /// cut short.
    pub async fn cancel(&mut self) -> usize {
        self.set.abort_all();
        let mut cancelled = 0;
        while let Some(finished) = self.set.join_next().await {
            match finished {
                Err(e) if e.is_cancelled() => cancelled += 1,
                other => Self::report(other),
            }
        }
        cancelled
    }

    fn report(finished: Result<(), JoinError>) {
        if let Err(e) = finished {
            if e.is_panic() {
                tracing::error!(error = ?e, "command panicked");
            }
        }
    }
}
