//! Termination signal watcher.
//!
//! SIGINT/SIGTERM end the process immediately with status 0. In-flight poll
//! cycles and HTTP requests are not drained.

use std::fmt;

use tokio::task::JoinHandle;
use tracing::info;

/// Signal that triggered shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT (Ctrl+C)
    Interrupt,
    /// SIGTERM
    Terminate,
}

impl ShutdownSignal {
    /// Conventional signal name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Watches for termination signals.
///
/// Handlers are installed in [`ShutdownWatcher::install`], so a signal that
/// arrives before [`ShutdownWatcher::recv`] is polled is not lost.
#[derive(Debug)]
pub struct ShutdownWatcher {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownWatcher {
    /// Install signal handlers.
    #[cfg(unix)]
    pub fn install() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Install signal handlers.
    #[cfg(not(unix))]
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the next termination signal.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> ShutdownSignal {
        tokio::select! {
            _ = self.interrupt.recv() => ShutdownSignal::Interrupt,
            _ = self.terminate.recv() => ShutdownSignal::Terminate,
        }
    }

    /// Wait for the next termination signal.
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> ShutdownSignal {
        // Only Ctrl+C is observable here.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        ShutdownSignal::Interrupt
    }

    /// Spawn a task that exits the process on the first signal.
    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let signal = self.recv().await;
            info!("Received {}, exiting", signal);
            std::process::exit(0);
        })
    }
}
