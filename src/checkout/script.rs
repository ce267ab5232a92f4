use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;

/// Hosted checkout script published by the payment provider.
pub const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Handle to one injected script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptLoadError {
    #[error("script could not be injected: {0}")]
    Injection(String),

    #[error("script failed to load: {0}")]
    Network(String),

    #[error("script host dropped the load signal")]
    Abandoned,
}

/// Completion signal handed to the host with each injected script.
///
/// Either method consumes the notifier, so a script settles at most once.
/// Settling after the loader is gone is a no-op.
#[derive(Debug)]
pub struct LoadNotifier {
    tx: oneshot::Sender<Result<(), String>>,
}

impl LoadNotifier {
    pub fn loaded(self) {
        if self.tx.send(Ok(())).is_err() {
            tracing::debug!("script loaded after checkout was unmounted");
        }
    }

    pub fn failed(self, reason: impl Into<String>) {
        if self.tx.send(Err(reason.into())).is_err() {
            tracing::debug!("script failed after checkout was unmounted");
        }
    }
}

/// The page document, as far as checkout is concerned.
pub trait ScriptHost: Send + Sync {
    /// Append an async `<script src=..>` element to the document body and
    /// report load or error through `notifier`.
    fn inject(&self, src: &str, notifier: LoadNotifier) -> Result<ScriptId, ScriptLoadError>;

    /// Remove a previously injected element.
    fn remove(&self, id: ScriptId);
}

/// Removes its script element when dropped.
struct ScriptGuard {
    host: Arc<dyn ScriptHost>,
    id: ScriptId,
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        tracing::debug!(script = self.id.0, "removing checkout script");
        self.host.remove(self.id);
    }
}

/// Loads the checkout script at most once for the lifetime of one mount.
///
/// The injected element lives as long as the loader; dropping the loader
/// removes it regardless of how far the checkout got.
pub struct ScriptLoader {
    host: Arc<dyn ScriptHost>,
    src: String,
    guard: Option<ScriptGuard>,
    pending: Option<oneshot::Receiver<Result<(), String>>>,
    loaded: bool,
}

impl ScriptLoader {
    pub fn new(host: Arc<dyn ScriptHost>, src: impl Into<String>) -> Self {
        Self {
            host,
            src: src.into(),
            guard: None,
            pending: None,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_injected(&self) -> bool {
        self.guard.is_some()
    }

    pub async fn ensure_loaded(&mut self) -> Result<(), ScriptLoadError> {
        if self.loaded {
            return Ok(());
        }

        if self.guard.is_none() {
            let (tx, rx) = oneshot::channel();
            let id = self.host.inject(&self.src, LoadNotifier { tx })?;
            tracing::debug!(script = id.0, src = %self.src, "injected checkout script");
            self.guard = Some(ScriptGuard {
                host: Arc::clone(&self.host),
                id,
            });
            self.pending = Some(rx);
        }

        let Some(pending) = self.pending.as_mut() else {
            return Err(ScriptLoadError::Abandoned);
        };

        let result = match pending.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(ScriptLoadError::Network(reason)),
            Err(_) => Err(ScriptLoadError::Abandoned),
        };
        self.pending = None;

        match result {
            Ok(()) => {
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                // A failed element is useless; drop it so a retry injects fresh.
                self.guard = None;
                Err(err)
            }
        }
    }

    /// Remove the injected element now instead of waiting for drop.
    pub fn release(&mut self) {
        self.pending = None;
        self.guard = None;
        self.loaded = false;
    }
}
