//! Request generations per client context.
//!
//! Every context (one service panel in the UI, say) owns a generation counter. Starting a
//! request or resetting the context advances it; any in-flight request still tagged with an
//! older generation is dropped at its next await point and reports [`Superseded`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("request superseded by generation {current}")]
pub struct Superseded {
    pub current: u64,
}

/// Generations are drawn from one tracker-wide counter, so a context that was evicted
/// while idle never reuses a number it handed out before.
#[derive(Default)]
struct Contexts {
    last_generation: u64,
    senders: HashMap<String, watch::Sender<u64>>,
}

impl Contexts {
    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }
}

/// Only contexts with a request in flight are tracked; an entry goes away with its
/// last receiver.
#[derive(Default)]
pub struct RequestTracker {
    contexts: Mutex<Contexts>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the context's generation, invalidating whatever is in flight for it.
    pub fn advance(&self, context: &str) -> u64 {
        let mut contexts = self.lock();
        let generation = contexts.next_generation();
        if let Some(sender) = contexts.senders.get(context) {
            sender.send_replace(generation);
        }
        generation
    }

    /// Runs `work` as the newest request of `context`.
    ///
    /// Returns `Err(Superseded)` if the context moved on before `work` finished; `work`
    /// is dropped in that case rather than polled to completion.
    pub async fn run<F, T>(&self, context: &str, work: F) -> Result<T, Superseded>
    where
        F: Future<Output = T>,
    {
        // Declared before the receiver so it drops after it, including when this future
        // is itself dropped mid-flight.
        let _release = Release {
            tracker: self,
            context,
        };
        let (generation, mut rx) = self.begin(context);

        tokio::select! {
            output = work => {
                let current = *rx.borrow();
                if current == generation {
                    Ok(output)
                } else {
                    Err(Superseded { current })
                }
            }
            current = wait_for_newer(&mut rx, generation) => {
                debug!(context, generation, current, "Dropping superseded request");
                Err(Superseded { current })
            }
        }
    }

    fn begin(&self, context: &str) -> (u64, watch::Receiver<u64>) {
        let mut contexts = self.lock();
        let generation = contexts.next_generation();
        let sender = contexts
            .senders
            .entry(context.to_string())
            .or_insert_with(|| watch::channel(generation).0);
        sender.send_replace(generation);
        let rx = sender.subscribe();
        (generation, rx)
    }

    fn release(&self, context: &str) {
        let mut contexts = self.lock();
        let idle = contexts
            .senders
            .get(context)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if idle {
            contexts.senders.remove(context);
        }
    }

    // The lock is never held across an await, and the map stays consistent even if a
    // holder panicked, so poisoning is ignored.
    fn lock(&self) -> std::sync::MutexGuard<'_, Contexts> {
        self.contexts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Release<'a> {
    tracker: &'a RequestTracker,
    context: &'a str,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.tracker.release(self.context);
    }
}

async fn wait_for_newer(rx: &mut watch::Receiver<u64>, generation: u64) -> u64 {
    loop {
        let current = *rx.borrow_and_update();
        if current != generation {
            return current;
        }
        if rx.changed().await.is_err() {
            // The sender lives until its last receiver is gone; nothing newer can arrive.
            std::future::pending::<()>().await;
        }
    }
}
