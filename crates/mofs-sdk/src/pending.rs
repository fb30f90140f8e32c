//! Results delivered later by the host.
//!
//! Some operations (a document picker, a share sheet) finish outside the
//! call that started them. The caller registers a slot, hands its token to
//! the host, and awaits the [`PendingResult`]; the host later completes or
//! cancels the slot by token.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;
use uuid::Uuid;

/// The slot was cancelled or dropped before a value arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pending result {token} was cancelled")]
pub struct Cancelled {
    pub token: Uuid,
}

/// Awaits the value for one registered token.
#[derive(Debug)]
pub struct PendingResult<T> {
    token: Uuid,
    rx: oneshot::Receiver<T>,
}

impl<T> PendingResult<T> {
    pub fn token(&self) -> Uuid {
        self.token
    }
}

impl<T> Future for PendingResult<T> {
    type Output = Result<T, Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let token = self.token;
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.map_err(|_| Cancelled { token }))
    }
}

/// Outstanding slots, keyed by token.
#[derive(Debug)]
pub struct PendingResults<T> {
    slots: Mutex<HashMap<Uuid, oneshot::Sender<T>>>,
}

impl<T> PendingResults<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Open a slot. Tokens are time-ordered.
    pub fn register(&self) -> (Uuid, PendingResult<T>) {
        let token = Uuid::now_v7();
        let (tx, rx) = oneshot::channel();
        self.slots.lock().expect("lock poisoned").insert(token, tx);
        debug!(%token, "pending result registered");
        (token, PendingResult { token, rx })
    }

    /// Deliver `value`. Returns `false` if the token is unknown or its
    /// waiter has gone away.
    pub fn complete(&self, token: &Uuid, value: T) -> bool {
        let Some(tx) = self.slots.lock().expect("lock poisoned").remove(token) else {
            return false;
        };
        tx.send(value).is_ok()
    }

    /// Drop the slot; its waiter resolves to [`Cancelled`].
    pub fn cancel(&self, token: &Uuid) -> bool {
        let removed = self.slots.lock().expect("lock poisoned").remove(token).is_some();
        if removed {
            debug!(%token, "pending result cancelled");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.slots.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PendingResults<T> {
    fn default() -> Self {
        Self::new()
    }
}
