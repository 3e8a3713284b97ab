//! Observable state primitives for the screen flows.
//!
//! A flow owns its state in a [`StateCell`]; the presentation side reads
//! snapshots or subscribes for updates. Terminal submit outcomes travel over
//! a [`Signal`], which suppresses consecutive duplicates and replays the last
//! distinct value to any late subscriber.

use tokio::sync::watch;

/// Single-writer snapshot container. Every `update` notifies subscribers;
/// `get` clones the current value.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// New receivers start at the current value and wake on every update.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// One-shot boolean outcome channel. Starts at `false`. Emitting the value
/// already held is a no-op, so observers only ever wake on a change and can
/// navigate away on the first `true`.
#[derive(Debug)]
pub struct Signal {
    tx: watch::Sender<bool>,
}

impl Signal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    pub fn emit(&self, value: bool) {
        self.tx.send_if_modified(|cur| {
            if *cur == value {
                false
            } else {
                *cur = value;
                true
            }
        });
    }

    /// Last distinct value emitted (the value a fresh subscriber sees).
    pub fn last(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}
