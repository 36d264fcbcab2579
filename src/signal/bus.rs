use std::collections::BTreeMap;

use crate::foundation::core::BindingId;

/// Key identifying one channel on a signal bus.
///
/// Keys form an open, host-defined namespace. "No subscription" is expressed
/// as `Option<SignalKey>` at the configuration boundary rather than a
/// sentinel key.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SignalKey(String);

impl SignalKey {
    /// Create a key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Key name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SignalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pub/sub scalar value broadcaster consumed by external-signal bindings.
///
/// Producers publish once per frame, strictly before binding ticks run;
/// bindings then pull the current value during their tick. Registration is
/// key-based and weak: the bus never owns a binding. Both registration
/// operations are idempotent.
pub trait SignalBus {
    /// Subscribe a binding to a key. Registering twice must not duplicate.
    fn register_callback(&mut self, key: &SignalKey, subscriber: BindingId);

    /// Drop all subscriptions held by a binding. A no-op when none exist.
    fn unregister_all(&mut self, subscriber: BindingId);

    /// Current value published under a key (0.0 when never published).
    fn value(&self, key: &SignalKey) -> f64;
}

/// Single-threaded in-memory [`SignalBus`].
#[derive(Debug, Default)]
pub struct MemorySignalBus {
    values: BTreeMap<SignalKey, f64>,
    subscribers: BTreeMap<SignalKey, Vec<BindingId>>,
}

impl MemorySignalBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a value under a key.
    pub fn publish(&mut self, key: &SignalKey, value: f64) {
        self.values.insert(key.clone(), value);
    }

    /// Number of distinct subscribers on a key.
    pub fn subscriber_count(&self, key: &SignalKey) -> usize {
        self.subscribers.get(key).map_or(0, Vec::len)
    }
}

impl SignalBus for MemorySignalBus {
    fn register_callback(&mut self, key: &SignalKey, subscriber: BindingId) {
        let subs = self.subscribers.entry(key.clone()).or_default();
        if !subs.contains(&subscriber) {
            subs.push(subscriber);
        }
    }

    fn unregister_all(&mut self, subscriber: BindingId) {
        for subs in self.subscribers.values_mut() {
            subs.retain(|s| *s != subscriber);
        }
    }

    fn value(&self, key: &SignalKey) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}
