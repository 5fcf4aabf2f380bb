//! Concurrency-safe accumulator for endpoint descriptors.

use std::fmt;
use std::sync::Mutex;

use tracing::{debug, warn};

use bridge_primitives::EndpointDescriptor;

/// Ordered set of endpoint descriptors with identity-triple deduplication.
///
/// Insertion order is preserved so repeated discovery rounds produce the same
/// batch. All operations take the same lock; readers get an independent
/// point-in-time copy via [`snapshot`](Self::snapshot).
#[derive(Default)]
pub struct EndpointCollector {
    inner: Mutex<Vec<EndpointDescriptor>>,
}

impl fmt::Debug for EndpointCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock().expect("endpoint collector poisoned");
        let names: Vec<_> = inner.iter().map(|d| d.name().to_owned()).collect();
        f.debug_struct("EndpointCollector")
            .field("collected", &names)
            .finish()
    }
}

impl EndpointCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor, returning `true` when it was stored.
    ///
    /// Descriptors without a path are discarded, and a descriptor whose
    /// (name, path, method) triple is already present is a logged no-op.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn add(&self, descriptor: EndpointDescriptor) -> bool {
        if descriptor.path().is_empty() {
            warn!(
                name = descriptor.name(),
                "discarding endpoint descriptor without a path"
            );
            return false;
        }

        let mut inner = self.inner.lock().expect("endpoint collector poisoned");
        let identity = descriptor.identity();
        if inner.iter().any(|existing| existing.identity() == identity) {
            debug!(
                name = descriptor.name(),
                path = descriptor.path(),
                method = %descriptor.method(),
                "duplicate endpoint registration ignored"
            );
            return false;
        }

        inner.push(descriptor);
        true
    }

    /// Returns an independent copy of the collected descriptors, safe to
    /// iterate while further adds occur.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EndpointDescriptor> {
        self.inner
            .lock()
            .expect("endpoint collector poisoned")
            .clone()
    }

    /// Removes every collected descriptor.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn clear(&self) {
        self.inner
            .lock()
            .expect("endpoint collector poisoned")
            .clear();
    }

    /// Returns the number of collected descriptors.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("endpoint collector poisoned").len()
    }

    /// Returns `true` when nothing has been collected.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
