use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

use vaultdesk_core::account::StoreEvent;

/// A `loading` boolean with a guaranteed reset.
///
/// `begin` sets the flag and returns a guard that clears it when dropped,
/// so early returns through `?` release it as well. Overlapping calls
/// share the flag: it reflects whichever call finished last.
pub(crate) struct LoadingFlag {
    flag: AtomicBool,
    events: broadcast::Sender<StoreEvent>,
    event: fn(bool) -> StoreEvent,
}

impl LoadingFlag {
    pub(crate) fn new(events: broadcast::Sender<StoreEvent>, event: fn(bool) -> StoreEvent) -> Self {
        Self {
            flag: AtomicBool::new(false),
            events,
            event,
        }
    }

    pub(crate) fn begin(&self) -> LoadingGuard<'_> {
        self.set(true);
        LoadingGuard(self)
    }

    pub(crate) fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn set(&self, loading: bool) {
        self.flag.store(loading, Ordering::SeqCst);
        let _ = self.events.send((self.event)(loading));
    }
}

pub(crate) struct LoadingGuard<'a>(&'a LoadingFlag);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
