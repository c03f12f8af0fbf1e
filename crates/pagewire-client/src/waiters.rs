use std::sync::mpsc::SyncSender;
use std::sync::Mutex;

use pagewire_frame::Response;
use tracing::warn;

/// One side of a single-use handoff. The dispatch loop resolves it exactly
/// once: a decoded reply, or `None` when the client shut down first.
pub(crate) type Waiter = SyncSender<Option<Response>>;

/// Fixed-capacity table mapping sequence numbers to pending waiters.
///
/// At most one in-flight request occupies a sequence number at a time. The
/// request path registers, the dispatch loop takes; a single mutex over the
/// slots keeps the two from racing.
pub(crate) struct WaiterTable {
    slots: Mutex<Vec<Option<Waiter>>>,
}

impl WaiterTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new((0..capacity).map(|_| None).collect()),
        }
    }

    /// Install a waiter at `seq`.
    ///
    /// A waiter already present is displaced: last registration wins, which
    /// is the protocol's wrap-around collision rule. Dropping the displaced
    /// sender resolves that caller with "no response" rather than leaving it
    /// blocked.
    pub fn register(&self, seq: u8, waiter: Waiter) {
        let mut slots = self.slots.lock().expect("waiter table poisoned");
        if slots[usize::from(seq)].replace(waiter).is_some() {
            warn!(seq, "sequence number collision; displacing pending request");
        }
    }

    /// Remove and return the waiter at `seq`. Idempotent once taken.
    pub fn take(&self, seq: u8) -> Option<Waiter> {
        let mut slots = self.slots.lock().expect("waiter table poisoned");
        slots.get_mut(usize::from(seq)).and_then(Option::take)
    }

    /// Remove and return every registered waiter. Shutdown only.
    pub fn drain_all(&self) -> Vec<Waiter> {
        let mut slots = self.slots.lock().expect("waiter table poisoned");
        slots.iter_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn take_is_idempotent() {
        let table = WaiterTable::new(100);
        let (tx, _rx) = mpsc::sync_channel(1);

        table.register(17, tx);
        assert!(table.take(17).is_some());
        assert!(table.take(17).is_none());
    }

    #[test]
    fn take_of_unregistered_slot_is_empty() {
        let table = WaiterTable::new(100);
        assert!(table.take(0).is_none());
    }

    #[test]
    fn register_displaces_previous_waiter() {
        let table = WaiterTable::new(100);
        let (first_tx, first_rx) = mpsc::sync_channel::<Option<Response>>(1);
        let (second_tx, _second_rx) = mpsc::sync_channel(1);

        table.register(5, first_tx);
        table.register(5, second_tx);

        // The displaced sender is gone; its receiver resolves immediately.
        assert!(first_rx.recv().is_err());
        assert!(table.take(5).is_some());
        assert!(table.take(5).is_none());
    }

    #[test]
    fn drain_all_empties_the_table() {
        let table = WaiterTable::new(100);
        let mut receivers = Vec::new();
        for seq in [3u8, 47, 99] {
            let (tx, rx) = mpsc::sync_channel(1);
            table.register(seq, tx);
            receivers.push(rx);
        }

        let drained = table.drain_all();
        assert_eq!(drained.len(), 3);
        assert!(table.drain_all().is_empty());
        assert!(table.take(47).is_none());
    }
}
