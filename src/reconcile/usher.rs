use super::ledger::Ledger;
use super::slot::Slot;
use super::store::Store;
use crate::table::TableKey;
use crate::GRID_CAPACITY;
use std::collections::HashSet;

/// Seats table keys at grid slots. A key keeps its slot for as long as
/// it keeps appearing; slots free up only through `cleanup` and are
/// renamed by the rolling counter, never handed out twice at once.
pub struct Usher<S: Store> {
    ledger: Ledger,
    store: S,
}

impl<S: Store> Usher<S> {
    pub fn new(store: S) -> Self {
        let ledger = store.load();
        if !ledger.is_empty() {
            log::info!(
                "restored {} table identities, counter at {}",
                ledger.len(),
                ledger.next_id()
            );
        }
        Self { ledger, store }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Slot for this key. Known keys return their standing slot with
    /// no mutation and no write. New keys take the next free slot off
    /// the counter and the ledger is persisted before the slot is
    /// released to the caller, so a crash cannot show an id the store
    /// never heard of. A full grid seats nobody new.
    pub fn assign(&mut self, key: &TableKey) -> Option<Slot> {
        if let Some(slot) = self.ledger.get(key) {
            return Some(slot);
        }
        if self.ledger.len() >= GRID_CAPACITY {
            log::debug!("grid full, not seating {}", key);
            return None;
        }
        let mut counter = self.ledger.next_id();
        let slot = loop {
            let slot = Slot::from_counter(counter);
            if !self.ledger.occupied(slot) {
                break slot;
            }
            counter += 1;
        };
        self.ledger.seat(key.clone(), slot, counter);
        self.store.save(&self.ledger);
        log::debug!("seated {} at slot {}", key, slot);
        Some(slot)
    }

    /// Evict every key not sighted this pass. Runs before the pass's
    /// assignments so a slot freed here cannot collide with one handed
    /// out in the same pass. Persists only when something changed.
    pub fn cleanup(&mut self, active: &HashSet<TableKey>) -> bool {
        let cleaned = self.ledger.evict_absent(active);
        if cleaned {
            self.store.save(&self.ledger);
        }
        cleaned
    }

    /// Forget every identity and start the counter over. This is the
    /// explicit clear action, not part of any reconciliation pass.
    pub fn reset(&mut self) {
        self.ledger = Ledger::fresh();
        self.store.save(&self.ledger);
    }
}
