use super::ledger::Ledger;
use super::slot::Slot;
use super::store::Store;
use super::usher::Usher;
use crate::render::Fresh;
use crate::render::RenderPlan;
use crate::render::SlotPlan;
use crate::render::Tile;
use crate::table::Snapshot;
use crate::table::Table;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// One viewer's reconciliation state: the identity ledger behind an
/// usher, plus the last applied pass. Constructed once per session and
/// handed every delivery; there is no other mutable state anywhere in
/// the pipeline. Reset only on an explicit clear-identities action.
pub struct Session<S: Store> {
    usher: Usher<S>,
    previous: Option<Snapshot>,
}

impl<S: Store> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            usher: Usher::new(store),
            previous: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        self.usher.ledger()
    }

    /// Fold one pass into the grid. Returns the plan to paint, or
    /// `None` when the pass matches the applied state and the grid
    /// should be left exactly as it stands.
    ///
    /// Order inside a pass: eviction first, then assignment, so a slot
    /// freed this pass is never reissued within it; reuse waits for
    /// the counter. Detections sharing a key collapse to the later
    /// one. Keys beyond grid capacity are skipped this pass and may be
    /// seated on a later one once eviction frees room.
    pub fn reconcile(&mut self, snapshot: Snapshot) -> Option<RenderPlan> {
        if let Some(previous) = &self.previous {
            if !snapshot.changed_from(previous) {
                log::debug!("pass unchanged, leaving the grid alone");
                return None;
            }
        }
        let active = snapshot.keys().collect::<HashSet<_>>();
        self.usher.cleanup(&active);
        let mut placed: BTreeMap<Slot, &Table> = BTreeMap::new();
        for table in &snapshot.detections {
            match self.usher.assign(&table.key()) {
                Some(slot) => {
                    placed.insert(slot, table);
                }
                None => log::warn!("grid full, {} not shown this pass", table.key()),
            }
        }
        let slots = Slot::all()
            .map(|slot| SlotPlan {
                slot,
                tile: placed.get(&slot).map(|table| Tile {
                    table: (*table).clone(),
                    fresh: self.freshness(table),
                }),
            })
            .collect();
        let plan = RenderPlan {
            slots,
            refresh: true,
        };
        self.previous = Some(snapshot);
        Some(plan)
    }

    /// Highlight hints for one tile: nothing on the session's first
    /// paint, everything for a table new to the grid, and otherwise
    /// whichever sections differ from the previous pass's same key.
    fn freshness(&self, table: &Table) -> Fresh {
        match &self.previous {
            None => Fresh::none(),
            Some(previous) => match previous.tables(&table.key()).last() {
                None => Fresh::all(),
                Some(old) => Fresh::between(old, table),
            },
        }
    }

    /// The clear-identities action: drop the ledger, the counter, and
    /// the applied state. The next pass paints as a first delivery.
    pub fn reset(&mut self) {
        self.usher.reset();
        self.previous = None;
    }
}
