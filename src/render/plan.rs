use crate::reconcile::Slot;
use crate::table::Table;

/// Which sections of a tile changed since the last paint. Highlights
/// are paint hints only; they decay in bulk on a timer and never feed
/// back into reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fresh {
    pub cards: bool,
    pub board: bool,
    pub seats: bool,
    pub moves: bool,
    pub link: bool,
}

impl Fresh {
    pub fn none() -> Self {
        Self::default()
    }
    pub fn all() -> Self {
        Self {
            cards: true,
            board: true,
            seats: true,
            moves: true,
            link: true,
        }
    }
    /// Section-by-section comparison of the same table across two
    /// passes. The sighting timestamp is bookkeeping, not content, so
    /// it never lights a section on its own.
    pub fn between(old: &Table, new: &Table) -> Self {
        Self {
            cards: old.player_cards != new.player_cards,
            board: old.table_cards != new.table_cards || old.street() != new.street(),
            seats: old.seats != new.seats,
            moves: old.moves != new.moves,
            link: old.solver_link != new.solver_link,
        }
    }
    pub fn any(&self) -> bool {
        self.cards || self.board || self.seats || self.moves || self.link
    }
}

/// A table placed at a slot, with its highlight hints.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub table: Table,
    pub fresh: Fresh,
}

/// One grid position: either a live table or the waiting placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlan {
    pub slot: Slot,
    pub tile: Option<Tile>,
}

/// Everything a presentation layer needs to repaint the whole grid:
/// one entry per slot in fixed paint order, plus whether the global
/// update indicator should flash. Applying a plan is a full replace
/// of every slot, which makes repaints idempotent by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub slots: Vec<SlotPlan>,
    pub refresh: bool,
}

impl RenderPlan {
    /// The startup frame: every slot waiting, nothing lit.
    pub fn waiting() -> Self {
        Self {
            slots: Slot::all().map(|slot| SlotPlan { slot, tile: None }).collect(),
            refresh: false,
        }
    }
    pub fn tiles(&self) -> impl Iterator<Item = (&SlotPlan, &Tile)> {
        self.slots
            .iter()
            .filter_map(|plan| plan.tile.as_ref().map(|tile| (plan, tile)))
    }
    pub fn occupancy(&self) -> usize {
        self.slots.iter().filter(|plan| plan.tile.is_some()).count()
    }
    /// Any highlight still lit, banner included.
    pub fn glowing(&self) -> bool {
        self.refresh || self.tiles().any(|(_, tile)| tile.fresh.any())
    }
    /// The same grid with every highlight cleared at once. Fade is a
    /// bulk operation across all slots, not a per-tile countdown.
    pub fn faded(&self) -> Self {
        Self {
            slots: self
                .slots
                .iter()
                .map(|plan| SlotPlan {
                    slot: plan.slot,
                    tile: plan.tile.as_ref().map(|tile| Tile {
                        table: tile.table.clone(),
                        fresh: Fresh::none(),
                    }),
                })
                .collect(),
            refresh: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Card;
    use crate::table::Street;

    #[test]
    fn waiting_grid_is_full_width_and_dark() {
        let plan = RenderPlan::waiting();
        assert_eq!(plan.slots.len(), crate::GRID_CAPACITY);
        assert_eq!(plan.occupancy(), 0);
        assert!(!plan.glowing());
    }

    #[test]
    fn sections_light_independently() {
        let old = Table::sighted("rig", "win");
        let mut new = old.clone();
        new.player_cards = vec![Card::new("AS")];
        let fresh = Fresh::between(&old, &new);
        assert!(fresh.cards);
        assert!(!fresh.board);
        assert!(!fresh.seats);
        assert!(fresh.any());
    }

    #[test]
    fn street_change_lights_the_board() {
        let old = Table::sighted("rig", "win");
        let mut new = old.clone();
        new.street = Some(Street::Turn);
        assert!(Fresh::between(&old, &new).board);
    }

    #[test]
    fn timestamp_alone_lights_nothing() {
        let old = Table::sighted("rig", "win");
        let mut new = old.clone();
        new.last_update = new.last_update + chrono::Duration::seconds(5);
        assert!(!Fresh::between(&old, &new).any());
    }

    #[test]
    fn fade_clears_every_highlight_at_once() {
        let mut plan = RenderPlan::waiting();
        plan.refresh = true;
        plan.slots[2].tile = Some(Tile {
            table: Table::sighted("rig", "win"),
            fresh: Fresh::all(),
        });
        assert!(plan.glowing());
        let faded = plan.faded();
        assert!(!faded.glowing());
        assert_eq!(faded.occupancy(), 1);
        assert_eq!(faded.faded(), faded);
    }
}
