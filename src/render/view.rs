use super::config::ViewConfig;
use super::plan::RenderPlan;
use super::plan::Tile;
use crate::reconcile::Slot;
use crate::table::Card;
use crate::table::Suit;
use colored::Colorize;

const RULE_WIDTH: usize = 64;

/// Turns a render plan into terminal text. Painting is pure string
/// building so every layout decision is testable without a terminal;
/// the screen driver owns the actual writes.
#[derive(Clone)]
pub struct View {
    config: ViewConfig,
}

impl View {
    pub fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The whole grid, one block per slot in fixed slot order.
    pub fn paint(&self, plan: &RenderPlan) -> String {
        let mut out = String::new();
        out.push_str(&self.banner(plan));
        out.push('\n');
        for slot_plan in &plan.slots {
            match &slot_plan.tile {
                Some(tile) => out.push_str(&self.tile(slot_plan.slot, tile)),
                None => out.push_str(&self.placeholder(slot_plan.slot)),
            }
            out.push('\n');
        }
        out
    }

    fn banner(&self, plan: &RenderPlan) -> String {
        let count = match plan.occupancy() {
            1 => "1 table".to_string(),
            n => format!("{} tables", n),
        };
        let stamp = plan
            .tiles()
            .map(|(_, tile)| tile.table.last_update)
            .max()
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        let updated = match plan.refresh {
            true => format!("updated {}", stamp).black().on_yellow().to_string(),
            false => format!("updated {}", stamp).dimmed().to_string(),
        };
        format!("{}  {}  {}", "railbird".bold(), count, updated)
    }

    fn rule(&self, title: String) -> String {
        let used = title.chars().count();
        format!("{}{}", title, "─".repeat(RULE_WIDTH.saturating_sub(used)))
    }

    fn placeholder(&self, slot: Slot) -> String {
        let head = self.rule(format!("── {} ", slot));
        format!("{}\n {}\n", head, "waiting for table".dimmed())
    }

    fn tile(&self, slot: Slot, tile: &Tile) -> String {
        let table = &tile.table;
        let head = self.rule(format!("── {} ─ {} @ {} ", slot, table.window, table.origin));
        let mut out = format!("{}\n", head);
        out.push_str(&section(
            "hand",
            cards(&table.player_cards),
            tile.fresh.cards,
        ));
        if self.config.show_table_cards {
            let street = table
                .street()
                .map(|s| format!("  ({})", s))
                .unwrap_or_default();
            out.push_str(&section(
                "board",
                format!("{}{}", cards(&table.table_cards), street),
                tile.fresh.board,
            ));
        }
        if self.config.show_positions {
            out.push_str(&section("seats", seats(tile), tile.fresh.seats));
        }
        if self.config.show_moves {
            out.push_str(&section("moves", moves(tile), tile.fresh.moves));
        }
        if self.config.show_solver_link {
            if let Some(link) = &table.solver_link {
                out.push_str(&section("solver", link.clone(), tile.fresh.link));
            }
        }
        out
    }
}

fn section(label: &str, body: String, lit: bool) -> String {
    let body = match body.is_empty() {
        true => "-".dimmed().to_string(),
        false => body,
    };
    let body = match lit {
        true => body.black().on_yellow().to_string(),
        false => body,
    };
    format!(" {:<7}{}\n", label, body)
}

fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(tinted)
        .collect::<Vec<_>>()
        .join(" ")
}

fn tinted(card: &Card) -> String {
    let text = card.pretty();
    match card.suit() {
        Some(Suit::Heart) => text.red().to_string(),
        Some(Suit::Diamond) => text.blue().to_string(),
        Some(Suit::Club) => text.green().to_string(),
        _ => text,
    }
}

fn seats(tile: &Tile) -> String {
    let mut seats = tile.table.seats.clone();
    seats.sort_by_key(|seat| seat.player);
    seats
        .iter()
        .map(|seat| {
            let hero = if seat.is_hero() { "*" } else { "" };
            format!("{} {}{}", seat.player, seat.name, hero)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn moves(tile: &Tile) -> String {
    tile.table
        .moves_by_street()
        .into_iter()
        .map(|(street, moves)| {
            let plays = moves
                .iter()
                .map(|m| format!("{} {}", m.position, m.action))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", street, plays)
        })
        .collect::<Vec<_>>()
        .join("  |  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Fresh;
    use crate::render::SlotPlan;
    use crate::table::Move;
    use crate::table::MoveRecord;
    use crate::table::Position;
    use crate::table::Seat;
    use crate::table::Street;
    use crate::table::Table;

    fn plain() -> View {
        colored::control::set_override(false);
        View::new(ViewConfig::default())
    }

    fn planned(table: Table, fresh: Fresh) -> RenderPlan {
        let mut plan = RenderPlan::waiting();
        plan.slots[0].tile = Some(Tile { table, fresh });
        plan.refresh = true;
        plan
    }

    fn sighting() -> Table {
        let mut table = Table::sighted("rig-a", "Aurora");
        table.player_cards = vec![Card::new("AS"), Card::new("KH")];
        table.table_cards = vec![Card::new("QD"), Card::new("JC"), Card::new("2S")];
        table.seats = vec![Seat::new(2, "SB"), Seat::new(1, "BTN")];
        table.moves = vec![MoveRecord::new(Street::Preflop, Position::Early, Move::Raise)];
        table.solver_link = Some("https://example.test/strategy".to_string());
        table
    }

    #[test]
    fn active_tile_shows_every_section() {
        let view = plain();
        let text = view.paint(&planned(sighting(), Fresh::none()));
        assert!(text.contains("── 01 ─ Aurora @ rig-a"));
        assert!(text.contains("A♠ K♥"));
        assert!(text.contains("(flop)"));
        assert!(text.contains("1 BTN*  2 SB"));
        assert!(text.contains("preflop: EP raise"));
        assert!(text.contains("https://example.test/strategy"));
    }

    #[test]
    fn unfilled_slots_paint_the_placeholder() {
        let view = plain();
        let text = view.paint(&planned(sighting(), Fresh::none()));
        assert!(text.contains("── 02 ─"));
        assert_eq!(text.matches("waiting for table").count(), 5);
    }

    #[test]
    fn config_gates_optional_sections() {
        colored::control::set_override(false);
        let view = View::new(ViewConfig {
            show_table_cards: false,
            show_positions: false,
            show_moves: false,
            show_solver_link: false,
            ..ViewConfig::default()
        });
        let text = view.paint(&planned(sighting(), Fresh::none()));
        assert!(text.contains("hand"));
        assert!(!text.contains("board"));
        assert!(!text.contains("seats"));
        assert!(!text.contains("moves"));
        assert!(!text.contains("solver"));
    }

    #[test]
    fn seats_print_in_player_order_with_hero_mark() {
        let view = plain();
        let text = view.paint(&planned(sighting(), Fresh::none()));
        let seats_at = text.find("1 BTN*").unwrap();
        let small_at = text.find("2 SB").unwrap();
        assert!(seats_at < small_at);
    }

    #[test]
    fn banner_counts_tables() {
        let view = plain();
        assert!(view.paint(&RenderPlan::waiting()).contains("0 tables"));
        assert!(view
            .paint(&planned(sighting(), Fresh::none()))
            .contains("1 table"));
    }

    #[test]
    fn painting_is_stable_for_equal_plans() {
        let view = plain();
        let plan = planned(sighting(), Fresh::all());
        assert_eq!(view.paint(&plan), view.paint(&plan.clone()));
    }
}
