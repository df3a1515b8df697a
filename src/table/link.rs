use super::table::Table;

/// Strategy explorer the viewer deep-links into.
pub const SOLVER_BASE: &str = "https://app.flophero.com/omaha/cash/strategies";

/// Build the solver deep link for a table's current hand: fixed cash
/// game parameters, the live player count, the board as rank plus
/// lowercase suit, and per-street action strings joined by
/// underscores. Empty sections are left off the query entirely.
pub fn flophero(table: &Table) -> String {
    let mut url = url::Url::parse(SOLVER_BASE).expect("solver base url");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("research", "full_tree");
        query.append_pair("site", "GGPoker");
        query.append_pair("bb", "10");
        query.append_pair("blindStructure", "Regular");
        query.append_pair("players", &table.active_seats().to_string());
        query.append_pair("openRaise", "3.5");
        query.append_pair("stack", "100");
        let board = table
            .table_cards
            .iter()
            .map(|c| c.code())
            .collect::<String>();
        if !board.is_empty() {
            query.append_pair("boardCards", &board);
        }
        for (street, moves) in table.moves_by_street() {
            let actions = moves
                .iter()
                .filter_map(|m| m.action.link_code())
                .collect::<Vec<_>>()
                .join("_");
            if !actions.is_empty() {
                query.append_pair(street.link_param(), &actions);
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Card;
    use crate::table::Move;
    use crate::table::MoveRecord;
    use crate::table::Position;
    use crate::table::Seat;
    use crate::table::Street;

    fn seated(table: &mut Table) {
        table.seats = vec![
            Seat::new(1, "BTN"),
            Seat::new(2, "SB"),
            Seat::new(3, "BB"),
            Seat::new(4, "EP"),
            Seat::new(5, "MP"),
            Seat::new(6, "CO"),
        ];
    }

    #[test]
    fn full_hand_link() {
        let mut table = Table::sighted("rig", "win");
        seated(&mut table);
        table.table_cards = vec![Card::new("4S"), Card::new("4D"), Card::new("AS")];
        table.moves = vec![
            MoveRecord::new(Street::Preflop, Position::Early, Move::Raise),
            MoveRecord::new(Street::Preflop, Position::Middle, Move::Call),
            MoveRecord::new(Street::Preflop, Position::Cutoff, Move::Fold),
            MoveRecord::new(Street::Preflop, Position::Button, Move::Call),
            MoveRecord::new(Street::Preflop, Position::Small, Move::Call),
            MoveRecord::new(Street::Preflop, Position::Big, Move::Check),
            MoveRecord::new(Street::Flop, Position::Small, Move::Check),
            MoveRecord::new(Street::Flop, Position::Big, Move::Check),
        ];
        let link = flophero(&table);
        assert_eq!(
            link,
            "https://app.flophero.com/omaha/cash/strategies\
             ?research=full_tree&site=GGPoker&bb=10&blindStructure=Regular\
             &players=6&openRaise=3.5&stack=100\
             &boardCards=4s4dAs&preflopActions=r35_c_f_c_c_c&flopActions=c_c"
        );
    }

    #[test]
    fn preflop_link_has_no_board_parameter() {
        let mut table = Table::sighted("rig", "win");
        seated(&mut table);
        let link = flophero(&table);
        assert!(!link.contains("boardCards"));
        assert!(!link.contains("preflopActions"));
        assert!(link.contains("players=6"));
    }

    #[test]
    fn player_count_follows_recognized_seats() {
        let mut table = Table::sighted("rig", "win");
        table.seats = vec![
            Seat::new(1, "BTN"),
            Seat::new(2, "SB"),
            Seat::new(3, "NO"),
        ];
        assert!(flophero(&table).contains("players=2"));
    }

    #[test]
    fn unlinkable_moves_drop_out() {
        let mut table = Table::sighted("rig", "win");
        seated(&mut table);
        table.moves = vec![
            MoveRecord::new(Street::Preflop, Position::Early, Move::Show),
            MoveRecord::new(Street::Preflop, Position::Big, Move::Muck),
        ];
        assert!(!flophero(&table).contains("preflopActions"));
    }
}
