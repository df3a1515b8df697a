//! Hub Server Binary
//!
//! Aggregates detector reports into one floor and serves it to viewers
//! over conditional HTTP, an event stream, and WebSocket.

use clap::Parser;
use railbird::*;

#[derive(Parser, Debug)]
#[command(name = "hub")]
struct Args {
    /// Leave board cards out of served views.
    #[arg(long)]
    hide_table_cards: bool,
    /// Leave seat positions out of served views.
    #[arg(long)]
    hide_positions: bool,
    /// Leave action history out of served views.
    #[arg(long)]
    hide_moves: bool,
    /// Leave solver links out of served views.
    #[arg(long)]
    hide_solver_link: bool,
}

#[tokio::main]
async fn main() {
    log();
    kys();
    let args = Args::parse();
    let mut config = render::ViewConfig::from_env();
    config.show_table_cards = !args.hide_table_cards;
    config.show_positions = !args.hide_positions;
    config.show_moves = !args.hide_moves;
    config.show_solver_link = !args.hide_solver_link;
    hub::Hub::run(config).await.unwrap();
}
