//! Detector Simulator Binary
//!
//! Plays a detection client against the hub: registers an origin,
//! reports evolving sightings for a handful of windows, and closes one
//! now and then, so viewers have something to rail without a real
//! detector running. Sightings carry raw site shorthand on purpose to
//! exercise normalization hub-side.

use clap::Parser;
use futures::SinkExt;
use futures::StreamExt;
use railbird::protocol::*;
use railbird::table::*;
use railbird::transport::Backoff;
use railbird::*;
use rand::prelude::*;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

const LABELS: [&str; 6] = ["BU", "SB", "BB", "UTG", "MP", "NO"];
const SHORTHAND: [&str; 8] = ["or_35", "limps", "c", "f", "x", "cb", "b", "all-in"];

#[derive(Parser, Debug)]
#[command(name = "simulate")]
struct Args {
    /// Hub base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    hub: String,
    /// Identity this simulated rig reports under.
    #[arg(long, default_value = "sim-rig")]
    origin: String,
    /// How many windows to keep open.
    #[arg(long, default_value_t = 3)]
    windows: usize,
    /// Seconds between reporting passes.
    #[arg(long, default_value_t = DEFAULT_CLIENT_INTERVAL)]
    interval: u64,
}

/// One fabricated table window playing hands forever.
struct Window {
    name: String,
    hand: Vec<Card>,
    board: Vec<Card>,
    moves: Vec<MoveWire>,
}

impl Window {
    fn open(n: usize) -> Self {
        let mut window = Self {
            name: format!("Table {}", n),
            hand: Vec::new(),
            board: Vec::new(),
            moves: Vec::new(),
        };
        window.redeal();
        window
    }

    fn redeal(&mut self) {
        self.hand = (0..4).map(|_| Card::random()).collect();
        self.board.clear();
        self.moves.clear();
        self.act(Street::Preflop);
    }

    /// Deal one street forward, or rack up and redeal past the river.
    fn advance(&mut self) {
        match self.board.len() {
            0 => {
                self.board.extend((0..3).map(|_| Card::random()));
                self.act(Street::Flop);
            }
            3 => {
                self.board.push(Card::random());
                self.act(Street::Turn);
            }
            4 => {
                self.board.push(Card::random());
                self.act(Street::River);
            }
            _ => self.redeal(),
        }
    }

    fn act(&mut self, street: Street) {
        let ref mut rng = rand::rng();
        self.moves.push(MoveWire {
            street,
            position: LABELS.choose(rng).expect("nonempty").to_string(),
            action: SHORTHAND.choose(rng).expect("nonempty").to_string(),
        });
    }

    fn sighting(&self, origin: &str) -> Sighting {
        let mut sighting = Sighting::default();
        sighting.player_cards = self.hand.clone();
        sighting.table_cards = self.board.clone();
        sighting.street = Street::infer(self.board.len());
        for (player, label) in LABELS.iter().enumerate() {
            sighting.positions.insert(
                (player + 1).to_string(),
                SeatName {
                    name: label.to_string(),
                },
            );
        }
        sighting.moves = self.moves.clone();
        let table = Table::from((origin, self.name.as_str(), sighting.clone()));
        sighting.solver_link = Some(link::flophero(&table));
        sighting
    }
}

#[tokio::main]
async fn main() {
    log();
    kys();
    let args = Args::parse();
    let url = format!(
        "{}/ws",
        args.hub
            .trim_end_matches('/')
            .replacen("http://", "ws://", 1)
            .replacen("https://", "wss://", 1)
    );
    let mut backoff = Backoff::new();
    let mut tables: Vec<Window> = Vec::new();
    let mut opened = 0;
    'rig: loop {
        let mut ws = match connect_async(&url).await {
            Ok((ws, _)) => ws,
            Err(e) => {
                log::warn!("hub unreachable: {}", e);
                tokio::time::sleep(backoff.wait()).await;
                continue 'rig;
            }
        };
        backoff.reset();
        let hello = ClientMessage::register(&args.origin, args.interval).to_json();
        if ws.send(Message::Text(hello)).await.is_err() {
            continue 'rig;
        }
        log::info!("registered {} at {}s cadence", args.origin, args.interval);
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(args.interval));
        'pass: loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if tables.len() > 1 && rand::random_range(0..8) == 0 {
                        let gone = tables.remove(rand::random_range(0..tables.len()));
                        let removal = ClientMessage::removal(&args.origin, vec![gone.name.clone()]);
                        if ws.send(Message::Text(removal.to_json())).await.is_err() {
                            break 'pass;
                        }
                        log::info!("closed window {:?}", gone.name);
                    }
                    while tables.len() < args.windows {
                        opened += 1;
                        tables.push(Window::open(opened));
                        log::info!("opened window \"Table {}\"", opened);
                    }
                    for table in tables.iter_mut() {
                        table.advance();
                        let update = ClientMessage::update(
                            &args.origin,
                            &table.name,
                            table.sighting(&args.origin),
                        );
                        if ws.send(Message::Text(update.to_json())).await.is_err() {
                            break 'pass;
                        }
                    }
                }
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => match text.parse::<Event>() {
                        Ok(Event::Response { status, message, .. }) => {
                            log::debug!("hub says {:?}: {}", status, message)
                        }
                        Ok(_) => {}
                        Err(e) => log::warn!("unreadable hub frame: {}", e),
                    },
                    Some(Ok(Message::Ping(payload))) => {
                        ws.send(Message::Pong(payload)).await.ok();
                    }
                    Some(Ok(Message::Close(_))) | None => break 'pass,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("socket error: {}", e);
                        break 'pass;
                    }
                },
            }
        }
        log::warn!("connection lost, redialing");
    }
}
