//! Rail Viewer Binary
//!
//! Follows the hub over poll, event stream, or socket transport,
//! reconciles each delivery into stable slots, and paints the grid.

use clap::Parser;
use railbird::reconcile::*;
use railbird::render::*;
use railbird::transport::*;
use railbird::*;

#[derive(Parser, Debug)]
#[command(name = "watch")]
struct Args {
    /// Hub base URL.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    hub: String,
    /// Transport: sse, poll, or socket.
    #[arg(long, default_value = "sse")]
    via: String,
    /// Follow one origin instead of the whole floor (socket only).
    #[arg(long)]
    origin: Option<String>,
    /// Forget persisted slot assignments and reseat from scratch.
    #[arg(long)]
    reset: bool,
}

/// Section visibility comes from the hub when it answers; a hub that
/// is down at startup means paint everything until it recovers.
async fn configured(hub: &str) -> ViewConfig {
    match reqwest::get(format!("{}/api/config", hub)).await {
        Ok(answer) => answer
            .json::<ViewConfig>()
            .await
            .inspect_err(|e| log::warn!("unreadable hub config: {}", e))
            .unwrap_or_default(),
        Err(e) => {
            log::warn!("hub config unavailable, painting everything: {}", e);
            ViewConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    log();
    kys();
    let args = Args::parse();
    let config = configured(&args.hub).await;
    let screen = Screen::new(View::new(config));
    let mut session = Session::new(Disk::at_default());
    if args.reset {
        session.reset();
    }
    let mut feed: Box<dyn Feed> = match args.via.as_str() {
        "poll" => Box::new(Poll::at_default_pace(&args.hub)),
        "socket" => Box::new(Socket::new(&args.hub, args.origin.as_deref())),
        "sse" => Box::new(Sse::new(&args.hub)),
        other => {
            log::error!("unknown transport {:?}, using sse", other);
            Box::new(Sse::new(&args.hub))
        }
    };
    log::info!("following {}", feed.describe());
    screen.hello();
    loop {
        match feed.next().await {
            Delivery::Snapshot(snapshot) => {
                if let Some(plan) = session.reconcile(snapshot) {
                    screen.apply(plan);
                }
            }
            Delivery::Unchanged => {}
            Delivery::Down(reason) => screen.offline(&reason),
        }
    }
}
