//! Stable-identity reconciliation for live poker-table detections.
//!
//! Detector clients sight tables and report them to a hub; viewers pull
//! or subscribe to the hub's aggregate state and paint it into a fixed
//! grid of slots whose identities survive restarts and reorderings.

#[cfg(feature = "server")]
pub mod hub;
pub mod protocol;
pub mod reconcile;
pub mod render;
pub mod table;
pub mod transport;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// One-based slot and seat numbering around the grid and the table.
pub type Ordinal = u8;
/// Detector match confidence for a sighted card.
pub type Score = f32;
/// Hex-encoded content hash of a snapshot; doubles as the conditional
/// request token on the wire.
pub type Digest = String;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and simulated detectors.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// GRID PARAMETERS
// ============================================================================
/// Number of slots in the viewer grid, and therefore the most tables
/// that can hold an identity at once.
pub const GRID_CAPACITY: usize = 6;
/// Zero-padding width of printed slot ids ("01".."06").
pub const SLOT_WIDTH: usize = 2;

// ============================================================================
// HIGHLIGHT TIMING
// Freshly painted sections glow, then fade in bulk rather than per-slot.
// ============================================================================
/// How long changed sections stay highlighted after a repaint.
pub const HIGHLIGHT_BLOCKS: std::time::Duration = std::time::Duration::from_millis(2000);
/// How long the global "updated" banner stays lit after a repaint.
pub const HIGHLIGHT_BANNER: std::time::Duration = std::time::Duration::from_millis(1000);

// ============================================================================
// TRANSPORT CADENCE
// ============================================================================
/// Delay between conditional polls when the hub is reachable.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);
/// First retry delay after a transport failure.
pub const BACKOFF_FLOOR: std::time::Duration = std::time::Duration::from_secs(1);
/// Retry delays double up to this ceiling, then hold.
pub const BACKOFF_CEILING: std::time::Duration = std::time::Duration::from_secs(30);
/// Quiet period after which the hub's event stream emits a heartbeat.
pub const SSE_HEARTBEAT: std::time::Duration = std::time::Duration::from_secs(30);
/// How often a detector reports sightings unless registration says otherwise.
pub const DEFAULT_CLIENT_INTERVAL: u64 = 3;
/// Fallback backend capture interval advertised by the hub config endpoint.
pub const DEFAULT_CAPTURE_INTERVAL: u64 = 10;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(any(feature = "server", feature = "client"))]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(any(feature = "server", feature = "client"))]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}
