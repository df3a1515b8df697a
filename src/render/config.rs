use crate::DEFAULT_CAPTURE_INTERVAL;
use serde::Deserialize;
use serde::Serialize;

/// Which sections a viewer paints, plus the backend capture cadence so
/// a viewer can pace itself. Served by the hub at `/api/config` and
/// overridable per viewer from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(rename = "backend_capture_interval")]
    pub capture_interval: u64,
    pub show_table_cards: bool,
    pub show_positions: bool,
    pub show_moves: bool,
    pub show_solver_link: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            capture_interval: DEFAULT_CAPTURE_INTERVAL,
            show_table_cards: true,
            show_positions: true,
            show_moves: true,
            show_solver_link: true,
        }
    }
}

impl ViewConfig {
    /// Hub-side constructor honoring the DETECTION_INTERVAL variable.
    pub fn from_env() -> Self {
        Self {
            capture_interval: std::env::var("DETECTION_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPTURE_INTERVAL),
            ..Self::default()
        }
    }
}
