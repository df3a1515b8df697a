use super::ledger::Ledger;
use std::path::Path;
use std::path::PathBuf;

/// Durable home for the identity ledger. Loading never fails the
/// caller: unreadable state comes back as a fresh ledger with a
/// warning. Saving swallows its own failures the same way since the
/// in-memory ledger stays authoritative for the session either way.
pub trait Store {
    fn load(&self) -> Ledger;
    fn save(&mut self, ledger: &Ledger);
}

/// Ledger on disk as one JSON file. Default location is
/// `state/ledger.json` next to the process, overridable through the
/// RAILBIRD_LEDGER environment variable.
pub struct Disk {
    path: PathBuf,
}

impl Disk {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
    pub fn at_default() -> Self {
        Self::new(
            std::env::var("RAILBIRD_LEDGER").unwrap_or_else(|_| "state/ledger.json".to_string()),
        )
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for Disk {
    fn load(&self) -> Ledger {
        match std::fs::read_to_string(&self.path) {
            Err(_) => Ledger::fresh(),
            Ok(json) => serde_json::from_str(&json)
                .inspect_err(|e| log::warn!("unreadable ledger at {:?}, starting fresh: {}", self.path, e))
                .unwrap_or_else(|_| Ledger::fresh()),
        }
    }
    fn save(&mut self, ledger: &Ledger) {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .inspect_err(|e| log::warn!("cannot create {:?}: {}", parent, e))
                .ok();
        }
        serde_json::to_string_pretty(ledger)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(anyhow::Error::from))
            .inspect_err(|e| log::warn!("ledger not persisted to {:?}: {}", self.path, e))
            .ok();
    }
}

/// Ledger kept only in memory, serialized through the same JSON path
/// as the disk store. Used for ephemeral sessions and tests.
#[derive(Default)]
pub struct Memory {
    saved: Option<String>,
    writes: usize,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
    /// How the last save would have landed on disk.
    pub fn written(&self) -> Option<&str> {
        self.saved.as_deref()
    }
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for Memory {
    fn load(&self) -> Ledger {
        match &self.saved {
            None => Ledger::fresh(),
            Some(json) => serde_json::from_str(json)
                .inspect_err(|e| log::warn!("unreadable ledger in memory, starting fresh: {}", e))
                .unwrap_or_else(|_| Ledger::fresh()),
        }
    }
    fn save(&mut self, ledger: &Ledger) {
        self.writes += 1;
        self.saved = serde_json::to_string(ledger)
            .inspect_err(|e| log::warn!("ledger not serialized: {}", e))
            .ok();
    }
}
