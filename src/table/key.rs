use serde::Deserialize;
use serde::Serialize;

/// Durable identity of a sighted table. A table is the same table
/// across passes exactly when the reporting origin and the window name
/// both match; either alone is ambiguous since one origin watches many
/// windows and window titles repeat across origins.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey {
    pub origin: String,
    pub window: String,
}

impl TableKey {
    pub fn new(origin: &str, window: &str) -> Self {
        Self {
            origin: origin.to_string(),
            window: window.to_string(),
        }
    }
}

impl std::fmt::Display for TableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}::{}", self.origin, self.window)
    }
}

impl std::str::FromStr for TableKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("::") {
            Some((origin, window)) => Ok(Self::new(origin, window)),
            None => Err(format!("malformed table key: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_display() {
        let key = TableKey::new("rig-a", "PokerStars Table 7");
        assert_eq!(key.to_string(), "rig-a::PokerStars Table 7");
        assert_eq!(TableKey::from_str(&key.to_string()).unwrap(), key);
    }

    #[test]
    fn window_may_contain_separators() {
        let key = TableKey::from_str("rig-a::weird::window").unwrap();
        assert_eq!(key.origin, "rig-a");
        assert_eq!(key.window, "weird::window");
    }

    #[test]
    fn rejects_keyless_strings() {
        assert!(TableKey::from_str("no separator").is_err());
    }
}
