use super::key::TableKey;
use super::table::Table;
use crate::Digest;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use sha2::Digest as _;
use sha2::Sha256;

/// One full pass over everything currently detected, in the order the
/// hub aggregated it. This is the unit the viewer reconciles against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub detections: Vec<Table>,
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(detections: Vec<Table>) -> Self {
        Self {
            detections,
            last_update: Utc::now(),
        }
    }
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
    /// Stamp from content: the newest per-table stamp, or now when the
    /// pass is empty.
    pub fn gathered(detections: Vec<Table>) -> Self {
        let last_update = detections
            .iter()
            .map(|table| table.last_update)
            .max()
            .unwrap_or_else(Utc::now);
        Self {
            detections,
            last_update,
        }
    }
    pub fn total(&self) -> usize {
        self.detections.len()
    }
    pub fn keys(&self) -> impl Iterator<Item = TableKey> + '_ {
        self.detections.iter().map(|t| t.key())
    }
    pub fn tables(&self, key: &TableKey) -> impl Iterator<Item = &Table> {
        self.detections.iter().filter(move |t| t.key() == *key)
    }
    /// Content hash over the detections alone, order-sensitive. Two
    /// passes describe the same state exactly when their digests
    /// match, so this string doubles as the conditional request token
    /// the wire exchanges.
    pub fn digest(&self) -> Digest {
        let bytes = serde_json::to_vec(&self.detections).expect("serialize detections");
        hex::encode(Sha256::digest(&bytes))
    }
    pub fn changed_from(&self, previous: &Self) -> bool {
        self.digest() != previous.digest()
    }
}

impl From<Vec<Table>> for Snapshot {
    fn from(detections: Vec<Table>) -> Self {
        Self::new(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Card;

    fn pass() -> Snapshot {
        let mut a = Table::sighted("rig-a", "Table 1");
        a.player_cards = vec![Card::new("AS"), Card::new("KD")];
        let b = Table::sighted("rig-b", "Table 2");
        Snapshot::new(vec![a, b])
    }

    #[test]
    fn identical_content_matches() {
        let one = pass();
        let two = one.clone();
        assert_eq!(one.digest(), two.digest());
        assert!(!two.changed_from(&one));
    }

    #[test]
    fn any_field_difference_registers() {
        let one = pass();
        let mut two = one.clone();
        two.detections[0].player_cards[1] = Card::new("KH");
        assert!(two.changed_from(&one));
    }

    #[test]
    fn order_is_content() {
        let one = pass();
        let mut two = one.clone();
        two.detections.reverse();
        assert!(two.changed_from(&one));
    }

    #[test]
    fn batch_timestamp_is_not_content() {
        let one = pass();
        let mut two = one.clone();
        two.last_update = two.last_update + chrono::Duration::seconds(30);
        assert!(!two.changed_from(&one));
    }
}
