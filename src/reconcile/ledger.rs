use super::slot::Slot;
use crate::table::TableKey;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashSet;

/// The identity mapping: which table key holds which slot, in
/// assignment order, plus the allocation counter. The counter grows
/// monotonically across the life of the ledger; it never rewinds when
/// keys are evicted.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    mapping: IndexMap<TableKey, Slot>,
    next_id: u64,
}

impl Ledger {
    pub fn fresh() -> Self {
        Self {
            mapping: IndexMap::new(),
            next_id: 1,
        }
    }
    pub fn get(&self, key: &TableKey) -> Option<Slot> {
        self.mapping.get(key).copied()
    }
    pub fn contains(&self, key: &TableKey) -> bool {
        self.mapping.contains_key(key)
    }
    pub fn occupied(&self, slot: Slot) -> bool {
        self.mapping.values().any(|held| *held == slot)
    }
    pub fn assignments(&self) -> impl Iterator<Item = (&TableKey, Slot)> {
        self.mapping.iter().map(|(k, s)| (k, *s))
    }
    pub fn len(&self) -> usize {
        self.mapping.len()
    }
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
    /// Seat a key at a slot, consuming counter values up to and
    /// including the one that named the slot.
    pub fn seat(&mut self, key: TableKey, slot: Slot, counter: u64) {
        self.mapping.insert(key, slot);
        self.next_id = counter + 1;
    }
    /// Drop every key not sighted this pass. Returns whether anything
    /// was evicted; assignment order of survivors is preserved.
    pub fn evict_absent(&mut self, active: &HashSet<TableKey>) -> bool {
        let before = self.mapping.len();
        self.mapping.retain(|key, _| active.contains(key));
        self.mapping.len() != before
    }
}

fn one() -> u64 {
    1
}

/// Durable layout: `{"mapping": {"origin::window": "01", ...}, "nextId": n}`.
#[derive(Serialize, Deserialize)]
struct Record {
    #[serde(default)]
    mapping: IndexMap<String, String>,
    #[serde(default = "one", rename = "nextId")]
    next_id: u64,
}

impl From<&Ledger> for Record {
    fn from(ledger: &Ledger) -> Self {
        Self {
            mapping: ledger
                .mapping
                .iter()
                .map(|(key, slot)| (key.to_string(), slot.to_string()))
                .collect(),
            next_id: ledger.next_id,
        }
    }
}

impl From<Record> for Ledger {
    fn from(record: Record) -> Self {
        let mut mapping = IndexMap::new();
        for (key, slot) in record.mapping {
            match (key.parse::<TableKey>(), slot.parse::<Slot>()) {
                (Ok(key), Ok(slot)) => {
                    mapping.insert(key, slot);
                }
                _ => log::warn!("dropping unreadable ledger entry: {} -> {}", key, slot),
            }
        }
        Self {
            mapping,
            next_id: record.next_id.max(1),
        }
    }
}

impl Serialize for Ledger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Record::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Record::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: usize) -> TableKey {
        TableKey::new("rig", &format!("Table {}", n))
    }

    #[test]
    fn eviction_preserves_assignment_order() {
        let mut ledger = Ledger::fresh();
        ledger.seat(key(1), Slot::from_counter(1), 1);
        ledger.seat(key(2), Slot::from_counter(2), 2);
        ledger.seat(key(3), Slot::from_counter(3), 3);
        let active = HashSet::from([key(1), key(3)]);
        assert!(ledger.evict_absent(&active));
        let keys = ledger.assignments().map(|(k, _)| k.clone()).collect::<Vec<_>>();
        assert_eq!(keys, vec![key(1), key(3)]);
        assert_eq!(ledger.next_id(), 4);
    }

    #[test]
    fn eviction_reports_no_change_when_all_present() {
        let mut ledger = Ledger::fresh();
        ledger.seat(key(1), Slot::from_counter(1), 1);
        let active = HashSet::from([key(1), key(9)]);
        assert!(!ledger.evict_absent(&active));
    }

    #[test]
    fn round_trips_through_json() {
        let mut ledger = Ledger::fresh();
        ledger.seat(key(1), Slot::from_counter(1), 1);
        ledger.seat(key(2), Slot::from_counter(2), 2);
        let json = serde_json::to_string(&ledger).unwrap();
        assert!(json.contains(r#""nextId":3"#));
        assert!(json.contains(r#""rig::Table 1":"01""#));
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn unreadable_entries_drop_without_failing_the_load() {
        let json = r#"{"mapping":{"rig::Table 1":"01","no separator":"02","rig::Table 3":"99"},"nextId":4}"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&key(1)), Some(Slot::from_counter(1)));
        assert_eq!(ledger.next_id(), 4);
    }

    #[test]
    fn missing_counter_resets_to_one() {
        let ledger: Ledger = serde_json::from_str(r#"{"mapping":{}}"#).unwrap();
        assert_eq!(ledger.next_id(), 1);
        let zeroed: Ledger = serde_json::from_str(r#"{"mapping":{},"nextId":0}"#).unwrap();
        assert_eq!(zeroed.next_id(), 1);
    }
}
