use crate::Ordinal;
use crate::GRID_CAPACITY;
use crate::SLOT_WIDTH;

/// Grid position label. Slots are numbered 1 through the grid capacity
/// and print zero-padded so lexical order and numeric order agree. A
/// slot is unique among live tables at any instant but is recycled
/// once its table is evicted; it names a position, not a table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot(Ordinal);

impl Slot {
    pub const fn new(n: Ordinal) -> Option<Self> {
        if n >= 1 && n as usize <= GRID_CAPACITY {
            Some(Self(n))
        } else {
            None
        }
    }
    /// Every grid position in paint order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=GRID_CAPACITY as Ordinal).map(Self)
    }
    /// Slot named by an allocation counter value. The counter grows
    /// without bound while slot labels cycle through the fixed grid.
    pub const fn from_counter(counter: u64) -> Self {
        Self((((counter - 1) % GRID_CAPACITY as u64) + 1) as Ordinal)
    }
    pub const fn number(&self) -> Ordinal {
        self.0
    }
    /// Zero-based index into a grid-ordered sequence of plans.
    pub const fn index(&self) -> usize {
        self.0 as usize - 1
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:0width$}", self.0, width = SLOT_WIDTH)
    }
}

impl std::str::FromStr for Slot {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ordinal>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("slot out of range: {}", s))
    }
}

impl serde::Serialize for Slot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Slot {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl crate::Arbitrary for Slot {
    fn random() -> Self {
        use rand::Rng;
        Self(rand::rng().random_range(1..=GRID_CAPACITY as Ordinal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_zero_padded() {
        assert_eq!(Slot::new(1).unwrap().to_string(), "01");
        assert_eq!(Slot::new(6).unwrap().to_string(), "06");
    }

    #[test]
    fn lexical_order_is_numeric_order() {
        let mut labels = Slot::all().map(|s| s.to_string()).collect::<Vec<_>>();
        let sorted = labels.clone();
        labels.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn counter_wraps_through_the_grid() {
        assert_eq!(Slot::from_counter(1), Slot::new(1).unwrap());
        assert_eq!(Slot::from_counter(6), Slot::new(6).unwrap());
        assert_eq!(Slot::from_counter(7), Slot::new(1).unwrap());
        assert_eq!(Slot::from_counter(13), Slot::new(1).unwrap());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Slot::new(0).is_none());
        assert!(Slot::new(7).is_none());
        assert!("00".parse::<Slot>().is_err());
        assert!("garbage".parse::<Slot>().is_err());
        assert_eq!("03".parse::<Slot>().unwrap(), Slot::new(3).unwrap());
    }
}
