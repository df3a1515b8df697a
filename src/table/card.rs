use super::suit::Suit;
use crate::Score;
use serde::Deserialize;
use serde::Serialize;

/// A card as a detector saw it. The name is the template that matched,
/// rank letters followed by a suit letter ("AS", "10h"), and the score
/// is the match confidence when the detector reports one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

impl Card {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: None,
        }
    }
    pub fn scored(name: &str, score: Score) -> Self {
        Self {
            name: name.to_string(),
            score: Some(score),
        }
    }
    pub fn rank(&self) -> &str {
        match self.name.char_indices().last() {
            Some((i, _)) if i > 0 => &self.name[..i],
            _ => &self.name,
        }
    }
    pub fn suit(&self) -> Option<Suit> {
        self.name.chars().last().and_then(Suit::parse)
    }
    /// Rank plus unicode suit symbol for display, "A♠". Malformed names
    /// fall through unchanged rather than dropping the card.
    pub fn pretty(&self) -> String {
        match self.suit() {
            Some(suit) if self.name.chars().count() >= 2 => {
                format!("{}{}", self.rank(), suit.symbol())
            }
            _ => self.name.clone(),
        }
    }
    /// Rank plus lowercase suit letter, the form solver links expect.
    pub fn code(&self) -> String {
        match self.suit() {
            Some(suit) if self.name.chars().count() >= 2 => {
                format!("{}{}", self.rank(), suit.letter())
            }
            _ => String::new(),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

impl crate::Arbitrary for Card {
    fn random() -> Self {
        use crate::Arbitrary;
        use rand::seq::IndexedRandom;
        const RANKS: &[&str] = &[
            "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
        ];
        let rank = RANKS.choose(&mut rand::rng()).unwrap();
        let suit = Suit::random();
        Self::new(&format!("{}{}", rank, suit.letter().to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_uses_unicode_suit() {
        assert_eq!(Card::new("AS").pretty(), "A♠");
        assert_eq!(Card::new("10h").pretty(), "10♥");
        assert_eq!(Card::new("Kd").pretty(), "K♦");
    }

    #[test]
    fn pretty_passes_malformed_names_through() {
        assert_eq!(Card::new("A").pretty(), "A");
        assert_eq!(Card::new("").pretty(), "");
        assert_eq!(Card::new("Ax").pretty(), "Ax");
    }

    #[test]
    fn code_lowercases_suit() {
        assert_eq!(Card::new("AS").code(), "As");
        assert_eq!(Card::new("10D").code(), "10d");
        assert_eq!(Card::new("?").code(), "");
    }

    #[test]
    fn score_omitted_when_absent() {
        let bare = serde_json::to_string(&Card::new("QC")).unwrap();
        assert_eq!(bare, r#"{"name":"QC"}"#);
        let scored = serde_json::to_string(&Card::scored("QC", 0.987)).unwrap();
        assert!(scored.contains("score"));
    }
}
