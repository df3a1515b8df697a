#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    pub const fn all() -> &'static [Self] {
        &[Self::Club, Self::Diamond, Self::Heart, Self::Spade]
    }
    /// Single-letter code used by detectors and solver links.
    pub const fn letter(&self) -> char {
        match self {
            Self::Club => 'c',
            Self::Diamond => 'd',
            Self::Heart => 'h',
            Self::Spade => 's',
        }
    }
    /// Unicode symbol used when painting cards.
    pub const fn symbol(&self) -> char {
        match self {
            Self::Club => '♣',
            Self::Diamond => '♦',
            Self::Heart => '♥',
            Self::Spade => '♠',
        }
    }
    /// Detectors report suits as a trailing letter in either case.
    pub const fn parse(c: char) -> Option<Self> {
        match c {
            'c' | 'C' => Some(Self::Club),
            'd' | 'D' => Some(Self::Diamond),
            'h' | 'H' => Some(Self::Heart),
            's' | 'S' => Some(Self::Spade),
            _ => None,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl crate::Arbitrary for Suit {
    fn random() -> Self {
        use rand::Rng;
        match rand::rng().random_range(0..4) {
            0 => Self::Club,
            1 => Self::Diamond,
            2 => Self::Heart,
            _ => Self::Spade,
        }
    }
}
