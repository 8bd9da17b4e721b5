//! Text fragments recovered from content streams.

/// One piece of a shown string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Literal string body with escape sequences still in place.
    Literal(Vec<u8>),
    /// Hex string, already decoded to bytes.
    Hex(Vec<u8>),
    /// A kerning adjustment wide enough to be a word space.
    Gap,
}

/// A string shown by one text-showing operator.
///
/// `Tj`, `'` and `"` show a single string; a `TJ` array becomes one
/// fragment whose pieces are its strings and word gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub pieces: Vec<Piece>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            pieces: vec![Piece::Literal(bytes.into())],
        }
    }

    pub fn hex(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            pieces: vec![Piece::Hex(bytes.into())],
        }
    }

    pub fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// True when the fragment holds no string bytes.
    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(|p| match p {
            Piece::Literal(b) | Piece::Hex(b) => b.is_empty(),
            Piece::Gap => true,
        })
    }
}

/// Fragments between one `BT`/`ET` pair, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub fragments: Vec<Fragment>,
}

impl TextBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.iter().all(Fragment::is_empty)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}
