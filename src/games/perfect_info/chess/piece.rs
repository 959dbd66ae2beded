use crate::utils::{Player, Score};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PieceKind { Pawn, Knight, Bishop, Rook, Queen, King }

/// What a pawn may become on the last rank, in the order moves are generated
pub const PROMOTION_CHOICES: [PieceKind; 4] = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

impl PieceKind {
    /// Material in centipawns. The king is never traded so it counts for nothing.
    pub fn value(self) -> Score {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Parse a promotion argument; only Q, R, B and N qualify
    pub fn promotion(text: &str) -> Option<Self> {
        let mut chars = text.trim().chars();
        let kind = Self::from_letter(chars.next()?)?;
        if chars.next().is_some() || !PROMOTION_CHOICES.contains(&kind) { return None; }
        Some(kind)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub owner: Player,
    /// Needed for castling and the pawn double step
    pub moved: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, owner: Player) -> Self {
        Self { kind, owner, moved: false }
    }

    /// Board token: upper case for player one, lower case for player two
    pub fn token(&self) -> char {
        match self.owner {
            Player::P1 => self.kind.letter(),
            Player::P2 => self.kind.letter().to_ascii_lowercase(),
        }
    }

    pub fn from_token(c: char) -> Option<Self> {
        let kind = PieceKind::from_letter(c)?;
        let owner = if c.is_ascii_uppercase() { Player::P1 } else { Player::P2 };
        Some(Self::new(kind, owner))
    }

    pub fn value(&self) -> Score { self.kind.value() }
}
