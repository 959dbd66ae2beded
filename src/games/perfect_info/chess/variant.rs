//! Chess and its minichess relatives differ only in board size, starting layout
//! and which of the optional rules they use, so each one is a table row here
//! rather than its own type.

use crate::error::ConfigError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChessVariant {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    /// One string per rank starting from player one's home rank, one char per file.
    /// Upper case is player one, lower case player two, `.` is empty.
    pub layout: &'static [&'static str],
    pub castling: bool,
    pub double_pawn_move: bool,
    /// Total moves after which an undecided game is drawn
    pub move_limit: Option<usize>,
}

pub const STANDARD: ChessVariant = ChessVariant {
    name: "standard",
    width: 8,
    height: 8,
    layout: &[
        "RNBQKBNR",
        "PPPPPPPP",
        "........",
        "........",
        "........",
        "........",
        "pppppppp",
        "rnbqkbnr",
    ],
    castling: true,
    double_pawn_move: true,
    move_limit: None,
};

pub const LOS_ALAMOS: ChessVariant = ChessVariant {
    name: "los-alamos",
    width: 6,
    height: 6,
    layout: &[
        "RNQKNR",
        "PPPPPP",
        "......",
        "......",
        "pppppp",
        "rnqknr",
    ],
    castling: false,
    double_pawn_move: false,
    move_limit: Some(200),
};

pub const GARDNER: ChessVariant = ChessVariant {
    name: "gardner",
    width: 5,
    height: 5,
    layout: &[
        "RNBQK",
        "PPPPP",
        ".....",
        "ppppp",
        "rnbqk",
    ],
    castling: false,
    double_pawn_move: false,
    move_limit: Some(150),
};

pub const BABY: ChessVariant = ChessVariant {
    name: "baby",
    width: 5,
    height: 5,
    layout: &[
        "KQBNR",
        "PPPPP",
        ".....",
        "ppppp",
        "rnbqk",
    ],
    castling: false,
    double_pawn_move: false,
    move_limit: Some(150),
};

pub const MICROCHESS: ChessVariant = ChessVariant {
    name: "microchess",
    width: 4,
    height: 5,
    layout: &[
        "RBNK",
        "...P",
        "....",
        "p...",
        "knbr",
    ],
    castling: true,
    double_pawn_move: true,
    move_limit: Some(150),
};

pub const SILVERMAN: ChessVariant = ChessVariant {
    name: "silverman",
    width: 4,
    height: 5,
    layout: &[
        "RQKR",
        "PPPP",
        "....",
        "pppp",
        "rqkr",
    ],
    castling: false,
    double_pawn_move: false,
    move_limit: Some(150),
};

pub const ALL_VARIANTS: [ChessVariant; 6] = [STANDARD, LOS_ALAMOS, GARDNER, BABY, MICROCHESS, SILVERMAN];

impl ChessVariant {
    pub fn by_name(name: &str) -> Result<ChessVariant, ConfigError> {
        ALL_VARIANTS.iter()
            .find(|v| v.name.eq_ignore_ascii_case(name))
            .copied()
            .ok_or_else(|| ConfigError::UnknownVariant { name: name.to_string() })
    }
}

impl Default for ChessVariant {
    fn default() -> Self { STANDARD }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_match_dimensions() {
        for v in ALL_VARIANTS {
            assert_eq!(v.layout.len(), v.height, "{} height", v.name);
            for row in v.layout {
                assert_eq!(row.chars().count(), v.width, "{} width", v.name);
            }
            let kings = v.layout.iter().flat_map(|r| r.chars()).filter(|c| c.eq_ignore_ascii_case(&'k')).count();
            assert_eq!(kings, 2, "{} kings", v.name);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ChessVariant::by_name("Gardner").unwrap(), GARDNER);
        assert!(ChessVariant::by_name("fischer-random").is_err());
    }
}
