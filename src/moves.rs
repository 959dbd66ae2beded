//! # Moves
//!
//! One turn's action for any game. A move is either a board move (`Command::Move`
//! with coordinates) or a named command (`draw`, `resign`, `show`, ...). Moves are
//! built once through the constructors and the consuming `with_*` methods and
//! are not mutated afterwards.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::board::Square;
use crate::error::ParseMoveError;
use crate::games::cards::Card;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Command { Move, Draw, Meld, Layoff, Discard, Ask, Show, Score, Resign, Fold, NoMove }

pub const NAMED_COMMANDS: [Command; 10] = [
    Command::Draw, Command::Meld, Command::Layoff, Command::Discard, Command::Ask,
    Command::Show, Command::Score, Command::Resign, Command::Fold, Command::NoMove,
];

impl Command {
    pub fn keyword(self) -> &'static str {
        match self {
            Command::Move => "move",
            Command::Draw => "draw",
            Command::Meld => "meld",
            Command::Layoff => "layoff",
            Command::Discard => "discard",
            Command::Ask => "ask",
            Command::Show => "show",
            Command::Score => "score",
            Command::Resign => "resign",
            Command::Fold => "fold",
            Command::NoMove => "nomove",
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct GameMove {
    from: Option<Square>,
    to: Option<Square>,
    command: Command,
    argument: Option<String>,
    cards: Vec<Card>,
    another_turn: bool,
    probe: bool,
    succeeded: bool,
}

impl GameMove {
    fn blank(command: Command) -> Self {
        Self { from: None, to: None, command, argument: None, cards: vec![], another_turn: false, probe: false, succeeded: false }
    }

    /// Piece moves from one square to another (chess)
    pub fn board(from: Square, to: Square) -> Self {
        Self { from: Some(from), to: Some(to), ..Self::blank(Command::Move) }
    }

    /// A piece is placed on a square with no origin (tic-tac-toe, reversi, connect four)
    pub fn place(to: Square) -> Self {
        Self { to: Some(to), ..Self::blank(Command::Move) }
    }

    /// A named command such as `draw`, `show` or `resign`
    pub fn command(command: Command) -> Self {
        Self::blank(command)
    }

    pub fn resign() -> Self { Self::command(Command::Resign) }

    pub fn with_from(self, from: Square) -> Self { Self { from: Some(from), ..self } }
    pub fn with_to(self, to: Square) -> Self { Self { to: Some(to), ..self } }
    pub fn with_argument(self, argument: impl Into<String>) -> Self { Self { argument: Some(argument.into()), ..self } }
    pub fn with_cards(self, cards: Vec<Card>) -> Self { Self { cards, ..self } }
    pub fn with_card(mut self, card: Card) -> Self {
        self.cards.push(card);
        self
    }
    pub fn granting_another_turn(self) -> Self { Self { another_turn: true, ..self } }
    /// Mark as a check-test probe: the game still validates it but skips the king safety test
    pub(crate) fn as_probe(self) -> Self { Self { probe: true, ..self } }
    /// The copy archived into a game's history
    pub(crate) fn as_succeeded(self) -> Self { Self { succeeded: true, probe: false, ..self } }

    #[inline] pub fn from(&self) -> Option<Square> { self.from }
    #[inline] pub fn to(&self) -> Option<Square> { self.to }
    #[inline] pub fn command_kind(&self) -> Command { self.command }
    pub fn argument(&self) -> Option<&str> { self.argument.as_deref() }
    pub fn cards(&self) -> &[Card] { &self.cards }
    #[inline] pub fn another_turn(&self) -> bool { self.another_turn }
    #[inline] pub fn is_probe(&self) -> bool { self.probe }
    #[inline] pub fn succeeded(&self) -> bool { self.succeeded }

    #[inline] pub fn is_board_move(&self) -> bool { self.command == Command::Move }
    pub fn is(&self, command: Command) -> bool { self.command == command }
}

impl Display for GameMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_board_move() {
            if let Some(from) = self.from { write!(f, "{}", from)?; }
            match self.to {
                Some(to) => write!(f, "{}", to)?,
                None => f.write_str("-")?,
            }
            if let Some(arg) = &self.argument { write!(f, "={}", arg)?; }
            return Ok(());
        }
        write!(f, "{}", self.command)?;
        if let Some(arg) = &self.argument { write!(f, " {}", arg)?; }
        for card in &self.cards { write!(f, " {}", card)?; }
        Ok(())
    }
}

impl FromStr for GameMove {
    type Err = ParseMoveError;

    /// Accepts `e2e4`, `e2 e4`, `e2-e4`, `b2`, `e7e8=q`, or a command keyword
    /// optionally followed by an argument and cards (`show`, `ask 7`, `discard QH`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() { return Err(ParseMoveError::Empty); }
        let mut words = text.split_whitespace();
        let head = words.next().ok_or(ParseMoveError::Empty)?.to_ascii_lowercase();

        if let Some(command) = NAMED_COMMANDS.into_iter().find(|c| c.keyword() == head) {
            let mut mv = GameMove::command(command);
            for word in words {
                mv = match word.parse::<Card>() {
                    Ok(card) => mv.with_card(card),
                    Err(_) => mv.with_argument(word),
                };
            }
            return Ok(mv);
        }

        let joined: String = text.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        let (squares, promotion) = match joined.split_once('=') {
            Some((sq, promo)) => (sq.to_string(), Some(promo.to_ascii_uppercase())),
            None => (joined, None),
        };
        let parsed = split_squares(&squares)
            .ok_or_else(|| ParseMoveError::Unrecognised { text: text.to_string() })?;
        let mv = match parsed.as_slice() {
            [to] => GameMove::place(*to),
            [from, to] => GameMove::board(*from, *to),
            _ => return Err(ParseMoveError::Unrecognised { text: text.to_string() }),
        };
        Ok(match promotion {
            Some(p) if !p.is_empty() => mv.with_argument(p),
            _ => mv,
        })
    }
}

/// Split `e2e4` / `a10b9` into squares at each file letter
fn split_squares(text: &str) -> Option<Vec<Square>> {
    let mut out: Vec<Square> = vec![];
    let mut start = None;
    for (i, c) in text.char_indices() {
        if c.is_ascii_alphabetic() {
            if let Some(s) = start { out.push(text[s..i].parse().ok()?); }
            start = Some(i);
        } else if !c.is_ascii_digit() || start.is_none() {
            return None;
        }
    }
    out.push(text[start?..].parse().ok()?);
    Some(out)
}
