//! # Playing cards
//!
//! A standard 52-card French deck. Cards are identified purely by value; a
//! single deck never holds two equal cards, so no id counter is needed.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ParseMoveError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Suit { Clubs, Diamonds, Hearts, Spades }

pub const ALL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

/// Ordered low to high, aces high
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Rank { Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King, Ace }

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two, Rank::Three, Rank::Four, Rank::Five, Rank::Six, Rank::Seven, Rank::Eight,
    Rank::Nine, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace,
];

impl Rank {
    /// Face value, 2 through 14
    pub fn value(self) -> u8 { self as u8 + 2 }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2", Rank::Three => "3", Rank::Four => "4", Rank::Five => "5",
            Rank::Six => "6", Rank::Seven => "7", Rank::Eight => "8", Rank::Nine => "9",
            Rank::Ten => "10", Rank::Jack => "J", Rank::Queen => "Q", Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl Suit {
    fn symbol(self) -> char {
        match self { Suit::Clubs => 'C', Suit::Diamonds => 'D', Suit::Hearts => 'H', Suit::Spades => 'S' }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self { Self { rank, suit } }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = ParseMoveError;

    /// `QH`, `10S`, `TS`, `2c`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseMoveError::BadCard { text: s.to_string() };
        let upper = s.trim().to_ascii_uppercase();
        let suit_char = upper.chars().last().ok_or_else(bad)?;
        let suit = ALL_SUITS.into_iter().find(|st| st.symbol() == suit_char).ok_or_else(bad)?;
        let rank_text = &upper[..upper.len() - 1];
        let rank = match rank_text {
            "T" => Rank::Ten,
            _ => ALL_RANKS.into_iter().find(|r| r.symbol() == rank_text).ok_or_else(bad)?,
        };
        Ok(Card::new(rank, suit))
    }
}

/// All 52 cards, suit by suit
pub fn standard_deck() -> Vec<Card> {
    ALL_SUITS.iter()
        .flat_map(|&suit| ALL_RANKS.iter().map(move |&rank| Card::new(rank, suit)))
        .collect()
}

pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = standard_deck();
    deck.shuffle(rng);
    deck
}
