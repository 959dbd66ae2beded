//! War
//!
//! Each round player one shows the top card of their stack, then player two does.
//! The higher rank takes every card on the table to the bottom of their stack.
//! Equal ranks start a war: both players add three cards face down and the next
//! pair of shown cards decides who takes the lot.
//!
//! There are no choices to make, so the only move is `show` (and `resign`).
//! A player who has to show but has no cards loses; after `MAX_WAR_TURNS` rounds the
//! bigger stack wins.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use log::trace;
use rand::Rng;

use crate::error::MoveError;
use crate::game::Game;
use crate::games::cards::{shuffled_deck, Card};
use crate::moves::{Command, GameMove};
use crate::utils::*;

const FACE_DOWN: usize = 3;
const CARD_WEIGHT: Score = 10;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct War {
    hands: [VecDeque<Card>; 2],
    /// Cards committed this round, shown and face down, in the order they were played
    pile: Vec<Card>,
    shown: [Option<Card>; 2],
    rounds: usize,
    round_limit: usize,
    history: Vec<GameMove>,
    outcome: Option<Outcome>,
}

impl War {
    /// Shuffle a full deck and deal it out one card at a time
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut hands = [Vec::new(), Vec::new()];
        for (i, card) in shuffled_deck(rng).into_iter().enumerate() {
            hands[i % 2].push(card);
        }
        let [p1, p2] = hands;
        Self::from_hands(p1, p2)
    }

    /// Stacks are given top card first
    pub fn from_hands(p1: Vec<Card>, p2: Vec<Card>) -> Self {
        Self {
            hands: [p1.into(), p2.into()],
            pile: vec![],
            shown: [None, None],
            rounds: 0,
            round_limit: MAX_WAR_TURNS,
            history: vec![],
            outcome: None,
        }
    }

    pub fn with_round_limit(self, round_limit: usize) -> Self {
        Self { round_limit, ..self }
    }

    pub fn cards_held(&self, player: Player) -> usize {
        self.hands[player.index()].len()
    }

    /// Every card in the game, wherever it is
    pub fn cards_in_play(&self) -> usize {
        self.hands[0].len() + self.hands[1].len() + self.pile.len()
    }

    pub fn rounds(&self) -> usize { self.rounds }

    /// Player one shows first each round
    fn to_show(&self) -> Player {
        if self.shown[0].is_none() { Player::P1 } else { Player::P2 }
    }

    fn resolve_round(&mut self) {
        let (Some(a), Some(b)) = (self.shown[0], self.shown[1]) else { return };
        self.shown = [None, None];
        if a.rank == b.rank {
            trace!("war on {} and {}", a, b);
            for hand in self.hands.iter_mut() {
                let n = FACE_DOWN.min(hand.len());
                self.pile.extend(hand.drain(..n));
            }
        } else {
            let taker = if a.rank > b.rank { Player::P1 } else { Player::P2 };
            trace!("{} takes {} cards with {}", taker, self.pile.len(), if taker == Player::P1 { a } else { b });
            self.hands[taker.index()].extend(self.pile.drain(..));
            self.rounds += 1;
        }
        self.settle();
    }

    fn settle(&mut self) {
        let (p1, p2) = (self.cards_held(Player::P1), self.cards_held(Player::P2));
        self.outcome = match (p1, p2) {
            (0, 0) => Some(Outcome::draw("both out of cards")),
            (0, _) => Some(Outcome::win(Player::P2, "out of cards")),
            (_, 0) => Some(Outcome::win(Player::P1, "out of cards")),
            _ if self.rounds >= self.round_limit => Some(if p1 > p2 {
                Outcome::win(Player::P1, "turn limit")
            } else if p2 > p1 {
                Outcome::win(Player::P2, "turn limit")
            } else {
                Outcome::draw("turn limit")
            }),
            _ => None,
        };
    }
}

impl Game for War {
    fn name(&self) -> &str { "war" }

    fn generate_moves(&self, player: Player) -> Vec<GameMove> {
        if self.outcome.is_some() || player != self.to_show() { return vec![]; }
        match self.hands[player.index()].front() {
            Some(&top) => vec![GameMove::command(Command::Show).with_card(top)],
            None => vec![],
        }
    }

    fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
        if self.outcome.is_some() { return Err(MoveError::GameOver); }
        match mv.command_kind() {
            Command::Resign => {
                self.outcome = Some(Outcome::win(player.other(), "resignation"));
                self.history.push(mv.clone().as_succeeded());
                Ok(())
            }
            Command::Show => {
                if player != self.to_show() { return Err(MoveError::OutOfTurn { player }); }
                let top = *self.hands[player.index()].front().ok_or(MoveError::NoCards { player })?;
                // A named card has to be the one on top; a bare `show` is fine
                if mv.cards().iter().any(|&c| c != top) {
                    return Err(MoveError::Illegal { mv: mv.to_string() });
                }
                self.hands[player.index()].pop_front();
                self.pile.push(top);
                self.shown[player.index()] = Some(top);
                self.history.push(GameMove::command(Command::Show).with_card(top).as_succeeded());
                self.resolve_round();
                Ok(())
            }
            command => Err(MoveError::UnsupportedCommand { command }),
        }
    }

    fn evaluate(&self, player: Player) -> Score {
        match &self.outcome {
            Some(outcome) => outcome.score_for(player),
            None => (self.cards_held(player) as Score - self.cards_held(player.other()) as Score) * CARD_WEIGHT,
        }
    }

    fn game_ended(&self, _player: Player) -> bool { self.outcome.is_some() }

    fn winner(&self) -> Option<Player> { self.outcome.as_ref().and_then(|o| o.winner) }

    fn won_by(&self) -> Option<String> { self.outcome.as_ref().map(|o| o.won_by.clone()) }

    fn move_count(&self) -> usize { self.history.len() }

    fn history(&self) -> &[GameMove] { &self.history }
}

impl Display for War {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} cards, {}: {} cards, {} on the table",
               Player::P1, self.cards_held(Player::P1), Player::P2, self.cards_held(Player::P2), self.pile.len())?;
        if let Some(card) = self.shown[0] {
            write!(f, " ({} showing {})", Player::P1, card)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cards(text: &str) -> Vec<Card> {
        text.split_whitespace().map(|c| c.parse().unwrap()).collect()
    }

    fn show(g: &mut War, p: Player) {
        g.apply_move(p, &GameMove::command(Command::Show)).unwrap();
    }

    #[test]
    fn deal_is_even() {
        let mut rng = StdRng::seed_from_u64(7);
        let g = War::new(&mut rng);
        assert_eq!(g.cards_held(Player::P1), 26);
        assert_eq!(g.cards_held(Player::P2), 26);
        assert_eq!(g.generate_moves(Player::P1).len(), 1);
        assert!(g.generate_moves(Player::P2).is_empty());
    }

    #[test]
    fn higher_card_takes_the_pile() {
        let mut g = War::from_hands(cards("AH 4C"), cards("2C 3C"));
        show(&mut g, Player::P1);
        assert_eq!(g.cards_held(Player::P1), 1);
        show(&mut g, Player::P2);
        assert_eq!(g.cards_held(Player::P1), 3);
        assert_eq!(g.cards_held(Player::P2), 1);
        assert_eq!(g.rounds(), 1);
        assert!(!g.game_ended(Player::P1));
        assert_eq!(g.evaluate(Player::P1), 20);
        assert_eq!(g.history()[0].cards(), &cards("AH")[..]);
    }

    #[test]
    fn tie_goes_to_war() {
        let mut g = War::from_hands(cards("5H 2C 3C 4C KH"), cards("5S 2D 3D 4D QH"));
        show(&mut g, Player::P1);
        show(&mut g, Player::P2);
        // Both fives plus three face down each
        assert_eq!(g.cards_in_play(), 10);
        assert_eq!(g.cards_held(Player::P1), 1);
        assert_eq!(g.rounds(), 0);
        show(&mut g, Player::P1);
        show(&mut g, Player::P2);
        assert_eq!(g.cards_held(Player::P1), 10);
        assert_eq!(g.winner(), Some(Player::P1));
        assert_eq!(g.won_by().as_deref(), Some("out of cards"));
        assert_eq!(g.evaluate(Player::P2), Score::MIN);
    }

    #[test]
    fn showing_out_of_turn_is_rejected() {
        let mut g = War::from_hands(cards("AH"), cards("2C"));
        let before = g.clone();
        assert_eq!(g.apply_move(Player::P2, &GameMove::command(Command::Show)), Err(MoveError::OutOfTurn { player: Player::P2 }));
        let wrong = GameMove::command(Command::Show).with_card(cards("KS")[0]);
        assert!(matches!(g.apply_move(Player::P1, &wrong), Err(MoveError::Illegal { .. })));
        assert!(matches!(g.apply_move(Player::P1, &GameMove::command(Command::Draw)), Err(MoveError::UnsupportedCommand { .. })));
        assert_eq!(g, before);
    }

    #[test]
    fn round_limit_goes_to_the_bigger_stack() {
        let mut g = War::from_hands(cards("AH 2C"), cards("KH 3C")).with_round_limit(1);
        show(&mut g, Player::P1);
        show(&mut g, Player::P2);
        assert!(g.game_ended(Player::P1));
        assert_eq!(g.winner(), Some(Player::P1));
        assert_eq!(g.won_by().as_deref(), Some("turn limit"));
    }

    #[test]
    fn shuffled_game_runs_to_the_end() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut g = War::new(&mut rng);
        let mut player = Player::P1;
        while !g.game_ended(player) {
            let mv = g.generate_moves(player).pop().unwrap();
            g.apply_move(player, &mv).unwrap();
            assert_eq!(g.cards_in_play(), 52);
            player = player.other();
        }
        assert!(g.rounds() <= MAX_WAR_TURNS);
        assert!(g.won_by().is_some());
    }

    #[test]
    fn resigning_hands_over_the_game() {
        let mut g = War::from_hands(cards("AH"), cards("2C"));
        g.apply_move(Player::P1, &GameMove::resign()).unwrap();
        assert_eq!(g.winner(), Some(Player::P2));
        assert_eq!(g.apply_move(Player::P2, &GameMove::command(Command::Show)), Err(MoveError::GameOver));
    }
}
