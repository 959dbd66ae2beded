use log::info;

use crate::error::MatchError;
use crate::game::Game;
use crate::players::Controller;
use crate::utils::{Player, MAX_MATCH_TURNS};

/// How a finished match went
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MatchReport {
    pub winner: Option<Player>,
    pub won_by: Option<String>,
    /// Moves the game accepted, including resignations
    pub moves: usize,
    pub passes: usize,
}

/// Play `game` to the end with one controller per side, player one first.
///
/// A controller returning `None` passes the turn. A move flagged `another_turn`
/// keeps the same player on move. A move the game rejects ends the match with
/// `MatchError::IllegalMove`; people get to retry inside their controller instead.
pub fn play_match<G: Game>(game: &mut G, controllers: [&mut dyn Controller<G>; 2]) -> Result<MatchReport, MatchError> {
    let mut player = Player::P1;
    let mut turns = 0;
    let mut passes = 0;
    info!("Starting {}", game.name());

    // Main loop
    while !game.game_ended(player) {
        if turns >= MAX_MATCH_TURNS {
            return Err(MatchError::TurnLimit { turns });
        }
        turns += 1;
        match controllers[player.index()].choose(player, game)? {
            None => {
                info!("{} passes", player);
                passes += 1;
                player = player.other();
            }
            Some(mv) => {
                game.apply_move(player, &mv)
                    .map_err(|source| MatchError::IllegalMove { player, mv: mv.to_string(), source })?;
                info!("{} plays {}", player, mv);
                if !mv.another_turn() {
                    player = player.other();
                }
            }
        }
    }

    let report = MatchReport { winner: game.winner(), won_by: game.won_by(), moves: game.move_count(), passes };
    match report.winner {
        Some(p) => info!("{} wins by {} after {} moves", p, report.won_by.as_deref().unwrap_or("default"), report.moves),
        None => info!("Draw ({}) after {} moves", report.won_by.as_deref().unwrap_or("no result"), report.moves),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::games::perfect_info::chess::variant::GARDNER;
    use crate::games::perfect_info::chess::ChessGame;
    use crate::games::perfect_info::connect4::ConnectFour;
    use crate::games::perfect_info::othello::Reversi;
    use crate::games::perfect_info::tictactoe::TicTacToe;
    use crate::games::war::War;
    use crate::moves::GameMove;
    use crate::players::{AiPlayer, RandomPlayer, SearchConfig};
    use crate::board::Square;
    use crate::utils::Score;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ai(plies: u32) -> AiPlayer {
        AiPlayer::new(SearchConfig::new(plies).unwrap())
    }

    /// Plays a fixed list of moves in order
    struct Scripted(Vec<GameMove>);

    impl<G: Game> Controller<G> for Scripted {
        fn choose(&mut self, _player: Player, _game: &G) -> Result<Option<GameMove>, MatchError> {
            Ok(if self.0.is_empty() { None } else { Some(self.0.remove(0)) })
        }
    }

    /// Records who played each move; over after three moves
    #[derive(Debug, Clone, Default)]
    struct Tally { plays: Vec<Player>, history: Vec<GameMove> }

    impl Game for Tally {
        fn name(&self) -> &str { "tally" }
        fn generate_moves(&self, _player: Player) -> Vec<GameMove> { vec![GameMove::place(Square::new(0, 0))] }
        fn apply_move(&mut self, player: Player, mv: &GameMove) -> Result<(), MoveError> {
            self.plays.push(player);
            self.history.push(mv.clone());
            Ok(())
        }
        fn evaluate(&self, _player: Player) -> Score { 0 }
        fn game_ended(&self, _player: Player) -> bool { self.plays.len() >= 3 }
        fn winner(&self) -> Option<Player> { None }
        fn won_by(&self) -> Option<String> { Some("three moves".into()) }
        fn move_count(&self) -> usize { self.history.len() }
        fn history(&self) -> &[GameMove] { &self.history }
    }

    #[test]
    fn another_turn_keeps_the_same_player() {
        let mut game = Tally::default();
        let a1 = GameMove::place(Square::new(0, 0));
        let mut first = Scripted(vec![a1.clone().granting_another_turn(), a1.clone()]);
        let mut second = Scripted(vec![a1]);
        let report = play_match(&mut game, [&mut first, &mut second]).unwrap();
        assert_eq!(game.plays, vec![Player::P1, Player::P1, Player::P2]);
        assert_eq!(report.moves, 3);
        assert_eq!(report.passes, 0);
    }

    #[test]
    fn perfect_tictactoe_is_a_draw() {
        let mut game = TicTacToe::new();
        let report = play_match(&mut game, [&mut ai(9), &mut ai(9)]).unwrap();
        assert_eq!(report.winner, None);
        assert_eq!(report.moves, 9);
        assert_eq!(report.passes, 0);
    }

    #[test]
    fn ai_beats_random_at_connect_four() {
        let mut game = ConnectFour::new();
        let report = play_match(&mut game, [&mut ai(4), &mut RandomPlayer::new(Some(11))]).unwrap();
        assert_eq!(report.winner, Some(Player::P1));
    }

    #[test]
    fn minichess_match_finishes() {
        let mut game = ChessGame::new(GARDNER);
        let report = play_match(&mut game, [&mut ai(2), &mut RandomPlayer::new(Some(5))]).unwrap();
        assert!(report.won_by.is_some());
        assert!(report.moves <= GARDNER.move_limit.unwrap());
    }

    #[test]
    fn reversi_random_match_finishes() {
        let mut game = Reversi::new();
        let report = play_match(&mut game, [&mut RandomPlayer::new(Some(1)), &mut RandomPlayer::new(Some(2))]).unwrap();
        assert!(report.won_by.is_some());
        assert!(report.moves <= 60);
    }

    #[test]
    fn war_plays_itself_out() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = War::new(&mut rng);
        let report = play_match(&mut game, [&mut ai(1), &mut ai(1)]).unwrap();
        assert!(report.won_by.is_some());
        assert_eq!(game.cards_in_play(), 52);
    }

    #[test]
    fn illegal_move_ends_the_match() {
        let mut game = TicTacToe::new();
        let centre = GameMove::place(Square::new(1, 1));
        let mut first = Scripted(vec![centre.clone()]);
        let mut second = Scripted(vec![centre]);
        let err = play_match(&mut game, [&mut first, &mut second]).unwrap_err();
        match err {
            MatchError::IllegalMove { player, source, .. } => {
                assert_eq!(player, Player::P2);
                assert!(matches!(source, MoveError::Occupied { .. }));
            }
            other => panic!("unexpected error {}", other),
        }
    }

    #[test]
    fn resignation_ends_the_match() {
        let mut game = ConnectFour::new();
        let mut quitter = Scripted(vec![GameMove::resign()]);
        let report = play_match(&mut game, [&mut quitter, &mut ai(2)]).unwrap();
        assert_eq!(report.winner, Some(Player::P2));
        assert_eq!(report.won_by.as_deref(), Some("resignation"));
        assert_eq!(report.moves, 1);
    }

    #[test]
    fn endless_passing_hits_the_turn_limit() {
        let mut game = TicTacToe::new();
        let mut a = Scripted(vec![]);
        let mut b = Scripted(vec![]);
        assert!(matches!(play_match(&mut game, [&mut a, &mut b]), Err(MatchError::TurnLimit { turns: MAX_MATCH_TURNS })));
    }
}
