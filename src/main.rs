use std::fmt::Display;
use std::io::{stdin, stdout, BufReader};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use game_engine::game::Game;
use game_engine::games::perfect_info::chess::{ChessGame, ChessVariant};
use game_engine::games::perfect_info::connect4::ConnectFour;
use game_engine::games::perfect_info::othello::Reversi;
use game_engine::games::perfect_info::tictactoe::TicTacToe;
use game_engine::games::war::War;
use game_engine::players::{AiPlayer, ChessHuman, Controller, HumanPlayer, RandomPlayer, SearchConfig};
use game_engine::self_play::play_match;
use game_engine::utils::DEFAULT_PLIES;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GameKind { Chess, TicTacToe, ConnectFour, Reversi, War }

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PlayerKind { Human, Ai, Random }

/// Play a two-player game against the minimax AI, a random mover, or another person
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, value_enum, default_value_t = GameKind::Chess)]
    game: GameKind,
    /// Chess variant: standard, los-alamos, gardner, baby, microchess, silverman
    #[arg(long, default_value = "standard")]
    variant: String,
    /// Search depth for AI players (1-9)
    #[arg(long, default_value_t = DEFAULT_PLIES)]
    plies: u32,
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    p1: PlayerKind,
    #[arg(long, value_enum, default_value_t = PlayerKind::Ai)]
    p2: PlayerKind,
    /// Seed for random players and the War deal
    #[arg(long)]
    seed: Option<u64>,
}

type Human = HumanPlayer<BufReader<std::io::Stdin>, std::io::Stdout>;

fn human() -> Human {
    HumanPlayer::new(BufReader::new(stdin()), stdout())
}

fn controller<G: Game + Display + 'static>(
    kind: PlayerKind,
    config: SearchConfig,
    seed: Option<u64>,
    make_human: impl FnOnce() -> Box<dyn Controller<G>>,
) -> Box<dyn Controller<G>> {
    match kind {
        PlayerKind::Human => make_human(),
        PlayerKind::Ai => Box::new(AiPlayer::new(config)),
        PlayerKind::Random => Box::new(RandomPlayer::new(seed)),
    }
}

fn run<G: Game + Display + 'static>(
    mut game: G,
    args: &Args,
    config: SearchConfig,
    make_human: impl Fn() -> Box<dyn Controller<G>>,
) -> anyhow::Result<()> {
    let mut p1 = controller(args.p1, config, args.seed, &make_human);
    let mut p2 = controller(args.p2, config, args.seed.map(|s| s.wrapping_add(1)), &make_human);
    let report = play_match(&mut game, [p1.as_mut(), p2.as_mut()])
        .with_context(|| format!("{} match failed", game.name()))?;

    println!("{}", game);
    match report.winner {
        Some(p) => println!("{} wins by {} after {} moves", p, report.won_by.unwrap_or_default(), report.moves),
        None => println!("Draw ({}) after {} moves", report.won_by.unwrap_or_default(), report.moves),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = SearchConfig::new(args.plies)?;

    match args.game {
        GameKind::Chess => {
            let variant = ChessVariant::by_name(&args.variant)?;
            run(ChessGame::new(variant), &args, config, || Box::new(ChessHuman(human())))
        }
        GameKind::TicTacToe => run(TicTacToe::new(), &args, config, || Box::new(human())),
        GameKind::ConnectFour => run(ConnectFour::new(), &args, config, || Box::new(human())),
        GameKind::Reversi => run(Reversi::new(), &args, config, || Box::new(human())),
        GameKind::War => {
            let game = match args.seed {
                Some(seed) => War::new(&mut StdRng::seed_from_u64(seed)),
                None => War::new(&mut rand::rng()),
            };
            run(game, &args, config, || Box::new(human()))
        }
    }
}
