use clap::Parser;
use combo_four::config::SessionConfig;
use combo_four::engine::Player;
use combo_four::game::{Game, GameStatus};
use combo_four::solver::{AiPlayer, Difficulty};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Games longer than this are scored as draws.
const MAX_MOVES_PER_GAME: usize = 400;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play AI tiers against each other", long_about = None)]
struct Args {
    /// Games per pairing
    #[clap(short, long, default_value_t = 10)]
    games: u64,

    /// Seed of the first game; game i uses seed + i
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Random opening moves played before the tiers take over
    #[clap(long, default_value_t = 2)]
    opening: usize,

    /// Score needed to win (1, 3 or 5)
    #[clap(short, long, default_value_t = 3)]
    threshold: u32,

    /// Tiers to evaluate (default: all except deep)
    #[clap(long, value_enum, num_args = 1..)]
    tiers: Vec<Difficulty>,
}

#[derive(Default)]
struct Tally {
    wins: u32,
    losses: u32,
    draws: u32,
}

/// Plays one game with `first` on the `Player1` seat and `second` on the `Ai` seat.
fn play_game(
    first: Difficulty,
    second: Difficulty,
    threshold: u32,
    opening: usize,
    seed: u64,
) -> Result<GameStatus, String> {
    let config = SessionConfig::default()
        .with_win_threshold(threshold)
        .against_ai(second);
    let mut game = Game::new(config).map_err(|e| e.to_string())?;

    let mut opening_rng = SmallRng::seed_from_u64(seed);
    let mut players = [
        AiPlayer::new(first)
            .with_seats(Player::Player1, Player::Ai)
            .with_seed(seed),
        AiPlayer::new(second)
            .with_seats(Player::Ai, Player::Player1)
            .with_seed(seed.wrapping_add(1)),
    ];

    for moves in 0..MAX_MOVES_PER_GAME {
        if game.is_game_over() {
            break;
        }
        let column = if moves < opening {
            let open = game.board().open_columns();
            open[opening_rng.gen_range(0..open.len())]
        } else {
            let seat = if game.current_player() == Player::Player1 { 0 } else { 1 };
            match players[seat].select_column(game.board()) {
                Some(column) => column,
                None => break,
            }
        };
        game.play_current(column).map_err(|e| e.to_string())?;
    }

    Ok(match game.status() {
        GameStatus::InProgress => GameStatus::Draw,
        status => status,
    })
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let tiers = if args.tiers.is_empty() {
        vec![Difficulty::Random, Difficulty::Greedy, Difficulty::Shallow]
    } else {
        args.tiers.clone()
    };

    let mut tallies: BTreeMap<(Difficulty, Difficulty), Tally> = BTreeMap::new();

    println!(
        "Starting tier evaluation: {} game(s) per pairing, threshold {}, {} opening move(s)",
        args.games, args.threshold, args.opening
    );

    for &first in &tiers {
        for &second in &tiers {
            if first == second {
                continue;
            }
            let tally = tallies.entry((first, second)).or_default();
            for i in 0..args.games {
                let seed = args.seed + i;
                match play_game(first, second, args.threshold, args.opening, seed) {
                    Ok(GameStatus::Won { by, .. }) if by == Player::Player1 => tally.wins += 1,
                    Ok(GameStatus::Won { .. }) => tally.losses += 1,
                    Ok(_) => tally.draws += 1,
                    Err(e) => {
                        eprintln!(
                            "Error: {} vs {} (seed {}) failed: {}",
                            first, second, seed, e
                        );
                        std::process::exit(1);
                    }
                }
            }
            println!(
                "  {:<8} (first) vs {:<8}: W {:<3} L {:<3} D {:<3}",
                first, second, tally.wins, tally.losses, tally.draws
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Overall Win Rate ---");

    let mut overall: Vec<(Difficulty, f64)> = tiers
        .iter()
        .map(|&tier| {
            let (mut won, mut played) = (0u32, 0u32);
            for ((first, second), tally) in &tallies {
                let total = tally.wins + tally.losses + tally.draws;
                if *first == tier {
                    won += tally.wins;
                    played += total;
                } else if *second == tier {
                    won += tally.losses;
                    played += total;
                }
            }
            let rate = if played == 0 {
                0.0
            } else {
                won as f64 / played as f64
            };
            (tier, rate)
        })
        .collect();

    overall.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (tier, rate) in overall {
        println!("Tier {:<8}: Win Rate = {:.1}%", tier, rate * 100.0);
    }
}
