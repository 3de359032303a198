use clap::Parser;
use combo_four::config::SessionConfig;
use combo_four::engine::Player;
use combo_four::game::{Event, Game, GameStatus, MoveOutcome, WinReason};
use combo_four::solver::{AiPlayer, Difficulty};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Play Combo Four in the terminal", long_about = None)]
struct Args {
    /// Session config file (TOML). Flags below override its values.
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Score needed to win (1, 3 or 5)
    #[clap(short, long)]
    threshold: Option<u32>,

    /// Seconds allowed per move (30 or 60). Unset means no clock.
    #[clap(long)]
    time_limit: Option<u64>,

    /// Play against the computer at this difficulty instead of hot seat
    #[clap(long, value_enum)]
    ai: Option<Difficulty>,

    /// Seed for the computer opponent's random choices
    #[clap(long)]
    seed: Option<u64>,
}

fn build_config(args: &Args) -> Result<SessionConfig, String> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path).map_err(|e| e.to_string())?,
        None => SessionConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.win_threshold = threshold;
    }
    if args.time_limit.is_some() {
        config.time_limit_secs = args.time_limit;
    }
    if args.ai.is_some() {
        config.ai_difficulty = args.ai;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn print_outcome(outcome: &MoveOutcome) {
    for event in &outcome.events {
        match event {
            Event::Placed { player, row, column } => {
                println!("{} dropped into column {} (row {}).", player, column, row)
            }
            Event::Connect4 {
                player,
                alignments,
                step,
            } => println!(
                "Connect 4! {} completed {} line(s) in step {}.",
                player, alignments, step
            ),
            Event::Chain { steps } => println!("Chain reaction x{}!", steps),
            Event::GameOver(_) => {}
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let time_limit = config.time_limit();

    let mut ai = config.ai_difficulty.map(|difficulty| {
        let ai = AiPlayer::new(difficulty).with_seats(Player::Ai, Player::Player1);
        match args.seed {
            Some(seed) => ai.with_seed(seed),
            None => ai,
        }
    });

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("Welcome to Combo Four!");
    println!(
        "First to {} point(s) wins. Every line of four scores and is cleared.",
        game.win_threshold()
    );

    let mut last_landing: Option<(usize, usize)> = None;

    loop {
        println!("---------------------");
        let scores = game.scores();
        println!(
            "{}: {}   {}: {}",
            scores[0].0, scores[0].1, scores[1].0, scores[1].1
        );
        println!("{}", game.board().to_string_with_highlight(last_landing));

        if game.is_game_over() {
            println!();
            println!("---------------------");
            match game.status() {
                GameStatus::Won { by, reason } => {
                    let how = match reason {
                        WinReason::Threshold => "reached the target score",
                        WinReason::Timeout => "won on time",
                    };
                    println!("🎉 GAME OVER! {} {}! 🎉", by, how);
                }
                GameStatus::Draw => println!("GAME OVER! The board is full, it's a draw."),
                GameStatus::InProgress => {}
            }
            println!("Moves played: {}", game.history().len());
            println!("---------------------");
            break;
        }

        let player = game.current_player();

        let column = if let Some(ai) = ai.as_mut().filter(|ai| ai.me() == player) {
            match ai.select_column(game.board()) {
                Some(column) => {
                    println!("{} ({}) plays column {}.", player, ai.difficulty(), column);
                    column
                }
                None => break,
            }
        } else {
            print!(
                "{}, enter a column (0-{}), or 'q' to quit: ",
                player,
                game.board().width() - 1
            );
            if io::stdout().flush().is_err() {
                break;
            }

            let started = Instant::now();
            let mut input = String::new();
            match io::stdin().read_line(&mut input) {
                Ok(0) => break,
                Ok(_) => {}
                Err(_) => {
                    println!("Error reading input. Please try again.");
                    continue;
                }
            }

            if let Some(limit) = time_limit {
                if started.elapsed() > limit {
                    println!("Too slow! {} ran out of time.", player);
                    game.expire_time(player);
                    continue;
                }
            }

            let trimmed_input = input.trim();
            if trimmed_input == "q" {
                println!("Thanks for playing!");
                break;
            }
            match trimmed_input.parse::<usize>() {
                Ok(column) => column,
                Err(_) => {
                    println!("Invalid input: please enter a column number or 'q'.");
                    continue;
                }
            }
        };

        match game.play(player, column) {
            Ok(outcome) => {
                print_outcome(&outcome);
                last_landing = outcome.landing_cell();
            }
            Err(e) => println!("Move rejected: {}", e),
        }
    }
}
