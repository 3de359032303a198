use clap::Parser;
use combo_four::engine::{Board, Player, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use combo_four::snapshot::BoardSnapshot;
use combo_four::solver::{AiPlayer, Difficulty};
use combo_four::utils::board_from_text;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Print the column the AI would play", long_about = None)]
struct Args {
    /// Difficulty tier to ask
    #[clap(short, long, value_enum, default_value_t = Difficulty::Deep)]
    difficulty: Difficulty,

    /// Seat the AI plays for: player1, player2 or ai
    #[clap(short, long, default_value = "ai", value_parser = parse_player)]
    seat: Player,

    /// Opposing seat. Defaults to player1, or player2 when the AI plays player1.
    #[clap(short, long, value_parser = parse_player)]
    opponent: Option<Player>,

    /// Board height for text board files
    #[clap(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Board width for text board files
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Seed for the random and greedy tiers
    #[clap(long)]
    seed: Option<u64>,

    /// Path to the board file: a text grid ('.', X/O/A, x/o/a) or a .json snapshot
    board_file: PathBuf,
}

fn parse_player(s: &str) -> Result<Player, String> {
    Player::from_id(s).ok_or_else(|| format!("unknown seat '{}'", s))
}

fn read_board_file(path: &Path, height: usize, width: usize) -> Result<Board, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;

    if path.extension().is_some_and(|ext| ext == "json") {
        let snapshot = BoardSnapshot::from_json(&content).map_err(|e| e.to_string())?;
        let (height, width) = snapshot.dimensions();
        return snapshot.to_board(height, width).map_err(|e| e.to_string());
    }

    let board = board_from_text(&content, height, width)
        .map_err(|e| format!("Invalid board format: {}", e))?;
    match board.gravity_violation() {
        Some(column) => Err(format!("Column {} has a gap beneath a piece", column)),
        None => Ok(board),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let board = match read_board_file(&args.board_file, args.height, args.width) {
        Ok(board) => board,
        Err(e) => {
            eprintln!(
                "Failed to read board from file {}: {}",
                args.board_file.display(),
                e
            );
            std::process::exit(1);
        }
    };
    let opponent = args.opponent.unwrap_or(if args.seat == Player::Player1 {
        Player::Player2
    } else {
        Player::Player1
    });
    if opponent == args.seat {
        eprintln!("The AI cannot play against its own seat ({}).", args.seat);
        std::process::exit(1);
    }

    println!("Loaded board from {}\n", args.board_file.display());
    println!("Board state:\n{}\n", board);
    println!(
        "Asking the {} tier to move for {} against {}...\n",
        args.difficulty, args.seat, opponent
    );

    let mut ai = AiPlayer::new(args.difficulty).with_seats(args.seat, opponent);
    if let Some(seed) = args.seed {
        ai = ai.with_seed(seed);
    }

    match ai.select_column(&board) {
        Some(column) => {
            println!("Chosen column: {}", column);
            let mut after = board.clone();
            if let Some(row) = after.place(column, args.seat) {
                println!(
                    "\nBoard after the drop:\n{}\n",
                    after.to_string_with_highlight(Some((row, column)))
                );
            }
        }
        None => println!("The board is full, no move is possible.\n"),
    }
}
