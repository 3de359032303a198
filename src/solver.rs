use crate::detector::has_alignment;
use crate::engine::{Board, Cell, Player};
use crate::heuristics::{choose_column_greedy, choose_column_random, evaluate, DECISIVE_SCORE};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strength tiers of the computer opponent, weakest first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    /// Uniform choice among open columns.
    Random,
    /// One-ply tactics: win, block, centre.
    Greedy,
    /// Minimax, two plies.
    Shallow,
    /// Minimax, six plies.
    Deep,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Random,
        Difficulty::Greedy,
        Difficulty::Shallow,
        Difficulty::Deep,
    ];

    /// Search depth in plies for the minimax tiers.
    pub fn search_depth(&self) -> Option<u32> {
        match self {
            Difficulty::Random | Difficulty::Greedy => None,
            Difficulty::Shallow => Some(2),
            Difficulty::Deep => Some(6),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Random => "random",
            Difficulty::Greedy => "greedy",
            Difficulty::Shallow => "shallow",
            Difficulty::Deep => "deep",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Value of a search leaf for `me`.
///
/// A board with an alignment scores `±(DECISIVE_SCORE + depth)`, so that a win found with
/// more depth left (sooner) ranks above a later one and a loss is pushed back as far as
/// possible.
fn leaf_value(board: &Board, depth: u32, me: Player, opponent: Player) -> Option<i32> {
    if has_alignment(board, me) {
        return Some(DECISIVE_SCORE + depth as i32);
    }
    if has_alignment(board, opponent) {
        return Some(-(DECISIVE_SCORE + depth as i32));
    }
    if depth == 0 || board.is_full() {
        return Some(evaluate(board, me, opponent));
    }
    None
}

/// Minimax with alpha-beta pruning over plain placements.
///
/// `board` is used as scratch space: every placement is undone before returning, so the
/// board is unchanged afterwards. Columns are tried left to right.
fn minimax(
    board: &mut Board,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    maximizing: bool,
    me: Player,
    opponent: Player,
) -> i32 {
    if let Some(value) = leaf_value(board, depth, me, opponent) {
        return value;
    }

    let mover = if maximizing { me } else { opponent };
    let mut best = if maximizing { i32::MIN } else { i32::MAX };

    for col in 0..board.width() {
        let Some(row) = board.place(col, mover) else {
            continue;
        };
        let value = minimax(board, depth - 1, alpha, beta, !maximizing, me, opponent);
        board.set_cell(row, col, Cell::Empty);

        if maximizing {
            best = best.max(value);
            alpha = alpha.max(value);
        } else {
            best = best.min(value);
            beta = beta.min(value);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

/// Searches `depth` plies ahead and returns the best column for `me` with its value.
///
/// Ties keep the leftmost column.
///
/// # Returns
/// `None` if the board is full or `depth` is zero.
///
/// # Examples
/// ```
/// use combo_four::engine::Player;
/// use combo_four::solver::search_column;
/// use combo_four::utils::board_from_str_array;
///
/// let board = board_from_str_array(&["AAA...."]).unwrap();
/// let (value, column) = search_column(&board, 2, Player::Ai, Player::Player1).unwrap();
/// assert_eq!(column, 3);
/// assert!(value > 1000);
/// ```
pub fn search_column(
    board: &Board,
    depth: u32,
    me: Player,
    opponent: Player,
) -> Option<(i32, usize)> {
    if depth == 0 {
        return None;
    }
    let mut scratch = board.clone();
    let mut alpha = i32::MIN;
    let mut best: Option<(i32, usize)> = None;

    for col in 0..scratch.width() {
        let Some(row) = scratch.place(col, me) else {
            continue;
        };
        let value = minimax(&mut scratch, depth - 1, alpha, i32::MAX, false, me, opponent);
        scratch.set_cell(row, col, Cell::Empty);
        log::trace!("depth {} column {} value {}", depth, col, value);

        if best.map_or(true, |(best_value, _)| value > best_value) {
            best = Some((value, col));
        }
        alpha = alpha.max(value);
    }
    best
}

/// A computer-controlled seat.
///
/// # Examples
/// ```
/// use combo_four::engine::Board;
/// use combo_four::solver::{AiPlayer, Difficulty};
///
/// let mut ai = AiPlayer::new(Difficulty::Greedy).with_seed(42);
/// assert_eq!(ai.select_column(&Board::new_empty()), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct AiPlayer {
    me: Player,
    opponent: Player,
    difficulty: Difficulty,
    rng: SmallRng,
}

impl AiPlayer {
    /// Plays the `Ai` seat against `Player1`, with an entropy-seeded generator.
    pub fn new(difficulty: Difficulty) -> Self {
        AiPlayer {
            me: Player::Ai,
            opponent: Player::Player1,
            difficulty,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seats(mut self, me: Player, opponent: Player) -> Self {
        self.me = me;
        self.opponent = opponent;
        self
    }

    /// Makes the random choices of the `Random` and `Greedy` tiers reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn me(&self) -> Player {
        self.me
    }

    pub fn opponent(&self) -> Player {
        self.opponent
    }

    /// Chooses the column to play on `board`.
    ///
    /// Always returns a column that is not full, or `None` if the board is full.
    pub fn select_column(&mut self, board: &Board) -> Option<usize> {
        let choice = match self.difficulty {
            Difficulty::Random => choose_column_random(board, &mut self.rng),
            Difficulty::Greedy => {
                choose_column_greedy(board, self.me, self.opponent, &mut self.rng)
            }
            Difficulty::Shallow | Difficulty::Deep => {
                let depth = self.difficulty.search_depth().unwrap_or(1);
                search_column(board, depth, self.me, self.opponent).map(|(value, col)| {
                    log::trace!(
                        "{} search picked column {} (value {})",
                        self.difficulty,
                        col,
                        value
                    );
                    col
                })
            }
        };
        log::trace!("{} ({}) chose {:?}", self.me, self.difficulty, choice);
        choice
    }
}
