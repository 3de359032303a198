use crate::detector::{has_alignment, Direction, ALIGNMENT_LEN};
use crate::engine::{Board, Cell, Player};
use rand::Rng;

/// Evaluation of a board on which `me` already has an alignment. Dominates every
/// positional score reachable on a real board.
pub const DECISIVE_SCORE: i32 = 1000;

/// Weight of the window term relative to the raw positional sum.
const WINDOW_SCALE: i32 = 10;

/// Greedy play prefers columns at most this far from the centre.
const CENTER_BAND_RADIUS: usize = 2;

/// Positional weight of a column: 5 for the centre, 3 next to it, 2 two away, 1 elsewhere.
///
/// The centre of an even-width board is the right-hand middle column.
pub fn column_weight(col: usize, width: usize) -> i32 {
    match col.abs_diff(width / 2) {
        0 => 5,
        1 => 3,
        2 => 2,
        _ => 1,
    }
}

/// Small bonus for lower rows. Row 0 is the top of the board.
fn row_bonus(row: usize) -> i32 {
    (row / 2) as i32
}

/// Sum over every settled piece of its column weight plus row bonus, counted positively for
/// `me` and negatively for `opponent`. Pieces of any other owner are ignored.
pub fn positional_score(board: &Board, me: Player, opponent: Player) -> i32 {
    let mut score = 0;
    for r in 0..board.height() {
        for c in 0..board.width() {
            let sign = match board.get_cell(r, c).settled_owner() {
                Some(p) if p == me => 1,
                Some(p) if p == opponent => -1,
                _ => continue,
            };
            score += sign * (column_weight(c, board.width()) + row_bonus(r));
        }
    }
    score
}

fn score_window(own: usize, opp: usize, empty: usize) -> i32 {
    match (own, opp, empty) {
        (3, 0, 1) => 5,
        (2, 0, 2) => 2,
        (0, 3, 1) => -5,
        (0, 2, 2) => -2,
        _ => 0,
    }
}

/// Potential-alignment term: scores every 4-cell window in the four scan directions by how
/// close it is to becoming an alignment for either side. Unscaled.
pub fn window_score(board: &Board, me: Player, opponent: Player) -> i32 {
    let mut score = 0;
    for r in 0..board.height() {
        for c in 0..board.width() {
            for direction in Direction::ALL {
                let (dr, dc) = direction.delta();
                let (er, ec) = (
                    r as isize + dr * (ALIGNMENT_LEN as isize - 1),
                    c as isize + dc * (ALIGNMENT_LEN as isize - 1),
                );
                if !board.contains(er, ec) {
                    continue;
                }

                let (mut own, mut opp, mut empty) = (0, 0, 0);
                for i in 0..ALIGNMENT_LEN as isize {
                    let cell = board.get_cell(
                        (r as isize + dr * i) as usize,
                        (c as isize + dc * i) as usize,
                    );
                    match cell.settled_owner() {
                        Some(p) if p == me => own += 1,
                        Some(p) if p == opponent => opp += 1,
                        Some(_) => {}
                        None if cell.is_empty() => empty += 1,
                        None => {}
                    }
                }
                score += score_window(own, opp, empty);
            }
        }
    }
    score
}

/// Evaluates `board` from the point of view of `me`.
///
/// Returns [`DECISIVE_SCORE`] if `me` has an alignment, its negation if `opponent` has one,
/// and otherwise the positional score plus ten times the window score.
///
/// # Examples
/// ```
/// use combo_four::engine::{Board, Player};
/// use combo_four::heuristics::evaluate;
/// use combo_four::utils::board_from_str_array;
///
/// assert_eq!(evaluate(&Board::new_empty(), Player::Ai, Player::Player1), 0);
///
/// let board = board_from_str_array(&["...A..."]).unwrap();
/// assert!(evaluate(&board, Player::Ai, Player::Player1) > 0);
/// assert!(evaluate(&board, Player::Player1, Player::Ai) < 0);
/// ```
pub fn evaluate(board: &Board, me: Player, opponent: Player) -> i32 {
    if has_alignment(board, me) {
        return DECISIVE_SCORE;
    }
    if has_alignment(board, opponent) {
        return -DECISIVE_SCORE;
    }
    positional_score(board, me, opponent) + WINDOW_SCALE * window_score(board, me, opponent)
}

/// Columns where a piece of `player` would complete an alignment right away, left to right.
pub fn winning_columns(board: &Board, player: Player) -> Vec<usize> {
    let mut scratch = board.clone();
    let mut columns = Vec::new();
    for col in board.open_columns() {
        if let Some(row) = scratch.place(col, player) {
            if has_alignment(&scratch, player) {
                columns.push(col);
            }
            scratch.set_cell(row, col, Cell::Empty);
        }
    }
    columns
}

/// Columns within the centre band, nearest to the centre first, left before right.
pub fn center_band_order(width: usize) -> Vec<usize> {
    let center = width / 2;
    let mut columns: Vec<usize> = (0..width)
        .filter(|c| c.abs_diff(center) <= CENTER_BAND_RADIUS)
        .collect();
    columns.sort_by_key(|&c| (c.abs_diff(center), c));
    columns
}

/// Chooses a column uniformly among the non-full ones.
///
/// # Returns
/// `None` if the board is full.
pub fn choose_column_random(board: &Board, rng: &mut impl Rng) -> Option<usize> {
    let open = board.open_columns();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.gen_range(0..open.len())])
}

/// Picks, among `candidates`, the column whose resulting board evaluates best for `me`.
/// The first candidate wins ties.
fn best_by_evaluation(
    board: &Board,
    candidates: &[usize],
    me: Player,
    opponent: Player,
) -> Option<usize> {
    let mut best: Option<(i32, usize)> = None;
    for &col in candidates {
        let mut next = board.clone();
        if next.place(col, me).is_none() {
            continue;
        }
        let value = evaluate(&next, me, opponent);
        if best.map_or(true, |(best_value, _)| value > best_value) {
            best = Some((value, col));
        }
    }
    best.map(|(_, col)| col)
}

/// Greedy-tactical choice for `me` playing against `opponent`.
///
/// 1. Complete an alignment if any column does so.
/// 2. Otherwise block a column where `opponent` would complete one.
/// 3. Otherwise take the first open column of the centre band, centre first.
/// 4. Otherwise pick uniformly among the remaining open columns.
///
/// When several columns qualify in step 1 or 2, the one that evaluates best after
/// playing it is taken.
///
/// # Returns
/// `None` if the board is full.
pub fn choose_column_greedy(
    board: &Board,
    me: Player,
    opponent: Player,
    rng: &mut impl Rng,
) -> Option<usize> {
    let wins = winning_columns(board, me);
    if !wins.is_empty() {
        return best_by_evaluation(board, &wins, me, opponent);
    }

    let threats = winning_columns(board, opponent);
    if !threats.is_empty() {
        return best_by_evaluation(board, &threats, me, opponent);
    }

    if let Some(col) = center_band_order(board.width())
        .into_iter()
        .find(|&c| !board.is_column_full(c))
    {
        return Some(col);
    }

    choose_column_random(board, rng)
}
