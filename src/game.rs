//! Game session and move resolution.
//!
//! `Game` owns the board, the scores and the turn. A move is resolved as a single
//! transaction against a private copy of that state:
//!
//! 1. place the piece in the requested column;
//! 2. loop: find alignments for the mover and then the opponent, mark their cells, score one
//!    point per alignment, stop immediately if someone reached the win threshold, otherwise
//!    clear the marked cells, apply gravity and look again;
//! 3. report a draw if the board is full, else pass the turn.
//!
//! The copy is committed only once resolution is complete, and every rejected request
//! leaves the session untouched.
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::detector::{find_alignments, removal_set, Alignment};
use crate::engine::{Board, Player};
use crate::error::{ConfigError, InvalidMove, MoveError};

/// How a game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinReason {
    /// The winner's score reached the configured threshold.
    Threshold,
    /// The other player ran out of time.
    Timeout,
}

/// Lifecycle of a session. Terminal statuses never change again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GameStatus {
    InProgress,
    Won { by: Player, reason: WinReason },
    Draw,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won { by, .. } => Some(*by),
            _ => None,
        }
    }
}

/// Which resolution phase a frame shows. `step` counts combo steps from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Placement,
    Mark { step: u32 },
    Clear { step: u32 },
    Gravity { step: u32 },
}

/// Board snapshot taken at a phase boundary, for the presentation layer to replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub board: Board,
}

/// Notifications emitted while a move resolves, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Placed {
        player: Player,
        row: usize,
        column: usize,
    },
    /// `player` completed `alignments` lines during combo step `step`.
    Connect4 {
        player: Player,
        alignments: u32,
        step: u32,
    },
    /// The move produced more than one combo step.
    Chain { steps: u32 },
    GameOver(GameStatus),
}

/// Everything a successful move produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: Player,
    pub column: usize,
    /// Landing row of the placed piece.
    pub row: usize,
    pub frames: Vec<Frame>,
    pub events: Vec<Event>,
    /// Points gained by each seat during this move, in seat order.
    pub score_deltas: [(Player, u32); 2],
    /// Number of resolution iterations that found at least one alignment.
    pub combo_steps: u32,
    pub status: GameStatus,
}

impl MoveOutcome {
    /// Board as it stands after the move. For a terminal move this is the board with the
    /// winning cells still marked.
    pub fn final_board(&self) -> &Board {
        // A successful move always records at least its placement frame.
        &self.frames[self.frames.len() - 1].board
    }

    pub fn is_chain(&self) -> bool {
        self.combo_steps > 1
    }

    /// Cell where the piece came to rest, as long as it is still the placed piece on the
    /// final board. `None` once a clear and gravity pass ran, since another piece may have
    /// fallen into that cell.
    pub fn landing_cell(&self) -> Option<(usize, usize)> {
        let settled = self
            .frames
            .iter()
            .any(|frame| matches!(frame.kind, FrameKind::Gravity { .. }));
        (!settled).then_some((self.row, self.column))
    }
}

/// Manages the state and progression of one game session.
///
/// # Examples
/// ```
/// use combo_four::config::SessionConfig;
/// use combo_four::engine::Player;
/// use combo_four::game::{Game, GameStatus};
///
/// let mut game = Game::new(SessionConfig::default()).unwrap();
/// assert_eq!(game.current_player(), Player::Player1);
///
/// let outcome = game.play(Player::Player1, 3).unwrap();
/// assert_eq!(outcome.row, 7);
/// assert_eq!(outcome.status, GameStatus::InProgress);
/// assert_eq!(game.current_player(), Player::Player2);
///
/// // Moving out of turn is rejected and changes nothing.
/// assert!(game.play(Player::Player1, 3).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    config: SessionConfig,
    board: Board,
    seats: [Player; 2],
    scores: [u32; 2],
    turn: usize,
    status: GameStatus,
    history: Vec<(Player, usize)>,
}

impl Game {
    /// Creates a session with an empty board.
    ///
    /// `Player1` takes the first seat and moves first. The second seat is `Ai` when the
    /// configuration names an AI difficulty, `Player2` otherwise.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let board = Board::with_size(config.height, config.width);
        Self::new_with_board(config, board)
    }

    /// Creates a session that starts from `initial_board`. The board's dimensions take
    /// precedence over the configured ones.
    pub fn new_with_board(
        mut config: SessionConfig,
        initial_board: Board,
    ) -> Result<Self, ConfigError> {
        config.height = initial_board.height();
        config.width = initial_board.width();
        config.validate()?;

        let second = if config.ai_difficulty.is_some() {
            Player::Ai
        } else {
            Player::Player2
        };
        Ok(Game {
            config,
            board: initial_board,
            seats: [Player::Player1, second],
            scores: [0, 0],
            turn: 0,
            status: GameStatus::InProgress,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seats(&self) -> [Player; 2] {
        self.seats
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn win_threshold(&self) -> u32 {
        self.config.win_threshold
    }

    /// Player whose move is expected next.
    pub fn current_player(&self) -> Player {
        self.seats[self.turn]
    }

    /// The other seated player, if `player` is seated.
    pub fn opponent_of(&self, player: Player) -> Option<Player> {
        self.seat_of(player).map(|seat| self.seats[1 - seat])
    }

    /// Score of `player`; zero for a player without a seat.
    pub fn score(&self, player: Player) -> u32 {
        self.seat_of(player).map_or(0, |seat| self.scores[seat])
    }

    /// Scores of both seats, in seat order.
    pub fn scores(&self) -> [(Player, u32); 2] {
        [
            (self.seats[0], self.scores[0]),
            (self.seats[1], self.scores[1]),
        ]
    }

    /// Accepted moves so far, oldest first.
    pub fn history(&self) -> &[(Player, usize)] {
        &self.history
    }

    fn seat_of(&self, player: Player) -> Option<usize> {
        self.seats.iter().position(|&p| p == player)
    }

    /// Plays a move for whoever's turn it is.
    pub fn play_current(&mut self, column: usize) -> Result<MoveOutcome, MoveError> {
        self.play(self.current_player(), column)
    }

    /// Processes a move by `player` in `column`.
    ///
    /// # Returns
    /// * `Ok(MoveOutcome)` with the phase frames, events, score deltas and resulting status.
    /// * `Err(MoveError)` if the game is over, `player` is not seated or not on turn, or the
    ///   column is full or outside the board. The session is unchanged in that case.
    pub fn play(&mut self, player: Player, column: usize) -> Result<MoveOutcome, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameAlreadyOver);
        }
        let seat = self.seat_of(player).ok_or(MoveError::NotSeated(player))?;
        if seat != self.turn {
            return Err(MoveError::NotYourTurn(player));
        }
        if column >= self.board.width() {
            return Err(MoveError::InvalidMove {
                column,
                reason: InvalidMove::OutOfRange {
                    width: self.board.width(),
                },
            });
        }

        let mut board = self.board.clone();
        let mut scores = self.scores;
        let row = board.place(column, player).ok_or(MoveError::InvalidMove {
            column,
            reason: InvalidMove::ColumnFull,
        })?;

        let mut frames = vec![Frame {
            kind: FrameKind::Placement,
            board: board.clone(),
        }];
        let mut events = vec![Event::Placed {
            player,
            row,
            column,
        }];

        // Acting player first: its notification fires first and it wins a shared finish.
        let order = [seat, 1 - seat];
        let mut step = 0;
        let mut status = GameStatus::InProgress;

        loop {
            let found: Vec<(usize, Vec<Alignment>)> = order
                .iter()
                .map(|&s| (s, find_alignments(&board, self.seats[s])))
                .filter(|(_, alignments)| !alignments.is_empty())
                .collect();
            if found.is_empty() {
                break;
            }
            step += 1;

            for (s, alignments) in &found {
                let cells: Vec<(usize, usize)> = removal_set(alignments).into_iter().collect();
                board.mark_for_removal(&cells);
                let points = alignments.len() as u32;
                scores[*s] += points;
                log::debug!(
                    "combo step {}: {} completed {} alignment(s), score now {}",
                    step,
                    self.seats[*s],
                    points,
                    scores[*s]
                );
                events.push(Event::Connect4 {
                    player: self.seats[*s],
                    alignments: points,
                    step,
                });
            }
            frames.push(Frame {
                kind: FrameKind::Mark { step },
                board: board.clone(),
            });

            if let Some(&winner) = order
                .iter()
                .find(|&&s| scores[s] >= self.config.win_threshold)
            {
                status = GameStatus::Won {
                    by: self.seats[winner],
                    reason: WinReason::Threshold,
                };
                break;
            }

            board.clear_marked();
            frames.push(Frame {
                kind: FrameKind::Clear { step },
                board: board.clone(),
            });
            board.apply_gravity();
            frames.push(Frame {
                kind: FrameKind::Gravity { step },
                board: board.clone(),
            });
        }

        if step > 1 {
            events.push(Event::Chain { steps: step });
        }
        if !status.is_terminal() && board.is_full() {
            status = GameStatus::Draw;
        }
        if status.is_terminal() {
            log::info!("game over after {} move(s): {:?}", self.history.len() + 1, status);
            events.push(Event::GameOver(status));
        }

        let score_deltas = [
            (self.seats[0], scores[0] - self.scores[0]),
            (self.seats[1], scores[1] - self.scores[1]),
        ];

        self.board = board;
        self.scores = scores;
        self.status = status;
        self.history.push((player, column));
        if !status.is_terminal() {
            self.turn = 1 - self.turn;
        }

        Ok(MoveOutcome {
            player,
            column,
            row,
            frames,
            events,
            score_deltas,
            combo_steps: step,
            status,
        })
    }

    /// Signals that `player` ran out of time, handing the win to the other seat.
    ///
    /// Returns the new status, or `None` if the game was already over or `player` has no
    /// seat (the signal is ignored).
    pub fn expire_time(&mut self, player: Player) -> Option<GameStatus> {
        if self.status.is_terminal() {
            return None;
        }
        let winner = self.opponent_of(player)?;
        self.status = GameStatus::Won {
            by: winner,
            reason: WinReason::Timeout,
        };
        log::info!("{} ran out of time, {} wins", player, winner);
        Some(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::has_alignment;
    use crate::engine::{Cell, Phase};
    use crate::solver::Difficulty;
    use crate::utils::board_from_str_array;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn config(threshold: u32) -> SessionConfig {
        SessionConfig::default().with_win_threshold(threshold)
    }

    fn frame_kinds(outcome: &MoveOutcome) -> Vec<FrameKind> {
        outcome.frames.iter().map(|f| f.kind).collect()
    }

    /// Full 8x7 board with no alignment and the top-left cell open.
    fn nearly_full_board() -> Board {
        board_from_str_array(&[
            ".XOOXXO", "OOXXOOX", "XXOOXXO", "OOXXOOX", "XXOOXXO", "OOXXOOX", "XXOOXXO",
            "OOXXOOX",
        ])
        .unwrap()
    }

    #[test]
    fn test_game_new() {
        let game = Game::new(SessionConfig::default()).unwrap();
        assert_eq!(game.board(), &Board::new_empty());
        assert_eq!(game.scores(), [(Player::Player1, 0), (Player::Player2, 0)]);
        assert_eq!(game.current_player(), Player::Player1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert!(game.history().is_empty());
    }

    #[test]
    fn test_game_new_against_ai_seats_ai() {
        let game = Game::new(SessionConfig::default().against_ai(Difficulty::Greedy)).unwrap();
        assert_eq!(game.seats(), [Player::Player1, Player::Ai]);
        assert_eq!(game.opponent_of(Player::Ai), Some(Player::Player1));
        assert_eq!(game.opponent_of(Player::Player2), None);
    }

    #[test]
    fn test_game_new_rejects_invalid_config() {
        let result = Game::new(config(2));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_vertical_four_clears_column_and_passes_turn() {
        let mut game = Game::new(config(3)).unwrap();
        for _ in 0..3 {
            game.play(Player::Player1, 3).unwrap();
            game.play(Player::Player2, 0).unwrap();
        }
        let outcome = game.play(Player::Player1, 3).unwrap();

        assert_eq!(outcome.row, 4);
        assert_eq!(outcome.combo_steps, 1);
        assert_eq!(
            outcome.score_deltas,
            [(Player::Player1, 1), (Player::Player2, 0)]
        );
        assert_eq!(
            frame_kinds(&outcome),
            vec![
                FrameKind::Placement,
                FrameKind::Mark { step: 1 },
                FrameKind::Clear { step: 1 },
                FrameKind::Gravity { step: 1 },
            ]
        );
        assert_eq!(
            outcome.events,
            vec![
                Event::Placed {
                    player: Player::Player1,
                    row: 4,
                    column: 3
                },
                Event::Connect4 {
                    player: Player::Player1,
                    alignments: 1,
                    step: 1
                },
            ]
        );
        assert_eq!(outcome.frames[1].board.get_cell(4, 3), Cell::marked(Player::Player1));

        assert_eq!(game.score(Player::Player1), 1);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.current_player(), Player::Player2);
        for r in 0..game.board().height() {
            assert_eq!(game.board().get_cell(r, 3), Cell::Empty);
        }
        assert_eq!(game.board().occupied_count(), 3);
        assert_eq!(game.history().len(), 7);
    }

    #[test]
    fn test_landing_cell_completes_horizontal_and_vertical() {
        let board = board_from_str_array(&["XXX....", "OOOX...", "XOXX...", "OXOX..."]).unwrap();
        let mut game = Game::new_with_board(config(3), board).unwrap();

        let outcome = game.play(Player::Player1, 3).unwrap();
        assert_eq!(outcome.row, 4);
        assert_eq!(
            outcome.events[1],
            Event::Connect4 {
                player: Player::Player1,
                alignments: 2,
                step: 1
            }
        );
        assert_eq!(game.score(Player::Player1), 2);
        assert_eq!(game.board().occupied_count(), 9);
        assert_eq!(game.board().gravity_violation(), None);
    }

    #[test]
    fn test_horizontal_and_vertical_sharing_bottom_cell_score_two() {
        let board = board_from_str_array(&["...X", "...X", "XXXX"]).unwrap();
        let mut game = Game::new_with_board(config(3), board).unwrap();

        let outcome = game.play(Player::Player1, 3).unwrap();
        assert_eq!(outcome.combo_steps, 1);
        assert_eq!(outcome.score_deltas[0], (Player::Player1, 2));
        let marked = &outcome.frames[1].board;
        let marked_count = (0..8)
            .flat_map(|r| (0..7).map(move |c| (r, c)))
            .filter(|&(r, c)| {
                matches!(
                    marked.get_cell(r, c),
                    Cell::Occupied {
                        phase: Phase::MarkedForRemoval,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(marked_count, 7);
        assert_eq!(game.board(), &Board::new_empty());
    }

    #[test]
    fn test_chain_scores_for_opponent() {
        let board = board_from_str_array(&[".OOO...", ".XXXO.."]).unwrap();
        let mut game = Game::new_with_board(config(3), board).unwrap();

        let outcome = game.play(Player::Player1, 0).unwrap();
        assert_eq!(outcome.combo_steps, 2);
        assert!(outcome.is_chain());
        assert_eq!(
            outcome.score_deltas,
            [(Player::Player1, 1), (Player::Player2, 1)]
        );
        assert_eq!(outcome.frames.len(), 7);
        assert_eq!(
            outcome.events[1..],
            [
                Event::Connect4 {
                    player: Player::Player1,
                    alignments: 1,
                    step: 1
                },
                Event::Connect4 {
                    player: Player::Player2,
                    alignments: 1,
                    step: 2
                },
                Event::Chain { steps: 2 },
            ]
        );
        // The opponent's line only exists after the first clear and gravity.
        let after_first_gravity = &outcome.frames[3].board;
        assert_eq!(outcome.frames[3].kind, FrameKind::Gravity { step: 1 });
        assert!(has_alignment(after_first_gravity, Player::Player2));
        assert_eq!(game.board(), &Board::new_empty());
        assert_eq!(game.current_player(), Player::Player2);
    }

    #[test]
    fn test_run_of_five_scores_two_and_clears_every_piece() {
        let board = board_from_str_array(&["O...O..", "XX.XXO."]).unwrap();
        let mut game = Game::new_with_board(config(5), board).unwrap();

        let outcome = game.play(Player::Player1, 2).unwrap();
        assert_eq!(outcome.row, 7);
        assert_eq!(outcome.combo_steps, 1);
        assert_eq!(
            outcome.score_deltas,
            [(Player::Player1, 2), (Player::Player2, 0)]
        );
        for c in 0..5 {
            assert_eq!(outcome.frames[1].board.get_cell(7, c), Cell::marked(Player::Player1));
        }
        assert_eq!(game.board().to_plain_rows()[7], "O...OO.");
        assert_eq!(game.board().occupied_count(), 3);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(outcome.landing_cell(), None);
    }

    #[test]
    fn test_landing_cell_only_without_gravity() {
        let mut game = Game::new(config(1)).unwrap();
        let quiet = game.play(Player::Player1, 3).unwrap();
        assert_eq!(quiet.landing_cell(), Some((7, 3)));

        let board = board_from_str_array(&["X", "XO", "XO"]).unwrap();
        let mut game = Game::new_with_board(config(3), board.clone()).unwrap();
        let cleared = game.play(Player::Player1, 0).unwrap();
        assert_eq!(cleared.combo_steps, 1);
        assert_eq!(cleared.landing_cell(), None);

        let mut game = Game::new_with_board(config(1), board).unwrap();
        let winning = game.play(Player::Player1, 0).unwrap();
        assert!(winning.status.is_terminal());
        assert_eq!(winning.landing_cell(), Some((4, 0)));
    }

    #[test]
    fn test_threshold_one_wins_without_clearing() {
        let mut game = Game::new(config(1)).unwrap();
        for _ in 0..3 {
            game.play(Player::Player1, 3).unwrap();
            game.play(Player::Player2, 0).unwrap();
        }
        let before_count = game.board().occupied_count();
        let outcome = game.play(Player::Player1, 3).unwrap();

        let won = GameStatus::Won {
            by: Player::Player1,
            reason: WinReason::Threshold,
        };
        assert_eq!(outcome.status, won);
        assert_eq!(
            frame_kinds(&outcome),
            vec![FrameKind::Placement, FrameKind::Mark { step: 1 }]
        );
        assert_eq!(outcome.events.last(), Some(&Event::GameOver(won)));
        assert_eq!(game.status(), won);
        assert_eq!(game.board().occupied_count(), before_count + 1);
        for r in 4..8 {
            assert_eq!(game.board().get_cell(r, 3), Cell::marked(Player::Player1));
        }
        assert_eq!(outcome.final_board(), game.board());

        assert_eq!(game.play(Player::Player2, 1), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_simultaneous_threshold_goes_to_mover() {
        let board = board_from_str_array(&["......O", "......O", "......O", "XXX...O"]).unwrap();
        let mut game = Game::new_with_board(config(3), board).unwrap();
        game.scores = [2, 2];

        let outcome = game.play(Player::Player1, 3).unwrap();
        assert_eq!(
            outcome.status,
            GameStatus::Won {
                by: Player::Player1,
                reason: WinReason::Threshold
            }
        );
        assert_eq!(game.score(Player::Player1), 3);
        assert_eq!(game.score(Player::Player2), 3);
        assert_eq!(
            outcome.events[1],
            Event::Connect4 {
                player: Player::Player1,
                alignments: 1,
                step: 1
            }
        );
        assert_eq!(
            outcome.events[2],
            Event::Connect4 {
                player: Player::Player2,
                alignments: 1,
                step: 1
            }
        );
    }

    #[test]
    fn test_simultaneous_threshold_follows_acting_player() {
        let board = board_from_str_array(&["......X", "......X", "......X", "OOO...X"]).unwrap();
        let mut game = Game::new_with_board(config(3), board).unwrap();
        game.scores = [2, 2];
        game.turn = 1;

        let outcome = game.play(Player::Player2, 3).unwrap();
        assert_eq!(outcome.status.winner(), Some(Player::Player2));
        assert_eq!(
            outcome.events[1],
            Event::Connect4 {
                player: Player::Player2,
                alignments: 1,
                step: 1
            }
        );
    }

    #[test]
    fn test_full_board_is_draw() {
        let mut game = Game::new_with_board(config(3), nearly_full_board()).unwrap();
        let outcome = game.play(Player::Player1, 0).unwrap();
        assert_eq!(outcome.status, GameStatus::Draw);
        assert_eq!(outcome.combo_steps, 0);
        assert_eq!(outcome.events.last(), Some(&Event::GameOver(GameStatus::Draw)));
        assert!(game.is_game_over());
        assert_eq!(game.play(Player::Player2, 0), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_column_full_is_rejected_without_change() {
        let mut game = Game::new(config(3)).unwrap();
        let mut player = Player::Player1;
        for _ in 0..8 {
            game.play(player, 0).unwrap();
            player = game.current_player();
        }
        let board_before = game.board().clone();
        let turn_before = game.current_player();

        let err = game.play(turn_before, 0).unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidMove {
                column: 0,
                reason: InvalidMove::ColumnFull
            }
        );
        assert_eq!(game.board(), &board_before);
        assert_eq!(game.current_player(), turn_before);
        assert_eq!(game.history().len(), 8);
    }

    #[test]
    fn test_out_of_range_column_is_rejected() {
        let mut game = Game::new(config(3)).unwrap();
        let err = game.play(Player::Player1, 7).unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidMove {
                column: 7,
                reason: InvalidMove::OutOfRange { width: 7 }
            }
        );
        assert_eq!(game.board(), &Board::new_empty());
    }

    #[test]
    fn test_wrong_seat_is_rejected() {
        let mut game = Game::new(config(3)).unwrap();
        assert_eq!(
            game.play(Player::Player2, 0),
            Err(MoveError::NotYourTurn(Player::Player2))
        );
        assert_eq!(game.play(Player::Ai, 0), Err(MoveError::NotSeated(Player::Ai)));
        assert_eq!(game.current_player(), Player::Player1);
    }

    #[test]
    fn test_expire_time_awards_opponent() {
        let mut game = Game::new(config(3)).unwrap();
        game.play_current(2).unwrap();

        assert_eq!(game.expire_time(Player::Ai), None);
        let status = game.expire_time(Player::Player2).unwrap();
        assert_eq!(
            status,
            GameStatus::Won {
                by: Player::Player1,
                reason: WinReason::Timeout
            }
        );
        assert_eq!(game.expire_time(Player::Player1), None);
        assert_eq!(game.status(), status);
        assert_eq!(game.play_current(2), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn test_random_playouts_keep_invariants() {
        for seed in 0..60u64 {
            let threshold = [1, 3, 5][seed as usize % 3];
            let mut game = Game::new(config(threshold)).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut moves = 0;

            while !game.is_game_over() {
                let open = game.board().open_columns();
                let column = open[rng.gen_range(0..open.len())];
                let before = game.scores();
                let outcome = game.play_current(column).unwrap();
                moves += 1;
                assert!(moves <= 500, "seed {seed} did not finish");

                // Each combo step clears at least one line, so the loop is bounded by the area.
                assert!(outcome.combo_steps as usize <= 8 * 7 / 4);
                for (seat, (player, score)) in game.scores().into_iter().enumerate() {
                    assert!(score >= before[seat].1);
                    assert_eq!(score - before[seat].1, outcome.score_deltas[seat].1);
                    let won = outcome.status.winner() == Some(player);
                    if won {
                        assert!(score >= threshold);
                    }
                }
                match outcome.status {
                    GameStatus::InProgress => {
                        for (_, score) in game.scores() {
                            assert!(score < threshold);
                        }
                        assert_eq!(game.board().gravity_violation(), None);
                        assert!(!has_alignment(game.board(), Player::Player1));
                        assert!(!has_alignment(game.board(), Player::Player2));
                    }
                    GameStatus::Won { reason, .. } => assert_eq!(reason, WinReason::Threshold),
                    GameStatus::Draw => assert!(game.board().is_full()),
                }
            }
        }
    }
}
