use std::time::Duration;

use crate::{ActivePiece, Board, PieceCollisionError};

use super::{GameStats, PieceGenerator, PieceSeed, Randomizer, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// A player action, already decoupled from whatever input produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
    /// Handled by the driver; the session itself does not change.
    Quit,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum IntentError {
    #[display("piece colliding when applying intent")]
    PieceCollision(PieceCollisionError),
    #[display("session is not playing")]
    NotPlaying,
}

/// One play session: board, falling piece, statistics and the gravity timer.
///
/// Time only advances through [`GameSession::tick`], so the whole simulation
/// is deterministic for a seeded [`PieceGenerator`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameSession, Intent, Randomizer};
///
/// let mut session = GameSession::new(Randomizer::Uniform);
/// let start = session.falling_piece().origin();
///
/// session.tick(Duration::from_millis(500));
/// assert_eq!(session.falling_piece().origin().y, start.y + 1);
///
/// session.apply_intent(Intent::HardDrop).unwrap();
/// assert_eq!(session.board().filled_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_piece: ActivePiece,
    stats: GameStats,
    session_state: SessionState,
    fall_timer: Duration,
    generator: PieceGenerator,
}

impl GameSession {
    /// Starts a fresh session on an empty board.
    #[must_use]
    pub fn new(randomizer: Randomizer) -> Self {
        Self::with_generator(PieceGenerator::new(randomizer))
    }

    #[must_use]
    pub fn with_generator(generator: PieceGenerator) -> Self {
        Self::from_snapshot(SessionSnapshot::default(), generator)
    }

    /// Resumes a saved session and spawns its first piece.
    ///
    /// The level stored in the snapshot is ignored; it is derived from the
    /// score. If the first piece cannot spawn, the session starts in
    /// [`SessionState::GameOver`] with the board untouched.
    #[must_use]
    pub fn from_snapshot(snapshot: SessionSnapshot, mut generator: PieceGenerator) -> Self {
        let board = snapshot.board;
        let falling_piece = ActivePiece::spawn(generator.pop_next());
        let session_state = if falling_piece.is_colliding(&board) {
            SessionState::GameOver
        } else {
            SessionState::Playing
        };
        Self {
            board,
            falling_piece,
            stats: GameStats::with_score(snapshot.score),
            session_state,
            fall_timer: Duration::ZERO,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &ActivePiece {
        &self.falling_piece
    }

    /// Where the falling piece would land if hard-dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> ActivePiece {
        self.falling_piece.ghost(&self.board)
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> u64 {
        self.stats.level()
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.stats.fall_interval()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Seed of the piece generator; replaying it deals the same kinds.
    #[must_use]
    pub fn piece_seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    /// Captures what a save file keeps: board, score and level.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            score: self.score(),
            level: self.level(),
        }
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Advances the gravity timer by `elapsed`.
    ///
    /// Once the timer exceeds the fall interval the piece moves down one row,
    /// or locks if it cannot. The timer is reset either way. Nothing happens
    /// unless the session is playing.
    pub fn tick(&mut self, elapsed: Duration) {
        if !self.session_state.is_playing() {
            return;
        }
        self.fall_timer += elapsed;
        if self.fall_timer <= self.fall_interval() {
            return;
        }
        self.fall_timer = Duration::ZERO;
        if !self.falling_piece.try_move(0, 1, &self.board) {
            self.lock_and_spawn();
        }
    }

    pub fn apply_intent(&mut self, intent: Intent) -> Result<(), IntentError> {
        match intent {
            Intent::MoveLeft => self.try_move_left(),
            Intent::MoveRight => self.try_move_right(),
            Intent::SoftDrop => self.try_soft_drop(),
            Intent::Rotate => self.try_rotate(),
            Intent::HardDrop => self.hard_drop_and_lock().map(|_| ()),
            Intent::TogglePause => {
                if self.session_state.is_game_over() {
                    return Err(IntentError::NotPlaying);
                }
                self.toggle_pause();
                Ok(())
            }
            Intent::Quit => Ok(()),
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), IntentError> {
        self.try_shift(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<(), IntentError> {
        self.try_shift(1, 0)
    }

    /// Moves the piece down one row. A blocked soft drop does not lock.
    pub fn try_soft_drop(&mut self) -> Result<(), IntentError> {
        self.try_shift(0, 1)
    }

    pub fn try_rotate(&mut self) -> Result<(), IntentError> {
        self.ensure_playing()?;
        if self.falling_piece.rotate(&self.board) {
            Ok(())
        } else {
            Err(IntentError::PieceCollision(PieceCollisionError))
        }
    }

    /// Drops the piece onto its ghost position and locks it at once.
    ///
    /// Returns the number of rows cleared by the lock.
    pub fn hard_drop_and_lock(&mut self) -> Result<usize, IntentError> {
        self.ensure_playing()?;
        self.falling_piece.hard_drop(&self.board);
        let cleared_lines = self.lock_and_spawn();
        self.fall_timer = Duration::ZERO;
        Ok(cleared_lines)
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), IntentError> {
        self.ensure_playing()?;
        if self.falling_piece.try_move(dx, dy, &self.board) {
            Ok(())
        } else {
            Err(IntentError::PieceCollision(PieceCollisionError))
        }
    }

    fn ensure_playing(&self) -> Result<(), IntentError> {
        if self.session_state.is_playing() {
            Ok(())
        } else {
            Err(IntentError::NotPlaying)
        }
    }

    fn lock_and_spawn(&mut self) -> usize {
        self.falling_piece.lock(&mut self.board);
        let cleared_lines = self.board.clear_completed_rows();
        self.stats.complete_piece_drop(cleared_lines);

        let next = ActivePiece::spawn(self.generator.pop_next());
        if next.is_colliding(&self.board) {
            // The board keeps its state from before the failed spawn
            self.session_state = SessionState::GameOver;
        } else {
            self.falling_piece = next;
        }
        cleared_lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Block, PieceSeed, ShapeKind, level_for_score};

    const SEED: &str = "00112233445566778899aabbccddeeff";

    fn generator(randomizer: Randomizer) -> PieceGenerator {
        let seed: PieceSeed = SEED.parse().unwrap();
        PieceGenerator::with_seed(randomizer, seed)
    }

    fn board_from(rows: &[&str]) -> Board {
        let mut all = vec![".........."; Board::ROWS - rows.len()];
        all.extend_from_slice(rows);
        Board::parse_rows(&all).unwrap()
    }

    fn session_on(board: Board) -> GameSession {
        let snapshot = SessionSnapshot {
            board,
            ..SessionSnapshot::default()
        };
        GameSession::from_snapshot(snapshot, generator(Randomizer::Uniform))
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::with_generator(generator(Randomizer::Bag));
        assert!(session.session_state().is_playing());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.board(), &Board::EMPTY);
        let piece = session.falling_piece();
        assert_eq!(*piece, ActivePiece::spawn(piece.kind()));
    }

    #[test]
    fn test_tick_waits_for_fall_interval() {
        let mut session = session_on(Board::EMPTY);
        assert_eq!(session.fall_interval(), Duration::from_millis(475));

        session.tick(Duration::from_millis(400));
        assert_eq!(session.falling_piece().origin().y, 0);
        session.tick(Duration::from_millis(100));
        assert_eq!(session.falling_piece().origin().y, 1);

        // The timer restarts from zero and must strictly exceed the interval
        session.tick(Duration::from_millis(475));
        assert_eq!(session.falling_piece().origin().y, 1);
        session.tick(Duration::from_millis(1));
        assert_eq!(session.falling_piece().origin().y, 2);
    }

    #[test]
    fn test_tick_locks_resting_piece() {
        let mut session = session_on(Board::EMPTY);
        session.falling_piece = ActivePiece::spawn(ShapeKind::O).moved(0, 18);

        session.tick(Duration::from_secs(1));
        assert_eq!(session.board().filled_count(), 4);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.falling_piece().origin().y, 0);
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut session = session_on(Board::EMPTY);
        session.apply_intent(Intent::TogglePause).unwrap();
        assert!(session.session_state().is_paused());

        let before = *session.falling_piece();
        session.tick(Duration::from_secs(10));
        for intent in [
            Intent::MoveLeft,
            Intent::MoveRight,
            Intent::SoftDrop,
            Intent::Rotate,
            Intent::HardDrop,
        ] {
            assert!(matches!(
                session.apply_intent(intent),
                Err(IntentError::NotPlaying)
            ));
        }
        assert_eq!(*session.falling_piece(), before);
        assert_eq!(session.board(), &Board::EMPTY);

        session.apply_intent(Intent::TogglePause).unwrap();
        assert!(session.session_state().is_playing());
        // Paused time did not count towards gravity
        session.tick(Duration::from_millis(10));
        assert_eq!(*session.falling_piece(), before);
    }

    #[test]
    fn test_move_commits_or_reverts() {
        let mut session = session_on(Board::EMPTY);
        session.falling_piece = ActivePiece::spawn(ShapeKind::T);
        while session.try_move_left().is_ok() {}
        assert_eq!(session.falling_piece().origin().x, 0);

        let before = *session.falling_piece();
        assert!(matches!(
            session.apply_intent(Intent::MoveLeft),
            Err(IntentError::PieceCollision(_))
        ));
        assert_eq!(*session.falling_piece(), before);

        session.apply_intent(Intent::MoveRight).unwrap();
        assert_eq!(session.falling_piece().origin().x, 1);
    }

    #[test]
    fn test_soft_drop_at_floor_does_not_lock() {
        let mut session = session_on(Board::EMPTY);
        session.falling_piece = ActivePiece::spawn(ShapeKind::I).moved(0, 19);
        assert!(session.try_soft_drop().is_err());
        assert_eq!(session.board().filled_count(), 0);
        assert_eq!(session.falling_piece().origin().y, 19);
    }

    #[test]
    fn test_rotate_square_is_unchanged() {
        let mut session = session_on(Board::EMPTY);
        session.falling_piece = ActivePiece::spawn(ShapeKind::O);
        let before = *session.falling_piece();
        session.apply_intent(Intent::Rotate).unwrap();
        assert_eq!(*session.falling_piece(), before);
    }

    #[test]
    fn test_hard_drop_lands_on_ghost() {
        let mut session = session_on(board_from(&["..0.......", "0000.00.00"]));
        for kind in ShapeKind::ALL {
            if !session.session_state().is_playing() {
                break;
            }
            session.falling_piece = ActivePiece::spawn(kind);
            let ghost = session.ghost_piece();
            session.hard_drop_and_lock().unwrap();
            for pos in ghost.occupied_positions() {
                let cell = session
                    .board()
                    .cell(pos.x.try_into().unwrap(), pos.y.try_into().unwrap());
                assert_eq!(cell, Some(Block::Filled(kind.appearance())), "{kind:?}");
            }
        }
    }

    #[test]
    fn test_hard_drop_clears_row_and_scores() {
        let mut session = session_on(board_from(&["....000000"]));
        session.falling_piece = ActivePiece::spawn(ShapeKind::I).moved(-3, 0);

        assert_eq!(session.hard_drop_and_lock().unwrap(), 1);
        assert_eq!(session.score(), 100);
        assert_eq!(session.board(), &Board::EMPTY);
        assert_eq!(session.stats().cleared_lines(), 1);
        assert!(session.session_state().is_playing());
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let board = board_from(&{
            let mut rows = vec!["...0000..."; 2];
            rows.extend(vec![".........."; Board::ROWS - 2]);
            rows
        });
        let session = session_on(board.clone());
        assert!(session.session_state().is_game_over());
        assert_eq!(session.board(), &board);
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let board = board_from(&{
            let mut rows = vec!["...0000..."; 2];
            rows.extend(vec![".........."; Board::ROWS - 2]);
            rows
        });
        let mut session = session_on(board.clone());
        assert!(matches!(
            session.apply_intent(Intent::TogglePause),
            Err(IntentError::NotPlaying)
        ));
        assert!(session.apply_intent(Intent::HardDrop).is_err());
        session.tick(Duration::from_secs(5));
        assert!(session.session_state().is_game_over());
        assert_eq!(session.board(), &board);
    }

    #[test]
    fn test_topping_out_through_gravity() {
        let mut rows = vec![".........."; 2];
        rows.extend(vec!["...0000..."; Board::ROWS - 2]);
        let mut session = session_on(board_from(&rows));
        assert!(session.session_state().is_playing());

        for _ in 0..100 {
            if session.session_state().is_game_over() {
                break;
            }
            session.tick(Duration::from_secs(1));
        }
        assert!(session.session_state().is_game_over());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_score_and_level_never_decrease() {
        let mut session = GameSession::with_generator(generator(Randomizer::Bag));
        let moves = [Intent::MoveLeft, Intent::Rotate, Intent::MoveRight];
        let mut prev = (session.score(), session.level());
        for step in 0..300 {
            if session.session_state().is_game_over() {
                break;
            }
            for _ in 0..step % 5 {
                let _ = session.apply_intent(moves[step % moves.len()]);
            }
            session.apply_intent(Intent::HardDrop).unwrap();

            assert!(session.score() >= prev.0);
            assert!(session.level() >= prev.1);
            assert_eq!(session.level(), level_for_score(session.score()));
            prev = (session.score(), session.level());
        }
    }

    #[test]
    fn test_snapshot_restores_score_and_derives_level() {
        let snapshot = SessionSnapshot {
            board: board_from(&["00000....0"]),
            score: 1200,
            level: 99,
        };
        let session = GameSession::from_snapshot(snapshot.clone(), generator(Randomizer::Uniform));
        assert_eq!(session.score(), 1200);
        assert_eq!(session.level(), 3);
        assert_eq!(session.fall_interval(), Duration::from_millis(425));

        let saved = session.snapshot();
        assert_eq!(saved.board, snapshot.board);
        assert_eq!(saved.score, 1200);
        assert_eq!(saved.level, 3);
    }

    #[test]
    fn test_piece_seed_replays_the_sequence() {
        let mut session = GameSession::with_generator(generator(Randomizer::Uniform));
        assert_eq!(session.piece_seed(), SEED.parse::<PieceSeed>().unwrap());

        let mut replay = generator(Randomizer::Uniform);
        for _ in 0..5 {
            assert_eq!(session.falling_piece().kind(), replay.pop_next());
            session.hard_drop_and_lock().unwrap();
        }
    }

    #[test]
    fn test_quit_leaves_session_untouched() {
        let mut session = session_on(Board::EMPTY);
        let before = *session.falling_piece();
        session.apply_intent(Intent::Quit).unwrap();
        assert_eq!(*session.falling_piece(), before);
        assert!(session.session_state().is_playing());
    }
}
