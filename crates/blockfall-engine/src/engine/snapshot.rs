use serde::{Deserialize, Serialize};

use crate::{Board, level_for_score};

/// Persisted state of a session: the locked cells, score and level.
///
/// The falling piece is not part of a snapshot; restoring spawns a fresh one.
/// `level` is kept for the file format but is recomputed from `score` when a
/// session is restored.
///
/// # Example
///
/// ```
/// use blockfall_engine::SessionSnapshot;
///
/// let snapshot = SessionSnapshot::default();
/// assert_eq!(snapshot.score, 0);
/// assert_eq!(snapshot.level, 1);
/// assert_eq!(snapshot.board.filled_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub score: u64,
    #[serde(default = "initial_level")]
    pub level: u64,
}

fn initial_level() -> u64 {
    level_for_score(0)
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: Board::EMPTY,
            score: 0,
            level: initial_level(),
        }
    }
}
