use std::time::Duration;

/// Points awarded per cleared row, regardless of how many rows clear at once.
pub const SCORE_PER_LINE: u64 = 100;

/// Score needed to advance one level.
pub const SCORE_PER_LEVEL: u64 = 500;

const BASE_FALL_INTERVAL_MS: u64 = 500;
const FALL_INTERVAL_STEP_MS: u64 = 25;
const MIN_FALL_INTERVAL_MS: u64 = 100;

/// Level reached with `score` points. Levels start at 1.
///
/// # Example
///
/// ```
/// use blockfall_engine::level_for_score;
///
/// assert_eq!(level_for_score(0), 1);
/// assert_eq!(level_for_score(499), 1);
/// assert_eq!(level_for_score(500), 2);
/// ```
#[must_use]
pub const fn level_for_score(score: u64) -> u64 {
    score / SCORE_PER_LEVEL + 1
}

/// Time between gravity steps at `level`, floored at 100ms.
#[must_use]
pub fn fall_interval_for_level(level: u64) -> Duration {
    let millis = BASE_FALL_INTERVAL_MS
        .saturating_sub(level.saturating_mul(FALL_INTERVAL_STEP_MS))
        .max(MIN_FALL_INTERVAL_MS);
    Duration::from_millis(millis)
}

/// Score and line-clear statistics for one session.
///
/// Scoring is flat: every cleared row is worth [`SCORE_PER_LINE`] no matter
/// how many rows clear together. Level and fall interval are derived from the
/// score on demand and never stored.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 400);
/// assert_eq!(stats.cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: u64,
    completed_pieces: usize,
    cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates statistics with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_score(0)
    }

    /// Creates statistics resuming from a saved score.
    ///
    /// Per-session counters start from zero since saves only keep the score.
    #[must_use]
    pub const fn with_score(score: u64) -> Self {
        Self {
            score,
            completed_pieces: 0,
            cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u64 {
        level_for_score(self.score)
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        fall_interval_for_level(self.level())
    }

    /// Number of pieces locked in this session.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Total rows cleared in this session.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Histogram of locks by rows cleared; index 4 counts four-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score += cleared_lines as u64 * SCORE_PER_LINE;
    }
}
