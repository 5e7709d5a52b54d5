//! Session-level game logic built on the core data structures.
//!
//! - [`GameSession`] - One play session: gravity timer, intents, locking and game over
//! - [`GameStats`] - Score, derived level and fall interval, line-clear counters
//! - [`PieceGenerator`] - Uniform or 7-bag source of shape kinds
//! - [`SessionSnapshot`] - The persisted part of a session
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`], fresh or from a [`SessionSnapshot`]
//! 2. Feed it elapsed time with [`GameSession::tick`] and player [`Intent`]s
//! 3. Pieces that cannot fall further lock, completed rows clear, a new piece spawns
//! 4. The session ends when a new piece collides at spawn
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{GameSession, Intent, Randomizer};
//!
//! let mut session = GameSession::new(Randomizer::Bag);
//!
//! session.apply_intent(Intent::MoveLeft).ok();
//! session.apply_intent(Intent::Rotate).ok();
//! session.tick(Duration::from_millis(16));
//!
//! while session.session_state().is_playing() {
//!     session.apply_intent(Intent::HardDrop).unwrap();
//! }
//! assert!(session.session_state().is_game_over());
//! ```

pub use self::{game_session::*, game_stats::*, piece_generator::*, snapshot::*};

mod game_session;
mod game_stats;
mod piece_generator;
mod snapshot;
