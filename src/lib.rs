//! Undercover State Library
//!
//! This crate provides the session state machine for Undercover, a
//! pass-the-device party game. Most players share a word, a few spies hold
//! a related one, and the table votes seats out until one side wins.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Settings** - Player and spy counts, clamped on every write so a game
//!   can always be dealt.
//!
//! - **Role Assignment** - Spies placed by a Fisher-Yates shuffle over an
//!   injected RNG.
//!
//! - **Reveal Sequencing** - Each seat reads its word in turn, once, with no
//!   way back.
//!
//! - **Elimination** - Irreversible vote-outs and the win check.
//!
//! - **Session Controller** - Phase transitions and the action surface.
//!
//! The `provider` module defines where the words come from.
//!
//! # Design Principles
//!
//! 1. **Rejected actions change nothing** - Every action either applies fully
//!    or returns an error with the session untouched.
//!
//! 2. **One owned session** - The controller owns the session; restarting
//!    replaces it wholesale.
//!
//! 3. **Tagged provider calls** - Word requests carry the session and
//!    request id, so a late answer cannot land in a newer game.
//!
//! 4. **No presentation** - This crate is pure state. Snapshots are
//!    available as JSON for whatever draws the screen.
//!
//! # Example
//!
//! ```rust
//! use undercover_state::state::{Phase, SessionController, SettingsUpdate, WordPair};
//!
//! let mut game = SessionController::with_seed(42);
//! game.update_settings(SettingsUpdate::total_players(4)).unwrap();
//!
//! // Ask for words, then hand the answer back
//! let request = game.start_game().unwrap();
//! game.complete_generation(&request, Ok(WordPair::new("Apple", "Pear")))
//!     .unwrap();
//! assert_eq!(game.phase(), Phase::Reveal);
//!
//! // Each seat looks at its word and passes the device on
//! for _ in 0..4 {
//!     game.toggle_reveal().unwrap();
//!     game.advance().unwrap();
//! }
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! // Vote out the spy
//! let spy = game
//!     .session()
//!     .players()
//!     .iter()
//!     .find(|p| p.is_spy())
//!     .map(|p| p.seat())
//!     .unwrap();
//! game.eliminate(spy).unwrap();
//! assert_eq!(game.phase(), Phase::GameOver);
//! ```

pub mod provider;
pub mod state;

// Re-export everything from state module at crate root
pub use provider::{ProviderError, WithFallback, WordBank, WordPairProvider};
pub use state::*;
