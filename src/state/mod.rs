//! State management for an Undercover game session.
//!
//! - `settings` - Player/spy counts and the clamp rules that guard them
//! - `player` - Seats, roles and per-seat flags
//! - `roles` - Shuffled role assignment
//! - `reveal` - One-seat-at-a-time word reveal
//! - `elimination` - Voting a seat out and deciding the winner
//! - `session` - The single session value and its read model
//! - `controller` - Phase transitions and the action surface
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         SessionController                            │
//! │                                                                      │
//! │  ┌────────────────────────────────────────────────────────────────┐  │
//! │  │                           Session                              │  │
//! │  │                                                                │  │
//! │  │  phase, settings, word_pair, players, reveal, winner,          │  │
//! │  │  last_error, pending_request                                   │  │
//! │  └────────────────────────────────────────────────────────────────┘  │
//! │         ▲                  ▲                    ▲                    │
//! │         │ deal             │ toggle / advance   │ eliminate          │
//! │  ┌──────┴──────┐   ┌───────┴────────┐   ┌───────┴────────┐           │
//! │  │    roles    │   │     reveal     │   │  elimination   │           │
//! │  └─────────────┘   └────────────────┘   └────────────────┘           │
//! │                                                                      │
//! │  start_game ──▶ WordRequest ──▶ provider ──▶ complete_generation     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod controller;
pub mod elimination;
pub mod player;
pub mod reveal;
pub mod roles;
pub mod session;
pub mod settings;

// Re-export commonly used types
pub use controller::{
    ActionError, ActionKind, Command, GenerationError, GenerationOutcome, SessionController,
    WordRequest, GENERATION_FAILED_MESSAGE,
};
pub use elimination::{evaluate_winner, EliminationOutcome, FactionCount};
pub use player::{Player, Role};
pub use reveal::{CardClosed, RevealCard, RevealSequencer, RevealStep};
pub use roles::assign_roles;
pub use session::{GameSummary, Phase, Session, SessionId, WordPair};
pub use settings::{
    max_spies, GameSettings, SettingsUpdate, DEFAULT_SPY_COUNT, DEFAULT_TOTAL_PLAYERS,
    MAX_PLAYERS, MIN_PLAYERS, MIN_SPIES,
};
