//! Session state.
//!
//! One `Session` value holds everything about the game in progress. The
//! controller owns it and is the only writer; the presentation layer reads
//! it through the getters here and through [`Session::to_json`], which never
//! leaks a role or word before the game is over (except the one open reveal
//! card).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::{Player, Role};
use super::reveal::{RevealCard, RevealSequencer};
use super::settings::GameSettings;

/// Session identifier. A fresh id is issued every time a session is
/// recreated.
pub type SessionId = u64;

/// Game phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Choosing player and spy counts
    #[default]
    Setup,
    /// Waiting on the word provider
    Loading,
    /// Passing the device around so each seat can read its word
    Reveal,
    /// Discussion and voting
    Playing,
    /// A faction has won
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Loading => "loading",
            Self::Reveal => "reveal",
            Self::Playing => "playing",
            Self::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two secret words for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub civilian: String,
    pub spy: String,
}

impl WordPair {
    pub fn new(civilian: impl Into<String>, spy: impl Into<String>) -> Self {
        Self {
            civilian: civilian.into(),
            spy: spy.into(),
        }
    }

    /// Word handed to a seat with this role.
    ///
    /// Blank seats get nothing.
    pub fn word_for(&self, role: Role) -> &str {
        match role {
            Role::Civilian => &self.civilian,
            Role::Spy => &self.spy,
            Role::Blank => "",
        }
    }

    /// Both words present after trimming and not the same word.
    pub fn is_playable(&self) -> bool {
        let civilian = self.civilian.trim();
        let spy = self.spy.trim();
        !civilian.is_empty() && !spy.is_empty() && civilian != spy
    }

    /// Copy with surrounding whitespace stripped from both words.
    pub fn trimmed(&self) -> Self {
        Self::new(self.civilian.trim(), self.spy.trim())
    }
}

/// End-of-game recap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub winner: Role,
    pub words: WordPair,
    pub spy_seats: Vec<u8>,
}

impl GameSummary {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "winner": self.winner.as_str(),
            "civilian_word": self.words.civilian,
            "spy_word": self.words.spy,
            "spy_seats": self.spy_seats
        })
    }
}

/// A single game from setup to game over.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,

    pub(crate) phase: Phase,

    pub(crate) settings: GameSettings,

    /// Set once the provider delivers a playable pair
    pub(crate) word_pair: Option<WordPair>,

    /// Seat order. Fixed in composition once dealt.
    pub(crate) players: Vec<Player>,

    pub(crate) reveal: RevealSequencer,

    /// Set if and only if the phase is `GameOver`
    pub(crate) winner: Option<Role>,

    /// User-facing message from the last failed word generation
    pub(crate) last_error: Option<String>,

    /// Provider request currently in flight, if any
    pub(crate) pending_request: Option<u64>,

    created_at: DateTime<Utc>,

    /// When the reveal phase began
    pub(crate) started_at: Option<DateTime<Utc>>,

    /// When a winner was declared
    pub(crate) ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session at setup with the given settings.
    pub fn new(id: SessionId, settings: GameSettings) -> Self {
        Self {
            id,
            phase: Phase::Setup,
            settings,
            word_pair: None,
            players: Vec::new(),
            reveal: RevealSequencer::new(),
            winner: None,
            last_error: None,
            pending_request: None,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn word_pair(&self) -> Option<&WordPair> {
        self.word_pair.as_ref()
    }

    /// All seats in order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player by 1-based seat.
    pub fn player(&self, seat: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.seat() == seat)
    }

    pub fn alive_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    pub fn reveal_cursor(&self) -> usize {
        self.reveal.cursor()
    }

    pub fn reveal_open(&self) -> bool {
        self.reveal.is_open()
    }

    /// The card the device should show, during the reveal phase only.
    pub fn current_reveal(&self) -> Option<RevealCard<'_>> {
        if self.phase != Phase::Reveal {
            return None;
        }
        self.reveal.card(&self.players)
    }

    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Winner, words and spy seats once the game is over.
    pub fn summary(&self) -> Option<GameSummary> {
        if self.phase != Phase::GameOver {
            return None;
        }
        let winner = self.winner?;
        let words = self.word_pair.clone()?;
        let spy_seats = self
            .players
            .iter()
            .filter(|p| p.is_spy())
            .map(|p| p.seat())
            .collect();

        Some(GameSummary {
            winner,
            words,
            spy_seats,
        })
    }

    /// Snapshot for the presentation layer.
    pub fn to_json(&self) -> serde_json::Value {
        let disclose = self.phase == Phase::GameOver;
        let players: Vec<serde_json::Value> =
            self.players.iter().map(|p| p.to_json(disclose)).collect();

        let mut obj = serde_json::json!({
            "session_id": self.id,
            "phase": self.phase.as_str(),
            "settings": self.settings.to_json(),
            "players": players,
            "alive_count": self.alive_count(),
            "winner": self.winner.map(|r| r.as_str()),
            "last_error": self.last_error,
            "created_at": self.created_at,
            "started_at": self.started_at,
            "ended_at": self.ended_at
        });

        if let Some(card) = self.current_reveal() {
            obj["reveal"] = card.to_json();
        }
        if let Some(summary) = self.summary() {
            obj["summary"] = summary.to_json();
        }
        obj
    }
}
