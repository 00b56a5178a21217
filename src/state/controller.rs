//! Session controller.
//!
//! Owns the one live [`Session`] and exposes the action surface. Every
//! action either applies completely or is rejected with an [`ActionError`]
//! and leaves the session untouched.
//!
//! # Phase Transitions
//!
//! ```text
//!            update_settings
//!              ┌──────┐
//!              ▼      │
//!         ┌─────────┐ │  start_game   ┌─────────┐
//!    ┌───▶│  Setup  │─┴──────────────▶│ Loading │
//!    │    └─────────┘◀────────────────└────┬────┘
//!    │         ▲      provider failed      │ provider delivered
//!    │         │                           ▼
//!    │         │                      ┌─────────┐
//!    │         │ end_game             │ Reveal  │◀─┐ toggle_reveal / advance
//!    │         │                      └────┬────┘──┘
//!    │         │                           │ last seat advanced
//!    │         │                           ▼
//!    │         │                      ┌─────────┐
//!    │         └──────────────────────│ Playing │◀─┐ eliminate (undecided)
//!    │                                └────┬────┘──┘
//!    │ restart                             │ eliminate (decided)
//!    │                                     ▼
//!    │                                ┌──────────┐
//!    └────────────────────────────────│ GameOver │
//!                                     └──────────┘
//! ```
//!
//! Starting a game is split into a ticket ([`WordRequest`]) and a completion
//! so the provider can be awaited anywhere. Each ticket is tagged with the
//! session id and a request id; a completion whose tag does not match the
//! live session's pending request is discarded.

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::elimination::{self, EliminationOutcome, EliminationRefused};
use super::player::Role;
use super::reveal::{RevealSequencer, RevealStep};
use super::roles::assign_roles;
use super::session::{Phase, Session, SessionId, WordPair};
use super::settings::{GameSettings, SettingsUpdate};
use crate::provider::{ProviderError, WordPairProvider};

/// Message shown at setup after word generation fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate words, please try again";

/// Actions on the controller surface, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    UpdateSettings,
    StartGame,
    ToggleReveal,
    Advance,
    Eliminate,
    EndGame,
    Restart,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateSettings => "update_settings",
            Self::StartGame => "start_game",
            Self::ToggleReveal => "toggle_reveal",
            Self::Advance => "advance",
            Self::Eliminate => "eliminate",
            Self::EndGame => "end_game",
            Self::Restart => "restart",
        }
    }
}

/// A rejected action. The session was not changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Action is not allowed in the current phase
    WrongPhase { action: ActionKind, phase: Phase },
    /// Advance before the current seat opened its card
    RevealClosed,
    /// No player sits at this seat
    UnknownSeat(u8),
    /// Player at this seat is already out
    AlreadyEliminated(u8),
    /// Provider result for a request that is no longer pending
    StaleRequest { request_id: u64 },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPhase { action, phase } => {
                write!(f, "Cannot {} during the {} phase", action.as_str(), phase)
            }
            Self::RevealClosed => write!(f, "Current word has not been revealed yet"),
            Self::UnknownSeat(seat) => write!(f, "No player at seat {}", seat),
            Self::AlreadyEliminated(seat) => write!(f, "Player {} is already out", seat),
            Self::StaleRequest { request_id } => {
                write!(f, "Word request {} is no longer pending", request_id)
            }
        }
    }
}

impl std::error::Error for ActionError {}

/// Why word generation failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Provider reported a failure
    Provider(ProviderError),
    /// Provider answered with words that cannot be played
    Unplayable(WordPair),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "Word provider failed: {}", e),
            Self::Unplayable(pair) => write!(
                f,
                "Unplayable word pair ({:?}, {:?})",
                pair.civilian, pair.spy
            ),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Result of feeding a provider answer back in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Roles dealt, reveal phase begun
    Dealt,
    /// Back at setup with `last_error` set
    Failed(GenerationError),
}

/// Ticket for one word provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRequest {
    pub session_id: SessionId,
    pub request_id: u64,
    topic: Option<String>,
}

impl WordRequest {
    /// Topic to pass to the provider. `None` means "surprise me".
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

/// Synchronous commands a presentation layer can send as JSON.
///
/// Starting a game is not here because it needs a provider; use
/// [`SessionController::start_game_with`] or the ticket API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    UpdateSettings(SettingsUpdate),
    ToggleReveal,
    Advance,
    Eliminate { seat: u8 },
    EndGame,
    Restart,
}

/// Owner of the live session.
#[derive(Debug)]
pub struct SessionController {
    session: Session,
    rng: StdRng,
    next_session_id: SessionId,
    next_request_id: u64,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    /// Controller with an OS-seeded RNG.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Controller whose role placement is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            session: Session::new(1, GameSettings::default()),
            rng,
            next_session_id: 2,
            next_request_id: 1,
        }
    }

    /// Read-only view of the live session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    fn require_phase(&self, action: ActionKind, phase: Phase) -> Result<(), ActionError> {
        if self.session.phase == phase {
            Ok(())
        } else {
            Err(ActionError::WrongPhase {
                action,
                phase: self.session.phase,
            })
        }
    }

    /// Discard the live session and start a fresh one at setup.
    ///
    /// Settings carry over. Any pending provider request dies with the old
    /// session id.
    fn replace_session(&mut self) {
        let settings = self.session.settings.clone();
        let old_id = self.session.id();
        self.session = Session::new(self.next_session_id, settings);
        self.next_session_id += 1;
        debug!(old_id, session_id = self.session.id(), "Session replaced");
    }

    /// Change settings at setup. Values are clamped, never rejected.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> Result<&GameSettings, ActionError> {
        self.require_phase(ActionKind::UpdateSettings, Phase::Setup)?;

        self.session.settings.apply(update);
        debug!(
            session_id = self.session.id(),
            total_players = self.session.settings.total_players(),
            spy_count = self.session.settings.spy_count(),
            topic = ?self.session.settings.topic(),
            "Settings updated"
        );
        Ok(&self.session.settings)
    }

    /// Begin a game: move to loading and issue a provider ticket.
    ///
    /// Rejected unless at setup, so at most one request is ever in flight.
    pub fn start_game(&mut self) -> Result<WordRequest, ActionError> {
        self.require_phase(ActionKind::StartGame, Phase::Setup)?;

        let request_id = self.next_request_id;
        self.next_request_id += 1;

        self.session.phase = Phase::Loading;
        self.session.last_error = None;
        self.session.pending_request = Some(request_id);

        let request = WordRequest {
            session_id: self.session.id(),
            request_id,
            topic: self.session.settings.topic().map(str::to_string),
        };
        info!(
            session_id = request.session_id,
            request_id,
            topic = ?request.topic(),
            "Requesting word pair"
        );
        Ok(request)
    }

    /// Feed a provider answer back in.
    ///
    /// A playable pair deals roles and opens the reveal phase. A provider
    /// error or unplayable pair returns to setup with `last_error` set and
    /// no word or player state. Answers for anything but the live pending
    /// request are rejected as stale.
    pub fn complete_generation(
        &mut self,
        request: &WordRequest,
        result: Result<WordPair, ProviderError>,
    ) -> Result<GenerationOutcome, ActionError> {
        let is_current = request.session_id == self.session.id()
            && self.session.pending_request == Some(request.request_id)
            && self.session.phase == Phase::Loading;
        if !is_current {
            warn!(
                session_id = self.session.id(),
                stale_session_id = request.session_id,
                request_id = request.request_id,
                "Discarding stale word pair result"
            );
            return Err(ActionError::StaleRequest {
                request_id: request.request_id,
            });
        }

        self.session.pending_request = None;

        let failure = match result {
            Ok(pair) if pair.is_playable() => {
                self.deal(pair.trimmed());
                return Ok(GenerationOutcome::Dealt);
            }
            Ok(pair) => GenerationError::Unplayable(pair),
            Err(e) => GenerationError::Provider(e),
        };

        warn!(
            session_id = self.session.id(),
            request_id = request.request_id,
            error = %failure,
            "Word generation failed"
        );
        self.session.phase = Phase::Setup;
        self.session.word_pair = None;
        self.session.players.clear();
        self.session.last_error = Some(GENERATION_FAILED_MESSAGE.to_string());
        Ok(GenerationOutcome::Failed(failure))
    }

    fn deal(&mut self, words: WordPair) {
        let settings = &self.session.settings;
        let players = assign_roles(
            settings.total_players(),
            settings.spy_count(),
            &words,
            &mut self.rng,
        );

        self.session.players = players;
        self.session.word_pair = Some(words);
        self.session.reveal = RevealSequencer::new();
        self.session.last_error = None;
        self.session.started_at = Some(chrono::Utc::now());
        self.session.phase = Phase::Reveal;

        info!(
            session_id = self.session.id(),
            players = self.session.players.len(),
            spies = self.session.settings.spy_count(),
            "Roles dealt, reveal started"
        );
    }

    /// Start a game and drive the provider to completion.
    ///
    /// The controller is borrowed for the whole call, so no other action can
    /// interleave with the request.
    pub async fn start_game_with<P>(&mut self, provider: &P) -> Result<GenerationOutcome, ActionError>
    where
        P: WordPairProvider + ?Sized,
    {
        let request = self.start_game()?;
        let result = provider.generate(request.topic()).await;
        self.complete_generation(&request, result)
    }

    /// Show or hide the current seat's word. Returns whether it is now shown.
    pub fn toggle_reveal(&mut self) -> Result<bool, ActionError> {
        self.require_phase(ActionKind::ToggleReveal, Phase::Reveal)?;
        Ok(self.session.reveal.toggle())
    }

    /// Hand the device to the next seat, or start play after the last one.
    pub fn advance(&mut self) -> Result<RevealStep, ActionError> {
        self.require_phase(ActionKind::Advance, Phase::Reveal)?;

        let session = &mut self.session;
        let step = session
            .reveal
            .advance(&mut session.players)
            .map_err(|_| ActionError::RevealClosed)?;

        match step {
            RevealStep::Next(cursor) => {
                debug!(session_id = session.id(), cursor, "Reveal advanced");
            }
            RevealStep::Complete => {
                session.phase = Phase::Playing;
                info!(session_id = session.id(), "All seats revealed, play begins");
            }
        }
        Ok(step)
    }

    /// Vote a seat out and check for a winner.
    pub fn eliminate(&mut self, seat: u8) -> Result<EliminationOutcome, ActionError> {
        self.require_phase(ActionKind::Eliminate, Phase::Playing)?;

        let session = &mut self.session;
        let outcome =
            elimination::eliminate(&mut session.players, seat).map_err(|refused| match refused {
                EliminationRefused::UnknownSeat(s) => ActionError::UnknownSeat(s),
                EliminationRefused::AlreadyEliminated(s) => ActionError::AlreadyEliminated(s),
            })?;

        debug!(
            session_id = session.id(),
            seat,
            spies_alive = outcome.remaining.spies,
            civilians_alive = outcome.remaining.civilians,
            "Player eliminated"
        );

        if let Some(winner) = outcome.winner {
            session.winner = Some(winner);
            session.ended_at = Some(chrono::Utc::now());
            session.phase = Phase::GameOver;
            info!(session_id = session.id(), winner = winner.as_str(), "Game over");
        }
        Ok(outcome)
    }

    /// Abandon a game in progress without a winner.
    pub fn end_game(&mut self) -> Result<(), ActionError> {
        self.require_phase(ActionKind::EndGame, Phase::Playing)?;
        info!(session_id = self.session.id(), "Game abandoned");
        self.replace_session();
        Ok(())
    }

    /// Leave the game over screen for a fresh setup.
    pub fn restart(&mut self) -> Result<(), ActionError> {
        self.require_phase(ActionKind::Restart, Phase::GameOver)?;
        self.replace_session();
        Ok(())
    }

    /// Run a synchronous command and return the session snapshot.
    pub fn dispatch(&mut self, command: Command) -> Result<serde_json::Value, ActionError> {
        match command {
            Command::UpdateSettings(update) => {
                self.update_settings(update)?;
            }
            Command::ToggleReveal => {
                self.toggle_reveal()?;
            }
            Command::Advance => {
                self.advance()?;
            }
            Command::Eliminate { seat } => {
                self.eliminate(seat)?;
            }
            Command::EndGame => self.end_game()?,
            Command::Restart => self.restart()?,
        }
        Ok(self.session.to_json())
    }

    /// Winner of the current game, if decided.
    pub fn winner(&self) -> Option<Role> {
        self.session.winner
    }
}
