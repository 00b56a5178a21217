//! Reveal sequencing for pass-the-device play.
//!
//! One seat at a time, in seat order, with no way back. A seat's word is
//! visible only while the cursor sits on it and the card is open. Advancing
//! closes the card, marks the seat as revealed, and moves on.
//!
//! ```text
//!   closed ──toggle──▶ open ──advance──▶ closed (next seat)
//!     ▲                 │                     │
//!     └─────toggle──────┘                     └─ last seat ─▶ Complete
//! ```

use super::player::Player;

/// Result of a successful advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// Cursor moved to this index
    Next(usize),
    /// Last seat done
    Complete,
}

/// Advance refused: the card was never opened for this seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardClosed;

/// Cursor plus open flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealSequencer {
    cursor: usize,
    open: bool,
}

impl RevealSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index into the player list of the seat holding the device.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show or hide the current seat's word. Never moves the cursor.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Pass the device on.
    ///
    /// Only valid while the card is open. Marks the current seat revealed.
    /// On the last seat the cursor stays put and `Complete` is returned.
    pub fn advance(&mut self, players: &mut [Player]) -> Result<RevealStep, CardClosed> {
        if !self.open {
            return Err(CardClosed);
        }

        self.open = false;
        if let Some(player) = players.get_mut(self.cursor) {
            player.mark_revealed();
        }

        if self.cursor + 1 < players.len() {
            self.cursor += 1;
            Ok(RevealStep::Next(self.cursor))
        } else {
            Ok(RevealStep::Complete)
        }
    }

    /// What the device should show right now.
    pub fn card<'a>(&self, players: &'a [Player]) -> Option<RevealCard<'a>> {
        let player = players.get(self.cursor)?;
        Some(RevealCard {
            seat: player.seat(),
            word: self.open.then(|| player.word()),
            is_last: self.cursor + 1 == players.len(),
        })
    }
}

/// The card for the seat currently holding the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCard<'a> {
    pub seat: u8,
    /// Present only while the card is open
    pub word: Option<&'a str>,
    /// Advancing from this seat ends the reveal phase
    pub is_last: bool,
}

impl RevealCard<'_> {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "seat": self.seat,
            "open": self.word.is_some(),
            "word": self.word,
            "is_last": self.is_last
        })
    }
}
