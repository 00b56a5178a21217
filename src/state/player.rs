//! Player records and roles.
//!
//! A player is identified by a 1-based seat that never changes for the
//! lifetime of a session. Roles are fixed at assignment; only `alive` and
//! `has_revealed` move, and each of them moves in one direction only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Faction a player belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Majority role, holds the common word
    Civilian,
    /// Minority role, holds the related word
    Spy,
    /// Reserved. Never assigned and not counted for either faction.
    Blank,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Civilian => "civilian",
            Self::Spy => "spy",
            Self::Blank => "blank",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    seat: u8,
    role: Role,
    word: String,
    alive: bool,
    has_revealed: bool,
}

impl Player {
    /// Create a living player who has not yet seen their word.
    pub fn new(seat: u8, role: Role, word: impl Into<String>) -> Self {
        Self {
            seat,
            role,
            word: word.into(),
            alive: true,
            has_revealed: false,
        }
    }

    pub fn seat(&self) -> u8 {
        self.seat
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_revealed(&self) -> bool {
        self.has_revealed
    }

    pub fn is_spy(&self) -> bool {
        self.role == Role::Spy
    }

    /// Flip `alive` to false. Returns false if the player was already out.
    pub(crate) fn kill(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }

    pub(crate) fn mark_revealed(&mut self) {
        self.has_revealed = true;
    }

    /// Public view. Role and word stay hidden unless `disclose` is set.
    pub fn to_json(&self, disclose: bool) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "seat": self.seat,
            "alive": self.alive,
            "has_revealed": self.has_revealed
        });
        if disclose {
            obj["role"] = serde_json::json!(self.role.as_str());
            obj["word"] = serde_json::json!(self.word);
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_player() {
        let p = Player::new(3, Role::Spy, "Pear");
        assert_eq!(p.seat(), 3);
        assert_eq!(p.role(), Role::Spy);
        assert_eq!(p.word(), "Pear");
        assert!(p.is_alive());
        assert!(!p.has_revealed());
        assert!(p.is_spy());
    }

    #[test]
    fn test_kill_is_one_way() {
        let mut p = Player::new(1, Role::Civilian, "Apple");
        assert!(p.kill());
        assert!(!p.is_alive());

        // Second kill reports it was already out
        assert!(!p.kill());
        assert!(!p.is_alive());
    }

    #[test]
    fn test_json_hides_secrets() {
        let p = Player::new(2, Role::Spy, "Pear");

        let hidden = p.to_json(false);
        assert!(hidden.get("role").is_none());
        assert!(hidden.get("word").is_none());

        let shown = p.to_json(true);
        assert_eq!(shown["role"], "spy");
        assert_eq!(shown["word"], "Pear");
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Civilian).unwrap(), "\"CIVILIAN\"");
        let blank: Role = serde_json::from_str("\"BLANK\"").unwrap();
        assert_eq!(blank, Role::Blank);
        assert_eq!(format!("{}", Role::Spy), "spy");
    }
}
