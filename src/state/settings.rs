//! Game settings and the clamp-on-write rules that guard them.
//!
//! Out-of-range values are corrected, never rejected. The clamp here is the
//! only thing standing between user input and the role assignment
//! precondition `1 <= spy_count <= (total_players - 1) / 2`.

use serde::{Deserialize, Deserializer, Serialize};

/// Fewest seats a game can have.
pub const MIN_PLAYERS: u8 = 3;

/// Most seats a game can have.
pub const MAX_PLAYERS: u8 = 12;

/// Fewest spies a game can have.
pub const MIN_SPIES: u8 = 1;

pub const DEFAULT_TOTAL_PLAYERS: u8 = 6;

pub const DEFAULT_SPY_COUNT: u8 = 1;

/// Largest spy count allowed for a table of `total_players`.
///
/// Spies must stay strictly below half the table.
pub fn max_spies(total_players: u8) -> u8 {
    (total_players.saturating_sub(1) / 2).max(MIN_SPIES)
}

/// Settings for the next game.
///
/// Deserialisation goes through [`SettingsUpdate`] so decoded values are
/// clamped like any other write. Field names match [`GameSettings::to_json`],
/// so a snapshot's `settings` object decodes back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsUpdate")]
pub struct GameSettings {
    total_players: u8,
    spy_count: u8,
    topic: Option<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_players: DEFAULT_TOTAL_PLAYERS,
            spy_count: DEFAULT_SPY_COUNT,
            topic: None,
        }
    }
}

impl GameSettings {
    /// Build settings, clamping both counts into range.
    pub fn new(total_players: u8, spy_count: u8, topic: Option<String>) -> Self {
        Self::from(SettingsUpdate {
            total_players: Some(total_players),
            spy_count: Some(spy_count),
            topic,
        })
    }

    pub fn total_players(&self) -> u8 {
        self.total_players
    }

    pub fn spy_count(&self) -> u8 {
        self.spy_count
    }

    pub fn civilian_count(&self) -> u8 {
        self.total_players - self.spy_count
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Apply a partial update. Player count is applied before spy count so
    /// the spy bound is computed against the new table size.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(total) = update.total_players {
            let total = total.clamp(MIN_PLAYERS, MAX_PLAYERS);
            if total != self.total_players {
                self.total_players = total;
                // Never let a player-count edit drop spies to zero
                self.spy_count = self.spy_count.min(max_spies(total)).max(MIN_SPIES);
            }
        }

        if let Some(spies) = update.spy_count {
            self.spy_count = spies.clamp(MIN_SPIES, max_spies(self.total_players));
        }

        if let Some(topic) = update.topic {
            let trimmed = topic.trim();
            self.topic = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total_players": self.total_players,
            "spy_count": self.spy_count,
            "max_spies": max_spies(self.total_players),
            "topic": self.topic
        })
    }
}

impl From<SettingsUpdate> for GameSettings {
    fn from(update: SettingsUpdate) -> Self {
        let mut settings = Self::default();
        settings.apply(update);
        settings
    }
}

/// Partial settings change. Absent fields are left alone.
///
/// Decoded counts saturate into `u8` before the clamp, so `300` or `-1`
/// still land on the nearest bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    #[serde(deserialize_with = "saturating_count")]
    pub total_players: Option<u8>,
    #[serde(deserialize_with = "saturating_count")]
    pub spy_count: Option<u8>,
    /// An empty or blank topic clears it
    pub topic: Option<String>,
}

impl SettingsUpdate {
    pub fn total_players(total: u8) -> Self {
        Self {
            total_players: Some(total),
            ..Self::default()
        }
    }

    pub fn spy_count(spies: u8) -> Self {
        Self {
            spy_count: Some(spies),
            ..Self::default()
        }
    }

    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::default()
        }
    }
}

fn saturating_count<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = Option::<i64>::deserialize(deserializer)?;
    Ok(count.map(|n| n.clamp(0, i64::from(u8::MAX)) as u8))
}
