//! Elimination and win evaluation.
//!
//! A vote's outcome is a seat. Removing it is irreversible, and after every
//! removal the living factions are recounted:
//!
//! 1. no spies alive: civilians win
//! 2. spies alive >= civilians alive: spies win
//! 3. otherwise play continues
//!
//! The zero-spy check must come first so an empty table resolves to a
//! civilian win rather than `0 >= 0` handing it to the spies.

use super::player::{Player, Role};

/// Living players per faction. Blank seats count for neither side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactionCount {
    pub spies: usize,
    pub civilians: usize,
}

impl FactionCount {
    pub fn of(players: &[Player]) -> Self {
        players
            .iter()
            .filter(|p| p.is_alive())
            .fold(Self::default(), |mut count, p| {
                match p.role() {
                    Role::Spy => count.spies += 1,
                    Role::Civilian => count.civilians += 1,
                    Role::Blank => {}
                }
                count
            })
    }

    /// Winning faction, if the game is decided.
    pub fn winner(&self) -> Option<Role> {
        if self.spies == 0 {
            Some(Role::Civilian)
        } else if self.spies >= self.civilians {
            Some(Role::Spy)
        } else {
            None
        }
    }
}

/// Winning faction for the current table, if any.
pub fn evaluate_winner(players: &[Player]) -> Option<Role> {
    FactionCount::of(players).winner()
}

/// Why an elimination was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EliminationRefused {
    UnknownSeat(u8),
    AlreadyEliminated(u8),
}

/// What an accepted elimination did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliminationOutcome {
    pub seat: u8,
    /// Role of the eliminated player
    pub role: Role,
    pub remaining: FactionCount,
    /// Set when this elimination decided the game
    pub winner: Option<Role>,
}

impl EliminationOutcome {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "seat": self.seat,
            "spies_alive": self.remaining.spies,
            "civilians_alive": self.remaining.civilians,
            "winner": self.winner.map(|r| r.as_str())
        })
    }
}

/// Take `seat` out of the game and re-evaluate.
///
/// Seats are 1-based. A dead or unknown seat is refused and nothing
/// changes, so repeat calls never double count.
pub fn eliminate(players: &mut [Player], seat: u8) -> Result<EliminationOutcome, EliminationRefused> {
    let player = players
        .iter_mut()
        .find(|p| p.seat() == seat)
        .ok_or(EliminationRefused::UnknownSeat(seat))?;

    if !player.kill() {
        return Err(EliminationRefused::AlreadyEliminated(seat));
    }
    let role = player.role();

    let remaining = FactionCount::of(players);
    Ok(EliminationOutcome {
        seat,
        role,
        remaining,
        winner: remaining.winner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Seats in order, spies at the given seats.
    fn table(n: u8, spy_seats: &[u8]) -> Vec<Player> {
        (1..=n)
            .map(|seat| {
                if spy_seats.contains(&seat) {
                    Player::new(seat, Role::Spy, "Pear")
                } else {
                    Player::new(seat, Role::Civilian, "Apple")
                }
            })
            .collect()
    }

    #[test]
    fn test_eliminating_sole_spy_is_civilian_win() {
        let mut players = table(3, &[2]);
        let outcome = eliminate(&mut players, 2).unwrap();
        assert_eq!(outcome.role, Role::Spy);
        assert_eq!(outcome.winner, Some(Role::Civilian));
        assert_eq!(
            outcome.remaining,
            FactionCount {
                spies: 0,
                civilians: 2
            }
        );
    }

    #[test]
    fn test_spy_parity_is_spy_win() {
        let mut players = table(3, &[1]);
        let outcome = eliminate(&mut players, 3).unwrap();
        assert_eq!(outcome.role, Role::Civilian);
        assert_eq!(outcome.winner, Some(Role::Spy));
    }

    #[test]
    fn test_spy_majority_is_spy_win() {
        let mut players = table(2, &[1]);
        players[1].kill();
        assert_eq!(evaluate_winner(&players), Some(Role::Spy));
    }

    #[test]
    fn test_empty_table_goes_to_civilians() {
        let mut players = table(3, &[1]);
        for p in players.iter_mut() {
            p.kill();
        }
        assert_eq!(FactionCount::of(&players), FactionCount::default());
        assert_eq!(evaluate_winner(&players), Some(Role::Civilian));
    }

    #[test]
    fn test_game_continues_while_civilians_outnumber() {
        let mut players = table(7, &[1, 2]);
        let outcome = eliminate(&mut players, 7).unwrap();
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.remaining.civilians, 4);
        assert_eq!(outcome.remaining.spies, 2);
    }

    #[test]
    fn test_double_elimination_refused() {
        let mut players = table(7, &[1, 2]);
        eliminate(&mut players, 5).unwrap();

        let again = eliminate(&mut players, 5);
        assert_eq!(again, Err(EliminationRefused::AlreadyEliminated(5)));
        assert!(!players[4].is_alive());
        assert_eq!(FactionCount::of(&players).civilians, 4);
    }

    #[test]
    fn test_unknown_seat_refused() {
        let mut players = table(4, &[1]);
        assert_eq!(eliminate(&mut players, 0), Err(EliminationRefused::UnknownSeat(0)));
        assert_eq!(eliminate(&mut players, 5), Err(EliminationRefused::UnknownSeat(5)));
        assert!(players.iter().all(|p| p.is_alive()));
    }

    #[test]
    fn test_blank_counts_for_nobody() {
        let players = vec![
            Player::new(1, Role::Spy, "Pear"),
            Player::new(2, Role::Civilian, "Apple"),
            Player::new(3, Role::Civilian, "Apple"),
            Player::new(4, Role::Blank, ""),
        ];
        let count = FactionCount::of(&players);
        assert_eq!(count.spies, 1);
        assert_eq!(count.civilians, 2);
        assert_eq!(count.winner(), None);
    }
}
