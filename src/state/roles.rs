//! Role assignment.
//!
//! Builds the seat list for a new game: `spy_count` spies and the rest
//! civilians, placed by an unbiased Fisher-Yates shuffle drawn from the
//! caller's RNG. Passing a seeded RNG makes the placement reproducible.

use rand::Rng;

use super::player::{Player, Role};
use super::session::WordPair;

/// Shuffle `roles` in place.
///
/// For each index from the last down to 1, swap it with a uniformly drawn
/// index in `0..=i`. Every permutation is equally likely.
pub fn shuffle_roles<R: Rng>(roles: &mut [Role], rng: &mut R) {
    for i in (1..roles.len()).rev() {
        let j = rng.random_range(0..=i);
        roles.swap(i, j);
    }
}

/// Seat `total_players` players with `spy_count` spies among them.
///
/// The caller guarantees `1 <= spy_count <= (total_players - 1) / 2`; the
/// settings clamp maintains that. Seats are numbered `1..=total_players`.
pub fn assign_roles<R: Rng>(
    total_players: u8,
    spy_count: u8,
    words: &WordPair,
    rng: &mut R,
) -> Vec<Player> {
    let total = total_players as usize;
    let spies = (spy_count as usize).min(total);

    let mut roles = vec![Role::Civilian; total];
    for role in roles.iter_mut().take(spies) {
        *role = Role::Spy;
    }
    shuffle_roles(&mut roles, rng);

    roles
        .into_iter()
        .zip(1..=total_players)
        .map(|(role, seat)| Player::new(seat, role, words.word_for(role)))
        .collect()
}
