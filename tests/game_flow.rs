//! Full games driven through the async provider path.

mod common;

use common::{init_logging, ScriptedProvider};
use pretty_assertions::assert_eq;
use undercover_state::provider::{ProviderError, WithFallback, WordBank};
use undercover_state::state::{
    ActionError, GenerationOutcome, Phase, RevealStep, Role, SessionController, SettingsUpdate,
    WordPair, GENERATION_FAILED_MESSAGE,
};

fn seats_with(game: &SessionController, role: Role) -> Vec<u8> {
    game.session()
        .players()
        .iter()
        .filter(|p| p.role() == role)
        .map(|p| p.seat())
        .collect()
}

fn reveal_all(game: &mut SessionController) {
    let total = game.session().players().len();
    for seat in 0..total {
        assert_eq!(game.session().reveal_cursor(), seat);
        let card = game.session().current_reveal().unwrap();
        assert_eq!(card.word, None);

        game.toggle_reveal().unwrap();
        let card = game.session().current_reveal().unwrap();
        let expected = game.session().players()[seat].word().to_string();
        assert_eq!(card.word, Some(expected.as_str()));

        let step = game.advance().unwrap();
        if seat + 1 == total {
            assert_eq!(step, RevealStep::Complete);
        } else {
            assert_eq!(step, RevealStep::Next(seat + 1));
        }
    }
}

#[tokio::test]
async fn five_players_one_spy_ends_in_spy_win() {
    init_logging();

    let provider = ScriptedProvider::new(vec![Ok(WordPair::new("Library", "Bookstore"))]);
    let mut game = SessionController::with_seed(2024);
    game.update_settings(SettingsUpdate {
        total_players: Some(5),
        spy_count: Some(1),
        topic: Some("places".to_string()),
    })
    .unwrap();

    let outcome = game.start_game_with(&provider).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Dealt);
    assert_eq!(provider.topics(), vec![Some("places".to_string())]);

    let spies = seats_with(&game, Role::Spy);
    assert_eq!(spies.len(), 1);
    assert_eq!(
        game.session().player(spies[0]).unwrap().word(),
        "Bookstore"
    );

    reveal_all(&mut game);
    assert_eq!(game.phase(), Phase::Playing);

    // Civilians 4 -> 3 -> 2 keep playing, 1 vs 1 hands it to the spy
    let civilians = seats_with(&game, Role::Civilian);
    for (i, seat) in civilians.iter().take(3).enumerate() {
        let outcome = game.eliminate(*seat).unwrap();
        if i < 2 {
            assert_eq!(outcome.winner, None);
            assert_eq!(game.phase(), Phase::Playing);
        } else {
            assert_eq!(outcome.remaining.spies, 1);
            assert_eq!(outcome.remaining.civilians, 1);
            assert_eq!(outcome.winner, Some(Role::Spy));
        }
    }

    assert_eq!(game.phase(), Phase::GameOver);
    let summary = game.session().summary().unwrap();
    assert_eq!(summary.winner, Role::Spy);
    assert_eq!(summary.spy_seats, spies);
    assert_eq!(summary.words, WordPair::new("Library", "Bookstore"));
}

#[tokio::test]
async fn provider_failure_returns_to_setup_and_retry_succeeds() {
    init_logging();

    let provider = ScriptedProvider::new(vec![
        Err(ProviderError::Unavailable("rate limited".to_string())),
        Ok(WordPair::new("Butterfly", "Moth")),
    ]);
    let mut game = SessionController::with_seed(3);

    let outcome = game.start_game_with(&provider).await.unwrap();
    assert!(matches!(outcome, GenerationOutcome::Failed(_)));
    assert_eq!(game.phase(), Phase::Setup);
    assert!(game.session().players().is_empty());
    assert_eq!(game.session().last_error(), Some(GENERATION_FAILED_MESSAGE));

    let snapshot = game.session().to_json();
    assert_eq!(snapshot["last_error"], GENERATION_FAILED_MESSAGE);

    let outcome = game.start_game_with(&provider).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Dealt);
    assert_eq!(game.phase(), Phase::Reveal);
    assert_eq!(game.session().last_error(), None);
}

#[tokio::test]
async fn start_outside_setup_is_rejected() {
    let provider = ScriptedProvider::new(vec![Ok(WordPair::new("Beach", "Lake"))]);
    let mut game = SessionController::with_seed(3);
    game.start_game_with(&provider).await.unwrap();

    let again = game.start_game_with(&provider).await;
    assert!(matches!(again, Err(ActionError::WrongPhase { .. })));
    // The rejected start never reached the provider
    assert_eq!(provider.topics().len(), 1);
}

#[tokio::test]
async fn fallback_provider_keeps_the_game_going() {
    let provider = WithFallback::new(ScriptedProvider::new(vec![Err(
        ProviderError::Malformed("no response".to_string()),
    )]));
    let mut game = SessionController::with_seed(9);

    let outcome = game.start_game_with(&provider).await.unwrap();
    assert_eq!(outcome, GenerationOutcome::Dealt);
    assert_eq!(
        game.session().word_pair(),
        Some(&WordPair::new("Apple", "Pear"))
    );
}

#[tokio::test]
async fn word_bank_game_to_civilian_win() {
    init_logging();

    let bank = WordBank::new(Some(11));
    let mut game = SessionController::with_seed(11);
    game.update_settings(SettingsUpdate::total_players(8)).unwrap();
    game.update_settings(SettingsUpdate::spy_count(3)).unwrap();

    game.start_game_with(&bank).await.unwrap();
    reveal_all(&mut game);

    let spies = seats_with(&game, Role::Spy);
    assert_eq!(spies.len(), 3);
    for seat in &spies {
        game.eliminate(*seat).unwrap();
    }

    assert_eq!(game.winner(), Some(Role::Civilian));
    assert_eq!(game.session().alive_count(), 5);

    // Already decided: further eliminations are refused
    let civilian = seats_with(&game, Role::Civilian)[0];
    assert!(game.eliminate(civilian).is_err());
}

#[tokio::test]
async fn stale_ticket_after_end_game_is_discarded() {
    let mut game = SessionController::with_seed(5);
    let old = game.start_game().unwrap();
    game.complete_generation(&old, Ok(WordPair::new("Wolf", "Fox")))
        .unwrap();
    reveal_all(&mut game);
    game.end_game().unwrap();

    let fresh = game.start_game().unwrap();
    assert_ne!(fresh.session_id, old.session_id);

    // The old ticket answering now must not deal into the new session
    let late = game.complete_generation(&old, Ok(WordPair::new("Cat", "Dog")));
    assert!(matches!(late, Err(ActionError::StaleRequest { .. })));
    assert_eq!(game.phase(), Phase::Loading);
    assert!(game.session().players().is_empty());

    game.complete_generation(&fresh, Ok(WordPair::new("Sun", "Moon")))
        .unwrap();
    assert_eq!(
        game.session().word_pair(),
        Some(&WordPair::new("Sun", "Moon"))
    );
}
