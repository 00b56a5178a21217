//! Shared helpers for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};
use undercover_state::provider::{ProviderError, WordPairProvider};
use undercover_state::state::WordPair;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a test subscriber once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Provider that replays a fixed script of answers and records topics.
pub struct ScriptedProvider {
    answers: Mutex<VecDeque<Result<WordPair, ProviderError>>>,
    topics: Mutex<Vec<Option<String>>>,
}

impl ScriptedProvider {
    pub fn new(answers: Vec<Result<WordPair, ProviderError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            topics: Mutex::new(Vec::new()),
        }
    }

    pub fn topics(&self) -> Vec<Option<String>> {
        self.topics.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordPairProvider for ScriptedProvider {
    async fn generate(&self, topic: Option<&str>) -> Result<WordPair, ProviderError> {
        self.topics.lock().unwrap().push(topic.map(str::to_string));
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Unavailable("script exhausted".to_string())))
    }
}
