// file: src/pipeline/testing.rs
// description: in-memory chat model and user source fakes for pipeline tests

use crate::error::{Result, SearchError};
use crate::llm::{ChatCompletion, ChatModel};
use crate::models::UserRecord;
use crate::source::UserSource;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Call {
    pub system: String,
    pub user: String,
}

pub struct Reply {
    result: Result<ChatCompletion>,
    delay: Duration,
}

impl Reply {
    pub fn text(content: &str, total_tokens: u64) -> Self {
        Self {
            result: Ok(ChatCompletion {
                content: content.to_string(),
                total_tokens,
            }),
            delay: Duration::ZERO,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            result: Err(SearchError::Model(message.to_string())),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

/// Answers each call through `respond(system, user)` and records what it saw.
pub struct ScriptedModel<F> {
    respond: F,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl<F> ScriptedModel<F>
where
    F: Fn(&str, &str) -> Reply + Send + Sync,
{
    pub fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl<F> ChatModel for ScriptedModel<F>
where
    F: Fn(&str, &str) -> Reply + Send + Sync,
{
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<ChatCompletion> {
        self.calls.lock().unwrap().push(Call {
            system: system_prompt.to_string(),
            user: user_message.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let reply = (self.respond)(system_prompt, user_message);
        if reply.delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(reply.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply.result
    }
}

pub struct StaticSource(pub Vec<UserRecord>);

impl UserSource for StaticSource {
    async fn get_all_users(&self) -> Result<Vec<UserRecord>> {
        Ok(self.0.clone())
    }
}

/// `count` users named `user-0`, `user-1`, ...
pub fn numbered_users(count: usize) -> Vec<UserRecord> {
    (0..count)
        .map(|i| {
            UserRecord::new()
                .with("id", i as u64)
                .with("name", format!("user-{}", i))
        })
        .collect()
}
