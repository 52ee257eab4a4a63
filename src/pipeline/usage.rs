// file: src/pipeline/usage.rs
// description: per-run token usage accumulator shared by every model call

use std::sync::Mutex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSummary {
    pub total_tokens: u64,
    pub batch_count: usize,
    pub batch_tokens: Vec<u64>,
}

#[derive(Debug, Default)]
pub struct UsageTracker {
    inner: Mutex<UsageSummary>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, tokens: u64) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.total_tokens += tokens;
        inner.batch_tokens.push(tokens);
        inner.batch_count = inner.batch_tokens.len();
    }

    pub fn summary(&self) -> UsageSummary {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
