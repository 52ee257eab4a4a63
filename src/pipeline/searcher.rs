// file: src/pipeline/searcher.rs
// description: one model call per batch with the fixed "find matching users" instruction

use super::context::ContextFormatter;
use super::usage::UsageTracker;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::llm::prompts::{BATCH_SYSTEM_PROMPT, batch_user_message};
use crate::models::{BatchOutcome, UserRecord};
use crate::utils::Validator;
use tracing::{debug, info};

pub struct BatchSearcher<'a, M> {
    model: &'a M,
    usage: &'a UsageTracker,
}

impl<'a, M: ChatModel> BatchSearcher<'a, M> {
    pub fn new(model: &'a M, usage: &'a UsageTracker) -> Self {
        Self { model, usage }
    }

    /// Model errors are returned untouched; no retry happens here.
    pub async fn search(
        &self,
        batch_index: usize,
        batch: &[UserRecord],
        query: &str,
    ) -> Result<BatchOutcome> {
        let context = ContextFormatter::format(batch);
        let message = batch_user_message(&context, query);

        debug!(
            "Batch {}: {} users, {} chars of context",
            batch_index,
            batch.len(),
            context.len()
        );

        let completion = self.model.complete(BATCH_SYSTEM_PROMPT, &message).await?;
        self.usage.add(completion.total_tokens);

        info!(
            "Batch {} answered ({} tokens): {}",
            batch_index,
            completion.total_tokens,
            Validator::truncate_text(completion.content.trim(), 120)
        );
        debug!("Batch {} full response: {}", batch_index, completion.content);

        Ok(BatchOutcome::from_response(&completion.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::pipeline::testing::{Reply, ScriptedModel};

    fn users() -> Vec<UserRecord> {
        vec![
            UserRecord::new().with("name", "John").with("hobby", "travel"),
            UserRecord::new().with("name", "Jane").with("hobby", "chess"),
        ]
    }

    #[tokio::test]
    async fn test_sends_batch_prompt_and_records_usage() {
        let model = ScriptedModel::new(|_, _| Reply::text("User:\n  name: John", 42));
        let usage = UsageTracker::new();
        let searcher = BatchSearcher::new(&model, &usage);

        let outcome = searcher.search(0, &users(), "who travels?").await.unwrap();

        assert_eq!(outcome.matches(), Some("User:\n  name: John"));
        assert_eq!(usage.summary().batch_tokens, vec![42]);

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, BATCH_SYSTEM_PROMPT);
        assert!(calls[0].user.contains("  name: Jane"));
        assert!(calls[0].user.ends_with("## SEARCH QUERY: \nwho travels?"));
    }

    #[tokio::test]
    async fn test_sentinel_becomes_no_match() {
        let model = ScriptedModel::new(|_, _| Reply::text(" NO_MATCHES_FOUND\n", 10));
        let usage = UsageTracker::new();

        let outcome = BatchSearcher::new(&model, &usage)
            .search(0, &users(), "pilots")
            .await
            .unwrap();
        assert_eq!(outcome, BatchOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_model_error_propagates_without_usage() {
        let model = ScriptedModel::new(|_, _| Reply::error("quota exceeded"));
        let usage = UsageTracker::new();

        let result = BatchSearcher::new(&model, &usage)
            .search(3, &users(), "anyone")
            .await;

        assert!(matches!(result, Err(SearchError::Model(_))));
        assert_eq!(usage.summary().batch_count, 0);
    }
}
