// file: src/pipeline/aggregator.rs
// description: drops empty batch outcomes and runs the final synthesis call

use super::usage::UsageTracker;
use crate::error::Result;
use crate::llm::ChatModel;
use crate::llm::prompts::{SYNTHESIS_SYSTEM_PROMPT, synthesis_user_message};
use crate::models::{BatchOutcome, SearchAnswer};
use tracing::info;

/// Joins the surviving batch texts with a blank line, in batch order.
pub fn combine_results(outcomes: &[BatchOutcome]) -> Option<String> {
    let surviving: Vec<&str> = outcomes.iter().filter_map(BatchOutcome::matches).collect();
    if surviving.is_empty() {
        None
    } else {
        Some(surviving.join("\n\n"))
    }
}

pub struct ResultAggregator<'a, M> {
    model: &'a M,
    usage: &'a UsageTracker,
}

impl<'a, M: ChatModel> ResultAggregator<'a, M> {
    pub fn new(model: &'a M, usage: &'a UsageTracker) -> Self {
        Self { model, usage }
    }

    pub async fn aggregate(&self, outcomes: &[BatchOutcome], query: &str) -> Result<SearchAnswer> {
        let Some(combined) = combine_results(outcomes) else {
            info!("No batch returned matches, skipping synthesis");
            return Ok(SearchAnswer::NoMatches);
        };

        let message = synthesis_user_message(&combined, query);
        let completion = self
            .model
            .complete(SYNTHESIS_SYSTEM_PROMPT, &message)
            .await?;
        self.usage.add(completion.total_tokens);

        info!("Synthesis answered ({} tokens)", completion.total_tokens);
        Ok(SearchAnswer::Answer(completion.content))
    }
}
