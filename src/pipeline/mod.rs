// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

pub mod aggregator;
pub mod batcher;
pub mod context;
mod orchestrator;
mod progress;
pub mod searcher;
pub mod usage;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{ResultAggregator, combine_results};
pub use batcher::{Batcher, DEFAULT_BATCH_SIZE};
pub use context::{ContextFormatter, EMPTY_CONTEXT};
pub use orchestrator::{PipelineStage, SearchPipeline, SearchReport};
pub use progress::{BatchStats, ProgressTracker};
pub use searcher::BatchSearcher;
pub use usage::{UsageSummary, UsageTracker};
