// file: src/pipeline/orchestrator.rs
// description: fan-out of batch searches with a join-all barrier, then synthesis
// reference: bounded stream concurrency via futures::StreamExt::buffered

use super::aggregator::ResultAggregator;
use super::batcher::Batcher;
use super::progress::{BatchStats, ProgressTracker};
use super::searcher::BatchSearcher;
use super::usage::{UsageSummary, UsageTracker};
use crate::config::{FailurePolicy, SearchConfig};
use crate::error::{Result, SearchError};
use crate::llm::ChatModel;
use crate::models::{BatchOutcome, SearchAnswer, UserRecord};
use crate::source::UserSource;
use crate::utils::Validator;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Dispatching,
    AwaitingAll,
    Aggregating,
    Done,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub query: String,
    pub answer: SearchAnswer,
    /// One entry per batch, in batch order
    pub outcomes: Vec<BatchOutcome>,
    pub users: usize,
    pub batch_sizes: Vec<usize>,
    pub stats: BatchStats,
    pub usage: UsageSummary,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn matched_batches(&self) -> usize {
        self.outcomes.iter().filter(|o| o.matches().is_some()).count()
    }

    pub fn failed_batches(&self) -> impl Iterator<Item = (usize, &str)> {
        self.outcomes.iter().filter_map(|o| match o {
            BatchOutcome::Failed { batch, error } => Some((*batch, error.as_str())),
            _ => None,
        })
    }
}

pub struct SearchPipeline<M, S> {
    model: M,
    source: S,
    batcher: Batcher,
    max_concurrency: usize,
    on_batch_error: FailurePolicy,
    show_progress: bool,
    stage: watch::Sender<PipelineStage>,
}

impl<M: ChatModel, S: UserSource> SearchPipeline<M, S> {
    pub fn new(model: M, source: S, config: &SearchConfig) -> Result<Self> {
        if config.max_concurrency == 0 {
            return Err(SearchError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            model,
            source,
            batcher: Batcher::new(config.batch_size)?,
            max_concurrency: config.max_concurrency,
            on_batch_error: config.on_batch_error,
            show_progress: config.show_progress,
            stage: watch::channel(PipelineStage::Idle).0,
        })
    }

    pub fn stage(&self) -> PipelineStage {
        *self.stage.borrow()
    }

    /// Follows stage transitions while a search runs.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStage> {
        self.stage.subscribe()
    }

    fn enter(&self, stage: PipelineStage) {
        debug!("Pipeline stage: {:?}", stage);
        self.stage.send_replace(stage);
    }

    /// Runs one search. A blank query does nothing and yields `None`.
    /// `usage` belongs to the caller and receives every call's token count.
    pub async fn run(&self, query: &str, usage: &UsageTracker) -> Result<Option<SearchReport>> {
        self.enter(PipelineStage::Idle);

        let Some(query) = Validator::normalize_query(query) else {
            debug!("Blank query, nothing to search");
            return Ok(None);
        };

        let start = Instant::now();
        info!("Searching user database for: {}", query);

        let users = self.source.get_all_users().await?;
        let batches = self.batcher.split(&users);
        info!(
            "Split {} users into {} batches of up to {}",
            users.len(),
            batches.len(),
            self.batcher.batch_size()
        );

        let (outcomes, stats) = self.search_batches(&batches, &query, usage).await?;

        self.enter(PipelineStage::Aggregating);
        let answer = ResultAggregator::new(&self.model, usage)
            .aggregate(&outcomes, &query)
            .await?;

        self.enter(PipelineStage::Done);

        Ok(Some(SearchReport {
            answer,
            outcomes,
            users: users.len(),
            batch_sizes: batches.iter().map(|b| b.len()).collect(),
            stats,
            usage: usage.summary(),
            elapsed: start.elapsed(),
            query,
        }))
    }

    async fn search_batches(
        &self,
        batches: &[&[UserRecord]],
        query: &str,
        usage: &UsageTracker,
    ) -> Result<(Vec<BatchOutcome>, BatchStats)> {
        let searcher = BatchSearcher::new(&self.model, usage);
        let progress = if self.show_progress {
            ProgressTracker::new(batches.len())
        } else {
            ProgressTracker::hidden(batches.len())
        };

        self.enter(PipelineStage::Dispatching);
        info!(
            "Dispatching {} batch searches (at most {} in flight)",
            batches.len(),
            self.max_concurrency
        );

        // Dispatching lasts until the last batch call has started
        let last = batches.len().checked_sub(1);
        if last.is_none() {
            self.enter(PipelineStage::AwaitingAll);
        }

        let searches = stream::iter(batches.iter().enumerate().map(|(index, batch)| {
            let searcher = &searcher;
            let progress = &progress;
            async move {
                if Some(index) == last {
                    self.enter(PipelineStage::AwaitingAll);
                }
                let result = searcher.search(index, batch, query).await;
                progress.record(&result);
                result
            }
        }))
        .buffered(self.max_concurrency);

        // every dispatched search is awaited before any error is acted on
        let results: Vec<Result<BatchOutcome>> = searches.collect().await;
        progress.finish();

        let mut outcomes = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => match self.on_batch_error {
                    FailurePolicy::Abort => {
                        error!("Batch {} failed, aborting search: {}", index, e);
                        return Err(e);
                    }
                    FailurePolicy::Skip => {
                        warn!("Batch {} failed, skipping it: {}", index, e);
                        outcomes.push(BatchOutcome::Failed {
                            batch: index,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }

        Ok((outcomes, progress.get_stats()))
    }
}
