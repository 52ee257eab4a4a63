// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod utils;

pub use config::{Config, FailurePolicy, ModelConfig, SearchConfig, SourceKind, UserSourceConfig};
pub use error::{Result, SearchError};
pub use llm::{ChatClient, ChatCompletion, ChatModel};
pub use models::{BatchOutcome, SearchAnswer, UserRecord};
pub use pipeline::{
    Batcher, ContextFormatter, PipelineStage, ResultAggregator, SearchPipeline, SearchReport,
    UsageSummary, UsageTracker,
};
pub use source::{ConfiguredSource, FileUserSource, UserClient, UserSource};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        let _batcher = Batcher::new(config.search.batch_size).unwrap();
        let _tracker = UsageTracker::new();
    }
}
