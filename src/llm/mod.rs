// file: src/llm/mod.rs
// description: chat model abstraction, prompts and the http client
// reference: internal module structure

pub mod client;
pub mod prompts;

pub use client::ChatClient;

use crate::error::Result;
use std::future::Future;

/// Text and reported usage of a single completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    /// Provider reported total; 0 when the response carried no usage object
    pub total_tokens: u64,
}

/// One system instruction plus one user message in, one completion out.
pub trait ChatModel: Send + Sync {
    fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> impl Future<Output = Result<ChatCompletion>> + Send;
}
