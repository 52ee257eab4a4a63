// file: src/pipeline/batcher.rs
// description: fixed-size partitioning of the user list to fit model input limits

use crate::error::Result;
use crate::utils::Validator;

pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    batch_size: usize,
}

impl Default for Batcher {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Batcher {
    pub fn new(batch_size: usize) -> Result<Self> {
        Validator::validate_batch_size(batch_size)?;
        Ok(Self { batch_size })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Contiguous, non-overlapping slices in input order; only the last may be short.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items.chunks(self.batch_size).collect()
    }

    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size)
    }
}
