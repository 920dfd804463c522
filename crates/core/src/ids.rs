use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> u64;
}

/// Monotonic process-wide counter; the first issued id is 1.
#[derive(Debug, Default)]
pub struct AtomicIdGenerator {
    last: AtomicU64,
}

impl AtomicIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for AtomicIdGenerator {
    fn generate_id(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Snippet and answer id issuers shared by every stage instance of a run.
#[derive(Clone)]
pub struct IdGenerators {
    pub snippet: Arc<dyn IdGenerator>,
    pub answer: Arc<dyn IdGenerator>,
}

impl Default for IdGenerators {
    fn default() -> Self {
        Self {
            snippet: Arc::new(AtomicIdGenerator::new()),
            answer: Arc::new(AtomicIdGenerator::new()),
        }
    }
}
