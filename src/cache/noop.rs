use crate::app::{NotFoundReason, Result, ThreadreelError};
use crate::cache::Cache;

/// Cache used when caching is bypassed: always misses, drops writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl<T> Cache<T> for NoOpCache {
    fn get(&self, _key: &str) -> Result<T> {
        Err(ThreadreelError::NotFound(NotFoundReason::NotCached))
    }

    fn put(&self, _value: &T, _key: &str) -> Result<()> {
        Ok(())
    }

    fn clean(&self) {}
}
