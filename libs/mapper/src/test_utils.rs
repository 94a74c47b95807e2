//! Mappers for exercising dispatch in tests
//!
//! All of them work for any `(F, T)` pair and never touch the target, so they
//! can be registered next to real mappers to observe ordering, failures and
//! instance reuse.

use crate::{MapParameters, Mapper, MapperError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared, ordered record of mapper invocations
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// All recorded entries in call order
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Appends its label to a [`CallLog`] on every call
#[derive(Debug, Clone)]
pub struct RecordingMapper {
    label: String,
    log: CallLog,
}

impl RecordingMapper {
    pub fn new(label: impl Into<String>, log: CallLog) -> Self {
        Self {
            label: label.into(),
            log,
        }
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for RecordingMapper
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        _from: &F,
        _to: &mut T,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        self.log.record(self.label.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Always fails with `MapperError::Failed { mapper: "FailingMapper", .. }`
#[derive(Debug, Clone)]
pub struct FailingMapper {
    reason: String,
}

impl FailingMapper {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for FailingMapper
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        _from: &F,
        _to: &mut T,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        Err(MapperError::failed("FailingMapper", self.reason.clone()))
    }
}

/// Counts its invocations, optionally into a shared counter
#[derive(Debug, Clone, Default)]
pub struct CountingMapper {
    calls: Arc<AtomicUsize>,
}

impl CountingMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(calls: Arc<AtomicUsize>) -> Self {
        Self { calls }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for CountingMapper
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        _from: &F,
        _to: &mut T,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Sleeps before succeeding
#[derive(Debug, Clone)]
pub struct SlowMapper {
    delay: Duration,
}

impl SlowMapper {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl<F, T> Mapper<F, T> for SlowMapper
where
    F: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    async fn map(
        &self,
        _from: &F,
        _to: &mut T,
        _parameters: Option<&MapParameters>,
    ) -> Result<(), MapperError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
