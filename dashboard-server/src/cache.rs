//! Parameter-keyed cache of pipeline results.
//!
//! The core is stateless; the serving layer memoizes whole pipeline runs
//! keyed by the canonical serialization of the strategy parameters, so equal
//! parameter sets hit the same entry regardless of query-string ordering.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use strategy_core::{run_pipeline, BacktestMetrics, DailyFrame, StrategyError, StrategyParams};

/// One fully-computed pipeline run.
pub struct PipelineResult {
    pub frame: DailyFrame,
    pub metrics: BacktestMetrics,
}

#[derive(Default)]
pub struct ResultCache {
    inner: RwLock<HashMap<String, Arc<PipelineResult>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached run for `params`, computing and inserting it on a
    /// miss. The base frame is cloned per computation; cached results are
    /// shared behind `Arc`.
    pub async fn get_or_compute(
        &self,
        base: &DailyFrame,
        params: &StrategyParams,
    ) -> Result<Arc<PipelineResult>, StrategyError> {
        let key = params.cache_key();

        if let Some(hit) = self.inner.read().await.get(&key) {
            debug!(%key, "pipeline cache hit");
            return Ok(Arc::clone(hit));
        }

        info!(%key, "pipeline cache miss, computing");
        let (frame, metrics) = run_pipeline(base.clone(), params)?;
        let result = Arc::new(PipelineResult { frame, metrics });

        let mut guard = self.inner.write().await;
        // A concurrent request may have raced us here; keep whichever entry
        // landed first so all readers share one Arc.
        let entry = guard.entry(key).or_insert_with(|| Arc::clone(&result));
        Ok(Arc::clone(entry))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
