//! Persistence seam for predictor write-back.
//!
//! The relational layer that owns predictor records lives outside this
//! crate; statistics computation only needs its add/commit contract.
//! `MemoryPredictorStore` satisfies the contract without any external
//! dependencies, for tests and local runs.

use std::sync::Mutex;

use crate::domain::error::Result;
use crate::domain::predictor::Predictor;

/// Add/commit contract of the surrounding persistence layer.
///
/// `add` stages a record on the current transaction; `commit` finalizes
/// everything staged so far. Callers batching several predictors stage
/// them all and commit once.
pub trait PredictorStore {
    fn add(&self, predictor: &Predictor) -> Result<()>;
    fn commit(&self) -> Result<()>;
}

/// In-memory predictor store backed by staged/committed vectors.
#[derive(Debug, Default)]
pub struct MemoryPredictorStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    staged: Vec<Predictor>,
    committed: Vec<Predictor>,
}

impl MemoryPredictorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records staged but not yet committed.
    pub fn staged(&self) -> Vec<Predictor> {
        self.inner.lock().unwrap().staged.clone()
    }

    /// Records made durable by a commit.
    pub fn committed(&self) -> Vec<Predictor> {
        self.inner.lock().unwrap().committed.clone()
    }
}

impl PredictorStore for MemoryPredictorStore {
    fn add(&self, predictor: &Predictor) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.staged.push(predictor.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let staged = std::mem::take(&mut inner.staged);
        inner.committed.extend(staged);
        Ok(())
    }
}
