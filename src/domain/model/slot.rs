use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use super::loader::ModelLoader;
use super::status::{ModelKind, ModelState, ModelStatus};
use crate::domain::DomainError;

const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

struct SlotInner<M: ?Sized> {
    state: ModelState,
    handle: Option<Arc<M>>,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Lifecycle holder for one model handle
///
/// Loading runs outside the lock and the finished handle is swapped in under
/// a short write lock, so readers always see a complete model. Callers of
/// `acquire` keep their `Arc` for the whole prediction, which stays valid
/// across a concurrent swap.
pub struct ModelSlot<M: ?Sized> {
    kind: ModelKind,
    path: PathBuf,
    loader: Arc<dyn ModelLoader<M>>,
    load_timeout: Duration,
    inner: RwLock<SlotInner<M>>,
    load_lock: Mutex<()>,
}

impl<M: ?Sized + Send + Sync + 'static> ModelSlot<M> {
    pub fn new(
        kind: ModelKind,
        path: impl Into<PathBuf>,
        loader: Arc<dyn ModelLoader<M>>,
    ) -> Self {
        Self {
            kind,
            path: path.into(),
            loader,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            inner: RwLock::new(SlotInner {
                state: ModelState::Unloaded,
                handle: None,
                last_updated: None,
                last_error: None,
            }),
            load_lock: Mutex::new(()),
        }
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load (or reload) the model and swap it in on success
    ///
    /// Concurrent loads of the same slot run one after another. On failure
    /// the previous handle is dropped and the slot stays `Failed` until the
    /// next load.
    pub async fn load(&self) -> Result<(), DomainError> {
        let _guard = self.load_lock.lock().await;

        self.inner.write().await.state = ModelState::Loading;
        info!(model = %self.kind, path = %self.path.display(), "Loading model");

        let start = Instant::now();
        let result = match tokio::time::timeout(self.load_timeout, self.loader.load(&self.path))
            .await
        {
            Ok(Ok(handle)) => Ok(handle),
            Ok(Err(e @ DomainError::ModelLoad { .. })) => Err(e),
            Ok(Err(e)) => Err(DomainError::model_load(self.kind, e.to_string())),
            Err(_) => Err(DomainError::model_load(
                self.kind,
                format!("load timed out after {:?}", self.load_timeout),
            )),
        };

        let mut inner = self.inner.write().await;

        match result {
            Ok(handle) => {
                inner.handle = Some(handle);
                inner.state = ModelState::Ready;
                inner.last_updated = Some(Utc::now());
                inner.last_error = None;

                info!(
                    model = %self.kind,
                    duration_ms = %start.elapsed().as_millis(),
                    "Model ready"
                );
                Ok(())
            }
            Err(e) => {
                inner.handle = None;
                inner.state = ModelState::Failed;
                inner.last_error = Some(e.to_string());

                error!(model = %self.kind, error = %e, "Model failed to load");
                Err(e)
            }
        }
    }

    /// Current handle, or `ModelUnavailable` when nothing is loaded
    pub async fn acquire(&self) -> Result<Arc<M>, DomainError> {
        let inner = self.inner.read().await;

        inner
            .handle
            .clone()
            .ok_or_else(|| DomainError::model_unavailable(self.kind, inner.state.to_string()))
    }

    pub async fn state(&self) -> ModelState {
        self.inner.read().await.state
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.handle.is_some()
    }

    pub async fn status(&self) -> ModelStatus {
        let inner = self.inner.read().await;

        ModelStatus {
            loaded: inner.handle.is_some(),
            state: inner.state,
            model_path: self.path.display().to_string(),
            last_updated: inner.last_updated,
            error: inner.last_error.clone(),
        }
    }
}
