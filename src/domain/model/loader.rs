use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Builds a fresh model handle from the artifact at `path`
///
/// Loaders never mutate a live model. The slot swaps the returned handle in
/// once loading has fully succeeded.
#[async_trait]
pub trait ModelLoader<M: ?Sized + Send + Sync + 'static>: Send + Sync {
    async fn load(&self, path: &Path) -> Result<Arc<M>, DomainError>;
}
