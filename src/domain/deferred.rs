//! Lazily evaluated relational fields.
//!
//! A [`Deferred`] either holds a value already at hand or a loader bound to
//! a foreign key. Loaders run only when [`Deferred::resolve`] is awaited,
//! so the GraphQL executor decides whether a lookup happens at all: a field
//! that is never selected never touches storage.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::ApiError;

type Loader<T> = dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync;

enum Source<T> {
    Ready(T),
    Pending(Arc<Loader<T>>),
}

/// A field value that may still have to be fetched.
///
/// Resolving a pending value runs the loader every time; results are not
/// memoised.
pub struct Deferred<T> {
    source: Source<T>,
}

impl<T: 'static> Deferred<T> {
    /// Binds a loader without running it.
    pub fn new<F, Fut>(load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let loader: Arc<Loader<T>> =
            Arc::new(move || -> BoxFuture<'static, Result<T, ApiError>> { Box::pin(load()) });
        Self {
            source: Source::Pending(loader),
        }
    }

    /// Wraps a value that needs no lookup.
    #[must_use]
    pub const fn ready(value: T) -> Self {
        Self {
            source: Source::Ready(value),
        }
    }

    /// Returns `true` if resolving will hit the loader.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.source, Source::Pending(_))
    }
}

impl<T: Clone + 'static> Deferred<T> {
    /// Produces the value, running the loader if one is bound.
    ///
    /// # Errors
    ///
    /// Propagates whatever the loader returns.
    pub async fn resolve(&self) -> Result<T, ApiError> {
        match &self.source {
            Source::Ready(value) => Ok(value.clone()),
            Source::Pending(loader) => loader().await,
        }
    }
}

impl<T: Clone> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        let source = match &self.source {
            Source::Ready(value) => Source::Ready(value.clone()),
            Source::Pending(loader) => Source::Pending(Arc::clone(loader)),
        };
        Self { source }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Ready(value) => f.debug_tuple("Deferred::Ready").field(value).finish(),
            Source::Pending(_) => f.write_str("Deferred::Pending"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn loader_runs_only_on_resolve() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let deferred = Deferred::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(7_u32)
            }
        });

        assert!(deferred.is_pending());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let Ok(first) = deferred.resolve().await else {
            panic!("loader should succeed");
        };
        let Ok(second) = deferred.resolve().await else {
            panic!("loader should succeed");
        };
        assert_eq!((first, second), (7, 7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ready_value_skips_loader() {
        let deferred = Deferred::ready("done".to_string());
        assert!(!deferred.is_pending());
        let Ok(value) = deferred.resolve().await else {
            panic!("ready value should resolve");
        };
        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn loader_errors_propagate() {
        let deferred: Deferred<u8> =
            Deferred::new(|| async { Err(ApiError::NotFound("user 1".to_string())) });
        let Err(ApiError::NotFound(msg)) = deferred.resolve().await else {
            panic!("expected not found");
        };
        assert_eq!(msg, "user 1");
    }

    #[tokio::test]
    async fn clones_share_the_loader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let deferred = Deferred::new(move || {
            let counter = Arc::clone(&counter);
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst)) }
        });
        let copy = deferred.clone();
        let _ = deferred.resolve().await;
        let _ = copy.resolve().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
