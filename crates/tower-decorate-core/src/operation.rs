//! The execution contract shared by all wrappers.
//!
//! An operation is a [`Service`]: `call` starts an invocation and the returned
//! future yields its result, possibly after suspending. Suspend-capable
//! operations are written with [`tower::service_fn`]. Plain synchronous
//! callables go through [`sync_fn`], whose future is ready on first poll, so
//! the wrappers never need a second code path for them.

use futures::future::{ready, Ready};
use std::fmt;
use std::task::{Context, Poll};
use tower::Service;

/// Lifts a synchronous callable into an operation.
///
/// The callable runs inside [`Service::call`], before the returned future is
/// first polled, and the future then completes immediately.
///
/// # Examples
///
/// ```
/// use tower::{Service, ServiceExt};
/// use tower_decorate_core::sync_fn;
///
/// # async fn example() {
/// let mut add = sync_fn(|(a, b): (u32, u32)| Ok::<_, std::convert::Infallible>(a + b));
/// let sum = add.ready().await.unwrap().call((2, 3)).await.unwrap();
/// assert_eq!(sum, 5);
/// # }
/// ```
pub fn sync_fn<F>(f: F) -> SyncFn<F> {
    SyncFn { f }
}

/// An operation backed by a synchronous callable. See [`sync_fn`].
#[derive(Clone, Copy)]
pub struct SyncFn<F> {
    f: F,
}

impl<F> fmt::Debug for SyncFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

impl<F, Req, T, E> Service<Req> for SyncFn<F>
where
    F: FnMut(Req) -> Result<T, E>,
{
    type Response = T;
    type Error = E;
    type Future = Ready<Result<T, E>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Req) -> Self::Future {
        ready((self.f)(req))
    }
}
