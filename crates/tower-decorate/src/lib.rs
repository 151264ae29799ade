//! Composable execution wrappers for Tower services.
//!
//! `tower-decorate` collects small behavior modifiers that can be attached to
//! any unit of work expressed as a [`tower::Service`]. Each wrapper is a
//! `Layer` that returns a service with the same calling contract plus the
//! added behavior, so wrappers stack in any order with `ServiceBuilder`.
//! Synchronous callables are lifted with [`core::sync_fn`] and go through the
//! same code path as asynchronous ones.
//!
//! Each wrapper is available as an individual crate and as a feature here.
//!
//! # Wrappers
//!
//! - **Retry** (`retry` feature): re-invokes the operation on matching
//!   failures, with a fixed delay between attempts
//! - **Memo** (`memo` feature): replays stored results of referentially pure
//!   operations
//! - **Timer** (`timer` feature): reports the wall-clock duration of each call
//! - **Call log** (`calllog` feature): logs the arguments of each call and a
//!   marker when it completes successfully
//! - **Notify** (`notify` feature): sends a failure report to a sink before
//!   surfacing the failure
//! - **Counter** (`counter` feature): counts invocations of the wrapped binding
//! - **Rate limiter** (`ratelimiter` feature): delays calls that exceed a
//!   per-interval rate
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! tower-decorate = { version = "0.1", features = ["retry", "timer"] }
//! ```
//!
//! Or enable every wrapper:
//!
//! ```toml
//! [dependencies]
//! tower-decorate = { version = "0.1", features = ["full"] }
//! ```
//!
//! # Order matters
//!
//! Layers apply outermost first. A timer placed outside a retry measures
//! every attempt plus the delays between them; placed inside, it reports one
//! duration per attempt.
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "retry", feature = "timer"))]
//! # {
//! use std::time::Duration;
//! use tower::ServiceBuilder;
//! use tower_decorate::{retry::RetryLayer, timer::TimerLayer};
//!
//! # async fn example() {
//! let service = ServiceBuilder::new()
//!     .layer(TimerLayer::builder().name("fetch").build())
//!     .layer(
//!         RetryLayer::<std::io::Error>::builder()
//!             .max_attempts(3)
//!             .delay(Duration::from_millis(200))
//!             .build(),
//!     )
//!     .service(tower::service_fn(|url: String| async move {
//!         Ok::<_, std::io::Error>(url.len())
//!     }));
//! # }
//! # }
//! ```

// Re-export core (always available)
pub use tower_decorate_core as core;

// Re-export wrappers based on features
#[cfg(feature = "calllog")]
pub use tower_decorate_calllog as calllog;

#[cfg(feature = "counter")]
pub use tower_decorate_counter as counter;

#[cfg(feature = "memo")]
pub use tower_decorate_memo as memo;

#[cfg(feature = "notify")]
pub use tower_decorate_notify as notify;

#[cfg(feature = "ratelimiter")]
pub use tower_decorate_ratelimiter as ratelimiter;

#[cfg(feature = "retry")]
pub use tower_decorate_retry as retry;

#[cfg(feature = "timer")]
pub use tower_decorate_timer as timer;
