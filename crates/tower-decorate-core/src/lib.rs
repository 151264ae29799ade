//! Core infrastructure for tower-decorate.
//!
//! This crate provides the pieces every wrapper crate builds on:
//! - Listener hooks for wrapper events ([`EventListeners`], [`WrapperEvent`])
//! - The execution contract: any [`tower::Service`] is an operation, and
//!   [`sync_fn`] lifts a plain synchronous callable into one so that sync and
//!   suspend-capable operations share a single wrapping path

pub mod events;
pub mod operation;

pub use events::{EventListeners, WrapperEvent};
pub use operation::{sync_fn, SyncFn};

/// Name used by every wrapper when no explicit operation name is configured.
pub const UNNAMED: &str = "<unnamed>";
