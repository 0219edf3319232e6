//! # Service API
//!
//! Shared identity types and the provider-side service contracts consumed by
//! the chat/economy facade. Provider plugins register implementations of
//! these traits with the host's service registry; the facade looks them up
//! at adapter construction time and delegates every call to them.
//!
//! ## Key Types
//!
//! - [`PlayerId`] - UUID-backed player identity, opaque to providers
//! - [`WorldId`] - world/namespace context for per-world group decorations
//! - [`ProviderError`] - runtime failures surfaced by provider calls
//!
//! ## Provider Surfaces
//!
//! - [`keystone`] - node-graph permissions engine (dedicated permissions plugin)
//! - [`flume`] - next-generation services bridge, scope + UUID keyed accounts
//! - [`conduit`] - legacy services bridge
//!
//! None of these modules contain behavior: they are the contracts the host
//! environment is assumed to provide, modeled as registered service traits so
//! the facade stays testable without a live server runtime.

pub mod conduit;
pub mod flume;
pub mod keystone;

mod error;
mod ids;

pub use error::ProviderError;
pub use ids::{PlayerId, WorldId};
