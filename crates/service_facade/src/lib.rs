//! # Service Facade
//!
//! Provider-agnostic access to chat/permission metadata and economy
//! operations. Two small contracts ([`ChatAdapter`], [`EconomyAdapter`])
//! unify several optional third-party providers behind one calling surface;
//! the [`ChatFacade`]/[`EconomyFacade`] factories probe the host for the
//! first active provider in a fixed priority order and fall back to safe
//! no-op adapters when none is present.
//!
//! The facade holds no state beyond the provider handle bound at
//! construction, adds no locking or transactional wrapping, and performs no
//! sanitization of provider output. Callers may cache a facade, but
//! re-selection after a provider is enabled or disabled requires calling the
//! factory again.
//!
//! ```rust
//! use plugin_host::InProcessHost;
//! use service_api::PlayerId;
//! use service_facade::{ChatFacade, EconomyFacade};
//! use std::sync::Arc;
//!
//! let host: Arc<dyn plugin_host::PluginHost> = Arc::new(InProcessHost::new());
//!
//! let chat = ChatFacade::select(Arc::clone(&host));
//! let economy = EconomyFacade::select(host);
//!
//! let player = PlayerId::new();
//! if chat.is_enabled() {
//!     let _prefix = chat.prefix(player);
//! }
//! if economy.is_enabled() && economy.has_amount(player, 250.0) {
//!     economy.withdraw(player, 250.0);
//! }
//! ```

mod chat;
mod economy;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::{ChatAdapter, ChatConduit, ChatFacade, ChatFallback, ChatFlume, ChatKeystone};
pub use economy::{EconomyAdapter, EconomyConduit, EconomyFacade, EconomyFallback, EconomyFlume};
