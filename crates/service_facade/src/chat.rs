//! Chat/permission metadata facade.
//!
//! [`ChatAdapter`] is the uniform read-only contract; [`ChatKeystone`],
//! [`ChatFlume`] and [`ChatConduit`] bind it to the three supported
//! providers, [`ChatFallback`] covers the no-provider case, and
//! [`ChatFacade`] is the tagged-variant handle the selection factory
//! returns.

use plugin_host::{PluginHost, PluginRef, ServiceLookup};
use service_api::keystone::{self, Keystone, Node};
use service_api::{conduit, flume, PlayerId, WorldId};
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Contract
// ============================================================================

/// Uniform read-only view over prefix/suffix/group metadata, regardless of
/// the backing provider.
///
/// String-producing queries return provider-native output verbatim,
/// including any embedded legacy formatting tokens; the facade performs no
/// sanitization or translation.
pub trait ChatAdapter: Send + Sync {
    /// The wrapped provider type.
    type Source: ?Sized;

    /// Returns the wrapped provider handle.
    ///
    /// # Panics
    ///
    /// Panics on the fallback adapter, which has no provider to return.
    /// Check [`is_enabled`](Self::is_enabled) first when the adapter came
    /// from the selection factory.
    fn source(&self) -> &Self::Source;

    /// The plugin that owns the provider, or `None` if unknown (always
    /// `None` in the fallback).
    fn plugin(&self) -> Option<PluginRef>;

    /// Whether the backing provider is currently active.
    ///
    /// Re-evaluated on every call, never cached: providers can be disabled
    /// at runtime.
    fn is_enabled(&self) -> bool;

    /// Applies a mapping function to the wrapped provider, for
    /// provider-specific access without a hard dependency in the main code
    /// path.
    ///
    /// # Panics
    ///
    /// Inherits the [`source`](Self::source) panic on the fallback adapter.
    fn from_source<V>(&self, f: impl FnOnce(&Self::Source) -> V) -> V {
        f(self.source())
    }

    /// The player's primary group, as defined by the provider. `None` if
    /// the concept is unsupported or no group is assigned.
    fn primary_group(&self, player: PlayerId) -> Option<String>;

    /// Whether the player belongs to the given group. Name comparison uses
    /// the provider's native case handling.
    fn is_in_group(&self, player: PlayerId, group: &str) -> bool;

    /// Whether the player's primary group equals `group`, compared
    /// case-insensitively.
    fn is_primary_group(&self, player: PlayerId, group: &str) -> bool {
        self.primary_group(player)
            .map_or(false, |primary| primary.eq_ignore_ascii_case(group))
    }

    /// All groups the player belongs to. Never absent, possibly empty;
    /// order is unspecified and need not be stable across calls.
    fn player_groups(&self, player: PlayerId) -> Vec<String>;

    /// The player's chat prefix, if any.
    fn prefix(&self, player: PlayerId) -> Option<String>;

    /// The player's chat suffix, if any.
    fn suffix(&self, player: PlayerId) -> Option<String>;

    /// The prefix configured for a group, optionally scoped to a world.
    ///
    /// `None` world means the global/default context. Providers without
    /// per-world scoping ignore the argument entirely.
    fn group_prefix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// Convenience form of [`group_prefix_in`](Self::group_prefix_in) with
    /// no world context.
    fn group_prefix(&self, group: &str) -> Option<String> {
        self.group_prefix_in(None, group)
    }

    /// The suffix configured for a group, optionally scoped to a world.
    fn group_suffix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// Convenience form of [`group_suffix_in`](Self::group_suffix_in) with
    /// no world context.
    fn group_suffix(&self, group: &str) -> Option<String> {
        self.group_suffix_in(None, group)
    }

    /// All groups known to the provider. Never absent, possibly empty.
    fn known_groups(&self) -> Vec<String>;
}

// ============================================================================
// Keystone Adapter
// ============================================================================

/// Chat adapter bound to the Keystone permissions engine.
pub struct ChatKeystone {
    source: Arc<dyn Keystone>,
    host: Arc<dyn PluginHost>,
}

impl ChatKeystone {
    /// Binds to the registered Keystone service.
    ///
    /// # Panics
    ///
    /// Panics if no Keystone service is registered with the host. The
    /// selection factory only constructs this adapter after confirming the
    /// plugin is enabled; constructing it directly without that check is a
    /// caller error.
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let registration = host
            .service::<dyn Keystone>()
            .expect("Keystone service is not registered");
        Self {
            source: registration.provider,
            host,
        }
    }

    fn with_user<V>(&self, player: PlayerId, f: impl FnOnce(&dyn keystone::User) -> V) -> Option<V> {
        self.source.user(player).map(|user| f(&*user))
    }
}

impl ChatAdapter for ChatKeystone {
    type Source = dyn Keystone;

    fn source(&self) -> &(dyn Keystone + 'static) {
        &*self.source
    }

    fn plugin(&self) -> Option<PluginRef> {
        self.host.plugin(keystone::PLUGIN_NAME)
    }

    fn is_enabled(&self) -> bool {
        self.host.is_plugin_enabled(keystone::PLUGIN_NAME)
    }

    fn primary_group(&self, player: PlayerId) -> Option<String> {
        self.with_user(player, |user| user.primary_group())
    }

    fn is_in_group(&self, player: PlayerId, group: &str) -> bool {
        self.with_user(player, |user| user.has_permission(&format!("group.{}", group)))
            .unwrap_or(false)
    }

    fn player_groups(&self, player: PlayerId) -> Vec<String> {
        self.with_user(player, |user| {
            user.nodes()
                .into_iter()
                .filter_map(|node| match node {
                    Node::Inheritance { group } => Some(group),
                    Node::Permission { .. } => None,
                })
                .collect()
        })
        .unwrap_or_default()
    }

    fn prefix(&self, player: PlayerId) -> Option<String> {
        self.with_user(player, |user| user.meta().prefix).flatten()
    }

    fn suffix(&self, player: PlayerId) -> Option<String> {
        self.with_user(player, |user| user.meta().suffix).flatten()
    }

    // Keystone metadata is not world-scoped; both forms resolve by name only.
    fn group_prefix_in(&self, _world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group(group).and_then(|g| g.meta().prefix)
    }

    fn group_suffix_in(&self, _world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group(group).and_then(|g| g.meta().suffix)
    }

    fn known_groups(&self) -> Vec<String> {
        self.source
            .loaded_groups()
            .into_iter()
            .map(|group| group.name())
            .collect()
    }
}

impl fmt::Display for ChatKeystone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self
            .plugin()
            .map(|p| p.version)
            .unwrap_or_else(|| "unknown".to_string());
        write!(
            f,
            "ChatAdapter{{provider='{}', version={}}}",
            keystone::PLUGIN_NAME,
            version
        )
    }
}

// ============================================================================
// Flume Adapter
// ============================================================================

/// Chat adapter bound to the Flume services bridge.
pub struct ChatFlume {
    source: Arc<dyn flume::Chat>,
    host: Arc<dyn PluginHost>,
}

impl ChatFlume {
    /// Binds to the registered Flume chat service.
    ///
    /// # Panics
    ///
    /// Panics if no Flume chat service is registered with the host.
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let registration = host
            .service::<dyn flume::Chat>()
            .expect("Flume chat service is not registered");
        Self {
            source: registration.provider,
            host,
        }
    }

    fn scope(&self) -> String {
        self.source.name()
    }
}

impl ChatAdapter for ChatFlume {
    type Source = dyn flume::Chat;

    fn source(&self) -> &(dyn flume::Chat + 'static) {
        &*self.source
    }

    fn plugin(&self) -> Option<PluginRef> {
        self.host.plugin(&self.source.name())
    }

    fn is_enabled(&self) -> bool {
        self.source.enabled()
    }

    fn primary_group(&self, player: PlayerId) -> Option<String> {
        self.source.primary_group(&self.scope(), player)
    }

    fn is_in_group(&self, player: PlayerId, group: &str) -> bool {
        self.source.player_in_group(&self.scope(), player, group)
    }

    fn player_groups(&self, player: PlayerId) -> Vec<String> {
        self.source.player_groups(&self.scope(), player)
    }

    fn prefix(&self, player: PlayerId) -> Option<String> {
        self.source.player_prefix(&self.scope(), player)
    }

    fn suffix(&self, player: PlayerId) -> Option<String> {
        self.source.player_suffix(&self.scope(), player)
    }

    fn group_prefix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group_prefix(&self.scope(), world, group)
    }

    fn group_suffix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group_suffix(&self.scope(), world, group)
    }

    fn known_groups(&self) -> Vec<String> {
        self.source.groups()
    }
}

impl fmt::Display for ChatFlume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChatAdapter{{provider='{}', plugin='{}'}}",
            flume::PLUGIN_NAME,
            self.source.name()
        )
    }
}

// ============================================================================
// Conduit Adapter
// ============================================================================

/// Chat adapter bound to the Conduit services bridge.
pub struct ChatConduit {
    source: Arc<dyn conduit::Chat>,
    host: Arc<dyn PluginHost>,
}

impl ChatConduit {
    /// Binds to the registered Conduit chat service.
    ///
    /// # Panics
    ///
    /// Panics if no Conduit chat service is registered with the host.
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let registration = host
            .service::<dyn conduit::Chat>()
            .expect("Conduit chat service is not registered");
        Self {
            source: registration.provider,
            host,
        }
    }
}

impl ChatAdapter for ChatConduit {
    type Source = dyn conduit::Chat;

    fn source(&self) -> &(dyn conduit::Chat + 'static) {
        &*self.source
    }

    fn plugin(&self) -> Option<PluginRef> {
        self.host.plugin(&self.source.name())
    }

    fn is_enabled(&self) -> bool {
        self.source.enabled()
    }

    fn primary_group(&self, player: PlayerId) -> Option<String> {
        self.source.primary_group(player)
    }

    fn is_in_group(&self, player: PlayerId, group: &str) -> bool {
        self.source.player_in_group(player, group)
    }

    fn player_groups(&self, player: PlayerId) -> Vec<String> {
        self.source.player_groups(player)
    }

    fn prefix(&self, player: PlayerId) -> Option<String> {
        self.source.player_prefix(player)
    }

    fn suffix(&self, player: PlayerId) -> Option<String> {
        self.source.player_suffix(player)
    }

    fn group_prefix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group_prefix(world, group)
    }

    fn group_suffix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        self.source.group_suffix(world, group)
    }

    fn known_groups(&self) -> Vec<String> {
        self.source.groups()
    }
}

impl fmt::Display for ChatConduit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChatAdapter{{provider='{}', plugin='{}'}}",
            conduit::PLUGIN_NAME,
            self.source.name()
        )
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// No-provider chat adapter. Every read returns its documented absent or
/// empty default; only [`source`](ChatAdapter::source) raises, since there
/// is structurally no value to return.
pub struct ChatFallback;

impl ChatAdapter for ChatFallback {
    type Source = Infallible;

    fn source(&self) -> &Infallible {
        panic!("no chat provider is active; check is_enabled() before calling source()")
    }

    fn plugin(&self) -> Option<PluginRef> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn primary_group(&self, _player: PlayerId) -> Option<String> {
        None
    }

    fn is_in_group(&self, _player: PlayerId, _group: &str) -> bool {
        false
    }

    fn player_groups(&self, _player: PlayerId) -> Vec<String> {
        Vec::new()
    }

    fn prefix(&self, _player: PlayerId) -> Option<String> {
        None
    }

    fn suffix(&self, _player: PlayerId) -> Option<String> {
        None
    }

    fn group_prefix_in(&self, _world: Option<&WorldId>, _group: &str) -> Option<String> {
        None
    }

    fn group_suffix_in(&self, _world: Option<&WorldId>, _group: &str) -> Option<String> {
        None
    }

    fn known_groups(&self) -> Vec<String> {
        Vec::new()
    }
}

impl fmt::Display for ChatFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChatAdapter{{provider='NONE'}}")
    }
}

// ============================================================================
// Facade Handle and Selection
// ============================================================================

// One delegation arm per concrete adapter; every variant implements
// ChatAdapter, so the same expression type-checks in each arm.
macro_rules! chat_dispatch {
    ($self:ident, $adapter:ident => $body:expr) => {
        match $self {
            ChatFacade::Keystone($adapter) => $body,
            ChatFacade::Flume($adapter) => $body,
            ChatFacade::Conduit($adapter) => $body,
            ChatFacade::Fallback($adapter) => $body,
        }
    };
}

/// Chat facade bound to the first available provider, or the fallback.
///
/// Match on the variant (or use the `as_*` accessors) to reach a concrete
/// adapter's [`source`](ChatAdapter::source)/[`from_source`](ChatAdapter::from_source)
/// escape hatches.
pub enum ChatFacade {
    /// Bound to the Keystone permissions engine.
    Keystone(ChatKeystone),
    /// Bound to the Flume services bridge.
    Flume(ChatFlume),
    /// Bound to the Conduit services bridge.
    Conduit(ChatConduit),
    /// No chat provider active.
    Fallback(ChatFallback),
}

impl ChatFacade {
    /// Binds a facade to the first available provider.
    ///
    /// **Selection order:** Keystone → Flume → Conduit → fallback.
    ///
    /// Selection happens once per call, with no caching or hot-swap on
    /// provider state change: calling again after a provider was enabled or
    /// disabled yields a fresh, correctly-bound facade.
    ///
    /// Unlike [`EconomyFacade::select`](crate::EconomyFacade::select), a
    /// construction failure (an enabled plugin whose service registration is
    /// missing) is not converted to the fallback and will propagate.
    pub fn select(host: Arc<dyn PluginHost>) -> Self {
        if host.is_plugin_enabled(keystone::PLUGIN_NAME) {
            debug!("Chat facade bound to {}", keystone::PLUGIN_NAME);
            return Self::Keystone(ChatKeystone::new(host));
        }
        if host.is_plugin_enabled(flume::PLUGIN_NAME) {
            debug!("Chat facade bound to {}", flume::PLUGIN_NAME);
            return Self::Flume(ChatFlume::new(host));
        }
        if host.is_plugin_enabled(conduit::PLUGIN_NAME) {
            debug!("Chat facade bound to {}", conduit::PLUGIN_NAME);
            return Self::Conduit(ChatConduit::new(host));
        }
        debug!("No chat provider active, using fallback");
        Self::Fallback(ChatFallback)
    }

    /// Name of the bound provider plugin, or `"NONE"` for the fallback.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Keystone(_) => keystone::PLUGIN_NAME,
            Self::Flume(_) => flume::PLUGIN_NAME,
            Self::Conduit(_) => conduit::PLUGIN_NAME,
            Self::Fallback(_) => "NONE",
        }
    }

    /// The concrete Keystone adapter, if that is what this facade is bound to.
    pub fn as_keystone(&self) -> Option<&ChatKeystone> {
        match self {
            Self::Keystone(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// The concrete Flume adapter, if that is what this facade is bound to.
    pub fn as_flume(&self) -> Option<&ChatFlume> {
        match self {
            Self::Flume(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// The concrete Conduit adapter, if that is what this facade is bound to.
    pub fn as_conduit(&self) -> Option<&ChatConduit> {
        match self {
            Self::Conduit(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// See [`ChatAdapter::plugin`].
    pub fn plugin(&self) -> Option<PluginRef> {
        chat_dispatch!(self, adapter => adapter.plugin())
    }

    /// See [`ChatAdapter::is_enabled`].
    pub fn is_enabled(&self) -> bool {
        chat_dispatch!(self, adapter => adapter.is_enabled())
    }

    /// See [`ChatAdapter::primary_group`].
    pub fn primary_group(&self, player: PlayerId) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.primary_group(player))
    }

    /// See [`ChatAdapter::is_in_group`].
    pub fn is_in_group(&self, player: PlayerId, group: &str) -> bool {
        chat_dispatch!(self, adapter => adapter.is_in_group(player, group))
    }

    /// See [`ChatAdapter::is_primary_group`].
    pub fn is_primary_group(&self, player: PlayerId, group: &str) -> bool {
        chat_dispatch!(self, adapter => adapter.is_primary_group(player, group))
    }

    /// See [`ChatAdapter::player_groups`].
    pub fn player_groups(&self, player: PlayerId) -> Vec<String> {
        chat_dispatch!(self, adapter => adapter.player_groups(player))
    }

    /// See [`ChatAdapter::prefix`].
    pub fn prefix(&self, player: PlayerId) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.prefix(player))
    }

    /// See [`ChatAdapter::suffix`].
    pub fn suffix(&self, player: PlayerId) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.suffix(player))
    }

    /// See [`ChatAdapter::group_prefix_in`].
    pub fn group_prefix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.group_prefix_in(world, group))
    }

    /// See [`ChatAdapter::group_prefix`].
    pub fn group_prefix(&self, group: &str) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.group_prefix(group))
    }

    /// See [`ChatAdapter::group_suffix_in`].
    pub fn group_suffix_in(&self, world: Option<&WorldId>, group: &str) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.group_suffix_in(world, group))
    }

    /// See [`ChatAdapter::group_suffix`].
    pub fn group_suffix(&self, group: &str) -> Option<String> {
        chat_dispatch!(self, adapter => adapter.group_suffix(group))
    }

    /// See [`ChatAdapter::known_groups`].
    pub fn known_groups(&self) -> Vec<String> {
        chat_dispatch!(self, adapter => adapter.known_groups())
    }
}

impl fmt::Display for ChatFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        chat_dispatch!(self, adapter => fmt::Display::fmt(adapter, f))
    }
}
