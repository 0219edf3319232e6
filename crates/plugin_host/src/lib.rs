//! Host-side capability lookup for the service facade.
//!
//! The facade never talks to process-wide ambient state. Everything it needs
//! from the host environment is behind the [`PluginHost`] trait:
//!
//! - "the currently active provider instance for capability `S`, or none"
//!   ([`PluginHost::registration_raw`], typed via [`ServiceLookup::service`])
//! - "is the named plugin currently active" ([`PluginHost::is_plugin_enabled`])
//!
//! Embedders running inside a real server runtime implement [`PluginHost`]
//! over their plugin manager; everything else (and every test) can use
//! [`InProcessHost`], a concurrent in-memory implementation.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Host Contract
// ============================================================================

/// Capability-lookup interface the host environment provides.
///
/// Implementations must answer liveness queries from live state: the facade
/// re-checks [`is_plugin_enabled`](Self::is_plugin_enabled) on every call
/// rather than caching, since plugins can be disabled at runtime.
pub trait PluginHost: Send + Sync {
    /// Returns the registration stored under the given service key, or
    /// `None` if no provider is registered for that capability.
    ///
    /// The key is the `TypeId` of the service trait object (e.g.
    /// `TypeId::of::<dyn MyService>()`). Use [`ServiceLookup::service`] for
    /// the typed form.
    fn registration_raw(&self, key: TypeId) -> Option<RawRegistration>;

    /// Returns a metadata snapshot for the named plugin, or `None` if the
    /// host has never seen it.
    fn plugin(&self, name: &str) -> Option<PluginRef>;

    /// Whether the named plugin is currently active.
    fn is_plugin_enabled(&self, name: &str) -> bool;
}

/// A type-erased service registration.
///
/// The payload is an `Arc<S>` boxed behind `dyn Any`; [`ServiceLookup`]
/// recovers the typed handle.
#[derive(Clone)]
pub struct RawRegistration {
    /// Type-erased provider handle.
    pub provider: Arc<dyn Any + Send + Sync>,
    /// Name of the plugin that registered the provider.
    pub plugin: String,
}

/// A typed service registration recovered from the host.
pub struct Registration<S: ?Sized> {
    /// The provider instance.
    pub provider: Arc<S>,
    /// Name of the plugin that registered the provider.
    pub plugin: String,
}

impl<S: ?Sized> Clone for Registration<S> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            plugin: self.plugin.clone(),
        }
    }
}

/// Metadata snapshot for a plugin known to the host.
///
/// Deliberately carries no enabled flag: liveness must be re-queried through
/// [`PluginHost::is_plugin_enabled`] so it is never stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRef {
    /// Plugin name, unique within the host.
    pub name: String,
    /// Plugin version string.
    pub version: String,
}

/// Typed lookup on top of [`PluginHost::registration_raw`].
///
/// Blanket-implemented for every host, so `host.service::<dyn MyService>()`
/// works on trait objects and concrete hosts alike.
pub trait ServiceLookup {
    /// Returns the active provider for capability `S`, or `None` if no
    /// provider is registered (or a provider of a different type occupies
    /// the key, which cannot happen through [`InProcessHost`]).
    fn service<S: ?Sized + Send + Sync + 'static>(&self) -> Option<Registration<S>>;
}

impl<H: PluginHost + ?Sized> ServiceLookup for H {
    fn service<S: ?Sized + Send + Sync + 'static>(&self) -> Option<Registration<S>> {
        let raw = self.registration_raw(TypeId::of::<S>())?;
        let provider = raw.provider.downcast::<Arc<S>>().ok()?;
        Some(Registration {
            provider: (*provider).clone(),
            plugin: raw.plugin,
        })
    }
}

/// Errors reported by host mutations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The named plugin has not been registered with the host.
    #[error("plugin not registered with host: {0}")]
    UnknownPlugin(String),
}

// ============================================================================
// In-Process Host
// ============================================================================

/// Concurrent in-memory [`PluginHost`].
///
/// Suitable for embedders that manage plugins themselves and for tests. A
/// disabled plugin's services stay registered; deciding what a disabled
/// provider means is the facade's job, not the registry's.
#[derive(Default)]
pub struct InProcessHost {
    plugins: DashMap<String, PluginEntry>,
    services: DashMap<TypeId, StoredService>,
}

struct PluginEntry {
    version: String,
    enabled: AtomicBool,
}

struct StoredService {
    provider: Arc<dyn Any + Send + Sync>,
    plugin: String,
}

impl InProcessHost {
    /// Creates an empty host with no plugins or services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin with the host. Re-registering a name replaces its
    /// entry.
    pub fn register_plugin(&self, name: &str, version: &str, enabled: bool) {
        debug!("Registering plugin {} v{} (enabled: {})", name, version, enabled);
        self.plugins.insert(
            name.to_string(),
            PluginEntry {
                version: version.to_string(),
                enabled: AtomicBool::new(enabled),
            },
        );
    }

    /// Flips the named plugin's activation state.
    pub fn set_plugin_enabled(&self, name: &str, enabled: bool) -> Result<(), HostError> {
        let entry = self
            .plugins
            .get(name)
            .ok_or_else(|| HostError::UnknownPlugin(name.to_string()))?;
        entry.enabled.store(enabled, Ordering::SeqCst);
        debug!("Plugin {} is now {}", name, if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Registers `provider` as the active implementation of capability `S`,
    /// owned by the named plugin. Replaces any previous registration for
    /// `S`.
    pub fn register_service<S: ?Sized + Send + Sync + 'static>(
        &self,
        plugin: &str,
        provider: Arc<S>,
    ) -> Result<(), HostError> {
        if !self.plugins.contains_key(plugin) {
            return Err(HostError::UnknownPlugin(plugin.to_string()));
        }
        debug!("Plugin {} registered service {}", plugin, std::any::type_name::<S>());
        self.services.insert(
            TypeId::of::<S>(),
            StoredService {
                provider: Arc::new(provider),
                plugin: plugin.to_string(),
            },
        );
        Ok(())
    }

    /// Removes the registration for capability `S`, if any.
    pub fn unregister_service<S: ?Sized + Send + Sync + 'static>(&self) {
        self.services.remove(&TypeId::of::<S>());
    }
}

impl PluginHost for InProcessHost {
    fn registration_raw(&self, key: TypeId) -> Option<RawRegistration> {
        self.services.get(&key).map(|stored| RawRegistration {
            provider: Arc::clone(&stored.provider),
            plugin: stored.plugin.clone(),
        })
    }

    fn plugin(&self, name: &str) -> Option<PluginRef> {
        self.plugins.get(name).map(|entry| PluginRef {
            name: name.to_string(),
            version: entry.version.clone(),
        })
    }

    fn is_plugin_enabled(&self, name: &str) -> bool {
        self.plugins
            .get(name)
            .map(|entry| entry.enabled.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}
