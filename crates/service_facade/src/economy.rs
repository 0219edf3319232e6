//! Economy facade.
//!
//! [`EconomyAdapter`] is the uniform contract over a single external ledger;
//! [`EconomyFlume`] and [`EconomyConduit`] bind it to the two bridge
//! generations, [`EconomyFallback`] covers the no-provider case, and
//! [`EconomyFacade`] is the handle the selection factory returns.
//!
//! Unlike the chat facade, every ledger operation is shielded: a provider
//! failure is converted to a safe default (zero balance, `false` success)
//! instead of reaching the caller.

use plugin_host::{PluginHost, PluginRef, ServiceLookup};
use service_api::conduit::{self, ResponseOutcome};
use service_api::{flume, PlayerId};
use std::convert::Infallible;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

// ============================================================================
// Contract
// ============================================================================

/// Uniform read/write access to a single external economy ledger, keyed by
/// offline-capable player identity.
pub trait EconomyAdapter: Send + Sync {
    /// The wrapped provider type.
    type Source: ?Sized;

    /// Returns the wrapped provider handle.
    ///
    /// # Panics
    ///
    /// Panics on the fallback adapter, which has no provider to return.
    fn source(&self) -> &Self::Source;

    /// The plugin that supplies the provider, or `None` if unknown (always
    /// `None` in the fallback).
    fn plugin(&self) -> Option<PluginRef>;

    /// Whether the backing provider is currently active. Re-evaluated on
    /// every call.
    fn is_enabled(&self) -> bool;

    /// Applies a mapping function to the wrapped provider.
    ///
    /// # Panics
    ///
    /// Inherits the [`source`](Self::source) panic on the fallback adapter.
    fn from_source<V>(&self, f: impl FnOnce(&Self::Source) -> V) -> V {
        f(self.source())
    }

    /// The player's current balance.
    ///
    /// Never raises: any underlying failure (missing account, provider
    /// error) yields `0.0`. Non-negativity is the provider's contract and is
    /// not independently enforced here.
    fn balance(&self, player: PlayerId) -> f64;

    /// Whether the player holds at least `amount`. Pure derivation:
    /// `amount <= balance(player)`.
    fn has_amount(&self, player: PlayerId, amount: f64) -> bool {
        amount <= self.balance(player)
    }

    /// Attempts to debit `amount` from the player's account.
    ///
    /// A negative `amount` returns `false` without touching the provider;
    /// so does any provider failure. Returns `true` only when the provider
    /// reports unambiguous success.
    fn withdraw(&self, player: PlayerId, amount: f64) -> bool;

    /// Attempts to credit `amount` to the player's account. Same shape as
    /// [`withdraw`](Self::withdraw).
    fn deposit(&self, player: PlayerId, amount: f64) -> bool;
}

// ============================================================================
// Flume Adapter
// ============================================================================

/// Economy adapter bound to the Flume services bridge.
///
/// Flume ledgers are scope + raw-UUID keyed; this adapter passes its
/// provider's own name as the scope and the player's UUID as the account.
pub struct EconomyFlume {
    source: Arc<dyn flume::Economy>,
    host: Arc<dyn PluginHost>,
}

impl EconomyFlume {
    /// Binds to the registered Flume economy service.
    ///
    /// # Panics
    ///
    /// Panics if no Flume economy service is registered with the host. The
    /// selection factory converts this into the fallback adapter.
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let registration = host
            .service::<dyn flume::Economy>()
            .expect("Flume economy service is not registered");
        Self {
            source: registration.provider,
            host,
        }
    }
}

impl EconomyAdapter for EconomyFlume {
    type Source = dyn flume::Economy;

    fn source(&self) -> &(dyn flume::Economy + 'static) {
        &*self.source
    }

    fn plugin(&self) -> Option<PluginRef> {
        self.host.plugin(&self.source.name())
    }

    fn is_enabled(&self) -> bool {
        self.source.enabled()
    }

    fn balance(&self, player: PlayerId) -> f64 {
        match self.source.balance(&self.source.name(), player.0) {
            Ok(balance) => balance,
            Err(err) => {
                warn!("Balance query for {} failed: {}", player, err);
                0.0
            }
        }
    }

    fn withdraw(&self, player: PlayerId, amount: f64) -> bool {
        if amount < 0.0 {
            return false;
        }
        match self.source.withdraw(&self.source.name(), player.0, amount) {
            Ok(response) => response.outcome == ResponseOutcome::Success,
            Err(err) => {
                warn!("Withdrawal of {} from {} failed: {}", amount, player, err);
                false
            }
        }
    }

    fn deposit(&self, player: PlayerId, amount: f64) -> bool {
        if amount < 0.0 {
            return false;
        }
        match self.source.deposit(&self.source.name(), player.0, amount) {
            Ok(response) => response.outcome == ResponseOutcome::Success,
            Err(err) => {
                warn!("Deposit of {} to {} failed: {}", amount, player, err);
                false
            }
        }
    }
}

impl fmt::Display for EconomyFlume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EconomyAdapter{{provider='{}', plugin='{}'}}",
            flume::PLUGIN_NAME,
            self.source.name()
        )
    }
}

// ============================================================================
// Conduit Adapter
// ============================================================================

/// Economy adapter bound to the Conduit services bridge.
pub struct EconomyConduit {
    source: Arc<dyn conduit::Economy>,
    host: Arc<dyn PluginHost>,
}

impl EconomyConduit {
    /// Binds to the registered Conduit economy service.
    ///
    /// # Panics
    ///
    /// Panics if no Conduit economy service is registered with the host. The
    /// selection factory converts this into the fallback adapter.
    pub fn new(host: Arc<dyn PluginHost>) -> Self {
        let registration = host
            .service::<dyn conduit::Economy>()
            .expect("Conduit economy service is not registered");
        Self {
            source: registration.provider,
            host,
        }
    }
}

impl EconomyAdapter for EconomyConduit {
    type Source = dyn conduit::Economy;

    fn source(&self) -> &(dyn conduit::Economy + 'static) {
        &*self.source
    }

    fn plugin(&self) -> Option<PluginRef> {
        self.host.plugin(&self.source.name())
    }

    fn is_enabled(&self) -> bool {
        self.source.enabled()
    }

    fn balance(&self, player: PlayerId) -> f64 {
        match self.source.balance(player) {
            Ok(balance) => balance,
            Err(err) => {
                warn!("Balance query for {} failed: {}", player, err);
                0.0
            }
        }
    }

    fn withdraw(&self, player: PlayerId, amount: f64) -> bool {
        if amount < 0.0 {
            return false;
        }
        match self.source.withdraw(player, amount) {
            Ok(response) => response.outcome == ResponseOutcome::Success,
            Err(err) => {
                warn!("Withdrawal of {} from {} failed: {}", amount, player, err);
                false
            }
        }
    }

    fn deposit(&self, player: PlayerId, amount: f64) -> bool {
        if amount < 0.0 {
            return false;
        }
        match self.source.deposit(player, amount) {
            Ok(response) => response.outcome == ResponseOutcome::Success,
            Err(err) => {
                warn!("Deposit of {} to {} failed: {}", amount, player, err);
                false
            }
        }
    }
}

impl fmt::Display for EconomyConduit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EconomyAdapter{{provider='{}', plugin='{}'}}",
            conduit::PLUGIN_NAME,
            self.source.name()
        )
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// No-provider economy adapter: zero balances, refused mutations, never
/// raises except for [`source`](EconomyAdapter::source).
pub struct EconomyFallback;

impl EconomyAdapter for EconomyFallback {
    type Source = Infallible;

    fn source(&self) -> &Infallible {
        panic!("no economy provider is active; check is_enabled() before calling source()")
    }

    fn plugin(&self) -> Option<PluginRef> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn balance(&self, _player: PlayerId) -> f64 {
        0.0
    }

    fn withdraw(&self, _player: PlayerId, _amount: f64) -> bool {
        false
    }

    fn deposit(&self, _player: PlayerId, _amount: f64) -> bool {
        false
    }
}

impl fmt::Display for EconomyFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EconomyAdapter{{provider='NONE'}}")
    }
}

// ============================================================================
// Facade Handle and Selection
// ============================================================================

macro_rules! economy_dispatch {
    ($self:ident, $adapter:ident => $body:expr) => {
        match $self {
            EconomyFacade::Flume($adapter) => $body,
            EconomyFacade::Conduit($adapter) => $body,
            EconomyFacade::Fallback($adapter) => $body,
        }
    };
}

/// Economy facade bound to the first available provider, or the fallback.
pub enum EconomyFacade {
    /// Bound to the Flume services bridge.
    Flume(EconomyFlume),
    /// Bound to the Conduit services bridge.
    Conduit(EconomyConduit),
    /// No economy provider active.
    Fallback(EconomyFallback),
}

impl EconomyFacade {
    /// Binds a facade to the first available provider.
    ///
    /// **Selection order:** Flume → Conduit → fallback.
    ///
    /// Stricter than [`ChatFacade::select`](crate::ChatFacade::select): the
    /// whole probe-and-construct sequence is shielded, and any
    /// construction-time panic (an enabled plugin whose service registration
    /// is missing) yields the fallback instead of propagating.
    pub fn select(host: Arc<dyn PluginHost>) -> Self {
        let selected = catch_unwind(AssertUnwindSafe(|| {
            if host.is_plugin_enabled(flume::PLUGIN_NAME) {
                debug!("Economy facade bound to {}", flume::PLUGIN_NAME);
                Self::Flume(EconomyFlume::new(Arc::clone(&host)))
            } else if host.is_plugin_enabled(conduit::PLUGIN_NAME) {
                debug!("Economy facade bound to {}", conduit::PLUGIN_NAME);
                Self::Conduit(EconomyConduit::new(host))
            } else {
                debug!("No economy provider active, using fallback");
                Self::Fallback(EconomyFallback)
            }
        }));
        selected.unwrap_or_else(|_| {
            warn!("Economy adapter construction panicked, using fallback");
            Self::Fallback(EconomyFallback)
        })
    }

    /// Name of the bound provider plugin, or `"NONE"` for the fallback.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Flume(_) => flume::PLUGIN_NAME,
            Self::Conduit(_) => conduit::PLUGIN_NAME,
            Self::Fallback(_) => "NONE",
        }
    }

    /// The concrete Flume adapter, if that is what this facade is bound to.
    pub fn as_flume(&self) -> Option<&EconomyFlume> {
        match self {
            Self::Flume(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// The concrete Conduit adapter, if that is what this facade is bound to.
    pub fn as_conduit(&self) -> Option<&EconomyConduit> {
        match self {
            Self::Conduit(adapter) => Some(adapter),
            _ => None,
        }
    }

    /// See [`EconomyAdapter::plugin`].
    pub fn plugin(&self) -> Option<PluginRef> {
        economy_dispatch!(self, adapter => adapter.plugin())
    }

    /// See [`EconomyAdapter::is_enabled`].
    pub fn is_enabled(&self) -> bool {
        economy_dispatch!(self, adapter => adapter.is_enabled())
    }

    /// See [`EconomyAdapter::balance`].
    pub fn balance(&self, player: PlayerId) -> f64 {
        economy_dispatch!(self, adapter => adapter.balance(player))
    }

    /// See [`EconomyAdapter::has_amount`].
    pub fn has_amount(&self, player: PlayerId, amount: f64) -> bool {
        economy_dispatch!(self, adapter => adapter.has_amount(player, amount))
    }

    /// See [`EconomyAdapter::withdraw`].
    pub fn withdraw(&self, player: PlayerId, amount: f64) -> bool {
        economy_dispatch!(self, adapter => adapter.withdraw(player, amount))
    }

    /// See [`EconomyAdapter::deposit`].
    pub fn deposit(&self, player: PlayerId, amount: f64) -> bool {
        economy_dispatch!(self, adapter => adapter.deposit(player, amount))
    }
}

impl fmt::Display for EconomyFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        economy_dispatch!(self, adapter => fmt::Display::fmt(adapter, f))
    }
}
