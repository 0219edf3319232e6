//! Service API of the Flume services bridge.
//!
//! Flume is the next-generation fork of the Conduit bridge. The surface is
//! deliberately close to [`crate::conduit`] with two differences: every
//! account query takes a leading `scope` (the namespace of the calling
//! plugin, so backing plugins can partition ledgers and metadata per
//! consumer), and economy accounts are keyed by raw UUID so they work for
//! players the host has never seen online.
//!
//! Ledger mutations reuse the response shape of the legacy bridge.

use crate::{PlayerId, ProviderError, WorldId};
use uuid::Uuid;

pub use crate::conduit::{EconomyResponse, ResponseOutcome};

/// Plugin name Flume registers under with the host.
pub const PLUGIN_NAME: &str = "Flume";

/// Chat/permission metadata service bridged by Flume.
pub trait Chat: Send + Sync {
    /// Name of the plugin backing this service.
    fn name(&self) -> String;

    /// Whether the backing service considers itself active.
    fn enabled(&self) -> bool;

    /// The player's primary group within `scope`.
    fn primary_group(&self, scope: &str, player: PlayerId) -> Option<String>;

    /// Membership test within `scope`, provider-native case handling.
    fn player_in_group(&self, scope: &str, player: PlayerId, group: &str) -> bool;

    /// All groups the player belongs to within `scope`.
    fn player_groups(&self, scope: &str, player: PlayerId) -> Vec<String>;

    /// The player's chat prefix within `scope`, if set.
    fn player_prefix(&self, scope: &str, player: PlayerId) -> Option<String>;

    /// The player's chat suffix within `scope`, if set.
    fn player_suffix(&self, scope: &str, player: PlayerId) -> Option<String>;

    /// A group's prefix, optionally world-scoped. `None` world means the
    /// global/default context.
    fn group_prefix(&self, scope: &str, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// A group's suffix, optionally world-scoped.
    fn group_suffix(&self, scope: &str, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// All groups known to the backing plugin.
    fn groups(&self) -> Vec<String>;
}

/// Economy ledger service bridged by Flume. Accounts are raw UUIDs.
pub trait Economy: Send + Sync {
    /// Name of the plugin backing this service.
    fn name(&self) -> String;

    /// Whether the backing service considers itself active.
    fn enabled(&self) -> bool;

    /// Current balance of `account` within `scope`.
    fn balance(&self, scope: &str, account: Uuid) -> Result<f64, ProviderError>;

    /// Debits `amount` from `account` within `scope`.
    fn withdraw(
        &self,
        scope: &str,
        account: Uuid,
        amount: f64,
    ) -> Result<EconomyResponse, ProviderError>;

    /// Credits `amount` to `account` within `scope`.
    fn deposit(
        &self,
        scope: &str,
        account: Uuid,
        amount: f64,
    ) -> Result<EconomyResponse, ProviderError>;
}
