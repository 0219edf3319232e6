//! Service API of the Conduit services bridge.
//!
//! Conduit is the long-standing bridge plugin that lets permission and
//! economy plugins expose a single flat API. Whatever plugin actually backs
//! a service reports itself through [`Chat::name`]/[`Economy::name`], which
//! is why adapters resolve their owning plugin from that name rather than
//! from a fixed constant.

use crate::{PlayerId, ProviderError, WorldId};
use serde::{Deserialize, Serialize};

/// Plugin name Conduit registers under with the host.
pub const PLUGIN_NAME: &str = "Conduit";

/// Chat/permission metadata service bridged by Conduit.
///
/// String-producing queries return the backing plugin's output verbatim,
/// including any embedded legacy formatting tokens.
pub trait Chat: Send + Sync {
    /// Name of the plugin backing this service.
    fn name(&self) -> String;

    /// Whether the backing service considers itself active.
    fn enabled(&self) -> bool;

    /// The player's primary group, if the backing plugin has the concept.
    fn primary_group(&self, player: PlayerId) -> Option<String>;

    /// Membership test, using the backing plugin's own case handling.
    fn player_in_group(&self, player: PlayerId, group: &str) -> bool;

    /// All groups the player belongs to. Order is unspecified.
    fn player_groups(&self, player: PlayerId) -> Vec<String>;

    /// The player's chat prefix, if set.
    fn player_prefix(&self, player: PlayerId) -> Option<String>;

    /// The player's chat suffix, if set.
    fn player_suffix(&self, player: PlayerId) -> Option<String>;

    /// A group's prefix, optionally scoped to a world. `None` world means
    /// the global/default context.
    fn group_prefix(&self, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// A group's suffix, optionally scoped to a world.
    fn group_suffix(&self, world: Option<&WorldId>, group: &str) -> Option<String>;

    /// All groups known to the backing plugin.
    fn groups(&self) -> Vec<String>;
}

/// Economy ledger service bridged by Conduit.
pub trait Economy: Send + Sync {
    /// Name of the plugin backing this service.
    fn name(&self) -> String;

    /// Whether the backing service considers itself active.
    fn enabled(&self) -> bool;

    /// Current account balance.
    fn balance(&self, player: PlayerId) -> Result<f64, ProviderError>;

    /// Debits `amount` from the player's account.
    fn withdraw(&self, player: PlayerId, amount: f64) -> Result<EconomyResponse, ProviderError>;

    /// Credits `amount` to the player's account.
    fn deposit(&self, player: PlayerId, amount: f64) -> Result<EconomyResponse, ProviderError>;
}

/// Result of a ledger mutation, as reported by the backing plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyResponse {
    /// Amount the operation applied to the account.
    pub amount: f64,
    /// Account balance after the operation.
    pub balance: f64,
    /// Whether the backing plugin reports unambiguous success.
    pub outcome: ResponseOutcome,
    /// Optional human-readable detail from the backing plugin.
    pub message: Option<String>,
}

impl EconomyResponse {
    /// A successful mutation of `amount`, leaving `balance`.
    pub fn success(amount: f64, balance: f64) -> Self {
        Self {
            amount,
            balance,
            outcome: ResponseOutcome::Success,
            message: None,
        }
    }

    /// A refused mutation with a provider-supplied reason.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            amount: 0.0,
            balance: 0.0,
            outcome: ResponseOutcome::Failure,
            message: Some(message.into()),
        }
    }
}

/// Outcome discriminant of an [`EconomyResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseOutcome {
    /// The operation was applied.
    Success,
    /// The operation was refused (insufficient funds, closed account, ...).
    Failure,
    /// The backing plugin does not implement the operation.
    NotImplemented,
}
