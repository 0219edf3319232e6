//! Service API of the Keystone permissions engine.
//!
//! Keystone is a dedicated permissions plugin built around a node graph:
//! every user carries a set of [`Node`]s, where group membership is an
//! inheritance node and plain permissions are key/value nodes. Group and
//! user decorations (prefix/suffix) come from resolved [`Meta`] snapshots.
//!
//! The facade consumes this API read-only. Handles returned by the manager
//! methods are snapshots owned by the provider; holding one does not pin any
//! provider-internal state.

use crate::PlayerId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Plugin name Keystone registers under with the host.
pub const PLUGIN_NAME: &str = "Keystone";

/// Entry point of the Keystone service, registered with the host's service
/// registry while the plugin is active.
pub trait Keystone: Send + Sync {
    /// Looks up a user by player id. `None` if the user is not loaded.
    fn user(&self, player: PlayerId) -> Option<Arc<dyn User>>;

    /// Looks up a group by name. `None` if no such group is loaded.
    fn group(&self, name: &str) -> Option<Arc<dyn Group>>;

    /// All groups currently loaded by the engine. Order is unspecified.
    fn loaded_groups(&self) -> Vec<Arc<dyn Group>>;
}

/// A Keystone user: a player's node set plus resolved metadata.
pub trait User: Send + Sync {
    /// The user's primary group name.
    fn primary_group(&self) -> String;

    /// The user's full node set, in the engine's internal iteration order.
    fn nodes(&self) -> Vec<Node>;

    /// Whether the resolved permission tree grants `key`.
    fn has_permission(&self, key: &str) -> bool;

    /// Resolved decoration metadata for the user.
    fn meta(&self) -> Meta;
}

/// A Keystone group and its resolved metadata.
pub trait Group: Send + Sync {
    /// The group's name.
    fn name(&self) -> String;

    /// Resolved decoration metadata for the group.
    fn meta(&self) -> Meta;
}

/// A single entry in a user's node set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A plain permission grant or denial.
    Permission {
        /// Permission key, e.g. `"chat.color"`.
        key: String,
        /// `true` grants, `false` denies.
        value: bool,
    },
    /// Membership in a group, inherited into the user's permission tree.
    Inheritance {
        /// Name of the inherited group.
        group: String,
    },
}

/// Resolved prefix/suffix metadata for a user or group.
///
/// Values are provider-native and may embed legacy formatting tokens;
/// consumers format or strip them as needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Chat prefix, if one is set.
    pub prefix: Option<String>,
    /// Chat suffix, if one is set.
    pub suffix: Option<String>,
}
