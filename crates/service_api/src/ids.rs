//! Identity types shared by the facade and every provider surface.
//!
//! Wrapper types keep the two id spaces distinct: a [`PlayerId`] can never be
//! passed where a [`WorldId`] is expected. Both serialize as their inner
//! value so they interoperate with provider-side storage unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player known to the host environment.
///
/// This is a wrapper around UUID that provides type safety. The facade never
/// owns or persists player identities; it only forwards them to providers,
/// which makes every operation safe for offline players as well.
///
/// # Examples
///
/// ```rust
/// use service_api::PlayerId;
///
/// let player_id = PlayerId::new();
/// let parsed = PlayerId::from_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
/// println!("Player ID: {}", parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a player ID from a string representation.
    ///
    /// Returns `Err(uuid::Error)` if `s` is not a valid UUID.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a world (or comparable namespace) used to scope group
/// decorations.
///
/// Providers without per-world scoping ignore this entirely; the facade
/// passes `None` to mean the global/default context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub String);

impl WorldId {
    /// Creates a world id from any string-like name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the world name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for WorldId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
