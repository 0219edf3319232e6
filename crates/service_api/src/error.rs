//! Error type surfaced by fallible provider operations.

use crate::PlayerId;

/// Runtime failure reported by a provider while servicing a query.
///
/// Economy providers return these from balance and ledger mutations; the
/// facade converts them to safe defaults instead of propagating them to
/// callers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider has no account for the given player.
    #[error("no account for player {0}")]
    AccountNotFound(PlayerId),
    /// The provider's backing store or upstream service failed.
    #[error("provider backend error: {0}")]
    Backend(String),
    /// The provider does not implement the requested operation.
    #[error("operation not implemented by provider: {0}")]
    NotImplemented(&'static str),
}
