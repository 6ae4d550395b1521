use anchor_lang::prelude::Pubkey;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// All 256 probe values for this identity pair are occupied.
    #[error("no free derived address remains for this identity pair")]
    AddressSpaceExhausted,
    #[error("mint {0} is not a recognized collateral")]
    UnrecognizedCollateral(Pubkey),
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),
    #[error("failed to decode account {0}")]
    MalformedAccount(Pubkey),
    #[error("registry entry {0:?} is not a valid address")]
    InvalidRegistryEntry(String),
    #[error("failed to read collateral registry")]
    InvalidRegistry(#[source] serde_json::Error),
    #[error("ledger request failed")]
    Ledger(#[source] BoxError),
}
