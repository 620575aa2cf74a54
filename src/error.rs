/// Errors produced by impact ledger operations.
///
/// Business outcomes such as an insufficient balance or an unknown hash are
/// not errors; they come back as values inside `Ok`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("hash collision detected")]
    HashCollision,

    #[error("ledger lock poisoned")]
    LockPoisoned,
}
