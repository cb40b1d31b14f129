//! Error types for line-billing contracts.

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Errors raised when a contract is driven out of order.
///
/// These are invalid-state errors: the driver broke the contract lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// A call was billed or the contract cancelled before any `new_month`.
    #[error("no bill is active for this contract; call new_month first")]
    NoActiveBill,

    /// The contract was already cancelled.
    #[error("contract is cancelled")]
    Cancelled,
}
