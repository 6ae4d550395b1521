use anchor_lang::prelude::*;

#[error_code]
pub enum PledgeError {
    #[msg("This loan is not overdue")]
    NotOverdue,
    #[msg("Invalid state")]
    InvalidState,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Basis points must be between 1 and 10000")]
    InvalidBasisPoints,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Invalid duration")]
    InvalidDuration,
    #[msg("Invalid collateral")]
    InvalidCollateral,
    #[msg("Numerical overflow")]
    NumericalOverflow,
}
