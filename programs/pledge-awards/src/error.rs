use anchor_lang::prelude::*;

#[error_code]
pub enum AwardError {
    #[msg("Inclusion proof does not match the supplied root")]
    ProofInvalid,
    #[msg("A matching award cannot itself reference a matching award")]
    ChainTooDeep,
    #[msg("This award accrues claims and must be given with a claim account")]
    ClaimRequired,
    #[msg("Matching award does not match the award's reference")]
    MatchingAwardMismatch,
    #[msg("No claim exists against this award for this recipient")]
    ClaimNotFound,
    #[msg("Claim has already been redeemed")]
    ClaimAlreadyRedeemed,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Treasury account does not match the award")]
    TreasuryMismatch,
    #[msg("Award still has outstanding claims")]
    OutstandingClaims,
    #[msg("Award balance cannot cover the payout")]
    InsufficientFunds,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Numerical overflow")]
    NumericalOverflow,
}
