use anchor_lang::prelude::*;

#[account]
pub struct Claim {
    /// The matching award this claim is redeemable against
    pub award: Pubkey,
    /// The only party who may redeem
    pub recipient: Pubkey,
    /// How many gives have accrued under the chain
    pub amount: u32,
    /// Misc
    pub bump: u8,
}

impl Claim {
    pub fn space() -> usize {
        8 + // key
        32 + // award
        32 + // recipient
        4 + // amount
        1 // bump
    }

    pub const PREFIX: &'static [u8] = b"claim";
}
