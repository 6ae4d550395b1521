use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq)]
pub enum AwardKind {
    /// A plain award with no follow-on entitlement
    Standalone,
    /// Chained beneath another award; every give accrues the recipient
    /// a claim against the referenced award. The referenced award must
    /// itself be standalone, so chains are at most one hop deep.
    Matching { award: Pubkey },
}

impl AwardKind {
    pub fn matching_award(&self) -> Option<Pubkey> {
        match self {
            AwardKind::Standalone => None,
            AwardKind::Matching { award } => Some(*award),
        }
    }
}

#[account]
pub struct Award {
    /// Who administers the award
    pub authority: Pubkey,
    /// Receives the non-recipient half of each give, when set
    pub treasury: Option<Pubkey>,
    /// Payout per give, in lamports
    pub amount: u64,
    pub kind: AwardKind,
    /// Claim records currently outstanding against this award
    pub claims: u32,
    /// Misc
    pub uid: u8,
    pub bump: u8,
}

impl Award {
    /// Recipient and treasury shares of one give. The odd lamport, if
    /// any, goes to the treasury.
    pub fn split(amount: u64) -> (u64, u64) {
        let recipient = amount / 2;
        (recipient, amount - recipient)
    }

    pub fn space() -> usize {
        8 + // key
        32 + // authority
        (1 + 32) + // treasury
        8 + // amount
        (1 + 32) + // kind
        4 + // claims
        1 + // uid
        1 + // bump
        64 // padding
    }

    pub const PREFIX: &'static [u8] = b"award";
}
