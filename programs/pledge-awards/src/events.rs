use anchor_lang::prelude::*;

#[event]
pub struct AwardCreated {
    pub award: Pubkey,
    pub authority: Pubkey,
    pub amount: u64,
    pub matching_award: Option<Pubkey>,
}

#[event]
pub struct AwardGiven {
    pub award: Pubkey,
    pub entry_id: Pubkey,
    pub recipient: Pubkey,
    pub recipient_share: u64,
    pub treasury_share: u64,
}

#[event]
pub struct AwardClaimed {
    pub award: Pubkey,
    pub recipient: Pubkey,
    pub amount: u64,
}

#[event]
pub struct AwardClosed {
    pub award: Pubkey,
}
