use anchor_lang::prelude::*;

#[event]
pub struct ListingCreated {
    pub listing: Pubkey,
    pub borrower: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
    pub basis_points: u32,
    pub duration: u64,
}

#[event]
pub struct ListingCancelled {
    pub listing: Pubkey,
    pub borrower: Pubkey,
}

#[event]
pub struct LoanFunded {
    pub listing: Pubkey,
    pub lender: Pubkey,
    pub start_date: i64,
}

#[event]
pub struct LoanRepaid {
    pub listing: Pubkey,
    pub lender: Pubkey,
    pub amount_due: u64,
}

#[event]
pub struct CollateralRepossessed {
    pub listing: Pubkey,
    pub lender: Pubkey,
    pub mint: Pubkey,
}

#[event]
pub struct ListingClosed {
    pub listing: Pubkey,
}
