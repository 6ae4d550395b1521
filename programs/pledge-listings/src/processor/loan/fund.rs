use anchor_lang::{
    prelude::*,
    solana_program::{program::invoke, system_instruction},
};
use anchor_spl::token::{Mint, Token};

use crate::error::*;
use crate::events::LoanFunded;
use crate::state::{Listing, ListingState};

#[derive(Accounts)]
pub struct MakeLoan<'info> {
    /// CHECK: constrained on listing
    #[account(mut)]
    pub borrower: AccountInfo<'info>,
    #[account(mut)]
    pub lender: Signer<'info>,
    /// The listing the loan is being issued against
    #[account(
        mut,
        seeds = [
            Listing::PREFIX,
            mint.key().as_ref(),
            borrower.key().as_ref(),
            &[listing.uid],
        ],
        bump = listing.bump,
        has_one = borrower,
        has_one = mint,
        constraint = listing.borrower != lender.key() @ PledgeError::Unauthorized,
        constraint = listing.state == ListingState::Listed @ PledgeError::InvalidState,
    )]
    pub listing: Box<Account<'info, Listing>>,
    pub mint: Box<Account<'info, Mint>>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub clock: Sysvar<'info, Clock>,
}

pub fn handle_make_loan(ctx: Context<MakeLoan>) -> Result<()> {
    let listing = &mut ctx.accounts.listing;

    listing.state = ListingState::Active;
    listing.lender = Some(ctx.accounts.lender.key());
    listing.start_date = Some(ctx.accounts.clock.unix_timestamp);

    // Transfer amount
    invoke(
        &system_instruction::transfer(
            &ctx.accounts.lender.key(),
            &listing.borrower,
            listing.amount,
        ),
        &[
            ctx.accounts.lender.to_account_info(),
            ctx.accounts.borrower.to_account_info(),
        ],
    )?;

    emit!(LoanFunded {
        listing: ctx.accounts.listing.key(),
        lender: ctx.accounts.lender.key(),
        start_date: ctx.accounts.clock.unix_timestamp,
    });

    Ok(())
}
