use anchor_lang::prelude::*;

use crate::error::*;
use crate::events::ListingClosed;
use crate::state::Listing;

#[derive(Accounts)]
pub struct CloseListing<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,
    #[account(
        mut,
        has_one = borrower @ PledgeError::Unauthorized,
        constraint = listing.state.is_terminal() @ PledgeError::InvalidState,
        close = borrower,
    )]
    pub listing: Account<'info, Listing>,
}

pub fn handle_close_listing(ctx: Context<CloseListing>) -> Result<()> {
    emit!(ListingClosed {
        listing: ctx.accounts.listing.key(),
    });

    Ok(())
}
