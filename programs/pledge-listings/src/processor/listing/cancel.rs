use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::error::*;
use crate::events::ListingCancelled;
use crate::state::{Listing, ListingState};
use crate::utils::*;

#[derive(Accounts)]
pub struct CancelListing<'info> {
    pub borrower: Signer<'info>,
    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = borrower,
    )]
    pub deposit_token_account: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        seeds = [
            Listing::PREFIX,
            mint.key().as_ref(),
            borrower.key().as_ref(),
            &[listing.uid],
        ],
        bump = listing.bump,
        has_one = borrower @ PledgeError::Unauthorized,
        has_one = mint,
        constraint = listing.state == ListingState::Listed @ PledgeError::InvalidState,
    )]
    pub listing: Box<Account<'info, Listing>>,
    /// CHECK: constrained by seeds
    #[account(
        seeds = [Listing::ESCROW_PREFIX, mint.key().as_ref()],
        bump = listing.escrow_bump,
    )]
    pub escrow: UncheckedAccount<'info>,
    pub mint: Box<Account<'info, Mint>>,
    /// CHECK: validated in cpi
    pub edition: UncheckedAccount<'info>,
    /// CHECK: validated in cpi
    pub metadata_program: UncheckedAccount<'info>,
    /// Misc
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handle_cancel_listing(ctx: Context<CancelListing>) -> Result<()> {
    let listing = &mut ctx.accounts.listing;

    listing.state = ListingState::Cancelled;

    // Return the collateral to the borrower's free control
    let mint_key = ctx.accounts.mint.key();
    let escrow_bump = &[ctx.accounts.listing.escrow_bump];
    let signer_seeds = &[&[
        Listing::ESCROW_PREFIX,
        mint_key.as_ref(),
        escrow_bump,
    ][..]];

    thaw(FreezeParams {
        delegate: ctx.accounts.escrow.to_account_info(),
        token_account: ctx.accounts.deposit_token_account.to_account_info(),
        edition: ctx.accounts.edition.to_account_info(),
        mint: ctx.accounts.mint.to_account_info(),
        signer_seeds,
    })?;

    anchor_spl::token::revoke(CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        anchor_spl::token::Revoke {
            source: ctx.accounts.deposit_token_account.to_account_info(),
            authority: ctx.accounts.borrower.to_account_info(),
        },
    ))?;

    emit!(ListingCancelled {
        listing: ctx.accounts.listing.key(),
        borrower: ctx.accounts.borrower.key(),
    });

    Ok(())
}
