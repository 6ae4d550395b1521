use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::error::*;
use crate::events::CollateralRepossessed;
use crate::state::{Listing, ListingState};
use crate::utils::*;

#[derive(Accounts)]
pub struct Repossess<'info> {
    #[account(mut)]
    pub lender: Signer<'info>,
    /// CHECK: constrained on listing
    #[account(mut)]
    pub borrower: AccountInfo<'info>,
    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = lender,
    )]
    pub lender_token_account: Box<Account<'info, TokenAccount>>,
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
        has_one = borrower,
        has_one = mint,
        constraint = listing.lender == Some(lender.key()) @ PledgeError::Unauthorized,
        constraint = listing.state == ListingState::Active @ PledgeError::InvalidState,
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
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub clock: Sysvar<'info, Clock>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handle_repossess(ctx: Context<Repossess>) -> Result<()> {
    let listing = &mut ctx.accounts.listing;

    // The deadline is the ledger clock's business, never the caller's.
    // Boundary inclusive: elapsed == duration is already overdue.
    let start_date = listing.start_date.ok_or(PledgeError::InvalidState)?;
    let elapsed = ctx.accounts.clock.unix_timestamp.saturating_sub(start_date);

    if elapsed < 0 || (elapsed as u64) < listing.duration {
        return Err(PledgeError::NotOverdue.into());
    }

    listing.state = ListingState::Defaulted;

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

    // Transfer NFT
    anchor_spl::token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            anchor_spl::token::Transfer {
                from: ctx.accounts.deposit_token_account.to_account_info(),
                to: ctx.accounts.lender_token_account.to_account_info(),
                authority: ctx.accounts.escrow.to_account_info(),
            },
            signer_seeds,
        ),
        1,
    )?;

    emit!(CollateralRepossessed {
        listing: ctx.accounts.listing.key(),
        lender: ctx.accounts.lender.key(),
        mint: ctx.accounts.mint.key(),
    });

    Ok(())
}
