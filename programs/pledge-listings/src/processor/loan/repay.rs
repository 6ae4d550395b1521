use anchor_lang::{
    prelude::*,
    solana_program::{program::invoke, system_instruction},
};
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::error::*;
use crate::events::LoanRepaid;
use crate::state::{Listing, ListingState};
use crate::utils::*;

#[derive(Accounts)]
pub struct RepayLoan<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,
    #[account(
        mut,
        associated_token::mint = mint,
        associated_token::authority = borrower,
    )]
    pub deposit_token_account: Box<Account<'info, TokenAccount>>,
    /// CHECK: constrained on listing
    #[account(mut)]
    pub lender: AccountInfo<'info>,
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
}

pub fn handle_repay_loan(ctx: Context<RepayLoan>) -> Result<()> {
    let listing = &mut ctx.accounts.listing;

    let start_date = listing.start_date.ok_or(PledgeError::InvalidState)?;
    let elapsed = ctx
        .accounts
        .clock
        .unix_timestamp
        .saturating_sub(start_date)
        .max(0) as u64;

    let amount_due = calculate_amount_due(
        listing.amount,
        listing.basis_points,
        listing.duration,
        elapsed,
    )?;

    listing.state = ListingState::Repaid;

    // Transfer payment
    invoke(
        &system_instruction::transfer(&listing.borrower, &ctx.accounts.lender.key(), amount_due),
        &[
            ctx.accounts.borrower.to_account_info(),
            ctx.accounts.lender.to_account_info(),
        ],
    )?;

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

    emit!(LoanRepaid {
        listing: ctx.accounts.listing.key(),
        lender: ctx.accounts.lender.key(),
        amount_due,
    });

    Ok(())
}
