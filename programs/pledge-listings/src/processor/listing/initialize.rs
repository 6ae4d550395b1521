use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::error::*;
use crate::events::ListingCreated;
use crate::state::{Listing, ListingState};
use crate::utils::*;

#[derive(Accounts)]
#[instruction(amount: u64, basis_points: u32, duration: u64, uid: u8)]
pub struct InitListing<'info> {
    #[account(mut)]
    pub borrower: Signer<'info>,
    #[account(
        mut,
        constraint = deposit_token_account.amount == 1 @ PledgeError::InvalidCollateral,
        associated_token::mint = mint,
        associated_token::authority = borrower,
    )]
    pub deposit_token_account: Box<Account<'info, TokenAccount>>,
    /// The new listing account. The uid seed lets one (mint, borrower)
    /// pair hold several listings at once; the client probes for a free one.
    #[account(
        init,
        payer = borrower,
        seeds = [
            Listing::PREFIX,
            mint.key().as_ref(),
            borrower.key().as_ref(),
            &[uid],
        ],
        space = Listing::space(),
        bump,
    )]
    pub listing: Box<Account<'info, Listing>>,
    /// CHECK: holds no data; an authority the collateral is delegated to
    #[account(
        seeds = [Listing::ESCROW_PREFIX, mint.key().as_ref()],
        bump,
    )]
    pub escrow: UncheckedAccount<'info>,
    #[account(constraint = mint.supply == 1 @ PledgeError::InvalidCollateral)]
    pub mint: Box<Account<'info, Mint>>,
    /// CHECK: validated in cpi
    pub edition: UncheckedAccount<'info>,
    /// CHECK: validated in cpi
    pub metadata_program: UncheckedAccount<'info>,
    /// Misc
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handle_init_listing(
    ctx: Context<InitListing>,
    amount: u64,
    basis_points: u32,
    duration: u64,
    uid: u8,
) -> Result<()> {
    require_gt!(amount, 0, PledgeError::InvalidAmount);
    require_gt!(duration, 0, PledgeError::InvalidDuration);
    require!(
        basis_points >= 1 && basis_points <= 10_000,
        PledgeError::InvalidBasisPoints
    );

    let listing = &mut ctx.accounts.listing;

    // Init. Reinitialization after a close lands here too, so every
    // field is written.
    listing.state = ListingState::Listed;
    listing.amount = amount;
    listing.borrower = ctx.accounts.borrower.key();
    listing.lender = None;
    listing.basis_points = basis_points;
    listing.duration = duration;
    listing.start_date = None;
    listing.escrow = ctx.accounts.escrow.key();
    listing.mint = ctx.accounts.mint.key();
    listing.bump = *ctx.bumps.get("listing").unwrap();
    listing.escrow_bump = *ctx.bumps.get("escrow").unwrap();
    listing.uid = uid;

    // Delegate the collateral to the escrow, then freeze it in place
    anchor_spl::token::approve(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            anchor_spl::token::Approve {
                to: ctx.accounts.deposit_token_account.to_account_info(),
                delegate: ctx.accounts.escrow.to_account_info(),
                authority: ctx.accounts.borrower.to_account_info(),
            },
        ),
        1,
    )?;

    let mint_key = ctx.accounts.mint.key();
    let escrow_bump = &[ctx.accounts.listing.escrow_bump];
    let signer_seeds = &[&[
        Listing::ESCROW_PREFIX,
        mint_key.as_ref(),
        escrow_bump,
    ][..]];

    freeze(FreezeParams {
        delegate: ctx.accounts.escrow.to_account_info(),
        token_account: ctx.accounts.deposit_token_account.to_account_info(),
        edition: ctx.accounts.edition.to_account_info(),
        mint: ctx.accounts.mint.to_account_info(),
        signer_seeds,
    })?;

    emit!(ListingCreated {
        listing: ctx.accounts.listing.key(),
        borrower: ctx.accounts.borrower.key(),
        mint: ctx.accounts.mint.key(),
        amount,
        basis_points,
        duration,
    });

    Ok(())
}
