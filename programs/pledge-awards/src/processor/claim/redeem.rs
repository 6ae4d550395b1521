use anchor_lang::prelude::*;

use crate::error::*;
use crate::events::AwardClaimed;
use crate::state::{Award, Claim};

#[derive(Accounts)]
pub struct ClaimAward<'info> {
    #[account(mut)]
    pub recipient: Signer<'info>,
    /// The matching award whose pre-funded balance pays the claim
    #[account(mut)]
    pub award: Account<'info, Award>,
    #[account(
        mut,
        seeds = [
            Claim::PREFIX,
            award.key().as_ref(),
            recipient.key().as_ref(),
        ],
        bump = claim.bump,
        has_one = recipient @ AwardError::Unauthorized,
        constraint = claim.award == award.key() @ AwardError::ClaimNotFound,
        close = recipient,
    )]
    pub claim: Account<'info, Claim>,
    pub system_program: Program<'info, System>,
}

pub fn handle_claim_award(ctx: Context<ClaimAward>) -> Result<()> {
    let amount = ctx.accounts.award.amount;

    let award = &mut ctx.accounts.award;
    award.claims = award
        .claims
        .checked_sub(1)
        .ok_or(AwardError::NumericalOverflow)?;

    // Pay out of the award record itself, keeping it rent exempt
    let award_info = ctx.accounts.award.to_account_info();
    let rent_floor = Rent::get()?.minimum_balance(award_info.data_len());
    let available = award_info.lamports().saturating_sub(rent_floor);
    require!(available >= amount, AwardError::InsufficientFunds);

    **award_info.try_borrow_mut_lamports()? -= amount;
    **ctx
        .accounts
        .recipient
        .to_account_info()
        .try_borrow_mut_lamports()? += amount;

    emit!(AwardClaimed {
        award: ctx.accounts.award.key(),
        recipient: ctx.accounts.recipient.key(),
        amount,
    });

    Ok(())
}
