use anchor_lang::{
    prelude::*,
    solana_program::{program::invoke, system_instruction},
};

use crate::error::*;
use crate::events::AwardCreated;
use crate::state::{Award, AwardKind};

#[derive(Accounts)]
#[instruction(uid: u8, amount: u64, deposit: u64)]
pub struct CreateAward<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        init,
        payer = authority,
        seeds = [
            Award::PREFIX,
            authority.key().as_ref(),
            &[uid],
        ],
        space = Award::space(),
        bump,
    )]
    pub award: Account<'info, Award>,
    /// When present, the new award is chained beneath this one
    pub matching_award: Option<Account<'info, Award>>,
    /// CHECK: stored and matched against on every give
    pub treasury: Option<UncheckedAccount<'info>>,
    pub system_program: Program<'info, System>,
}

pub fn handle_create_award(
    ctx: Context<CreateAward>,
    uid: u8,
    amount: u64,
    deposit: u64,
) -> Result<()> {
    require_gt!(amount, 0, AwardError::InvalidAmount);

    // Chains are one hop deep at most, enforced where they are formed
    let kind = match &ctx.accounts.matching_award {
        Some(parent) => {
            require!(
                parent.kind == AwardKind::Standalone,
                AwardError::ChainTooDeep
            );
            AwardKind::Matching {
                award: parent.key(),
            }
        }
        None => AwardKind::Standalone,
    };

    let award = &mut ctx.accounts.award;
    award.authority = ctx.accounts.authority.key();
    award.treasury = ctx.accounts.treasury.as_ref().map(|treasury| treasury.key());
    award.amount = amount;
    award.kind = kind;
    award.claims = 0;
    award.uid = uid;
    award.bump = *ctx.bumps.get("award").unwrap();

    // Pre-fund future claim payouts
    if deposit > 0 {
        invoke(
            &system_instruction::transfer(
                &ctx.accounts.authority.key(),
                &ctx.accounts.award.key(),
                deposit,
            ),
            &[
                ctx.accounts.authority.to_account_info(),
                ctx.accounts.award.to_account_info(),
            ],
        )?;
    }

    emit!(AwardCreated {
        award: ctx.accounts.award.key(),
        authority: ctx.accounts.authority.key(),
        amount,
        matching_award: ctx.accounts.award.kind.matching_award(),
    });

    Ok(())
}
