use anchor_lang::prelude::*;

use crate::error::*;
use crate::events::AwardClosed;
use crate::state::Award;

#[derive(Accounts)]
pub struct CloseAward<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        mut,
        has_one = authority @ AwardError::Unauthorized,
        constraint = award.claims == 0 @ AwardError::OutstandingClaims,
        close = authority,
    )]
    pub award: Account<'info, Award>,
}

pub fn handle_close_award(ctx: Context<CloseAward>) -> Result<()> {
    emit!(AwardClosed {
        award: ctx.accounts.award.key(),
    });

    Ok(())
}
