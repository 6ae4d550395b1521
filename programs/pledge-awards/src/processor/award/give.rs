use anchor_lang::{
    prelude::*,
    solana_program::{program::invoke, system_instruction},
};

use crate::error::*;
use crate::events::AwardGiven;
use crate::state::{Award, Claim};
use crate::verifier::{compute_entry_hash, verify_inclusion, EntryAttestation};

#[derive(Accounts)]
pub struct GiveAward<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: the entry author; bound into the leaf hash before payout
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,
    /// CHECK: matched against the award's stored treasury
    #[account(mut)]
    pub treasury: Option<UncheckedAccount<'info>>,
    /// CHECK: identity of the entry being awarded
    pub entry_id: UncheckedAccount<'info>,
    /// CHECK: the tree the inclusion proof is evaluated against
    pub forum_tree: UncheckedAccount<'info>,
    #[account(
        constraint = award.kind.matching_award().is_none() @ AwardError::ClaimRequired,
    )]
    pub award: Account<'info, Award>,
    pub system_program: Program<'info, System>,
}

pub fn handle_give_award<'info>(
    ctx: Context<'_, '_, '_, 'info, GiveAward<'info>>,
    root: [u8; 32],
    leaf_hash: [u8; 32],
    leaf_index: u32,
    entry: EntryAttestation,
) -> Result<()> {
    verify_entry(
        &ctx.accounts.entry_id.key(),
        &ctx.accounts.recipient.key(),
        &entry,
        root,
        leaf_hash,
        leaf_index,
        ctx.remaining_accounts,
    )?;

    let (recipient_share, treasury_share) = pay_out(
        &ctx.accounts.award,
        &ctx.accounts.payer,
        &ctx.accounts.recipient,
        ctx.accounts.treasury.as_ref(),
    )?;

    emit!(AwardGiven {
        award: ctx.accounts.award.key(),
        entry_id: ctx.accounts.entry_id.key(),
        recipient: ctx.accounts.recipient.key(),
        recipient_share,
        treasury_share,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct GiveAwardWithClaim<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: the entry author; bound into the leaf hash before payout
    #[account(mut)]
    pub recipient: UncheckedAccount<'info>,
    /// CHECK: matched against the award's stored treasury
    #[account(mut)]
    pub treasury: Option<UncheckedAccount<'info>>,
    /// CHECK: identity of the entry being awarded
    pub entry_id: UncheckedAccount<'info>,
    /// CHECK: the tree the inclusion proof is evaluated against
    pub forum_tree: UncheckedAccount<'info>,
    #[account(
        constraint = award.kind.matching_award() == Some(matching_award.key())
            @ AwardError::MatchingAwardMismatch,
    )]
    pub award: Account<'info, Award>,
    /// The award the recipient becomes entitled to redeem
    #[account(mut)]
    pub matching_award: Account<'info, Award>,
    #[account(
        init_if_needed,
        payer = payer,
        seeds = [
            Claim::PREFIX,
            matching_award.key().as_ref(),
            recipient.key().as_ref(),
        ],
        space = Claim::space(),
        bump,
    )]
    pub claim: Account<'info, Claim>,
    pub system_program: Program<'info, System>,
}

pub fn handle_give_award_with_claim<'info>(
    ctx: Context<'_, '_, '_, 'info, GiveAwardWithClaim<'info>>,
    root: [u8; 32],
    leaf_hash: [u8; 32],
    leaf_index: u32,
    entry: EntryAttestation,
) -> Result<()> {
    verify_entry(
        &ctx.accounts.entry_id.key(),
        &ctx.accounts.recipient.key(),
        &entry,
        root,
        leaf_hash,
        leaf_index,
        ctx.remaining_accounts,
    )?;

    let (recipient_share, treasury_share) = pay_out(
        &ctx.accounts.award,
        &ctx.accounts.payer,
        &ctx.accounts.recipient,
        ctx.accounts.treasury.as_ref(),
    )?;

    // First give under this chain creates the claim; later gives only
    // bump its count.
    let claim = &mut ctx.accounts.claim;
    if claim.amount == 0 {
        claim.award = ctx.accounts.matching_award.key();
        claim.recipient = ctx.accounts.recipient.key();
        claim.bump = *ctx.bumps.get("claim").unwrap();

        let matching_award = &mut ctx.accounts.matching_award;
        matching_award.claims = matching_award
            .claims
            .checked_add(1)
            .ok_or(AwardError::NumericalOverflow)?;
    }
    claim.amount = claim
        .amount
        .checked_add(1)
        .ok_or(AwardError::NumericalOverflow)?;

    emit!(AwardGiven {
        award: ctx.accounts.award.key(),
        entry_id: ctx.accounts.entry_id.key(),
        recipient: ctx.accounts.recipient.key(),
        recipient_share,
        treasury_share,
    });

    Ok(())
}

/// Recomputes the leaf hash with the recipient as author, then checks
/// inclusion. A valid proof for somebody else's entry cannot be routed
/// to an arbitrary recipient.
fn verify_entry(
    entry_id: &Pubkey,
    recipient: &Pubkey,
    entry: &EntryAttestation,
    root: [u8; 32],
    leaf_hash: [u8; 32],
    leaf_index: u32,
    proof_accounts: &[AccountInfo],
) -> Result<()> {
    let computed = compute_entry_hash(
        entry_id,
        recipient,
        entry.created_at,
        entry.edited_at,
        entry.nonce,
        &entry.data_hash,
    );
    require!(computed == leaf_hash, AwardError::ProofInvalid);

    let proof: Vec<[u8; 32]> = proof_accounts
        .iter()
        .map(|account| account.key.to_bytes())
        .collect();

    require!(
        verify_inclusion(root, leaf_hash, &proof, leaf_index),
        AwardError::ProofInvalid
    );

    Ok(())
}

fn pay_out<'info>(
    award: &Account<'info, Award>,
    payer: &Signer<'info>,
    recipient: &UncheckedAccount<'info>,
    treasury: Option<&UncheckedAccount<'info>>,
) -> Result<(u64, u64)> {
    let (recipient_share, treasury_share) = match award.treasury {
        Some(expected) => {
            let treasury = treasury.ok_or(AwardError::TreasuryMismatch)?;
            require_keys_eq!(treasury.key(), expected, AwardError::TreasuryMismatch);

            let (recipient_share, treasury_share) = Award::split(award.amount);

            invoke(
                &system_instruction::transfer(&payer.key(), &expected, treasury_share),
                &[payer.to_account_info(), treasury.to_account_info()],
            )?;

            (recipient_share, treasury_share)
        }
        None => (award.amount, 0),
    };

    invoke(
        &system_instruction::transfer(&payer.key(), &recipient.key(), recipient_share),
        &[payer.to_account_info(), recipient.to_account_info()],
    )?;

    Ok((recipient_share, treasury_share))
}
