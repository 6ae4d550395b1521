use anchor_lang::{
    prelude::*,
    solana_program::program::invoke_signed,
};
use mpl_token_metadata::instruction::{freeze_delegated_account, thaw_delegated_account};

use crate::error::*;

pub struct FreezeParams<'a, 'b> {
    /// CHECK
    pub delegate: AccountInfo<'a>,
    /// CHECK
    pub token_account: AccountInfo<'a>,
    /// CHECK
    pub edition: AccountInfo<'a>,
    /// CHECK
    pub mint: AccountInfo<'a>,
    pub signer_seeds: &'b [&'b [&'b [u8]]],
}

pub fn freeze(params: FreezeParams) -> Result<()> {
    let FreezeParams {
        delegate,
        token_account,
        edition,
        mint,
        signer_seeds,
    } = params;

    invoke_signed(
        &freeze_delegated_account(
            mpl_token_metadata::ID,
            delegate.key(),
            token_account.key(),
            edition.key(),
            mint.key(),
        ),
        &[delegate, token_account, edition, mint],
        signer_seeds,
    )?;

    Ok(())
}

pub fn thaw(params: FreezeParams) -> Result<()> {
    let FreezeParams {
        delegate,
        token_account,
        edition,
        mint,
        signer_seeds,
    } = params;

    invoke_signed(
        &thaw_delegated_account(
            mpl_token_metadata::ID,
            delegate.key(),
            token_account.key(),
            edition.key(),
            mint.key(),
        ),
        &[delegate, token_account, edition, mint],
        signer_seeds,
    )?;

    Ok(())
}

/// Interest accrued so far. The rate covers the full loan duration and is
/// pro-rated by elapsed time, capped at the full term. Floors once, after
/// all multiplications, so no fractional lamport is ever owed.
pub fn calculate_interest_due(
    amount: u64,
    basis_points: u32,
    duration: u64,
    elapsed: u64,
) -> Result<u64> {
    let elapsed = std::cmp::min(elapsed, duration);

    let interest = (amount as u128)
        .checked_mul(basis_points as u128)
        .ok_or(PledgeError::NumericalOverflow)?
        .checked_mul(elapsed as u128)
        .ok_or(PledgeError::NumericalOverflow)?
        .checked_div(
            (duration as u128)
                .checked_mul(10_000)
                .ok_or(PledgeError::NumericalOverflow)?,
        )
        .ok_or(PledgeError::NumericalOverflow)?;

    u64::try_from(interest).map_err(|_| PledgeError::NumericalOverflow.into())
}

pub fn calculate_amount_due(
    amount: u64,
    basis_points: u32,
    duration: u64,
    elapsed: u64,
) -> Result<u64> {
    let interest = calculate_interest_due(amount, basis_points, duration, elapsed)?;

    amount
        .checked_add(interest)
        .ok_or(PledgeError::NumericalOverflow.into())
}
