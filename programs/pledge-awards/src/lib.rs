use anchor_lang::prelude::*;

mod processor;
use processor::{award::*, claim::*};

pub mod error;
pub mod events;
pub mod state;
pub mod verifier;

use verifier::EntryAttestation;

declare_id!("9tFDZJMp3byJ4JWmWHhVjYWeB8peFpztHjTX6AqPnKmj");

#[program]
pub mod pledge_awards {
    use super::*;

    pub fn create_award(
        ctx: Context<CreateAward>,
        uid: u8,
        amount: u64,
        deposit: u64,
    ) -> Result<()> {
        processor::award::handle_create_award(ctx, uid, amount, deposit)
    }

    pub fn give_award<'info>(
        ctx: Context<'_, '_, '_, 'info, GiveAward<'info>>,
        root: [u8; 32],
        leaf_hash: [u8; 32],
        leaf_index: u32,
        entry: EntryAttestation,
    ) -> Result<()> {
        processor::award::handle_give_award(ctx, root, leaf_hash, leaf_index, entry)
    }

    pub fn give_award_with_claim<'info>(
        ctx: Context<'_, '_, '_, 'info, GiveAwardWithClaim<'info>>,
        root: [u8; 32],
        leaf_hash: [u8; 32],
        leaf_index: u32,
        entry: EntryAttestation,
    ) -> Result<()> {
        processor::award::handle_give_award_with_claim(ctx, root, leaf_hash, leaf_index, entry)
    }

    pub fn claim_award(ctx: Context<ClaimAward>) -> Result<()> {
        processor::claim::handle_claim_award(ctx)
    }

    pub fn close_award(ctx: Context<CloseAward>) -> Result<()> {
        processor::award::handle_close_award(ctx)
    }
}
