use anchor_lang::prelude::*;

mod processor;
use processor::{listing::*, loan::*};

pub mod error;
pub mod events;
pub mod state;
pub mod utils;

declare_id!("D5wW6bLfXe8Wnu843GNUqfjpDxxwQKUKH3KPhEn8SvXA");

#[program]
pub mod pledge_listings {
    use super::*;

    pub fn init_listing(
        ctx: Context<InitListing>,
        amount: u64,
        basis_points: u32,
        duration: u64,
        uid: u8,
    ) -> Result<()> {
        processor::listing::handle_init_listing(ctx, amount, basis_points, duration, uid)
    }

    pub fn cancel_listing(ctx: Context<CancelListing>) -> Result<()> {
        processor::listing::handle_cancel_listing(ctx)
    }

    pub fn close_listing(ctx: Context<CloseListing>) -> Result<()> {
        processor::listing::handle_close_listing(ctx)
    }

    pub fn make_loan(ctx: Context<MakeLoan>) -> Result<()> {
        processor::loan::handle_make_loan(ctx)
    }

    pub fn repay_loan(ctx: Context<RepayLoan>) -> Result<()> {
        processor::loan::handle_repay_loan(ctx)
    }

    pub fn repossess_collateral(ctx: Context<Repossess>) -> Result<()> {
        processor::loan::handle_repossess(ctx)
    }
}
