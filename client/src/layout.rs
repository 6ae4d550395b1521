//! Byte schema of the serialized listing record.
//!
//! Discovery filters match raw account bytes server-side, so these
//! offsets are a wire contract with every record already stored. They
//! are derived here, once, from the field sizes; call sites never
//! hand-compute them.

use anchor_lang::prelude::Pubkey;

use pledge_listings::state::{Listing, ListingState};

use crate::ledger::AccountFilter;

/// Anchor's account tag.
pub const ACCOUNT_TAG: usize = 8;
/// 1-byte state tag.
pub const STATE: usize = ACCOUNT_TAG;
/// u64 principal.
pub const AMOUNT: usize = STATE + 1;
/// 32-byte borrower identity.
pub const BORROWER: usize = AMOUNT + 8;

/// High-level listing filter, lowered to byte predicates.
#[derive(Debug, Default, Clone)]
pub struct ListingQuery {
    pub state: Option<ListingState>,
    pub borrower: Option<Pubkey>,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: ListingState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_borrower(mut self, borrower: Pubkey) -> Self {
        self.borrower = Some(borrower);
        self
    }

    pub fn filters(&self) -> Vec<AccountFilter> {
        let mut filters = vec![AccountFilter::DataSize(Listing::space())];

        if let Some(state) = self.state {
            filters.push(AccountFilter::Memcmp {
                offset: STATE,
                bytes: vec![state as u8],
            });
        }

        if let Some(borrower) = self.borrower {
            filters.push(AccountFilter::Memcmp {
                offset: BORROWER,
                bytes: borrower.to_bytes().to_vec(),
            });
        }

        filters
    }
}

#[cfg(test)]
mod tests {
    use anchor_lang::AnchorSerialize;

    use super::*;

    /// Account bytes the way a node returns them: tag, record, padding.
    fn account_bytes(listing: &Listing) -> Vec<u8> {
        let mut data = vec![0u8; ACCOUNT_TAG];
        listing.serialize(&mut data).unwrap();
        data.resize(Listing::space(), 0);
        data
    }

    fn sample(state: ListingState, borrower: Pubkey) -> Listing {
        Listing {
            state,
            amount: 1_000,
            borrower,
            lender: None,
            basis_points: 500,
            duration: 86_400,
            start_date: None,
            escrow: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            bump: 255,
            escrow_bump: 254,
            uid: 0,
        }
    }

    #[test]
    fn offsets_line_up_with_serialization() {
        let borrower = Pubkey::new_unique();
        let listing = sample(ListingState::Active, borrower);
        let data = account_bytes(&listing);

        assert_eq!(data[STATE], ListingState::Active as u8);
        assert_eq!(&data[AMOUNT..AMOUNT + 8], &1_000u64.to_le_bytes());
        assert_eq!(&data[BORROWER..BORROWER + 32], borrower.as_ref());
    }

    #[test]
    fn query_filters_select_matching_records() {
        let borrower = Pubkey::new_unique();
        let listed = account_bytes(&sample(ListingState::Listed, borrower));
        let active = account_bytes(&sample(ListingState::Active, borrower));
        let other_borrower = account_bytes(&sample(ListingState::Listed, Pubkey::new_unique()));

        let query = ListingQuery::new()
            .with_state(ListingState::Listed)
            .with_borrower(borrower);
        let filters = query.filters();

        let matches = |data: &[u8]| filters.iter().all(|filter| filter.matches(data));
        assert!(matches(&listed));
        assert!(!matches(&active));
        assert!(!matches(&other_borrower));
    }

    #[test]
    fn state_only_query_ignores_borrower() {
        let filters = ListingQuery::new()
            .with_state(ListingState::Active)
            .filters();

        let active = account_bytes(&sample(ListingState::Active, Pubkey::new_unique()));
        assert!(filters.iter().all(|filter| filter.matches(&active)));
    }
}
