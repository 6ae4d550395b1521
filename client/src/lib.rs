//! Host-side SDK for the pledge programs.
//!
//! Everything here runs against an explicit [`Ledger`] handle rather
//! than ambient connection state: callers construct a
//! [`ProtocolClient`] (or call the free functions with their own
//! handle) and thread it through every operation. Transaction
//! construction and signing stay with the wallet layer.

pub mod derive;
pub mod discover;
pub mod error;
pub mod layout;
pub mod ledger;

use anchor_lang::prelude::Pubkey;

pub use derive::{
    find_award_address, find_claim_address, find_escrow_address, find_listing_address,
    find_metadata_address,
};
pub use discover::{
    fetch_collateral, fetch_finalized_listings, fetch_listing, fetch_listings, CollateralAsset,
    CollateralMetadata, CollateralRegistry, DiscoveredListing,
};
pub use error::ClientError;
pub use layout::ListingQuery;
pub use ledger::{AccountFilter, Ledger};

/// A ledger handle plus the collateral registry, threaded through every
/// protocol call.
pub struct ProtocolClient<L: Ledger> {
    ledger: L,
    registry: CollateralRegistry,
}

impl<L: Ledger> ProtocolClient<L> {
    pub fn new(ledger: L, registry: CollateralRegistry) -> Self {
        Self { ledger, registry }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn registry(&self) -> &CollateralRegistry {
        &self.registry
    }

    pub fn find_listing_address(
        &self,
        mint: &Pubkey,
        borrower: &Pubkey,
    ) -> Result<(Pubkey, u8), ClientError> {
        derive::find_listing_address(&self.ledger, mint, borrower)
    }

    pub fn find_award_address(&self, authority: &Pubkey) -> Result<(Pubkey, u8), ClientError> {
        derive::find_award_address(&self.ledger, authority)
    }

    pub fn fetch_listings(
        &self,
        query: &ListingQuery,
    ) -> Result<Vec<DiscoveredListing>, ClientError> {
        discover::fetch_listings(&self.ledger, &self.registry, query)
    }

    pub fn fetch_listing(&self, address: &Pubkey) -> Result<DiscoveredListing, ClientError> {
        discover::fetch_listing(&self.ledger, &self.registry, address)
    }

    pub fn fetch_finalized_listings(
        &self,
        borrower: &Pubkey,
    ) -> Result<Vec<DiscoveredListing>, ClientError> {
        discover::fetch_finalized_listings(&self.ledger, &self.registry, borrower)
    }

    pub fn fetch_collateral(&self, owner: &Pubkey) -> Result<Vec<CollateralAsset>, ClientError> {
        discover::fetch_collateral(&self.ledger, &self.registry, owner)
    }
}
