use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use anchor_lang::AccountDeserialize;
use anchor_spl::metadata::MetadataAccount;
use anchor_spl::token::TokenAccount;
use tracing::debug;

use pledge_listings::state::{Listing, ListingState};
use pledge_listings::utils::calculate_amount_due;

use crate::derive::find_metadata_address;
use crate::error::ClientError;
use crate::layout::ListingQuery;
use crate::ledger::Ledger;

/// The set of collateral mints the app recognizes. Everything else is
/// invisible to discovery, listed or not.
#[derive(Debug, Default, Clone)]
pub struct CollateralRegistry {
    mints: HashSet<Pubkey>,
}

impl CollateralRegistry {
    pub fn from_mints<I: IntoIterator<Item = Pubkey>>(mints: I) -> Self {
        Self {
            mints: mints.into_iter().collect(),
        }
    }

    /// Reads the `["<base58 mint>", ...]` JSON shape the app ships.
    pub fn from_json(reader: impl Read) -> Result<Self, ClientError> {
        let entries: Vec<String> =
            serde_json::from_reader(reader).map_err(ClientError::InvalidRegistry)?;

        let mut mints = HashSet::with_capacity(entries.len());
        for entry in entries {
            let mint = Pubkey::from_str(&entry)
                .map_err(|_| ClientError::InvalidRegistryEntry(entry.clone()))?;
            mints.insert(mint);
        }

        Ok(Self { mints })
    }

    pub fn contains(&self, mint: &Pubkey) -> bool {
        self.mints.contains(mint)
    }

    pub fn len(&self) -> usize {
        self.mints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mints.is_empty()
    }
}

/// Name/image descriptor attached to discovered records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollateralMetadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

#[derive(Debug, Clone)]
pub struct DiscoveredListing {
    pub address: Pubkey,
    pub listing: Listing,
    pub metadata: CollateralMetadata,
}

impl DiscoveredListing {
    /// Principal plus interest if the loan were repaid at `now`. The
    /// ledger clock decides the real figure at execution time; this is
    /// a preview against whatever timestamp the caller supplies.
    pub fn repayment_due(&self, now: i64) -> Option<u64> {
        if self.listing.state != ListingState::Active {
            return None;
        }
        let start_date = self.listing.start_date?;
        let elapsed = now.saturating_sub(start_date).max(0) as u64;

        calculate_amount_due(
            self.listing.amount,
            self.listing.basis_points,
            self.listing.duration,
            elapsed,
        )
        .ok()
    }

    pub fn repossessable(&self, now: i64) -> bool {
        if self.listing.state != ListingState::Active {
            return false;
        }
        match self.listing.start_date {
            Some(start_date) => {
                let elapsed = now.saturating_sub(start_date);
                elapsed >= 0 && elapsed as u64 >= self.listing.duration
            }
            None => false,
        }
    }
}

/// Matching listings with their metadata descriptors, amount-ascending.
/// The ordering is incidental; callers must not treat it as a protocol
/// guarantee.
pub fn fetch_listings<L: Ledger>(
    ledger: &L,
    registry: &CollateralRegistry,
    query: &ListingQuery,
) -> Result<Vec<DiscoveredListing>, ClientError> {
    let raw = ledger
        .program_accounts(&pledge_listings::ID, &query.filters())
        .map_err(ClientError::Ledger)?;

    let mut listings = Vec::with_capacity(raw.len());
    for (address, data) in raw {
        let listing = Listing::try_deserialize(&mut data.as_slice())
            .map_err(|_| ClientError::MalformedAccount(address))?;

        if !registry.contains(&listing.mint) {
            debug!(%address, mint = %listing.mint, "skipping unrecognized collateral");
            continue;
        }

        let metadata = match fetch_metadata(ledger, &listing.mint)? {
            Some(metadata) => metadata,
            None => continue,
        };

        listings.push(DiscoveredListing {
            address,
            listing,
            metadata,
        });
    }

    listings.sort_by_key(|entry| entry.listing.amount);
    Ok(listings)
}

/// Single-record fetch; rejects records whose collateral the registry
/// does not recognize.
pub fn fetch_listing<L: Ledger>(
    ledger: &L,
    registry: &CollateralRegistry,
    address: &Pubkey,
) -> Result<DiscoveredListing, ClientError> {
    let data = ledger
        .account_data(address)
        .map_err(ClientError::Ledger)?
        .ok_or(ClientError::AccountNotFound(*address))?;

    let listing = Listing::try_deserialize(&mut data.as_slice())
        .map_err(|_| ClientError::MalformedAccount(*address))?;

    if !registry.contains(&listing.mint) {
        return Err(ClientError::UnrecognizedCollateral(listing.mint));
    }

    let (metadata_address, _) = find_metadata_address(&listing.mint);
    let metadata = fetch_metadata(ledger, &listing.mint)?
        .ok_or(ClientError::AccountNotFound(metadata_address))?;

    Ok(DiscoveredListing {
        address: *address,
        listing,
        metadata,
    })
}

/// Everything a borrower's portfolio view groups under "finished":
/// defaulted, cancelled, then repaid.
pub fn fetch_finalized_listings<L: Ledger>(
    ledger: &L,
    registry: &CollateralRegistry,
    borrower: &Pubkey,
) -> Result<Vec<DiscoveredListing>, ClientError> {
    let mut listings = Vec::new();
    for state in [
        ListingState::Defaulted,
        ListingState::Cancelled,
        ListingState::Repaid,
    ] {
        let query = ListingQuery::new()
            .with_state(state)
            .with_borrower(*borrower);
        listings.extend(fetch_listings(ledger, registry, &query)?);
    }
    Ok(listings)
}

/// A wallet token that could back a listing.
#[derive(Debug, Clone)]
pub struct CollateralAsset {
    pub token_account: Pubkey,
    pub mint: Pubkey,
    pub metadata: CollateralMetadata,
}

/// Tokens in `owner`'s wallet that are listable: balance of exactly
/// one, a recognized mint, and usable metadata.
pub fn fetch_collateral<L: Ledger>(
    ledger: &L,
    registry: &CollateralRegistry,
    owner: &Pubkey,
) -> Result<Vec<CollateralAsset>, ClientError> {
    let raw = ledger
        .token_accounts_by_owner(owner)
        .map_err(ClientError::Ledger)?;

    let mut assets = Vec::new();
    for (address, data) in raw {
        let account = match TokenAccount::try_deserialize(&mut data.as_slice()) {
            Ok(account) => account,
            Err(_) => continue,
        };

        if account.amount != 1 || !registry.contains(&account.mint) {
            continue;
        }

        let metadata = match fetch_metadata(ledger, &account.mint)? {
            Some(metadata) => metadata,
            None => continue,
        };

        assets.push(CollateralAsset {
            token_account: address,
            mint: account.mint,
            metadata,
        });
    }

    Ok(assets)
}

/// Metadata descriptor for a mint; None when the account is missing,
/// unreadable, or carries no image URI.
fn fetch_metadata<L: Ledger>(
    ledger: &L,
    mint: &Pubkey,
) -> Result<Option<CollateralMetadata>, ClientError> {
    let (address, _) = find_metadata_address(mint);

    let data = match ledger.account_data(&address).map_err(ClientError::Ledger)? {
        Some(data) => data,
        None => return Ok(None),
    };

    let account = match MetadataAccount::try_deserialize(&mut data.as_slice()) {
        Ok(account) => account,
        Err(_) => return Ok(None),
    };

    let uri = account.data.uri.trim_matches('\0').trim();
    if uri.is_empty() {
        return Ok(None);
    }

    Ok(Some(CollateralMetadata {
        name: account.data.name.trim_matches('\0').to_string(),
        symbol: account.data.symbol.trim_matches('\0').to_string(),
        uri: uri.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use anchor_lang::AnchorSerialize;
    use anchor_lang::Discriminator;
    use anchor_lang::solana_program::program_pack::Pack;
    use anchor_spl::token::spl_token;
    use mpl_token_metadata::state::{Data, Key, Metadata};

    use crate::ledger::testing::MemoryLedger;

    use super::*;

    fn listing(state: ListingState, mint: Pubkey, borrower: Pubkey, amount: u64) -> Listing {
        Listing {
            state,
            amount,
            borrower,
            lender: None,
            basis_points: 700,
            duration: 2_592_000,
            start_date: None,
            escrow: Pubkey::new_unique(),
            mint,
            bump: 255,
            escrow_bump: 254,
            uid: 0,
        }
    }

    fn insert_listing(ledger: &mut MemoryLedger, record: &Listing) -> Pubkey {
        let mut data = Listing::discriminator().to_vec();
        record.serialize(&mut data).unwrap();
        data.resize(Listing::space(), 0);

        let address = Pubkey::new_unique();
        ledger.insert(address, pledge_listings::ID, data);
        address
    }

    fn insert_metadata(ledger: &mut MemoryLedger, mint: Pubkey, name: &str, uri: &str) {
        let metadata = Metadata {
            key: Key::MetadataV1,
            update_authority: Pubkey::new_unique(),
            mint,
            data: Data {
                name: name.to_string(),
                symbol: "PLG".to_string(),
                uri: uri.to_string(),
                seller_fee_basis_points: 500,
                creators: None,
            },
            primary_sale_happened: false,
            is_mutable: true,
            edition_nonce: None,
            token_standard: None,
            collection: None,
            uses: None,
            collection_details: None,
            programmable_config: None,
        };

        let (address, _) = find_metadata_address(&mint);
        let mut data = metadata.try_to_vec().unwrap();
        data.resize(mpl_token_metadata::state::MAX_METADATA_LEN, 0);
        ledger.insert(address, mpl_token_metadata::ID, data);
    }

    fn insert_token_account(
        ledger: &mut MemoryLedger,
        owner: Pubkey,
        mint: Pubkey,
        amount: u64,
    ) -> Pubkey {
        let account = spl_token::state::Account {
            mint,
            owner,
            amount,
            state: spl_token::state::AccountState::Initialized,
            ..Default::default()
        };
        let mut data = vec![0u8; spl_token::state::Account::LEN];
        spl_token::state::Account::pack(account, &mut data).unwrap();

        let address = Pubkey::new_unique();
        ledger.insert(address, spl_token::ID, data);
        address
    }

    #[test]
    fn listings_are_filtered_and_sorted_by_amount() {
        let mut ledger = MemoryLedger::default();
        let borrower = Pubkey::new_unique();

        let recognized_a = Pubkey::new_unique();
        let recognized_b = Pubkey::new_unique();
        let unknown = Pubkey::new_unique();
        insert_metadata(&mut ledger, recognized_a, "One", "https://img/1");
        insert_metadata(&mut ledger, recognized_b, "Two", "https://img/2");
        insert_metadata(&mut ledger, unknown, "Nope", "https://img/3");

        insert_listing(
            &mut ledger,
            &listing(ListingState::Listed, recognized_a, borrower, 900),
        );
        insert_listing(
            &mut ledger,
            &listing(ListingState::Listed, recognized_b, borrower, 100),
        );
        insert_listing(
            &mut ledger,
            &listing(ListingState::Listed, unknown, borrower, 50),
        );
        insert_listing(
            &mut ledger,
            &listing(ListingState::Active, recognized_a, borrower, 10),
        );

        let registry = CollateralRegistry::from_mints([recognized_a, recognized_b]);
        let query = ListingQuery::new().with_state(ListingState::Listed);
        let found = fetch_listings(&ledger, &registry, &query).unwrap();

        let amounts: Vec<u64> = found.iter().map(|entry| entry.listing.amount).collect();
        assert_eq!(amounts, vec![100, 900]);
        assert_eq!(found[0].metadata.name, "Two");
    }

    #[test]
    fn listings_without_metadata_are_dropped() {
        let mut ledger = MemoryLedger::default();
        let mint = Pubkey::new_unique();

        insert_listing(
            &mut ledger,
            &listing(ListingState::Listed, mint, Pubkey::new_unique(), 10),
        );

        let registry = CollateralRegistry::from_mints([mint]);
        let query = ListingQuery::new().with_state(ListingState::Listed);
        assert!(fetch_listings(&ledger, &registry, &query)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn single_fetch_rejects_unrecognized_collateral() {
        let mut ledger = MemoryLedger::default();
        let mint = Pubkey::new_unique();
        insert_metadata(&mut ledger, mint, "One", "https://img/1");
        let address = insert_listing(
            &mut ledger,
            &listing(ListingState::Listed, mint, Pubkey::new_unique(), 10),
        );

        let registry = CollateralRegistry::default();
        let err = fetch_listing(&ledger, &registry, &address).unwrap_err();
        assert!(matches!(err, ClientError::UnrecognizedCollateral(m) if m == mint));
    }

    #[test]
    fn finalized_listings_cover_every_terminal_state() {
        let mut ledger = MemoryLedger::default();
        let borrower = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        insert_metadata(&mut ledger, mint, "One", "https://img/1");

        for state in [
            ListingState::Repaid,
            ListingState::Cancelled,
            ListingState::Defaulted,
            ListingState::Listed,
        ] {
            insert_listing(&mut ledger, &listing(state, mint, borrower, 10));
        }
        // another borrower's terminal record stays out
        insert_listing(
            &mut ledger,
            &listing(ListingState::Repaid, mint, Pubkey::new_unique(), 10),
        );

        let registry = CollateralRegistry::from_mints([mint]);
        let found = fetch_finalized_listings(&ledger, &registry, &borrower).unwrap();

        assert_eq!(found.len(), 3);
        assert!(found
            .iter()
            .all(|entry| entry.listing.state.is_terminal()
                && entry.listing.borrower == borrower));
    }

    #[test]
    fn collateral_scan_requires_unit_balance_and_registry() {
        let mut ledger = MemoryLedger::default();
        let owner = Pubkey::new_unique();

        let listable = Pubkey::new_unique();
        let fungible = Pubkey::new_unique();
        let unknown = Pubkey::new_unique();
        insert_metadata(&mut ledger, listable, "One", "https://img/1");
        insert_metadata(&mut ledger, fungible, "Two", "https://img/2");
        insert_metadata(&mut ledger, unknown, "Three", "https://img/3");

        let expected = insert_token_account(&mut ledger, owner, listable, 1);
        insert_token_account(&mut ledger, owner, fungible, 250);
        insert_token_account(&mut ledger, owner, unknown, 1);
        insert_token_account(&mut ledger, Pubkey::new_unique(), listable, 1);

        let registry = CollateralRegistry::from_mints([listable, fungible]);
        let assets = fetch_collateral(&ledger, &registry, &owner).unwrap();

        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].token_account, expected);
        assert_eq!(assets[0].mint, listable);
    }

    #[test]
    fn metadata_without_uri_is_unusable() {
        let mut ledger = MemoryLedger::default();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        insert_metadata(&mut ledger, mint, "One", "   ");
        insert_token_account(&mut ledger, owner, mint, 1);

        let registry = CollateralRegistry::from_mints([mint]);
        assert!(fetch_collateral(&ledger, &registry, &owner)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn registry_parses_base58_json() {
        let mint = Pubkey::new_unique();
        let json = format!("[\"{}\"]", mint);

        let registry = CollateralRegistry::from_json(json.as_bytes()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&mint));

        let err = CollateralRegistry::from_json("[\"not-a-key\"]".as_bytes()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRegistryEntry(_)));
    }

    #[test]
    fn repayment_preview_tracks_elapsed_time() {
        let mut record = listing(
            ListingState::Active,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            100,
        );
        record.start_date = Some(1_000);
        record.lender = Some(Pubkey::new_unique());

        let discovered = DiscoveredListing {
            address: Pubkey::new_unique(),
            listing: record,
            metadata: CollateralMetadata {
                name: "One".into(),
                symbol: "PLG".into(),
                uri: "https://img/1".into(),
            },
        };

        // full term: 7% of 100 on top of principal
        assert_eq!(discovered.repayment_due(1_000 + 2_592_000), Some(107));
        assert_eq!(discovered.repayment_due(1_000), Some(100));
        assert!(!discovered.repossessable(1_000 + 2_592_000 - 1));
        assert!(discovered.repossessable(1_000 + 2_592_000));
    }
}
