use anchor_lang::prelude::Pubkey;
use rand::Rng;
use tracing::debug;

use pledge_awards::state::{Award, Claim};
use pledge_listings::state::Listing;

use crate::error::ClientError;
use crate::ledger::Ledger;

/// Probe values available to disambiguate records sharing identity seeds.
pub const PROBE_SPACE: usize = 256;

/// Listing address for a (mint, borrower) pair, probed until a free slot
/// is found. Returns the address and the probe that produced it; the
/// probe must be passed back to `init_listing` as the record's uid.
pub fn find_listing_address<L: Ledger>(
    ledger: &L,
    mint: &Pubkey,
    borrower: &Pubkey,
) -> Result<(Pubkey, u8), ClientError> {
    find_listing_address_with(ledger, &mut rand::thread_rng(), mint, borrower)
}

pub fn find_listing_address_with<L: Ledger, R: Rng>(
    ledger: &L,
    rng: &mut R,
    mint: &Pubkey,
    borrower: &Pubkey,
) -> Result<(Pubkey, u8), ClientError> {
    derive_unique_address(
        ledger,
        rng,
        &pledge_listings::ID,
        Listing::PREFIX,
        &[mint.as_ref(), borrower.as_ref()],
    )
}

/// Award address for an authority, probed the same way as listings.
pub fn find_award_address<L: Ledger>(
    ledger: &L,
    authority: &Pubkey,
) -> Result<(Pubkey, u8), ClientError> {
    find_award_address_with(ledger, &mut rand::thread_rng(), authority)
}

pub fn find_award_address_with<L: Ledger, R: Rng>(
    ledger: &L,
    rng: &mut R,
    authority: &Pubkey,
) -> Result<(Pubkey, u8), ClientError> {
    derive_unique_address(
        ledger,
        rng,
        &pledge_awards::ID,
        Award::PREFIX,
        &[authority.as_ref()],
    )
}

pub fn find_escrow_address(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[Listing::ESCROW_PREFIX, mint.as_ref()],
        &pledge_listings::ID,
    )
}

pub fn find_claim_address(matching_award: &Pubkey, recipient: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[Claim::PREFIX, matching_award.as_ref(), recipient.as_ref()],
        &pledge_awards::ID,
    )
}

pub fn find_metadata_address(mint: &Pubkey) -> (Pubkey, u8) {
    mpl_token_metadata::pda::find_metadata_account(mint)
}

/// Collision-probed derivation: draw a probe the prior collisions have
/// not burned, derive, and check occupancy through the ledger. Every
/// collision joins the exclusion set, so the loop terminates as soon as
/// a free slot exists and reports exhaustion once all 256 are taken.
fn derive_unique_address<L: Ledger, R: Rng>(
    ledger: &L,
    rng: &mut R,
    program_id: &Pubkey,
    label: &'static [u8],
    identity: &[&[u8]],
) -> Result<(Pubkey, u8), ClientError> {
    let mut excluded = [false; PROBE_SPACE];
    let mut remaining = PROBE_SPACE;

    while remaining > 0 {
        let probe = pick_probe(rng, &excluded, remaining);
        let probe_seed = [probe];

        let mut seeds: Vec<&[u8]> = Vec::with_capacity(identity.len() + 2);
        seeds.push(label);
        seeds.extend_from_slice(identity);
        seeds.push(&probe_seed);

        let (address, _) = Pubkey::find_program_address(&seeds, program_id);

        if !ledger
            .account_exists(&address)
            .map_err(ClientError::Ledger)?
        {
            return Ok((address, probe));
        }

        debug!(%address, probe, "derived address occupied, retrying");
        excluded[probe as usize] = true;
        remaining -= 1;
    }

    Err(ClientError::AddressSpaceExhausted)
}

/// Uniform draw over the probes not yet excluded.
fn pick_probe<R: Rng>(rng: &mut R, excluded: &[bool; PROBE_SPACE], remaining: usize) -> u8 {
    let mut nth = rng.gen_range(0..remaining);
    for (probe, taken) in excluded.iter().enumerate() {
        if *taken {
            continue;
        }
        if nth == 0 {
            return probe as u8;
        }
        nth -= 1;
    }
    unreachable!("remaining probes are counted exactly");
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::ledger::testing::MemoryLedger;

    use super::*;

    fn listing_address(mint: &Pubkey, borrower: &Pubkey, probe: u8) -> Pubkey {
        Pubkey::find_program_address(
            &[
                Listing::PREFIX,
                mint.as_ref(),
                borrower.as_ref(),
                &[probe],
            ],
            &pledge_listings::ID,
        )
        .0
    }

    #[test]
    fn returns_an_unoccupied_address() {
        let ledger = MemoryLedger::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mint = Pubkey::new_unique();
        let borrower = Pubkey::new_unique();

        let (address, probe) =
            find_listing_address_with(&ledger, &mut rng, &mint, &borrower).unwrap();

        assert_eq!(address, listing_address(&mint, &borrower, probe));
    }

    #[test]
    fn skips_occupied_probes() {
        let mut ledger = MemoryLedger::default();
        let mint = Pubkey::new_unique();
        let borrower = Pubkey::new_unique();

        // Occupy most of the probe space so the loop has to step over
        // collisions whatever the rng draws first.
        for probe in 0..=254u8 {
            ledger.insert(
                listing_address(&mint, &borrower, probe),
                pledge_listings::ID,
                vec![0u8; 8],
            );
        }

        let mut rng = StdRng::seed_from_u64(7);
        let (address, probe) =
            find_listing_address_with(&ledger, &mut rng, &mint, &borrower).unwrap();

        assert_eq!(probe, 255);
        assert_eq!(address, listing_address(&mint, &borrower, 255));
    }

    #[test]
    fn concurrent_listings_land_on_distinct_addresses() {
        let mut ledger = MemoryLedger::default();
        let mint = Pubkey::new_unique();
        let borrower = Pubkey::new_unique();
        let mut rng = StdRng::seed_from_u64(3);

        let (first, first_probe) =
            find_listing_address_with(&ledger, &mut rng, &mint, &borrower).unwrap();
        ledger.insert(first, pledge_listings::ID, vec![0u8; 8]);

        let (second, second_probe) =
            find_listing_address_with(&ledger, &mut rng, &mint, &borrower).unwrap();

        assert_ne!(first, second);
        assert_ne!(first_probe, second_probe);
    }

    #[test]
    fn exhausted_probe_space_is_an_error() {
        let mut ledger = MemoryLedger::default();
        let mint = Pubkey::new_unique();
        let borrower = Pubkey::new_unique();

        for probe in 0..=255u8 {
            ledger.insert(
                listing_address(&mint, &borrower, probe),
                pledge_listings::ID,
                vec![0u8; 8],
            );
        }

        let mut rng = StdRng::seed_from_u64(5);
        let err = find_listing_address_with(&ledger, &mut rng, &mint, &borrower).unwrap_err();
        assert!(matches!(err, ClientError::AddressSpaceExhausted));
    }

    #[test]
    fn award_addresses_use_their_own_namespace() {
        let ledger = MemoryLedger::default();
        let mut rng = StdRng::seed_from_u64(9);
        let authority = Pubkey::new_unique();

        let (address, probe) =
            find_award_address_with(&ledger, &mut rng, &authority).unwrap();

        let expected = Pubkey::find_program_address(
            &[Award::PREFIX, authority.as_ref(), &[probe]],
            &pledge_awards::ID,
        )
        .0;
        assert_eq!(address, expected);
    }
}
