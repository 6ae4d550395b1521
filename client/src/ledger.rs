use anchor_lang::prelude::Pubkey;

use crate::error::BoxError;

/// Byte-level predicate over serialized account data. Mirrors what the
/// RPC layer evaluates server-side, so the same filters drive both real
/// nodes and the in-memory ledger used in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    DataSize(usize),
    Memcmp { offset: usize, bytes: Vec<u8> },
}

impl AccountFilter {
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            AccountFilter::DataSize(size) => data.len() == *size,
            AccountFilter::Memcmp { offset, bytes } => data
                .get(*offset..*offset + bytes.len())
                .map_or(false, |window| window == bytes.as_slice()),
        }
    }
}

/// The handle every operation takes to reach current chain state. Kept
/// narrow so any transport (RPC client, test fixture, cached snapshot)
/// can stand behind it.
pub trait Ledger {
    fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, BoxError>;

    fn account_exists(&self, address: &Pubkey) -> Result<bool, BoxError> {
        Ok(self.account_data(address)?.is_some())
    }

    /// Accounts owned by `program` whose data passes every filter.
    fn program_accounts(
        &self,
        program: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>, BoxError>;

    /// SPL token accounts held by `owner`.
    fn token_accounts_by_owner(&self, owner: &Pubkey)
        -> Result<Vec<(Pubkey, Vec<u8>)>, BoxError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use anchor_spl::token::spl_token;

    use super::*;

    /// Address -> (owning program, data). Stands in for an RPC node.
    #[derive(Default)]
    pub struct MemoryLedger {
        accounts: HashMap<Pubkey, (Pubkey, Vec<u8>)>,
    }

    impl MemoryLedger {
        pub fn insert(&mut self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
            self.accounts.insert(address, (owner, data));
        }
    }

    impl Ledger for MemoryLedger {
        fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, BoxError> {
            Ok(self.accounts.get(address).map(|(_, data)| data.clone()))
        }

        fn program_accounts(
            &self,
            program: &Pubkey,
            filters: &[AccountFilter],
        ) -> Result<Vec<(Pubkey, Vec<u8>)>, BoxError> {
            let mut matches: Vec<(Pubkey, Vec<u8>)> = self
                .accounts
                .iter()
                .filter(|(_, (owner, data))| {
                    owner == program && filters.iter().all(|filter| filter.matches(data))
                })
                .map(|(address, (_, data))| (*address, data.clone()))
                .collect();
            matches.sort_by_key(|(address, _)| *address);
            Ok(matches)
        }

        fn token_accounts_by_owner(
            &self,
            owner: &Pubkey,
        ) -> Result<Vec<(Pubkey, Vec<u8>)>, BoxError> {
            Ok(self
                .accounts
                .iter()
                .filter(|(_, (program, data))| {
                    *program == spl_token::ID
                        && data.get(32..64) == Some(owner.as_ref())
                })
                .map(|(address, (_, data))| (*address, data.clone()))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memcmp_matches_exact_window() {
        let filter = AccountFilter::Memcmp {
            offset: 2,
            bytes: vec![5, 6],
        };
        assert!(filter.matches(&[0, 1, 5, 6, 9]));
        assert!(!filter.matches(&[0, 1, 5, 7, 9]));
        assert!(!filter.matches(&[0, 1, 5]));
    }

    #[test]
    fn datasize_is_exact() {
        let filter = AccountFilter::DataSize(3);
        assert!(filter.matches(&[1, 2, 3]));
        assert!(!filter.matches(&[1, 2, 3, 4]));
    }
}
