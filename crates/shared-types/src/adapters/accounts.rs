use crate::entities::ValidatorAccount;
use crate::errors::AccountsError;
use crate::ports::AccountsAdapter;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Account store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccounts {
    accounts: RwLock<HashMap<Vec<u8>, ValidatorAccount>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account.
    pub fn insert(&self, account: ValidatorAccount) {
        self.accounts.write().insert(account.address.clone(), account);
    }

    pub fn get(&self, address: &[u8]) -> Option<ValidatorAccount> {
        self.accounts.read().get(address).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl AccountsAdapter for InMemoryAccounts {
    fn get_existing_account(&self, address: &[u8]) -> Result<ValidatorAccount, AccountsError> {
        self.get(address)
            .ok_or_else(|| AccountsError::AccountNotFound {
                address: hex::encode(address),
            })
    }

    fn save_account(&self, account: ValidatorAccount) -> Result<(), AccountsError> {
        if account.address.is_empty() {
            return Err(AccountsError::Storage("empty address".to_string()));
        }
        self.insert(account);
        Ok(())
    }
}
