//! In-memory [`TransactionStore`] used by tests and ephemeral sessions.

use std::sync::Mutex;

use spendy_domain::{NewTransaction, OwnerId, Transaction, TransactionId};
use tracing::debug;

use crate::{
    storage::{sort_newest_first, TransactionStore},
    StoreError,
};

#[derive(Debug, Default)]
struct MemoryState {
    transactions: Vec<Transaction>,
    pending_index_builds: u32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `fetches` reads fail as if the store were still building its index.
    pub fn simulate_index_build(&self, fetches: u32) {
        self.state().pending_index_builds = fetches;
    }

    pub fn len(&self) -> usize {
        self.state().transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("MemoryStore lock poisoned")
    }
}

impl TransactionStore for MemoryStore {
    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<Transaction>, StoreError> {
        let mut state = self.state();
        if state.pending_index_builds > 0 {
            state.pending_index_builds -= 1;
            return Err(StoreError::IndexBuilding(
                "transactions by owner and date".into(),
            ));
        }
        let mut owned: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|txn| &txn.owner_id == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut owned);
        debug!(user = %owner, count = owned.len(), "fetched transactions from memory");
        Ok(owned)
    }

    fn create_transaction(
        &self,
        owner: &OwnerId,
        fields: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let txn = Transaction::from_new(TransactionId::new(), owner.clone(), fields);
        self.state().transactions.push(txn.clone());
        Ok(txn)
    }
}
