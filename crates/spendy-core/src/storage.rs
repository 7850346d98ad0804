use spendy_domain::{NewTransaction, OwnerId, Transaction};

use crate::StoreError;

/// Abstraction over document stores holding each owner's transactions.
///
/// Calls may be slow and may fail; callers only ever see resolved results.
pub trait TransactionStore: Send + Sync {
    /// Returns every transaction of `owner`, newest `occurred_at` first.
    fn fetch_transactions(&self, owner: &OwnerId) -> Result<Vec<Transaction>, StoreError>;

    /// Appends a transaction for `owner`, assigning its id.
    fn create_transaction(
        &self,
        owner: &OwnerId,
        fields: NewTransaction,
    ) -> Result<Transaction, StoreError>;
}

/// Orders a fetched list newest first, keeping insertion order for equal timestamps.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
}
